use thiserror::Error;

/// Failure kinds shared by the whole encoding layer.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unexpected encoding type")]
    UnexpectedEncodingType,

    #[error("Invalid container length")]
    InvalidContainerLength,

    #[error("Invalid table hash")]
    InvalidTableHash,

    #[error("Duplicate table entry")]
    DuplicateTableEntry,

    #[error("Read limit reached")]
    ReadLimitReached,

    #[error("Write limit reached")]
    WriteLimitReached,

    #[error("Stream error")]
    StreamError,

    #[error("Protocol error")]
    ProtocolError,

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
