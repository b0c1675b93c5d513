// crates/tabwire_core/src/consts.rs

/// Leading byte of every encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodingByte(pub u8);

impl EncodingByte {
    pub const POSITIVE_FIXINT_MIN: Self = Self(0x00);
    pub const POSITIVE_FIXINT_MAX: Self = Self(0x7f);

    pub const FALSE: Self = Self(0x00);
    pub const TRUE: Self = Self(0x01);

    pub const U8: Self = Self(0x80);
    pub const U16: Self = Self(0x81);
    pub const U32: Self = Self(0x82);
    pub const U64: Self = Self(0x83);

    pub const I8: Self = Self(0x84);
    pub const I16: Self = Self(0x85);
    pub const I32: Self = Self(0x86);
    pub const I64: Self = Self(0x87);

    pub const F32: Self = Self(0x88);
    pub const F64: Self = Self(0x89);

    pub const TABLE: Self = Self(0xb5);
    pub const ARRAY: Self = Self(0xba);
    pub const BINARY: Self = Self(0xbc);
    pub const STRING: Self = Self(0xbd);
    pub const NIL: Self = Self(0xbe);

    pub const NEGATIVE_FIXINT_MIN: Self = Self(0xc0);
    pub const NEGATIVE_FIXINT_MAX: Self = Self(0xff);

    #[inline]
    pub fn is_positive_fixint(self) -> bool {
        self.0 <= Self::POSITIVE_FIXINT_MAX.0
    }

    #[inline]
    pub fn is_negative_fixint(self) -> bool {
        self.0 >= Self::NEGATIVE_FIXINT_MIN.0
    }
}

/// Bytes taken by a prefix on the wire.
pub const PREFIX_SIZE: usize = 1;

/// Table header integers (fingerprint, count, id, entry size) are fixed 64-bit LE.
pub const FIXED_U64_SIZE: usize = 8;

/// Keys for the schema-name SipHash.
pub const TABLE_HASH_KEY0: u64 = 0xbaad_f00d_dead_beef;
pub const TABLE_HASH_KEY1: u64 = 0x0123_4567_89ab_cdef;

/// Byte emitted for padding inside bounded write regions.
pub const PADDING_BYTE: u8 = 0x00;
