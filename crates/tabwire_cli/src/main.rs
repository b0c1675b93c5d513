use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tabwire_core::{hash::schema_fingerprint, Deserializer, RawTable, StreamReader};

mod schema;
use schema::SchemaFile;

#[derive(Parser)]
#[command(name = "tabwire", about = "Inspect tabwire table streams")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the fingerprint of a schema name
    Fingerprint { name: String },

    /// Decode a table stream and list its entries
    Inspect {
        file: PathBuf,
        /// JSON schema used to check the fingerprint and name entries
        #[arg(long)]
        schema: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum EntryStatus {
    Active,
    Deleted,
    Unknown,
    Unchecked,
}

#[derive(Debug, Serialize)]
struct EntryReport {
    id: u64,
    name: Option<String>,
    status: EntryStatus,
    size: usize,
    data: String,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    fingerprint: String,
    schema: Option<String>,
    entries: Vec<EntryReport>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Fingerprint { name } => {
            println!("{:#018x}", schema_fingerprint(&name));
        }
        Cmd::Inspect { file, schema, json } => {
            let schema = schema.as_deref().map(SchemaFile::load).transpose()?;
            let report = inspect(&file, schema.as_ref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
    }
    Ok(())
}

fn inspect(path: &Path, schema: Option<&SchemaFile>) -> Result<InspectReport> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut d = Deserializer::new(StreamReader::new(BufReader::new(f)));
    let mut raw = RawTable::default();
    d.read(&mut raw)
        .with_context(|| format!("decoding table from {}", path.display()))?;
    debug!(entries = raw.entries.len(), fingerprint = raw.fingerprint, "table decoded");

    if let Some(s) = schema {
        if raw.fingerprint != s.fingerprint() {
            warn!(expected = s.fingerprint(), found = raw.fingerprint, "fingerprint mismatch");
            bail!(
                "table fingerprint {:#018x} does not match schema {:?} ({:#018x})",
                raw.fingerprint,
                s.name,
                s.fingerprint()
            );
        }
        info!(schema = %s.name, "fingerprint matches");
    }

    let entries = raw
        .entries
        .iter()
        .map(|e| {
            let (name, status) = match schema {
                None => (None, EntryStatus::Unchecked),
                Some(s) => match s.lookup(e.id) {
                    Some(se) if se.deleted => (Some(se.name.clone()), EntryStatus::Deleted),
                    Some(se) => (Some(se.name.clone()), EntryStatus::Active),
                    None => {
                        debug!(id = e.id, size = e.data.len(), "entry not in schema");
                        (None, EntryStatus::Unknown)
                    }
                },
            };
            EntryReport { id: e.id, name, status, size: e.data.len(), data: hex::encode(&e.data) }
        })
        .collect();

    Ok(InspectReport {
        fingerprint: format!("{:#018x}", raw.fingerprint),
        schema: schema.map(|s| s.name.clone()),
        entries,
    })
}

fn print_report(r: &InspectReport) {
    match &r.schema {
        Some(name) => println!("fingerprint {} (schema {name})", r.fingerprint),
        None => println!("fingerprint {}", r.fingerprint),
    }
    println!("entries {}", r.entries.len());
    for e in &r.entries {
        let label = match (&e.name, &e.status) {
            (Some(n), EntryStatus::Deleted) => format!("{n} (deleted)"),
            (Some(n), _) => n.clone(),
            (None, EntryStatus::Unknown) => "(unknown)".to_string(),
            (None, _) => "-".to_string(),
        };
        println!("  id={} {} size={} data={}", e.id, label, e.size, e.data);
    }
}
