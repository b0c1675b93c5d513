use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tabwire_core::hash::schema_fingerprint;

/// JSON description of a table schema:
/// `{ "name": "Profile", "entries": [ { "id": 0, "name": "a" }, { "id": 1, "name": "b", "deleted": true } ] }`
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaFile {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<SchemaEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaEntry {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
}

impl SchemaFile {
    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading schema {}", path.display()))?;
        let schema: SchemaFile = serde_json::from_str(&s)
            .with_context(|| format!("parsing schema {}", path.display()))?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for e in &self.entries {
            if !seen.insert(e.id) {
                bail!("schema {:?}: entry id {} declared twice", self.name, e.id);
            }
        }
        Ok(())
    }

    pub fn fingerprint(&self) -> u64 {
        schema_fingerprint(&self.name)
    }

    pub fn lookup(&self, id: u64) -> Option<&SchemaEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let s: SchemaFile = serde_json::from_str(
            r#"{"name":"T","entries":[{"id":1,"name":"a"},{"id":1,"name":"b","deleted":true}]}"#,
        )
        .unwrap();
        assert!(s.validate().is_err());
    }

    #[test]
    fn entries_default_to_active() {
        let s: SchemaFile =
            serde_json::from_str(r#"{"name":"T","entries":[{"id":4,"name":"x"}]}"#).unwrap();
        s.validate().unwrap();
        assert!(!s.lookup(4).unwrap().deleted);
        assert!(s.lookup(5).is_none());
        assert_eq!(s.fingerprint(), schema_fingerprint("T"));
    }
}
