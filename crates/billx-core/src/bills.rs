use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::BillDefinition;

#[derive(Debug, Error)]
pub enum BillStoreError {
    #[error("no bill named '{name}'")]
    NotFound { name: String },
    #[error("could not read or write the bill file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not encode the bill file: {0}")]
    Encode(serde_json::Error),
}

/// JSON file of saved bills, keyed by name.
///
/// The whole file is rewritten on every change, through a temp file and
/// rename so a crash mid-write cannot truncate it. A missing file is
/// created empty on first use, so `list` works out of the box.
pub struct BillStore {
    path: PathBuf,
}

impl BillStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<BTreeMap<String, BillDefinition>, BillStoreError> {
        if !self.path.exists() {
            self.save(&BTreeMap::new())?;
        }
        let raw = fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(|source| BillStoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, bills: &BTreeMap<String, BillDefinition>) -> Result<(), BillStoreError> {
        let encoded = serde_json::to_string_pretty(bills).map_err(BillStoreError::Encode)?;
        let staged = self.path.with_extension("tmp");
        fs::write(&staged, encoded)?;
        fs::rename(&staged, &self.path)?;
        Ok(())
    }

    /// Inserts or replaces the bill under its name.
    pub fn add(&self, bill: BillDefinition) -> Result<(), BillStoreError> {
        let mut bills = self.load()?;
        bills.insert(bill.name.clone(), bill);
        self.save(&bills)
    }

    pub fn get(&self, name: &str) -> Result<BillDefinition, BillStoreError> {
        let mut bills = self.load()?;
        bills.remove(name).ok_or_else(|| BillStoreError::NotFound {
            name: name.to_owned(),
        })
    }
}
