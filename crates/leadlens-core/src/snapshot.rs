use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entity::{Account, Center, EntityKind, Function, Prospect, Service};
use crate::error::CoreResult;

/// Read-only view of the five entity collections used for one computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSnapshot {
    pub accounts: Vec<Account>,
    pub centers: Vec<Center>,
    pub functions: Vec<Function>,
    pub services: Vec<Service>,
    pub prospects: Vec<Prospect>,
}

impl DataSnapshot {
    /// Number of records of one entity type.
    #[must_use]
    pub fn len_of(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Account => self.accounts.len(),
            EntityKind::Center => self.centers.len(),
            EntityKind::Function => self.functions.len(),
            EntityKind::Service => self.services.len(),
            EntityKind::Prospect => self.prospects.len(),
        }
    }

    /// Parses a snapshot from a JSON document.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Supplier of already-fetched, normalised collections.
///
/// Retrying and caching the fetch belong to the implementation, not to the
/// engine.
pub trait SnapshotSource: Send + Sync {
    fn load(&self) -> CoreResult<DataSnapshot>;
}

/// Reads a snapshot from a JSON file with one array per collection.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for JsonFileSource {
    fn load(&self) -> CoreResult<DataSnapshot> {
        debug!(path = %self.path.display(), "Reading snapshot");
        let reader = BufReader::new(File::open(&self.path)?);
        let snapshot: DataSnapshot = serde_json::from_reader(reader)?;

        info!(
            accounts = snapshot.accounts.len(),
            centers = snapshot.centers.len(),
            functions = snapshot.functions.len(),
            services = snapshot.services.len(),
            prospects = snapshot.prospects.len(),
            "Snapshot loaded"
        );

        Ok(snapshot)
    }
}
