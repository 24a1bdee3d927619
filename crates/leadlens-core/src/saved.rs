//! Saved filter sets.
//!
//! Persistence lives outside the engine; this module only defines the stored
//! shape, the store interface and an in-memory store.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::filter::FilterSpec;

/// A named filter specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFilterSet {
    pub id: Uuid,
    pub name: String,
    pub filters: FilterSpec,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedFilterSet {
    /// Creates a new set; the name is trimmed and must not be empty.
    pub fn new(name: &str, filters: FilterSpec) -> CoreResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("filter set name must not be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            filters,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Interface of the external saved-filter store, keyed by name.
pub trait SavedFilterStore: Send + Sync {
    /// Returns every saved set ordered by creation time.
    fn list(&self) -> CoreResult<Vec<SavedFilterSet>>;

    fn get_by_name(&self, name: &str) -> CoreResult<Option<SavedFilterSet>>;

    /// Creates a set, or overwrites the filters of the set with the same name.
    fn save(&self, name: &str, filters: FilterSpec) -> CoreResult<SavedFilterSet>;

    fn delete(&self, id: Uuid) -> CoreResult<()>;
}

/// In-process store used by tests and the explorer CLI.
#[derive(Debug, Default)]
pub struct MemorySavedFilterStore {
    sets: RwLock<Vec<SavedFilterSet>>,
}

impl MemorySavedFilterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SavedFilterStore for MemorySavedFilterStore {
    fn list(&self) -> CoreResult<Vec<SavedFilterSet>> {
        Ok(self.sets.read().clone())
    }

    fn get_by_name(&self, name: &str) -> CoreResult<Option<SavedFilterSet>> {
        let name = name.trim();
        Ok(self.sets.read().iter().find(|s| s.name == name).cloned())
    }

    fn save(&self, name: &str, filters: FilterSpec) -> CoreResult<SavedFilterSet> {
        let candidate = SavedFilterSet::new(name, filters)?;
        let mut sets = self.sets.write();

        if let Some(existing) = sets.iter_mut().find(|s| s.name == candidate.name) {
            existing.filters = candidate.filters;
            existing.updated_at = candidate.updated_at;
            debug!(name = %existing.name, "Saved filter set overwritten");
            return Ok(existing.clone());
        }

        debug!(name = %candidate.name, "Saved filter set created");
        sets.push(candidate.clone());
        Ok(candidate)
    }

    fn delete(&self, id: Uuid) -> CoreResult<()> {
        let mut sets = self.sets.write();
        let before = sets.len();
        sets.retain(|s| s.id != id);

        if sets.len() == before {
            return Err(CoreError::not_found("saved filter set", id.to_string()));
        }
        Ok(())
    }
}
