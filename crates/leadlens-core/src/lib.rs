//! Core domain types for the LeadLens faceted filtering engine.

pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod ids;
pub mod metrics;
pub mod revenue;
pub mod saved;
pub mod snapshot;

pub use config::LeadlensConfig;
pub use entity::{Account, Center, EntityKind, Function, Prospect, Service};
pub use error::{CoreError, CoreResult};
pub use filter::{FilterField, FilterMode, FilterSpec, FilterValue, KeywordField};
pub use ids::{AccountKey, CenterKey};
pub use revenue::{CurrencyRevenueParser, RawRevenue, RevenueParser, RevenueRange};
pub use saved::{MemorySavedFilterStore, SavedFilterSet, SavedFilterStore};
pub use snapshot::{DataSnapshot, JsonFileSource, SnapshotSource};
