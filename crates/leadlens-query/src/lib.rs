//! Cross-entity faceted filtering for LeadLens.
//!
//! Given a [`leadlens_core::DataSnapshot`] and a [`leadlens_core::FilterSpec`],
//! this crate computes the consistent subset of every entity type, the
//! leave-one-out option counts of every facet field, and the revenue slider
//! bounds. [`Dashboard`] runs all of it in one call.

pub mod chart;
pub mod compiled;
pub mod dashboard;
pub mod engine;
pub mod facets;
pub mod grouping;
pub mod leave_one_out;
pub mod matcher;
pub mod matcher_cache;
pub mod profiler;
pub mod range;
pub mod relation;

pub use chart::{ChartDatum, ChartHelper};
pub use compiled::{CompiledFilters, RevenuePredicate, SearchMatcher};
pub use dashboard::{Dashboard, EntityCount, Recomputation, SummaryCounts};
pub use engine::{CrossEntityFilter, FilterSelection, FilteredSnapshot};
pub use facets::{FacetCounter, FacetCounts, FacetOption, FacetOptions};
pub use grouping::ValueTally;
pub use leave_one_out::LeaveOneOut;
pub use matcher::{KeywordMatcher, ValueMatcher};
pub use matcher_cache::MatcherCache;
pub use profiler::{ProfileStage, RecomputeProfile};
pub use range::{RangeMode, RangeResolver, RangeState};
pub use relation::RelationIndex;
