//! Recompute orchestrator.
//!
//! One [`Dashboard::recompute`] call runs compile, filter, facets and range
//! resolution over a snapshot and returns everything the presentation layer
//! needs for one render.

use std::time::Instant;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, span, Level};

use leadlens_core::{
    CoreError, CoreResult, DataSnapshot, EntityKind, FilterField, FilterSpec, LeadlensConfig,
    RevenueRange, SavedFilterStore,
};

use crate::chart::{ChartDatum, ChartHelper};
use crate::compiled::CompiledFilters;
use crate::engine::{CrossEntityFilter, FilterSelection, FilteredSnapshot};
use crate::facets::{FacetCounter, FacetCounts};
use crate::leave_one_out::LeaveOneOut;
use crate::matcher_cache::MatcherCache;
use crate::profiler::RecomputeProfile;
use crate::range::{RangeResolver, RangeState};
use crate::relation::RelationIndex;

/// Filtered and total record counts of one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EntityCount {
    pub filtered: usize,
    pub total: usize,
}

/// Counts shown on the summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SummaryCounts {
    pub accounts: EntityCount,
    pub centers: EntityCount,
    pub functions: EntityCount,
    pub services: EntityCount,
    pub prospects: EntityCount,
}

impl SummaryCounts {
    pub fn new(selection: &FilterSelection, snapshot: &DataSnapshot) -> Self {
        let count = |kind| EntityCount {
            filtered: selection.len_of(kind),
            total: snapshot.len_of(kind),
        };
        Self {
            accounts: count(EntityKind::Account),
            centers: count(EntityKind::Center),
            functions: count(EntityKind::Function),
            services: count(EntityKind::Service),
            prospects: count(EntityKind::Prospect),
        }
    }

    pub fn get(&self, kind: EntityKind) -> EntityCount {
        match kind {
            EntityKind::Account => self.accounts,
            EntityKind::Center => self.centers,
            EntityKind::Function => self.functions,
            EntityKind::Service => self.services,
            EntityKind::Prospect => self.prospects,
        }
    }
}

/// Output of one recomputation.
#[derive(Debug, Clone, Serialize)]
pub struct Recomputation {
    #[serde(skip)]
    pub selection: FilterSelection,
    pub facets: FacetCounts,
    pub revenue_bounds: RevenueRange,
    pub summary: SummaryCounts,
    pub profile: RecomputeProfile,
}

impl Recomputation {
    pub fn materialize<'a>(&self, snapshot: &'a DataSnapshot) -> FilteredSnapshot<'a> {
        self.selection.materialize(snapshot)
    }
}

/// Owns the matcher cache and configuration shared by recomputations.
pub struct Dashboard {
    config: LeadlensConfig,
    cache: MatcherCache,
    ranges: RangeResolver,
    charts: ChartHelper,
}

impl Dashboard {
    pub fn new(config: LeadlensConfig) -> Self {
        Self {
            cache: MatcherCache::from_config(&config.engine),
            ranges: RangeResolver::from_config(&config.revenue),
            charts: ChartHelper::from_config(&config.facets),
            config,
        }
    }

    pub fn config(&self) -> &LeadlensConfig {
        &self.config
    }

    pub fn cache(&self) -> &MatcherCache {
        &self.cache
    }

    /// Filters only, without facets or bounds.
    pub fn filter(
        &self,
        snapshot: &DataSnapshot,
        index: &RelationIndex,
        spec: &FilterSpec,
    ) -> CoreResult<FilterSelection> {
        check_index(snapshot, index)?;
        let filters = CompiledFilters::compile(spec, &self.cache);
        Ok(CrossEntityFilter::new(snapshot, index).apply(&filters))
    }

    /// Runs a full recomputation.
    pub fn recompute(
        &self,
        snapshot: &DataSnapshot,
        index: &RelationIndex,
        spec: &FilterSpec,
    ) -> CoreResult<Recomputation> {
        check_index(snapshot, index)?;

        let active_filters = spec.active_filter_count();
        let _span = span!(Level::DEBUG, "recompute", active_filters).entered();
        let mut profile = RecomputeProfile::new(active_filters);

        let start = Instant::now();
        let filters = CompiledFilters::compile(spec, &self.cache);
        profile.record_stage("compile", start.elapsed(), json!({ "fields": FilterField::COUNT }));

        let start = Instant::now();
        let selection = CrossEntityFilter::new(snapshot, index).apply(&filters);
        profile.record_stage(
            "filter",
            start.elapsed(),
            json!({
                "accounts": selection.len_of(EntityKind::Account),
                "centers": selection.len_of(EntityKind::Center),
                "prospects": selection.len_of(EntityKind::Prospect),
            }),
        );

        let start = Instant::now();
        let loo = LeaveOneOut::compute(snapshot, index, &filters);
        let facets = FacetCounter::count(&loo);
        profile.record_stage("facets", start.elapsed(), json!({}));

        let start = Instant::now();
        let revenue_bounds = self.ranges.bounds(&loo);
        profile.record_stage(
            "range",
            start.elapsed(),
            json!({ "min": revenue_bounds.min, "max": revenue_bounds.max }),
        );

        let summary = SummaryCounts::new(&selection, snapshot);
        debug!(
            accounts = summary.accounts.filtered,
            centers = summary.centers.filtered,
            functions = summary.functions.filtered,
            services = summary.services.filtered,
            prospects = summary.prospects.filtered,
            "Selection computed"
        );

        let profile = profile.finish(self.config.engine.slow_recompute_threshold());

        Ok(Recomputation {
            selection,
            facets,
            revenue_bounds,
            summary,
            profile,
        })
    }

    /// Top groups of a facet field over filtered records.
    pub fn chart(&self, filtered: &FilteredSnapshot<'_>, field: FilterField) -> Vec<ChartDatum> {
        self.charts.by_field(filtered, field)
    }

    /// Loads a saved filter set by name and hands the range slider back to
    /// automatic tracking.
    pub fn load_saved(
        &self,
        store: &dyn SavedFilterStore,
        name: &str,
        range: &mut RangeState,
        bounds: RevenueRange,
    ) -> CoreResult<FilterSpec> {
        let saved = store
            .get_by_name(name)?
            .ok_or_else(|| CoreError::not_found("saved filter set", name))?;

        range.load_saved(saved.filters.account_revenue_range, bounds);
        debug!(name = %saved.name, "Saved filter set loaded");
        Ok(saved.filters)
    }

    /// Clears the filters and the range selection.
    pub fn reset(&self, spec: &mut FilterSpec, range: &mut RangeState, bounds: RevenueRange) {
        spec.reset();
        range.reset(bounds);
        self.cache.clear();
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(LeadlensConfig::default())
    }
}

fn check_index(snapshot: &DataSnapshot, index: &RelationIndex) -> CoreResult<()> {
    if index.matches_snapshot(snapshot) {
        Ok(())
    } else {
        Err(CoreError::validation(
            "relation index was built from a different snapshot",
        ))
    }
}
