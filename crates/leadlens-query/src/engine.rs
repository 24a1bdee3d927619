//! Cross-entity filter engine
//!
//! Computes the records of every entity type that are consistent with all
//! active filters at once. Filters on one entity type narrow the related
//! types through the relation index in a fixed sequence of passes:
//!
//! 1. accounts on their own matchers (categorical, revenue, name, search)
//! 2. centers on their matchers, owned by a surviving account
//! 3. functions of surviving centers; an active function filter shrinks
//!    centers to those keeping a function
//! 4. prospects of surviving accounts on their matchers
//! 5. an active prospect filter shrinks accounts to those referenced by a
//!    surviving prospect, then centers and functions follow
//! 6. services of surviving centers
//! 7. an active center, function or prospect filter shrinks accounts to those
//!    referenced by a surviving center, then prospects follow
//!
//! There is no fixpoint loop. Orphaned child records never survive.

use roaring::RoaringBitmap;
use tracing::debug;

use leadlens_core::{Account, Center, DataSnapshot, EntityKind, Function, Prospect, Service};

use crate::compiled::CompiledFilters;
use crate::relation::RelationIndex;

/// Surviving record positions per entity type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub accounts: RoaringBitmap,
    pub centers: RoaringBitmap,
    pub functions: RoaringBitmap,
    pub services: RoaringBitmap,
    pub prospects: RoaringBitmap,
}

impl FilterSelection {
    pub fn bitmap(&self, kind: EntityKind) -> &RoaringBitmap {
        match kind {
            EntityKind::Account => &self.accounts,
            EntityKind::Center => &self.centers,
            EntityKind::Function => &self.functions,
            EntityKind::Service => &self.services,
            EntityKind::Prospect => &self.prospects,
        }
    }

    /// Number of surviving records of one type.
    pub fn len_of(&self, kind: EntityKind) -> usize {
        self.bitmap(kind).len() as usize
    }

    /// Resolves positions into record references, in snapshot order.
    pub fn materialize<'a>(&self, snapshot: &'a DataSnapshot) -> FilteredSnapshot<'a> {
        FilteredSnapshot {
            accounts: pick(&snapshot.accounts, &self.accounts),
            centers: pick(&snapshot.centers, &self.centers),
            functions: pick(&snapshot.functions, &self.functions),
            services: pick(&snapshot.services, &self.services),
            prospects: pick(&snapshot.prospects, &self.prospects),
        }
    }
}

fn pick<'a, T>(records: &'a [T], positions: &RoaringBitmap) -> Vec<&'a T> {
    positions
        .iter()
        .filter_map(|pos| records.get(pos as usize))
        .collect()
}

/// The five filtered collections, borrowing from the snapshot.
#[derive(Debug, Clone, Default)]
pub struct FilteredSnapshot<'a> {
    pub accounts: Vec<&'a Account>,
    pub centers: Vec<&'a Center>,
    pub functions: Vec<&'a Function>,
    pub services: Vec<&'a Service>,
    pub prospects: Vec<&'a Prospect>,
}

/// Engine bound to one snapshot and its relation index.
pub struct CrossEntityFilter<'a> {
    snapshot: &'a DataSnapshot,
    index: &'a RelationIndex,
}

impl<'a> CrossEntityFilter<'a> {
    pub fn new(snapshot: &'a DataSnapshot, index: &'a RelationIndex) -> Self {
        debug_assert!(index.matches_snapshot(snapshot));
        Self { snapshot, index }
    }

    /// Runs every pass for one compiled filter set.
    pub fn apply(&self, filters: &CompiledFilters) -> FilterSelection {
        let snapshot = self.snapshot;
        let index = self.index;

        // 1. Accounts
        let mut accounts: RoaringBitmap = snapshot
            .accounts
            .iter()
            .enumerate()
            .filter(|(pos, account)| {
                filters.account_failures(account, index.revenue(*pos as u32)) == 0
            })
            .map(|(pos, _)| pos as u32)
            .collect();
        debug!(accounts = accounts.len(), "Account pass");

        // 2. Centers
        let mut centers: RoaringBitmap = snapshot
            .centers
            .iter()
            .enumerate()
            .filter(|(pos, center)| {
                index
                    .center_account(*pos as u32)
                    .is_some_and(|a| accounts.contains(a))
                    && filters.center_failures(center) == 0
            })
            .map(|(pos, _)| pos as u32)
            .collect();

        // 3. Functions
        let mut functions = self.functions_of(&centers, filters);
        if filters.function_active() {
            let with_function: RoaringBitmap = functions
                .iter()
                .filter_map(|f| index.function_center(f))
                .collect();
            centers &= with_function;
        }
        debug!(
            centers = centers.len(),
            functions = functions.len(),
            "Center and function pass"
        );

        // 4. Prospects
        let mut prospects: RoaringBitmap = snapshot
            .prospects
            .iter()
            .enumerate()
            .filter(|(pos, prospect)| {
                index
                    .prospect_account(*pos as u32)
                    .is_some_and(|a| accounts.contains(a))
                    && filters.prospect_failures(prospect) == 0
            })
            .map(|(pos, _)| pos as u32)
            .collect();
        debug!(prospects = prospects.len(), "Prospect pass");

        // 5. Prospect closure
        if filters.prospect_active() {
            let referenced: RoaringBitmap = prospects
                .iter()
                .filter_map(|p| index.prospect_account(p))
                .collect();
            accounts &= referenced;
            centers = self.centers_owned_by(&centers, &accounts);
            functions = self.children_of_centers(&functions, &centers);
            debug!(accounts = accounts.len(), "Prospect closure");
        }

        // 6. Services
        let services: RoaringBitmap = (0..index.service_count() as u32)
            .filter(|s| {
                index
                    .service_center(*s)
                    .is_some_and(|c| centers.contains(c))
            })
            .collect();

        // 7. Final closure
        if filters.closure_active() {
            let referenced: RoaringBitmap = centers
                .iter()
                .filter_map(|c| index.center_account(c))
                .collect();
            accounts &= referenced;
            prospects = prospects
                .iter()
                .filter(|p| {
                    index
                        .prospect_account(*p)
                        .is_some_and(|a| accounts.contains(a))
                })
                .collect();
            debug!(accounts = accounts.len(), "Final closure");
        }

        FilterSelection {
            accounts,
            centers,
            functions,
            services,
            prospects,
        }
    }

    fn functions_of(&self, centers: &RoaringBitmap, filters: &CompiledFilters) -> RoaringBitmap {
        self.snapshot
            .functions
            .iter()
            .enumerate()
            .filter(|(pos, function)| {
                self.index
                    .function_center(*pos as u32)
                    .is_some_and(|c| centers.contains(c))
                    && filters.function_failures(function) == 0
            })
            .map(|(pos, _)| pos as u32)
            .collect()
    }

    fn centers_owned_by(
        &self,
        centers: &RoaringBitmap,
        accounts: &RoaringBitmap,
    ) -> RoaringBitmap {
        centers
            .iter()
            .filter(|c| {
                self.index
                    .center_account(*c)
                    .is_some_and(|a| accounts.contains(a))
            })
            .collect()
    }

    fn children_of_centers(
        &self,
        functions: &RoaringBitmap,
        centers: &RoaringBitmap,
    ) -> RoaringBitmap {
        functions
            .iter()
            .filter(|f| {
                self.index
                    .function_center(*f)
                    .is_some_and(|c| centers.contains(c))
            })
            .collect()
    }
}
