//! Shared state for leave-one-out counting.
//!
//! Evaluating the engine once per relaxed field would cost a full pass per
//! field. Instead every record's failure mask is computed once, together with
//! a few per-account and per-center flags that summarise the cross-entity
//! passes. A record survives the engine with field `F` relaxed iff its own
//! mask is a subset of `F`'s bit and the flags of its relatives hold, which
//! gives every facet and the revenue bounds in O(records × fields).
//!
//! The flags mirror the engine's passes:
//! - `function_ok[c]`: no function filter, or center `c` has a function that
//!   passes every function matcher
//! - `center_ok[a]`: account `a` owns a center passing every center matcher
//!   with `function_ok`
//! - `prospect_ok[a]`: no prospect filter, or account `a` has a prospect
//!   passing every prospect matcher
//!
//! Facet values are counted as the engine would return them with the field
//! narrowed to that single value; blank counts use the field fully relaxed.

use leadlens_core::{DataSnapshot, FilterField};

use crate::compiled::{field_bit, CompiledFilters};
use crate::relation::RelationIndex;

pub struct LeaveOneOut<'a> {
    snapshot: &'a DataSnapshot,
    index: &'a RelationIndex,
    filters: &'a CompiledFilters,

    account_masks: Vec<u32>,
    center_masks: Vec<u32>,
    function_masks: Vec<u32>,
    prospect_masks: Vec<u32>,

    function_ok: Vec<bool>,
    center_ok: Vec<bool>,
    prospect_ok: Vec<bool>,
}

impl<'a> LeaveOneOut<'a> {
    pub fn compute(
        snapshot: &'a DataSnapshot,
        index: &'a RelationIndex,
        filters: &'a CompiledFilters,
    ) -> Self {
        let account_masks: Vec<u32> = snapshot
            .accounts
            .iter()
            .enumerate()
            .map(|(pos, a)| filters.account_failures(a, index.revenue(pos as u32)))
            .collect();
        let center_masks: Vec<u32> = snapshot
            .centers
            .iter()
            .map(|c| filters.center_failures(c))
            .collect();
        let function_masks: Vec<u32> = snapshot
            .functions
            .iter()
            .map(|f| filters.function_failures(f))
            .collect();
        let prospect_masks: Vec<u32> = snapshot
            .prospects
            .iter()
            .map(|p| filters.prospect_failures(p))
            .collect();

        let function_active = filters.function_active();
        let function_ok: Vec<bool> = (0..snapshot.centers.len() as u32)
            .map(|c| {
                !function_active
                    || index
                        .functions_of(c)
                        .iter()
                        .any(|f| function_masks[*f as usize] == 0)
            })
            .collect();

        let prospect_active = filters.prospect_active();
        let (center_ok, prospect_ok): (Vec<bool>, Vec<bool>) = (0..snapshot.accounts.len() as u32)
            .map(|a| {
                let center_ok = index
                    .centers_of(a)
                    .iter()
                    .any(|c| center_masks[*c as usize] == 0 && function_ok[*c as usize]);
                let prospect_ok = !prospect_active
                    || index
                        .prospects_of(a)
                        .iter()
                        .any(|p| prospect_masks[*p as usize] == 0);
                (center_ok, prospect_ok)
            })
            .unzip();

        Self {
            snapshot,
            index,
            filters,
            account_masks,
            center_masks,
            function_masks,
            prospect_masks,
            function_ok,
            center_ok,
            prospect_ok,
        }
    }

    pub fn snapshot(&self) -> &'a DataSnapshot {
        self.snapshot
    }

    pub fn index(&self) -> &'a RelationIndex {
        self.index
    }

    /// Whether account `a` survives with the filters behind `relaxed` lifted.
    ///
    /// `relaxed` may only name account-level bits.
    pub fn account_survives_without(&self, a: u32, relaxed: u32) -> bool {
        let a = a as usize;
        self.account_masks[a] & !relaxed == 0
            && self.prospect_ok[a]
            && (!self.filters.closure_active() || self.center_ok[a])
    }

    /// Whether center `c` survives with the center filters behind `relaxed`
    /// lifted.
    pub fn center_survives_without(&self, c: u32, relaxed: u32) -> bool {
        let Some(a) = self.index.center_account(c) else {
            return false;
        };
        self.account_masks[a as usize] == 0
            && self.prospect_ok[a as usize]
            && self.center_masks[c as usize] & !relaxed == 0
            && self.function_ok[c as usize]
    }

    /// Whether function `f` survives with the function filter lifted.
    pub fn function_survives_relaxed(&self, f: u32) -> bool {
        let Some(c) = self.index.function_center(f) else {
            return false;
        };
        let Some(a) = self.index.center_account(c) else {
            return false;
        };
        self.account_masks[a as usize] == 0
            && self.prospect_ok[a as usize]
            && self.center_masks[c as usize] == 0
    }

    /// Whether prospect `p` survives with prospect field `field` relaxed.
    pub fn prospect_survives_without(&self, p: u32, field: FilterField) -> bool {
        self.prospect_survives(p, field, self.filters.closure_active_without(Some(field)))
    }

    /// Whether prospect `p` survives once `field` is narrowed to exactly the
    /// prospect's own value. Any prospect selection turns the final closure
    /// on, so the account must keep a center.
    pub fn prospect_survives_selecting(&self, p: u32, field: FilterField) -> bool {
        self.prospect_survives(p, field, true)
    }

    fn prospect_survives(&self, p: u32, field: FilterField, closure: bool) -> bool {
        let Some(a) = self.index.prospect_account(p) else {
            return false;
        };
        self.account_masks[a as usize] == 0
            && self.prospect_masks[p as usize] & !field_bit(field) == 0
            && (!closure || self.center_ok[a as usize])
    }

    /// Function mask of a record; exposed for diagnostics and tests.
    pub fn function_mask(&self, f: u32) -> u32 {
        self.function_masks[f as usize]
    }
}
