//! Relation index over a snapshot.
//!
//! Records are addressed by their position in the snapshot's collections. The
//! index resolves every foreign key once (parent positions) and keeps the
//! reverse adjacency (children positions) so joins in the engine and the facet
//! counter are plain vector lookups. Parsed revenues are cached here too since
//! they depend only on the snapshot.

use std::collections::HashMap;

use tracing::debug;

use leadlens_core::{AccountKey, CenterKey, DataSnapshot, RevenueParser};

/// Parent/child positions of one snapshot.
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    account_positions: HashMap<AccountKey, u32>,
    center_positions: HashMap<CenterKey, u32>,

    center_account: Vec<Option<u32>>,
    function_center: Vec<Option<u32>>,
    service_center: Vec<Option<u32>>,
    prospect_account: Vec<Option<u32>>,

    account_centers: Vec<Vec<u32>>,
    account_prospects: Vec<Vec<u32>>,
    center_functions: Vec<Vec<u32>>,
    center_services: Vec<Vec<u32>>,

    revenues: Vec<f64>,
    orphans: usize,
}

impl RelationIndex {
    /// Builds the index in O(records).
    ///
    /// Unresolved references are recorded as `None` and counted as orphans.
    /// Duplicate keys keep the first record's position.
    pub fn build(snapshot: &DataSnapshot, parser: &dyn RevenueParser) -> Self {
        let mut account_positions = HashMap::with_capacity(snapshot.accounts.len());
        for (pos, account) in snapshot.accounts.iter().enumerate() {
            account_positions
                .entry(account.key.clone())
                .or_insert(pos as u32);
        }

        let mut center_positions = HashMap::with_capacity(snapshot.centers.len());
        for (pos, center) in snapshot.centers.iter().enumerate() {
            center_positions.entry(center.key.clone()).or_insert(pos as u32);
        }

        let center_account: Vec<Option<u32>> = snapshot
            .centers
            .iter()
            .map(|c| account_positions.get(&c.account).copied())
            .collect();
        let function_center: Vec<Option<u32>> = snapshot
            .functions
            .iter()
            .map(|f| center_positions.get(&f.center).copied())
            .collect();
        let service_center: Vec<Option<u32>> = snapshot
            .services
            .iter()
            .map(|s| center_positions.get(&s.center).copied())
            .collect();
        let prospect_account: Vec<Option<u32>> = snapshot
            .prospects
            .iter()
            .map(|p| account_positions.get(&p.account).copied())
            .collect();

        let account_centers = children(&center_account, snapshot.accounts.len());
        let account_prospects = children(&prospect_account, snapshot.accounts.len());
        let center_functions = children(&function_center, snapshot.centers.len());
        let center_services = children(&service_center, snapshot.centers.len());

        let revenues = snapshot
            .accounts
            .iter()
            .map(|a| parser.parse(a.revenue.as_ref()))
            .collect();

        let orphans = [
            &center_account,
            &function_center,
            &service_center,
            &prospect_account,
        ]
        .iter()
        .map(|parents| parents.iter().filter(|p| p.is_none()).count())
        .sum();

        let duplicates = (snapshot.accounts.len() - account_positions.len())
            + (snapshot.centers.len() - center_positions.len());

        if orphans > 0 || duplicates > 0 {
            debug!(orphans, duplicates, "Snapshot is not referentially intact");
        }

        Self {
            account_positions,
            center_positions,
            center_account,
            function_center,
            service_center,
            prospect_account,
            account_centers,
            account_prospects,
            center_functions,
            center_services,
            revenues,
            orphans,
        }
    }

    pub fn account_position(&self, key: &str) -> Option<u32> {
        self.account_positions.get(key).copied()
    }

    pub fn center_position(&self, key: &str) -> Option<u32> {
        self.center_positions.get(key).copied()
    }

    #[inline]
    pub fn center_account(&self, center: u32) -> Option<u32> {
        self.center_account[center as usize]
    }

    #[inline]
    pub fn function_center(&self, function: u32) -> Option<u32> {
        self.function_center[function as usize]
    }

    #[inline]
    pub fn service_center(&self, service: u32) -> Option<u32> {
        self.service_center[service as usize]
    }

    #[inline]
    pub fn prospect_account(&self, prospect: u32) -> Option<u32> {
        self.prospect_account[prospect as usize]
    }

    pub fn centers_of(&self, account: u32) -> &[u32] {
        &self.account_centers[account as usize]
    }

    pub fn prospects_of(&self, account: u32) -> &[u32] {
        &self.account_prospects[account as usize]
    }

    pub fn functions_of(&self, center: u32) -> &[u32] {
        &self.center_functions[center as usize]
    }

    pub fn services_of(&self, center: u32) -> &[u32] {
        &self.center_services[center as usize]
    }

    /// Parsed revenue of an account, `0.0` when absent.
    #[inline]
    pub fn revenue(&self, account: u32) -> f64 {
        self.revenues[account as usize]
    }

    /// Number of child records whose parent did not resolve.
    pub fn orphan_count(&self) -> usize {
        self.orphans
    }

    pub fn account_count(&self) -> usize {
        self.revenues.len()
    }

    pub fn center_count(&self) -> usize {
        self.center_account.len()
    }

    pub fn function_count(&self) -> usize {
        self.function_center.len()
    }

    pub fn service_count(&self) -> usize {
        self.service_center.len()
    }

    pub fn prospect_count(&self) -> usize {
        self.prospect_account.len()
    }

    /// Whether the index was built from a snapshot of this shape.
    pub fn matches_snapshot(&self, snapshot: &DataSnapshot) -> bool {
        self.account_count() == snapshot.accounts.len()
            && self.center_count() == snapshot.centers.len()
            && self.function_count() == snapshot.functions.len()
            && self.service_count() == snapshot.services.len()
            && self.prospect_count() == snapshot.prospects.len()
    }
}

fn children(parents: &[Option<u32>], parent_count: usize) -> Vec<Vec<u32>> {
    let mut out = vec![Vec::new(); parent_count];
    for (pos, parent) in parents.iter().enumerate() {
        if let Some(parent) = parent {
            out[*parent as usize].push(pos as u32);
        }
    }
    out
}
