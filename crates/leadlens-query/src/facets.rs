//! Facet option counter.
//!
//! For each facet field, the values a user could pick next and how many
//! records of the field's entity would remain if that field's filter selected
//! exactly that value, every other filter held fixed. Blank values are counted
//! with the field's filter lifted, so the caller can decide whether to offer
//! an "include blanks" toggle.

use std::collections::BTreeMap;

use serde::Serialize;

use leadlens_core::{EntityKind, FilterField};

use crate::compiled::field_bit;
use crate::grouping::ValueTally;
use crate::leave_one_out::LeaveOneOut;

/// One selectable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub value: String,
    pub count: usize,
}

/// Options of one facet field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    /// Sorted by count descending, ties in snapshot order.
    pub options: Vec<FacetOption>,
    pub blank_count: usize,
}

impl FacetOptions {
    pub fn count_of(&self, value: &str) -> usize {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map_or(0, |o| o.count)
    }

    /// Whether an "include blanks" toggle is worth showing.
    pub fn has_blanks(&self) -> bool {
        self.blank_count > 0
    }
}

/// Options of every facet field, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FacetCounts {
    fields: BTreeMap<FilterField, FacetOptions>,
}

impl FacetCounts {
    pub fn get(&self, field: FilterField) -> Option<&FacetOptions> {
        self.fields.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterField, &FacetOptions)> {
        self.fields.iter().map(|(field, options)| (*field, options))
    }
}

/// Computes [`FacetCounts`] from shared leave-one-out state.
pub struct FacetCounter;

impl FacetCounter {
    pub fn count(loo: &LeaveOneOut<'_>) -> FacetCounts {
        let fields = FilterField::ALL
            .into_iter()
            .map(|field| (field, Self::count_field(loo, field)))
            .collect();
        FacetCounts { fields }
    }

    /// Options of a single field.
    pub fn count_field(loo: &LeaveOneOut<'_>, field: FilterField) -> FacetOptions {
        let snapshot = loo.snapshot();
        let bit = field_bit(field);

        match field.entity() {
            EntityKind::Account => tally(
                snapshot
                    .accounts
                    .iter()
                    .enumerate()
                    .filter(|(pos, _)| loo.account_survives_without(*pos as u32, bit))
                    .map(|(_, a)| a.field(field)),
            ),
            EntityKind::Center => tally(
                snapshot
                    .centers
                    .iter()
                    .enumerate()
                    .filter(|(pos, _)| loo.center_survives_without(*pos as u32, bit))
                    .map(|(_, c)| c.field(field)),
            ),
            EntityKind::Function => tally(
                snapshot
                    .functions
                    .iter()
                    .enumerate()
                    .filter(|(pos, _)| loo.function_survives_relaxed(*pos as u32))
                    .map(|(_, f)| f.field(field)),
            ),
            // A selected prospect value enables the final closure, while a
            // blank is counted with the field relaxed.
            EntityKind::Prospect => tally(
                snapshot
                    .prospects
                    .iter()
                    .enumerate()
                    .filter_map(|(pos, p)| {
                        let pos = pos as u32;
                        let value = p.field(field);
                        let survives = match value {
                            Some(_) => loo.prospect_survives_selecting(pos, field),
                            None => loo.prospect_survives_without(pos, field),
                        };
                        survives.then_some(value)
                    }),
            ),
            EntityKind::Service => FacetOptions::default(),
        }
    }
}

fn tally<'a>(values: impl Iterator<Item = Option<&'a str>>) -> FacetOptions {
    let mut tally = ValueTally::new();
    let mut blank_count = 0;

    for value in values {
        match value {
            Some(value) => tally.add(value),
            None => blank_count += 1,
        }
    }

    FacetOptions {
        options: tally
            .into_sorted()
            .into_iter()
            .map(|(value, count)| FacetOption {
                value: value.to_string(),
                count,
            })
            .collect(),
        blank_count,
    }
}
