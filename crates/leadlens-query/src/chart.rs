//! Chart aggregation: top groups of a filtered collection.

use serde::Serialize;

use leadlens_core::config::FacetConfig;
use leadlens_core::{EntityKind, FilterField};

use crate::engine::FilteredSnapshot;
use crate::grouping::ValueTally;

/// One bar or slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartDatum {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone)]
pub struct ChartHelper {
    top_n: usize,
    unknown_label: String,
}

impl ChartHelper {
    pub fn new(top_n: usize, unknown_label: impl Into<String>) -> Self {
        Self {
            top_n,
            unknown_label: unknown_label.into(),
        }
    }

    pub fn from_config(config: &FacetConfig) -> Self {
        Self::new(config.chart_top_n, config.unknown_label.clone())
    }

    /// Groups `items` by `selector`, blanks under the unknown label, and keeps
    /// the largest groups.
    pub fn top_groups<'a, T: 'a>(
        &'a self,
        items: impl IntoIterator<Item = &'a T>,
        selector: impl Fn(&'a T) -> Option<&'a str>,
    ) -> Vec<ChartDatum> {
        let mut tally = ValueTally::new();
        for item in items {
            let value = selector(item).filter(|v| !v.is_empty());
            tally.add(value.unwrap_or(self.unknown_label.as_str()));
        }

        tally
            .into_sorted()
            .into_iter()
            .take(self.top_n)
            .map(|(name, value)| ChartDatum {
                name: name.to_string(),
                value,
            })
            .collect()
    }

    /// Groups the filtered records of a facet field's entity by that field.
    pub fn by_field<'a>(
        &'a self,
        filtered: &'a FilteredSnapshot<'a>,
        field: FilterField,
    ) -> Vec<ChartDatum> {
        match field.entity() {
            EntityKind::Account => {
                self.top_groups(filtered.accounts.iter().copied(), |a| a.field(field))
            }
            EntityKind::Center => {
                self.top_groups(filtered.centers.iter().copied(), |c| c.field(field))
            }
            EntityKind::Function => {
                self.top_groups(filtered.functions.iter().copied(), |f| f.field(field))
            }
            EntityKind::Prospect => {
                self.top_groups(filtered.prospects.iter().copied(), |p| p.field(field))
            }
            EntityKind::Service => Vec::new(),
        }
    }
}

impl Default for ChartHelper {
    fn default() -> Self {
        Self::from_config(&FacetConfig::default())
    }
}
