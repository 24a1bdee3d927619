//! Filter specification shared by the UI layer, the saved-filter store and
//! the engine.
//!
//! The serialised shape (camelCase keys, one list per facet field) is the
//! same shape saved filter sets are stored in, so filters produced by the UI
//! can be persisted and reloaded without translation.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::EntityKind;
use crate::revenue::RevenueRange;

/// Whether a filter value requires or forbids a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Include,
    Exclude,
}

/// One selected value of a field filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FilterValue {
    pub value: String,
    pub mode: FilterMode,
}

impl FilterValue {
    #[must_use]
    pub fn include(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            mode: FilterMode::Include,
        }
    }

    #[must_use]
    pub fn exclude(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            mode: FilterMode::Exclude,
        }
    }
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Older saved sets stored bare strings, which always meant "include".
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Legacy(String),
            Full {
                value: String,
                #[serde(default)]
                mode: FilterMode,
            },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Legacy(value) => FilterValue::include(value),
            Repr::Full { value, mode } => FilterValue { value, mode },
        })
    }
}

/// Every categorical field that is exposed as a facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilterField {
    #[serde(rename = "accountCountries")]
    AccountCountry,
    #[serde(rename = "accountRegions")]
    AccountRegion,
    #[serde(rename = "accountIndustries")]
    AccountIndustry,
    #[serde(rename = "accountSubIndustries")]
    AccountSubIndustry,
    #[serde(rename = "accountPrimaryCategories")]
    AccountPrimaryCategory,
    #[serde(rename = "accountPrimaryNatures")]
    AccountPrimaryNature,
    #[serde(rename = "accountNasscomStatuses")]
    AccountNasscomStatus,
    #[serde(rename = "accountEmployeesRanges")]
    AccountEmployeesRange,
    #[serde(rename = "accountCenterEmployees")]
    AccountCenterEmployees,
    #[serde(rename = "centerTypes")]
    CenterType,
    #[serde(rename = "centerFocus")]
    CenterFocus,
    #[serde(rename = "centerCities")]
    CenterCity,
    #[serde(rename = "centerStates")]
    CenterState,
    #[serde(rename = "centerCountries")]
    CenterCountry,
    #[serde(rename = "centerEmployees")]
    CenterEmployees,
    #[serde(rename = "centerStatuses")]
    CenterStatus,
    #[serde(rename = "functionTypes")]
    FunctionType,
    #[serde(rename = "prospectDepartments")]
    ProspectDepartment,
    #[serde(rename = "prospectLevels")]
    ProspectLevel,
    #[serde(rename = "prospectCities")]
    ProspectCity,
}

impl FilterField {
    /// Number of facet fields.
    pub const COUNT: usize = 20;

    /// All facet fields, grouped by entity in pipeline order.
    pub const ALL: [FilterField; Self::COUNT] = [
        Self::AccountCountry,
        Self::AccountRegion,
        Self::AccountIndustry,
        Self::AccountSubIndustry,
        Self::AccountPrimaryCategory,
        Self::AccountPrimaryNature,
        Self::AccountNasscomStatus,
        Self::AccountEmployeesRange,
        Self::AccountCenterEmployees,
        Self::CenterType,
        Self::CenterFocus,
        Self::CenterCity,
        Self::CenterState,
        Self::CenterCountry,
        Self::CenterEmployees,
        Self::CenterStatus,
        Self::FunctionType,
        Self::ProspectDepartment,
        Self::ProspectLevel,
        Self::ProspectCity,
    ];

    /// Position of the field in [`FilterField::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Entity whose records carry this field.
    #[must_use]
    pub const fn entity(self) -> EntityKind {
        match self {
            Self::AccountCountry
            | Self::AccountRegion
            | Self::AccountIndustry
            | Self::AccountSubIndustry
            | Self::AccountPrimaryCategory
            | Self::AccountPrimaryNature
            | Self::AccountNasscomStatus
            | Self::AccountEmployeesRange
            | Self::AccountCenterEmployees => EntityKind::Account,
            Self::CenterType
            | Self::CenterFocus
            | Self::CenterCity
            | Self::CenterState
            | Self::CenterCountry
            | Self::CenterEmployees
            | Self::CenterStatus => EntityKind::Center,
            Self::FunctionType => EntityKind::Function,
            Self::ProspectDepartment | Self::ProspectLevel | Self::ProspectCity => {
                EntityKind::Prospect
            }
        }
    }

    /// Facet fields carried by one entity, in declaration order.
    pub fn for_entity(kind: EntityKind) -> impl Iterator<Item = FilterField> {
        Self::ALL.into_iter().filter(move |f| f.entity() == kind)
    }

    /// Serialised key of the field (e.g. `"accountCountries"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccountCountry => "accountCountries",
            Self::AccountRegion => "accountRegions",
            Self::AccountIndustry => "accountIndustries",
            Self::AccountSubIndustry => "accountSubIndustries",
            Self::AccountPrimaryCategory => "accountPrimaryCategories",
            Self::AccountPrimaryNature => "accountPrimaryNatures",
            Self::AccountNasscomStatus => "accountNasscomStatuses",
            Self::AccountEmployeesRange => "accountEmployeesRanges",
            Self::AccountCenterEmployees => "accountCenterEmployees",
            Self::CenterType => "centerTypes",
            Self::CenterFocus => "centerFocus",
            Self::CenterCity => "centerCities",
            Self::CenterState => "centerStates",
            Self::CenterCountry => "centerCountries",
            Self::CenterEmployees => "centerEmployees",
            Self::CenterStatus => "centerStatuses",
            Self::FunctionType => "functionTypes",
            Self::ProspectDepartment => "prospectDepartments",
            Self::ProspectLevel => "prospectLevels",
            Self::ProspectCity => "prospectCities",
        }
    }

    /// Parses a serialised key back into a field.
    #[must_use]
    pub fn from_key(key: &str) -> Option<FilterField> {
        Self::ALL.into_iter().find(|f| f.as_str() == key)
    }
}

/// Free-text keyword filters (substring semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordField {
    AccountName,
    ProspectTitle,
}

/// Complete filter state for one recomputation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub account_countries: Vec<FilterValue>,
    pub account_regions: Vec<FilterValue>,
    pub account_industries: Vec<FilterValue>,
    pub account_sub_industries: Vec<FilterValue>,
    pub account_primary_categories: Vec<FilterValue>,
    pub account_primary_natures: Vec<FilterValue>,
    pub account_nasscom_statuses: Vec<FilterValue>,
    pub account_employees_ranges: Vec<FilterValue>,
    pub account_center_employees: Vec<FilterValue>,
    /// `None` leaves revenue unconstrained.
    pub account_revenue_range: Option<RevenueRange>,
    pub include_null_revenue: bool,
    pub account_name_keywords: Vec<FilterValue>,
    pub center_types: Vec<FilterValue>,
    pub center_focus: Vec<FilterValue>,
    pub center_cities: Vec<FilterValue>,
    pub center_states: Vec<FilterValue>,
    pub center_countries: Vec<FilterValue>,
    pub center_employees: Vec<FilterValue>,
    pub center_statuses: Vec<FilterValue>,
    pub function_types: Vec<FilterValue>,
    pub prospect_departments: Vec<FilterValue>,
    pub prospect_levels: Vec<FilterValue>,
    pub prospect_cities: Vec<FilterValue>,
    pub prospect_title_keywords: Vec<FilterValue>,
    pub search_term: String,
    /// Fields whose "include blanks" toggle is on.
    pub include_blanks: BTreeSet<FilterField>,
}

impl FilterSpec {
    /// Selected values of a facet field.
    #[must_use]
    pub fn values(&self, field: FilterField) -> &[FilterValue] {
        match field {
            FilterField::AccountCountry => &self.account_countries,
            FilterField::AccountRegion => &self.account_regions,
            FilterField::AccountIndustry => &self.account_industries,
            FilterField::AccountSubIndustry => &self.account_sub_industries,
            FilterField::AccountPrimaryCategory => &self.account_primary_categories,
            FilterField::AccountPrimaryNature => &self.account_primary_natures,
            FilterField::AccountNasscomStatus => &self.account_nasscom_statuses,
            FilterField::AccountEmployeesRange => &self.account_employees_ranges,
            FilterField::AccountCenterEmployees => &self.account_center_employees,
            FilterField::CenterType => &self.center_types,
            FilterField::CenterFocus => &self.center_focus,
            FilterField::CenterCity => &self.center_cities,
            FilterField::CenterState => &self.center_states,
            FilterField::CenterCountry => &self.center_countries,
            FilterField::CenterEmployees => &self.center_employees,
            FilterField::CenterStatus => &self.center_statuses,
            FilterField::FunctionType => &self.function_types,
            FilterField::ProspectDepartment => &self.prospect_departments,
            FilterField::ProspectLevel => &self.prospect_levels,
            FilterField::ProspectCity => &self.prospect_cities,
        }
    }

    pub fn values_mut(&mut self, field: FilterField) -> &mut Vec<FilterValue> {
        match field {
            FilterField::AccountCountry => &mut self.account_countries,
            FilterField::AccountRegion => &mut self.account_regions,
            FilterField::AccountIndustry => &mut self.account_industries,
            FilterField::AccountSubIndustry => &mut self.account_sub_industries,
            FilterField::AccountPrimaryCategory => &mut self.account_primary_categories,
            FilterField::AccountPrimaryNature => &mut self.account_primary_natures,
            FilterField::AccountNasscomStatus => &mut self.account_nasscom_statuses,
            FilterField::AccountEmployeesRange => &mut self.account_employees_ranges,
            FilterField::AccountCenterEmployees => &mut self.account_center_employees,
            FilterField::CenterType => &mut self.center_types,
            FilterField::CenterFocus => &mut self.center_focus,
            FilterField::CenterCity => &mut self.center_cities,
            FilterField::CenterState => &mut self.center_states,
            FilterField::CenterCountry => &mut self.center_countries,
            FilterField::CenterEmployees => &mut self.center_employees,
            FilterField::CenterStatus => &mut self.center_statuses,
            FilterField::FunctionType => &mut self.function_types,
            FilterField::ProspectDepartment => &mut self.prospect_departments,
            FilterField::ProspectLevel => &mut self.prospect_levels,
            FilterField::ProspectCity => &mut self.prospect_cities,
        }
    }

    #[must_use]
    pub fn keywords(&self, field: KeywordField) -> &[FilterValue] {
        match field {
            KeywordField::AccountName => &self.account_name_keywords,
            KeywordField::ProspectTitle => &self.prospect_title_keywords,
        }
    }

    pub fn keywords_mut(&mut self, field: KeywordField) -> &mut Vec<FilterValue> {
        match field {
            KeywordField::AccountName => &mut self.account_name_keywords,
            KeywordField::ProspectTitle => &mut self.prospect_title_keywords,
        }
    }

    /// Builder-style helper: appends an include value to `field`.
    #[must_use]
    pub fn with_include(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.values_mut(field).push(FilterValue::include(value));
        self
    }

    /// Builder-style helper: appends an exclude value to `field`.
    #[must_use]
    pub fn with_exclude(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.values_mut(field).push(FilterValue::exclude(value));
        self
    }

    /// Builder-style helper: appends a keyword to a keyword field.
    #[must_use]
    pub fn with_keyword(mut self, field: KeywordField, keyword: FilterValue) -> Self {
        self.keywords_mut(field).push(keyword);
        self
    }

    /// Builder-style helper: sets the revenue range and null-revenue policy.
    #[must_use]
    pub fn with_revenue(mut self, range: RevenueRange, include_null: bool) -> Self {
        self.account_revenue_range = Some(range);
        self.include_null_revenue = include_null;
        self
    }

    #[must_use]
    pub fn include_blanks(&self, field: FilterField) -> bool {
        self.include_blanks.contains(&field)
    }

    pub fn set_include_blanks(&mut self, field: FilterField, enabled: bool) {
        if enabled {
            self.include_blanks.insert(field);
        } else {
            self.include_blanks.remove(&field);
        }
    }

    /// Copy with one facet field's filter (and its blank toggle) removed.
    #[must_use]
    pub fn relaxed(&self, field: FilterField) -> FilterSpec {
        let mut spec = self.clone();
        spec.values_mut(field).clear();
        spec.include_blanks.remove(&field);
        spec
    }

    /// Number of individual constraints, as shown on the "active filters"
    /// badge. A revenue range equal to the default slider span does not
    /// count; neither do the search term nor include-blanks flags.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        let lists: usize = FilterField::ALL
            .iter()
            .map(|f| self.values(*f).len())
            .sum();
        let revenue = self
            .account_revenue_range
            .is_some_and(|range| range != RevenueRange::DEFAULT);

        lists
            + self.account_name_keywords.len()
            + self.prospect_title_keywords.len()
            + usize::from(revenue)
            + usize::from(self.include_null_revenue)
    }

    /// True when nothing constrains the engine.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|f| self.values(*f).is_empty())
            && self.account_name_keywords.is_empty()
            && self.prospect_title_keywords.is_empty()
            && self.account_revenue_range.is_none()
            && !self.include_null_revenue
            && self.include_blanks.is_empty()
            && self.search_term.trim().is_empty()
    }

    /// Clears every constraint.
    pub fn reset(&mut self) {
        *self = FilterSpec::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_index_matches_all_order() {
        for (i, field) in FilterField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
            assert_eq!(FilterField::from_key(field.as_str()), Some(*field));
        }
    }

    #[test]
    fn test_fields_per_entity() {
        assert_eq!(FilterField::for_entity(EntityKind::Account).count(), 9);
        assert_eq!(FilterField::for_entity(EntityKind::Center).count(), 7);
        assert_eq!(FilterField::for_entity(EntityKind::Function).count(), 1);
        assert_eq!(FilterField::for_entity(EntityKind::Service).count(), 0);
        assert_eq!(FilterField::for_entity(EntityKind::Prospect).count(), 3);
    }

    #[test]
    fn test_legacy_string_values_read_as_include() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "accountCountries": ["India", {"value": "Japan", "mode": "exclude"}],
            "centerTypes": [{"value": "GCC"}],
        }))
        .unwrap();

        assert_eq!(
            spec.account_countries,
            vec![FilterValue::include("India"), FilterValue::exclude("Japan")]
        );
        assert_eq!(spec.center_types, vec![FilterValue::include("GCC")]);
        // Missing keys fall back to defaults.
        assert!(spec.prospect_levels.is_empty());
        assert_eq!(spec.account_revenue_range, None);
    }

    #[test]
    fn test_serialized_keys_match_field_keys() {
        let spec = FilterSpec::default()
            .with_include(FilterField::CenterFocus, "IT")
            .with_revenue(RevenueRange::new(0.0, 20.0), true);
        let value = serde_json::to_value(&spec).unwrap();

        assert_eq!(value["centerFocus"], json!([{"value": "IT", "mode": "include"}]));
        assert_eq!(value["accountRevenueRange"], json!([0.0, 20.0]));
        assert_eq!(value["includeNullRevenue"], json!(true));
        for field in FilterField::ALL {
            assert!(value.get(field.as_str()).is_some(), "{}", field.as_str());
        }
    }

    #[test]
    fn test_active_filter_count() {
        let mut spec = FilterSpec::default();
        assert!(spec.is_empty());

        spec = spec
            .with_include(FilterField::AccountCountry, "India")
            .with_exclude(FilterField::AccountCountry, "Japan")
            .with_keyword(KeywordField::ProspectTitle, FilterValue::include("Manager"))
            .with_revenue(RevenueRange::new(0.0, 10.0), true);
        assert_eq!(spec.active_filter_count(), 5);

        // Search and blank toggles constrain results but are not badged.
        spec.set_include_blanks(FilterField::CenterCity, true);
        spec.search_term = "  acme ".into();
        assert_eq!(spec.active_filter_count(), 5);

        spec.reset();
        assert!(spec.is_empty());
    }

    #[test]
    fn test_default_revenue_span_is_not_counted() {
        let mut spec = FilterSpec::default().with_revenue(RevenueRange::DEFAULT, false);
        assert_eq!(spec.active_filter_count(), 0);
        assert!(!spec.is_empty());

        spec.account_revenue_range = Some(RevenueRange::new(0.0, 500_000.0));
        assert_eq!(spec.active_filter_count(), 1);

        spec = FilterSpec {
            search_term: "bank".into(),
            ..Default::default()
        };
        assert_eq!(spec.active_filter_count(), 0);
        assert!(!spec.is_empty());
    }

    #[test]
    fn test_relaxed_clears_only_one_field() {
        let mut spec = FilterSpec::default()
            .with_include(FilterField::CenterType, "GCC")
            .with_include(FilterField::CenterCity, "Pune");
        spec.set_include_blanks(FilterField::CenterType, true);

        let relaxed = spec.relaxed(FilterField::CenterType);
        assert!(relaxed.center_types.is_empty());
        assert!(!relaxed.include_blanks(FilterField::CenterType));
        assert_eq!(relaxed.center_cities, spec.center_cities);
    }
}
