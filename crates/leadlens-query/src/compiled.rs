//! One recomputation's compiled filter set.
//!
//! Every record's own matchers are evaluated into a failure bitmask: bit `i`
//! for facet field `FilterField::ALL[i]`, plus the account-level revenue, name
//! keyword and search bits and the prospect title bit. The engine keeps a
//! record iff its mask is zero; the facet counter reads the same masks for
//! leave-one-out counting.

use leadlens_core::{
    Account, Center, FilterField, FilterSpec, Function, KeywordField, Prospect, RevenueRange,
};

use crate::matcher::{KeywordMatcher, ValueMatcher};
use crate::matcher_cache::MatcherCache;

/// Failure bit of a facet field.
#[inline]
pub const fn field_bit(field: FilterField) -> u32 {
    1 << field.index()
}

pub const REVENUE_BIT: u32 = 1 << FilterField::COUNT;
pub const ACCOUNT_NAME_BIT: u32 = 1 << (FilterField::COUNT + 1);
pub const SEARCH_BIT: u32 = 1 << (FilterField::COUNT + 2);
pub const PROSPECT_TITLE_BIT: u32 = 1 << (FilterField::COUNT + 3);

/// Lowercased free-text search over account identity fields.
#[derive(Debug, Clone, Default)]
pub struct SearchMatcher {
    term: Option<String>,
}

impl SearchMatcher {
    pub fn compile(term: &str) -> Self {
        let term = term.trim();
        Self {
            term: (!term.is_empty()).then(|| term.to_lowercase()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.term.is_some()
    }

    /// Matches legal name, industry, sub-industry and HQ country.
    pub fn matches(&self, account: &Account) -> bool {
        let Some(term) = &self.term else {
            return true;
        };

        [
            Some(account.key.as_str()),
            account.industry.as_deref(),
            account.sub_industry.as_deref(),
            account.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(term.as_str()))
    }
}

/// Revenue filter over parsed revenues (`0.0` means no revenue).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RevenuePredicate {
    range: Option<RevenueRange>,
    include_null: bool,
}

impl RevenuePredicate {
    pub fn new(range: Option<RevenueRange>, include_null: bool) -> Self {
        Self {
            range,
            include_null,
        }
    }

    pub fn is_active(&self) -> bool {
        self.range.is_some()
    }

    pub fn matches(&self, revenue: f64) -> bool {
        match self.range {
            None => true,
            Some(_) if revenue == 0.0 => self.include_null,
            Some(range) => range.contains(revenue),
        }
    }
}

/// Matchers for every field of a [`FilterSpec`].
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    fields: [ValueMatcher; FilterField::COUNT],
    account_name: KeywordMatcher,
    prospect_title: KeywordMatcher,
    search: SearchMatcher,
    revenue: RevenuePredicate,
}

impl CompiledFilters {
    /// Compiles through the caller's cache.
    pub fn compile(spec: &FilterSpec, cache: &MatcherCache) -> Self {
        Self {
            fields: std::array::from_fn(|i| {
                let field = FilterField::ALL[i];
                cache.value_matcher(spec.values(field), spec.include_blanks(field))
            }),
            account_name: cache.keyword_matcher(spec.keywords(KeywordField::AccountName)),
            prospect_title: cache.keyword_matcher(spec.keywords(KeywordField::ProspectTitle)),
            search: SearchMatcher::compile(&spec.search_term),
            revenue: RevenuePredicate::new(spec.account_revenue_range, spec.include_null_revenue),
        }
    }

    /// Compiles without a cache.
    pub fn compile_uncached(spec: &FilterSpec) -> Self {
        Self {
            fields: std::array::from_fn(|i| {
                let field = FilterField::ALL[i];
                ValueMatcher::compile(spec.values(field), spec.include_blanks(field))
            }),
            account_name: KeywordMatcher::compile(spec.keywords(KeywordField::AccountName)),
            prospect_title: KeywordMatcher::compile(spec.keywords(KeywordField::ProspectTitle)),
            search: SearchMatcher::compile(&spec.search_term),
            revenue: RevenuePredicate::new(spec.account_revenue_range, spec.include_null_revenue),
        }
    }

    pub fn matcher(&self, field: FilterField) -> &ValueMatcher {
        &self.fields[field.index()]
    }

    pub fn is_field_active(&self, field: FilterField) -> bool {
        self.matcher(field).is_active()
    }

    pub fn revenue(&self) -> &RevenuePredicate {
        &self.revenue
    }

    pub fn account_active(&self) -> bool {
        self.any_field_active(Self::ACCOUNT_FIELDS, None)
            || self.revenue.is_active()
            || self.account_name.is_active()
            || self.search.is_active()
    }

    pub fn center_active(&self) -> bool {
        self.any_field_active(Self::CENTER_FIELDS, None)
    }

    pub fn function_active(&self) -> bool {
        self.is_field_active(FilterField::FunctionType)
    }

    pub fn prospect_active(&self) -> bool {
        self.prospect_active_without(None)
    }

    /// Prospect-level filtering with `relaxed` ignored.
    pub fn prospect_active_without(&self, relaxed: Option<FilterField>) -> bool {
        self.any_field_active(Self::PROSPECT_FIELDS, relaxed) || self.prospect_title.is_active()
    }

    /// Whether the final account closure runs.
    pub fn closure_active(&self) -> bool {
        self.closure_active_without(None)
    }

    /// Final closure condition with `relaxed` ignored.
    pub fn closure_active_without(&self, relaxed: Option<FilterField>) -> bool {
        self.any_field_active(Self::CENTER_FIELDS, relaxed)
            || (relaxed != Some(FilterField::FunctionType) && self.function_active())
            || self.prospect_active_without(relaxed)
    }

    const ACCOUNT_FIELDS: &'static [FilterField] = &[
        FilterField::AccountCountry,
        FilterField::AccountRegion,
        FilterField::AccountIndustry,
        FilterField::AccountSubIndustry,
        FilterField::AccountPrimaryCategory,
        FilterField::AccountPrimaryNature,
        FilterField::AccountNasscomStatus,
        FilterField::AccountEmployeesRange,
        FilterField::AccountCenterEmployees,
    ];

    const CENTER_FIELDS: &'static [FilterField] = &[
        FilterField::CenterType,
        FilterField::CenterFocus,
        FilterField::CenterCity,
        FilterField::CenterState,
        FilterField::CenterCountry,
        FilterField::CenterEmployees,
        FilterField::CenterStatus,
    ];

    const PROSPECT_FIELDS: &'static [FilterField] = &[
        FilterField::ProspectDepartment,
        FilterField::ProspectLevel,
        FilterField::ProspectCity,
    ];

    fn any_field_active(&self, fields: &[FilterField], relaxed: Option<FilterField>) -> bool {
        fields
            .iter()
            .any(|f| Some(*f) != relaxed && self.is_field_active(*f))
    }

    fn field_failures<'a>(
        &self,
        fields: &[FilterField],
        value_of: impl Fn(FilterField) -> Option<&'a str>,
    ) -> u32 {
        fields.iter().fold(0, |mask, field| {
            if self.matcher(*field).matches(value_of(*field)) {
                mask
            } else {
                mask | field_bit(*field)
            }
        })
    }

    /// Failure mask of an account given its parsed revenue.
    pub fn account_failures(&self, account: &Account, revenue: f64) -> u32 {
        let mut mask = self.field_failures(Self::ACCOUNT_FIELDS, |f| account.field(f));
        if !self.revenue.matches(revenue) {
            mask |= REVENUE_BIT;
        }
        if !self.account_name.matches(Some(account.key.as_str())) {
            mask |= ACCOUNT_NAME_BIT;
        }
        if !self.search.matches(account) {
            mask |= SEARCH_BIT;
        }
        mask
    }

    pub fn center_failures(&self, center: &Center) -> u32 {
        self.field_failures(Self::CENTER_FIELDS, |f| center.field(f))
    }

    pub fn function_failures(&self, function: &Function) -> u32 {
        self.field_failures(&[FilterField::FunctionType], |f| function.field(f))
    }

    pub fn prospect_failures(&self, prospect: &Prospect) -> u32 {
        let mut mask = self.field_failures(Self::PROSPECT_FIELDS, |f| prospect.field(f));
        if !self.prospect_title.matches(prospect.title.as_deref()) {
            mask |= PROSPECT_TITLE_BIT;
        }
        mask
    }
}
