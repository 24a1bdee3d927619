//! Shared fixtures and proptest strategies for the integration tests.

#![allow(dead_code)]

use leadlens_core::{
    Account, Center, CurrencyRevenueParser, DataSnapshot, EntityKind, FilterField, FilterSpec,
    FilterValue, Function, KeywordField, Prospect, RawRevenue, RevenueRange, Service,
};
use leadlens_query::{CompiledFilters, CrossEntityFilter, FilterSelection, RelationIndex};
use proptest::collection::vec;
use proptest::prelude::*;

/// Fields the generated snapshots actually populate.
pub const POPULATED: [FilterField; 10] = [
    FilterField::AccountCountry,
    FilterField::AccountRegion,
    FilterField::AccountIndustry,
    FilterField::CenterCity,
    FilterField::CenterType,
    FilterField::CenterStatus,
    FilterField::FunctionType,
    FilterField::ProspectDepartment,
    FilterField::ProspectLevel,
    FilterField::ProspectCity,
];

pub fn vocab(field: FilterField) -> &'static [&'static str] {
    match field {
        FilterField::AccountCountry => &["India", "USA", "Japan"],
        FilterField::AccountRegion => &["APAC", "NA"],
        FilterField::AccountIndustry => &["Banking", "Retail", "Tech"],
        FilterField::CenterCity | FilterField::ProspectCity => &["Pune", "Austin", "Tokyo"],
        FilterField::CenterType => &["GCC", "Captive"],
        FilterField::CenterStatus => &["Active", "Closed"],
        FilterField::FunctionType => &["IT", "HR", "Finance"],
        FilterField::ProspectDepartment => &["IT", "Sales"],
        FilterField::ProspectLevel => &["VP", "Director", "Manager"],
        _ => &["n/a"],
    }
}

const TITLES: &[&str] = &["Manager", "Senior Manager", "Director", "VP Sales"];
const REVENUES: &[f64] = &[5.0, 10.0, 50.0, 100.0];

fn maybe(field: FilterField) -> impl Strategy<Value = Option<String>> {
    proptest::option::weighted(
        0.8,
        proptest::sample::select(vocab(field)).prop_map(String::from),
    )
}

fn account_attrs() -> impl Strategy<
    Value = (
        Option<String>,
        Option<String>,
        Option<String>,
        Option<f64>,
    ),
> {
    (
        maybe(FilterField::AccountCountry),
        maybe(FilterField::AccountRegion),
        maybe(FilterField::AccountIndustry),
        proptest::option::weighted(0.7, proptest::sample::select(REVENUES)),
    )
}

fn center_attrs() -> impl Strategy<Value = (usize, Option<String>, Option<String>, Option<String>)>
{
    (
        0usize..8,
        maybe(FilterField::CenterCity),
        maybe(FilterField::CenterType),
        maybe(FilterField::CenterStatus),
    )
}

fn prospect_attrs() -> impl Strategy<
    Value = (
        usize,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
    ),
> {
    (
        0usize..8,
        maybe(FilterField::ProspectDepartment),
        maybe(FilterField::ProspectLevel),
        maybe(FilterField::ProspectCity),
        proptest::option::weighted(
            0.8,
            proptest::sample::select(TITLES).prop_map(String::from),
        ),
    )
}

/// Small random snapshot. With `orphans`, some references point at keys that
/// do not exist.
pub fn arb_snapshot(orphans: bool) -> impl Strategy<Value = DataSnapshot> {
    (
        vec(account_attrs(), 1..6),
        vec(center_attrs(), 0..8),
        vec((0usize..10, maybe(FilterField::FunctionType)), 0..10),
        vec(0usize..10, 0..6),
        vec(prospect_attrs(), 0..10),
    )
        .prop_map(move |(accounts, centers, functions, services, prospects)| {
            let account_key = |i: usize| {
                if orphans && i >= accounts.len() {
                    "ghost".to_string()
                } else {
                    format!("A{}", i % accounts.len())
                }
            };
            let center_count = centers.len();
            let center_key = |i: usize| {
                if center_count == 0 || (orphans && i >= center_count) {
                    "ghost".to_string()
                } else {
                    format!("C{}", i % center_count)
                }
            };

            let snapshot_accounts = accounts
                .iter()
                .enumerate()
                .map(|(i, (country, region, industry, revenue))| {
                    let mut a = Account::new(format!("A{i}"));
                    a.country = country.clone();
                    a.region = region.clone();
                    a.industry = industry.clone();
                    a.revenue = revenue.map(RawRevenue::Number);
                    a
                })
                .collect();

            let snapshot_centers = centers
                .iter()
                .enumerate()
                .map(|(i, (account, city, center_type, status))| {
                    let mut c = Center::new(format!("C{i}"), account_key(*account));
                    c.city = city.clone();
                    c.center_type = center_type.clone();
                    c.status = status.clone();
                    c
                })
                .collect();

            let keep = |key: &str| orphans || key != "ghost";

            let snapshot_functions = functions
                .into_iter()
                .map(|(center, name)| Function {
                    center: center_key(center).into(),
                    name,
                })
                .filter(|f| keep(f.center.as_str()))
                .collect();

            let snapshot_services = services
                .into_iter()
                .map(|center| Service::new(center_key(center)))
                .filter(|s| keep(s.center.as_str()))
                .collect();

            let snapshot_prospects = prospects
                .iter()
                .map(|(account, department, level, city, title)| {
                    let mut p = Prospect::new(account_key(*account));
                    p.department = department.clone();
                    p.level = level.clone();
                    p.city = city.clone();
                    p.title = title.clone();
                    p
                })
                .collect();

            DataSnapshot {
                accounts: snapshot_accounts,
                centers: snapshot_centers,
                functions: snapshot_functions,
                services: snapshot_services,
                prospects: snapshot_prospects,
            }
        })
}

/// A populated field and one of its values.
pub fn arb_field_value() -> impl Strategy<Value = (FilterField, String)> {
    (proptest::sample::select(POPULATED.to_vec()), 0usize..3)
        .prop_map(|(field, i)| {
            let values = vocab(field);
            (field, values[i % values.len()].to_string())
        })
}

/// Random filter specification over the populated fields.
pub fn arb_spec() -> impl Strategy<Value = FilterSpec> {
    (
        vec((arb_field_value(), any::<bool>()), 0..4),
        vec(proptest::sample::select(POPULATED.to_vec()), 0..2),
        proptest::option::weighted(
            0.3,
            (
                proptest::sample::select(REVENUES),
                proptest::sample::select(REVENUES),
                any::<bool>(),
            ),
        ),
        proptest::option::weighted(
            0.2,
            (proptest::sample::select(vec!["manager", "senior", "vp"]), any::<bool>()),
        ),
        proptest::sample::select(vec!["", "", "", "a1", "ind"]),
    )
        .prop_map(|(values, blanks, revenue, title, search)| {
            let mut spec = FilterSpec::default();
            for ((field, value), include) in values {
                spec = if include {
                    spec.with_include(field, value)
                } else {
                    spec.with_exclude(field, value)
                };
            }
            for field in blanks {
                spec.set_include_blanks(field, true);
            }
            if let Some((min, max, include_null)) = revenue {
                spec = spec.with_revenue(RevenueRange::new(min, max), include_null);
            }
            if let Some((keyword, include)) = title {
                let keyword = if include {
                    FilterValue::include(keyword)
                } else {
                    FilterValue::exclude(keyword)
                };
                spec = spec.with_keyword(KeywordField::ProspectTitle, keyword);
            }
            spec.search_term = search.to_string();
            spec
        })
}

pub fn run(snapshot: &DataSnapshot, spec: &FilterSpec) -> FilterSelection {
    let index = RelationIndex::build(snapshot, &CurrencyRevenueParser);
    CrossEntityFilter::new(snapshot, &index).apply(&CompiledFilters::compile_uncached(spec))
}

/// Values of `field` over the surviving records of its entity.
pub fn surviving_values<'a>(
    snapshot: &'a DataSnapshot,
    selection: &FilterSelection,
    field: FilterField,
) -> Vec<Option<&'a str>> {
    let filtered = selection.materialize(snapshot);
    match field.entity() {
        EntityKind::Account => filtered.accounts.iter().map(|a| a.field(field)).collect(),
        EntityKind::Center => filtered.centers.iter().map(|c| c.field(field)).collect(),
        EntityKind::Function => filtered.functions.iter().map(|f| f.field(field)).collect(),
        EntityKind::Prospect => filtered.prospects.iter().map(|p| p.field(field)).collect(),
        EntityKind::Service => Vec::new(),
    }
}

/// Every surviving child references a surviving parent.
pub fn join_consistent(snapshot: &DataSnapshot, selection: &FilterSelection) -> bool {
    let index = RelationIndex::build(snapshot, &CurrencyRevenueParser);

    let centers = selection.centers.iter().all(|c| {
        index
            .center_account(c)
            .is_some_and(|a| selection.accounts.contains(a))
    });
    let functions = selection.functions.iter().all(|f| {
        index
            .function_center(f)
            .is_some_and(|c| selection.centers.contains(c))
    });
    let services = selection.services.iter().all(|s| {
        index
            .service_center(s)
            .is_some_and(|c| selection.centers.contains(c))
    });
    let prospects = selection.prospects.iter().all(|p| {
        index
            .prospect_account(p)
            .is_some_and(|a| selection.accounts.contains(a))
    });

    centers && functions && services && prospects
}
