//! End-to-end scenarios: JSON snapshot and filter documents through the
//! dashboard.

use leadlens_core::{
    CurrencyRevenueParser, DataSnapshot, EntityKind, FilterField, FilterSpec, FilterValue,
    KeywordField, MemorySavedFilterStore, RevenueRange, SavedFilterStore,
};
use leadlens_query::{Dashboard, RangeMode, RangeState, RelationIndex};
use serde_json::json;

fn snapshot() -> DataSnapshot {
    serde_json::from_value(json!({
        "accounts": [
            {
                "account_global_legal_name": "A1",
                "account_hq_country": "India",
                "account_hq_industry": "Banking",
                "account_hq_revenue": 10
            },
            {
                "account_global_legal_name": "A2",
                "account_hq_country": "USA",
                "account_hq_industry": "Retail",
                "account_hq_revenue": "$50"
            },
            {
                "account_global_legal_name": "A3",
                "account_hq_country": "",
                "account_hq_revenue": null
            }
        ],
        "centers": [
            {"cn_unique_key": "C1", "account_global_legal_name": "A1", "center_city": "Pune"},
            {"cn_unique_key": "C2", "account_global_legal_name": "A2", "center_city": "Austin"},
            {"cn_unique_key": "C3", "account_global_legal_name": "A3"}
        ],
        "functions": [
            {"cn_unique_key": "C1", "function_name": "IT"},
            {"cn_unique_key": "C2", "function_name": "Finance"}
        ],
        "services": [
            {"cn_unique_key": "C1", "primary_service": "Cloud"},
            {"cn_unique_key": "C2"}
        ],
        "prospects": [
            {
                "account_global_legal_name": "A1",
                "prospect_title": "Manager",
                "prospect_level": "Manager"
            },
            {
                "account_global_legal_name": "A1",
                "prospect_title": "Senior Manager",
                "prospect_level": "Manager"
            },
            {
                "account_global_legal_name": "A2",
                "prospect_title": "Director",
                "prospect_level": "Director"
            }
        ]
    }))
    .unwrap()
}

fn keys(snapshot: &DataSnapshot, selection: &leadlens_query::FilterSelection) -> Vec<String> {
    selection
        .materialize(snapshot)
        .accounts
        .iter()
        .map(|a| a.key.to_string())
        .collect()
}

#[test]
fn test_revenue_range_with_and_without_null_revenue() {
    let snap = snapshot();
    let index = RelationIndex::build(&snap, &CurrencyRevenueParser);
    let dashboard = Dashboard::default();

    let spec = FilterSpec::default().with_revenue(RevenueRange::new(0.0, 20.0), false);
    let result = dashboard.recompute(&snap, &index, &spec).unwrap();
    assert_eq!(keys(&snap, &result.selection), vec!["A1"]);
    assert_eq!(result.revenue_bounds, RevenueRange::new(10.0, 50.0));

    let spec = FilterSpec::default().with_revenue(RevenueRange::new(0.0, 20.0), true);
    let result = dashboard.recompute(&snap, &index, &spec).unwrap();
    assert_eq!(keys(&snap, &result.selection), vec!["A1", "A3"]);
}

#[test]
fn test_account_country_restricts_centers() {
    let snap = snapshot();
    let index = RelationIndex::build(&snap, &CurrencyRevenueParser);
    let spec = FilterSpec::default().with_include(FilterField::AccountCountry, "India");

    let result = Dashboard::default().recompute(&snap, &index, &spec).unwrap();
    let filtered = result.materialize(&snap);

    let centers: Vec<&str> = filtered.centers.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(centers, vec!["C1"]);
    assert_eq!(filtered.services.len(), 1);
    assert_eq!(filtered.services[0].primary_service.as_deref(), Some("Cloud"));
}

#[test]
fn test_title_keywords() {
    let snap = snapshot();
    let index = RelationIndex::build(&snap, &CurrencyRevenueParser);
    let spec = FilterSpec::default()
        .with_keyword(KeywordField::ProspectTitle, FilterValue::include("Manager"))
        .with_keyword(KeywordField::ProspectTitle, FilterValue::exclude("Senior"));

    let result = Dashboard::default().recompute(&snap, &index, &spec).unwrap();
    let filtered = result.materialize(&snap);

    let titles: Vec<&str> = filtered
        .prospects
        .iter()
        .filter_map(|p| p.title.as_deref())
        .collect();
    assert_eq!(titles, vec!["Manager"]);
    assert_eq!(result.summary.accounts.filtered, 1);

    // Title keywords still apply while counting levels.
    let levels = result.facets.get(FilterField::ProspectLevel).unwrap();
    assert_eq!(levels.count_of("Manager"), 1);
}

#[test]
fn test_search_term_matches_accounts() {
    let snap = snapshot();
    let index = RelationIndex::build(&snap, &CurrencyRevenueParser);
    let spec = FilterSpec {
        search_term: "retail".into(),
        ..Default::default()
    };

    let result = Dashboard::default().recompute(&snap, &index, &spec).unwrap();
    assert_eq!(keys(&snap, &result.selection), vec!["A2"]);
    assert_eq!(result.summary.get(EntityKind::Prospect).filtered, 1);
}

#[test]
fn test_filter_document_with_legacy_values() {
    let snap = snapshot();
    let index = RelationIndex::build(&snap, &CurrencyRevenueParser);
    let spec: FilterSpec = serde_json::from_value(json!({
        "accountCountries": ["India", "USA"],
        "centerCities": [{"value": "Austin", "mode": "exclude"}],
        "includeBlanks": ["accountCountries"]
    }))
    .unwrap();

    let result = Dashboard::default().recompute(&snap, &index, &spec).unwrap();
    // A3 passes through the blank toggle; its center has no city.
    assert_eq!(keys(&snap, &result.selection), vec!["A1", "A3"]);

    let countries = result.facets.get(FilterField::AccountCountry).unwrap();
    assert_eq!(countries.blank_count, 1);
    assert_eq!(countries.count_of("USA"), 0);
}

#[test]
fn test_auto_range_applies_null_revenue_toggle() {
    let snap = snapshot();
    let index = RelationIndex::build(&snap, &CurrencyRevenueParser);
    let dashboard = Dashboard::default();

    let first = dashboard.recompute(&snap, &index, &FilterSpec::default()).unwrap();
    let range = RangeState::new(first.revenue_bounds);
    assert_eq!(range.mode(), RangeMode::Auto);

    let mut spec = FilterSpec::default();
    range.apply_to(&mut spec);
    let result = dashboard.recompute(&snap, &index, &spec).unwrap();
    assert_eq!(keys(&snap, &result.selection), vec!["A1", "A2"]);

    spec.include_null_revenue = true;
    let result = dashboard.recompute(&snap, &index, &spec).unwrap();
    assert_eq!(keys(&snap, &result.selection), vec!["A1", "A2", "A3"]);
}

#[test]
fn test_saved_set_drives_range_state() {
    let snap = snapshot();
    let index = RelationIndex::build(&snap, &CurrencyRevenueParser);
    let dashboard = Dashboard::default();
    let store = MemorySavedFilterStore::new();

    let first = dashboard.recompute(&snap, &index, &FilterSpec::default()).unwrap();
    let mut range = RangeState::new(first.revenue_bounds);
    range.set_max(30.0);
    assert_eq!(range.mode(), RangeMode::Manual);

    let mut spec = FilterSpec::default();
    range.apply_to(&mut spec);
    assert_eq!(spec.account_revenue_range, Some(RevenueRange::new(10.0, 30.0)));
    store.save("small", spec.clone()).unwrap();

    let loaded = dashboard
        .load_saved(&store, "small", &mut range, first.revenue_bounds)
        .unwrap();
    assert_eq!(loaded, spec);
    assert_eq!(range.mode(), RangeMode::Auto);

    let result = dashboard.recompute(&snap, &index, &loaded).unwrap();
    assert_eq!(keys(&snap, &result.selection), vec!["A1"]);
    range.on_bounds(result.revenue_bounds);
    assert_eq!(range.selected(), result.revenue_bounds);
}

#[test]
fn test_chart_buckets_blank_values() {
    let snap = snapshot();
    let index = RelationIndex::build(&snap, &CurrencyRevenueParser);
    let dashboard = Dashboard::default();

    let result = dashboard.recompute(&snap, &index, &FilterSpec::default()).unwrap();
    let chart = dashboard.chart(&result.materialize(&snap), FilterField::CenterCity);

    let names: Vec<&str> = chart.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(chart.len(), 3);
    assert!(names.contains(&"Unknown"));
    assert!(chart.iter().all(|d| d.value == 1));
}
