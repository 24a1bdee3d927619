// Facet counts and revenue bounds checked against full engine runs
//
// The counter derives every field's options from one shared pass; these
// properties recompute the same numbers the slow way, one engine run per
// field or value.

mod common;

use common::{arb_snapshot, arb_spec, run, surviving_values, vocab, POPULATED};
use leadlens_core::{CurrencyRevenueParser, DataSnapshot, FilterSpec, RevenueRange};
use leadlens_query::{
    CompiledFilters, FacetCounter, FacetCounts, LeaveOneOut, RangeResolver, RelationIndex,
};
use proptest::prelude::*;

fn facets_and_bounds(snapshot: &DataSnapshot, spec: &FilterSpec) -> (FacetCounts, RevenueRange) {
    let index = RelationIndex::build(snapshot, &CurrencyRevenueParser);
    let filters = CompiledFilters::compile_uncached(spec);
    let loo = LeaveOneOut::compute(snapshot, &index, &filters);
    (FacetCounter::count(&loo), RangeResolver::default().bounds(&loo))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_value_count_equals_selecting_only_that_value(
        snapshot in arb_snapshot(true),
        spec in arb_spec(),
    ) {
        let (facets, _) = facets_and_bounds(&snapshot, &spec);

        for field in POPULATED {
            let options = facets.get(field).unwrap();
            for value in vocab(field) {
                let narrowed = spec.relaxed(field).with_include(field, *value);
                let expected = run(&snapshot, &narrowed).len_of(field.entity());
                prop_assert_eq!(
                    options.count_of(value),
                    expected,
                    "{} = {}",
                    field.as_str(),
                    value
                );
            }
        }
    }

    #[test]
    fn prop_blank_count_equals_relaxed_run(
        snapshot in arb_snapshot(true),
        spec in arb_spec(),
    ) {
        let (facets, _) = facets_and_bounds(&snapshot, &spec);

        for field in POPULATED {
            let relaxed = run(&snapshot, &spec.relaxed(field));
            let blanks = surviving_values(&snapshot, &relaxed, field)
                .into_iter()
                .filter(Option::is_none)
                .count();
            prop_assert_eq!(facets.get(field).unwrap().blank_count, blanks, "{}", field.as_str());
        }
    }

    #[test]
    fn prop_options_are_sorted_and_positive(
        snapshot in arb_snapshot(true),
        spec in arb_spec(),
    ) {
        let (facets, _) = facets_and_bounds(&snapshot, &spec);

        for (_, options) in facets.iter() {
            prop_assert!(options.options.iter().all(|o| o.count > 0));
            prop_assert!(options.options.windows(2).all(|w| w[0].count >= w[1].count));
        }
    }

    #[test]
    fn prop_bounds_ignore_only_the_revenue_filter(
        snapshot in arb_snapshot(true),
        spec in arb_spec(),
    ) {
        let (_, bounds) = facets_and_bounds(&snapshot, &spec);

        let mut relaxed = spec.clone();
        relaxed.account_revenue_range = None;
        let selection = run(&snapshot, &relaxed);

        let index = RelationIndex::build(&snapshot, &CurrencyRevenueParser);
        let revenues: Vec<f64> = selection
            .accounts
            .iter()
            .map(|a| index.revenue(a))
            .filter(|r| *r > 0.0)
            .collect();

        let expected = if revenues.is_empty() {
            RevenueRange::DEFAULT
        } else {
            RevenueRange::new(
                revenues.iter().copied().fold(f64::INFINITY, f64::min),
                revenues.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            )
        };
        prop_assert_eq!(bounds, expected);
    }
}
