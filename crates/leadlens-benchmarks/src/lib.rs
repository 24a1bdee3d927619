use leadlens_core::{
    Account, Center, DataSnapshot, FilterField, FilterSpec, FilterValue, Function, KeywordField,
    Prospect, RawRevenue, RevenueRange, Service,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const COUNTRIES: &[&str] = &["India", "USA", "Japan", "Germany", "Brazil", "UK"];
const INDUSTRIES: &[&str] = &["Banking", "Retail", "Technology", "Healthcare", "Energy"];
const CITIES: &[&str] = &["Pune", "Bengaluru", "Austin", "Tokyo", "Berlin", "Hyderabad"];
const CENTER_TYPES: &[&str] = &["GCC", "Captive", "Shared Services"];
const FUNCTIONS: &[&str] = &["IT", "Finance", "HR", "Analytics", "Engineering"];
const LEVELS: &[&str] = &["VP", "Director", "Manager", "Individual Contributor"];
const TITLES: &[&str] = &[
    "Head of Engineering",
    "Senior Manager",
    "Finance Director",
    "VP Technology",
    "Analyst",
];

/// Shape of a generated snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotShape {
    pub accounts: usize,
    pub centers_per_account: usize,
    pub functions_per_center: usize,
    pub prospects_per_account: usize,
}

impl SnapshotShape {
    pub const fn with_accounts(accounts: usize) -> Self {
        Self {
            accounts,
            centers_per_account: 3,
            functions_per_center: 2,
            prospects_per_account: 5,
        }
    }
}

fn pick<'a>(rng: &mut StdRng, values: &[&'a str]) -> &'a str {
    values[rng.gen_range(0..values.len())]
}

/// Some blanks, so blank counts and "Unknown" buckets have work to do.
fn maybe(rng: &mut StdRng, values: &[&str]) -> Option<String> {
    rng.gen_bool(0.9).then(|| pick(rng, values).to_string())
}

/// Deterministic synthetic snapshot for a given shape.
pub fn generate_snapshot(shape: SnapshotShape) -> DataSnapshot {
    let mut rng = StdRng::seed_from_u64(0x1EAD_1E25 ^ shape.accounts as u64);
    let mut snapshot = DataSnapshot::default();

    for a in 0..shape.accounts {
        let account_key = format!("Account {a}");
        let mut account = Account::new(account_key.as_str());
        account.country = maybe(&mut rng, COUNTRIES);
        account.industry = maybe(&mut rng, INDUSTRIES);
        account.revenue = rng
            .gen_bool(0.85)
            .then(|| RawRevenue::Number(rng.gen_range(1.0..50_000.0)));
        snapshot.accounts.push(account);

        for c in 0..shape.centers_per_account {
            let center_key = format!("CN-{a}-{c}");
            let mut center = Center::new(center_key.as_str(), account_key.as_str());
            center.city = maybe(&mut rng, CITIES);
            center.center_type = maybe(&mut rng, CENTER_TYPES);
            snapshot.centers.push(center);

            for _ in 0..shape.functions_per_center {
                let name = pick(&mut rng, FUNCTIONS);
                snapshot
                    .functions
                    .push(Function::new(center_key.as_str(), name));
            }
            snapshot.services.push(Service::new(center_key.as_str()));
        }

        for _ in 0..shape.prospects_per_account {
            let mut prospect = Prospect::new(account_key.as_str());
            prospect.level = maybe(&mut rng, LEVELS);
            prospect.city = maybe(&mut rng, CITIES);
            prospect.title = maybe(&mut rng, TITLES);
            snapshot.prospects.push(prospect);
        }
    }

    snapshot
}

/// A filter state touching every entity type.
pub fn mixed_spec() -> FilterSpec {
    FilterSpec::default()
        .with_include(FilterField::AccountCountry, "India")
        .with_include(FilterField::AccountCountry, "USA")
        .with_exclude(FilterField::CenterType, "Shared Services")
        .with_include(FilterField::FunctionType, "IT")
        .with_keyword(
            KeywordField::ProspectTitle,
            FilterValue::exclude("analyst"),
        )
        .with_revenue(RevenueRange::new(100.0, 25_000.0), true)
}

/// A filter state touching accounts only.
pub fn account_only_spec() -> FilterSpec {
    FilterSpec::default()
        .with_include(FilterField::AccountIndustry, "Banking")
        .with_revenue(RevenueRange::new(1_000.0, 40_000.0), false)
}
