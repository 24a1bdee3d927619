use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use leadlens_core::{
    CurrencyRevenueParser, EntityKind, FilterField, FilterSpec, JsonFileSource, LeadlensConfig,
    MemorySavedFilterStore, SavedFilterStore, SnapshotSource,
};
use leadlens_query::{Dashboard, RangeState, Recomputation, RelationIndex};

#[derive(Parser, Debug)]
#[command(name = "leadlens-explore")]
#[command(about = "Run one LeadLens filter recomputation over a JSON snapshot", long_about = None)]
#[command(version)]
struct Cli {
    /// Snapshot file with accounts, centers, functions, services and prospects
    #[arg(long, env = "LEADLENS_SNAPSHOT")]
    snapshot: PathBuf,

    /// Filter document (JSON); omitted means no filters
    #[arg(long)]
    filters: Option<PathBuf>,

    /// Facet field to chart, by its filter key (e.g. centerCities)
    #[arg(long, value_parser = parse_field)]
    chart: Option<FilterField>,

    /// Options printed per facet field
    #[arg(long, default_value = "5")]
    top: usize,

    /// Print the full result as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Save the filters under this name and load them back before running
    #[arg(long)]
    save_as: Option<String>,
}

fn parse_field(key: &str) -> Result<FilterField, String> {
    FilterField::from_key(key).ok_or_else(|| format!("unknown filter field: {key}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args = Cli::parse();

    let config = LeadlensConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Falling back to default configuration");
        LeadlensConfig::default()
    });

    let snapshot = JsonFileSource::new(&args.snapshot).load()?;
    let index = RelationIndex::build(&snapshot, &CurrencyRevenueParser);
    if index.orphan_count() > 0 {
        warn!(orphans = index.orphan_count(), "Snapshot has dangling references");
    }

    let dashboard = Dashboard::new(config);
    let mut spec = match &args.filters {
        Some(path) => load_filters(path)?,
        None => FilterSpec::default(),
    };

    if let Some(name) = &args.save_as {
        let store = MemorySavedFilterStore::new();
        store.save(name, spec)?;

        let bounds = dashboard
            .recompute(&snapshot, &index, &FilterSpec::default())?
            .revenue_bounds;
        let mut range = RangeState::new(bounds);
        spec = dashboard.load_saved(&store, name, &mut range, bounds)?;
        info!(name = %name, "Running saved filter set");
    }

    let result = dashboard.recompute(&snapshot, &index, &spec)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result, args.top)?;
    }

    if let Some(field) = args.chart {
        println!();
        println!("Chart: {}", field.as_str());
        for datum in dashboard.chart(&result.materialize(&snapshot), field) {
            println!("  {:<32} {}", datum.name, datum.value);
        }
    }

    Ok(())
}

fn load_filters(path: &Path) -> Result<FilterSpec, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read filters {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

fn print_summary(result: &Recomputation, top: usize) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    write_summary(&mut stdout.lock(), result, top)
}

fn write_summary(
    out: &mut impl Write,
    result: &Recomputation,
    top: usize,
) -> std::io::Result<()> {
    writeln!(out, "Entities (filtered / total)")?;
    for kind in EntityKind::ALL {
        let count = result.summary.get(kind);
        writeln!(out, "  {:<10} {:>8} / {}", kind.as_str(), count.filtered, count.total)?;
    }

    let bounds = result.revenue_bounds;
    writeln!(out)?;
    writeln!(out, "Revenue bounds: {} .. {}", bounds.min, bounds.max)?;

    writeln!(out)?;
    writeln!(out, "Facets")?;
    for (field, options) in result.facets.iter() {
        if options.options.is_empty() && options.blank_count == 0 {
            continue;
        }
        let shown: Vec<String> = options
            .options
            .iter()
            .take(top)
            .map(|o| format!("{} ({})", o.value, o.count))
            .collect();
        writeln!(
            out,
            "  {:<26} {} [blank: {}]",
            field.as_str(),
            shown.join(", "),
            options.blank_count
        )?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Recomputed in {} us{}",
        result.profile.total_duration_us.unwrap_or_default(),
        if result.profile.is_slow { " (slow)" } else { "" }
    )
}

/// Initialize logging
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
