//! Configuration management for LeadLens
//!
//! Sources, lowest to highest precedence:
//! - Hardcoded defaults
//! - /etc/leadlens/leadlens.{yaml,toml,json}
//! - ./config/leadlens.{yaml,toml,json}
//! - File named by the LEADLENS_CONFIG env var
//! - LEADLENS__* environment variables

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::revenue::RevenueRange;

/// Root configuration structure for LeadLens
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LeadlensConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub facets: FacetConfig,

    #[serde(default)]
    pub revenue: RevenueConfig,
}

impl LeadlensConfig {
    /// Load configuration from every source and validate it.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        builder = Self::set_defaults(builder)?;

        builder = builder
            .add_source(File::with_name("/etc/leadlens/leadlens").required(false))
            .add_source(File::with_name("./config/leadlens").required(false));

        if let Ok(config_path) = std::env::var("LEADLENS_CONFIG") {
            builder = builder.add_source(File::with_name(&config_path).required(false));
        }

        // Example: LEADLENS__ENGINE__MATCHER_CACHE_CAPACITY=5000
        builder = builder.add_source(
            Environment::with_prefix("LEADLENS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: LeadlensConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn set_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            // Engine
            .set_default("engine.matcher_cache_capacity", 10_000)?
            .set_default("engine.matcher_cache_idle_secs", 300)?
            .set_default("engine.slow_recompute_threshold_ms", 250)?
            // Facets
            .set_default("facets.chart_top_n", 10)?
            .set_default("facets.unknown_label", "Unknown")?
            // Revenue
            .set_default("revenue.default_min", 0.0)?
            .set_default("revenue.default_max", 1_000_000.0)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.matcher_cache_capacity == 0 {
            return Err(ConfigError::Message(
                "engine.matcher_cache_capacity must be > 0".to_string(),
            ));
        }

        if self.facets.chart_top_n == 0 {
            return Err(ConfigError::Message(
                "facets.chart_top_n must be > 0".to_string(),
            ));
        }

        if self.facets.unknown_label.trim().is_empty() {
            return Err(ConfigError::Message(
                "facets.unknown_label must not be empty".to_string(),
            ));
        }

        if !(self.revenue.default_min.is_finite() && self.revenue.default_max.is_finite())
            || self.revenue.default_max < self.revenue.default_min
        {
            return Err(ConfigError::Message(
                "revenue.default_max must be >= revenue.default_min".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from a specific file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: LeadlensConfig = Self::set_defaults(Config::builder())?
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}

/// Recompute engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Maximum number of compiled matchers kept in the cache
    pub matcher_cache_capacity: u64,

    /// Seconds an unused compiled matcher stays cached
    pub matcher_cache_idle_secs: u64,

    /// Recomputations slower than this are logged as slow
    pub slow_recompute_threshold_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            matcher_cache_capacity: 10_000,
            matcher_cache_idle_secs: 300,
            slow_recompute_threshold_ms: 250,
        }
    }
}

impl EngineConfig {
    pub fn matcher_cache_idle(&self) -> Duration {
        Duration::from_secs(self.matcher_cache_idle_secs)
    }

    pub fn slow_recompute_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_recompute_threshold_ms)
    }
}

/// Facet and chart presentation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FacetConfig {
    /// Groups kept by the chart helper
    pub chart_top_n: usize,

    /// Bucket label for blank values in charts
    pub unknown_label: String,
}

impl Default for FacetConfig {
    fn default() -> Self {
        Self {
            chart_top_n: 10,
            unknown_label: "Unknown".to_string(),
        }
    }
}

/// Revenue slider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RevenueConfig {
    /// Lower bound used when no account has a positive revenue
    pub default_min: f64,

    /// Upper bound used when no account has a positive revenue
    pub default_max: f64,
}

impl Default for RevenueConfig {
    fn default() -> Self {
        Self {
            default_min: RevenueRange::DEFAULT.min,
            default_max: RevenueRange::DEFAULT.max,
        }
    }
}

impl RevenueConfig {
    pub fn default_range(&self) -> RevenueRange {
        RevenueRange::new(self.default_min, self.default_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_configuration() {
        let config = LeadlensConfig::default();

        assert_eq!(config.engine.matcher_cache_capacity, 10_000);
        assert_eq!(config.engine.matcher_cache_idle().as_secs(), 300);
        assert_eq!(config.engine.slow_recompute_threshold().as_millis(), 250);
        assert_eq!(config.facets.chart_top_n, 10);
        assert_eq!(config.facets.unknown_label, "Unknown");
        assert_eq!(config.revenue.default_range(), RevenueRange::DEFAULT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = LeadlensConfig::default();

        config.engine.matcher_cache_capacity = 0;
        assert!(config.validate().is_err());
        config.engine.matcher_cache_capacity = 10;
        assert!(config.validate().is_ok());

        config.facets.unknown_label = "  ".to_string();
        assert!(config.validate().is_err());
        config.facets.unknown_label = "n/a".to_string();

        config.revenue.default_min = 100.0;
        config.revenue.default_max = 10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[facets]\nchart_top_n = 5\n\n[engine]\nslow_recompute_threshold_ms = 40"
        )
        .unwrap();

        let config = LeadlensConfig::from_file(file.path()).unwrap();
        assert_eq!(config.facets.chart_top_n, 5);
        assert_eq!(config.facets.unknown_label, "Unknown");
        assert_eq!(config.engine.slow_recompute_threshold_ms, 40);
        assert_eq!(config.engine.matcher_cache_capacity, 10_000);
    }
}
