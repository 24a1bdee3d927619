//! Recompute profiling and slow recompute detection
//!
//! Each recomputation records how long every stage took. Stages feed the
//! stage duration histogram; recomputations slower than the configured
//! threshold are logged with their bottleneck stage.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use leadlens_core::metrics::{RECOMPUTE_STAGE_DURATION, SLOW_RECOMPUTES};

/// Profile of one recomputation
#[derive(Debug, Clone, Serialize)]
pub struct RecomputeProfile {
    /// Number of active constraints in the filter specification
    pub active_filters: usize,

    /// Start timestamp (not serialized)
    #[serde(skip)]
    pub start_time: Instant,

    pub stages: Vec<ProfileStage>,

    /// Total duration (set when finished)
    pub total_duration_us: Option<u64>,

    pub is_slow: bool,
}

/// A single profiled stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileStage {
    /// Stage name ("compile", "filter", "facets", "range")
    pub name: String,

    pub duration_us: u64,

    /// Stage-specific details such as record counts
    pub metadata: serde_json::Value,
}

impl RecomputeProfile {
    pub fn new(active_filters: usize) -> Self {
        Self {
            active_filters,
            start_time: Instant::now(),
            stages: Vec::new(),
            total_duration_us: None,
            is_slow: false,
        }
    }

    /// Record a completed stage
    pub fn record_stage(
        &mut self,
        name: impl Into<String>,
        duration: Duration,
        metadata: serde_json::Value,
    ) {
        let stage = ProfileStage {
            name: name.into(),
            duration_us: duration.as_micros() as u64,
            metadata,
        };

        RECOMPUTE_STAGE_DURATION
            .with_label_values(&[stage.name.as_str()])
            .observe(duration.as_secs_f64());

        self.stages.push(stage);
    }

    /// Finish profiling and check against the slow threshold
    pub fn finish(mut self, slow_threshold: Duration) -> Self {
        let total = self.start_time.elapsed();
        let total_us = total.as_micros() as u64;
        self.total_duration_us = Some(total_us);
        self.is_slow = total > slow_threshold;

        if self.is_slow {
            warn!(
                active_filters = self.active_filters,
                duration_us = total_us,
                threshold_ms = slow_threshold.as_millis() as u64,
                stages = ?self.stages,
                bottleneck = ?self.bottleneck().map(|s| s.name.as_str()),
                "Slow recompute detected"
            );

            SLOW_RECOMPUTES.inc();
        } else {
            info!(
                active_filters = self.active_filters,
                duration_us = total_us,
                "Recompute completed"
            );
        }

        self
    }

    /// Longest stage
    pub fn bottleneck(&self) -> Option<&ProfileStage> {
        self.stages.iter().max_by_key(|s| s.duration_us)
    }

    pub fn total_duration(&self) -> Option<Duration> {
        self.total_duration_us.map(Duration::from_micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_creation() {
        let profile = RecomputeProfile::new(3);
        assert_eq!(profile.active_filters, 3);
        assert!(profile.stages.is_empty());
        assert_eq!(profile.total_duration_us, None);
        assert!(!profile.is_slow);
    }

    #[test]
    fn test_record_stages_and_bottleneck() {
        let mut profile = RecomputeProfile::new(0);

        profile.record_stage("compile", Duration::from_micros(40), json!({"fields": 20}));
        profile.record_stage("filter", Duration::from_millis(3), json!({"accounts": 1000}));
        profile.record_stage("facets", Duration::from_millis(2), json!({}));

        assert_eq!(profile.stages.len(), 3);
        assert_eq!(profile.stages[0].duration_us, 40);

        let bottleneck = profile.bottleneck().unwrap();
        assert_eq!(bottleneck.name, "filter");
        assert_eq!(bottleneck.duration_us, 3000);
    }

    #[test]
    fn test_slow_recompute_detection() {
        let profile = RecomputeProfile::new(1);
        std::thread::sleep(Duration::from_millis(30));

        let profile = profile.finish(Duration::from_millis(10));
        assert!(profile.is_slow);
        assert!(profile.total_duration().unwrap() >= Duration::from_millis(30));
    }

    #[test]
    fn test_fast_recompute() {
        let profile = RecomputeProfile::new(1).finish(Duration::from_secs(5));
        assert!(!profile.is_slow);
        assert!(profile.total_duration_us.is_some());
    }
}
