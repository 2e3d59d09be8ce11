//! Configuration types for the planning engine.

use serde::{Deserialize, Serialize};

/// Configuration shared by all engine entry points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Non-critical tasks with slack below this many days are bottlenecks.
    pub bottleneck_slack_threshold: i64,
    /// Urgency/ROI score at or above which a task lands in a "high" quadrant.
    pub matrix_threshold: f64,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bottleneck_slack_threshold: 3,
            matrix_threshold: 60.0,
            verbosity: 0,
        }
    }
}

impl EngineConfig {
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}
