//! Result types for critical path computation.

use serde::{Deserialize, Serialize};

use crate::graph::DroppedDependency;

/// Per-task timing from the forward and backward passes.
///
/// All values are 1-indexed day offsets; a task occupies the inclusive
/// range `[earliest_start, earliest_finish]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTiming {
    pub task_id: String,
    pub task_name: String,
    pub earliest_start: i64,
    pub earliest_finish: i64,
    pub latest_start: i64,
    pub latest_finish: i64,
    /// Slack = latest_start - earliest_start.
    pub slack: i64,
    pub is_critical: bool,
    pub duration: i64,
}

/// A task on the critical path, in schedule order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPathEntry {
    pub task_id: String,
    pub task_name: String,
    pub start: i64,
    pub end: i64,
    pub duration: i64,
}

/// A non-critical task with little slack left.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bottleneck {
    pub task_id: String,
    pub task_name: String,
    pub slack: i64,
    pub warning: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPathStatistics {
    pub total_tasks: usize,
    pub critical_tasks: usize,
    pub non_critical_tasks: usize,
    pub average_slack: f64,
    pub max_slack: i64,
    pub critical_path_percentage: f64,
}

/// Output of [`compute_critical_path`](super::compute_critical_path).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPathResult {
    pub critical_path: Vec<CriticalPathEntry>,
    /// Timings for every included task, in input order.
    pub task_timings: Vec<TaskTiming>,
    pub project_duration: i64,
    /// Sum of the durations of all critical tasks.
    pub critical_path_duration: i64,
    pub total_slack: i64,
    pub bottlenecks: Vec<Bottleneck>,
    pub statistics: CriticalPathStatistics,
    pub dropped_dependencies: Vec<DroppedDependency>,
}

impl Bottleneck {
    pub fn new(timing: &TaskTiming) -> Self {
        let plural = if timing.slack == 1 { "" } else { "s" };
        Self {
            task_id: timing.task_id.clone(),
            task_name: timing.task_name.clone(),
            slack: timing.slack,
            warning: format!("Only {} day{} of buffer", timing.slack, plural),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing(slack: i64) -> TaskTiming {
        TaskTiming {
            task_id: "drywall".to_string(),
            task_name: "Drywall".to_string(),
            earliest_start: 1,
            earliest_finish: 3,
            latest_start: 1 + slack,
            latest_finish: 3 + slack,
            slack,
            is_critical: slack == 0,
            duration: 3,
        }
    }

    #[test]
    fn test_bottleneck_warning_pluralization() {
        assert_eq!(Bottleneck::new(&timing(1)).warning, "Only 1 day of buffer");
        assert_eq!(Bottleneck::new(&timing(2)).warning, "Only 2 days of buffer");
    }

    #[test]
    fn test_timing_serializes_camel_case() {
        let json = serde_json::to_string(&timing(0)).unwrap();
        assert!(json.contains("\"earliestStart\":1"));
        assert!(json.contains("\"isCritical\":true"));
    }
}
