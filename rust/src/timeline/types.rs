//! Result types for the phase timeline.

use serde::{Deserialize, Serialize};

use crate::scoring::PriorityClass;

use super::contractor::ContractorType;

/// A task as listed inside its phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTask {
    pub id: String,
    pub name: String,
    pub contractor: ContractorType,
    pub duration: i64,
    pub cost: f64,
    pub dependencies: Vec<String>,
    /// `critical` for must-have tasks, `high` otherwise.
    pub priority: PriorityClass,
    pub start: i64,
    pub end: i64,
    pub is_critical: bool,
}

/// A caller-defined phase annotated with computed timing and cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub phase_number: i32,
    pub start_day: i64,
    pub end_day: i64,
    pub total_cost: f64,
    pub tasks: Vec<PhaseTask>,
    pub is_on_critical_path: bool,
    pub warnings: Vec<String>,
}

/// Two tasks assigned to the same contractor on overlapping days.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConflict {
    pub contractor: ContractorType,
    pub first_task_id: String,
    pub second_task_id: String,
    pub overlap_start: i64,
    pub overlap_end: i64,
}

/// Scheduled day range of one task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWindow {
    pub task_id: String,
    pub start: i64,
    pub end: i64,
}

/// Output of [`compute_timeline`](super::compute_timeline).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResult {
    /// Phases in ascending phase number.
    pub phases: Vec<Phase>,
    pub total_days: i64,
    /// Ids of critical tasks, ordered by earliest start then id.
    pub critical_path: Vec<String>,
    /// One advisory line per contractor with overlapping tasks.
    pub warnings: Vec<String>,
    pub conflicts: Vec<ResourceConflict>,
    /// Day range of every included task, in input order.
    pub task_timeline: Vec<TaskWindow>,
}
