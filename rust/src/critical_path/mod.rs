//! Critical Path Method scheduling.
//!
//! Computes earliest/latest start and finish for every included task,
//! slack, the critical path and near-critical bottlenecks. Works in
//! abstract 1-indexed day offsets.

mod calculation;
mod types;

pub use calculation::{compute_schedule, Schedule};
pub use types::{
    Bottleneck, CriticalPathEntry, CriticalPathResult, CriticalPathStatistics, TaskTiming,
};

use crate::config::EngineConfig;
use crate::graph::{build_task_graph, GraphError};
use crate::log_changes;
use crate::models::Task;

/// Compute the CPM schedule for the included tasks.
///
/// Returns an all-zero result when no task is included.
///
/// # Errors
/// * `InvalidDuration`, `ProjectTooLong`, `DuplicateTaskId` from graph
///   validation
/// * `CyclicDependency` if the dependencies form a loop
pub fn compute_critical_path(
    tasks: &[Task],
    config: &EngineConfig,
) -> Result<CriticalPathResult, GraphError> {
    let graph = match build_task_graph(tasks, config.verbosity) {
        Ok(graph) => graph,
        Err(GraphError::EmptyInput) => return Ok(CriticalPathResult::default()),
        Err(e) => return Err(e),
    };
    let schedule = compute_schedule(&graph, config.verbosity)?;
    let timings = schedule.timings;

    let mut critical: Vec<&TaskTiming> = timings.iter().filter(|t| t.is_critical).collect();
    critical.sort_by(|a, b| {
        a.earliest_start
            .cmp(&b.earliest_start)
            .then_with(|| a.task_id.cmp(&b.task_id))
    });
    let critical_path: Vec<CriticalPathEntry> = critical
        .iter()
        .map(|t| CriticalPathEntry {
            task_id: t.task_id.clone(),
            task_name: t.task_name.clone(),
            start: t.earliest_start,
            end: t.earliest_finish,
            duration: t.duration,
        })
        .collect();

    let bottlenecks: Vec<Bottleneck> = timings
        .iter()
        .filter(|t| !t.is_critical && t.slack < config.bottleneck_slack_threshold)
        .map(Bottleneck::new)
        .collect();

    let total_tasks = timings.len();
    let total_slack: i64 = timings.iter().map(|t| t.slack).sum();
    let max_slack = timings.iter().map(|t| t.slack).max().unwrap_or(0);
    let statistics = CriticalPathStatistics {
        total_tasks,
        critical_tasks: critical_path.len(),
        non_critical_tasks: total_tasks - critical_path.len(),
        average_slack: total_slack as f64 / total_tasks as f64,
        max_slack,
        critical_path_percentage: critical_path.len() as f64 / total_tasks as f64 * 100.0,
    };

    log_changes!(
        config.verbosity,
        "Critical path: {} of {} tasks, project duration {} days, {} bottleneck(s)",
        critical_path.len(),
        total_tasks,
        schedule.project_duration,
        bottlenecks.len()
    );

    Ok(CriticalPathResult {
        critical_path_duration: critical_path.iter().map(|e| e.duration).sum(),
        critical_path,
        task_timings: timings,
        project_duration: schedule.project_duration,
        total_slack,
        bottlenecks,
        statistics,
        dropped_dependencies: graph.dropped_dependencies().to_vec(),
    })
}
