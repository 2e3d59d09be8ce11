//! Critical path calculation using forward and backward passes.

use crate::graph::{GraphError, TaskGraph, TaskIdx};
use crate::log_debug;

use super::types::TaskTiming;

/// Timing for every task in a graph, indexed by [`TaskIdx`].
#[derive(Clone, Debug)]
pub struct Schedule {
    /// Topological order used for both passes.
    pub order: Vec<TaskIdx>,
    pub timings: Vec<TaskTiming>,
    pub project_duration: i64,
}

/// Forward pass: earliest start/finish in topological order.
///
/// `es = 1` without predecessors, else `1 + max(ef(pred))`;
/// `ef = es + duration - 1`. Each task is visited exactly once.
fn forward_pass(graph: &TaskGraph<'_>, order: &[TaskIdx]) -> (Vec<i64>, Vec<i64>) {
    let n = graph.len();
    let mut earliest_start = vec![0; n];
    let mut earliest_finish = vec![0; n];

    for &idx in order {
        let es = graph
            .predecessors(idx)
            .iter()
            .map(|&p| earliest_finish[p])
            .max()
            .map_or(1, |ef| ef + 1);
        earliest_start[idx] = es;
        earliest_finish[idx] = es + graph.task(idx).duration_days - 1;
    }

    (earliest_start, earliest_finish)
}

/// Backward pass: latest start/finish in reverse topological order.
///
/// Terminal tasks finish at `project_duration`; others must finish the day
/// before their earliest-starting successor's latest start.
fn backward_pass(
    graph: &TaskGraph<'_>,
    order: &[TaskIdx],
    project_duration: i64,
) -> (Vec<i64>, Vec<i64>) {
    let n = graph.len();
    let mut latest_start = vec![0; n];
    let mut latest_finish = vec![0; n];

    for &idx in order.iter().rev() {
        let lf = graph
            .successors(idx)
            .iter()
            .map(|&s| latest_start[s] - 1)
            .min()
            .unwrap_or(project_duration);
        latest_finish[idx] = lf;
        latest_start[idx] = lf - graph.task(idx).duration_days + 1;
    }

    (latest_start, latest_finish)
}

/// Run both passes over an already-built graph.
///
/// # Errors
/// * `CyclicDependency` if the graph has a cycle (checked before any pass)
pub fn compute_schedule(graph: &TaskGraph<'_>, verbosity: u8) -> Result<Schedule, GraphError> {
    let order = graph.topological_order()?;

    let (earliest_start, earliest_finish) = forward_pass(graph, &order);
    let project_duration = earliest_finish.iter().copied().max().unwrap_or(0);
    let (latest_start, latest_finish) = backward_pass(graph, &order, project_duration);

    let timings = (0..graph.len())
        .map(|idx| {
            let task = graph.task(idx);
            let slack = latest_start[idx] - earliest_start[idx];
            log_debug!(
                verbosity,
                "  {}: es={} ef={} ls={} lf={} slack={}",
                task.id,
                earliest_start[idx],
                earliest_finish[idx],
                latest_start[idx],
                latest_finish[idx],
                slack
            );
            TaskTiming {
                task_id: task.id.clone(),
                task_name: task.name.clone(),
                earliest_start: earliest_start[idx],
                earliest_finish: earliest_finish[idx],
                latest_start: latest_start[idx],
                latest_finish: latest_finish[idx],
                slack,
                is_critical: slack == 0,
                duration: task.duration_days,
            }
        })
        .collect();

    Ok(Schedule {
        order,
        timings,
        project_duration,
    })
}
