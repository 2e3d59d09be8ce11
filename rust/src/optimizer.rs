//! Budget-constrained scope selection.
//!
//! Greedy by ROI per dollar: an approximation to the 0/1 knapsack, not an
//! optimal solution. It is deterministic and runs in O(n log n). Must-have
//! tasks are always selected, even when that exceeds the budget, but they
//! take their turn in efficiency order like every other task.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::models::{PriorityLevel, Task};
use crate::{log_changes, log_checks};

/// Output of [`optimize_for_budget`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    /// Selected tasks, in ROI-per-dollar order.
    pub selected: Vec<Task>,
    /// Rejected tasks, in ROI-per-dollar order.
    pub excluded: Vec<Task>,
    pub total_cost: f64,
    /// Sum of `roi_impact` over the selected tasks.
    pub total_value: f64,
    /// `max_budget - total_cost`; negative when must-haves overrun.
    pub budget_remaining: f64,
    /// Must-have tasks selected even though they did not fit the budget.
    pub forced_task_ids: Vec<String>,
    pub over_budget: bool,
}

/// Select the included tasks that fit `max_budget`, best ROI per dollar
/// first.
///
/// One pass in efficiency order: a task is taken if the running cost stays
/// within `max_budget`. A must-have that does not fit is taken anyway and
/// recorded in `forced_task_ids`; any other task that does not fit is
/// excluded. Ties in efficiency keep input order. Excluded input tasks
/// (`included == false`) take no part.
pub fn optimize_for_budget(
    tasks: &[Task],
    max_budget: f64,
    config: &EngineConfig,
) -> OptimizationResult {
    let mut ranked: Vec<&Task> = tasks.iter().filter(|t| t.included).collect();
    // Stable: equal efficiency keeps input order
    ranked.sort_by(|a, b| b.roi_per_dollar().total_cmp(&a.roi_per_dollar()));

    let mut selected = Vec::new();
    let mut excluded = Vec::new();
    let mut total_cost = 0.0;
    let mut forced_task_ids = Vec::new();

    for task in ranked {
        if total_cost + task.cost_total <= max_budget {
            log_checks!(
                config.verbosity,
                "Selecting {} (${:.2}, roi/$ {:.5})",
                task.id,
                task.cost_total,
                task.roi_per_dollar()
            );
        } else if task.priority_level == PriorityLevel::Must {
            log_changes!(
                config.verbosity,
                "Forcing must-have {} (${:.2}) past budget ${:.2}",
                task.id,
                task.cost_total,
                max_budget
            );
            forced_task_ids.push(task.id.clone());
        } else {
            log_checks!(
                config.verbosity,
                "Excluding {} (${:.2} exceeds remaining ${:.2})",
                task.id,
                task.cost_total,
                max_budget - total_cost
            );
            excluded.push(task.clone());
            continue;
        }
        total_cost += task.cost_total;
        selected.push(task.clone());
    }

    OptimizationResult {
        total_value: selected.iter().map(|t| t.roi_impact).sum(),
        selected,
        excluded,
        total_cost,
        budget_remaining: max_budget - total_cost,
        forced_task_ids,
        over_budget: total_cost > max_budget,
    }
}
