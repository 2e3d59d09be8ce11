//! Phase timeline: caller-assigned phases annotated with CPM timing, cost
//! and contractor conflicts.
//!
//! Phases are planning labels. A phase's start and end are read off the
//! CPM schedule of its tasks; phase numbers never constrain timing.

mod contractor;
mod types;

pub use contractor::{ContractorSchedule, ContractorType, Overlap};
pub use types::{Phase, PhaseTask, ResourceConflict, TaskWindow, TimelineResult};

use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::critical_path::{compute_schedule, TaskTiming};
use crate::graph::{build_task_graph, GraphError, TaskIdx};
use crate::log_changes;
use crate::models::{PriorityLevel, Task};
use crate::scoring::PriorityClass;

/// Build the phase timeline for the included tasks.
///
/// Returns an empty result when no task is included. Contractor conflicts
/// are advisory and never fail the computation.
///
/// # Errors
/// * `InvalidDuration`, `ProjectTooLong`, `DuplicateTaskId` from graph
///   validation
/// * `CyclicDependency` if the dependencies form a loop
pub fn compute_timeline(
    tasks: &[Task],
    config: &EngineConfig,
) -> Result<TimelineResult, GraphError> {
    let graph = match build_task_graph(tasks, config.verbosity) {
        Ok(graph) => graph,
        Err(GraphError::EmptyInput) => return Ok(TimelineResult::default()),
        Err(e) => return Err(e),
    };
    let schedule = compute_schedule(&graph, config.verbosity)?;
    let timings = &schedule.timings;

    // Contractor schedules in first-appearance order
    let mut contractors: Vec<ContractorSchedule> = Vec::new();
    for (idx, task) in graph.tasks().iter().enumerate() {
        let contractor = ContractorType::from_category(&task.category);
        let position = match contractors.iter().position(|c| c.contractor == contractor) {
            Some(position) => position,
            None => {
                contractors.push(ContractorSchedule::new(contractor));
                contractors.len() - 1
            }
        };
        contractors[position].book(
            timings[idx].earliest_start,
            timings[idx].earliest_finish,
            idx,
        );
    }

    let mut warnings = Vec::new();
    let mut conflicts = Vec::new();
    let mut phase_warnings: BTreeMap<i32, Vec<String>> = BTreeMap::new();
    for booked in &contractors {
        let overlaps = booked.overlaps();
        if overlaps.is_empty() {
            continue;
        }
        log_changes!(
            config.verbosity,
            "{} has {} overlapping booking(s)",
            booked.contractor,
            overlaps.len()
        );
        warnings.push(format!("{} has overlapping tasks", booked.contractor));

        for overlap in overlaps {
            let first = graph.task(overlap.first);
            let second = graph.task(overlap.second);
            if first.phase == second.phase {
                phase_warnings.entry(first.phase).or_default().push(format!(
                    "{} has overlapping tasks: {} and {} (days {}-{})",
                    booked.contractor, first.id, second.id, overlap.start, overlap.end
                ));
            }
            conflicts.push(ResourceConflict {
                contractor: booked.contractor,
                first_task_id: first.id.clone(),
                second_task_id: second.id.clone(),
                overlap_start: overlap.start,
                overlap_end: overlap.end,
            });
        }
    }

    let mut by_phase: BTreeMap<i32, Vec<TaskIdx>> = BTreeMap::new();
    for (idx, task) in graph.tasks().iter().enumerate() {
        by_phase.entry(task.phase).or_default().push(idx);
    }

    let phases: Vec<Phase> = by_phase
        .into_iter()
        .map(|(phase_number, members)| {
            let tasks: Vec<PhaseTask> = members
                .iter()
                .map(|&idx| {
                    let task = graph.task(idx);
                    let timing = &timings[idx];
                    PhaseTask {
                        id: task.id.clone(),
                        name: task.name.clone(),
                        contractor: ContractorType::from_category(&task.category),
                        duration: task.duration_days,
                        cost: task.cost_total,
                        dependencies: task.depends_on.clone(),
                        priority: if task.priority_level == PriorityLevel::Must {
                            PriorityClass::Critical
                        } else {
                            PriorityClass::High
                        },
                        start: timing.earliest_start,
                        end: timing.earliest_finish,
                        is_critical: timing.is_critical,
                    }
                })
                .collect();

            Phase {
                id: format!("phase-{}", phase_number),
                name: format!("Phase {}", phase_number),
                phase_number,
                start_day: tasks.iter().map(|t| t.start).min().unwrap_or(0),
                end_day: tasks.iter().map(|t| t.end).max().unwrap_or(0),
                total_cost: tasks.iter().map(|t| t.cost).sum(),
                is_on_critical_path: tasks.iter().any(|t| t.is_critical),
                warnings: phase_warnings.remove(&phase_number).unwrap_or_default(),
                tasks,
            }
        })
        .collect();

    let mut critical: Vec<&TaskTiming> = timings.iter().filter(|t| t.is_critical).collect();
    critical.sort_by(|a, b| {
        a.earliest_start
            .cmp(&b.earliest_start)
            .then_with(|| a.task_id.cmp(&b.task_id))
    });

    Ok(TimelineResult {
        phases,
        total_days: schedule.project_duration,
        critical_path: critical.iter().map(|t| t.task_id.clone()).collect(),
        warnings,
        conflicts,
        task_timeline: timings
            .iter()
            .map(|t| TaskWindow {
                task_id: t.task_id.clone(),
                start: t.earliest_start,
                end: t.earliest_finish,
            })
            .collect(),
    })
}
