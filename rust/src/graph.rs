//! Dependency graph construction and validation.
//!
//! Included tasks are assigned dense indices in input order; all
//! downstream passes work on those indices.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use crate::log_checks;
use crate::models::Task;

/// Dense task index into a [`TaskGraph`].
pub type TaskIdx = usize;

/// Upper bound on the summed duration of all included tasks. Every CPM
/// day offset lies within `1..=total`, so day arithmetic cannot overflow.
pub const MAX_PROJECT_DAYS: i64 = i32::MAX as i64;

/// Input validation errors. All are deterministic: fix the input, do not retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("No included tasks to schedule")]
    EmptyInput,
    #[error("Task {task_id} has non-positive duration ({duration_days} days)")]
    InvalidDuration { task_id: String, duration_days: i64 },
    #[error("Total duration exceeds {max_days} days at task {task_id}")]
    ProjectTooLong { task_id: String, max_days: i64 },
    #[error("Duplicate task id: {0}")]
    DuplicateTaskId(String),
    #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },
}

/// A `dependsOn` reference that did not match any included task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedDependency {
    pub task_id: String,
    pub missing_dependency: String,
}

/// Dependency graph over the included tasks.
#[derive(Debug)]
pub struct TaskGraph<'a> {
    tasks: Vec<&'a Task>,
    index: FxHashMap<&'a str, TaskIdx>,
    predecessors: Vec<Vec<TaskIdx>>,
    successors: Vec<Vec<TaskIdx>>,
    dropped: Vec<DroppedDependency>,
}

/// Build the dependency graph from a flat task list.
///
/// Excluded tasks are ignored entirely. A dependency on an id that is not
/// an included task is dropped (and recorded), so excluding a task never
/// breaks its dependents. Repeated dependency ids collapse to one edge.
///
/// # Errors
/// * `EmptyInput` if no task is included
/// * `InvalidDuration` if an included task has `duration_days < 1`
/// * `ProjectTooLong` if the durations sum past [`MAX_PROJECT_DAYS`]
/// * `DuplicateTaskId` if two included tasks share an id
pub fn build_task_graph(tasks: &[Task], verbosity: u8) -> Result<TaskGraph<'_>, GraphError> {
    let included: Vec<&Task> = tasks.iter().filter(|t| t.included).collect();
    if included.is_empty() {
        return Err(GraphError::EmptyInput);
    }

    let mut index: FxHashMap<&str, TaskIdx> =
        FxHashMap::with_capacity_and_hasher(included.len(), Default::default());
    let mut total_days: i64 = 0;
    for (idx, &task) in included.iter().enumerate() {
        if task.duration_days < 1 {
            return Err(GraphError::InvalidDuration {
                task_id: task.id.clone(),
                duration_days: task.duration_days,
            });
        }
        total_days = match total_days.checked_add(task.duration_days) {
            Some(total) if total <= MAX_PROJECT_DAYS => total,
            _ => {
                return Err(GraphError::ProjectTooLong {
                    task_id: task.id.clone(),
                    max_days: MAX_PROJECT_DAYS,
                })
            }
        };
        if index.insert(task.id.as_str(), idx).is_some() {
            return Err(GraphError::DuplicateTaskId(task.id.clone()));
        }
    }

    let n = included.len();
    let mut predecessors: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];
    let mut successors: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];
    let mut dropped = Vec::new();

    for (idx, &task) in included.iter().enumerate() {
        for dep_id in &task.depends_on {
            match index.get(dep_id.as_str()) {
                Some(&dep_idx) => {
                    if !predecessors[idx].contains(&dep_idx) {
                        predecessors[idx].push(dep_idx);
                        successors[dep_idx].push(idx);
                    }
                }
                None => {
                    log_checks!(
                        verbosity,
                        "Dropping dependency {} -> {} (not an included task)",
                        task.id,
                        dep_id
                    );
                    dropped.push(DroppedDependency {
                        task_id: task.id.clone(),
                        missing_dependency: dep_id.clone(),
                    });
                }
            }
        }
    }

    Ok(TaskGraph {
        tasks: included,
        index,
        predecessors,
        successors,
        dropped,
    })
}

impl<'a> TaskGraph<'a> {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, idx: TaskIdx) -> &'a Task {
        self.tasks[idx]
    }

    /// Included tasks in input order.
    pub fn tasks(&self) -> &[&'a Task] {
        &self.tasks
    }

    pub fn index_of(&self, id: &str) -> Option<TaskIdx> {
        self.index.get(id).copied()
    }

    pub fn predecessors(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.predecessors[idx]
    }

    pub fn successors(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.successors[idx]
    }

    pub fn dropped_dependencies(&self) -> &[DroppedDependency] {
        &self.dropped
    }

    /// Order tasks so every task comes after all of its predecessors
    /// (Kahn's algorithm; ties keep input order).
    ///
    /// # Errors
    /// * `CyclicDependency` naming one cycle if the graph is not acyclic
    pub fn topological_order(&self) -> Result<Vec<TaskIdx>, GraphError> {
        let n = self.len();
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(Vec::len).collect();
        let mut queue: VecDeque<TaskIdx> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            for &succ in &self.successors[idx] {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    queue.push_back(succ);
                }
            }
        }

        if order.len() != n {
            let remaining: Vec<bool> = in_degree.iter().map(|&d| d > 0).collect();
            return Err(GraphError::CyclicDependency {
                cycle: self.find_cycle(&remaining),
            });
        }

        Ok(order)
    }

    /// Walk predecessor edges among the tasks Kahn's algorithm could not
    /// release until a task repeats.
    ///
    /// Every remaining task has at least one remaining predecessor, so the
    /// walk always closes a loop. The result reads in `dependsOn` direction
    /// and ends with its first id (`a -> b -> a`).
    fn find_cycle(&self, remaining: &[bool]) -> Vec<String> {
        let Some(start) = remaining.iter().position(|&r| r) else {
            return Vec::new();
        };

        let mut position: FxHashMap<TaskIdx, usize> = FxHashMap::default();
        let mut walk: Vec<TaskIdx> = Vec::new();
        let mut current = start;

        loop {
            if let Some(&pos) = position.get(&current) {
                let mut cycle: Vec<String> = walk[pos..]
                    .iter()
                    .map(|&i| self.tasks[i].id.clone())
                    .collect();
                cycle.push(self.tasks[current].id.clone());
                return cycle;
            }
            position.insert(current, walk.len());
            walk.push(current);

            match self.predecessors[current]
                .iter()
                .copied()
                .find(|&p| remaining[p])
            {
                Some(next) => current = next,
                None => return walk.iter().map(|&i| self.tasks[i].id.clone()).collect(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriorityLevel;

    fn make_task(id: &str, duration: i64, deps: Vec<&str>) -> Task {
        Task::new(id, duration, 1000.0, 10.0, PriorityLevel::Should).with_dependencies(deps)
    }

    #[test]
    fn test_successors_are_inverted_dependencies() {
        let tasks = vec![
            make_task("a", 1, vec![]),
            make_task("b", 1, vec!["a"]),
            make_task("c", 1, vec!["a"]),
        ];
        let graph = build_task_graph(&tasks, 0).unwrap();

        let a = graph.index_of("a").unwrap();
        let b = graph.index_of("b").unwrap();
        let c = graph.index_of("c").unwrap();
        assert_eq!(graph.successors(a), &[b, c]);
        assert_eq!(graph.predecessors(b), &[a]);
        assert!(graph.predecessors(a).is_empty());
    }

    #[test]
    fn test_excluded_tasks_are_ignored() {
        let tasks = vec![
            make_task("a", 1, vec![]).excluded(),
            make_task("b", 1, vec!["a"]),
        ];
        let graph = build_task_graph(&tasks, 0).unwrap();

        assert_eq!(graph.len(), 1);
        assert!(!graph.is_empty());
        assert!(graph.index_of("a").is_none());
        let b = graph.index_of("b").unwrap();
        assert!(graph.predecessors(b).is_empty());
        assert_eq!(
            graph.dropped_dependencies(),
            &[DroppedDependency {
                task_id: "b".to_string(),
                missing_dependency: "a".to_string(),
            }]
        );
    }

    #[test]
    fn test_unknown_dependency_dropped() {
        let tasks = vec![make_task("a", 2, vec!["ghost"])];
        let graph = build_task_graph(&tasks, 0).unwrap();

        assert!(graph.predecessors(0).is_empty());
        assert_eq!(graph.dropped_dependencies().len(), 1);
    }

    #[test]
    fn test_huge_duration_rejected() {
        let tasks = vec![make_task("forever", i64::MAX, vec![])];

        assert_eq!(
            build_task_graph(&tasks, 0).unwrap_err(),
            GraphError::ProjectTooLong {
                task_id: "forever".to_string(),
                max_days: MAX_PROJECT_DAYS,
            }
        );
    }

    #[test]
    fn test_total_duration_limit() {
        let at_limit = vec![
            make_task("a", MAX_PROJECT_DAYS - 1, vec![]),
            make_task("b", 1, vec!["a"]),
        ];
        assert!(build_task_graph(&at_limit, 0).is_ok());

        let past_limit = vec![
            make_task("a", MAX_PROJECT_DAYS, vec![]),
            make_task("b", 1, vec!["a"]),
        ];
        assert!(matches!(
            build_task_graph(&past_limit, 0),
            Err(GraphError::ProjectTooLong { task_id, .. }) if task_id == "b"
        ));
    }

    #[test]
    fn test_repeated_dependency_collapses() {
        let tasks = vec![make_task("a", 1, vec![]), make_task("b", 1, vec!["a", "a"])];
        let graph = build_task_graph(&tasks, 0).unwrap();

        assert_eq!(graph.predecessors(1), &[0]);
        assert_eq!(graph.successors(0), &[1]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(build_task_graph(&[], 0).unwrap_err(), GraphError::EmptyInput);

        let tasks = vec![make_task("a", 1, vec![]).excluded()];
        assert_eq!(
            build_task_graph(&tasks, 0).unwrap_err(),
            GraphError::EmptyInput
        );
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let tasks = vec![make_task("a", 1, vec![]), make_task("b", 0, vec!["a"])];
        assert_eq!(
            build_task_graph(&tasks, 0).unwrap_err(),
            GraphError::InvalidDuration {
                task_id: "b".to_string(),
                duration_days: 0,
            }
        );

        let tasks = vec![make_task("c", -2, vec![])];
        assert!(matches!(
            build_task_graph(&tasks, 0),
            Err(GraphError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_excluded_task_duration_not_validated() {
        let tasks = vec![make_task("a", 1, vec![]), make_task("b", 0, vec![]).excluded()];
        assert!(build_task_graph(&tasks, 0).is_ok());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let tasks = vec![make_task("a", 1, vec![]), make_task("a", 2, vec![])];
        assert_eq!(
            build_task_graph(&tasks, 0).unwrap_err(),
            GraphError::DuplicateTaskId("a".to_string())
        );
    }

    #[test]
    fn test_topological_order_respects_dependencies() {
        // Input order deliberately lists dependents first
        let tasks = vec![
            make_task("d", 1, vec!["b", "c"]),
            make_task("c", 1, vec!["a"]),
            make_task("b", 1, vec!["a"]),
            make_task("a", 1, vec![]),
        ];
        let graph = build_task_graph(&tasks, 0).unwrap();
        let order = graph.topological_order().unwrap();

        let pos = |id: &str| {
            let idx = graph.index_of(id).unwrap();
            order.iter().position(|&i| i == idx).unwrap()
        };
        assert!(pos("a") < pos("b"));
        assert!(pos("a") < pos("c"));
        assert!(pos("b") < pos("d"));
        assert!(pos("c") < pos("d"));
    }

    #[test]
    fn test_two_task_cycle_named() {
        let tasks = vec![make_task("a", 1, vec!["b"]), make_task("b", 1, vec!["a"])];
        let graph = build_task_graph(&tasks, 0).unwrap();

        let err = graph.topological_order().unwrap_err();
        assert_eq!(
            err,
            GraphError::CyclicDependency {
                cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
            }
        );
        assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> a");
    }

    #[test]
    fn test_self_dependency_is_cycle() {
        let tasks = vec![make_task("a", 1, vec!["a"])];
        let graph = build_task_graph(&tasks, 0).unwrap();

        assert_eq!(
            graph.topological_order().unwrap_err(),
            GraphError::CyclicDependency {
                cycle: vec!["a".to_string(), "a".to_string()],
            }
        );
    }

    #[test]
    fn test_cycle_reported_without_acyclic_prefix() {
        // start -> x -> y -> z -> x, plus a downstream task hanging off the loop
        let tasks = vec![
            make_task("start", 1, vec![]),
            make_task("x", 1, vec!["start", "z"]),
            make_task("y", 1, vec!["x"]),
            make_task("z", 1, vec!["y"]),
            make_task("after", 1, vec!["z"]),
        ];
        let graph = build_task_graph(&tasks, 0).unwrap();

        match graph.topological_order() {
            Err(GraphError::CyclicDependency { cycle }) => {
                assert_eq!(cycle.first(), cycle.last());
                assert_eq!(cycle.len(), 4);
                assert!(!cycle.contains(&"start".to_string()));
                assert!(!cycle.contains(&"after".to_string()));
            }
            other => panic!("expected cycle error, got {:?}", other),
        }
    }
}
