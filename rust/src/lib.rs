//! Scheduling and budgeting engine for residential renovation projects.
//!
//! Given renovation tasks with durations, costs, ROI estimates, priority
//! levels and dependencies, this crate computes a CPM schedule, groups it
//! into phases with contractor conflict checks, scores tasks for priority
//! and selects a scope that fits a budget. All computations are pure
//! functions of their inputs; [`Engine`] adds JSON dispatch and caching.

pub mod cache;
pub mod config;
pub mod critical_path;
pub mod engine;
pub mod graph;
pub mod logging;
pub mod models;
pub mod optimizer;
pub mod scoring;
pub mod timeline;

#[cfg(feature = "python")]
mod python;

pub use cache::{OperationKind, ResultCache};
pub use config::EngineConfig;
pub use critical_path::{compute_critical_path, CriticalPathResult, TaskTiming};
pub use engine::{execute, plan_within_budget, Engine, EngineError, PlanResult, Request, Response};
pub use graph::{build_task_graph, DroppedDependency, GraphError, TaskGraph};
pub use models::{InvestmentStrategy, PriorityLevel, Task};
pub use optimizer::{optimize_for_budget, OptimizationResult};
pub use scoring::{score_priorities, PriorityClass, PriorityScore, PriorityScoreResult};
pub use timeline::{compute_timeline, Phase, TimelineResult};
