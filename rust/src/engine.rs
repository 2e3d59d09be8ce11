//! JSON request dispatch with response caching.
//!
//! Callers outside Rust exchange plain JSON: a request tagged by
//! `operation`, answered with the serialized result object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::{OperationKind, ResultCache};
use crate::config::EngineConfig;
use crate::critical_path::{compute_critical_path, CriticalPathResult};
use crate::graph::GraphError;
use crate::models::{InvestmentStrategy, Task};
use crate::optimizer::{optimize_for_budget, OptimizationResult};
use crate::scoring::{score_priorities, PriorityScoreResult};
use crate::timeline::{compute_timeline, TimelineResult};

/// Errors surfaced at the request boundary.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("Invalid request: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single engine invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum Request {
    CriticalPath {
        tasks: Vec<Task>,
    },
    Timeline {
        tasks: Vec<Task>,
    },
    PriorityScore {
        tasks: Vec<Task>,
        #[serde(default, rename = "propertyValue")]
        property_value: Option<f64>,
        #[serde(default, rename = "investmentStrategy")]
        investment_strategy: InvestmentStrategy,
    },
    BudgetOptimization {
        tasks: Vec<Task>,
        #[serde(rename = "maxBudget")]
        max_budget: f64,
    },
    Plan {
        tasks: Vec<Task>,
        #[serde(rename = "maxBudget")]
        max_budget: f64,
    },
}

impl Request {
    pub fn kind(&self) -> OperationKind {
        match self {
            Request::CriticalPath { .. } => OperationKind::CriticalPath,
            Request::Timeline { .. } => OperationKind::Timeline,
            Request::PriorityScore { .. } => OperationKind::PriorityScore,
            Request::BudgetOptimization { .. } => OperationKind::BudgetOptimization,
            Request::Plan { .. } => OperationKind::Plan,
        }
    }
}

/// Budget selection followed by a timeline of the selected tasks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub optimization: OptimizationResult,
    pub timeline: TimelineResult,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    CriticalPath(CriticalPathResult),
    Timeline(TimelineResult),
    PriorityScore(PriorityScoreResult),
    BudgetOptimization(OptimizationResult),
    Plan(PlanResult),
}

/// Pick the tasks that fit `max_budget`, then schedule only those.
///
/// Dependencies on tasks the optimizer dropped are ignored by the
/// scheduler, like any other dangling dependency.
///
/// # Errors
/// * Any [`GraphError`] from scheduling the selected tasks
pub fn plan_within_budget(
    tasks: &[Task],
    max_budget: f64,
    config: &EngineConfig,
) -> Result<PlanResult, GraphError> {
    let optimization = optimize_for_budget(tasks, max_budget, config);
    let timeline = compute_timeline(&optimization.selected, config)?;
    Ok(PlanResult {
        optimization,
        timeline,
    })
}

/// Run one request without caching.
pub fn execute(request: &Request, config: &EngineConfig) -> Result<Response, GraphError> {
    let response = match request {
        Request::CriticalPath { tasks } => {
            Response::CriticalPath(compute_critical_path(tasks, config)?)
        }
        Request::Timeline { tasks } => Response::Timeline(compute_timeline(tasks, config)?),
        Request::PriorityScore {
            tasks,
            property_value,
            investment_strategy,
        } => Response::PriorityScore(score_priorities(
            tasks,
            *property_value,
            *investment_strategy,
            config,
        )),
        Request::BudgetOptimization { tasks, max_budget } => {
            Response::BudgetOptimization(optimize_for_budget(tasks, *max_budget, config))
        }
        Request::Plan { tasks, max_budget } => {
            Response::Plan(plan_within_budget(tasks, *max_budget, config)?)
        }
    };
    Ok(response)
}

/// Stateful front end: one config plus a response cache.
pub struct Engine {
    config: EngineConfig,
    cache: ResultCache,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_cache(config, ResultCache::default())
    }

    pub fn with_cache(config: EngineConfig, cache: ResultCache) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Serve a request, reusing the cached response for an identical
    /// request.
    ///
    /// The cache key covers the config as well, so a response computed
    /// under different thresholds is never reused.
    pub fn handle(&mut self, request: &Request) -> Result<String, EngineError> {
        let canonical = serde_json::to_string(&(&self.config, request))?;
        let config = &self.config;
        self.cache
            .get_or_try_insert_with(request.kind(), &canonical, || {
                let response = execute(request, config)?;
                Ok(serde_json::to_string(&response)?)
            })
    }

    /// Parse and serve a JSON request.
    pub fn handle_json(&mut self, request_json: &str) -> Result<String, EngineError> {
        let request: Request = serde_json::from_str(request_json)?;
        self.handle(&request)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriorityLevel;
    use serde_json::Value;

    const CHAIN_REQUEST: &str = r#"{
        "operation": "criticalPath",
        "tasks": [
            {"id": "a", "name": "Demo", "durationDays": 2, "priorityLevel": "must",
             "costTotal": 1000, "roiImpact": 5},
            {"id": "b", "name": "Framing", "durationDays": 3, "priorityLevel": "should",
             "dependsOn": ["a"]},
            {"id": "c", "name": "Drywall", "durationDays": 4, "priorityLevel": "could",
             "dependsOn": ["b"]}
        ]
    }"#;

    #[test]
    fn test_handle_json_critical_path() {
        let mut engine = Engine::default();
        let response: Value =
            serde_json::from_str(&engine.handle_json(CHAIN_REQUEST).unwrap()).unwrap();

        assert_eq!(response["projectDuration"], 9);
        assert_eq!(response["criticalPath"].as_array().unwrap().len(), 3);
        assert_eq!(response["taskTimings"][2]["earliestStart"], 6);
    }

    #[test]
    fn test_repeated_request_served_from_cache() {
        let mut engine = Engine::default();
        let first = engine.handle_json(CHAIN_REQUEST).unwrap();
        let second = engine.handle_json(CHAIN_REQUEST).unwrap();

        assert_eq!(first, second);
        assert_eq!(engine.cache().hits(), 1);
        assert_eq!(engine.cache().misses(), 1);
    }

    #[test]
    fn test_changed_task_misses_cache() {
        let mut engine = Engine::default();
        engine.handle_json(CHAIN_REQUEST).unwrap();
        let longer = CHAIN_REQUEST.replace("\"durationDays\": 4", "\"durationDays\": 6");
        let response: Value =
            serde_json::from_str(&engine.handle_json(&longer).unwrap()).unwrap();

        assert_eq!(response["projectDuration"], 11);
        assert_eq!(engine.cache().misses(), 2);
    }

    #[test]
    fn test_cycle_error_surfaces() {
        let request = r#"{
            "operation": "timeline",
            "tasks": [
                {"id": "a", "durationDays": 1, "priorityLevel": "must", "dependsOn": ["b"]},
                {"id": "b", "durationDays": 1, "priorityLevel": "must", "dependsOn": ["a"]}
            ]
        }"#;
        let mut engine = Engine::default();

        match engine.handle_json(request) {
            Err(EngineError::Graph(GraphError::CyclicDependency { cycle })) => {
                assert_eq!(cycle, vec!["a", "b", "a"]);
            }
            other => panic!("expected cycle error, got {:?}", other),
        }
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn test_malformed_request() {
        let mut engine = Engine::default();
        assert!(matches!(
            engine.handle_json(r#"{"operation": "teleport"}"#),
            Err(EngineError::Json(_))
        ));
    }

    #[test]
    fn test_priority_score_request_defaults_to_flip() {
        let request = r#"{
            "operation": "priorityScore",
            "tasks": [{"id": "panel", "category": "Electrical", "durationDays": 1,
                       "priorityLevel": "should", "costTotal": 3000, "roiImpact": 60}]
        }"#;
        let parsed: Request = serde_json::from_str(request).unwrap();
        match &parsed {
            Request::PriorityScore {
                property_value,
                investment_strategy,
                ..
            } => {
                assert_eq!(*property_value, None);
                assert_eq!(*investment_strategy, InvestmentStrategy::Flip);
            }
            other => panic!("unexpected request {:?}", other),
        }

        let mut engine = Engine::default();
        let response: Value = serde_json::from_str(&engine.handle(&parsed).unwrap()).unwrap();
        assert_eq!(response["scores"][0]["priorityClass"], "high");
    }

    #[test]
    fn test_budget_request() {
        let request = r#"{
            "operation": "budgetOptimization",
            "maxBudget": 900,
            "tasks": [
                {"id": "must", "durationDays": 1, "priorityLevel": "must",
                 "costTotal": 1000, "roiImpact": 20},
                {"id": "could", "durationDays": 1, "priorityLevel": "could",
                 "costTotal": 500, "roiImpact": 5}
            ]
        }"#;
        let mut engine = Engine::default();
        let response: Value =
            serde_json::from_str(&engine.handle_json(request).unwrap()).unwrap();

        assert_eq!(response["totalCost"], 1000.0);
        assert_eq!(response["budgetRemaining"], -100.0);
        assert_eq!(response["selected"][0]["id"], "must");
        assert_eq!(response["excluded"][0]["id"], "could");
        assert_eq!(response["forcedTaskIds"][0], "must");
        assert_eq!(response["overBudget"], true);
    }

    #[test]
    fn test_plan_schedules_only_selected_tasks() {
        let tasks = vec![
            Task::new("roof", 5, 8000.0, 20.0, PriorityLevel::Must).with_category("Roofing"),
            Task::new("pool", 10, 30000.0, 5.0, PriorityLevel::Nice),
            Task::new("paint", 3, 2000.0, 10.0, PriorityLevel::Should)
                .with_category("Paint")
                .with_dependencies(["roof", "pool"])
                .with_phase(2),
        ];
        let plan = plan_within_budget(&tasks, 12000.0, &EngineConfig::default()).unwrap();

        let selected: Vec<&str> = plan
            .optimization
            .selected
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        // paint has the best ratio; pool does not fit after the roof
        assert_eq!(selected, vec!["paint", "roof"]);
        assert_eq!(plan.timeline.total_days, 8);
        assert_eq!(plan.timeline.phases.len(), 2);
        assert_eq!(plan.timeline.critical_path, vec!["roof", "paint"]);
    }

    #[test]
    fn test_execute_is_idempotent() {
        let request: Request = serde_json::from_str(CHAIN_REQUEST).unwrap();
        let config = EngineConfig::default();

        let first = serde_json::to_string(&execute(&request, &config).unwrap()).unwrap();
        let second = serde_json::to_string(&execute(&request, &config).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
