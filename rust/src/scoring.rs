//! Priority scoring: urgency, ROI and cost-efficiency per task.
//!
//! Scores are a pure function of each task's own fields and the investment
//! strategy; they do not depend on the schedule.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::models::{InvestmentStrategy, Task};

/// Final priority classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityClass {
    Critical,
    High,
    Medium,
    Low,
}

/// Scoring category inferred from the task's free-text category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreCategory {
    Safety,
    Structural,
    Systems,
    Cosmetic,
    Optional,
}

impl ScoreCategory {
    /// Keyword match on the lowercased category; earlier groups win.
    pub fn from_category(category: &str) -> Self {
        let category = category.to_lowercase();
        let has = |keywords: &[&str]| keywords.iter().any(|k| category.contains(k));

        if has(&["electrical", "plumbing", "hvac"]) {
            ScoreCategory::Systems
        } else if has(&["foundation", "roof", "structural"]) {
            ScoreCategory::Structural
        } else if has(&["safety", "code"]) {
            ScoreCategory::Safety
        } else if has(&["paint", "flooring", "cosmetic"]) {
            ScoreCategory::Cosmetic
        } else {
            ScoreCategory::Optional
        }
    }

    pub fn urgency_adjustment(self) -> f64 {
        match self {
            ScoreCategory::Safety => 20.0,
            ScoreCategory::Structural => 15.0,
            ScoreCategory::Systems => 10.0,
            ScoreCategory::Cosmetic => -5.0,
            ScoreCategory::Optional => -15.0,
        }
    }
}

/// Weights of the three sub-scores in the overall score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoringWeights {
    pub urgency: f64,
    pub roi: f64,
    pub cost_efficiency: f64,
}

impl ScoringWeights {
    /// Flips weight ROI most heavily; every other strategy favors urgency.
    pub fn for_strategy(strategy: InvestmentStrategy) -> Self {
        match strategy {
            InvestmentStrategy::Flip => Self {
                urgency: 0.3,
                roi: 0.5,
                cost_efficiency: 0.2,
            },
            _ => Self {
                urgency: 0.4,
                roi: 0.3,
                cost_efficiency: 0.2,
            },
        }
    }
}

const BASE_URGENCY: f64 = 50.0;
const URGENCY_PER_DEPENDENCY: f64 = 5.0;

/// Cost-per-ROI-point upper bounds and the score awarded below each.
const COST_EFFICIENCY_BUCKETS: &[(f64, f64)] =
    &[(100.0, 90.0), (200.0, 75.0), (500.0, 60.0), (1000.0, 40.0)];
const COST_EFFICIENCY_FLOOR: f64 = 20.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityScore {
    pub task_id: String,
    pub task_name: String,
    pub urgency_score: f64,
    pub roi_score: f64,
    pub cost_efficiency_score: f64,
    pub overall_score: f64,
    pub priority_class: PriorityClass,
    pub category: ScoreCategory,
    pub recommendation: String,
}

/// Task ids bucketed by urgency x ROI for a 2x2 matrix view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityMatrix {
    #[serde(rename = "highUrgencyHighROI")]
    pub high_urgency_high_roi: Vec<String>,
    #[serde(rename = "highUrgencyLowROI")]
    pub high_urgency_low_roi: Vec<String>,
    #[serde(rename = "lowUrgencyHighROI")]
    pub low_urgency_high_roi: Vec<String>,
    #[serde(rename = "lowUrgencyLowROI")]
    pub low_urgency_low_roi: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStatistics {
    pub total_items: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub average_score: f64,
    pub total_cost: f64,
    /// Scope cost as a percentage of property value, when a value is known.
    pub cost_to_value_percent: Option<f64>,
}

/// Output of [`score_priorities`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityScoreResult {
    /// Scores sorted by overall score, highest first (stable).
    pub scores: Vec<PriorityScore>,
    pub matrix: PriorityMatrix,
    pub statistics: ScoreStatistics,
}

/// Urgency: base 50, adjusted by priority level, category and dependency
/// count, clamped to 0-100.
pub fn urgency_score(task: &Task, category: ScoreCategory) -> f64 {
    let score = BASE_URGENCY
        + task.priority_level.urgency_adjustment()
        + category.urgency_adjustment()
        + task.depends_on.len() as f64 * URGENCY_PER_DEPENDENCY;
    score.clamp(0.0, 100.0)
}

/// Bucketed score for cost per ROI point; tasks without positive ROI get
/// the floor.
pub fn cost_efficiency_score(task: &Task) -> f64 {
    let ratio = if task.roi_impact > 0.0 {
        task.cost_total / task.roi_impact
    } else {
        f64::INFINITY
    };
    COST_EFFICIENCY_BUCKETS
        .iter()
        .find(|&&(limit, _)| ratio < limit)
        .map_or(COST_EFFICIENCY_FLOOR, |&(_, score)| score)
}

fn classify(overall: f64, category: ScoreCategory) -> PriorityClass {
    if overall >= 80.0 || category == ScoreCategory::Safety {
        PriorityClass::Critical
    } else if overall >= 60.0 {
        PriorityClass::High
    } else if overall >= 40.0 {
        PriorityClass::Medium
    } else {
        PriorityClass::Low
    }
}

fn recommend(
    task: &Task,
    category: ScoreCategory,
    class: PriorityClass,
    roi: f64,
    cost_efficiency: f64,
) -> &'static str {
    if category == ScoreCategory::Safety {
        return "Must be completed for safety compliance - highest priority";
    }
    match class {
        PriorityClass::Critical if roi > 70.0 => "High ROI and urgent - prioritize in Phase 1",
        PriorityClass::Critical => "Critical for project success - schedule early",
        PriorityClass::High if cost_efficiency > 70.0 => {
            "Good value for money - include in main scope"
        }
        PriorityClass::High if roi > 60.0 => "Strong ROI potential - recommended for inclusion",
        PriorityClass::High => "Important but not critical - Phase 2 or 3",
        PriorityClass::Medium if task.cost_total < 1000.0 => {
            "Low cost item - consider including if budget allows"
        }
        PriorityClass::Medium => "Optional enhancement - evaluate based on budget",
        PriorityClass::Low if cost_efficiency < 40.0 => {
            "Low cost efficiency - consider removing or downgrading"
        }
        PriorityClass::Low => "Low priority - defer or eliminate if over budget",
    }
}

/// Score a single task.
pub fn score_task(task: &Task, weights: &ScoringWeights) -> PriorityScore {
    let category = ScoreCategory::from_category(&task.category);
    let urgency = urgency_score(task, category);
    let roi = task.roi_impact.clamp(0.0, 100.0);
    let cost_efficiency = cost_efficiency_score(task);

    let overall =
        urgency * weights.urgency + roi * weights.roi + cost_efficiency * weights.cost_efficiency;
    let class = classify(overall, category);

    PriorityScore {
        task_id: task.id.clone(),
        task_name: task.name.clone(),
        urgency_score: urgency,
        roi_score: roi,
        cost_efficiency_score: cost_efficiency,
        overall_score: overall,
        priority_class: class,
        category,
        recommendation: recommend(task, category, class, roi, cost_efficiency).to_string(),
    }
}

/// Score every task, rank by overall score and bucket into the matrix.
///
/// Scoring does not look at `included`: excluded scope items are scored
/// too, so callers can decide what to bring back into scope.
pub fn score_priorities(
    tasks: &[Task],
    property_value: Option<f64>,
    strategy: InvestmentStrategy,
    config: &EngineConfig,
) -> PriorityScoreResult {
    let weights = ScoringWeights::for_strategy(strategy);
    let mut scores: Vec<PriorityScore> = tasks.iter().map(|t| score_task(t, &weights)).collect();
    // Vec::sort_by is stable, so equal scores keep input order
    scores.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));

    let threshold = config.matrix_threshold;
    let mut matrix = PriorityMatrix::default();
    for score in &scores {
        let bucket = match (
            score.urgency_score >= threshold,
            score.roi_score >= threshold,
        ) {
            (true, true) => &mut matrix.high_urgency_high_roi,
            (true, false) => &mut matrix.high_urgency_low_roi,
            (false, true) => &mut matrix.low_urgency_high_roi,
            (false, false) => &mut matrix.low_urgency_low_roi,
        };
        bucket.push(score.task_id.clone());
    }

    let count = |class: PriorityClass| scores.iter().filter(|s| s.priority_class == class).count();
    let total_cost: f64 = tasks.iter().map(|t| t.cost_total).sum();
    let average_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().map(|s| s.overall_score).sum::<f64>() / scores.len() as f64
    };
    let statistics = ScoreStatistics {
        total_items: scores.len(),
        critical: count(PriorityClass::Critical),
        high: count(PriorityClass::High),
        medium: count(PriorityClass::Medium),
        low: count(PriorityClass::Low),
        average_score,
        total_cost,
        cost_to_value_percent: property_value
            .filter(|&value| value > 0.0)
            .map(|value| total_cost / value * 100.0),
    };

    PriorityScoreResult {
        scores,
        matrix,
        statistics,
    }
}
