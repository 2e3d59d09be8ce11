//! Core data types for renovation scope items.

use serde::{Deserialize, Serialize};

/// Ordinal urgency hint supplied with each task.
///
/// Variants are declared from least to most urgent so the derived `Ord`
/// matches the urgency ordering (`Nice < Could < Should < Must`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Nice,
    Could,
    Should,
    Must,
}

impl PriorityLevel {
    /// Adjustment applied to the base urgency score.
    pub fn urgency_adjustment(self) -> f64 {
        match self {
            PriorityLevel::Must => 30.0,
            PriorityLevel::Should => 15.0,
            PriorityLevel::Could => -10.0,
            PriorityLevel::Nice => -25.0,
        }
    }
}

/// Investment strategy of the project owner; selects the scoring weights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStrategy {
    #[default]
    Flip,
    Rental,
    Wholetail,
    Airbnb,
    #[serde(other)]
    Other,
}

fn default_included() -> bool {
    true
}

fn default_phase() -> i32 {
    1
}

/// A renovation task (scope item).
///
/// Immutable for the duration of one computation. Only tasks with
/// `included == true` take part in scheduling and budget optimization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default, alias = "itemName")]
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Working days needed once started. Must be >= 1 to be scheduled.
    #[serde(alias = "daysRequired")]
    pub duration_days: i64,
    #[serde(default, alias = "totalCost")]
    pub cost_total: f64,
    #[serde(default)]
    pub roi_impact: f64,
    #[serde(alias = "priority")]
    pub priority_level: PriorityLevel,
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Caller-assigned planning bucket; not derived from timing.
    #[serde(default = "default_phase")]
    pub phase: i32,
    #[serde(default = "default_included")]
    pub included: bool,
}

impl Task {
    /// Create an included task with no dependencies in phase 1.
    pub fn new(
        id: impl Into<String>,
        duration_days: i64,
        cost_total: f64,
        roi_impact: f64,
        priority_level: PriorityLevel,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category: String::new(),
            duration_days,
            cost_total,
            roi_impact,
            priority_level,
            depends_on: Vec::new(),
            phase: default_phase(),
            included: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_phase(mut self, phase: i32) -> Self {
        self.phase = phase;
        self
    }

    pub fn excluded(mut self) -> Self {
        self.included = false;
        self
    }

    /// ROI value gained per unit of cost.
    ///
    /// Zero-cost tasks with positive ROI rank first (infinite efficiency);
    /// zero-cost tasks without ROI rank as zero.
    pub fn roi_per_dollar(&self) -> f64 {
        if self.cost_total > 0.0 {
            self.roi_impact / self.cost_total
        } else if self.roi_impact > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_level_ordering() {
        assert!(PriorityLevel::Nice < PriorityLevel::Could);
        assert!(PriorityLevel::Could < PriorityLevel::Should);
        assert!(PriorityLevel::Should < PriorityLevel::Must);
    }

    #[test]
    fn test_deserialize_scope_item_aliases() {
        let json = r#"{
            "id": "roof",
            "itemName": "Replace roof",
            "category": "Roofing",
            "daysRequired": 4,
            "totalCost": 12000,
            "roiImpact": 20,
            "priority": "must",
            "dependsOn": ["permit"],
            "phase": 1,
            "included": true
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.name, "Replace roof");
        assert_eq!(task.duration_days, 4);
        assert_eq!(task.cost_total, 12000.0);
        assert_eq!(task.priority_level, PriorityLevel::Must);
        assert_eq!(task.depends_on, vec!["permit".to_string()]);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"id": "paint", "durationDays": 2, "priorityLevel": "nice"}"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert!(task.included);
        assert_eq!(task.phase, 1);
        assert!(task.depends_on.is_empty());
        assert_eq!(task.cost_total, 0.0);
    }

    #[test]
    fn test_unknown_strategy_maps_to_other() {
        let strategy: InvestmentStrategy = serde_json::from_str(r#""brrrr""#).unwrap();
        assert_eq!(strategy, InvestmentStrategy::Other);
        assert_eq!(InvestmentStrategy::default(), InvestmentStrategy::Flip);
    }

    #[test]
    fn test_roi_per_dollar() {
        let task = Task::new("a", 1, 200.0, 10.0, PriorityLevel::Should);
        assert!((task.roi_per_dollar() - 0.05).abs() < 1e-12);

        let free = Task::new("b", 1, 0.0, 10.0, PriorityLevel::Should);
        assert!(free.roi_per_dollar().is_infinite());

        let worthless = Task::new("c", 1, 0.0, 0.0, PriorityLevel::Should);
        assert_eq!(worthless.roi_per_dollar(), 0.0);
    }
}
