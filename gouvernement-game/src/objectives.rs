use serde::{Deserialize, Serialize};

/// How a check compares the evaluated KPI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "<=")]
    AtMost,
    #[serde(rename = ">=")]
    AtLeast,
    #[serde(rename = "trend_up")]
    TrendUp,
    #[serde(rename = "trend_down")]
    TrendDown,
}

impl Comparator {
    #[must_use]
    pub const fn is_trend(self) -> bool {
        matches!(self, Self::TrendUp | Self::TrendDown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMethod {
    Last,
    Avg,
    Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationWindow {
    pub months: usize,
    pub method: EvaluationMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSet {
    pub required_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTargets {
    pub easy: TargetSet,
    pub normal: TargetSet,
    pub hard: TargetSet,
}

impl DifficultyTargets {
    #[must_use]
    pub const fn for_level(&self, level: TargetLevel) -> TargetSet {
        match level {
            TargetLevel::Easy => self.easy,
            TargetLevel::Normal => self.normal,
            TargetLevel::Hard => self.hard,
        }
    }
}

/// Which row of [`DifficultyTargets`] a playthrough is judged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TargetLevel {
    Easy,
    #[default]
    Normal,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveCheck {
    pub kpi_id: String,
    pub comparator: Comparator,
    /// Required for numeric comparators, ignored by trend comparators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub objective_id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub checks: Vec<ObjectiveCheck>,
    pub evaluation_window: EvaluationWindow,
    pub difficulty_targets: DifficultyTargets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ObjectivesDataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub objectives: Vec<Objective>,
}

impl ObjectivesDataset {
    /// Load an objectives dataset from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a valid dataset.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[must_use]
pub fn find_objective<'a>(objectives: &'a [Objective], objective_id: &str) -> Option<&'a Objective> {
    objectives
        .iter()
        .find(|objective| objective.objective_id == objective_id)
}
