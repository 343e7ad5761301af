//! Difficulty configuration: objective quotas, Troika thresholds and IGG weights.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{DEFAULT_INTEREST_RATE, DEFAULT_MINISTRY_WEIGHT, MONTHS_PER_YEAR};
use crate::kpi::Ministry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyMode {
    #[default]
    Moderate,
    Severe,
    Extreme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveSelection {
    /// Objectives picked at the start; each one adds a year to the mandate.
    pub choose: u32,
    pub must_complete: usize,
    pub mid_checkpoint_min: usize,
}

impl ObjectiveSelection {
    #[must_use]
    pub const fn total_months(self) -> u32 {
        self.choose.saturating_mul(MONTHS_PER_YEAR)
    }

    #[must_use]
    pub const fn mid_checkpoint_month(self) -> u32 {
        self.total_months() / 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TroikaThresholds {
    /// Deficit limit as a signed balance in % of GDP (e.g. `-3`).
    pub deficit_pct: f64,
    /// Consecutive months before intervention. Carried, not enforced.
    #[serde(default)]
    pub months: u32,
    pub debt_pct: f64,
    pub cm_min: f64,
    pub interest_to_revenue_pct: f64,
    /// Flat annual rate used to estimate interest payments.
    #[serde(default = "TroikaThresholds::default_interest_rate")]
    pub interest_rate: f64,
}

impl TroikaThresholds {
    const fn default_interest_rate() -> f64 {
        DEFAULT_INTEREST_RATE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Weights {
    #[serde(default)]
    pub ministries: BTreeMap<Ministry, f64>,
}

impl Weights {
    /// IGG weight of a ministry; unlisted ministries weigh 1.
    #[must_use]
    pub fn ministry(&self, ministry: Ministry) -> f64 {
        self.ministries
            .get(&ministry)
            .copied()
            .unwrap_or(DEFAULT_MINISTRY_WEIGHT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyDataset {
    #[serde(default)]
    pub mode: DifficultyMode,
    pub objective_selection: ObjectiveSelection,
    pub troika_thresholds: TroikaThresholds,
    #[serde(default)]
    pub weights: Weights,
}

impl DifficultyDataset {
    /// Load a difficulty configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interest_rate_defaults_when_absent() {
        let json = r#"{
            "mode": "severe",
            "objectiveSelection": {"choose": 3, "mustComplete": 2, "midCheckpointMin": 1},
            "troikaThresholds": {
                "deficitPct": -3, "months": 3, "debtPct": 120,
                "cmMin": 35, "interestToRevenuePct": 12
            },
            "weights": {"ministries": {"EconomyFinance": 2, "Health": 0}}
        }"#;
        let difficulty = DifficultyDataset::from_json(json).expect("difficulty parse");
        assert_eq!(difficulty.mode, DifficultyMode::Severe);
        assert!((difficulty.troika_thresholds.interest_rate - 0.03).abs() < f64::EPSILON);
        assert_eq!(difficulty.objective_selection.total_months(), 36);
        assert_eq!(difficulty.objective_selection.mid_checkpoint_month(), 18);

        let weights = &difficulty.weights;
        assert!((weights.ministry(Ministry::EconomyFinance) - 2.0).abs() < f64::EPSILON);
        assert!(weights.ministry(Ministry::Health).abs() < f64::EPSILON);
        assert!((weights.ministry(Ministry::Transport) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn odd_mandates_round_the_checkpoint_down() {
        let selection = ObjectiveSelection {
            choose: 1,
            must_complete: 1,
            mid_checkpoint_min: 0,
        };
        assert_eq!(selection.mid_checkpoint_month(), 6);
        let selection = ObjectiveSelection {
            choose: 0,
            ..selection
        };
        assert_eq!(selection.mid_checkpoint_month(), 0);
    }
}
