//! Objective progress, the mid-mandate checkpoint and the victory condition.
use serde::{Deserialize, Serialize};

use crate::kpi::{Kpi, calculate_trend, find_kpi};
use crate::numbers::{round_f64_to_i32, usize_to_f64};
use crate::objectives::{
    Comparator, EvaluationMethod, EvaluationWindow, Objective, ObjectiveCheck, TargetLevel,
    find_objective,
};
use crate::state::GameState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatus {
    pub check_index: usize,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveProgress {
    pub objective_id: String,
    pub label: String,
    pub checks_status: Vec<CheckStatus>,
    pub overall_passed: bool,
    pub progress_pct: i32,
}

impl ObjectiveProgress {
    /// Placeholder for a selected id that no longer matches an objective.
    #[must_use]
    pub fn unknown(objective_id: &str) -> Self {
        Self {
            objective_id: objective_id.to_string(),
            label: "Unknown".to_string(),
            checks_status: Vec::new(),
            overall_passed: false,
            progress_pct: 0,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / usize_to_f64(values.len())
}

/// Whether `kpi` satisfies `check` over the trailing `window`.
///
/// Trend comparators read the slope of the window. Numeric comparators read
/// the window's last value, mean or slope depending on `window.method`, and
/// accept `tolerance` units of slack.
#[must_use]
pub fn evaluate_check(
    check: &ObjectiveCheck,
    kpi: &Kpi,
    window: EvaluationWindow,
    tolerance: f64,
) -> bool {
    let values = kpi.last_n_values(window.months);
    let Some(&last) = values.last() else {
        return false;
    };

    let observed = if check.comparator.is_trend() {
        calculate_trend(&values)
    } else {
        match window.method {
            EvaluationMethod::Last => last,
            EvaluationMethod::Avg => mean(&values),
            EvaluationMethod::Trend => calculate_trend(&values),
        }
    };

    match check.comparator {
        Comparator::TrendUp => observed > 0.0,
        Comparator::TrendDown => observed < 0.0,
        Comparator::AtMost => check.value.is_some_and(|target| observed <= target + tolerance),
        Comparator::AtLeast => check.value.is_some_and(|target| observed >= target - tolerance),
    }
}

#[must_use]
pub fn evaluate_objective(objective: &Objective, kpis: &[Kpi], level: TargetLevel) -> ObjectiveProgress {
    let target = objective.difficulty_targets.for_level(level);
    let tolerance = target.tolerance.unwrap_or(0.0);

    let checks_status: Vec<CheckStatus> = objective
        .checks
        .iter()
        .enumerate()
        .map(|(check_index, check)| match find_kpi(kpis, &check.kpi_id) {
            Some(kpi) => CheckStatus {
                check_index,
                passed: evaluate_check(check, kpi, objective.evaluation_window, tolerance),
                current_value: Some(kpi.current_value()),
                target_value: check.value,
            },
            None => CheckStatus {
                check_index,
                passed: false,
                current_value: None,
                target_value: None,
            },
        })
        .collect();

    let passed = checks_status.iter().filter(|status| status.passed).count();
    let progress_pct = if checks_status.is_empty() {
        0
    } else {
        round_f64_to_i32(100.0 * usize_to_f64(passed) / usize_to_f64(checks_status.len()))
    };

    ObjectiveProgress {
        objective_id: objective.objective_id.clone(),
        label: objective.label.clone(),
        checks_status,
        overall_passed: passed >= target.required_count,
        progress_pct,
    }
}

/// Progress of every selected objective, in selection order.
#[must_use]
pub fn selected_progress(state: &GameState) -> Vec<ObjectiveProgress> {
    state
        .selected_objectives
        .iter()
        .map(|objective_id| {
            find_objective(&state.objectives, objective_id).map_or_else(
                || ObjectiveProgress::unknown(objective_id),
                |objective| evaluate_objective(objective, &state.kpis, state.target_level),
            )
        })
        .collect()
}

/// Number of selected objectives currently met.
#[must_use]
pub fn completed_objectives(state: &GameState) -> usize {
    selected_progress(state)
        .iter()
        .filter(|progress| progress.overall_passed)
        .count()
}

/// Passes trivially before the halfway month, then requires
/// `midCheckpointMin` objectives to hold.
#[must_use]
pub fn check_mid_game_checkpoint(state: &GameState) -> bool {
    let selection = state.difficulty.objective_selection;
    if state.current_month < selection.mid_checkpoint_month() {
        return true;
    }
    completed_objectives(state) >= selection.mid_checkpoint_min
}

#[must_use]
pub fn check_victory(state: &GameState) -> bool {
    completed_objectives(state) >= state.difficulty.objective_selection.must_complete
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kpi::{Direction, HistoryEntry, KpiBounds, KpiSource, Ministry};
    use crate::objectives::{DifficultyTargets, TargetSet};

    fn kpi(id: &str, values: &[f64]) -> Kpi {
        Kpi {
            kpi_id: id.into(),
            ministry: Ministry::Health,
            label: id.into(),
            unit: String::new(),
            direction: Direction::IncreaseGood,
            bounds: KpiBounds {
                min: 0.0,
                max: 100.0,
            },
            history: values
                .iter()
                .enumerate()
                .map(|(i, value)| HistoryEntry {
                    date: format!("2025-{:02}", i + 1),
                    value: *value,
                })
                .collect(),
            weight_in_ipm: 1.0,
            source: KpiSource::default(),
            last_updated: String::new(),
        }
    }

    fn check(kpi_id: &str, comparator: Comparator, value: Option<f64>) -> ObjectiveCheck {
        ObjectiveCheck {
            kpi_id: kpi_id.into(),
            comparator,
            value,
        }
    }

    fn window(months: usize, method: EvaluationMethod) -> EvaluationWindow {
        EvaluationWindow { months, method }
    }

    fn targets(required: usize) -> DifficultyTargets {
        let set = TargetSet {
            required_count: required,
            tolerance: None,
        };
        DifficultyTargets {
            easy: TargetSet {
                required_count: 1,
                tolerance: Some(5.0),
            },
            normal: set,
            hard: set,
        }
    }

    #[test]
    fn numeric_checks_use_method_value() {
        let series = kpi("k", &[10.0, 20.0, 60.0]);
        let at_least_30 = check("k", Comparator::AtLeast, Some(30.0));
        assert!(evaluate_check(&at_least_30, &series, window(3, EvaluationMethod::Avg), 0.0));
        assert!(evaluate_check(&at_least_30, &series, window(1, EvaluationMethod::Last), 0.0));
        // slope of 10, 20, 60 is 25
        assert!(!evaluate_check(&at_least_30, &series, window(3, EvaluationMethod::Trend), 0.0));
        assert!(evaluate_check(&at_least_30, &series, window(3, EvaluationMethod::Trend), 5.0));

        let at_least_45 = check("k", Comparator::AtLeast, Some(45.0));
        assert!(!evaluate_check(&at_least_45, &series, window(2, EvaluationMethod::Avg), 0.0));
        assert!(evaluate_check(&at_least_45, &series, window(2, EvaluationMethod::Avg), 5.0));

        let at_most_15 = check("k", Comparator::AtMost, Some(15.0));
        assert!(evaluate_check(&at_most_15, &kpi("k", &[10.0]), window(3, EvaluationMethod::Last), 0.0));
        let missing_target = check("k", Comparator::AtMost, None);
        assert!(!evaluate_check(&missing_target, &series, window(3, EvaluationMethod::Last), 0.0));
    }

    #[test]
    fn trend_comparators_read_the_slope() {
        let rising = kpi("k", &[1.0, 2.0, 4.0]);
        let up = check("k", Comparator::TrendUp, None);
        let down = check("k", Comparator::TrendDown, None);
        for method in [EvaluationMethod::Last, EvaluationMethod::Avg, EvaluationMethod::Trend] {
            assert!(evaluate_check(&up, &rising, window(3, method), 0.0));
            assert!(!evaluate_check(&down, &rising, window(3, method), 0.0));
        }
        let flat = kpi("k", &[5.0, 5.0]);
        assert!(!evaluate_check(&up, &flat, window(2, EvaluationMethod::Trend), 0.0));
        assert!(!evaluate_check(&down, &flat, window(2, EvaluationMethod::Trend), 0.0));
        // slack only widens numeric targets
        assert!(!evaluate_check(&up, &flat, window(2, EvaluationMethod::Avg), 5.0));
    }

    #[test]
    fn empty_windows_fail() {
        let up = check("k", Comparator::AtLeast, Some(0.0));
        assert!(!evaluate_check(&up, &kpi("k", &[]), window(3, EvaluationMethod::Last), 0.0));
        assert!(!evaluate_check(&up, &kpi("k", &[5.0]), window(0, EvaluationMethod::Last), 0.0));
    }

    #[test]
    fn objective_progress_counts_checks() {
        let objective = Objective {
            objective_id: "health".into(),
            label: "Santé".into(),
            description: String::new(),
            checks: vec![
                check("beds", Comparator::AtLeast, Some(50.0)),
                check("wait", Comparator::AtMost, Some(10.0)),
                check("retired", Comparator::AtLeast, Some(1.0)),
            ],
            evaluation_window: window(1, EvaluationMethod::Last),
            difficulty_targets: targets(2),
        };
        let kpis = vec![kpi("beds", &[60.0]), kpi("wait", &[12.0])];

        let normal = evaluate_objective(&objective, &kpis, TargetLevel::Normal);
        assert_eq!(normal.progress_pct, 33);
        assert!(!normal.overall_passed);
        assert_eq!(normal.checks_status[0].current_value, Some(60.0));
        assert_eq!(normal.checks_status[1].target_value, Some(10.0));
        assert_eq!(normal.checks_status[2].current_value, None);

        let easy = evaluate_objective(&objective, &kpis, TargetLevel::Easy);
        assert_eq!(easy.progress_pct, 67);
        assert!(easy.overall_passed);
    }
}
