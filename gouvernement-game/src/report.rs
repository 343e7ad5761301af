//! Month-end summary assembled from a snapshot.
use serde::{Deserialize, Serialize};

use crate::aggregators::{MinistryIpm, calculate_all_ipms, calculate_igg};
use crate::cards::find_card;
use crate::counters::GlobalCounters;
use crate::state::{GameState, GameStatus, PlayedCard};
use crate::troika::{TroikaLevel, WarningLevel, danger_level, troika_warnings, warning_level};
use crate::victory::{ObjectiveProgress, selected_progress};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub revenue: f64,
    pub spending: f64,
    pub balance: f64,
    pub debt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month: u32,
    pub status: GameStatus,
    pub igg: i32,
    pub danger_level: i32,
    pub troika_level: TroikaLevel,
    pub troika_label: String,
    pub warning_level: WarningLevel,
    pub troika_warnings: Vec<String>,
    pub objectives_progress: Vec<ObjectiveProgress>,
    pub ministries: Vec<MinistryIpm>,
    pub counters: GlobalCounters,
    pub cards_played: Vec<PlayedCard>,
    /// Titles of the event cards resolved this month.
    pub events: Vec<String>,
    pub budget_summary: BudgetSummary,
}

#[must_use]
pub fn generate_monthly_report(state: &GameState) -> MonthlyReport {
    let thresholds = &state.difficulty.troika_thresholds;
    let danger = danger_level(&state.budget, &state.counters, thresholds);
    let troika_level = TroikaLevel::from_danger(danger);

    let mut cards_played = Vec::new();
    let mut events = Vec::new();
    for played in state.played_in(state.current_month) {
        match find_card(&state.cards, &played.card_id) {
            Some(card) if card.is_event() => events.push(card.display_title().to_string()),
            _ => cards_played.push(played.clone()),
        }
    }

    MonthlyReport {
        month: state.current_month,
        status: state.status,
        igg: calculate_igg(&state.kpis, &state.difficulty.weights),
        danger_level: danger,
        troika_level,
        troika_label: troika_level.label().to_string(),
        warning_level: warning_level(&state.budget, &state.counters, thresholds),
        troika_warnings: troika_warnings(&state.budget, &state.counters, thresholds),
        objectives_progress: selected_progress(state),
        ministries: calculate_all_ipms(&state.kpis),
        counters: state.counters,
        cards_played,
        events,
        budget_summary: BudgetSummary {
            revenue: state.budget.revenue,
            spending: state.budget.spending,
            balance: state.budget.balance(),
            debt: state.budget.debt,
        },
    }
}
