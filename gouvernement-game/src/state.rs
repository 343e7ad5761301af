//! Game snapshot and the two transitions that move it forward.
//!
//! Transitions never mutate their input: they clone the snapshot, apply the
//! change to the clone and hand it back. Reference data is shared through
//! `Arc`, so only the per-playthrough collections are actually copied.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::aggregators::calculate_risk_damp;
use crate::cards::{Card, CausalityRules, Effect, Lags, Profile, find_card};
use crate::causality::{RuleTrace, apply_causality_rules};
use crate::constants::{
    DEFAULT_START_DATE, INITIAL_DEBT, INITIAL_GDP, INITIAL_REVENUE, INITIAL_SPENDING,
    REASON_END_OF_MANDATE, REASON_MID_CHECKPOINT,
};
use crate::counters::{GlobalCounters, derive_from_kpis};
use crate::data::Datasets;
use crate::difficulty::DifficultyDataset;
use crate::effects::active_effects;
use crate::events::{EVENT_OPTION_INDEX, draw_event_card};
use crate::kpi::{DateError, Kpi, YearMonth};
use crate::objectives::{Objective, TargetLevel};
use crate::troika::check_troika_defeat;
use crate::victory::{check_mid_game_checkpoint, check_victory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Playing,
    Victory,
    Defeat,
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Playing => "playing",
            Self::Victory => "victory",
            Self::Defeat => "defeat",
        })
    }
}

/// Simplified public finances, in billions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub revenue: f64,
    pub spending: f64,
    pub debt: f64,
    pub gdp: f64,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            revenue: INITIAL_REVENUE,
            spending: INITIAL_SPENDING,
            debt: INITIAL_DEBT,
            gdp: INITIAL_GDP,
        }
    }
}

fn percent_of(value: f64, base: f64) -> f64 {
    if base == 0.0 { 0.0 } else { value / base * 100.0 }
}

impl Budget {
    /// Revenue minus spending; negative when in deficit.
    #[must_use]
    pub fn balance(&self) -> f64 {
        self.revenue - self.spending
    }

    /// Deficit in % of GDP, positive when spending exceeds revenue.
    #[must_use]
    pub fn deficit_pct_gdp(&self) -> f64 {
        percent_of(self.spending - self.revenue, self.gdp)
    }

    #[must_use]
    pub fn debt_pct_gdp(&self) -> f64 {
        percent_of(self.debt, self.gdp)
    }

    /// Interest payments over `period_rate` as a share of revenue.
    #[must_use]
    pub fn interest_to_revenue_pct(&self, period_rate: f64) -> f64 {
        percent_of(self.debt * period_rate, self.revenue)
    }

    /// Month-end roll: the imbalance is added to the debt whatever its sign.
    #[must_use]
    pub fn month_end(self) -> Self {
        Self {
            debt: self.debt + self.balance().abs(),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedCard {
    pub card_id: String,
    pub option_index: usize,
    pub played_at: u32,
}

/// One effect of a played option with its own timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledEffect {
    pub effect_id: String,
    pub card_id: String,
    pub option_index: usize,
    pub effect: Effect,
    pub lags: Lags,
    pub applied_at: u32,
    pub profile: Profile,
    #[serde(default, skip_serializing_if = "RuleTrace::is_empty")]
    pub synergies_applied: RuleTrace,
    #[serde(default, skip_serializing_if = "RuleTrace::is_empty")]
    pub antagonisms_applied: RuleTrace,
}

#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("unknown card '{card_id}'")]
    UnknownCard { card_id: String },
    #[error("card '{card_id}' has no option {index} ({available} available)")]
    OptionOutOfRange {
        card_id: String,
        index: usize,
        available: usize,
    },
    #[error("game is over ({status})")]
    NotPlaying { status: GameStatus },
    #[error(transparent)]
    InvalidDate(#[from] DateError),
}

/// Aggregate root of a playthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub save_id: String,
    pub seed: u32,
    pub current_month: u32,
    pub start_date: String,
    pub kpis: Vec<Kpi>,
    pub cards: Arc<Vec<Card>>,
    pub objectives: Arc<Vec<Objective>>,
    pub difficulty: Arc<DifficultyDataset>,
    #[serde(default)]
    pub rules: Arc<CausalityRules>,
    pub selected_objectives: Vec<String>,
    #[serde(default)]
    pub target_level: TargetLevel,
    pub counters: GlobalCounters,
    pub budget: Budget,
    pub played_cards: Vec<PlayedCard>,
    pub scheduled_effects: Vec<ScheduledEffect>,
    pub status: GameStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defeat_reason: Option<String>,
}

impl GameState {
    /// Fresh playthrough at month 0. `seed` is derived by the caller, usually
    /// with [`crate::seed::seed_for_save_id`].
    #[must_use]
    pub fn new(
        save_id: impl Into<String>,
        seed: u32,
        datasets: &Datasets,
        selected_objectives: Vec<String>,
    ) -> Self {
        let start_date = datasets
            .kpis
            .kpis
            .first()
            .and_then(|kpi| kpi.history.last())
            .map_or_else(|| DEFAULT_START_DATE.to_string(), |entry| entry.date.clone());

        Self {
            save_id: save_id.into(),
            seed,
            current_month: 0,
            start_date,
            kpis: datasets.kpis.kpis.clone(),
            cards: Arc::new(datasets.cards.cards.clone()),
            objectives: Arc::new(datasets.objectives.objectives.clone()),
            difficulty: Arc::new(datasets.difficulty.clone()),
            rules: Arc::new(datasets.cards.rules()),
            selected_objectives,
            target_level: TargetLevel::default(),
            counters: GlobalCounters::default(),
            budget: Budget::default(),
            played_cards: Vec::new(),
            scheduled_effects: Vec::new(),
            status: GameStatus::Playing,
            defeat_reason: None,
        }
    }

    /// # Errors
    ///
    /// Returns an error when `start_date` is not a `YYYY-MM` stamp.
    pub fn start(&self) -> Result<YearMonth, DateError> {
        self.start_date.parse()
    }

    /// Calendar stamp of the current month.
    ///
    /// # Errors
    ///
    /// Returns an error when `start_date` is not a `YYYY-MM` stamp.
    pub fn current_date(&self) -> Result<YearMonth, DateError> {
        Ok(self.start()?.after(self.current_month))
    }

    /// Length of the mandate in months.
    #[must_use]
    pub fn total_months(&self) -> u32 {
        self.difficulty.objective_selection.total_months()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Cards played during `month`.
    pub fn played_in(&self, month: u32) -> impl Iterator<Item = &PlayedCard> {
        self.played_cards
            .iter()
            .filter(move |played| played.played_at == month)
    }

    /// Play an option against this snapshot's own rule book.
    ///
    /// # Errors
    ///
    /// See [`play_card`].
    pub fn play(&self, card_id: &str, option_index: usize) -> Result<Self, GameError> {
        play_card(self, card_id, option_index, &self.rules)
    }

    /// # Errors
    ///
    /// See [`advance_month`].
    pub fn advance(&self) -> Result<Self, GameError> {
        advance_month(self)
    }

    fn ensure_playing(&self) -> Result<(), GameError> {
        if self.is_playing() {
            Ok(())
        } else {
            Err(GameError::NotPlaying {
                status: self.status,
            })
        }
    }

    fn end(mut self, status: GameStatus, reason: Option<String>) -> Self {
        log::info!(
            "{}: {status} at month {}{}",
            self.save_id,
            self.current_month,
            reason.as_deref().map(|r| format!(" ({r})")).unwrap_or_default()
        );
        self.status = status;
        self.defeat_reason = reason;
        self
    }
}

/// Play `option_index` of `card_id`: pay its costs now and schedule its effects.
///
/// # Errors
///
/// Fails without touching `state` if the card is unknown, the option index
/// is out of range or the game is already over.
pub fn play_card(
    state: &GameState,
    card_id: &str,
    option_index: usize,
    rules: &CausalityRules,
) -> Result<GameState, GameError> {
    state.ensure_playing()?;
    let card = find_card(&state.cards, card_id).ok_or_else(|| GameError::UnknownCard {
        card_id: card_id.to_string(),
    })?;
    let option = card
        .options
        .get(option_index)
        .ok_or_else(|| GameError::OptionOutOfRange {
            card_id: card_id.to_string(),
            index: option_index,
            available: card.options.len(),
        })?;

    let played_ids = state.played_cards.iter().map(|played| played.card_id.as_str());
    let outcome = apply_causality_rules(played_ids, rules, option);
    let modified = &outcome.option;

    let mut next = state.clone();
    next.counters = state.counters.apply_costs(&modified.costs);
    next.budget.spending += modified.costs.eur;

    let month = state.current_month;
    next.scheduled_effects
        .extend(modified.effects.iter().enumerate().map(|(idx, effect)| ScheduledEffect {
            effect_id: format!("{card_id}-{option_index}-{idx}-{month}"),
            card_id: card_id.to_string(),
            option_index,
            effect: effect.clone(),
            lags: modified.lags,
            applied_at: month,
            profile: effect.profile,
            synergies_applied: outcome.synergies_applied.clone(),
            antagonisms_applied: outcome.antagonisms_applied.clone(),
        }));
    next.played_cards.push(PlayedCard {
        card_id: card_id.to_string(),
        option_index,
        played_at: month,
    });

    log::debug!(
        "{}: month {month} played {card_id}#{option_index} ({} effects, synergies {:?}, antagonisms {:?})",
        state.save_id,
        modified.effects.len(),
        outcome.synergies_applied,
        outcome.antagonisms_applied
    );
    Ok(next)
}

/// Resolve one month: event draw, scheduled effects, counters, budget and
/// the end-of-month defeat, checkpoint and mandate checks.
///
/// # Errors
///
/// Fails if the game is already over or the snapshot's start date is malformed.
pub fn advance_month(state: &GameState) -> Result<GameState, GameError> {
    state.ensure_playing()?;
    let start = state.start()?;

    let mut next = state.clone();
    next.current_month += 1;
    let month = next.current_month;

    if let Some(event) = draw_event_card(&next.cards, &next.counters, next.seed, month) {
        let event_id = event.card_id.clone();
        log::debug!("{}: month {month} event {event_id}", next.save_id);
        next = play_card(&next, &event_id, EVENT_OPTION_INDEX, &next.rules)?;
    }

    let date = start.after(month).to_string();
    let risk_damp = calculate_risk_damp(next.counters.ts, next.counters.rj, next.counters.leg);
    let previous_kpis = next.kpis.clone();

    for scheduled in active_effects(&next.scheduled_effects, month) {
        let delta = scheduled.delta_at(month, risk_damp);
        match next
            .kpis
            .iter_mut()
            .find(|kpi| kpi.kpi_id == scheduled.effect.kpi_id)
        {
            Some(kpi) => kpi.apply_delta(&date, delta),
            None => log::debug!(
                "{}: effect {} targets unknown KPI {}",
                next.save_id,
                scheduled.effect_id,
                scheduled.effect.kpi_id
            ),
        }
    }

    next.counters = derive_from_kpis(next.counters, &next.kpis, &previous_kpis);
    next.budget = next.budget.month_end();
    next.counters = next.counters.passive_drift();

    if let Some(breach) = check_troika_defeat(
        &next.budget,
        &next.counters,
        &next.difficulty.troika_thresholds,
    ) {
        return Ok(next.end(GameStatus::Defeat, Some(breach.reason)));
    }
    if !check_mid_game_checkpoint(&next) {
        return Ok(next.end(GameStatus::Defeat, Some(REASON_MID_CHECKPOINT.to_string())));
    }
    if month >= next.total_months() {
        return Ok(if check_victory(&next) {
            next.end(GameStatus::Victory, None)
        } else {
            next.end(GameStatus::Defeat, Some(REASON_END_OF_MANDATE.to_string()))
        });
    }
    Ok(next)
}
