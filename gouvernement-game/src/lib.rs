//! Gouvernement Game Engine
//!
//! Deterministic core of a turn-based governance simulation: indicators,
//! policy cards with delayed effects, synergy and antagonism rules, global
//! counters, Troika intervention and objective-based victory. Storage and
//! presentation are left to the embedding application.

pub mod aggregators;
pub mod cards;
pub mod causality;
pub mod constants;
pub mod counters;
pub mod data;
pub mod difficulty;
pub mod effects;
pub mod events;
pub mod kpi;
pub mod numbers;
pub mod objectives;
pub mod report;
pub mod rng;
pub mod save;
pub mod seed;
pub mod state;
pub mod troika;
pub mod victory;

// Re-export commonly used types
pub use aggregators::{
    KpiScore, MinistryIpm, calculate_all_ipms, calculate_igg, calculate_ipm, calculate_risk_damp,
    ipm_history, kpi_normalized_history, vedette_kpis,
};
pub use cards::{
    AntagonismRule, Card, CardOption, CardType, CardsDataset, CausalityRules, Confidence, Costs,
    Effect, Interval, Lags, Profile, Risks, SynergyRule,
};
pub use causality::{CausalityOutcome, RuleTrace, apply_causality_rules};
pub use counters::{GlobalCounters, derive_from_kpis};
pub use data::Datasets;
pub use difficulty::{
    DifficultyDataset, DifficultyMode, ObjectiveSelection, TroikaThresholds, Weights,
};
pub use effects::{active_effects, effect_delta, effect_interval, is_effect_active, profile_factor};
pub use events::draw_event_card;
pub use kpi::{
    DateError, Direction, HistoryEntry, Kpi, KpiBounds, KpiDataset, KpiSource, Ministry,
    YearMonth, add_months, calculate_trend,
};
pub use objectives::{
    Comparator, DifficultyTargets, EvaluationMethod, EvaluationWindow, Objective, ObjectiveCheck,
    ObjectivesDataset, TargetLevel, TargetSet,
};
pub use report::{BudgetSummary, MonthlyReport, generate_monthly_report};
pub use rng::SeededRng;
pub use save::{SaveError, SaveGame, fingerprint};
pub use seed::{fresh_save_id, generate_save_id, hash_string, seed_for_save_id};
pub use state::{
    Budget, GameError, GameState, GameStatus, PlayedCard, ScheduledEffect, advance_month,
    play_card,
};
pub use troika::{
    TroikaBreach, TroikaLevel, TroikaTrigger, WarningLevel, check_troika_defeat, danger_level,
    troika_warnings, warning_level,
};
pub use victory::{
    CheckStatus, ObjectiveProgress, check_mid_game_checkpoint, check_victory, evaluate_check,
    evaluate_objective,
};

/// Source of the reference datasets a game is built from.
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the four validated datasets.
    ///
    /// # Errors
    ///
    /// Returns an error if any dataset cannot be loaded.
    fn load_datasets(&self) -> Result<Datasets, Self::Error>;
}

/// Loader for the datasets compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledData;

impl DataLoader for BundledData {
    type Error = serde_json::Error;

    fn load_datasets(&self) -> Result<Datasets, Self::Error> {
        Datasets::bundled()
    }
}

/// Whole-snapshot key-value store keyed by save id.
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    fn save_game(&self, save_id: &str, game_state: &GameState) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    fn load_game(&self, save_id: &str) -> Result<Option<GameState>, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_id: &str) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the store cannot be enumerated.
    fn list_saves(&self) -> Result<Vec<String>, Self::Error>;
}

/// Runs transitions and persists every resulting snapshot.
pub struct GameEngine<L, S>
where
    L: DataLoader,
    S: GameStorage,
{
    data_loader: L,
    storage: S,
}

impl<L, S> GameEngine<L, S>
where
    L: DataLoader,
    S: GameStorage,
{
    pub const fn new(data_loader: L, storage: S) -> Self {
        Self {
            data_loader,
            storage,
        }
    }

    /// Start and store a new game. An empty selection takes the first
    /// `objectiveSelection.choose` objectives of the dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the datasets cannot be loaded or the game cannot be saved.
    pub fn create_game(
        &self,
        save_id: &str,
        selected_objectives: Vec<String>,
    ) -> anyhow::Result<GameState> {
        let datasets = self.data_loader.load_datasets()?;
        let selected = if selected_objectives.is_empty() {
            datasets.default_objective_selection()
        } else {
            selected_objectives
        };
        let state = GameState::new(save_id, seed_for_save_id(save_id), &datasets, selected);
        self.storage.save_game(save_id, &state)?;
        log::info!("{save_id}: new game (seed {})", state.seed);
        Ok(state)
    }

    /// # Errors
    ///
    /// Returns an error if the play is invalid or the result cannot be saved.
    pub fn play_card(
        &self,
        state: &GameState,
        card_id: &str,
        option_index: usize,
    ) -> anyhow::Result<GameState> {
        let next = state.play(card_id, option_index)?;
        self.storage.save_game(&next.save_id, &next)?;
        Ok(next)
    }

    /// # Errors
    ///
    /// Returns an error if the month cannot be resolved or the result cannot be saved.
    pub fn advance_month(&self, state: &GameState) -> anyhow::Result<GameState> {
        let next = state.advance()?;
        self.storage.save_game(&next.save_id, &next)?;
        Ok(next)
    }

    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    pub fn save_game(&self, game_state: &GameState) -> Result<(), S::Error> {
        self.storage.save_game(&game_state.save_id, game_state)
    }

    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    pub fn load_game(&self, save_id: &str) -> Result<Option<GameState>, S::Error> {
        self.storage.load_game(save_id)
    }

    /// Wrap a stored game in an export envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    pub fn export_game(&self, save_id: &str) -> Result<Option<SaveGame>, S::Error> {
        Ok(self
            .storage
            .load_game(save_id)?
            .map(|state| SaveGame::export_now(&state)))
    }

    /// Store the snapshot carried by an exported envelope under its own save id.
    ///
    /// # Errors
    ///
    /// Returns an error if the envelope is invalid or the game cannot be saved.
    pub fn import_game(&self, json: &str) -> anyhow::Result<GameState> {
        let state = SaveGame::from_json(json)?.into_state();
        self.storage.save_game(&state.save_id, &state)?;
        log::info!("{}: imported at month {}", state.save_id, state.current_month);
        Ok(state)
    }

    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_game(&self, save_id: &str) -> Result<(), S::Error> {
        self.storage.delete_save(save_id)
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be enumerated.
    pub fn list_games(&self) -> Result<Vec<String>, S::Error> {
        self.storage.list_saves()
    }
}
