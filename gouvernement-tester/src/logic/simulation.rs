use std::sync::Arc;

use anyhow::{Context, Result};
use gouvernement_game::{
    GameState, GameStatus, MonthlyReport, check_victory, fingerprint, generate_monthly_report,
};

use crate::logic::assets::TesterAssets;
use crate::logic::policy::{GameplayStrategy, PlayerPolicy, PolicyDecision};

/// Declarative plan for one simulated mandate.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: GameplayStrategy,
    /// Month cap; `None` plays until the game ends.
    pub months: Option<u32>,
    pub plays_per_month: usize,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy) -> Self {
        Self {
            strategy,
            months: None,
            plays_per_month: 1,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_months(mut self, months: u32) -> Self {
        self.months = Some(months);
        self
    }

    #[must_use]
    pub const fn with_plays_per_month(mut self, plays: usize) -> Self {
        self.plays_per_month = plays;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn = Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// A play made by the policy.
#[derive(Debug, Clone)]
pub struct DecisionRecord {
    pub month: u32,
    pub card_id: String,
    pub option_index: usize,
    pub option_label: String,
    pub policy_name: String,
    pub rationale: Option<String>,
    /// Political capital left after paying for the play.
    pub cp_after: f64,
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u32,
    pub strategy: GameplayStrategy,
    pub months_played: u32,
    pub status: GameStatus,
    pub defeat_reason: Option<String>,
    pub igg: i32,
    pub danger_level: i32,
    pub objectives_met: usize,
    pub decisions: Vec<DecisionRecord>,
    /// One report per resolved month, in order.
    pub reports: Vec<MonthlyReport>,
    pub fingerprint: u64,
    pub final_state: GameState,
}

impl SimulationSummary {
    #[must_use]
    pub fn ended(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Headless deterministic runner for the engine.
#[derive(Clone)]
pub struct GameTester {
    verbose: bool,
    assets: Arc<TesterAssets>,
}

impl GameTester {
    pub const fn new(assets: Arc<TesterAssets>, verbose: bool) -> Self {
        Self { verbose, assets }
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Fresh game for `seed` with the default objective selection.
    #[must_use]
    pub fn new_game(&self, seed: u32) -> GameState {
        let datasets = &self.assets.datasets;
        GameState::new(
            format!("qa-{seed}"),
            seed,
            datasets,
            datasets.default_objective_selection(),
        )
    }

    /// Play `plan` from a fresh game.
    ///
    /// # Errors
    ///
    /// Fails if the engine rejects a transition the policy asked for.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u32) -> Result<SimulationSummary> {
        let mut state = self.new_game(seed);
        let mut policy = plan.strategy.create_policy(u64::from(seed));
        let month_cap = plan.months.unwrap_or(u32::MAX);
        let mut decisions = Vec::new();
        let mut reports = Vec::new();

        if self.verbose {
            println!(
                "🎮 Starting simulation | seed:{seed} policy:{} months:{}",
                plan.strategy.label(),
                state.total_months()
            );
        }

        while state.is_playing() && state.current_month < month_cap {
            for _ in 0..plan.plays_per_month {
                let Some(decision) = policy.pick_play(&state) else {
                    break;
                };
                state = state
                    .play(&decision.card_id, decision.option_index)
                    .with_context(|| {
                        format!("month {}: {} rejected", state.current_month, decision.card_id)
                    })?;
                let entry = record(&state, &decision, policy.as_ref());
                if self.verbose {
                    log_decision(&entry);
                }
                decisions.push(entry);
            }

            state = state
                .advance()
                .with_context(|| format!("advancing past month {}", state.current_month))?;
            let report = generate_monthly_report(&state);
            if self.verbose {
                log_month(&report);
            }
            reports.push(report);
        }

        let final_report = generate_monthly_report(&state);
        let objectives_met = final_report
            .objectives_progress
            .iter()
            .filter(|progress| progress.overall_passed)
            .count();
        log::debug!(
            "seed {seed} {}: {} after {} months (victory condition {})",
            plan.strategy,
            state.status,
            state.current_month,
            check_victory(&state)
        );

        Ok(SimulationSummary {
            seed,
            strategy: plan.strategy,
            months_played: state.current_month,
            status: state.status,
            defeat_reason: state.defeat_reason.clone(),
            igg: final_report.igg,
            danger_level: final_report.danger_level,
            objectives_met,
            decisions,
            reports,
            fingerprint: fingerprint(&state)?,
            final_state: state,
        })
    }
}

fn record(
    state: &GameState,
    decision: &PolicyDecision,
    policy: &(dyn PlayerPolicy + Send),
) -> DecisionRecord {
    let option_label = state
        .cards
        .iter()
        .find(|card| card.card_id == decision.card_id)
        .and_then(|card| card.options.get(decision.option_index))
        .map(|option| option.label.clone())
        .unwrap_or_default();
    DecisionRecord {
        month: state.current_month,
        card_id: decision.card_id.clone(),
        option_index: decision.option_index,
        option_label,
        policy_name: policy.name().to_string(),
        rationale: decision.rationale.clone(),
        cp_after: state.counters.cp,
    }
}

fn log_decision(entry: &DecisionRecord) {
    println!(
        "   month {:>2} | {} plays {}#{} \"{}\" ({}) | CP left {:.0}",
        entry.month,
        entry.policy_name,
        entry.card_id,
        entry.option_index,
        entry.option_label,
        entry.rationale.as_deref().unwrap_or("-"),
        entry.cp_after
    );
}

fn log_month(report: &MonthlyReport) {
    println!(
        "   month {:>2} | IGG {:>3} | danger {:>3} ({}) | TS {:.0} CM {:.0} LEG {:.0} RJ {:.0} CP {:.0}{}",
        report.month,
        report.igg,
        report.danger_level,
        report.troika_label,
        report.counters.ts,
        report.counters.cm,
        report.counters.leg,
        report.counters.rj,
        report.counters.cp,
        if report.events.is_empty() {
            String::new()
        } else {
            format!(" | events: {}", report.events.join(", "))
        }
    );
}
