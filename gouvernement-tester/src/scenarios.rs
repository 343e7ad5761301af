use anyhow::{Result, bail, ensure};
use gouvernement_game::{Budget, GameStatus};

use crate::logic::policy::BALANCED_CP_RESERVE;
use crate::logic::{GameTester, GameplayStrategy, SimulationPlan, SimulationSummary};

/// A named simulation plan with its expectations.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: String,
    pub description: &'static str,
    pub plan: SimulationPlan,
}

const CATALOG: [(&str, &str); 9] = [
    ("smoke", "Three balanced months resolve without engine errors"),
    (
        "deterministic-replay",
        "Replaying a seed reproduces the exact final snapshot",
    ),
    (
        "counters-bounded",
        "Random double plays keep every global counter in 0..=100",
    ),
    (
        "kpis-bounded",
        "Heavy stimulus never pushes a KPI outside its bounds",
    ),
    (
        "idle-government",
        "A government that never plays still reaches an ending",
    ),
    ("austerity", "Deepest cuts first, mandate reaches an ending"),
    ("stimulus", "Biggest effects first, mandate reaches an ending"),
    (
        "balanced",
        "Cheapest plays that keep a political capital reserve",
    ),
    ("random", "Seeded random plays reach an ending in time"),
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG.to_vec()
}

#[must_use]
pub fn all_scenario_keys() -> Vec<String> {
    CATALOG.iter().map(|(key, _)| (*key).to_string()).collect()
}

#[must_use]
pub fn get_scenario(key: &str, tester: &GameTester) -> Option<TestScenario> {
    let (key, description) = CATALOG.iter().copied().find(|(k, _)| *k == key)?;
    let plan = match key {
        "smoke" => SimulationPlan::new(GameplayStrategy::Balanced)
            .with_months(3)
            .with_expectation(resolves_months),
        "deterministic-replay" => {
            let replayer = tester.clone();
            SimulationPlan::new(GameplayStrategy::Random)
                .with_plays_per_month(2)
                .with_expectation(move |summary: &SimulationSummary| -> Result<()> {
                    let plan = SimulationPlan::new(summary.strategy).with_plays_per_month(2);
                    let replay = replayer.run_plan(&plan, summary.seed)?;
                    ensure!(
                        replay.fingerprint == summary.fingerprint,
                        "replay diverged: {:016x} vs {:016x}",
                        replay.fingerprint,
                        summary.fingerprint
                    );
                    Ok(())
                })
        }
        "counters-bounded" => SimulationPlan::new(GameplayStrategy::Random)
            .with_plays_per_month(2)
            .with_expectation(counters_bounded),
        "kpis-bounded" => SimulationPlan::new(GameplayStrategy::Stimulus)
            .with_plays_per_month(2)
            .with_expectation(kpis_bounded),
        "idle-government" => SimulationPlan::new(GameplayStrategy::Idle)
            .with_expectation(ends_within_mandate)
            .with_expectation(only_events_played),
        "austerity" => SimulationPlan::new(GameplayStrategy::Austerity)
            .with_expectation(ends_within_mandate)
            .with_expectation(spending_cut),
        "stimulus" => SimulationPlan::new(GameplayStrategy::Stimulus)
            .with_expectation(ends_within_mandate)
            .with_expectation(kpis_bounded),
        "balanced" => SimulationPlan::new(GameplayStrategy::Balanced)
            .with_expectation(ends_within_mandate)
            .with_expectation(reserve_respected),
        "random" => SimulationPlan::new(GameplayStrategy::Random)
            .with_expectation(ends_within_mandate)
            .with_expectation(counters_bounded),
        _ => return None,
    };
    Some(TestScenario {
        key,
        name: display_name(key),
        description,
        plan,
    })
}

fn display_name(key: &str) -> String {
    key.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolves_months(summary: &SimulationSummary) -> Result<()> {
    ensure!(!summary.reports.is_empty(), "no month was resolved");
    ensure!(
        summary.reports.len() == summary.months_played as usize,
        "{} reports for {} months",
        summary.reports.len(),
        summary.months_played
    );
    counters_bounded(summary)
}

fn ends_within_mandate(summary: &SimulationSummary) -> Result<()> {
    let total = summary.final_state.total_months();
    ensure!(summary.ended(), "still playing after {} months", summary.months_played);
    ensure!(
        summary.months_played <= total,
        "ran {} months past a {total}-month mandate",
        summary.months_played
    );
    ensure!(
        summary.defeat_reason.is_some() == (summary.status == GameStatus::Defeat),
        "defeat reason {:?} with status {}",
        summary.defeat_reason,
        summary.status
    );
    Ok(())
}

fn counters_bounded(summary: &SimulationSummary) -> Result<()> {
    for report in &summary.reports {
        if !report.counters.all_in_bounds() {
            bail!("month {}: counters out of bounds {:?}", report.month, report.counters);
        }
    }
    Ok(())
}

fn kpis_bounded(summary: &SimulationSummary) -> Result<()> {
    for kpi in &summary.final_state.kpis {
        for entry in &kpi.history {
            ensure!(
                entry.value >= kpi.bounds.min && entry.value <= kpi.bounds.max,
                "{} = {} at {} outside [{}, {}]",
                kpi.kpi_id,
                entry.value,
                entry.date,
                kpi.bounds.min,
                kpi.bounds.max
            );
        }
    }
    Ok(())
}

fn only_events_played(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.decisions.is_empty(), "idle policy made {} plays", summary.decisions.len());
    let state = &summary.final_state;
    for played in &state.played_cards {
        let is_event = state
            .cards
            .iter()
            .any(|card| card.card_id == played.card_id && card.is_event());
        ensure!(is_event, "non-event card {} was played", played.card_id);
    }
    Ok(())
}

fn spending_cut(summary: &SimulationSummary) -> Result<()> {
    if summary.decisions.is_empty() {
        return Ok(());
    }
    let initial = Budget::default().spending;
    let last = summary.final_state.budget.spending;
    ensure!(last < initial, "spending rose from {initial} to {last}");
    Ok(())
}

fn reserve_respected(summary: &SimulationSummary) -> Result<()> {
    for decision in &summary.decisions {
        ensure!(
            decision.cp_after >= BALANCED_CP_RESERVE,
            "month {}: {} left CP at {}",
            decision.month,
            decision.card_id,
            decision.cp_after
        );
    }
    Ok(())
}
