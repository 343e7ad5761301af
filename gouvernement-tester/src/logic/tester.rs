use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::logic::simulation::{GameTester, SimulationPlan, SimulationSummary};
use crate::scenarios::TestScenario;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u32,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub balance: Vec<BalanceRecord>,
}

/// Outcome of one simulated mandate, as written to the CSV report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub scenario: String,
    pub strategy: String,
    pub seed: u32,
    pub months: u32,
    pub status: String,
    pub defeat_reason: Option<String>,
    pub igg: i32,
    pub danger_level: i32,
    pub objectives_met: usize,
    pub plays: usize,
}

impl BalanceRecord {
    #[must_use]
    pub fn from_summary(scenario: &str, summary: &SimulationSummary) -> Self {
        Self {
            scenario: scenario.to_string(),
            strategy: summary.strategy.label().to_string(),
            seed: summary.seed,
            months: summary.months_played,
            status: summary.status.to_string(),
            defeat_reason: summary.defeat_reason.clone(),
            igg: summary.igg,
            danger_level: summary.danger_level,
            objectives_met: summary.objectives_met,
            plays: summary.decisions.len(),
        }
    }
}

pub struct LogicTester {
    tester: GameTester,
}

impl LogicTester {
    pub const fn new(tester: GameTester) -> Self {
        Self { tester }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u32],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.tester.verbose() {
                    println!(
                        "🧪 Testing scenario: {} (policy: {} seed: {}) - {}",
                        scenario.name.bright_white(),
                        scenario.plan.strategy,
                        seed,
                        scenario.description
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u32,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();
        let mut balance = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u32::try_from(i).unwrap_or(u32::MAX));

            let outcome = self
                .tester
                .run_plan(&scenario.plan, iteration_seed)
                .and_then(|summary| {
                    balance.push(BalanceRecord::from_summary(&scenario.name, &summary));
                    evaluate_expectations(&scenario.plan, &summary).map(|()| summary)
                });

            match outcome {
                Ok(summary) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.tester.verbose() {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) months:{} status:{}",
                            i + 1,
                            iterations,
                            summary.months_played,
                            summary.status
                        );
                    }
                }
                Err(err) => {
                    let message = format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1);
                    if self.tester.verbose() {
                        println!("  ❌ {}", message.clone().red());
                    }
                    failures.push(message);
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
            balance,
        }
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> anyhow::Result<()> {
    for expectation in &plan.expectations {
        expectation.evaluate(summary).map_err(|err| {
            err.context(format!(
                "{} after {} months ({}{})",
                summary.strategy,
                summary.months_played,
                summary.status,
                summary
                    .defeat_reason
                    .as_deref()
                    .map(|reason| format!(": {reason}"))
                    .unwrap_or_default()
            ))
        })?;
    }
    Ok(())
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::assets::TesterAssets;
    use crate::logic::policy::GameplayStrategy;
    use std::sync::Arc;

    fn logic_tester() -> LogicTester {
        LogicTester::new(GameTester::new(
            Arc::new(TesterAssets::load(None).unwrap()),
            false,
        ))
    }

    fn scenario(plan: SimulationPlan) -> TestScenario {
        TestScenario {
            key: "unit",
            name: "Unit".to_string(),
            description: "unit scenario",
            plan,
        }
    }

    #[test]
    fn passing_expectations_count_as_successes() {
        let scenario = scenario(
            SimulationPlan::new(GameplayStrategy::Idle)
                .with_months(1)
                .with_expectation(|_: &SimulationSummary| -> anyhow::Result<()> { Ok(()) }),
        );
        let results = logic_tester().run_scenario(&scenario, &[1, 2], 2);
        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(result.passed);
            assert_eq!(result.successful_iterations, 2);
            assert_eq!(result.balance.len(), 2);
        }
    }

    #[test]
    fn failed_expectations_are_reported() {
        let scenario = scenario(
            SimulationPlan::new(GameplayStrategy::Idle)
                .with_months(1)
                .with_expectation(|_: &SimulationSummary| -> anyhow::Result<()> {
                    anyhow::bail!("always fails")
                }),
        );
        let result = logic_tester().run_scenario(&scenario, &[9], 1).remove(0);
        assert!(!result.passed);
        assert_eq!(result.failures.len(), 1);
        assert!(result.failures[0].contains("always fails"));
        assert!(result.failures[0].contains("seed 9"));
        assert_eq!(result.balance.len(), 1);
    }

    #[test]
    fn results_serialize_durations_as_millis() {
        let result = ScenarioResult {
            scenario_name: "Smoke".to_string(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            performance_data: vec![Duration::from_millis(12)],
            balance: Vec::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
        assert!(json.get("balance").is_none());
        let back: ScenarioResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.performance_data, result.performance_data);
    }
}
