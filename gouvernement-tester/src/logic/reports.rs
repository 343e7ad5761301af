use anyhow::Result;
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use super::{BalanceRecord, ScenarioResult};

#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Per-scenario roll-up of balance records.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceAggregate {
    pub scenario: String,
    pub strategy: String,
    pub runs: usize,
    pub victory_pct: f64,
    pub mean_months: f64,
    pub mean_igg: f64,
    pub mean_danger: f64,
    /// Most frequent defeat reason, if any run was lost.
    pub top_defeat: Option<String>,
}

#[must_use]
pub fn aggregate_balance(results: &[ScenarioResult]) -> Vec<BalanceAggregate> {
    let mut grouped: BTreeMap<(&str, &str), Vec<&BalanceRecord>> = BTreeMap::new();
    for record in results.iter().flat_map(|result| &result.balance) {
        grouped
            .entry((record.scenario.as_str(), record.strategy.as_str()))
            .or_default()
            .push(record);
    }

    grouped
        .into_iter()
        .map(|((scenario, strategy), records)| {
            let victories = records.iter().filter(|r| r.status == "victory").count();
            let mut reasons: BTreeMap<&str, usize> = BTreeMap::new();
            for reason in records.iter().filter_map(|r| r.defeat_reason.as_deref()) {
                *reasons.entry(reason).or_default() += 1;
            }
            let top_defeat = reasons
                .into_iter()
                .max_by_key(|(_, count)| *count)
                .map(|(reason, _)| reason.to_string());

            BalanceAggregate {
                scenario: scenario.to_string(),
                strategy: strategy.to_string(),
                runs: records.len(),
                victory_pct: percent(victories, records.len()),
                mean_months: mean(records.iter().map(|r| f64::from(r.months))),
                mean_igg: mean(records.iter().map(|r| f64::from(r.igg))),
                mean_danger: mean(records.iter().map(|r| f64::from(r.danger_level))),
                top_defeat,
            }
        })
        .collect()
}

pub fn generate_console_report<W: Write + ?Sized>(
    writer: &mut W,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Logic Test Results Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "==============================".cyan())?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(writer, "Total scenarios: {total_tests}")?;
    writeln!(writer, "Passed: {}", passed_tests.to_string().green())?;
    writeln!(writer, "Failed: {}", failed_tests.to_string().red())?;
    writeln!(
        writer,
        "Success rate: {:.1}%",
        percent(passed_tests, total_tests)
    )?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    writeln!(writer)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        writeln!(
            writer,
            "{} {} (seed {})",
            status,
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            writer,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(writer, "   Average time: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(writer, "   Failures:")?;
            for failure in &result.failures {
                writeln!(writer, "     • {}", failure.red())?;
            }
        }
        writeln!(writer)?;
    }

    let aggregates = aggregate_balance(results);
    if !aggregates.is_empty() {
        writeln!(writer, "{}", "⚖️  Balance Summary".bright_yellow().bold())?;
        writeln!(writer, "{}", "==================".yellow())?;
        writeln!(
            writer,
            "{:<24} {:<10} {:>5} {:>8} {:>7} {:>6} {:>7}  top defeat",
            "scenario", "strategy", "runs", "victory", "months", "IGG", "danger"
        )?;
        for aggregate in &aggregates {
            writeln!(
                writer,
                "{:<24} {:<10} {:>5} {:>7.1}% {:>7.1} {:>6.1} {:>7.1}  {}",
                aggregate.scenario,
                aggregate.strategy,
                aggregate.runs,
                aggregate.victory_pct,
                aggregate.mean_months,
                aggregate.mean_igg,
                aggregate.mean_danger,
                aggregate.top_defeat.as_deref().unwrap_or("-")
            )?;
        }
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(writer: &mut W, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    writer: &mut W,
    results: &[ScenarioResult],
) -> Result<()> {
    writeln!(writer, "# Gouvernement Logic Test Results\n")?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();

    writeln!(writer, "## Summary\n")?;
    writeln!(writer, "- **Total scenarios**: {total_tests}")?;
    writeln!(writer, "- **Passed**: {passed_tests}")?;
    writeln!(writer, "- **Failed**: {}", total_tests - passed_tests)?;
    writeln!(
        writer,
        "- **Success rate**: {:.1}%\n",
        percent(passed_tests, total_tests)
    )?;

    writeln!(writer, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(writer, "### {} {} (seed {})\n", status, result.scenario_name, result.seed)?;
        writeln!(
            writer,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(writer, "- **Average time**: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(writer, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(writer, "  - {failure}")?;
            }
        }
        writeln!(writer)?;
    }

    let aggregates = aggregate_balance(results);
    if !aggregates.is_empty() {
        writeln!(writer, "## Balance\n")?;
        writeln!(writer, "| Scenario | Strategy | Runs | Victory | Months | IGG | Danger |")?;
        writeln!(writer, "|---|---|---|---|---|---|---|")?;
        for a in &aggregates {
            writeln!(
                writer,
                "| {} | {} | {} | {:.1}% | {:.1} | {:.1} | {:.1} |",
                a.scenario, a.strategy, a.runs, a.victory_pct, a.mean_months, a.mean_igg, a.mean_danger
            )?;
        }
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn generate_csv_report<W: Write + ?Sized>(writer: &mut W, results: &[ScenarioResult]) -> Result<()> {
    writeln!(
        writer,
        "scenario,strategy,seed,months,status,defeat_reason,igg,danger_level,objectives_met,plays"
    )?;
    for record in results.iter().flat_map(|result| &result.balance) {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{}",
            csv_field(&record.scenario),
            csv_field(&record.strategy),
            record.seed,
            record.months,
            record.status,
            csv_field(record.defeat_reason.as_deref().unwrap_or("")),
            record.igg,
            record.danger_level,
            record.objectives_met,
            record.plays
        )?;
    }
    Ok(())
}
