//! KPI model: indicator series, normalisation, month stamps and trends.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::numbers::{clamp, usize_to_f64};

/// Government departments that own indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ministry {
    EconomyFinance,
    LaborEmployment,
    Health,
    EducationResearch,
    InteriorJustice,
    HousingPlanning,
    EnergyClimateIndustry,
    Transport,
    SocialAffairs,
    #[serde(rename = "ForeignEU")]
    ForeignEu,
    Defense,
    CultureYouthSport,
    DigitalSovereignty,
}

impl Ministry {
    pub const ALL: [Self; 13] = [
        Self::EconomyFinance,
        Self::LaborEmployment,
        Self::Health,
        Self::EducationResearch,
        Self::InteriorJustice,
        Self::HousingPlanning,
        Self::EnergyClimateIndustry,
        Self::Transport,
        Self::SocialAffairs,
        Self::ForeignEu,
        Self::Defense,
        Self::CultureYouthSport,
        Self::DigitalSovereignty,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EconomyFinance => "EconomyFinance",
            Self::LaborEmployment => "LaborEmployment",
            Self::Health => "Health",
            Self::EducationResearch => "EducationResearch",
            Self::InteriorJustice => "InteriorJustice",
            Self::HousingPlanning => "HousingPlanning",
            Self::EnergyClimateIndustry => "EnergyClimateIndustry",
            Self::Transport => "Transport",
            Self::SocialAffairs => "SocialAffairs",
            Self::ForeignEu => "ForeignEU",
            Self::Defense => "Defense",
            Self::CultureYouthSport => "CultureYouthSport",
            Self::DigitalSovereignty => "DigitalSovereignty",
        }
    }
}

impl fmt::Display for Ministry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ministry {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ministry| ministry.as_str() == s)
            .ok_or(())
    }
}

/// Which way an indicator should move to count as an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    IncreaseGood,
    DecreaseGood,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiBounds {
    pub min: f64,
    pub max: f64,
}

impl KpiBounds {
    #[must_use]
    pub fn midpoint(self) -> f64 {
        (self.min + self.max) / 2.0
    }

    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        clamp(value, self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KpiSource {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One monthly observation, keyed by `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub value: f64,
}

/// A named indicator time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub kpi_id: String,
    pub ministry: Ministry,
    pub label: String,
    #[serde(default)]
    pub unit: String,
    pub direction: Direction,
    pub bounds: KpiBounds,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(rename = "weightInIPM")]
    pub weight_in_ipm: f64,
    #[serde(default)]
    pub source: KpiSource,
    #[serde(default)]
    pub last_updated: String,
}

impl Kpi {
    /// Map `value` onto `[0, 1]` where 1 is the best end of the bounds.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        let KpiBounds { min, max } = self.bounds;
        let normalized = match self.direction {
            Direction::IncreaseGood => (value - min) / (max - min),
            Direction::DecreaseGood => (max - value) / (max - min),
        };
        // degenerate bounds produce NaN; f64::max drops it in favour of 0
        clamp(normalized.max(0.0), 0.0, 1.0)
    }

    /// Latest recorded value, or the bounds midpoint for an empty history.
    #[must_use]
    pub fn current_value(&self) -> f64 {
        self.history
            .last()
            .map_or_else(|| self.bounds.midpoint(), |entry| entry.value)
    }

    #[must_use]
    pub fn value_at(&self, date: &str) -> Option<f64> {
        self.history
            .iter()
            .find(|entry| entry.date == date)
            .map(|entry| entry.value)
    }

    /// Value recorded `month_index` months after `start`, or the current value.
    #[must_use]
    pub fn value_at_month(&self, start: YearMonth, month_index: u32) -> f64 {
        let date = start.after(month_index).to_string();
        self.value_at(&date)
            .unwrap_or_else(|| self.current_value())
    }

    /// Append a clamped observation and keep the history sorted by date.
    pub fn add_history_entry(&mut self, date: &str, value: f64) {
        self.history.push(HistoryEntry {
            date: date.to_string(),
            value: self.bounds.clamp(value),
        });
        self.history.sort_by(|a, b| a.date.cmp(&b.date));
        self.sync_last_updated();
    }

    /// Shift the current value by `delta`, overwriting the entry for `date` if
    /// it is the latest one, otherwise appending a new observation.
    pub fn apply_delta(&mut self, date: &str, delta: f64) {
        let next = self.bounds.clamp(self.current_value() + delta);
        match self.history.last_mut() {
            Some(last) if last.date == date => {
                last.value = next;
                self.sync_last_updated();
            }
            _ => self.add_history_entry(date, next),
        }
    }

    /// Non-mutating form of [`Kpi::apply_delta`].
    #[must_use]
    pub fn with_delta(&self, date: &str, delta: f64) -> Self {
        let mut next = self.clone();
        next.apply_delta(date, delta);
        next
    }

    /// Values of the trailing `n` history entries, oldest first.
    #[must_use]
    pub fn last_n_values(&self, n: usize) -> Vec<f64> {
        let skip = self.history.len().saturating_sub(n);
        self.history[skip..].iter().map(|entry| entry.value).collect()
    }

    fn sync_last_updated(&mut self) {
        if let Some(last) = self.history.last() {
            self.last_updated.clone_from(&last.date);
        }
    }
}

/// Collection of indicators as delivered by the dataset importer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KpiDataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub kpis: Vec<Kpi>,
}

impl KpiDataset {
    /// Load an indicator dataset from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a valid dataset.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Find an indicator by id.
#[must_use]
pub fn find_kpi<'a>(kpis: &'a [Kpi], kpi_id: &str) -> Option<&'a Kpi> {
    kpis.iter().find(|kpi| kpi.kpi_id == kpi_id)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid month stamp '{0}', expected YYYY-MM")]
    Malformed(String),
}

/// Calendar month, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// # Errors
    ///
    /// Returns an error when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, DateError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(DateError::Malformed(format!("{year}-{month}")))
        }
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Stamp of game month `month_index` when month 0 is `self`.
    #[must_use]
    pub fn after(self, month_index: u32) -> Self {
        self.plus_months(i32::try_from(month_index).unwrap_or(i32::MAX))
    }

    /// Calendar arithmetic with year rollover in both directions.
    #[must_use]
    pub fn plus_months(self, months: i32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(months);
        let year = i32::try_from(total.div_euclid(12)).unwrap_or(self.year);
        let month = u32::try_from(total.rem_euclid(12) + 1).unwrap_or(1);
        Self { year, month }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DateError::Malformed(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(malformed)?;
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::new(year, month).map_err(|_| malformed())
    }
}

/// Add `months` to a `YYYY-MM` stamp.
///
/// # Errors
///
/// Returns an error if `date` is not a valid month stamp.
pub fn add_months(date: &str, months: i32) -> Result<String, DateError> {
    let start: YearMonth = date.parse()?;
    Ok(start.plus_months(months).to_string())
}

/// Ordinary least-squares slope of `values` against `0..n-1`.
#[must_use]
pub fn calculate_trend(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = usize_to_f64(values.len());
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let (numerator, denominator) =
        values
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(num, den), (idx, value)| {
                let dx = usize_to_f64(idx) - x_mean;
                (dx.mul_add(value - y_mean, num), dx.mul_add(dx, den))
            });

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
