//! Troika intervention: defeat triggers, danger score and warnings.
use serde::{Deserialize, Serialize};

use crate::constants::{
    COUNTER_MAX, DANGER_RATIO, DANGER_WEIGHT_CM, DANGER_WEIGHT_DEBT, DANGER_WEIGHT_DEFICIT,
    DANGER_WEIGHT_INTEREST, MONTHS_PER_YEAR, WARNING_RATIO,
};
use crate::counters::GlobalCounters;
use crate::difficulty::TroikaThresholds;
use crate::numbers::{clamp, round_f64_to_i32};
use crate::state::Budget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TroikaTrigger {
    Deficit,
    DebtAndConfidence,
    InterestBurden,
}

/// The first threshold breached this month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroikaBreach {
    pub trigger: TroikaTrigger,
    pub reason: String,
}

/// Deficit, then debt with weak markets, then interest burden. First match wins.
#[must_use]
pub fn check_troika_defeat(
    budget: &Budget,
    counters: &GlobalCounters,
    thresholds: &TroikaThresholds,
) -> Option<TroikaBreach> {
    if budget.deficit_pct_gdp() > thresholds.deficit_pct.abs() {
        return Some(TroikaBreach {
            trigger: TroikaTrigger::Deficit,
            reason: format!("Déficit public > {}% du PIB", thresholds.deficit_pct),
        });
    }
    if budget.debt_pct_gdp() > thresholds.debt_pct && counters.cm < thresholds.cm_min {
        return Some(TroikaBreach {
            trigger: TroikaTrigger::DebtAndConfidence,
            reason: format!(
                "Dette publique > {}% et confiance des marchés < {}",
                thresholds.debt_pct, thresholds.cm_min
            ),
        });
    }
    if budget.interest_to_revenue_pct(thresholds.interest_rate) > thresholds.interest_to_revenue_pct {
        return Some(TroikaBreach {
            trigger: TroikaTrigger::InterestBurden,
            reason: format!("Intérêts/Recettes > {}%", thresholds.interest_to_revenue_pct),
        });
    }
    None
}

fn ratio(value: f64, threshold: f64) -> f64 {
    if threshold == 0.0 { 0.0 } else { value / threshold }
}

fn share(value: f64, threshold: f64) -> f64 {
    clamp(ratio(value, threshold) * 100.0, 0.0, 100.0)
}

/// Continuous 0..100 proximity to intervention.
#[must_use]
pub fn danger_level(
    budget: &Budget,
    counters: &GlobalCounters,
    thresholds: &TroikaThresholds,
) -> i32 {
    let deficit = share(budget.deficit_pct_gdp(), thresholds.deficit_pct.abs());
    let debt = share(budget.debt_pct_gdp(), thresholds.debt_pct);
    let market = clamp(COUNTER_MAX - counters.cm, 0.0, 100.0);
    let monthly_rate = thresholds.interest_rate / f64::from(MONTHS_PER_YEAR);
    let interest = share(
        budget.interest_to_revenue_pct(monthly_rate),
        thresholds.interest_to_revenue_pct,
    );

    let score = deficit * DANGER_WEIGHT_DEFICIT
        + debt * DANGER_WEIGHT_DEBT
        + market * DANGER_WEIGHT_CM
        + interest * DANGER_WEIGHT_INTEREST;
    round_f64_to_i32(score.min(100.0))
}

/// Headline band for a danger score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TroikaLevel {
    Stable,
    Surveillance,
    Alerte,
    DangerImminent,
}

impl TroikaLevel {
    #[must_use]
    pub const fn from_danger(level: i32) -> Self {
        match level {
            ..25 => Self::Stable,
            25..50 => Self::Surveillance,
            50..75 => Self::Alerte,
            _ => Self::DangerImminent,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stable => "Stable",
            Self::Surveillance => "Surveillance",
            Self::Alerte => "Alerte",
            Self::DangerImminent => "Danger Imminent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningLevel {
    Safe = 0,
    Warning = 1,
    Danger = 2,
}

/// Per-criterion ratio to its threshold; 1.0 means on the line.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ratios {
    deficit: f64,
    debt: f64,
    market: f64,
    interest: f64,
}

impl Ratios {
    fn of(budget: &Budget, counters: &GlobalCounters, thresholds: &TroikaThresholds) -> Self {
        let market = if counters.cm > 0.0 {
            thresholds.cm_min / counters.cm
        } else if thresholds.cm_min > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };
        Self {
            deficit: ratio(budget.deficit_pct_gdp().abs(), thresholds.deficit_pct.abs()),
            debt: ratio(budget.debt_pct_gdp(), thresholds.debt_pct),
            market,
            interest: ratio(
                budget.interest_to_revenue_pct(thresholds.interest_rate),
                thresholds.interest_to_revenue_pct,
            ),
        }
    }
}

/// Discrete alert from the worst of the deficit, debt and market ratios.
#[must_use]
pub fn warning_level(
    budget: &Budget,
    counters: &GlobalCounters,
    thresholds: &TroikaThresholds,
) -> WarningLevel {
    let ratios = Ratios::of(budget, counters, thresholds);
    let worst = ratios.deficit.max(ratios.debt).max(ratios.market);
    if worst >= DANGER_RATIO {
        WarningLevel::Danger
    } else if worst >= WARNING_RATIO {
        WarningLevel::Warning
    } else {
        WarningLevel::Safe
    }
}

/// Human readable alerts for every criterion at 70% of its threshold or worse.
#[must_use]
pub fn troika_warnings(
    budget: &Budget,
    counters: &GlobalCounters,
    thresholds: &TroikaThresholds,
) -> Vec<String> {
    let ratios = Ratios::of(budget, counters, thresholds);
    let mut warnings = Vec::new();
    if ratios.deficit >= WARNING_RATIO {
        warnings.push(format!(
            "Déficit public à {:.1}% du PIB (seuil {}%)",
            budget.deficit_pct_gdp(),
            thresholds.deficit_pct.abs()
        ));
    }
    if ratios.debt >= WARNING_RATIO {
        warnings.push(format!(
            "Dette publique à {:.1}% du PIB (seuil {}%)",
            budget.debt_pct_gdp(),
            thresholds.debt_pct
        ));
    }
    if ratios.market >= WARNING_RATIO {
        warnings.push(format!(
            "Confiance des marchés à {:.0} (minimum {})",
            counters.cm, thresholds.cm_min
        ));
    }
    if ratios.interest >= WARNING_RATIO {
        warnings.push(format!(
            "Intérêts à {:.1}% des recettes (seuil {}%)",
            budget.interest_to_revenue_pct(thresholds.interest_rate),
            thresholds.interest_to_revenue_pct
        ));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> TroikaThresholds {
        TroikaThresholds {
            deficit_pct: -3.0,
            months: 3,
            debt_pct: 120.0,
            cm_min: 30.0,
            interest_to_revenue_pct: 15.0,
            interest_rate: 0.03,
        }
    }

    fn budget(revenue: f64, spending: f64, debt: f64, gdp: f64) -> Budget {
        Budget {
            revenue,
            spending,
            debt,
            gdp,
        }
    }

    #[test]
    fn five_percent_deficit_breaches_three_percent_limit() {
        let breach = check_troika_defeat(
            &budget(100.0, 105.0, 0.0, 100.0),
            &GlobalCounters::default(),
            &thresholds(),
        )
        .expect("defeated");
        assert_eq!(breach.trigger, TroikaTrigger::Deficit);
        assert!(breach.reason.contains("Déficit"));
        assert_eq!(breach.reason, "Déficit public > -3% du PIB");
    }

    #[test]
    fn debt_needs_weak_markets_too() {
        let heavy = budget(100.0, 100.0, 130.0, 100.0);
        let confident = GlobalCounters::default();
        assert!(check_troika_defeat(&heavy, &confident, &thresholds()).is_none());

        let nervous = GlobalCounters {
            cm: 20.0,
            ..GlobalCounters::default()
        };
        let breach = check_troika_defeat(&heavy, &nervous, &thresholds()).expect("defeated");
        assert_eq!(breach.trigger, TroikaTrigger::DebtAndConfidence);
        assert!(breach.reason.starts_with("Dette publique > 120%"));
    }

    #[test]
    fn interest_burden_uses_configured_rate() {
        // 600 debt at 3% = 18 on 100 revenue
        let indebted = budget(100.0, 100.0, 600.0, 10_000.0);
        let breach = check_troika_defeat(&indebted, &GlobalCounters::default(), &thresholds())
            .expect("defeated");
        assert_eq!(breach.trigger, TroikaTrigger::InterestBurden);
        assert_eq!(breach.reason, "Intérêts/Recettes > 15%");

        let cheap = TroikaThresholds {
            interest_rate: 0.02,
            ..thresholds()
        };
        assert!(check_troika_defeat(&indebted, &GlobalCounters::default(), &cheap).is_none());
    }

    #[test]
    fn deficit_is_checked_first() {
        let everything = budget(100.0, 200.0, 10_000.0, 100.0);
        let nervous = GlobalCounters {
            cm: 0.0,
            ..GlobalCounters::default()
        };
        let breach = check_troika_defeat(&everything, &nervous, &thresholds()).unwrap();
        assert_eq!(breach.trigger, TroikaTrigger::Deficit);
    }

    #[test]
    fn danger_blends_weighted_components() {
        // deficit 3/3 -> 100, debt 60/120 -> 50, market 50, interest 0
        let b = budget(100.0, 103.0, 60.0, 100.0);
        let counters = GlobalCounters::default();
        let mut t = thresholds();
        t.interest_rate = 0.0;
        assert_eq!(danger_level(&b, &counters, &t), 60);

        let surplus = budget(110.0, 100.0, 0.0, 100.0);
        let calm = GlobalCounters {
            cm: 100.0,
            ..GlobalCounters::default()
        };
        assert_eq!(danger_level(&surplus, &calm, &t), 0);

        let zero_gdp = budget(0.0, 0.0, 0.0, 0.0);
        assert_eq!(danger_level(&zero_gdp, &calm, &thresholds()), 0);
    }

    #[test]
    fn levels_map_to_labels() {
        assert_eq!(TroikaLevel::from_danger(0), TroikaLevel::Stable);
        assert_eq!(TroikaLevel::from_danger(24), TroikaLevel::Stable);
        assert_eq!(TroikaLevel::from_danger(25), TroikaLevel::Surveillance);
        assert_eq!(TroikaLevel::from_danger(74).label(), "Alerte");
        assert_eq!(TroikaLevel::from_danger(100).label(), "Danger Imminent");
    }

    #[test]
    fn warning_bands() {
        let t = thresholds();
        let counters = GlobalCounters::default();
        assert_eq!(
            warning_level(&budget(100.0, 101.0, 50.0, 100.0), &counters, &t),
            WarningLevel::Safe
        );
        assert_eq!(
            warning_level(&budget(100.0, 102.5, 50.0, 100.0), &counters, &t),
            WarningLevel::Warning
        );
        assert_eq!(
            warning_level(&budget(100.0, 100.0, 130.0, 100.0), &counters, &t),
            WarningLevel::Danger
        );
        let broke = GlobalCounters {
            cm: 0.0,
            ..GlobalCounters::default()
        };
        assert_eq!(
            warning_level(&budget(100.0, 100.0, 0.0, 100.0), &broke, &t),
            WarningLevel::Danger
        );
    }

    #[test]
    fn warnings_list_each_stressed_criterion() {
        let t = thresholds();
        let stressed = budget(100.0, 102.5, 100.0, 100.0);
        let nervous = GlobalCounters {
            cm: 40.0,
            ..GlobalCounters::default()
        };
        let warnings = troika_warnings(&stressed, &nervous, &t);
        assert_eq!(warnings.len(), 3, "{warnings:?}");
        assert!(warnings[0].starts_with("Déficit public à 2.5%"));
        assert!(warnings[1].starts_with("Dette publique à 100.0%"));
        assert!(warnings[2].contains("minimum 30"));

        let fine = budget(100.0, 100.0, 10.0, 100.0);
        assert!(troika_warnings(&fine, &GlobalCounters::default(), &t).is_empty());
    }
}
