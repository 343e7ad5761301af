//! Ministry and government index rollups plus the risk damping factor.
use serde::{Deserialize, Serialize};

use crate::constants::{
    COUNTER_MAX, NEUTRAL_INDEX, RISK_DAMP_LEG_WEIGHT, RISK_DAMP_MAX, RISK_DAMP_RJ_WEIGHT,
    RISK_DAMP_TS_WEIGHT, VEDETTE_KPI_COUNT,
};
use crate::difficulty::Weights;
use crate::kpi::{Kpi, Ministry, YearMonth};
use crate::numbers::{clamp, round_f64_to_i32};

/// One KPI's contribution to a ministry index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiScore {
    pub kpi_id: String,
    pub normalized: f64,
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinistryIpm {
    pub ministry: Ministry,
    pub ipm: i32,
    pub kpis: Vec<KpiScore>,
}

fn ministry_kpis(ministry: Ministry, kpis: &[Kpi]) -> impl Iterator<Item = &Kpi> {
    kpis.iter().filter(move |kpi| kpi.ministry == ministry)
}

/// Ministries in order of first appearance.
fn ministries_of(kpis: &[Kpi]) -> Vec<Ministry> {
    let mut seen = Vec::new();
    for kpi in kpis {
        if !seen.contains(&kpi.ministry) {
            seen.push(kpi.ministry);
        }
    }
    seen
}

/// Weighted normalised mean on a 0..100 scale, neutral when weightless.
fn weighted_index<'a>(samples: impl Iterator<Item = (&'a Kpi, f64)>) -> i32 {
    let (weighted, total) = samples.fold((0.0, 0.0), |(sum, total), (kpi, value)| {
        (
            kpi.weight_in_ipm.mul_add(kpi.normalize(value), sum),
            total + kpi.weight_in_ipm,
        )
    });
    if total == 0.0 {
        NEUTRAL_INDEX
    } else {
        round_f64_to_i32(100.0 * weighted / total)
    }
}

/// Indice de Performance Ministériel for `ministry`, 0..100.
#[must_use]
pub fn calculate_ipm(ministry: Ministry, kpis: &[Kpi]) -> i32 {
    weighted_index(ministry_kpis(ministry, kpis).map(|kpi| (kpi, kpi.current_value())))
}

#[must_use]
pub fn calculate_all_ipms(kpis: &[Kpi]) -> Vec<MinistryIpm> {
    ministries_of(kpis)
        .into_iter()
        .map(|ministry| MinistryIpm {
            ministry,
            ipm: calculate_ipm(ministry, kpis),
            kpis: ministry_kpis(ministry, kpis)
                .map(|kpi| {
                    let value = kpi.current_value();
                    KpiScore {
                        kpi_id: kpi.kpi_id.clone(),
                        normalized: kpi.normalize(value),
                        value,
                        label: kpi.label.clone(),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Indice Global de Gouvernement: weighted mean of the IPMs of every ministry
/// that owns at least one KPI.
#[must_use]
pub fn calculate_igg(kpis: &[Kpi], weights: &Weights) -> i32 {
    let (weighted, total) = ministries_of(kpis)
        .into_iter()
        .fold((0.0, 0.0), |(sum, total), ministry| {
            let weight = weights.ministry(ministry);
            let ipm = f64::from(calculate_ipm(ministry, kpis));
            (weight.mul_add(ipm, sum), total + weight)
        });
    if total == 0.0 {
        NEUTRAL_INDEX
    } else {
        round_f64_to_i32(weighted / total)
    }
}

fn window_months(current_month: u32, history_length: u32) -> std::ops::RangeInclusive<u32> {
    let first = (current_month + 1).saturating_sub(history_length);
    first..=current_month
}

/// IPM for each of the last `history_length` game months, oldest first.
/// A KPI without an entry for a month contributes its current value.
#[must_use]
pub fn ipm_history(
    ministry: Ministry,
    kpis: &[Kpi],
    start: YearMonth,
    current_month: u32,
    history_length: u32,
) -> Vec<i32> {
    let own: Vec<&Kpi> = ministry_kpis(ministry, kpis).collect();
    if own.is_empty() {
        let len = usize::try_from(history_length).unwrap_or_default();
        return vec![NEUTRAL_INDEX; len];
    }
    window_months(current_month, history_length)
        .map(|month| {
            weighted_index(
                own.iter()
                    .map(|kpi| (*kpi, kpi.value_at_month(start, month))),
            )
        })
        .collect()
}

/// Normalised KPI series on a 0..100 scale for sparklines.
#[must_use]
pub fn kpi_normalized_history(
    kpi: &Kpi,
    start: YearMonth,
    current_month: u32,
    history_length: u32,
) -> Vec<f64> {
    window_months(current_month, history_length)
        .map(|month| kpi.normalize(kpi.value_at_month(start, month)) * 100.0)
        .collect()
}

/// The ministry's headline KPIs: highest IPM weight first.
#[must_use]
pub fn vedette_kpis(ministry: Ministry, kpis: &[Kpi]) -> Vec<&Kpi> {
    let mut own: Vec<&Kpi> = ministry_kpis(ministry, kpis).collect();
    own.sort_by(|a, b| b.weight_in_ipm.total_cmp(&a.weight_in_ipm));
    own.truncate(VEDETTE_KPI_COUNT);
    own
}

/// Effect suppression under social and legal stress, in `[0, 0.5]`.
#[must_use]
pub fn calculate_risk_damp(ts: f64, rj: f64, leg: f64) -> f64 {
    let raw = (ts / COUNTER_MAX).mul_add(
        RISK_DAMP_TS_WEIGHT,
        (rj / COUNTER_MAX).mul_add(RISK_DAMP_RJ_WEIGHT, -(leg / COUNTER_MAX) * RISK_DAMP_LEG_WEIGHT),
    );
    clamp(raw, 0.0, RISK_DAMP_MAX)
}
