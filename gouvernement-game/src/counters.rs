//! The five global counters and the monthly rules that move them.
use serde::{Deserialize, Serialize};

use crate::cards::Costs;
use crate::constants::{
    COUNTER_MAX, COUNTER_MIN, CP_CRISIS_LEG_THRESHOLD, CP_CRISIS_TS_THRESHOLD, INITIAL_CM,
    INITIAL_CP, INITIAL_LEG, INITIAL_RJ, INITIAL_TS, KPI_CARBON, KPI_CRIME, KPI_DEBT, KPI_DEFICIT,
    KPI_EDUCATION_SUCCESS, KPI_EMPLOYMENT, KPI_GDP_GROWTH, KPI_HOSPITAL_CAPACITY, KPI_INFLATION,
    KPI_INVESTMENT, KPI_POVERTY, KPI_PUBLIC_TRUST, PASSIVE_CP_RECOVERY, PASSIVE_TS_DECAY,
    RJ_MONTHLY_DECAY,
};
use crate::kpi::{Kpi, find_kpi};
use crate::numbers::clamp;

/// Tension sociale, confiance des marchés, légitimité, risques juridiques and
/// capital politique. Each lives in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalCounters {
    pub ts: f64,
    pub cm: f64,
    pub leg: f64,
    pub rj: f64,
    pub cp: f64,
}

impl Default for GlobalCounters {
    fn default() -> Self {
        Self {
            ts: INITIAL_TS,
            cm: INITIAL_CM,
            leg: INITIAL_LEG,
            rj: INITIAL_RJ,
            cp: INITIAL_CP,
        }
    }
}

fn bound(value: f64) -> f64 {
    clamp(value, COUNTER_MIN, COUNTER_MAX)
}

impl GlobalCounters {
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            ts: bound(self.ts),
            cm: bound(self.cm),
            leg: bound(self.leg),
            rj: bound(self.rj),
            cp: bound(self.cp),
        }
    }

    /// Pay an option's immediate price. Legal risk grows; the rest is spent.
    #[must_use]
    pub fn apply_costs(self, costs: &Costs) -> Self {
        Self {
            ts: self.ts,
            cm: self.cm - costs.cm,
            leg: self.leg - costs.leg,
            rj: self.rj + costs.rj,
            cp: self.cp - costs.cp,
        }
        .clamped()
    }

    /// Fixed month-end drift: tension eases, political capital recovers.
    #[must_use]
    pub fn passive_drift(self) -> Self {
        Self {
            ts: self.ts - PASSIVE_TS_DECAY,
            cp: self.cp + PASSIVE_CP_RECOVERY,
            ..self
        }
        .clamped()
    }

    #[must_use]
    pub fn all_in_bounds(&self) -> bool {
        [self.ts, self.cm, self.leg, self.rj, self.cp]
            .iter()
            .all(|value| (COUNTER_MIN..=COUNTER_MAX).contains(value))
    }
}

/// KPI readings for one month; unknown ids read as 0.
struct Snapshot<'a> {
    current: &'a [Kpi],
    previous: &'a [Kpi],
}

impl Snapshot<'_> {
    fn read(kpis: &[Kpi], kpi_id: &str) -> f64 {
        find_kpi(kpis, kpi_id).map_or(0.0, Kpi::current_value)
    }

    fn now(&self, kpi_id: &str) -> f64 {
        Self::read(self.current, kpi_id)
    }

    fn delta(&self, kpi_id: &str) -> f64 {
        Self::read(self.current, kpi_id) - Self::read(self.previous, kpi_id)
    }
}

/// Recompute the counters from this month's KPIs against last month's.
#[must_use]
pub fn derive_from_kpis(counters: GlobalCounters, kpis: &[Kpi], previous: &[Kpi]) -> GlobalCounters {
    let snap = Snapshot {
        current: kpis,
        previous,
    };
    let mut next = counters;

    // Tension sociale
    let inflation = snap.now(KPI_INFLATION);
    if inflation > 4.0 {
        next.ts += 2.0;
    } else if inflation > 3.0 {
        next.ts += 1.0;
    }
    let unemployment = 100.0 - snap.now(KPI_EMPLOYMENT);
    if unemployment > 10.0 {
        next.ts += 3.0;
    } else if unemployment > 8.0 {
        next.ts += 1.0;
    }
    if snap.delta(KPI_POVERTY) > 0.5 {
        next.ts += 2.0;
    }
    if snap.delta(KPI_HOSPITAL_CAPACITY) < -5.0 {
        next.ts += 2.0;
    }

    // Confiance des marchés
    let deficit = snap.now(KPI_DEFICIT).abs();
    if deficit > 5.0 {
        next.cm -= 3.0;
    } else if deficit > 3.0 {
        next.cm -= 1.0;
    } else if deficit < 2.0 {
        next.cm += 1.0;
    }
    let debt = snap.now(KPI_DEBT);
    if debt > 120.0 {
        next.cm -= 2.0;
    } else if debt > 100.0 {
        next.cm -= 1.0;
    }
    let growth = snap.now(KPI_GDP_GROWTH);
    if growth > 2.0 {
        next.cm += 2.0;
    } else if growth > 1.0 {
        next.cm += 1.0;
    } else if growth < -1.0 {
        next.cm -= 2.0;
    }
    if snap.delta(KPI_INVESTMENT) > 0.5 {
        next.cm += 1.0;
    }

    // Légitimité
    let trust = snap.delta(KPI_PUBLIC_TRUST);
    if trust < -5.0 {
        next.leg -= 3.0;
    } else if trust > 5.0 {
        next.leg += 2.0;
    }
    if snap.delta(KPI_EDUCATION_SUCCESS) > 2.0 {
        next.leg += 1.0;
    }
    if snap.now(KPI_CRIME) > 50.0 {
        next.leg -= 1.0;
    } else if snap.delta(KPI_CRIME) < -5.0 {
        next.leg += 1.0;
    }

    // Risques juridiques
    next.rj = (next.rj - RJ_MONTHLY_DECAY).max(0.0);
    if snap.delta(KPI_CARBON) > 5.0 {
        next.rj += 1.0;
    }
    if snap.delta(KPI_EMPLOYMENT) < -1.0 {
        next.rj += 1.0;
    }

    // Capital politique: crisis feedback on the freshly updated counters
    if next.ts > CP_CRISIS_TS_THRESHOLD {
        next.cp -= 2.0;
    }
    if next.leg < CP_CRISIS_LEG_THRESHOLD {
        next.cp -= 1.0;
    }

    next.clamped()
}
