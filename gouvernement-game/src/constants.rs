//! Centralized balance and tuning constants for the governance simulation.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON datasets.

// Starting position -------------------------------------------------------
pub(crate) const INITIAL_TS: f64 = 50.0;
pub(crate) const INITIAL_CM: f64 = 50.0;
pub(crate) const INITIAL_LEG: f64 = 50.0;
pub(crate) const INITIAL_RJ: f64 = 50.0;
pub(crate) const INITIAL_CP: f64 = 100.0;
pub(crate) const INITIAL_REVENUE: f64 = 1_000.0;
pub(crate) const INITIAL_SPENDING: f64 = 1_100.0;
pub(crate) const INITIAL_DEBT: f64 = 2_800.0;
pub(crate) const INITIAL_GDP: f64 = 2_500.0;
pub(crate) const DEFAULT_START_DATE: &str = "2025-01";

// Counter bounds ----------------------------------------------------------
pub(crate) const COUNTER_MIN: f64 = 0.0;
pub(crate) const COUNTER_MAX: f64 = 100.0;

// Aggregation -------------------------------------------------------------
pub(crate) const NEUTRAL_INDEX: i32 = 50;
pub(crate) const DEFAULT_MINISTRY_WEIGHT: f64 = 1.0;
pub(crate) const VEDETTE_KPI_COUNT: usize = 2;

// Risk damping ------------------------------------------------------------
pub(crate) const RISK_DAMP_TS_WEIGHT: f64 = 0.4;
pub(crate) const RISK_DAMP_RJ_WEIGHT: f64 = 0.3;
pub(crate) const RISK_DAMP_LEG_WEIGHT: f64 = 0.2;
pub(crate) const RISK_DAMP_MAX: f64 = 0.5;

// Profile curves ----------------------------------------------------------
pub(crate) const SIGMOID_STEEPNESS: f64 = 6.0;
pub(crate) const EXP_TIME_CONSTANT_DIVISOR: f64 = 3.0;

// Causality ---------------------------------------------------------------
pub(crate) const DEFAULT_SYNERGY_MULTIPLIER: f64 = 1.15;
pub(crate) const DEFAULT_ANTAGONISM_MULTIPLIER: f64 = 0.75;

// Monthly passive drift ---------------------------------------------------
pub(crate) const PASSIVE_TS_DECAY: f64 = 1.0;
pub(crate) const PASSIVE_CP_RECOVERY: f64 = 2.0;
pub(crate) const RJ_MONTHLY_DECAY: f64 = 0.5;

// Counter derivation (KPI ids and thresholds) -----------------------------
pub(crate) const KPI_INFLATION: &str = "inflation_rate";
pub(crate) const KPI_EMPLOYMENT: &str = "employment_rate";
pub(crate) const KPI_POVERTY: &str = "poverty_rate";
pub(crate) const KPI_HOSPITAL_CAPACITY: &str = "hospital_capacity";
pub(crate) const KPI_DEFICIT: &str = "deficit_pct_gdp";
pub(crate) const KPI_DEBT: &str = "debt_pct_gdp";
pub(crate) const KPI_GDP_GROWTH: &str = "gdp_growth";
pub(crate) const KPI_INVESTMENT: &str = "investment_rate";
pub(crate) const KPI_PUBLIC_TRUST: &str = "public_trust";
pub(crate) const KPI_EDUCATION_SUCCESS: &str = "education_success_rate";
pub(crate) const KPI_CRIME: &str = "crime_rate";
pub(crate) const KPI_CARBON: &str = "carbon_emissions";
pub(crate) const CP_CRISIS_TS_THRESHOLD: f64 = 80.0;
pub(crate) const CP_CRISIS_LEG_THRESHOLD: f64 = 20.0;

// Event draw --------------------------------------------------------------
pub(crate) const EVENT_FORCED_TS_ABOVE: f64 = 60.0;
pub(crate) const EVENT_FORCED_CM_BELOW: f64 = 40.0;
pub(crate) const EVENT_BASE_CHANCE: f64 = 1.0 / 3.0;

// Troika ------------------------------------------------------------------
pub(crate) const DEFAULT_INTEREST_RATE: f64 = 0.03;
pub(crate) const MONTHS_PER_YEAR: u32 = 12;
pub(crate) const DANGER_WEIGHT_DEFICIT: f64 = 0.35;
pub(crate) const DANGER_WEIGHT_DEBT: f64 = 0.30;
pub(crate) const DANGER_WEIGHT_CM: f64 = 0.20;
pub(crate) const DANGER_WEIGHT_INTEREST: f64 = 0.15;
pub(crate) const WARNING_RATIO: f64 = 0.7;
pub(crate) const DANGER_RATIO: f64 = 1.0;

// Defeat reasons ----------------------------------------------------------
pub(crate) const REASON_MID_CHECKPOINT: &str = "Objectifs insuffisants au checkpoint mi-parcours";
pub(crate) const REASON_END_OF_MANDATE: &str = "Objectifs non atteints en fin de mandat";

// Save envelope -----------------------------------------------------------
pub(crate) const SAVE_FORMAT_VERSION: &str = "1.0";
