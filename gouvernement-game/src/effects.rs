//! Profile curves that phase scheduled effects in over their lag window.
use crate::cards::{Effect, Interval, Lags, Profile};
use crate::constants::{EXP_TIME_CONSTANT_DIVISOR, SIGMOID_STEEPNESS};
use crate::state::ScheduledEffect;

/// Whether `months_since_applied` falls in `[start, start + ramp + duration - 1]`.
#[must_use]
pub fn is_effect_active(lags: Lags, months_since_applied: u32) -> bool {
    lags.window_end().is_some_and(|end| (lags.start..=end).contains(&months_since_applied))
}

/// Share of the target delta delivered at `months_since_applied`, in `[0, 1]`.
/// Exactly zero outside the activation window.
#[must_use]
pub fn profile_factor(profile: Profile, lags: Lags, months_since_applied: u32) -> f64 {
    if !is_effect_active(lags, months_since_applied) {
        return 0.0;
    }
    let position = f64::from(months_since_applied - lags.start);
    let ramp = f64::from(lags.ramp);

    match profile {
        Profile::Step => 1.0,
        Profile::Linear => {
            if position < ramp {
                position / ramp
            } else {
                1.0
            }
        }
        // a zero ramp means the effect is already fully phased in
        Profile::Sigmoid if lags.ramp == 0 => 1.0,
        Profile::Sigmoid => {
            let steepness = SIGMOID_STEEPNESS / ramp;
            1.0 / (1.0 + (-steepness * (position - ramp / 2.0)).exp())
        }
        Profile::Exp if lags.ramp == 0 => 1.0,
        Profile::Exp => {
            let tau = ramp / EXP_TIME_CONSTANT_DIVISOR;
            1.0 - (-position / tau).exp()
        }
    }
}

/// Delta to apply this month: `delta * (1 - risk_damp) * profile_factor`.
#[must_use]
pub fn effect_delta(
    effect: &Effect,
    lags: Lags,
    profile: Profile,
    months_since_applied: u32,
    risk_damp: f64,
) -> f64 {
    let factor = profile_factor(profile, lags, months_since_applied);
    if factor == 0.0 {
        return 0.0;
    }
    effect.delta * (1.0 - risk_damp) * factor
}

/// Confidence band of the effect at `months_since_applied`. Display only.
#[must_use]
pub fn effect_interval(
    effect: &Effect,
    lags: Lags,
    profile: Profile,
    months_since_applied: u32,
) -> Interval {
    effect
        .interval
        .scaled(profile_factor(profile, lags, months_since_applied))
}

impl ScheduledEffect {
    /// Months elapsed since the effect was scheduled, `None` if `month` precedes it.
    #[must_use]
    pub fn months_since_applied(&self, month: u32) -> Option<u32> {
        month.checked_sub(self.applied_at)
    }

    #[must_use]
    pub fn is_active_at(&self, month: u32) -> bool {
        self.months_since_applied(month)
            .is_some_and(|elapsed| is_effect_active(self.lags, elapsed))
    }

    /// KPI delta contributed in `month` under `risk_damp`.
    #[must_use]
    pub fn delta_at(&self, month: u32, risk_damp: f64) -> f64 {
        self.months_since_applied(month).map_or(0.0, |elapsed| {
            effect_delta(&self.effect, self.lags, self.profile, elapsed, risk_damp)
        })
    }
}

/// Scheduled effects whose window contains `month`.
#[must_use]
pub fn active_effects(scheduled: &[ScheduledEffect], month: u32) -> Vec<&ScheduledEffect> {
    scheduled
        .iter()
        .filter(|effect| effect.is_active_at(month))
        .collect()
}
