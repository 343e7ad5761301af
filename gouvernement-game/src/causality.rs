//! Synergy and antagonism resolution for an option about to be played.
//!
//! Rules fire when every card they list has already been played. Each stage
//! is applied in ascending `rule_id` order so the outcome never depends on the
//! order rules were declared in, and synergies always run before antagonisms.
use smallvec::SmallVec;
use std::collections::HashSet;

use crate::cards::{AntagonismRule, CardOption, CausalityRules, SynergyRule};
use crate::constants::{DEFAULT_ANTAGONISM_MULTIPLIER, DEFAULT_SYNERGY_MULTIPLIER};
use crate::numbers::floor_f64_to_u32;

/// Rule ids that fired, in application order.
pub type RuleTrace = SmallVec<[String; 2]>;

/// The option as it will actually be scheduled, plus what modified it.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalityOutcome {
    pub option: CardOption,
    pub synergies_applied: RuleTrace,
    pub antagonisms_applied: RuleTrace,
}

/// Common shape of the two rule kinds.
trait CausalityRule {
    fn rule_id(&self) -> &str;
    fn cards(&self) -> &[String];
    fn multiplier(&self) -> f64;
    fn adjust_ramp(&self, ramp: u32) -> u32;
}

impl CausalityRule for SynergyRule {
    fn rule_id(&self) -> &str {
        &self.rule_id
    }

    fn cards(&self) -> &[String] {
        &self.cards
    }

    fn multiplier(&self) -> f64 {
        self.multiplier.unwrap_or(DEFAULT_SYNERGY_MULTIPLIER)
    }

    fn adjust_ramp(&self, ramp: u32) -> u32 {
        match self.ramp_reduction {
            Some(reduction) if reduction != 0.0 => {
                floor_f64_to_u32(f64::from(ramp) * (1.0 - reduction))
            }
            _ => ramp,
        }
    }
}

impl CausalityRule for AntagonismRule {
    fn rule_id(&self) -> &str {
        &self.rule_id
    }

    fn cards(&self) -> &[String] {
        &self.cards
    }

    fn multiplier(&self) -> f64 {
        self.multiplier.unwrap_or(DEFAULT_ANTAGONISM_MULTIPLIER)
    }

    fn adjust_ramp(&self, ramp: u32) -> u32 {
        match self.ramp_increase {
            Some(increase) if increase != 0.0 => {
                floor_f64_to_u32(f64::from(ramp) * (1.0 + increase))
            }
            _ => ramp,
        }
    }
}

fn apply_stage<R: CausalityRule>(
    active: &HashSet<&str>,
    rules: &[R],
    option: &mut CardOption,
) -> RuleTrace {
    let mut ordered: Vec<&R> = rules.iter().collect();
    ordered.sort_by(|a, b| a.rule_id().cmp(b.rule_id()));

    let mut fired = RuleTrace::new();
    for rule in ordered {
        if !rule.cards().iter().all(|card| active.contains(card.as_str())) {
            continue;
        }
        let multiplier = rule.multiplier();
        for effect in &mut option.effects {
            *effect = effect.scaled(multiplier);
        }
        option.lags.ramp = rule.adjust_ramp(option.lags.ramp);
        log::trace!("rule {} fired (x{multiplier})", rule.rule_id());
        fired.push(rule.rule_id().to_string());
    }
    fired
}

/// Resolve the rule book against the cards already played.
#[must_use]
pub fn apply_causality_rules<'a, I>(
    active_card_ids: I,
    rules: &CausalityRules,
    option: &CardOption,
) -> CausalityOutcome
where
    I: IntoIterator<Item = &'a str>,
{
    let active: HashSet<&str> = active_card_ids.into_iter().collect();
    let mut modified = option.clone();
    let synergies_applied = apply_stage(&active, &rules.synergies, &mut modified);
    let antagonisms_applied = apply_stage(&active, &rules.antagonisms, &mut modified);
    CausalityOutcome {
        option: modified,
        synergies_applied,
        antagonisms_applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Confidence, Costs, Effect, Interval, Lags, Profile};

    fn option(delta: f64, ramp: u32) -> CardOption {
        CardOption {
            label: "opt".into(),
            costs: Costs::default(),
            lags: Lags {
                start: 0,
                ramp,
                duration: 6,
            },
            effects: vec![Effect {
                kpi_id: "gdp_growth".into(),
                delta,
                interval: Interval {
                    min: delta - 1.0,
                    max: delta + 1.0,
                },
                confidence: Confidence::High,
                profile: Profile::Linear,
            }],
            risks: None,
            synergies: Vec::new(),
            antagonisms: Vec::new(),
        }
    }

    fn synergy(id: &str, cards: &[&str], multiplier: Option<f64>) -> SynergyRule {
        SynergyRule {
            rule_id: id.into(),
            cards: cards.iter().map(|c| (*c).to_string()).collect(),
            multiplier,
            ramp_reduction: None,
        }
    }

    fn antagonism(id: &str, cards: &[&str], multiplier: Option<f64>) -> AntagonismRule {
        AntagonismRule {
            rule_id: id.into(),
            cards: cards.iter().map(|c| (*c).to_string()).collect(),
            multiplier,
            ramp_increase: None,
        }
    }

    #[test]
    fn synergies_precede_antagonisms() {
        let rules = CausalityRules {
            synergies: vec![synergy("s", &["a"], Some(2.0))],
            antagonisms: vec![antagonism("a", &["a"], Some(0.5))],
        };
        let outcome = apply_causality_rules(["a"], &rules, &option(10.0, 4));
        assert!((outcome.option.effects[0].delta - 10.0).abs() < f64::EPSILON);
        assert_eq!(outcome.synergies_applied.as_slice(), ["s".to_string()]);
        assert_eq!(outcome.antagonisms_applied.as_slice(), ["a".to_string()]);
    }

    #[test]
    fn rules_need_every_listed_card() {
        let rules = CausalityRules {
            synergies: vec![synergy("pair", &["a", "b"], None)],
            antagonisms: Vec::new(),
        };
        let base = option(10.0, 4);
        let partial = apply_causality_rules(["a"], &rules, &base);
        assert_eq!(partial.option, base);
        assert!(partial.synergies_applied.is_empty());

        let full = apply_causality_rules(["b", "a", "z"], &rules, &base);
        assert!((full.option.effects[0].delta - 11.5).abs() < 1e-12);
        assert!((full.option.effects[0].interval.max - 11.0 * 1.15).abs() < 1e-12);
    }

    #[test]
    fn default_multipliers_compound() {
        let rules = CausalityRules {
            synergies: vec![synergy("s2", &[], None), synergy("s1", &[], None)],
            antagonisms: vec![antagonism("x", &[], None)],
        };
        let outcome = apply_causality_rules(std::iter::empty(), &rules, &option(100.0, 0));
        let expected = 100.0 * 1.15 * 1.15 * 0.75;
        assert!((outcome.option.effects[0].delta - expected).abs() < 1e-9);
        assert_eq!(
            outcome.synergies_applied.as_slice(),
            ["s1".to_string(), "s2".to_string()]
        );
    }

    #[test]
    fn ramp_adjustments_floor() {
        let mut reduce = synergy("s", &[], None);
        reduce.ramp_reduction = Some(0.25);
        let mut extend = antagonism("a", &[], None);
        extend.ramp_increase = Some(0.5);

        let rules = CausalityRules {
            synergies: vec![reduce],
            antagonisms: Vec::new(),
        };
        let outcome = apply_causality_rules(std::iter::empty(), &rules, &option(1.0, 5));
        assert_eq!(outcome.option.lags.ramp, 3);

        let rules = CausalityRules {
            synergies: Vec::new(),
            antagonisms: vec![extend],
        };
        let outcome = apply_causality_rules(std::iter::empty(), &rules, &option(1.0, 5));
        assert_eq!(outcome.option.lags.ramp, 7);
    }

    #[test]
    fn input_option_is_not_modified() {
        let rules = CausalityRules {
            synergies: vec![synergy("s", &[], Some(3.0))],
            antagonisms: Vec::new(),
        };
        let base = option(2.0, 2);
        let snapshot = base.clone();
        let _ = apply_causality_rules(std::iter::empty(), &rules, &base);
        assert_eq!(base, snapshot);
    }
}
