use std::fmt;

use gouvernement_game::{Card, CardOption, GameState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Months a card stays off the table once played.
pub const CARD_COOLDOWN_MONTHS: u32 = 6;
/// Political capital the balanced policy refuses to spend below.
pub const BALANCED_CP_RESERVE: f64 = 30.0;
const RANDOM_PLAY_PROBABILITY: f64 = 0.6;

/// One play chosen by a [`PlayerPolicy`].
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDecision {
    pub card_id: String,
    pub option_index: usize,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(card_id: impl Into<String>, option_index: usize, rationale: Option<String>) -> Self {
        Self {
            card_id: card_id.into(),
            option_index,
            rationale,
        }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Next play for the current month, or `None` to end the month.
    fn pick_play(&mut self, state: &GameState) -> Option<PolicyDecision>;
}

/// Built-in strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameplayStrategy {
    Idle,
    Austerity,
    Stimulus,
    Balanced,
    Random,
}

impl GameplayStrategy {
    pub const ALL: [Self; 5] = [
        Self::Idle,
        Self::Austerity,
        Self::Stimulus,
        Self::Balanced,
        Self::Random,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Austerity => "Austerity",
            Self::Stimulus => "Stimulus",
            Self::Balanced => "Balanced",
            Self::Random => "Random",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Idle => Box::new(IdlePolicy),
            Self::Austerity => Box::new(AusterityPolicy),
            Self::Stimulus => Box::new(StimulusPolicy),
            Self::Balanced => Box::new(BalancedPolicy {
                reserve: BALANCED_CP_RESERVE,
            }),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct IdlePolicy;
struct AusterityPolicy;
struct StimulusPolicy;

struct BalancedPolicy {
    reserve: f64,
}

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

/// A candidate play with its option resolved.
struct Candidate<'a> {
    card: &'a Card,
    option_index: usize,
    option: &'a CardOption,
}

impl Candidate<'_> {
    fn decision(&self, rationale: String) -> PolicyDecision {
        PolicyDecision::new(self.card.card_id.as_str(), self.option_index, Some(rationale))
    }

    fn magnitude(&self) -> f64 {
        self.option.effects.iter().map(|effect| effect.delta.abs()).sum()
    }
}

fn on_cooldown(state: &GameState, card_id: &str) -> bool {
    state.played_cards.iter().any(|played| {
        played.card_id == card_id
            && state.current_month.saturating_sub(played.played_at) < CARD_COOLDOWN_MONTHS
    })
}

/// Options of non-event cards off cooldown, with at least one effect and a
/// political-capital cost the government can still pay.
fn candidates(state: &GameState) -> Vec<Candidate<'_>> {
    state
        .cards
        .iter()
        .filter(|card| !card.is_event() && !on_cooldown(state, &card.card_id))
        .flat_map(|card| {
            card.options
                .iter()
                .enumerate()
                .map(move |(option_index, option)| Candidate {
                    card,
                    option_index,
                    option,
                })
        })
        .filter(|candidate| {
            !candidate.option.effects.is_empty() && candidate.option.costs.cp <= state.counters.cp
        })
        .collect()
}

impl PlayerPolicy for IdlePolicy {
    fn name(&self) -> &'static str {
        "Idle"
    }

    fn pick_play(&mut self, _state: &GameState) -> Option<PolicyDecision> {
        None
    }
}

impl PlayerPolicy for AusterityPolicy {
    fn name(&self) -> &'static str {
        "Austerity"
    }

    fn pick_play(&mut self, state: &GameState) -> Option<PolicyDecision> {
        candidates(state)
            .into_iter()
            .filter(|candidate| candidate.option.costs.eur < 0.0)
            .min_by(|a, b| a.option.costs.eur.total_cmp(&b.option.costs.eur))
            .map(|candidate| candidate.decision(format!("eur {}", candidate.option.costs.eur)))
    }
}

impl PlayerPolicy for StimulusPolicy {
    fn name(&self) -> &'static str {
        "Stimulus"
    }

    fn pick_play(&mut self, state: &GameState) -> Option<PolicyDecision> {
        candidates(state)
            .into_iter()
            .max_by(|a, b| a.magnitude().total_cmp(&b.magnitude()))
            .map(|candidate| candidate.decision(format!("magnitude {:.2}", candidate.magnitude())))
    }
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn pick_play(&mut self, state: &GameState) -> Option<PolicyDecision> {
        candidates(state)
            .into_iter()
            .filter(|candidate| state.counters.cp - candidate.option.costs.cp >= self.reserve)
            .min_by(|a, b| {
                a.option
                    .costs
                    .eur
                    .total_cmp(&b.option.costs.eur)
                    .then(a.option.costs.cp.total_cmp(&b.option.costs.cp))
            })
            .map(|candidate| {
                candidate.decision(format!(
                    "eur {} cp left {}",
                    candidate.option.costs.eur,
                    state.counters.cp - candidate.option.costs.cp
                ))
            })
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_play(&mut self, state: &GameState) -> Option<PolicyDecision> {
        if !self.rng.gen_bool(RANDOM_PLAY_PROBABILITY) {
            return None;
        }
        let pool = candidates(state);
        if pool.is_empty() {
            return None;
        }
        let pick = &pool[self.rng.gen_range(0..pool.len())];
        Some(pick.decision(format!("draw of {}", pool.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gouvernement_game::Datasets;

    fn state() -> GameState {
        let datasets = Datasets::bundled().unwrap();
        GameState::new("policy", 7, &datasets, datasets.default_objective_selection())
    }

    #[test]
    fn idle_never_plays() {
        assert!(GameplayStrategy::Idle.create_policy(1).pick_play(&state()).is_none());
    }

    #[test]
    fn austerity_picks_the_deepest_cut() {
        let state = state();
        let decision = GameplayStrategy::Austerity
            .create_policy(1)
            .pick_play(&state)
            .unwrap();
        let card = state
            .cards
            .iter()
            .find(|card| card.card_id == decision.card_id)
            .unwrap();
        let eur = card.options[decision.option_index].costs.eur;
        assert!(eur < 0.0);
        assert!(candidates(&state).iter().all(|c| c.option.costs.eur >= eur));
    }

    #[test]
    fn played_cards_go_on_cooldown() {
        let mut policy = GameplayStrategy::Stimulus.create_policy(1);
        let state = state();
        let first = policy.pick_play(&state).unwrap();
        let next = state.play(&first.card_id, first.option_index).unwrap();
        let second = policy.pick_play(&next).unwrap();
        assert_ne!(first.card_id, second.card_id);
    }

    #[test]
    fn balanced_keeps_its_reserve() {
        let mut state = state();
        state.counters.cp = BALANCED_CP_RESERVE + 5.0;
        let mut policy = GameplayStrategy::Balanced.create_policy(1);
        if let Some(decision) = policy.pick_play(&state) {
            let card = state
                .cards
                .iter()
                .find(|card| card.card_id == decision.card_id)
                .unwrap();
            assert!(card.options[decision.option_index].costs.cp <= 5.0);
        }
    }

    #[test]
    fn random_policy_is_reproducible() {
        let state = state();
        let picks = |seed| {
            let mut policy = GameplayStrategy::Random.create_policy(seed);
            (0..8).map(|_| policy.pick_play(&state)).collect::<Vec<_>>()
        };
        assert_eq!(picks(42), picks(42));
    }

    #[test]
    fn policies_never_choose_events() {
        let state = state();
        for strategy in GameplayStrategy::ALL {
            let mut policy = strategy.create_policy(3);
            for _ in 0..8 {
                if let Some(decision) = policy.pick_play(&state) {
                    assert!(!decision.card_id.starts_with("event_"), "{strategy}");
                }
            }
        }
    }
}
