//! Policy cards, their options and the synergy/antagonism rule book.
use serde::{Deserialize, Serialize};

use crate::kpi::Ministry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Budget,
    Law,
    Decree,
    Diplomacy,
    Communication,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    #[default]
    Med,
    High,
}

/// Phase-in shape of an effect over its ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    #[default]
    Step,
    Linear,
    Sigmoid,
    Exp,
}

/// Timing of an effect in months since the card was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Lags {
    pub start: u32,
    pub ramp: u32,
    pub duration: u32,
}

impl Lags {
    /// Last month offset (inclusive) at which the effect still contributes,
    /// or `None` when `ramp + duration` is zero and the effect never applies.
    #[must_use]
    pub fn window_end(self) -> Option<u32> {
        let end = u64::from(self.start) + u64::from(self.ramp) + u64::from(self.duration);
        if self.ramp == 0 && self.duration == 0 {
            return None;
        }
        Some(u32::try_from(end - 1).unwrap_or(u32::MAX))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            min: self.min * factor,
            max: self.max * factor,
        }
    }
}

/// Target change to one KPI, in KPI units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub kpi_id: String,
    pub delta: f64,
    #[serde(default)]
    pub interval: Interval,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub profile: Profile,
}

impl Effect {
    #[must_use]
    pub fn scaled(&self, multiplier: f64) -> Self {
        Self {
            delta: self.delta * multiplier,
            interval: self.interval.scaled(multiplier),
            ..self.clone()
        }
    }
}

/// Immediate price of an option. `eur` may be negative (new revenue).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Costs {
    #[serde(default)]
    pub eur: f64,
    #[serde(default)]
    pub cp: f64,
    #[serde(default)]
    pub leg: f64,
    #[serde(default)]
    pub rj: f64,
    #[serde(default)]
    pub cm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Risks {
    #[serde(rename = "probRJ", default, skip_serializing_if = "Option::is_none")]
    pub prob_rj: Option<f64>,
    #[serde(rename = "probStrike", default, skip_serializing_if = "Option::is_none")]
    pub prob_strike: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardOption {
    pub label: String,
    #[serde(default)]
    pub costs: Costs,
    #[serde(default)]
    pub lags: Lags,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risks: Option<Risks>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synergies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub antagonisms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub card_id: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub ministries: Vec<Ministry>,
    pub options: Vec<CardOption>,
}

impl Card {
    #[must_use]
    pub fn is_event(&self) -> bool {
        self.card_type == CardType::Event
    }

    /// Display name, falling back to the id.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.card_id)
    }
}

/// Amplifies an option's effects when every listed card has been played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergyRule {
    pub rule_id: String,
    pub cards: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ramp_reduction: Option<f64>,
}

/// Dampens an option's effects when every listed card has been played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AntagonismRule {
    pub rule_id: String,
    pub cards: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ramp_increase: Option<f64>,
}

/// The full rule book consulted when an option is played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CausalityRules {
    #[serde(default)]
    pub synergies: Vec<SynergyRule>,
    #[serde(default)]
    pub antagonisms: Vec<AntagonismRule>,
}

impl CausalityRules {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.synergies.is_empty() && self.antagonisms.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CardsDataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub cards: Vec<Card>,
    #[serde(default)]
    pub synergy_rules: Vec<SynergyRule>,
    #[serde(default)]
    pub antagonism_rules: Vec<AntagonismRule>,
}

impl CardsDataset {
    /// Load a card dataset from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a valid dataset.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn rules(&self) -> CausalityRules {
        CausalityRules {
            synergies: self.synergy_rules.clone(),
            antagonisms: self.antagonism_rules.clone(),
        }
    }
}

/// Find a card by id.
#[must_use]
pub fn find_card<'a>(cards: &'a [Card], card_id: &str) -> Option<&'a Card> {
    cards.iter().find(|card| card.card_id == card_id)
}
