//! Bundled reference data and the four-dataset bundle a game is built from.
use serde::{Deserialize, Serialize};

use crate::cards::CardsDataset;
use crate::difficulty::DifficultyDataset;
use crate::kpi::KpiDataset;
use crate::objectives::ObjectivesDataset;

const BUNDLED_KPIS: &str = include_str!("../../assets/data/kpis.json");
const BUNDLED_CARDS: &str = include_str!("../../assets/data/cards.json");
const BUNDLED_OBJECTIVES: &str = include_str!("../../assets/data/objectives.json");
const BUNDLED_DIFFICULTY: &str = include_str!("../../assets/data/difficulty.json");

/// Validated reference data for one playthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datasets {
    pub kpis: KpiDataset,
    pub cards: CardsDataset,
    pub objectives: ObjectivesDataset,
    pub difficulty: DifficultyDataset,
}

impl Datasets {
    /// Parse the four datasets from their JSON documents.
    ///
    /// # Errors
    ///
    /// Returns the first parse error encountered.
    pub fn from_json_parts(
        kpis: &str,
        cards: &str,
        objectives: &str,
        difficulty: &str,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            kpis: KpiDataset::from_json(kpis)?,
            cards: CardsDataset::from_json(cards)?,
            objectives: ObjectivesDataset::from_json(objectives)?,
            difficulty: DifficultyDataset::from_json(difficulty)?,
        })
    }

    /// The datasets compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON is malformed.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json_parts(
            BUNDLED_KPIS,
            BUNDLED_CARDS,
            BUNDLED_OBJECTIVES,
            BUNDLED_DIFFICULTY,
        )
    }

    /// Ids of the first `difficulty.objectiveSelection.choose` objectives.
    #[must_use]
    pub fn default_objective_selection(&self) -> Vec<String> {
        let take = usize::try_from(self.difficulty.objective_selection.choose).unwrap_or(usize::MAX);
        self.objectives
            .objectives
            .iter()
            .take(take)
            .map(|objective| objective.objective_id.clone())
            .collect()
    }
}
