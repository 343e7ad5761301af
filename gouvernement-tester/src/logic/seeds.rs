use std::collections::HashSet;

use gouvernement_game::hash_string;

pub const DEFAULT_SEED: u32 = 1337;

/// A resolved seed and the save id it was derived from, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u32,
    pub save_id: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u32) -> Self {
        Self {
            seed,
            save_id: None,
        }
    }

    #[must_use]
    pub fn from_save_id(save_id: &str) -> Self {
        Self {
            seed: hash_string(save_id),
            save_id: Some(save_id.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        self.save_id
            .as_ref()
            .map_or_else(|| self.seed.to_string(), |id| format!("{id} ({})", self.seed))
    }
}

/// Resolve CLI seed tokens. Integers that fit in 32 bits are used as-is
/// (negative values by magnitude); anything else is treated as a save id and
/// hashed the way new games derive their seed. Duplicates keep the first
/// occurrence.
#[must_use]
pub fn resolve_seed_inputs(tokens: &[String]) -> Vec<SeedInfo> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let info = token
            .parse::<i64>()
            .ok()
            .and_then(|value| u32::try_from(value.unsigned_abs()).ok())
            .map_or_else(|| SeedInfo::from_save_id(token), SeedInfo::from_numeric);
        if seen.insert(info.seed) {
            resolved.push(info);
        }
    }

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }
    resolved
}
