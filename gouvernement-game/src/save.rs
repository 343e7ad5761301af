//! Export envelope for moving a snapshot outside the store.
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::hash::Hasher;
use thiserror::Error;
use twox_hash::XxHash64;

use crate::constants::SAVE_FORMAT_VERSION;
use crate::state::GameState;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("malformed save: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save version '{found}' (expected '{expected}')")]
    UnsupportedVersion { found: String, expected: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGame {
    pub version: String,
    pub game_state: GameState,
    /// RFC 3339 timestamp.
    pub exported_at: String,
}

impl SaveGame {
    #[must_use]
    pub fn export(state: &GameState, exported_at: DateTime<Utc>) -> Self {
        Self {
            version: SAVE_FORMAT_VERSION.to_string(),
            game_state: state.clone(),
            exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    #[must_use]
    pub fn export_now(state: &GameState) -> Self {
        Self::export(state, Utc::now())
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an envelope and check its format version.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the version is not supported.
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let save: Self = serde_json::from_str(json)?;
        if save.version != SAVE_FORMAT_VERSION {
            return Err(SaveError::UnsupportedVersion {
                found: save.version,
                expected: SAVE_FORMAT_VERSION,
            });
        }
        Ok(save)
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.game_state
    }
}

/// Stable digest of a snapshot's canonical JSON form.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be serialized.
pub fn fingerprint(state: &GameState) -> Result<u64, serde_json::Error> {
    let bytes = serde_json::to_vec(state)?;
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&bytes);
    Ok(hasher.finish())
}
