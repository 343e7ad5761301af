//! Save identifiers and the canonical save-id -> RNG seed derivation.
//! Save id format: `game-<unix millis>-<7 base36 chars>`, e.g. `game-1735689600000-k3v9x0a`.

use chrono::Utc;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SAVE_ID_SUFFIX_LEN: usize = 7;

/// 32-bit signed-overflow string hash (`h = h * 31 + unit` over UTF-16 code
/// units), absolute value taken. Stable across platforms and releases.
#[must_use]
pub fn hash_string(input: &str) -> u32 {
    let hash = input.encode_utf16().fold(0_i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });
    hash.unsigned_abs()
}

/// Build a fresh save identifier from a timestamp and caller-provided entropy.
#[must_use]
pub fn generate_save_id(timestamp_ms: i64, entropy: u64) -> String {
    let mut suffix = String::with_capacity(SAVE_ID_SUFFIX_LEN);
    let mut rest = entropy;
    for _ in 0..SAVE_ID_SUFFIX_LEN {
        let digit = usize::try_from(rest % 36).unwrap_or(0);
        suffix.push(char::from(BASE36[digit]));
        rest /= 36;
    }
    format!("game-{timestamp_ms}-{suffix}")
}

/// Save identifier for a game started now.
#[must_use]
pub fn fresh_save_id() -> String {
    generate_save_id(Utc::now().timestamp_millis(), rand::random())
}

/// Derive the seed for a brand new game from its save identifier.
#[must_use]
pub fn seed_for_save_id(save_id: &str) -> u32 {
    hash_string(save_id)
}
