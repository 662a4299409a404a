//! Day-seeded backfill of mastered words that are not yet due.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::types::DATE_FORMAT;

/// Stable 64-bit seed derived from the `YYYY-MM-DD` form of `day`.
pub fn day_seed(day: NaiveDate) -> u64 {
    let digest = Sha256::digest(day.format(DATE_FORMAT).to_string().as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Generator that yields the same draws for every call on the same day.
pub fn day_rng(day: NaiveDate) -> StdRng {
    StdRng::seed_from_u64(day_seed(day))
}

/// Pick up to `need` words from the head of `sorted_not_due`.
///
/// The candidate slice is the first `max(floor, len / divisor)` words; the
/// draw is uniform without replacement within it.
pub fn sample_backfill<R: Rng + ?Sized>(
    sorted_not_due: &[String],
    need: usize,
    floor: usize,
    divisor: usize,
    rng: &mut R,
) -> Vec<String> {
    if need == 0 || sorted_not_due.is_empty() {
        return Vec::new();
    }
    let candidate_count = floor
        .max(sorted_not_due.len() / divisor.max(1))
        .min(sorted_not_due.len());
    let candidates = &sorted_not_due[..candidate_count];
    let take = need.min(candidates.len());
    candidates.choose_multiple(rng, take).cloned().collect()
}
