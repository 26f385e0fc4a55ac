//! Invocation-scoped random generators.
//!
//! Every generation call builds its own generator from [`rng_for_seed`]; no
//! generator is ever shared between calls, so a seed always means the same
//! thing.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Normalize a user-supplied seed: blank seeds count as no seed.
pub fn effective_seed(seed: Option<&str>) -> Option<&str> {
    seed.filter(|s| !s.trim().is_empty())
}

/// Build a fresh generator for one invocation.
///
/// A non-blank seed is hashed with SHA-256 and the digest seeds the generator,
/// so equal seed strings yield equal shuffles. Without a seed the generator
/// draws from OS entropy and results are not reproducible.
pub fn rng_for_seed(seed: Option<&str>) -> StdRng {
    match effective_seed(seed) {
        Some(seed) => StdRng::from_seed(seed_bytes(seed)),
        None => StdRng::from_entropy(),
    }
}

/// The 32 seed bytes derived from a seed string.
pub fn seed_bytes(seed: &str) -> [u8; 32] {
    Sha256::digest(seed.as_bytes()).into()
}

/// Shuffle `items` in place (Fisher-Yates).
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}
