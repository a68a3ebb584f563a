use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Creates the random source used for speckle and noise.
///
/// A fixed `seed` makes every draw reproducible; `None` seeds from the thread-local generator.
#[must_use]
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed.unwrap_or_else(rand::random))
}
