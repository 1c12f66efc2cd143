//! Injectable source of cryptographically secure randomness.
//!
//! The teacher's `Deck::shuffle` reaches directly for `rand::thread_rng()`,
//! which can't be substituted in tests. Spec 9 ("RNG abstraction") asks for
//! the RNG to be an injected capability, so shuffling goes through this
//! trait instead of a free function.

use rand::RngCore;
use rand::rngs::OsRng;

/// A source of uniformly distributed integers in `[0, bound)`.
///
/// Implementors must reject modulo bias rather than introduce it: the
/// default `OsRngSecure` impl below uses Lemire's rejection method via
/// `rand::Rng::gen_range`, which `rand` guarantees is unbiased.
pub trait SecureRng {
    fn below(&mut self, bound: u32) -> u32;
}

/// Production RNG: the OS's cryptographic source, never seeded or replayed.
#[derive(Debug, Default)]
pub struct OsRngSecure;

impl SecureRng for OsRngSecure {
    fn below(&mut self, bound: u32) -> u32 {
        assert!(bound > 0, "below() called with a zero bound");
        // next_u32() % bound would admit bias; reject the overhang instead.
        let zone = u32::MAX - u32::MAX % bound;
        loop {
            let v = OsRng.next_u32();
            if v < zone {
                return v % bound;
            }
        }
    }
}

/// Deterministic, seedable RNG for tests: wraps a `ChaCha20Rng` so a fixed
/// seed reproduces an identical shuffle across runs.
pub struct DeterministicRng(rand_chacha::ChaCha20Rng);

impl DeterministicRng {
    pub fn from_seed(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand_chacha::ChaCha20Rng::seed_from_u64(seed))
    }
}

impl SecureRng for DeterministicRng {
    fn below(&mut self, bound: u32) -> u32 {
        assert!(bound > 0, "below() called with a zero bound");
        let zone = u32::MAX - u32::MAX % bound;
        loop {
            let v = self.0.next_u32();
            if v < zone {
                return v % bound;
            }
        }
    }
}
