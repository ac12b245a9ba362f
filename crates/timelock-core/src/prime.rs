use rand::{CryptoRng, RngCore};
use rug::Integer;
use rug::integer::{IsPrime, Order};
use tracing::debug;

use crate::config::PuzzleConfig;
use crate::error::{Result, TimelockError};

/// Probabilistic prime search over an injected randomness source.
pub struct PrimeGenerator {
    bits: u32,
    max_attempts: u32,
    miller_rabin_rounds: u32,
}

impl PrimeGenerator {
    pub fn new(config: &PuzzleConfig) -> Self {
        PrimeGenerator {
            bits: config.prime_bits,
            max_attempts: config.prime_attempts,
            miller_rabin_rounds: config.miller_rabin_rounds,
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Draws a random prime of exactly `bits` bits.
    ///
    /// Candidates are odd and have their two top bits set, so the product of
    /// two such primes has exactly `2 * bits` bits.
    pub fn generate<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<Integer> {
        if self.bits < 2 {
            return Err(TimelockError::Range(format!(
                "cannot generate a {}-bit prime",
                self.bits
            )));
        }

        for attempt in 1..=self.max_attempts {
            let mut candidate = random_bits(rng, self.bits);
            candidate.set_bit(self.bits - 1, true);
            candidate.set_bit(self.bits - 2, true);
            candidate.set_bit(0, true);

            if candidate.is_probably_prime(self.miller_rabin_rounds) != IsPrime::No {
                debug!(bits = self.bits, attempt, "found prime candidate");
                return Ok(candidate);
            }
        }

        Err(TimelockError::Generation(format!(
            "Prime not found within {} iterations for bits={}",
            self.max_attempts, self.bits
        )))
    }

    /// Draws two distinct primes `p != q`.
    pub fn generate_pair<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<(Integer, Integer)> {
        let p = self.generate(rng)?;
        for _ in 0..self.max_attempts {
            let q = self.generate(rng)?;
            if q != p {
                return Ok((p, q));
            }
        }

        Err(TimelockError::Generation(format!(
            "no second prime distinct from the first within {} draws",
            self.max_attempts
        )))
    }
}

/// Uniform random integer in `[0, 2^bits)`.
pub fn random_bits<R: RngCore>(rng: &mut R, bits: u32) -> Integer {
    if bits == 0 {
        return Integer::new();
    }

    let len = bits.div_ceil(8) as usize;
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);

    // Clear the excess high bits of the most significant byte
    let excess = (len as u32) * 8 - bits;
    bytes[0] &= 0xFFu8 >> excess;

    Integer::from_digits(&bytes, Order::MsfBe)
}

/// Uniform random integer in the inclusive range `[low, high]`, by rejection
/// sampling.
pub fn random_in_range<R: RngCore>(rng: &mut R, low: &Integer, high: &Integer) -> Result<Integer> {
    if high < low {
        return Err(TimelockError::Range(format!(
            "empty range [{}, {}]",
            low, high
        )));
    }

    let span = Integer::from(high - low) + 1u32;
    let bits = span.significant_bits();
    loop {
        let candidate = random_bits(rng, bits);
        if candidate < span {
            return Ok(candidate + low);
        }
    }
}

/// Random puzzle base `a` with `2 <= a <= n - 2`.
pub fn random_base<R: RngCore>(rng: &mut R, modulus: &Integer) -> Result<Integer> {
    if *modulus < 4 {
        return Err(TimelockError::Range(format!(
            "modulus {} leaves no base in [2, n-2]",
            modulus
        )));
    }

    let high = Integer::from(modulus - 2u32);
    random_in_range(rng, &Integer::from(2), &high)
}
