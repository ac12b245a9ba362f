use crate::cipher::KEY_LEN;
use crate::error::{Result, TimelockError};

/// Largest accepted prime size. Moduli stay below `2 * MAX_PRIME_BITS` bits.
pub const MAX_PRIME_BITS: u32 = 8192;

/// Parameters controlling puzzle creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleConfig {
    /// Bit length of each of the two secret primes.
    pub prime_bits: u32,
    /// Candidates tried per prime before giving up.
    pub prime_attempts: u32,
    pub miller_rabin_rounds: u32,
}

impl PuzzleConfig {
    pub fn new(prime_bits: u32, prime_attempts: u32, miller_rabin_rounds: u32) -> Self {
        Self {
            prime_bits,
            prime_attempts,
            miller_rabin_rounds,
        }
    }

    /// Checks that a modulus built from two primes of `prime_bits` bits is
    /// always larger than the symmetric key space.
    ///
    /// Primes are generated with their top two bits set, so the modulus has
    /// exactly `2 * prime_bits` bits and is at least `2^(2 * prime_bits - 1)`.
    pub fn validate(&self) -> Result<()> {
        let key_bits = (KEY_LEN * 8) as u64;
        if self.prime_bits < 2 || 2 * u64::from(self.prime_bits) - 1 < key_bits {
            return Err(TimelockError::Config(format!(
                "prime_bits={} is too small for a {}-bit key",
                self.prime_bits, key_bits
            )));
        }
        if self.prime_bits > MAX_PRIME_BITS {
            return Err(TimelockError::Config(format!(
                "prime_bits={} exceeds the maximum of {}",
                self.prime_bits, MAX_PRIME_BITS
            )));
        }
        if self.prime_attempts == 0 {
            return Err(TimelockError::Config(
                "prime_attempts must be non-zero".to_string(),
            ));
        }
        if self.miller_rabin_rounds == 0 {
            return Err(TimelockError::Config(
                "miller_rabin_rounds must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            prime_bits: 128,
            prime_attempts: 10_000,
            miller_rabin_rounds: 30,
        }
    }
}
