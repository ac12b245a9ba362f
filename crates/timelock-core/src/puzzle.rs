use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelockError};
use crate::wire::PuzzleDocument;

// Rivest-Shamir-Wagner time-lock puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "PuzzleDocument", try_from = "PuzzleDocument")]
pub struct TimelockPuzzle {
    modulus: rug::Integer,     // n - the RSA modulus (p × q)
    iterations: u64,           // t - number of sequential squarings
    base: rug::Integer,        // a - the base being squared, 1 < a < n-1
    blinded_key: rug::Integer, // ck - key + a^(2^t) mod n
    ciphertext: Vec<u8>,       // cm - payload under the symmetric key
}

impl TimelockPuzzle {
    /// Assembles a puzzle from its public parts, rejecting values no honest
    /// creator produces.
    pub fn new(
        modulus: rug::Integer,
        iterations: u64,
        base: rug::Integer,
        blinded_key: rug::Integer,
        ciphertext: Vec<u8>,
    ) -> Result<Self> {
        if iterations == 0 {
            return Err(TimelockError::InvalidPuzzle(
                "t must be a positive squaring count".to_string(),
            ));
        }
        if modulus < 4 {
            return Err(TimelockError::InvalidPuzzle(format!(
                "modulus {} is too small",
                modulus
            )));
        }
        let upper = rug::Integer::from(&modulus - 1u32);
        if base <= 1 || base >= upper {
            return Err(TimelockError::InvalidPuzzle(
                "base a must satisfy 1 < a < n-1".to_string(),
            ));
        }
        if blinded_key.is_negative() || blinded_key >= modulus {
            return Err(TimelockError::InvalidPuzzle(
                "blinded key must be a residue modulo n".to_string(),
            ));
        }

        Ok(TimelockPuzzle {
            modulus,
            iterations,
            base,
            blinded_key,
            ciphertext,
        })
    }

    pub fn modulus(&self) -> &rug::Integer {
        &self.modulus
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn base(&self) -> &rug::Integer {
        &self.base
    }

    pub fn blinded_key(&self) -> &rug::Integer {
        &self.blinded_key
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}
