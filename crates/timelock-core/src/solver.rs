use std::time::Instant;

use rug::Integer;
use tracing::{info, warn};

use crate::cipher::SymmetricKey;
use crate::engine::{self, CancellationToken};
use crate::error::{Result, TimelockError};
use crate::puzzle::TimelockPuzzle;

/// Solves a puzzle the only way available without the factorization of `n`.
pub struct PuzzleSolver<'a> {
    puzzle: &'a TimelockPuzzle,
}

impl<'a> PuzzleSolver<'a> {
    pub fn new(puzzle: &'a TimelockPuzzle) -> Self {
        PuzzleSolver { puzzle }
    }

    /// Recovers the symmetric key after `t` sequential squarings.
    ///
    /// The key is `(ck - a^(2^t)) mod n`, taken as a non-negative residue
    /// and re-expanded to the cipher key width.
    pub fn recover_key(&self, cancelled: &CancellationToken) -> Result<SymmetricKey> {
        let modulus = self.puzzle.modulus(); // n
        let base = self.puzzle.base(); // a
        let iterations = self.puzzle.iterations(); // t

        let blinding = engine::sequential_squarings(base, iterations, modulus, cancelled)?;

        let mut key = Integer::from(self.puzzle.blinded_key() - &blinding);
        if key.is_negative() {
            key += modulus;
        }

        Ok(SymmetricKey::from_integer(&key))
    }

    /// Runs the full solve and decrypts the payload.
    ///
    /// A structurally valid puzzle with a tampered `a`, `ck` or `cm` is not
    /// detected: it yields garbage bytes of the ciphertext's length.
    pub fn solve(&self, cancelled: &CancellationToken) -> Result<Vec<u8>> {
        let iterations = self.puzzle.iterations();
        info!(iterations, "solving time-lock puzzle");
        let start = Instant::now();

        let key = match self.recover_key(cancelled) {
            Ok(key) => key,
            Err(TimelockError::Cancelled) => {
                warn!(iterations, elapsed = ?start.elapsed(), "puzzle solving cancelled");
                return Err(TimelockError::Cancelled);
            }
            Err(e) => return Err(e),
        };

        let plaintext = key.decrypt(self.puzzle.ciphertext());
        info!(iterations, elapsed = ?start.elapsed(), "puzzle solved");
        Ok(plaintext)
    }
}
