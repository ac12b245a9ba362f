use rand::{CryptoRng, RngCore};
use rug::Integer;
use rug::integer::IsPrime;
use tracing::debug;

use crate::cipher::SymmetricKey;
use crate::config::PuzzleConfig;
use crate::engine::{self, CancellationToken};
use crate::error::{Result, TimelockError};
use crate::prime::{self, PrimeGenerator};
use crate::puzzle::TimelockPuzzle;
use crate::solver::PuzzleSolver;

/// The secret factorization of a puzzle modulus.
///
/// Only puzzle creation consumes it. It is never serialized and is dropped
/// once the puzzle exists.
pub struct Trapdoor {
    p: Integer,
    q: Integer,
    modulus: Integer,
}

impl Trapdoor {
    pub fn from_primes(p: Integer, q: Integer) -> Result<Self> {
        if p == q {
            return Err(TimelockError::Range("p and q must be distinct".to_string()));
        }
        for factor in [&p, &q] {
            if *factor < 2 || factor.is_probably_prime(30) == IsPrime::No {
                return Err(TimelockError::Range(format!("{} is not prime", factor)));
            }
        }

        let modulus = Integer::from(&p * &q);
        Ok(Trapdoor { p, q, modulus })
    }

    pub fn generate<R: RngCore + CryptoRng>(config: &PuzzleConfig, rng: &mut R) -> Result<Self> {
        let (p, q) = PrimeGenerator::new(config).generate_pair(rng)?;
        Self::from_primes(p, q)
    }

    pub fn modulus(&self) -> &Integer {
        &self.modulus
    }

    /// Computes `base^(2^t) mod n` through the totient, in time logarithmic
    /// in `φ(n)` rather than linear in `t`.
    pub fn blinding_term(&self, base: &Integer, t: u64) -> Result<Integer> {
        let phi = engine::totient(&self.p, &self.q);
        let exponent = engine::trapdoor_exponent(t, &phi)?;
        engine::pow_mod(base, &exponent, &self.modulus)
    }
}

impl std::fmt::Debug for Trapdoor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trapdoor")
            .field("modulus_bits", &self.modulus.significant_bits())
            .finish_non_exhaustive()
    }
}

/// Creates time-lock puzzles.
#[derive(Debug, Clone)]
pub struct PuzzleCodec {
    config: PuzzleConfig,
}

impl PuzzleCodec {
    pub fn new(config: PuzzleConfig) -> Result<Self> {
        config.validate()?;
        Ok(PuzzleCodec { config })
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    /// Locks `plaintext` behind `t` sequential squarings.
    ///
    /// A fresh key, a fresh modulus and a fresh base are drawn from `rng`.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        plaintext: &[u8],
        t: u64,
        rng: &mut R,
    ) -> Result<TimelockPuzzle> {
        check_iterations(t)?;

        let key = SymmetricKey::generate(rng);
        let trapdoor = Trapdoor::generate(&self.config, rng)?;
        let base = prime::random_base(rng, trapdoor.modulus())?;

        Self::encrypt_with(plaintext, t, &trapdoor, base, &key)
    }

    /// Deterministic puzzle creation from caller-chosen secrets.
    ///
    /// The key is reduced modulo `n` before use; with a modulus smaller than
    /// the key space this changes the effective key.
    pub fn encrypt_with(
        plaintext: &[u8],
        t: u64,
        trapdoor: &Trapdoor,
        base: Integer,
        key: &SymmetricKey,
    ) -> Result<TimelockPuzzle> {
        check_iterations(t)?;

        let modulus = trapdoor.modulus();
        let upper = Integer::from(modulus - 1u32);
        if base <= 1 || base >= upper {
            return Err(TimelockError::Range(
                "base a must satisfy 1 < a < n-1".to_string(),
            ));
        }

        let key_value = key.to_integer() % modulus;
        let blinding = trapdoor.blinding_term(&base, t)?;
        let blinded_key = Integer::from(&key_value + &blinding) % modulus;

        let ciphertext = SymmetricKey::from_integer(&key_value).encrypt(plaintext);

        debug!(
            t,
            modulus_bits = modulus.significant_bits(),
            payload_len = plaintext.len(),
            "created time-lock puzzle"
        );

        TimelockPuzzle::new(modulus.clone(), t, base, blinded_key, ciphertext)
    }
}

/// Solves `puzzle` to completion and returns its plaintext.
///
/// This performs all `t` squarings on the calling thread. A puzzle whose
/// `a` or `ck` were altered still decrypts, to garbage: there is no
/// integrity check. Use [`PuzzleSolver`] directly to make the solve
/// cancellable.
pub fn decrypt(puzzle: &TimelockPuzzle) -> Result<Vec<u8>> {
    PuzzleSolver::new(puzzle).solve(&CancellationToken::new())
}

fn check_iterations(t: u64) -> Result<()> {
    if t == 0 {
        return Err(TimelockError::InvalidPuzzle(
            "t must be a positive squaring count".to_string(),
        ));
    }
    Ok(())
}
