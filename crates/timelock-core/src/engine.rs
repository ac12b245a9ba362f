//! Modular exponentiation over arbitrary-precision integers.
//!
//! Two ways of computing `a^(2^t) mod n` live here:
//! - the trapdoor path, [`trapdoor_exponent`] followed by [`pow_mod`], which
//!   needs `φ(n)` and costs `O(log φ)` multiplications;
//! - the sequential path, [`sequential_squarings`], which needs nothing but
//!   `n` and costs exactly `t` squarings.
//!
//! Both agree on every input; only their running time differs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rug::Integer;

use crate::error::{Result, TimelockError};

/// Upper bound on the number of squarings between two cancellation checks.
const MAX_CHECK_INTERVAL: u64 = 10_000;

/// Computes `base^exponent mod modulus` with square-and-multiply.
pub fn pow_mod(base: &Integer, exponent: &Integer, modulus: &Integer) -> Result<Integer> {
    if *modulus <= 0 {
        return Err(TimelockError::Range(format!(
            "modulus must be positive, got {}",
            modulus
        )));
    }
    if exponent.is_negative() {
        return Err(TimelockError::Range(format!(
            "exponent must be non-negative, got {}",
            exponent
        )));
    }

    base.clone()
        .pow_mod(exponent, modulus)
        .map_err(|_| TimelockError::Range("modular exponentiation failed".to_string()))
}

/// Euler's totient of `p * q` for distinct primes `p` and `q`.
pub fn totient(p: &Integer, q: &Integer) -> Integer {
    let p_minus_1 = Integer::from(p - 1);
    let q_minus_1 = Integer::from(q - 1);
    p_minus_1 * q_minus_1
}

/// Reduces the exponent `2^t` modulo `φ(n)`, into the range `[1, φ]`.
///
/// Only the holder of the factorization can call this meaningfully; the
/// result plugged into [`pow_mod`] replaces `t` sequential squarings.
///
/// A residue of zero is replaced by `φ` itself. Both are congruent to `2^t`
/// modulo `p - 1` and `q - 1`, but only a positive exponent also sends a
/// base sharing a factor with `n` to the same value as the squarings do.
pub fn trapdoor_exponent(t: u64, totient: &Integer) -> Result<Integer> {
    let exponent = pow_mod(&Integer::from(2), &Integer::from(t), totient)?;
    if exponent == 0 {
        return Ok(totient.clone());
    }
    Ok(exponent)
}

/// Helper method for efficient modular squaring
#[inline]
pub fn square_mod(value: &mut Integer, modulus: &Integer) {
    value.square_mut();
    *value %= modulus;
}

/// Computes `base^(2^t) mod modulus` by `t` sequential squarings.
///
/// The token is polled every `clamp(t / 100, 1, 10_000)` squarings. A
/// cancelled computation returns [`TimelockError::Cancelled`] and its partial
/// state is dropped.
pub fn sequential_squarings(
    base: &Integer,
    t: u64,
    modulus: &Integer,
    cancelled: &CancellationToken,
) -> Result<Integer> {
    if *modulus <= 0 {
        return Err(TimelockError::Range(format!(
            "modulus must be positive, got {}",
            modulus
        )));
    }

    let mut y = Integer::from(base % modulus);
    let check_interval = (t / 100).clamp(1, MAX_CHECK_INTERVAL);

    for i in 1..=t {
        if i % check_interval == 0 && cancelled.is_cancelled() {
            return Err(TimelockError::Cancelled);
        }
        square_mod(&mut y, modulus);
    }

    Ok(y)
}

/// Shared flag used to abandon a running [`sequential_squarings`] call.
///
/// Clones observe the same flag, so one clone can be moved to the solving
/// thread while another stays with the caller.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Signals cancellation to any listening operations
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Checks if cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
