//! Translating a wall-clock delay into a squaring count.
//!
//! Nothing here runs implicitly; callers measure when they choose to.

use std::hint::black_box;
use std::time::{Duration, Instant};

use rug::Integer;

use crate::config::MAX_PRIME_BITS;
use crate::engine::{self, CancellationToken};
use crate::error::{Result, TimelockError};

const CALIBRATION_BASE: u32 = 7_324_129;

/// Largest modulus a calibration run will allocate.
pub const MAX_CALIBRATION_BITS: u32 = 2 * MAX_PRIME_BITS;

/// Measures the average time of one modular squaring, in seconds.
///
/// The modulus is `2^modulus_bits - 1`, which squares at the same speed as a
/// puzzle modulus of that size. Sizes above [`MAX_CALIBRATION_BITS`] are a
/// [`TimelockError::Range`].
pub fn measure_squaring_rate(modulus_bits: u32, squarings: u64) -> Result<f64> {
    if modulus_bits > MAX_CALIBRATION_BITS {
        return Err(TimelockError::Range(format!(
            "calibration modulus of {} bits exceeds {}",
            modulus_bits, MAX_CALIBRATION_BITS
        )));
    }

    let modulus = (Integer::from(1) << modulus_bits.max(32)) - 1u32;
    let squarings = squarings.max(1);
    let token = CancellationToken::new();

    let start = Instant::now();
    let result = engine::sequential_squarings(
        &Integer::from(CALIBRATION_BASE),
        squarings,
        &modulus,
        &token,
    );
    let elapsed = start.elapsed();
    black_box(result.ok());

    Ok(elapsed.as_secs_f64() / squarings as f64)
}

/// Number of squarings expected to take `delay` at the measured rate.
///
/// Always at least one squaring; saturates at `u64::MAX`.
pub fn iterations_for_delay(delay: Duration, seconds_per_squaring: f64) -> Result<u64> {
    if !seconds_per_squaring.is_finite() || seconds_per_squaring <= 0.0 {
        return Err(TimelockError::Range(format!(
            "squaring rate must be positive, got {}",
            seconds_per_squaring
        )));
    }

    let t = (delay.as_secs_f64() / seconds_per_squaring).floor();
    // `as` saturates for out-of-range floats
    Ok((t as u64).max(1))
}
