use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use rand::rngs::OsRng;
use timelock_core::calibrate::{iterations_for_delay, measure_squaring_rate};
use timelock_core::{PuzzleCodec, PuzzleConfig};
use tracing::info;

use crate::cli::DelayArgs;
use crate::format::PuzzleFormat;

const CALIBRATION_SQUARINGS: u64 = 100_000;

pub fn encrypt(
    delay: &DelayArgs,
    input: Option<&Path>,
    output: Option<&Path>,
    prime_bits: u32,
    format: PuzzleFormat,
) -> Result<()> {
    let config = PuzzleConfig {
        prime_bits,
        ..PuzzleConfig::default()
    };
    let codec = PuzzleCodec::new(config).context("invalid puzzle configuration")?;
    let t = resolve_iterations(delay, 2 * prime_bits)?;

    let plaintext = read_input(input)?;
    let puzzle = codec
        .encrypt(&plaintext, t, &mut OsRng)
        .context("failed to create puzzle")?;
    info!(t, bytes = plaintext.len(), "puzzle created");

    let text = format.render(&puzzle)?;
    write_output(output, text.as_bytes())
}

pub fn decrypt(input: Option<&Path>, output: Option<&Path>, format: PuzzleFormat) -> Result<()> {
    let raw = read_input(input)?;
    let text = String::from_utf8(raw).context("puzzle is not valid UTF-8")?;
    let puzzle = format.parse(&text).context("failed to parse puzzle")?;

    let start = Instant::now();
    let plaintext = timelock_core::decrypt(&puzzle).context("failed to solve puzzle")?;
    info!(elapsed = ?start.elapsed(), "puzzle solved");

    write_output(output, &plaintext)
}

pub fn calibrate(squarings: u64, modulus_bits: u32) -> Result<()> {
    let rate = measure_squaring_rate(modulus_bits, squarings)?;
    println!("seconds per squaring: {:.3e}", rate);
    if rate > 0.0 {
        println!("squarings per second: {:.0}", 1.0 / rate);
    }
    Ok(())
}

/// Creates and solves a "hello world!" puzzle `rounds` times for every whole
/// delay from one second to `max_delay`, printing `delay:\t elapsed`.
pub fn time_test(max_delay: u64, rounds: u32) -> Result<()> {
    let config = PuzzleConfig::default();
    let codec = PuzzleCodec::new(config)?;

    for delay in 1..=max_delay {
        for _ in 0..rounds {
            let rate = measure_squaring_rate(2 * config.prime_bits, CALIBRATION_SQUARINGS)?;
            let t = iterations_for_delay(Duration::from_secs(delay), rate)?;
            let puzzle = codec.encrypt(b"hello world!", t, &mut OsRng)?;

            let start = Instant::now();
            let plaintext = timelock_core::decrypt(&puzzle)?;
            let elapsed = start.elapsed();

            if plaintext != b"hello world!" {
                bail!("puzzle for {}s delay decrypted to the wrong plaintext", delay);
            }
            println!("{}:\t {}", delay, elapsed.as_secs_f64());
        }
    }
    Ok(())
}

fn resolve_iterations(delay: &DelayArgs, modulus_bits: u32) -> Result<u64> {
    match (delay.iterations, delay.delay) {
        (Some(0), _) => bail!("iterations must be positive"),
        (Some(t), _) => Ok(t),
        (None, Some(seconds)) => {
            let target = Duration::try_from_secs_f64(seconds)
                .with_context(|| format!("invalid delay {}", seconds))?;
            let rate = measure_squaring_rate(modulus_bits, CALIBRATION_SQUARINGS)?;
            let t = iterations_for_delay(target, rate)?;
            info!(seconds, rate, t, "calibrated squaring count");
            Ok(t)
        }
        (None, None) => bail!("either --iterations or --delay is required"),
    }
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path).with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes).context("failed to write stdout")?;
            stdout.flush().context("failed to flush stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_iterations() {
        let args = DelayArgs {
            iterations: Some(42),
            delay: None,
        };
        assert_eq!(resolve_iterations(&args, 256).unwrap(), 42);
    }

    #[test]
    fn test_resolve_rejects_zero_iterations() {
        let args = DelayArgs {
            iterations: Some(0),
            delay: None,
        };
        assert!(resolve_iterations(&args, 256).is_err());
    }

    #[test]
    fn test_resolve_rejects_negative_delay() {
        let args = DelayArgs {
            iterations: None,
            delay: Some(-1.0),
        };
        assert!(resolve_iterations(&args, 256).is_err());
    }

    #[test]
    fn test_encrypt_rejects_oversized_primes_before_reading_input() {
        let args = DelayArgs {
            iterations: Some(10),
            delay: None,
        };
        for prime_bits in [1u32 << 31, u32::MAX] {
            let result = encrypt(&args, None, None, prime_bits, PuzzleFormat::Json);
            assert!(result.is_err(), "accepted prime_bits={}", prime_bits);
        }
    }

    #[test]
    fn test_calibrate_rejects_huge_modulus() {
        assert!(calibrate(10, 4_000_000_000).is_err());
    }

    #[test]
    fn test_resolve_delay_calibrates() {
        let args = DelayArgs {
            iterations: None,
            delay: Some(0.01),
        };
        assert!(resolve_iterations(&args, 256).unwrap() >= 1);
    }
}
