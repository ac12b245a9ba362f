use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::format::PuzzleFormat;

#[derive(Parser, Debug)]
#[command(name = "timelock")]
#[command(about = "Create and solve RSW time-lock puzzles", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lock a payload behind a number of sequential squarings
    Encrypt {
        #[command(flatten)]
        delay: DelayArgs,

        /// Plaintext file (stdin when omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Puzzle output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Bit length of each secret prime
        #[arg(long, default_value_t = 128)]
        prime_bits: u32,

        /// Container the puzzle is written in
        #[arg(long, value_enum, default_value_t = PuzzleFormat::Json)]
        format: PuzzleFormat,
    },

    /// Solve a puzzle and print its payload
    Decrypt {
        /// Puzzle file (stdin when omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Plaintext output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Container the puzzle is read from
        #[arg(long, value_enum, default_value_t = PuzzleFormat::Json)]
        format: PuzzleFormat,
    },

    /// Measure the local modular squaring rate
    Calibrate {
        /// Squarings performed for the measurement
        #[arg(long, default_value_t = 100_000)]
        squarings: u64,

        /// Modulus size the measurement runs at
        #[arg(long, default_value_t = 256)]
        modulus_bits: u32,
    },

    /// Create and solve puzzles for 1..=max-delay seconds and report solve times
    TimeTest {
        #[arg(long, default_value_t = 5)]
        max_delay: u64,

        /// Puzzles per delay
        #[arg(long, default_value_t = 4)]
        rounds: u32,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct DelayArgs {
    /// Exact number of squarings
    #[arg(long, short = 't')]
    pub iterations: Option<u64>,

    /// Target solve time in seconds, converted with a fresh calibration
    #[arg(long)]
    pub delay: Option<f64>,
}
