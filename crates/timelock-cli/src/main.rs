mod cli;
mod commands;
mod format;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only puzzle or payload bytes
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Encrypt {
            delay,
            input,
            output,
            prime_bits,
            format,
        } => commands::encrypt(
            &delay,
            input.as_deref(),
            output.as_deref(),
            prime_bits,
            format,
        ),
        Command::Decrypt {
            input,
            output,
            format,
        } => commands::decrypt(input.as_deref(), output.as_deref(), format),
        Command::Calibrate {
            squarings,
            modulus_bits,
        } => commands::calibrate(squarings, modulus_bits),
        Command::TimeTest { max_delay, rounds } => commands::time_test(max_delay, rounds),
    }
}
