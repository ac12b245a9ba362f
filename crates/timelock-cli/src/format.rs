use anyhow::{Context, Result};
use clap::ValueEnum;
use timelock_core::TimelockPuzzle;

/// Container a puzzle document is written in.
///
/// Both carry the same five string fields. YAML reads documents whose `cm`
/// is a line-wrapped base64 block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum PuzzleFormat {
    #[default]
    Json,
    Yaml,
}

impl PuzzleFormat {
    pub fn render(self, puzzle: &TimelockPuzzle) -> Result<String> {
        match self {
            PuzzleFormat::Json => {
                let mut json = puzzle.to_json()?;
                json.push('\n');
                Ok(json)
            }
            PuzzleFormat::Yaml => {
                serde_yaml::to_string(puzzle).context("failed to encode puzzle as YAML")
            }
        }
    }

    pub fn parse(self, text: &str) -> Result<TimelockPuzzle> {
        match self {
            PuzzleFormat::Json => Ok(TimelockPuzzle::from_json(text)?),
            PuzzleFormat::Yaml => {
                serde_yaml::from_str(text).context("failed to decode YAML puzzle")
            }
        }
    }
}
