//! Rivest-Shamir-Wagner time-lock puzzles.
//!
//! A payload is encrypted under a random AES-128 key, and the key is blinded
//! with `a^(2^t) mod n`. The creator knows the factorization of `n` and
//! computes the blinding term instantly; anyone else has to perform `t`
//! sequential modular squarings to remove it.

pub mod calibrate;
pub mod cipher;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod prime;
pub mod puzzle;
pub mod solver;
pub mod wire;

pub use cipher::SymmetricKey;
pub use codec::{PuzzleCodec, Trapdoor, decrypt};
pub use config::PuzzleConfig;
pub use engine::CancellationToken;
pub use error::{Result, TimelockError};
pub use puzzle::TimelockPuzzle;
pub use solver::PuzzleSolver;
pub use wire::PuzzleDocument;
