//! Deterministic puzzle core
//!
//! All puzzle logic lives here. This module must stay pure:
//! - Randomness only through an injected `Rng`
//! - No storage, logging aside
//! - No rendering or platform dependencies

pub mod encode;
pub mod guess;
pub mod hint;
pub mod map;
pub mod puzzle;
pub mod solve;

pub use encode::{Encoded, FrequencyTable, decode, encode};
pub use guess::{GuessInput, GuessStore, Guesses};
pub use hint::{HintAdvisor, HintOutcome};
pub use map::{CipherMap, CipherMapError, generate};
pub use puzzle::{Puzzle, PuzzleView, build_puzzles};
pub use solve::{candidate, is_solved, normalize};
