//! Player guesses at the inverse alphabet, and conflict queries

use std::collections::{BTreeMap, BTreeSet};

use crate::error::EngineError;

/// Uppercase an ASCII letter, rejecting anything else
pub fn normalize_letter(c: char) -> Result<char, EngineError> {
    if c.is_ascii_alphabetic() {
        Ok(c.to_ascii_uppercase())
    } else {
        Err(EngineError::InvalidInput(format!("{c:?} is not a letter A-Z")))
    }
}

/// A parsed keystroke for one letter box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessInput {
    Set(char),
    Clear,
}

impl GuessInput {
    /// `""` clears, a single letter sets (upper-cased), anything else is rejected.
    pub fn parse(raw: &str) -> Result<Self, EngineError> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(Self::Clear),
            (Some(c), None) => normalize_letter(c).map(Self::Set),
            _ => Err(EngineError::InvalidInput(format!(
                "{raw:?} is more than one letter"
            ))),
        }
    }

    pub fn letter(self) -> Option<char> {
        match self {
            Self::Set(c) => Some(c),
            Self::Clear => None,
        }
    }
}

/// Guesses for one puzzle: cipher letter -> plain letter, both uppercase.
///
/// Not injective on purpose. Two cipher letters guessed to the same plain
/// letter is a conflict the player sees, not something we refuse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guesses(BTreeMap<char, char>);

static NO_GUESSES: Guesses = Guesses::new();

impl Guesses {
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, cipher: char) -> Option<char> {
        self.0.get(&cipher.to_ascii_uppercase()).copied()
    }

    /// Set or clear one guess. Both letters must already be validated.
    fn put(&mut self, cipher: char, plain: Option<char>) {
        match plain {
            Some(p) => self.0.insert(cipher, p),
            None => self.0.remove(&cipher),
        };
    }

    /// Whether `plain` is the guess for any cipher letter
    pub fn contains_value(&self, plain: char) -> bool {
        self.0.values().any(|&v| v == plain)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.0.iter().map(|(&c, &p)| (c, p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plain letters guessed for more than one cipher letter
    pub fn conflicts(&self) -> BTreeMap<char, BTreeSet<char>> {
        let mut by_plain: BTreeMap<char, BTreeSet<char>> = BTreeMap::new();
        for (&cipher, &plain) in &self.0 {
            by_plain.entry(plain).or_default().insert(cipher);
        }
        by_plain.retain(|_, ciphers| ciphers.len() > 1);
        by_plain
    }
}

/// Guesses for every puzzle, keyed by puzzle id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuessStore {
    puzzles: BTreeMap<u32, Guesses>,
}

impl GuessStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (`Some`) or clear (`None`) the guess for a cipher letter.
    ///
    /// Lowercase letters are accepted and stored uppercase. Anything outside
    /// A-Z is `InvalidInput` and leaves the store untouched.
    pub fn set_guess(
        &mut self,
        puzzle_id: u32,
        cipher: char,
        plain: Option<char>,
    ) -> Result<(), EngineError> {
        let cipher = normalize_letter(cipher)?;
        let plain = plain.map(normalize_letter).transpose()?;
        let guesses = self.puzzles.entry(puzzle_id).or_default();
        guesses.put(cipher, plain);
        if guesses.is_empty() {
            self.puzzles.remove(&puzzle_id);
        }
        Ok(())
    }

    /// Set a guess from letters the engine already holds as uppercase A-Z
    /// (hint reveals, restored snapshots).
    pub(crate) fn put(&mut self, puzzle_id: u32, cipher: char, plain: char) {
        debug_assert!(cipher.is_ascii_uppercase() && plain.is_ascii_uppercase());
        self.puzzles
            .entry(puzzle_id)
            .or_default()
            .put(cipher, Some(plain));
    }

    pub fn clear_guess(&mut self, puzzle_id: u32, cipher: char) -> Result<(), EngineError> {
        self.set_guess(puzzle_id, cipher, None)
    }

    pub fn get_guess(&self, puzzle_id: u32, cipher: char) -> Option<char> {
        self.guesses(puzzle_id).get(cipher)
    }

    /// All guesses for a puzzle (empty if none were made)
    pub fn guesses(&self, puzzle_id: u32) -> &Guesses {
        self.puzzles.get(&puzzle_id).unwrap_or(&NO_GUESSES)
    }

    /// Plain letter -> cipher letters, only where more than one cipher letter
    /// shares the same guess
    pub fn get_conflicts(&self, puzzle_id: u32) -> BTreeMap<char, BTreeSet<char>> {
        self.guesses(puzzle_id).conflicts()
    }

    /// Every cipher letter taking part in some conflict (what gets highlighted)
    pub fn conflicting_ciphers(&self, puzzle_id: u32) -> BTreeSet<char> {
        self.get_conflicts(puzzle_id)
            .into_values()
            .flatten()
            .collect()
    }

    /// Drop every guess for one puzzle
    pub fn clear_all(&mut self, puzzle_id: u32) {
        self.puzzles.remove(&puzzle_id);
    }

    /// Drop every guess for every puzzle
    pub fn clear_everything(&mut self) {
        self.puzzles.clear();
    }

    /// Puzzles that have at least one guess
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Guesses)> + '_ {
        self.puzzles.iter().map(|(&id, g)| (id, g))
    }
}
