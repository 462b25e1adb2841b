//! Vowel hints
//!
//! A hint reveals one vowel of the solution everywhere it appears. Hints run
//! out when every vowel in the passage shows up among the player's guesses.

use std::collections::{BTreeMap, BTreeSet};

use super::guess::{GuessStore, Guesses};
use super::puzzle::Puzzle;
use crate::consts::VOWELS;

/// Result of asking for a hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintOutcome {
    /// This vowel is now the guess for every cipher letter that decodes to it
    Revealed(char),
    /// Nothing left to reveal (or the configured cap was reached)
    NoHintsRemain,
}

/// Distinct vowels in a passage, in reveal order
fn vowels_in(text: &str) -> Vec<char> {
    let present: BTreeSet<char> = text.chars().map(|c| c.to_ascii_uppercase()).collect();
    VOWELS.into_iter().filter(|v| present.contains(v)).collect()
}

/// Vowels of the passage that are not yet any guess's value, in reveal order
fn unrevealed(puzzle: &Puzzle, guesses: &Guesses) -> Vec<char> {
    vowels_in(puzzle.solution())
        .into_iter()
        .filter(|&v| !guesses.contains_value(v))
        .collect()
}

/// Per-puzzle hint counters plus the optional hard cap
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintAdvisor {
    used: BTreeMap<u32, u32>,
    max_hints: Option<u32>,
}

impl HintAdvisor {
    /// Hints bounded only by the vowels in each passage
    pub fn new() -> Self {
        Self::default()
    }

    /// Additionally stop after `max_hints` hints per puzzle
    pub fn with_cap(max_hints: Option<u32>) -> Self {
        Self {
            used: BTreeMap::new(),
            max_hints,
        }
    }

    pub fn max_hints(&self) -> Option<u32> {
        self.max_hints
    }

    pub fn used(&self, puzzle_id: u32) -> u32 {
        self.used.get(&puzzle_id).copied().unwrap_or(0)
    }

    /// Overwrite a counter (restore only)
    pub(crate) fn set_used(&mut self, puzzle_id: u32, count: u32) {
        self.used.insert(puzzle_id, count);
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.used.iter().map(|(&id, &n)| (id, n))
    }

    pub fn reset(&mut self) {
        self.used.clear();
    }

    /// How many more hints would reveal something
    pub fn remaining(&self, puzzle: &Puzzle, guesses: &Guesses) -> u32 {
        let by_vowels = unrevealed(puzzle, guesses).len() as u32;
        match self.max_hints {
            Some(cap) => by_vowels.min(cap.saturating_sub(self.used(puzzle.id()))),
            None => by_vowels,
        }
    }

    /// Reveal the first unrevealed vowel (A, E, I, O, U order).
    ///
    /// Every cipher letter sitting over that vowel in the solution gets it as
    /// its guess, overwriting whatever the player had there.
    pub fn request_hint(&mut self, puzzle: &Puzzle, store: &mut GuessStore) -> HintOutcome {
        if self.max_hints.is_some_and(|cap| self.used(puzzle.id()) >= cap) {
            return HintOutcome::NoHintsRemain;
        }
        let Some(vowel) = unrevealed(puzzle, store.guesses(puzzle.id()))
            .first()
            .copied()
        else {
            return HintOutcome::NoHintsRemain;
        };

        let ciphers: BTreeSet<char> = puzzle
            .aligned()
            .filter(|(c, p)| c.is_ascii_alphabetic() && p.to_ascii_uppercase() == vowel)
            .map(|(c, _)| c.to_ascii_uppercase())
            .collect();
        for cipher in ciphers {
            store.put(puzzle.id(), cipher, vowel);
        }

        *self.used.entry(puzzle.id()).or_insert(0) += 1;
        log::debug!("Puzzle {} hint: revealed {}", puzzle.id(), vowel);
        HintOutcome::Revealed(vowel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::map::{CipherMap, generate};
    use crate::passages::Passage;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn puzzle(text: &str) -> Puzzle {
        Puzzle::with_cipher(
            &Passage::new(1, "t", text),
            generate(&mut Pcg32::seed_from_u64(11)),
        )
    }

    #[test]
    fn test_reveals_vowels_in_order_then_stops() {
        let p = puzzle("Route the packet, quietly.");
        let mut store = GuessStore::new();
        let mut hints = HintAdvisor::new();

        assert_eq!(hints.remaining(&p, store.guesses(1)), 5);
        let mut revealed = Vec::new();
        while let HintOutcome::Revealed(v) = hints.request_hint(&p, &mut store) {
            revealed.push(v);
        }
        assert_eq!(revealed, vec!['A', 'E', 'I', 'O', 'U']);
        assert_eq!(hints.used(1), 5);
        assert_eq!(hints.remaining(&p, store.guesses(1)), 0);

        let snapshot = store.clone();
        for _ in 0..3 {
            assert_eq!(hints.request_hint(&p, &mut store), HintOutcome::NoHintsRemain);
        }
        assert_eq!(store, snapshot);
        assert_eq!(hints.used(1), 5);
    }

    #[test]
    fn test_reveal_sets_the_true_cipher_letter() {
        let p = puzzle("bee");
        let mut store = GuessStore::new();
        let mut hints = HintAdvisor::new();

        assert_eq!(hints.request_hint(&p, &mut store), HintOutcome::Revealed('E'));
        let cipher_e = p.cipher().encrypt_letter('E').unwrap();
        assert_eq!(store.get_guess(1, cipher_e), Some('E'));
        assert_eq!(store.guesses(1).len(), 1);
    }

    #[test]
    fn test_guessed_vowel_counts_as_revealed() {
        let p = puzzle("a cat");
        let mut store = GuessStore::new();
        let mut hints = HintAdvisor::new();

        // Any cipher letter guessed to A makes A "revealed", right or wrong
        let wrong = p.cipher().encrypt_letter('T').unwrap();
        store.set_guess(1, wrong, Some('A')).unwrap();
        assert_eq!(hints.request_hint(&p, &mut store), HintOutcome::NoHintsRemain);
        assert_eq!(hints.used(1), 0);
    }

    #[test]
    fn test_no_vowels() {
        let p = Puzzle::with_cipher(&Passage::new(1, "t", "TCP/SYN"), CipherMap::identity());
        let mut store = GuessStore::new();
        assert_eq!(
            HintAdvisor::new().request_hint(&p, &mut store),
            HintOutcome::NoHintsRemain
        );
    }

    #[test]
    fn test_cap_when_configured() {
        let p = puzzle("audio");
        let mut store = GuessStore::new();
        let mut hints = HintAdvisor::with_cap(Some(2));

        assert_eq!(hints.remaining(&p, store.guesses(1)), 2);
        assert_eq!(hints.request_hint(&p, &mut store), HintOutcome::Revealed('A'));
        assert_eq!(hints.request_hint(&p, &mut store), HintOutcome::Revealed('I'));
        assert_eq!(hints.request_hint(&p, &mut store), HintOutcome::NoHintsRemain);
        assert_eq!(hints.used(1), 2);
        assert_eq!(hints.remaining(&p, store.guesses(1)), 0);
    }
}
