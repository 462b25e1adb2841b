//! Puzzle records derived from passages

use rand::Rng;

use super::encode::{Encoded, FrequencyTable, encode};
use super::map::{CipherMap, generate};
use crate::passages::Passage;

/// One encrypted passage.
///
/// Fields are private: a puzzle is created once and only ever replaced
/// wholesale (by regeneration or restore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    id: u32,
    name: String,
    solution: String,
    cipher: CipherMap,
    encrypted_text: String,
    frequency: FrequencyTable,
}

impl Puzzle {
    /// Encrypt a passage with a given alphabet
    pub fn with_cipher(passage: &Passage, cipher: CipherMap) -> Self {
        let Encoded {
            encrypted_text,
            frequency,
        } = encode(&passage.text, &cipher);
        Self {
            id: passage.id,
            name: passage.name.clone(),
            solution: passage.text.clone(),
            cipher,
            encrypted_text,
            frequency,
        }
    }

    /// Encrypt a passage with a freshly generated derangement
    pub fn generate<R: Rng + ?Sized>(passage: &Passage, rng: &mut R) -> Self {
        Self::with_cipher(passage, generate(rng))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn encrypted_text(&self) -> &str {
        &self.encrypted_text
    }

    pub fn frequency(&self) -> &FrequencyTable {
        &self.frequency
    }

    pub fn cipher(&self) -> &CipherMap {
        &self.cipher
    }

    /// The true plaintext
    pub fn solution(&self) -> &str {
        &self.solution
    }

    /// The same passage under another alphabet
    pub fn recipher(&self, cipher: CipherMap) -> Self {
        let passage = Passage::new(self.id, self.name.clone(), self.solution.clone());
        Self::with_cipher(&passage, cipher)
    }

    /// Read-only view for presentation (no solution, no cipher)
    pub fn view(&self) -> PuzzleView<'_> {
        PuzzleView {
            id: self.id,
            name: &self.name,
            encrypted_text: &self.encrypted_text,
            frequency: &self.frequency,
        }
    }

    /// Pairs of (ciphertext char, plaintext char), position by position
    pub(crate) fn aligned(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.encrypted_text.chars().zip(self.solution.chars())
    }
}

/// What a renderer gets to see of a puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleView<'a> {
    pub id: u32,
    pub name: &'a str,
    pub encrypted_text: &'a str,
    pub frequency: &'a FrequencyTable,
}

/// Build one puzzle per passage, in passage order
pub fn build_puzzles<R: Rng + ?Sized>(passages: &[Passage], rng: &mut R) -> Vec<Puzzle> {
    passages.iter().map(|p| Puzzle::generate(p, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_build_puzzles_one_per_passage() {
        let passages = crate::passages::osi_layers();
        let puzzles = build_puzzles(&passages, &mut Pcg32::seed_from_u64(3));
        assert_eq!(puzzles.len(), passages.len());
        for (puzzle, passage) in puzzles.iter().zip(&passages) {
            assert_eq!(puzzle.id(), passage.id);
            assert!(puzzle.cipher().is_derangement());
            assert_eq!(
                puzzle.encrypted_text().chars().count(),
                passage.text.chars().count()
            );
            assert_ne!(puzzle.encrypted_text(), passage.text);
        }
    }

    #[test]
    fn test_view_hides_nothing_it_should_show() {
        let passage = Passage::new(9, "Test", "Hello");
        let puzzle = Puzzle::with_cipher(&passage, CipherMap::identity());
        let view = puzzle.view();
        assert_eq!(view.id, 9);
        assert_eq!(view.name, "Test");
        assert_eq!(view.encrypted_text, "Hello");
        assert_eq!(view.frequency.count('L'), 2);
    }
}
