//! Substitution alphabets and random derangement generation

use std::collections::BTreeMap;

use rand::Rng;
use thiserror::Error;

use crate::consts::ALPHABET_LEN;
use crate::{index_letter, letter_index};

/// Why a letter table is not a usable cipher alphabet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherMapError {
    #[error("'{0}' is not a letter")]
    NotALetter(char),
    #[error("letter {0} has no image")]
    Missing(char),
    #[error("letter {0} is the image of more than one letter")]
    Duplicate(char),
    #[error("key must have 26 letters, got {0}")]
    BadKeyLength(usize),
}

/// A bijection over A-Z, plaintext letter -> ciphertext letter.
///
/// Stored as alphabet indices so lookups are array reads. The inverse is kept
/// alongside so decoding is just as cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CipherMap {
    forward: [u8; ALPHABET_LEN],
    inverse: [u8; ALPHABET_LEN],
}

impl CipherMap {
    /// Build from forward images (`forward[i]` is the image of letter `i`).
    fn from_forward(forward: [u8; ALPHABET_LEN]) -> Result<Self, CipherMapError> {
        let mut inverse = [u8::MAX; ALPHABET_LEN];
        for (plain, &cipher) in forward.iter().enumerate() {
            let slot = &mut inverse[cipher as usize];
            if *slot != u8::MAX {
                return Err(CipherMapError::Duplicate(index_letter(cipher as usize)));
            }
            *slot = plain as u8;
        }
        Ok(Self { forward, inverse })
    }

    /// The identity alphabet. Useful as a neutral starting point, never a puzzle.
    pub fn identity() -> Self {
        let forward = std::array::from_fn(|i| i as u8);
        Self {
            forward,
            inverse: forward,
        }
    }

    /// Parse a 26-letter key: the n-th letter is the image of the n-th letter of the alphabet.
    pub fn from_key(key: &str) -> Result<Self, CipherMapError> {
        let letters: Vec<char> = key.chars().collect();
        if letters.len() != ALPHABET_LEN {
            return Err(CipherMapError::BadKeyLength(letters.len()));
        }
        let mut forward = [0u8; ALPHABET_LEN];
        for (slot, c) in forward.iter_mut().zip(letters) {
            *slot = letter_index(c).ok_or(CipherMapError::NotALetter(c))? as u8;
        }
        Self::from_forward(forward)
    }

    /// Build from a full letter -> letter table (the persisted form).
    pub fn from_table(table: &BTreeMap<char, char>) -> Result<Self, CipherMapError> {
        let mut forward = [u8::MAX; ALPHABET_LEN];
        for (&plain, &cipher) in table {
            let p = letter_index(plain).ok_or(CipherMapError::NotALetter(plain))?;
            let c = letter_index(cipher).ok_or(CipherMapError::NotALetter(cipher))?;
            forward[p] = c as u8;
        }
        if let Some(missing) = forward.iter().position(|&c| c == u8::MAX) {
            return Err(CipherMapError::Missing(index_letter(missing)));
        }
        Self::from_forward(forward)
    }

    /// Build from a few fixed pairs; the remaining letters take the unused
    /// images in alphabetical order. The result is a bijection but not
    /// necessarily a derangement.
    pub fn from_partial(pairs: &[(char, char)]) -> Result<Self, CipherMapError> {
        let mut forward = [u8::MAX; ALPHABET_LEN];
        let mut used = [false; ALPHABET_LEN];
        for &(plain, cipher) in pairs {
            let p = letter_index(plain).ok_or(CipherMapError::NotALetter(plain))?;
            let c = letter_index(cipher).ok_or(CipherMapError::NotALetter(cipher))?;
            if used[c] && forward[p] != c as u8 {
                return Err(CipherMapError::Duplicate(index_letter(c)));
            }
            forward[p] = c as u8;
            used[c] = true;
        }
        let mut free = (0..ALPHABET_LEN).filter(|&c| !used[c]);
        for slot in forward.iter_mut().filter(|s| **s == u8::MAX) {
            // A free image exists for every unassigned letter: both sets have the same size.
            let c = free.next().ok_or(CipherMapError::Missing(index_letter(0)))?;
            *slot = c as u8;
        }
        Self::from_forward(forward)
    }

    /// Image of a plaintext letter, in uppercase. Non-letters give `None`.
    #[inline]
    pub fn encrypt_letter(&self, plain: char) -> Option<char> {
        letter_index(plain).map(|i| index_letter(self.forward[i] as usize))
    }

    /// Preimage of a ciphertext letter, in uppercase. Non-letters give `None`.
    #[inline]
    pub fn decrypt_letter(&self, cipher: char) -> Option<char> {
        letter_index(cipher).map(|i| index_letter(self.inverse[i] as usize))
    }

    /// The inverse alphabet (ciphertext -> plaintext)
    pub fn inverse(&self) -> Self {
        Self {
            forward: self.inverse,
            inverse: self.forward,
        }
    }

    /// True when no letter maps to itself
    pub fn is_derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &c)| i != c as usize)
    }

    /// Full letter -> letter table, the persisted form
    pub fn to_table(&self) -> BTreeMap<char, char> {
        self.forward
            .iter()
            .enumerate()
            .map(|(i, &c)| (index_letter(i), index_letter(c as usize)))
            .collect()
    }
}

/// Derangement numbers D(0)..=D(26). D(26) is about 1.5e26, well inside u128.
fn derangement_counts() -> [u128; ALPHABET_LEN + 1] {
    let mut d = [0u128; ALPHABET_LEN + 1];
    d[0] = 1;
    for k in 2..=ALPHABET_LEN {
        d[k] = (k as u128 - 1) * (d[k - 1] + d[k - 2]);
    }
    d
}

/// Generate a uniformly random derangement of the alphabet.
///
/// Martinez-Panholzer-Prodinger: walk positions from the top, swapping each
/// unmarked position with a random unmarked position below it, and close the
/// cycle (mark the partner) with probability (u-1)·D(u-2)/D(u). Every position
/// ends up in a cycle of length two or more, so there are no fixed points and
/// no retries.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> CipherMap {
    let d = derangement_counts();
    let mut forward: [u8; ALPHABET_LEN] = std::array::from_fn(|i| i as u8);
    let mut marked = [false; ALPHABET_LEN];

    // `unmarked` counts unmarked positions in 0..=i
    let mut unmarked = ALPHABET_LEN;
    let mut i = ALPHABET_LEN - 1;
    while unmarked >= 2 {
        if !marked[i] {
            // Non-empty: i is unmarked and at least two positions in 0..=i are.
            let candidates: Vec<usize> = (0..i).filter(|&j| !marked[j]).collect();
            let j = candidates[rng.random_range(0..candidates.len())];
            forward.swap(i, j);

            let close = (unmarked - 1) as f64 * d[unmarked - 2] as f64 / d[unmarked] as f64;
            if rng.random_bool(close.clamp(0.0, 1.0)) {
                marked[j] = true;
                unmarked -= 1;
            }
            unmarked -= 1;
        }
        i -= 1;
    }

    // The swaps above only ever permute, so this cannot fail.
    let mut inverse = [0u8; ALPHABET_LEN];
    for (plain, &cipher) in forward.iter().enumerate() {
        inverse[cipher as usize] = plain as u8;
    }
    CipherMap { forward, inverse }
}
