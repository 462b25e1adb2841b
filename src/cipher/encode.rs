//! Applying a cipher alphabet to text

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::map::CipherMap;

/// Count of each ciphertext letter (uppercase) in a puzzle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable(BTreeMap<char, u32>);

impl FrequencyTable {
    /// Count the letters of `text`, case-folded. Non-letters are ignored.
    pub fn of(text: &str) -> Self {
        let mut counts = BTreeMap::new();
        for c in text.chars().filter(char::is_ascii_alphabetic) {
            *counts.entry(c.to_ascii_uppercase()).or_insert(0) += 1;
        }
        Self(counts)
    }

    /// Occurrences of a letter (either case); zero when absent
    pub fn count(&self, letter: char) -> u32 {
        self.0
            .get(&letter.to_ascii_uppercase())
            .copied()
            .unwrap_or(0)
    }

    /// Whether the letter occurs at all
    pub fn contains(&self, letter: char) -> bool {
        self.count(letter) > 0
    }

    /// Letters that occur, alphabetical
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.0.keys().copied()
    }

    /// Entries by count descending, ties alphabetical (solving-aid order)
    pub fn ranked(&self) -> Vec<(char, u32)> {
        let mut entries: Vec<_> = self.0.iter().map(|(&c, &n)| (c, n)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }

    pub fn as_map(&self) -> &BTreeMap<char, u32> {
        &self.0
    }
}

/// Result of encoding a passage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub encrypted_text: String,
    pub frequency: FrequencyTable,
}

/// Substitute one character, keeping its case. Non-letters pass through.
#[inline]
fn substitute(c: char, lookup: impl Fn(char) -> Option<char>) -> char {
    match lookup(c) {
        Some(sub) if c.is_ascii_lowercase() => sub.to_ascii_lowercase(),
        Some(sub) => sub,
        None => c,
    }
}

/// Encrypt a passage with `map`, then count the ciphertext letters.
pub fn encode(plaintext: &str, map: &CipherMap) -> Encoded {
    let encrypted_text: String = plaintext
        .chars()
        .map(|c| substitute(c, |p| map.encrypt_letter(p)))
        .collect();
    let frequency = FrequencyTable::of(&encrypted_text);
    Encoded {
        encrypted_text,
        frequency,
    }
}

/// Invert `encode`'s substitution, keeping case and non-letters.
pub fn decode(ciphertext: &str, map: &CipherMap) -> String {
    ciphertext
        .chars()
        .map(|c| substitute(c, |x| map.decrypt_letter(x)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::map::generate;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_encode_preserves_case_and_punctuation() {
        let map = CipherMap::from_partial(&[('A', 'X'), ('B', 'Y')]).unwrap();
        let encoded = encode("AB, ba.", &map);
        assert_eq!(encoded.encrypted_text, "XY, yx.");
        assert_eq!(encoded.frequency.count('X'), 2);
        assert_eq!(encoded.frequency.count('y'), 2);
        assert_eq!(encoded.frequency.count('A'), 0);
    }

    #[test]
    fn test_non_ascii_letters_pass_through() {
        let map = CipherMap::from_partial(&[('C', 'D'), ('A', 'B'), ('F', 'G'), ('E', 'H')])
            .unwrap();
        let encoded = encode("café 42", &map);
        assert_eq!(encoded.encrypted_text, "dbgé 42");
        assert!(!encoded.frequency.contains('É'));
    }

    #[test]
    fn test_ranked_frequency_order() {
        let table = FrequencyTable::of("bbaCcc d");
        assert_eq!(table.ranked(), vec![('C', 3), ('B', 2), ('A', 1), ('D', 1)]);
        assert_eq!(table.letters().collect::<String>(), "ABCD");
    }

    #[test]
    fn test_empty_text() {
        let encoded = encode("", &CipherMap::identity());
        assert!(encoded.encrypted_text.is_empty());
        assert!(encoded.frequency.as_map().is_empty());
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(seed in any::<u64>(), text in "[ -~]{0,80}") {
            let map = generate(&mut Pcg32::seed_from_u64(seed));
            let encoded = encode(&text, &map);
            prop_assert_eq!(encoded.encrypted_text.chars().count(), text.chars().count());
            prop_assert_eq!(decode(&encoded.encrypted_text, &map), text);
        }
    }
}
