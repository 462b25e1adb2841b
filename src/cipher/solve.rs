//! Solved-state evaluation

use super::guess::Guesses;
use super::puzzle::Puzzle;
use crate::consts::PLACEHOLDER;

/// Drop everything that is not an ASCII letter and uppercase the rest.
///
/// Spacing and punctuation never matter when comparing answers.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// The plaintext as the player currently has it: each ciphertext letter
/// replaced by its guess (in the ciphertext letter's case) or `PLACEHOLDER`.
pub fn candidate(puzzle: &Puzzle, guesses: &Guesses) -> String {
    puzzle
        .encrypted_text()
        .chars()
        .map(|c| {
            if !c.is_ascii_alphabetic() {
                return c;
            }
            match guesses.get(c) {
                Some(g) if c.is_ascii_lowercase() => g.to_ascii_lowercase(),
                Some(g) => g,
                None => PLACEHOLDER,
            }
        })
        .collect()
}

/// Whether the current guesses spell out the solution.
///
/// A placeholder is never a letter, so it drops out under normalization and
/// leaves the candidate shorter than the solution: every letter that occurs
/// must be guessed, and guessed right.
pub fn is_solved(puzzle: &Puzzle, guesses: &Guesses) -> bool {
    normalize(&candidate(puzzle, guesses)) == normalize(puzzle.solution())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::GuessStore;
    use crate::cipher::map::CipherMap;
    use crate::passages::Passage;

    fn network_puzzle() -> Puzzle {
        let map = CipherMap::from_partial(&[
            ('N', 'Q'),
            ('E', 'S'),
            ('T', 'B'),
            ('W', 'J'),
            ('O', 'L'),
            ('R', 'I'),
            ('K', 'X'),
        ])
        .unwrap();
        Puzzle::with_cipher(&Passage::new(3, "Network", "NETWORK"), map)
    }

    const ANSWER: [(char, char); 7] = [
        ('Q', 'N'),
        ('S', 'E'),
        ('B', 'T'),
        ('J', 'W'),
        ('L', 'O'),
        ('I', 'R'),
        ('X', 'K'),
    ];

    #[test]
    fn test_network_example() {
        let puzzle = network_puzzle();
        assert_eq!(puzzle.encrypted_text(), "QSBJLIX");

        let mut store = GuessStore::new();
        for (cipher, plain) in ANSWER {
            assert!(!is_solved(&puzzle, store.guesses(3)));
            store.set_guess(3, cipher, Some(plain)).unwrap();
        }
        assert!(is_solved(&puzzle, store.guesses(3)));

        for (cipher, plain) in ANSWER {
            let mut wrong = store.clone();
            let other = if plain == 'Z' { 'Y' } else { 'Z' };
            wrong.set_guess(3, cipher, Some(other)).unwrap();
            assert!(!is_solved(&puzzle, wrong.guesses(3)));
        }
    }

    #[test]
    fn test_punctuation_and_case_do_not_block_solve() {
        let map = CipherMap::from_partial(&[('A', 'X'), ('B', 'Y')]).unwrap();
        let puzzle = Puzzle::with_cipher(&Passage::new(1, "p", "Ab, ba!  "), map);
        assert_eq!(puzzle.encrypted_text(), "Xy, yx!  ");

        let mut store = GuessStore::new();
        store.set_guess(1, 'x', Some('a')).unwrap();
        assert_eq!(candidate(&puzzle, store.guesses(1)), "A_, _a!  ");
        assert!(!is_solved(&puzzle, store.guesses(1)));

        store.set_guess(1, 'Y', Some('B')).unwrap();
        assert_eq!(candidate(&puzzle, store.guesses(1)), "Ab, ba!  ");
        assert!(is_solved(&puzzle, store.guesses(1)));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("It's a TCP/IP-stack, ok?"), "ITSATCPIPSTACKOK");
        assert_eq!(normalize("__ .."), "");
    }
}
