//! OSI Cryptogram - a substitution-cipher puzzle engine
//!
//! Core modules:
//! - `cipher`: Deterministic puzzle core (derangements, encoding, guesses, hints)
//! - `persistence`: Lenient JSON snapshots of a session
//! - `platform`: Key-value storage backends (memory, file, LocalStorage on web)
//! - `session`: The engine facade presentation layers talk to
//! - `settings`: Engine configuration
//! - `passages`: The shipped OSI layer texts

pub mod cipher;
pub mod error;
pub mod passages;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{EngineError, RestoreError, StorageError};
pub use passages::Passage;
pub use session::{AnswerResult, Session, SessionState};
pub use settings::Settings;

/// Engine constants
pub mod consts {
    /// Letters in the cipher alphabet
    pub const ALPHABET_LEN: usize = 26;

    /// Vowels in the order hints reveal them
    pub const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

    /// Shown in a candidate plaintext where a cipher letter has no guess yet
    pub const PLACEHOLDER: char = '_';

    /// Storage key for the session snapshot
    pub const SESSION_KEY: &str = "osi_cryptogram_v1";

    /// Storage key for settings (kept apart from the session snapshot)
    pub const SETTINGS_KEY: &str = "osi_cryptogram_settings";
}

/// Zero-based alphabet index of an ASCII letter (either case)
#[inline]
pub fn letter_index(c: char) -> Option<usize> {
    if c.is_ascii_alphabetic() {
        Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
    } else {
        None
    }
}

/// Uppercase letter for an alphabet index
///
/// Indices past `Z` wrap, so callers only ever pass values below `ALPHABET_LEN`.
#[inline]
pub fn index_letter(index: usize) -> char {
    (b'A' + (index % consts::ALPHABET_LEN) as u8) as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_index_round_trip() {
        for i in 0..consts::ALPHABET_LEN {
            assert_eq!(letter_index(index_letter(i)), Some(i));
        }
        assert_eq!(letter_index('q'), Some(16));
        assert_eq!(letter_index('é'), None);
        assert_eq!(letter_index('-'), None);
    }
}
