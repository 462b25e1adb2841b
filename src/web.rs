//! Browser bindings
//!
//! A thin `wasm_bindgen` wrapper so a page script can render the grid and
//! forward keystrokes. Progress lives in LocalStorage.

use wasm_bindgen::prelude::*;

use crate::cipher::HintOutcome;
use crate::passages::osi_layers;
use crate::platform::LocalStore;
use crate::session::{AnswerResult, Session};
use crate::settings::Settings;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("OSI Cryptogram starting...");
}

fn first_char(s: &str) -> Option<char> {
    s.chars().next()
}

/// The game as a page script sees it
#[wasm_bindgen]
pub struct CryptogramGame {
    session: Session<LocalStore>,
}

#[wasm_bindgen]
impl CryptogramGame {
    /// Restore saved progress from LocalStorage, or deal new puzzles
    #[wasm_bindgen(constructor)]
    pub fn new() -> CryptogramGame {
        let settings = Settings::load(&LocalStore);
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        CryptogramGame {
            session: Session::with_seed(osi_layers(), LocalStore, seed, settings),
        }
    }

    pub fn puzzle_count(&self) -> usize {
        self.session.puzzle_count()
    }

    pub fn current_index(&self) -> usize {
        self.session.current_index()
    }

    /// "3. Network"
    pub fn title(&self, index: usize) -> Option<String> {
        self.session
            .puzzle(index)
            .map(|v| format!("{}. {}", v.id, v.name))
    }

    pub fn encrypted_text(&self, index: usize) -> Option<String> {
        self.session
            .puzzle(index)
            .map(|v| v.encrypted_text.to_string())
    }

    /// `[["E", 31], ["Q", 17], ...]`, most frequent first
    pub fn frequency_json(&self, index: usize) -> String {
        self.session
            .puzzle(index)
            .and_then(|v| serde_json::to_string(&v.frequency.ranked()).ok())
            .unwrap_or_else(|| "[]".to_string())
    }

    pub fn guess(&self, index: usize, cipher: &str) -> Option<String> {
        self.session
            .guess(index, first_char(cipher)?)
            .map(String::from)
    }

    /// Apply a letter box's value. False means the keystroke was rejected.
    pub fn input(&mut self, index: usize, cipher: &str, value: &str) -> bool {
        let Some(cipher) = first_char(cipher) else {
            return false;
        };
        self.session.input(index, cipher, value).is_ok()
    }

    /// Cipher letters whose guesses collide, as one string (e.g. `"QZ"`)
    pub fn conflicting(&self, index: usize) -> String {
        self.session
            .conflicts(index)
            .into_values()
            .flatten()
            .collect()
    }

    pub fn check_solved(&self, index: usize) -> bool {
        self.session.check_solved(index)
    }

    /// The plaintext when solved, nothing when wrong
    pub fn check_answer(&mut self, index: usize) -> Option<String> {
        match self.session.check_answer(index) {
            Ok(AnswerResult::Solved { plaintext }) => Some(plaintext),
            _ => None,
        }
    }

    /// The revealed vowel, or nothing when no hints remain
    pub fn request_hint(&mut self, index: usize) -> Option<String> {
        match self.session.request_hint(index) {
            Ok(HintOutcome::Revealed(v)) => Some(v.to_string()),
            _ => None,
        }
    }

    pub fn hints_remaining(&self, index: usize) -> u32 {
        self.session.hints_remaining(index)
    }

    pub fn is_unlocked(&self, index: usize) -> bool {
        self.session.is_unlocked(index)
    }

    pub fn is_solved(&self, index: usize) -> bool {
        self.session
            .puzzle(index)
            .is_some_and(|v| self.session.state().solved_ids().contains(&v.id))
    }

    pub fn reset_puzzle(&mut self, index: usize) {
        let _ = self.session.clear_all(index);
    }

    pub fn switch_puzzle(&mut self, index: usize) -> bool {
        self.session.switch_puzzle(index).is_ok()
    }

    /// Index of the puzzle switched to, nothing when every puzzle is solved
    pub fn go_to_next_unsolved(&mut self) -> Option<usize> {
        self.session.go_to_next_unsolved()
    }

    pub fn restart_all(&mut self) {
        self.session.restart_all();
    }
}

impl Default for CryptogramGame {
    fn default() -> Self {
        Self::new()
    }
}
