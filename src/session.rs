//! The engine facade
//!
//! `Session` owns all puzzle state, the store and the RNG. Every player action
//! is a method here; each one that changes state ends with a best-effort
//! snapshot. Presentation layers read views and call back in, nothing else.

use std::collections::{BTreeMap, BTreeSet};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::cipher::{
    GuessInput, GuessStore, HintAdvisor, HintOutcome, Puzzle, PuzzleView, build_puzzles,
    guess::normalize_letter, is_solved,
};
use crate::error::{EngineError, RestoreError};
use crate::passages::Passage;
use crate::persistence;
use crate::platform::KeyValueStore;
use crate::settings::Settings;

/// Result of an explicit "check my answer"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerResult {
    Solved { plaintext: String },
    Wrong,
}

/// Everything that makes up a player's progress (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub(crate) current: usize,
    pub(crate) puzzles: Vec<Puzzle>,
    pub(crate) guesses: GuessStore,
    pub(crate) hints: HintAdvisor,
    pub(crate) unlocked: BTreeSet<u32>,
    /// Puzzles seen solved at some point; survives clearing their guesses
    pub(crate) completed: BTreeSet<u32>,
}

impl SessionState {
    /// Generate every puzzle from scratch
    pub fn fresh<R: Rng + ?Sized>(passages: &[Passage], rng: &mut R, settings: &Settings) -> Self {
        let puzzles = build_puzzles(passages, rng);
        let unlocked = initial_unlocked(&puzzles, settings);
        Self {
            current: 0,
            puzzles,
            guesses: GuessStore::new(),
            hints: HintAdvisor::with_cap(settings.max_hints),
            unlocked,
            completed: BTreeSet::new(),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    pub fn guesses(&self) -> &GuessStore {
        &self.guesses
    }

    pub fn hints(&self) -> &HintAdvisor {
        &self.hints
    }

    pub fn unlocked(&self) -> &BTreeSet<u32> {
        &self.unlocked
    }

    pub fn index_of(&self, puzzle_id: u32) -> Option<usize> {
        self.puzzles.iter().position(|p| p.id() == puzzle_id)
    }

    /// Solved right now, from the current guesses
    pub fn is_solved(&self, index: usize) -> bool {
        self.puzzles
            .get(index)
            .is_some_and(|p| is_solved(p, self.guesses.guesses(p.id())))
    }

    /// Ids of puzzles solved now or at any earlier point
    pub fn solved_ids(&self) -> BTreeSet<u32> {
        let mut ids = self.completed.clone();
        ids.extend(
            (0..self.puzzles.len())
                .filter(|&i| self.is_solved(i))
                .map(|i| self.puzzles[i].id()),
        );
        ids
    }
}

fn initial_unlocked(puzzles: &[Puzzle], settings: &Settings) -> BTreeSet<u32> {
    if settings.unlock_all {
        puzzles.iter().map(Puzzle::id).collect()
    } else {
        puzzles.first().map(Puzzle::id).into_iter().collect()
    }
}

/// A player's session over a fixed set of passages
pub struct Session<S: KeyValueStore, R: Rng = Pcg32> {
    passages: Vec<Passage>,
    state: SessionState,
    settings: Settings,
    store: S,
    rng: R,
}

impl<S: KeyValueStore> Session<S, Pcg32> {
    /// Start a session with a seeded PCG generator
    pub fn with_seed(passages: Vec<Passage>, store: S, seed: u64, settings: Settings) -> Self {
        Self::new(passages, store, Pcg32::seed_from_u64(seed), settings)
    }
}

impl<S: KeyValueStore, R: Rng> Session<S, R> {
    /// Restore the saved session if there is a usable one, otherwise generate
    /// fresh puzzles.
    pub fn new(passages: Vec<Passage>, store: S, mut rng: R, settings: Settings) -> Self {
        let state = SessionState::fresh(&passages, &mut rng, &settings);
        let mut session = Self {
            passages,
            state,
            settings,
            store,
            rng,
        };
        if !session.restore() {
            session.persist();
        }
        session
    }

    /// Ignore anything saved and start over with new puzzles
    pub fn fresh(passages: Vec<Passage>, store: S, mut rng: R, settings: Settings) -> Self {
        let state = SessionState::fresh(&passages, &mut rng, &settings);
        let session = Self {
            passages,
            state,
            settings,
            store,
            rng,
        };
        session.persist();
        session
    }

    // === Persistence ===

    /// The current state as a snapshot blob
    pub fn serialize(&self) -> String {
        persistence::serialize(&self.state)
    }

    /// Replace the state with the saved snapshot. Returns false (state
    /// untouched) when there is nothing usable to restore.
    pub fn restore(&mut self) -> bool {
        match self.load_snapshot() {
            Ok(state) => {
                log::info!(
                    "Restored session at puzzle {} ({} solved)",
                    state.current + 1,
                    state.solved_ids().len()
                );
                self.state = state;
                true
            }
            Err(RestoreError::NotFound) => {
                log::info!("No saved session, starting fresh");
                false
            }
            Err(e) => {
                log::warn!("Discarding saved session: {}", e);
                false
            }
        }
    }

    fn load_snapshot(&mut self) -> Result<SessionState, RestoreError> {
        let blob = match self.store.get(&self.settings.storage_key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Err(RestoreError::NotFound),
            Err(e) => {
                log::warn!("Could not read saved session: {}", e);
                return Err(RestoreError::NotFound);
            }
        };
        let base = SessionState::fresh(&self.passages, &mut self.rng, &self.settings);
        persistence::deserialize(&blob, base)
    }

    /// Write a snapshot to the store (best-effort, failures are logged)
    fn persist(&self) {
        if !self.settings.autosave {
            return;
        }
        if let Err(e) = self.store.set(&self.settings.storage_key, &self.serialize()) {
            log::warn!("Could not save session: {}", e);
        }
    }

    // === Queries ===

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn puzzle_count(&self) -> usize {
        self.state.puzzles.len()
    }

    pub fn current_index(&self) -> usize {
        self.state.current
    }

    pub fn puzzle(&self, index: usize) -> Option<PuzzleView<'_>> {
        self.state.puzzles.get(index).map(Puzzle::view)
    }

    pub fn current_puzzle(&self) -> Option<PuzzleView<'_>> {
        self.puzzle(self.state.current)
    }

    fn puzzle_at(&self, index: usize) -> Result<&Puzzle, EngineError> {
        self.state
            .puzzles
            .get(index)
            .ok_or(EngineError::UnknownPuzzle(index))
    }

    pub fn guess(&self, index: usize, cipher: char) -> Option<char> {
        let puzzle = self.state.puzzles.get(index)?;
        self.state.guesses.get_guess(puzzle.id(), cipher)
    }

    /// The player's current reading of the puzzle, `_` for unguessed letters
    pub fn candidate(&self, index: usize) -> Option<String> {
        let puzzle = self.state.puzzles.get(index)?;
        Some(crate::cipher::candidate(
            puzzle,
            self.state.guesses.guesses(puzzle.id()),
        ))
    }

    /// Plain letter -> cipher letters sharing that guess
    pub fn conflicts(&self, index: usize) -> BTreeMap<char, BTreeSet<char>> {
        self.state
            .puzzles
            .get(index)
            .map(|p| self.state.guesses.get_conflicts(p.id()))
            .unwrap_or_default()
    }

    pub fn check_solved(&self, index: usize) -> bool {
        self.state.is_solved(index)
    }

    pub fn is_unlocked(&self, index: usize) -> bool {
        self.state
            .puzzles
            .get(index)
            .is_some_and(|p| self.state.unlocked.contains(&p.id()))
    }

    pub fn hints_used(&self, index: usize) -> u32 {
        self.state
            .puzzles
            .get(index)
            .map_or(0, |p| self.state.hints.used(p.id()))
    }

    pub fn hints_remaining(&self, index: usize) -> u32 {
        self.state.puzzles.get(index).map_or(0, |p| {
            self.state
                .hints
                .remaining(p, self.state.guesses.guesses(p.id()))
        })
    }

    /// First puzzle (in order) not yet solved
    pub fn next_unsolved(&self) -> Option<usize> {
        let solved = self.state.solved_ids();
        self.state
            .puzzles
            .iter()
            .position(|p| !solved.contains(&p.id()))
    }

    pub fn all_solved(&self) -> bool {
        self.next_unsolved().is_none()
    }

    // === Actions ===

    /// Record a solve: remember it and, with progressive unlocking, open the
    /// next puzzle.
    fn note_progress(&mut self, index: usize) {
        if !self.state.is_solved(index) {
            return;
        }
        let id = self.state.puzzles[index].id();
        if self.state.completed.insert(id) {
            log::info!("Puzzle {} solved", id);
        }
        if let Some(next) = self.state.puzzles.get(index + 1) {
            self.state.unlocked.insert(next.id());
        }
    }

    /// Set (`Some`) or clear (`None`) the guess for a cipher letter.
    ///
    /// The cipher letter must occur in the puzzle. Rejected input leaves
    /// everything as it was.
    pub fn set_guess(
        &mut self,
        index: usize,
        cipher: char,
        plain: Option<char>,
    ) -> Result<(), EngineError> {
        let puzzle = self.puzzle_at(index)?;
        let id = puzzle.id();
        let cipher = normalize_letter(cipher)?;
        if !puzzle.frequency().contains(cipher) {
            return Err(EngineError::InvalidInput(format!(
                "{cipher} does not occur in puzzle {id}"
            )));
        }
        self.state.guesses.set_guess(id, cipher, plain)?;
        log::debug!("Puzzle {} guess {} -> {:?}", id, cipher, plain);

        self.note_progress(index);
        self.persist();
        Ok(())
    }

    /// Apply raw keystroke text for a letter box (`""` clears)
    pub fn input(&mut self, index: usize, cipher: char, raw: &str) -> Result<(), EngineError> {
        let input = GuessInput::parse(raw)?;
        self.set_guess(index, cipher, input.letter())
    }

    pub fn clear_guess(&mut self, index: usize, cipher: char) -> Result<(), EngineError> {
        self.set_guess(index, cipher, None)
    }

    /// Drop every guess for one puzzle
    pub fn clear_all(&mut self, index: usize) -> Result<(), EngineError> {
        let id = self.puzzle_at(index)?.id();
        self.state.guesses.clear_all(id);
        self.persist();
        Ok(())
    }

    /// Explicit answer check. Same rule as `check_solved`, but hands back the
    /// plaintext on success.
    pub fn check_answer(&mut self, index: usize) -> Result<AnswerResult, EngineError> {
        let puzzle = self.puzzle_at(index)?;
        if !is_solved(puzzle, self.state.guesses.guesses(puzzle.id())) {
            return Ok(AnswerResult::Wrong);
        }
        let plaintext = puzzle.solution().to_string();
        self.note_progress(index);
        self.persist();
        Ok(AnswerResult::Solved { plaintext })
    }

    /// Reveal the next vowel of a puzzle
    pub fn request_hint(&mut self, index: usize) -> Result<HintOutcome, EngineError> {
        let puzzle = self
            .state
            .puzzles
            .get(index)
            .ok_or(EngineError::UnknownPuzzle(index))?;
        let outcome = self
            .state
            .hints
            .request_hint(puzzle, &mut self.state.guesses);
        if let HintOutcome::Revealed(_) = outcome {
            self.note_progress(index);
            self.persist();
        }
        Ok(outcome)
    }

    /// Move to another puzzle. Both the puzzle left behind and the one entered
    /// end up with a clean grid; solves already recorded are kept.
    pub fn switch_puzzle(&mut self, index: usize) -> Result<(), EngineError> {
        let id = self.puzzle_at(index)?.id();
        if !self.state.unlocked.contains(&id) {
            return Err(EngineError::Locked(id));
        }
        self.enter(index);
        Ok(())
    }

    fn enter(&mut self, index: usize) {
        if let Some(left) = self.state.puzzles.get(self.state.current) {
            self.state.guesses.clear_all(left.id());
        }
        let id = self.state.puzzles[index].id();
        self.state.current = index;
        self.state.guesses.clear_all(id);
        log::info!("Switched to puzzle {}", id);
        self.persist();
    }

    /// Unlock and switch to the first unsolved puzzle. `None` when all are solved.
    pub fn go_to_next_unsolved(&mut self) -> Option<usize> {
        let index = self.next_unsolved()?;
        let id = self.state.puzzles[index].id();
        self.state.unlocked.insert(id);
        self.enter(index);
        Some(index)
    }

    /// Forget all progress: guesses, hint counters, unlocks, solves and the
    /// saved snapshot. The puzzles keep their alphabets.
    pub fn restart_all(&mut self) {
        self.state.guesses.clear_everything();
        self.state.hints.reset();
        self.state.completed.clear();
        self.state.unlocked = initial_unlocked(&self.state.puzzles, &self.settings);
        self.state.current = 0;
        if let Err(e) = self.store.remove(&self.settings.storage_key) {
            log::warn!("Could not clear saved session: {}", e);
        }
        log::info!("Restarted all puzzles");
        self.persist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passages::osi_layers;
    use crate::platform::MemoryStore;

    fn session() -> Session<MemoryStore> {
        Session::with_seed(osi_layers(), MemoryStore::new(), 1234, Settings::default())
    }

    /// Guess every occurring cipher letter correctly
    fn solve(session: &mut Session<MemoryStore>, index: usize) {
        let puzzle = session.state.puzzles[index].clone();
        for cipher in puzzle.frequency().letters() {
            let plain = puzzle.cipher().decrypt_letter(cipher).unwrap();
            session.set_guess(index, cipher, Some(plain)).unwrap();
        }
    }

    #[test]
    fn test_new_session_persists_fresh_state() {
        let s = session();
        assert_eq!(s.puzzle_count(), 7);
        assert_eq!(s.current_index(), 0);
        assert!(s.store().get(&s.settings().storage_key).unwrap().is_some());
        assert!((0..7).all(|i| s.is_unlocked(i)));
    }

    #[test]
    fn test_guess_must_occur_in_puzzle() {
        let mut s = Session::with_seed(
            vec![Passage::new(1, "one", "abc")],
            MemoryStore::new(),
            5,
            Settings::default(),
        );
        let absent = (b'A'..=b'Z')
            .map(char::from)
            .find(|&c| !s.puzzle(0).unwrap().frequency.contains(c))
            .unwrap();
        assert!(matches!(
            s.set_guess(0, absent, Some('A')),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            s.set_guess(9, 'A', Some('A')),
            Err(EngineError::UnknownPuzzle(9))
        ));
    }

    #[test]
    fn test_solving_marks_completed() {
        let mut s = session();
        solve(&mut s, 2);
        assert!(s.check_solved(2));
        assert_eq!(
            s.check_answer(2).unwrap(),
            AnswerResult::Solved {
                plaintext: osi_layers()[2].text.clone()
            }
        );
        assert_eq!(s.check_answer(1).unwrap(), AnswerResult::Wrong);
        assert!(s.state.solved_ids().contains(&3));
        assert_eq!(s.next_unsolved(), Some(0));
    }

    #[test]
    fn test_switch_clears_entered_puzzle_and_keeps_completion() {
        let mut s = session();
        solve(&mut s, 0);
        s.switch_puzzle(1).unwrap();
        s.switch_puzzle(0).unwrap();
        assert!(!s.check_solved(0));
        assert!(s.state.solved_ids().contains(&1));
        assert_eq!(s.next_unsolved(), Some(1));
    }

    #[test]
    fn test_switch_clears_puzzle_left_behind() {
        let store = MemoryStore::new();
        let mut s = Session::with_seed(osi_layers(), store.clone(), 21, Settings::default());
        let cipher = s.puzzle(0).unwrap().frequency.letters().next().unwrap();
        s.set_guess(0, cipher, Some('T')).unwrap();

        s.switch_puzzle(4).unwrap();
        assert_eq!(s.guess(0, cipher), None);
        assert!(s.state.guesses().iter().next().is_none());

        // Nothing stale in the saved snapshot either
        let reloaded = Session::with_seed(osi_layers(), store, 22, Settings::default());
        assert_eq!(reloaded.current_index(), 4);
        assert_eq!(reloaded.guess(0, cipher), None);
    }

    #[test]
    fn test_progressive_unlock() {
        let settings = Settings {
            unlock_all: false,
            ..Default::default()
        };
        let mut s = Session::with_seed(osi_layers(), MemoryStore::new(), 9, settings);
        assert!(s.is_unlocked(0));
        assert!(!s.is_unlocked(1));
        assert_eq!(s.switch_puzzle(1), Err(EngineError::Locked(2)));
        assert_eq!(s.current_index(), 0);

        solve(&mut s, 0);
        assert!(s.is_unlocked(1));
        s.switch_puzzle(1).unwrap();
        assert_eq!(s.current_index(), 1);
    }

    #[test]
    fn test_restart_all_keeps_alphabets() {
        let mut s = session();
        let before: Vec<String> = (0..7)
            .map(|i| s.puzzle(i).unwrap().encrypted_text.to_string())
            .collect();
        solve(&mut s, 0);
        s.request_hint(3).unwrap();
        s.switch_puzzle(3).unwrap();

        s.restart_all();
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.hints_used(3), 0);
        assert!(s.state.solved_ids().is_empty());
        assert!(s.state.guesses().iter().next().is_none());
        let after: Vec<String> = (0..7)
            .map(|i| s.puzzle(i).unwrap().encrypted_text.to_string())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_go_to_next_unsolved() {
        let mut s = Session::with_seed(
            vec![Passage::new(1, "a", "ab"), Passage::new(2, "b", "cd")],
            MemoryStore::new(),
            77,
            Settings::default(),
        );
        solve(&mut s, 0);
        assert_eq!(s.go_to_next_unsolved(), Some(1));
        assert_eq!(s.current_index(), 1);
        solve(&mut s, 1);
        assert!(s.all_solved());
        assert_eq!(s.go_to_next_unsolved(), None);
    }
}
