//! Session snapshot codec
//!
//! Blob layout (camelCase JSON):
//! `currentPuzzleIndex`, `guesses` (puzzle id -> cipher -> plain), `unlocked`,
//! `hintsUsed` (puzzle id -> count), `solved`, and `puzzles`
//! (`cipherMap`, `encryptedText`, `frequencyMap`, aligned with the passages).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cipher::{CipherMap, FrequencyTable, Puzzle};
use crate::error::RestoreError;
use crate::session::SessionState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    current_puzzle_index: usize,
    guesses: BTreeMap<u32, BTreeMap<char, char>>,
    unlocked: Vec<u32>,
    hints_used: BTreeMap<u32, u32>,
    solved: Vec<u32>,
    puzzles: Vec<PuzzleRecord<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PuzzleRecord<'a> {
    cipher_map: BTreeMap<char, char>,
    encrypted_text: &'a str,
    frequency_map: &'a FrequencyTable,
}

/// Snapshot the whole session
pub fn serialize(state: &SessionState) -> String {
    let snapshot = Snapshot {
        current_puzzle_index: state.current,
        guesses: state
            .guesses
            .iter()
            .map(|(id, g)| (id, g.iter().collect()))
            .collect(),
        unlocked: state.unlocked.iter().copied().collect(),
        hints_used: state.hints.iter().collect(),
        solved: state.solved_ids().into_iter().collect(),
        puzzles: state
            .puzzles
            .iter()
            .map(|p| PuzzleRecord {
                cipher_map: p.cipher().to_table(),
                encrypted_text: p.encrypted_text(),
                frequency_map: p.frequency(),
            })
            .collect(),
    };
    // Only strings, integers and char-keyed maps: serialization cannot fail.
    serde_json::to_string(&snapshot).unwrap_or_default()
}

/// Merge a snapshot onto `base`, a freshly generated state for the same passages.
///
/// Anything missing or malformed is skipped and `base` keeps its value. Only a
/// blob that is not a JSON object, or one pointing at a puzzle that does not
/// exist, is rejected outright.
pub fn deserialize(blob: &str, mut base: SessionState) -> Result<SessionState, RestoreError> {
    let Value::Object(root) = serde_json::from_str::<Value>(blob)? else {
        return Err(RestoreError::NotAnObject);
    };

    // Older saves used `current` for the index
    let index_field = root.get("currentPuzzleIndex").or_else(|| root.get("current"));
    if let Some(value) = index_field {
        match value.as_u64() {
            Some(index) => {
                let count = base.puzzles.len();
                match usize::try_from(index).ok().filter(|&i| i < count) {
                    Some(i) => base.current = i,
                    None => return Err(RestoreError::IndexOutOfRange { index, count }),
                }
            }
            None => log::warn!("Skipping malformed puzzle index"),
        }
    }

    // Puzzles first: guesses are checked against the restored ciphertext
    if let Some(records) = field_array(&root, "puzzles") {
        for (puzzle, record) in base.puzzles.iter_mut().zip(records) {
            if let Some(restored) = restore_puzzle(puzzle, record) {
                *puzzle = restored;
            }
        }
    }

    if let Some(guesses) = field_object(&root, "guesses") {
        restore_guesses(&mut base, guesses);
    }

    if let Some(ids) = field_array(&root, "unlocked") {
        base.unlocked = known_ids(&base, ids).collect();
    }

    if let Some(counts) = field_object(&root, "hintsUsed") {
        for (key, count) in counts {
            let id = key.parse::<u32>().ok().filter(|&id| base.index_of(id).is_some());
            let count = count.as_u64().and_then(|n| u32::try_from(n).ok());
            match (id, count) {
                (Some(id), Some(count)) => base.hints.set_used(id, count),
                _ => log::warn!("Skipping malformed hint count for {:?}", key),
            }
        }
    }

    // A solved puzzle always stays reachable
    if let Some(ids) = field_array(&root, "solved") {
        let solved: Vec<u32> = known_ids(&base, ids).collect();
        base.unlocked.extend(&solved);
        base.completed.extend(solved);
    }

    Ok(base)
}

fn field_array<'a>(root: &'a Map<String, Value>, name: &str) -> Option<&'a Vec<Value>> {
    let value = root.get(name)?;
    let array = value.as_array();
    if array.is_none() {
        log::warn!("Skipping malformed field {}", name);
    }
    array
}

fn field_object<'a>(root: &'a Map<String, Value>, name: &str) -> Option<&'a Map<String, Value>> {
    let value = root.get(name)?;
    let object = value.as_object();
    if object.is_none() {
        log::warn!("Skipping malformed field {}", name);
    }
    object
}

/// Integer entries that name an existing puzzle
fn known_ids<'a>(
    state: &'a SessionState,
    ids: &'a [Value],
) -> impl Iterator<Item = u32> + 'a {
    ids.iter()
        .filter_map(|v| v.as_u64().and_then(|n| u32::try_from(n).ok()))
        .filter(|&id| state.index_of(id).is_some())
}

/// A JSON string holding exactly one ASCII letter, uppercased
fn single_letter(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}

/// Rebuild a puzzle from its stored alphabet.
///
/// Text and frequencies are always re-derived from the alphabet so they can
/// never disagree with it; stored copies that differ are reported and dropped.
fn restore_puzzle(puzzle: &Puzzle, record: &Value) -> Option<Puzzle> {
    let record = record.as_object()?;
    let table: BTreeMap<char, char> = record
        .get("cipherMap")?
        .as_object()?
        .iter()
        .map(|(k, v)| Some((single_letter(k)?, single_letter(v.as_str()?)?)))
        .collect::<Option<_>>()?;
    let cipher = match CipherMap::from_table(&table) {
        Ok(cipher) => cipher,
        Err(e) => {
            log::warn!("Skipping stored alphabet for puzzle {}: {}", puzzle.id(), e);
            return None;
        }
    };
    if !cipher.is_derangement() {
        log::warn!(
            "Skipping stored alphabet for puzzle {}: some letters map to themselves",
            puzzle.id()
        );
        return None;
    }

    let restored = puzzle.recipher(cipher);
    if let Some(text) = record.get("encryptedText").and_then(Value::as_str) {
        if text != restored.encrypted_text() {
            log::warn!(
                "Stored ciphertext for puzzle {} does not match its alphabet, re-deriving",
                puzzle.id()
            );
        }
    }
    if let Some(freq) = record.get("frequencyMap") {
        let stored = serde_json::from_value::<FrequencyTable>(freq.clone()).ok();
        if stored.as_ref() != Some(restored.frequency()) {
            log::warn!("Stored frequencies for puzzle {} re-derived", puzzle.id());
        }
    }
    Some(restored)
}

fn restore_guesses(state: &mut SessionState, guesses: &Map<String, Value>) {
    for (key, value) in guesses {
        match (key.parse::<u32>(), value) {
            (Ok(id), Value::Object(entries)) => {
                if state.index_of(id).is_none() {
                    log::warn!("Skipping guesses for unknown puzzle {}", id);
                    continue;
                }
                for (cipher, plain) in entries {
                    restore_guess(state, id, cipher, plain);
                }
            }
            // Older saves kept one flat cipher -> plain map for the current puzzle
            (Err(_), plain) => {
                if let Some(id) = state.puzzles.get(state.current).map(Puzzle::id) {
                    restore_guess(state, id, key, plain);
                }
            }
            _ => log::warn!("Skipping malformed guesses for {:?}", key),
        }
    }
}

fn restore_guess(state: &mut SessionState, puzzle_id: u32, cipher: &str, plain: &Value) {
    let Some(index) = state.index_of(puzzle_id) else {
        return;
    };
    let cipher = single_letter(cipher).filter(|&c| state.puzzles[index].frequency().contains(c));
    let plain = plain.as_str().and_then(single_letter);
    match (cipher, plain) {
        (Some(cipher), Some(plain)) => state.guesses.put(puzzle_id, cipher, plain),
        _ => log::warn!("Skipping malformed guess in puzzle {}", puzzle_id),
    }
}
