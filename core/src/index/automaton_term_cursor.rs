//! The DFA-guided range-skipping algorithm behind [crate::fuzzy::automaton_matcher::AutomatonFuzzyMatcher].
//!
//! Grounded on `core-java-transliteration/src/index/automaton_terms_enum.rs` (the `seek_bytes_ref`
//! / visited-state fields of Lucene's `AutomatonTermsEnum`) and the seek-loop shape of
//! `core/src/index/filtered_terms_enum.rs`. Operates directly on `char` sequences rather than raw
//! UTF-8 bytes: UTF-8 encoding is order-preserving over Unicode scalar values (see SPEC_FULL.md),
//! so a seek target computed in `char` space and then re-encoded to UTF-8 is exactly the byte
//! target a byte-level automaton walk would have produced, without paying for a
//! codepoint-to-byte-range DFA expansion.

use std::collections::{HashMap, HashSet};

use crate::util::automaton::{RunAutomaton, State};

/// Wraps a tableized automaton (one rung of the Levenshtein ladder, widened to `A[k]`) with the
/// "what's the next candidate term worth looking at" computation that lets
/// [crate::fuzzy::automaton_matcher::AutomatonFuzzyMatcher] skip whole dead ranges of the term
/// dictionary instead of scanning them one term at a time.
pub struct AutomatonTermCursor {
    run: RunAutomaton,
    cur_gen: u16,
    visited: HashMap<u32, u16>,
}

impl AutomatonTermCursor {
    pub fn new(run: RunAutomaton) -> Self {
        Self { run, cur_gen: 0, visited: HashMap::new() }
    }

    pub fn run_automaton(&self) -> &RunAutomaton {
        &self.run
    }

    /// Returns the smallest `char` sequence, UTF-8 encoded, that is strictly greater than
    /// `current` (or the smallest sequence overall, if `current` is `None`) and that the
    /// automaton could still plausibly accept — i.e. the next byte key worth seeking the term
    /// cursor to. Returns `None` once the automaton has nothing left after `current` (spec.md
    /// §4.2's "this collapses ranges of the dictionary that A rules out").
    pub fn seek_target(&mut self, current: Option<&[char]>) -> Option<Vec<u8>> {
        self.cur_gen = self.cur_gen.wrapping_add(1);

        // `current == None` means "smallest accepted string overall", which the empty string
        // itself satisfies if the start state already accepts (e.g. the widest ladder rung for an
        // empty pattern suffix). `smallest_completion` below always consumes at least one
        // transition, so it can never produce the empty string on its own — this case has to be
        // handled before falling into the position-backoff search, which is only ever looking for
        // a string strictly greater than some already-seen `current`.
        if current.is_none() && self.run.is_accept(State(0)) {
            log::trace!("seek target after None: empty string (start state already accepts)");
            return Some(Vec::new());
        }

        let seek: Vec<char> = current.map(|c| c.to_vec()).unwrap_or_default();

        // Walk the automaton along `seek`, stopping at the first dead transition.
        let mut states = vec![State(0)];
        for &c in &seek {
            match self.run.step(*states.last().unwrap(), c) {
                Some(next) => states.push(next),
                None => break,
            }
        }
        let valid_len = states.len() - 1;

        // Try backing off position by position: at each position p we require a character
        // strictly greater than seek[p] (or, if p is past the end of seek, any character at
        // all), then complete freely from there to the nearest reachable accept state.
        for p in (0..=valid_len).rev() {
            let lower_bound = if p < seek.len() { seek[p] as u32 + 1 } else { 0 };

            if let Some(mut suffix) = self.smallest_completion(states[p], lower_bound) {
                let mut result: Vec<char> = seek[0..p].to_vec();
                result.append(&mut suffix);
                let target = result.into_iter().collect::<String>().into_bytes();
                log::trace!("seek target after {:?}: {:?}", current, String::from_utf8_lossy(&target));
                return Some(target);
            }
        }

        log::trace!("no seek target remains after {:?}", current);
        None
    }

    /// Smallest non-empty `char` sequence whose first character is `>= lower_bound` and which
    /// drives `state` to an accept state.
    fn smallest_completion(&mut self, state: State, lower_bound: u32) -> Option<Vec<char>> {
        for (min, max, dest) in self.run.live_transitions_from(state) {
            if max < lower_bound {
                continue;
            }

            let candidate = min.max(lower_bound);
            let Some(c) = char::from_u32(candidate).or_else(|| char::from_u32(candidate.max(0xE000))) else {
                continue;
            };

            if c as u32 > max {
                continue;
            }

            if self.run.is_accept(dest) {
                return Some(vec![c]);
            }

            if let Some(mut rest) = self.smallest_path_to_accept(dest) {
                let mut seq = vec![c];
                seq.append(&mut rest);
                return Some(seq);
            }
        }

        None
    }

    /// Smallest (possibly empty) `char` sequence driving `state` to an accept state, with no
    /// constraint on the characters chosen. Memoized per `seek_target` call via `cur_gen` since
    /// every ladder automaton accepts a finite language (no unbounded repetition survives
    /// concatenating a literal prefix with a bounded-edit-distance suffix automaton), so this
    /// always terminates; `visited` only guards against a state being explored twice in one call.
    fn smallest_path_to_accept(&mut self, state: State) -> Option<Vec<char>> {
        if self.run.is_accept(state) {
            return Some(Vec::new());
        }

        if self.visited.get(&state.0) == Some(&self.cur_gen) {
            return None;
        }
        self.visited.insert(state.0, self.cur_gen);

        for (min, _max, dest) in self.run.live_transitions_from(state) {
            let Some(c) = char::from_u32(min).or_else(|| char::from_u32(0xE000)) else { continue };

            if let Some(mut rest) = self.smallest_path_to_accept(dest) {
                let mut seq = vec![c];
                seq.append(&mut rest);
                return Some(seq);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::util::automaton::{LevenshteinAutomatonFactory, K_MAX},
        pretty_assertions::assert_eq,
        test_log::test,
    };

    fn cursor_for(word: &str, k: u32) -> AutomatonTermCursor {
        let x: Vec<char> = word.chars().collect();
        let automaton = LevenshteinAutomatonFactory::build(&x, k, K_MAX).unwrap();
        AutomatonTermCursor::new(RunAutomaton::new(&automaton))
    }

    #[test]
    fn seek_target_from_none_is_the_smallest_accepted_string() {
        let mut cursor = cursor_for("ab", 0);
        let target = cursor.seek_target(None).unwrap();
        assert_eq!(String::from_utf8(target).unwrap(), "ab");
    }

    #[test]
    fn seek_target_skips_past_a_dead_range() {
        let mut cursor = cursor_for("cat", 0);
        // "cab" diverges from "cat" at position 2 ('b' < 't'); the only accepted string is "cat"
        // itself, so seek should jump straight to it.
        let current: Vec<char> = "cab".chars().collect();
        let target = cursor.seek_target(Some(&current)).unwrap();
        assert_eq!(String::from_utf8(target).unwrap(), "cat");
    }

    #[test]
    fn seek_target_returns_none_past_the_last_match() {
        let mut cursor = cursor_for("cat", 0);
        let current: Vec<char> = "cat".chars().collect();
        assert_eq!(cursor.seek_target(Some(&current)), None);
    }

    #[test]
    fn seek_target_from_none_accepts_the_empty_string_when_the_start_state_already_does() {
        // A[0] for an empty pattern suffix is a single state that is both start and accept, with
        // no outgoing transitions at all. The smallest accepted string overall is "".
        let mut cursor = cursor_for("", 0);
        let target = cursor.seek_target(None).unwrap();
        assert_eq!(String::from_utf8(target).unwrap(), "");
    }

    #[test]
    fn seek_target_past_the_already_emitted_empty_string_is_none() {
        let mut cursor = cursor_for("", 0);
        let current: Vec<char> = Vec::new();
        assert_eq!(cursor.seek_target(Some(&current)), None);
    }

    #[test]
    fn seek_target_is_strictly_increasing() {
        let mut cursor = cursor_for("cat", 1);
        let mut prev: Option<Vec<char>> = None;
        let mut seen = Vec::new();

        loop {
            let next = cursor.seek_target(prev.as_deref());
            match next {
                None => break,
                Some(bytes) => {
                    let s = String::from_utf8(bytes).unwrap();
                    if let Some(p) = &prev {
                        let p_string: String = p.iter().collect();
                        assert!(s.as_str() > p_string.as_str());
                    }
                    seen.push(s.clone());
                    prev = Some(s.chars().collect());
                }
            }
        }

        assert!(seen.contains(&"cat".to_string()));
    }
}
