use std::{io::Result as IoResult, rc::Rc};

use async_trait::async_trait;

use crate::{
    index::{AcceptStatus, AutomatonTermCursor, FilteredTermsEnum},
    util::automaton::{RunAutomaton, State},
};

use super::similarity::SimilarityConfig;

/// Drives the Levenshtein-ladder seek-and-filter strategy: a [AutomatonTermCursor] built from the
/// widest rung `A[k]` skips whole dead ranges of the term dictionary, while the narrower rungs
/// `R[1..=k]` are tried in ascending order against each surviving candidate to find its true edit
/// distance (and thus its boost) without running the full banded DP.
///
/// `k = 0` only ever arises for an empty-suffix pattern, where the exact-match fast path in
/// [AutomatonFuzzyMatcher::accept] already covers the entire language of `A[0]`; the ascending
/// scan below deliberately starts at `i = 1`.
pub struct AutomatonFuzzyMatcher {
    w_utf8: Vec<u8>,
    w_len: usize,
    config: SimilarityConfig,
    k: u32,
    runs: Vec<Rc<RunAutomaton>>,
    cursor: AutomatonTermCursor,
    /// The term the previous matcher strategy last emitted, consumed on the first call to
    /// [AutomatonFuzzyMatcher::next_seek_term] as the position to resume strictly after — not
    /// returned verbatim, since that term has already been reported to the consumer.
    resume_after: Option<Vec<char>>,
    last_boost: f64,
}

impl AutomatonFuzzyMatcher {
    /// `runs[i - 1]` must be the run automaton for edit distance `i`, for `i` in `1..=k`.
    /// `skip_run` is the (same-or-wider) rung the seek cursor walks, normally `runs.last()`.
    pub fn new(
        pattern_text: &[char],
        config: SimilarityConfig,
        k: u32,
        runs: Vec<Rc<RunAutomaton>>,
        skip_run: Rc<RunAutomaton>,
        resume_after: Option<Vec<u8>>,
    ) -> Self {
        let w_utf8: String = pattern_text.iter().collect();
        let resume_after = resume_after.and_then(|bytes| String::from_utf8(bytes).ok()).map(|s| s.chars().collect());

        Self {
            w_utf8: w_utf8.into_bytes(),
            w_len: pattern_text.len(),
            config,
            k,
            runs,
            cursor: AutomatonTermCursor::new((*skip_run).clone()),
            resume_after,
            last_boost: 0.0,
        }
    }

    fn run_accepts(run: &RunAutomaton, chars: &[char]) -> bool {
        let mut state = State(0);
        for &c in chars {
            match run.step(state, c) {
                Some(next) => state = next,
                None => return false,
            }
        }
        run.is_accept(state)
    }
}

#[async_trait(?Send)]
impl FilteredTermsEnum for AutomatonFuzzyMatcher {
    async fn accept(&mut self, term: &[u8]) -> IoResult<AcceptStatus> {
        if term == self.w_utf8.as_slice() {
            self.last_boost = 1.0;
            return Ok(AcceptStatus::YesAndSeek);
        }

        let Ok(text) = std::str::from_utf8(term) else {
            return Ok(AcceptStatus::NoAndSeek);
        };
        let candidate: Vec<char> = text.chars().collect();

        for (offset, run) in self.runs.iter().enumerate() {
            let i = offset as u32 + 1;
            if i > self.k {
                break;
            }

            if Self::run_accepts(run, &candidate) {
                let denom = candidate.len().min(self.w_len);
                let sim = if denom == 0 { 0.0 } else { 1.0 - i as f64 / denom as f64 };

                return if sim > self.config.s_min {
                    self.last_boost = self.config.boost(sim);
                    Ok(AcceptStatus::YesAndSeek)
                } else {
                    Ok(AcceptStatus::NoAndSeek)
                };
            }
        }

        Ok(AcceptStatus::NoAndSeek)
    }

    async fn next_seek_term(&mut self, current_term: Option<&[u8]>) -> IoResult<Option<Vec<u8>>> {
        let current_chars: Option<Vec<char>> = match current_term {
            Some(bytes) => std::str::from_utf8(bytes).ok().map(|s| s.chars().collect()),
            None => self.resume_after.take(),
        };

        Ok(self.cursor.seek_target(current_chars.as_deref()))
    }

    fn last_boost(&self) -> f64 {
        self.last_boost
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::util::automaton::LevenshteinAutomatonFactory,
        tokio::test as tokio_test,
    };

    fn matcher_for(word: &str, k: u32, s_min: f64) -> AutomatonFuzzyMatcher {
        let x: Vec<char> = word.chars().collect();
        let config = SimilarityConfig::new(s_min, 2).unwrap();
        let runs: Vec<Rc<RunAutomaton>> = (1..=k)
            .map(|i| Rc::new(RunAutomaton::new(&LevenshteinAutomatonFactory::build(&x, i, 2).unwrap())))
            .collect();
        let skip_run = if k == 0 {
            Rc::new(RunAutomaton::new(&LevenshteinAutomatonFactory::build(&x, 0, 2).unwrap()))
        } else {
            runs.last().unwrap().clone()
        };
        AutomatonFuzzyMatcher::new(&x, config, k, runs, skip_run, None)
    }

    #[tokio_test]
    async fn exact_match_always_accepts_with_full_boost() {
        let mut m = matcher_for("cat", 1, 0.5);
        let status = m.accept(b"cat").await.unwrap();
        assert_eq!(status, AcceptStatus::YesAndSeek);
        assert_eq!(m.last_boost(), 1.0);
    }

    #[tokio_test]
    async fn one_edit_within_threshold_accepts_with_partial_boost() {
        let mut m = matcher_for("cat", 1, 0.1);
        let status = m.accept(b"cot").await.unwrap();
        assert_eq!(status, AcceptStatus::YesAndSeek);
        assert!(m.last_boost() > 0.0 && m.last_boost() < 1.0);
    }

    #[tokio_test]
    async fn below_threshold_similarity_is_rejected() {
        let mut m = matcher_for("cat", 1, 0.9);
        let status = m.accept(b"cot").await.unwrap();
        assert_eq!(status, AcceptStatus::NoAndSeek);
    }

    #[tokio_test]
    async fn beyond_the_edit_budget_is_rejected() {
        let mut m = matcher_for("cat", 1, 0.0);
        let status = m.accept(b"dog").await.unwrap();
        assert_eq!(status, AcceptStatus::NoAndSeek);
    }

}
