use std::io::Result as IoResult;

use async_trait::async_trait;

use crate::index::{AcceptStatus, FilteredTermsEnum};

use super::similarity::{BandedLevenshtein, SimilarityConfig};

/// Scans the sub-range of terms beginning with `UTF-8(Wp)` with a banded-DP similarity scorer
/// instead of a Levenshtein automaton — the fallback path once the edit budget implied by
/// `s_min` and `|W|` exceeds the automaton ladder's implementation ceiling.
///
/// Unlike [crate::fuzzy::automaton_matcher::AutomatonFuzzyMatcher], this matcher only ever seeks
/// once (to position the cursor at the start of the `Wp` sub-range); every candidate after that is
/// visited by a plain sequential `next()`, and the prefix check in `accept` doubles as the
/// sub-range's exit condition.
pub struct LinearFuzzyMatcher {
    prefix_bytes: Vec<u8>,
    dp: BandedLevenshtein,
    config: SimilarityConfig,
    did_initial_seek: bool,
    last_boost: f64,
}

impl LinearFuzzyMatcher {
    pub fn new(prefix: &[char], suffix: &[char], config: SimilarityConfig) -> Self {
        let prefix_string: String = prefix.iter().collect();
        Self {
            prefix_bytes: prefix_string.into_bytes(),
            dp: BandedLevenshtein::new(suffix.to_vec(), prefix.len(), config.s_min),
            config,
            did_initial_seek: false,
            last_boost: 0.0,
        }
    }
}

#[async_trait(?Send)]
impl FilteredTermsEnum for LinearFuzzyMatcher {
    async fn accept(&mut self, term: &[u8]) -> IoResult<AcceptStatus> {
        if !term.starts_with(self.prefix_bytes.as_slice()) {
            return Ok(AcceptStatus::End);
        }

        let suffix_bytes = &term[self.prefix_bytes.len()..];
        let Ok(suffix_text) = std::str::from_utf8(suffix_bytes) else {
            return Ok(AcceptStatus::No);
        };
        let candidate: Vec<char> = suffix_text.chars().collect();

        let sim = self.dp.similarity(&candidate);
        if sim > self.config.s_min {
            self.last_boost = self.config.boost(sim);
            Ok(AcceptStatus::Yes)
        } else {
            Ok(AcceptStatus::No)
        }
    }

    async fn next_seek_term(&mut self, current_term: Option<&[u8]>) -> IoResult<Option<Vec<u8>>> {
        if current_term.is_none() && !self.did_initial_seek {
            self.did_initial_seek = true;
            return Ok(Some(self.prefix_bytes.clone()));
        }

        Ok(None)
    }

    fn last_boost(&self) -> f64 {
        self.last_boost
    }
}
