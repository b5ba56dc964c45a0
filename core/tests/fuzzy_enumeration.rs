use std::{io::Result as IoResult, rc::Rc};

use async_trait::async_trait;
use fuzzterm_core::{
    fuzzy::{AdaptiveFuzzyEnumerator, CompetitiveFloor, Pattern},
    index::{SeekStatus, TermsEnum},
};

/// An in-memory sorted term cursor fixture standing in for a real index reader's term dictionary.
struct VecTermCursor {
    terms: Vec<Vec<u8>>,
    pos: Option<usize>,
}

impl VecTermCursor {
    fn new(words: &[&str]) -> Self {
        let mut terms: Vec<Vec<u8>> = words.iter().map(|w| w.as_bytes().to_vec()).collect();
        terms.sort();
        terms.dedup();
        Self { terms, pos: None }
    }
}

#[async_trait(?Send)]
impl TermsEnum for VecTermCursor {
    type Postings = ();

    fn term(&self) -> Option<&[u8]> {
        self.pos.map(|i| self.terms[i].as_slice())
    }

    async fn next(&mut self) -> IoResult<Option<Vec<u8>>> {
        let next_pos = self.pos.map(|p| p + 1).unwrap_or(0);
        if next_pos >= self.terms.len() {
            self.pos = None;
            return Ok(None);
        }
        self.pos = Some(next_pos);
        Ok(Some(self.terms[next_pos].clone()))
    }

    async fn seek_ceil(&mut self, target: &[u8]) -> IoResult<SeekStatus> {
        match self.terms.binary_search_by(|t| t.as_slice().cmp(target)) {
            Ok(i) => {
                self.pos = Some(i);
                Ok(SeekStatus::Found)
            }
            Err(i) if i < self.terms.len() => {
                self.pos = Some(i);
                Ok(SeekStatus::NotFound)
            }
            Err(_) => {
                self.pos = None;
                Ok(SeekStatus::End)
            }
        }
    }

    async fn ord(&self) -> IoResult<u64> {
        Ok(self.pos.unwrap_or(0) as u64)
    }

    async fn seek_exact_ord(&mut self, ord: u64) -> IoResult<()> {
        self.pos = Some(ord as usize);
        Ok(())
    }

    async fn doc_freq(&self) -> IoResult<usize> {
        Ok(1)
    }

    async fn postings(&self) -> IoResult<()> {
        Ok(())
    }
}

async fn collect_matches(mut enumerator: AdaptiveFuzzyEnumerator<VecTermCursor>) -> Vec<String> {
    let mut out = Vec::new();
    while let Some(term) = enumerator.next().await.unwrap() {
        out.push(String::from_utf8(term).unwrap());
    }
    out
}

#[tokio::test]
async fn matches_within_similarity_threshold() {
    let cursor = VecTermCursor::new(&["foobar", "fooxar", "football", "unrelated"]);
    let pattern = Pattern::new("title", "foobar", 0).unwrap();
    let floor = Rc::new(CompetitiveFloor::new());
    let enumerator = AdaptiveFuzzyEnumerator::new(cursor, pattern, 0.5, floor).unwrap();

    let matches = collect_matches(enumerator).await;
    assert!(matches.contains(&"foobar".to_string()));
    assert!(matches.contains(&"fooxar".to_string()));
    assert!(!matches.contains(&"unrelated".to_string()));
}

#[tokio::test]
async fn required_prefix_excludes_otherwise_similar_terms() {
    let cursor = VecTermCursor::new(&["hello", "jello", "hellp"]);
    let pattern = Pattern::new("title", "hello", 2).unwrap();
    let floor = Rc::new(CompetitiveFloor::new());
    let enumerator = AdaptiveFuzzyEnumerator::new(cursor, pattern, 0.3, floor).unwrap();

    let matches = collect_matches(enumerator).await;
    // "jello" differs from "hello" within its first two characters ("he" vs "je"), which must
    // match literally, so it is excluded regardless of overall similarity.
    assert!(matches.contains(&"hello".to_string()));
    assert!(matches.contains(&"hellp".to_string()));
    assert!(!matches.contains(&"jello".to_string()));
}

#[tokio::test]
async fn empty_pattern_matches_only_the_empty_term() {
    let cursor = VecTermCursor::new(&["", "a", "ab"]);
    let pattern = Pattern::new("title", "", 0).unwrap();
    let floor = Rc::new(CompetitiveFloor::new());
    let enumerator = AdaptiveFuzzyEnumerator::new(cursor, pattern, 0.5, floor).unwrap();

    let matches = collect_matches(enumerator).await;
    assert_eq!(matches, vec!["".to_string()]);
}

#[tokio::test]
async fn long_pattern_with_wide_threshold_falls_back_to_the_linear_matcher() {
    // |W| = 24, s_min = 0.5 => k0 = floor(0.5 * 24) = 12, far past the automaton ceiling, so
    // construction must select the linear matcher from the start.
    let w = "abcdefghijklmnopqrstuvwx";
    let cursor = VecTermCursor::new(&[w, "abcdefghijklmnopqrstuvwy", "completely-unrelated-term"]);
    let pattern = Pattern::new("title", w, 0).unwrap();
    let floor = Rc::new(CompetitiveFloor::new());
    let enumerator = AdaptiveFuzzyEnumerator::new(cursor, pattern, 0.5, floor).unwrap();

    let matches = collect_matches(enumerator).await;
    assert!(matches.contains(&w.to_string()));
    assert!(matches.contains(&"abcdefghijklmnopqrstuvwy".to_string()));
    assert!(!matches.contains(&"completely-unrelated-term".to_string()));
}

#[tokio::test]
async fn rising_competitive_floor_narrows_the_edit_budget_without_losing_matches() {
    // |W| = 10, s_min = 0.2 => k0 = floor(0.8 * 10) = 8, starting on the linear matcher.
    let w = "abcdefghij";
    let cursor = VecTermCursor::new(&[w, "abcdefghik", "zzzzzzzzzz"]);
    let pattern = Pattern::new("title", w, 0).unwrap();
    let floor = Rc::new(CompetitiveFloor::new());

    let mut enumerator = AdaptiveFuzzyEnumerator::new(cursor, pattern, 0.2, floor.clone()).unwrap();

    // Raise the floor high enough that only a near-exact match (boost close to 1) can still
    // compete, which should narrow k back within the automaton ladder's ceiling.
    floor.set(0.85);

    let mut matches = Vec::new();
    while let Some(term) = enumerator.next().await.unwrap() {
        matches.push(String::from_utf8(term).unwrap());
    }

    assert!(matches.contains(&w.to_string()));
    assert!(matches.contains(&"abcdefghik".to_string()));
    assert!(!matches.contains(&"zzzzzzzzzz".to_string()));
}

#[tokio::test]
async fn custom_k_max_widens_the_automaton_ceiling() {
    // |W| = 8, s_min = 0.5 => k0 = floor(0.5 * 8) = 4, past the default K_MAX = 2 but within a
    // caller-supplied ceiling of 4, so construction should stay on the automaton path.
    let w = "abcdefgh";
    let cursor = VecTermCursor::new(&[w, "abcdefzh", "zzzzzzzz"]);
    let pattern = Pattern::new("title", w, 0).unwrap();
    let floor = Rc::new(CompetitiveFloor::new());
    let enumerator = AdaptiveFuzzyEnumerator::with_k_max(cursor, pattern, 0.5, 4, floor).unwrap();

    let matches = collect_matches(enumerator).await;
    assert!(matches.contains(&w.to_string()));
    assert!(matches.contains(&"abcdefzh".to_string()));
    assert!(!matches.contains(&"zzzzzzzz".to_string()));
}

#[tokio::test]
async fn transposition_is_not_treated_as_a_single_edit() {
    let cursor = VecTermCursor::new(&["abcd", "abdc"]);
    let pattern = Pattern::new("title", "abcd", 0).unwrap();
    let floor = Rc::new(CompetitiveFloor::new());
    // s_min = 0.76 => k0 = floor(0.24 * 4) = 0, so only an exact match of "abcd" should pass;
    // "abdc" is a transposition (true edit distance 2) and must not be emitted.
    let enumerator = AdaptiveFuzzyEnumerator::new(cursor, pattern, 0.76, floor).unwrap();

    let matches = collect_matches(enumerator).await;
    assert_eq!(matches, vec!["abcd".to_string()]);
}
