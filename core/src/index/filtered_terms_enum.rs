//! A generic DFA-guided term cursor that consumes a small "matcher capability" instead of being
//! subclassed — spec.md §9's re-expression of Lucene's `FilteredTermsEnum`/`accept()` subclass
//! hook as an explicit trait object, grounded on `core/src/index/filtered_terms_enum.rs`'s
//! `next_with_filterer` seek loop.

use async_trait::async_trait;
use std::io::Result as IoResult;

use super::terms_enum::{SeekStatus, TermsEnum};

/// Result of examining one candidate term, returned by [FilteredTermsEnum::accept].
#[derive(Debug, Eq, PartialEq)]
pub enum AcceptStatus {
    /// Accept the term; advance with a plain `next()` afterwards.
    Yes,

    /// Accept the term; advance by calling [FilteredTermsEnum::next_seek_term] afterwards.
    YesAndSeek,

    /// Reject the term; advance with a plain `next()`.
    No,

    /// Reject the term; advance by calling [FilteredTermsEnum::next_seek_term] afterwards.
    NoAndSeek,

    /// Reject the term and stop enumerating entirely.
    End,
}

/// The matcher capability a [FilteredTermsEnumBase] drives: a decision per candidate term plus an
/// optional resume point to skip ahead to. Implemented by
/// [crate::fuzzy::automaton_matcher::AutomatonFuzzyMatcher] and
/// [crate::fuzzy::linear_matcher::LinearFuzzyMatcher].
#[async_trait(?Send)]
pub trait FilteredTermsEnum {
    /// Judges one candidate term, as a side effect recording the boost to report if accepted.
    async fn accept(&mut self, term: &[u8]) -> IoResult<AcceptStatus>;

    /// Called on the first call to [FilteredTermsEnumBase::next], and again whenever `accept`
    /// returned a `*AndSeek` status, to obtain the next term the underlying cursor should seek to.
    /// `current_term` is `None` on the very first call. Returning `None` ends the enumeration.
    ///
    /// Implementations must always return a term strictly greater than `current_term`.
    async fn next_seek_term(&mut self, current_term: Option<&[u8]>) -> IoResult<Option<Vec<u8>>>;

    /// The boost recorded by the most recent accepting call to [FilteredTermsEnum::accept].
    fn last_boost(&self) -> f64;
}

/// Drives a borrowed [TermsEnum] with a [FilteredTermsEnum] matcher capability, implementing the
/// seek-or-step loop spec.md §4.2 describes: keep stepping sequentially while matches succeed;
/// when a match fails or requests a skip, consult `next_seek_term` and seek there instead.
pub struct FilteredTermsEnumBase<T, M> {
    tenum: T,
    matcher: M,
    do_seek: bool,
    actual_term: Option<Vec<u8>>,
}

impl<T, M> FilteredTermsEnumBase<T, M>
where
    T: TermsEnum,
    M: FilteredTermsEnum,
{
    pub fn new(tenum: T, matcher: M) -> Self {
        Self { tenum, matcher, do_seek: true, actual_term: None }
    }

    /// The term the underlying cursor is currently positioned at, or `None` if unpositioned.
    pub fn term(&self) -> Option<&[u8]> {
        self.actual_term.as_deref()
    }

    pub fn last_boost(&self) -> f64 {
        self.matcher.last_boost()
    }

    pub fn inner(&self) -> &T {
        &self.tenum
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.tenum
    }

    /// Unwraps the underlying cursor, discarding matcher state. Used when swapping matcher
    /// strategies mid-enumeration.
    pub fn into_inner(self) -> T {
        self.tenum
    }

    /// Advances to the next accepted term, or `None` at end of stream.
    pub async fn next(&mut self) -> IoResult<Option<Vec<u8>>> {
        loop {
            if self.do_seek {
                self.do_seek = false;
                let target = self.matcher.next_seek_term(self.actual_term.as_deref()).await?;

                let Some(target) = target else {
                    self.actual_term = None;
                    return Ok(None);
                };

                debug_assert!(self.actual_term.as_deref().map(|t| target.as_slice() > t).unwrap_or(true));

                if self.tenum.seek_ceil(&target).await? == SeekStatus::End {
                    self.actual_term = None;
                    return Ok(None);
                }

                self.actual_term = self.tenum.term().map(|t| t.to_vec());
            } else {
                self.actual_term = self.tenum.next().await?;

                if self.actual_term.is_none() {
                    return Ok(None);
                }
            }

            let current = self.actual_term.clone().expect("positioned after seek/next");

            match self.matcher.accept(&current).await? {
                AcceptStatus::YesAndSeek => {
                    self.do_seek = true;
                    return Ok(Some(current));
                }
                AcceptStatus::Yes => return Ok(Some(current)),
                AcceptStatus::NoAndSeek => self.do_seek = true,
                AcceptStatus::No => {}
                AcceptStatus::End => {
                    self.actual_term = None;
                    return Ok(None);
                }
            }
        }
    }
}
