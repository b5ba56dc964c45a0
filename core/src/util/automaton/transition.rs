use std::fmt::{Display, Formatter, Result as FmtResult};

use super::state::State;

/// A single labeled edge of an [Automaton](super::Automaton): reading any codepoint in
/// `min..=max` from `source` moves to `dest`.
#[derive(Clone, Copy, Debug)]
pub struct Transition {
    pub source: State,
    pub dest: State,

    /// Minimum accepted codepoint (inclusive).
    pub min: u32,

    /// Maximum accepted codepoint (inclusive).
    pub max: u32,
}

impl Display for Transition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} -> {} [{}-{}]", self.source, self.dest, self.min, self.max)
    }
}
