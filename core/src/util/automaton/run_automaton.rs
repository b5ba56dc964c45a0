use std::cmp::max;

use bitvec::vec::BitVec;

use super::{builder::Automaton, state::State};

/// Tableized form of a deterministic [Automaton] for fast `char`-at-a-time stepping, grounded on
/// `core/src/util/automaton/run_automaton.rs` (same `points`/`step` shape, trimmed to drop the
/// byte-alphabet classmap fast path since the matching here always runs over `char`).
#[derive(Clone, Debug)]
pub struct RunAutomaton {
    size: u32,
    accept: BitVec,
    transitions: Vec<Option<State>>,
    points: Vec<u32>,
}

impl RunAutomaton {
    /// Builds a `RunAutomaton` from a deterministic [Automaton].
    ///
    /// # Panics
    /// Panics if `automaton` is not deterministic.
    pub fn new(automaton: &Automaton) -> Self {
        assert!(automaton.is_deterministic(), "RunAutomaton requires a deterministic automaton");

        let points = Self::start_points(automaton);
        let size = max(1, automaton.num_states());
        let mut transitions = vec![None; size as usize * points.len()];
        let mut accept = bitvec::bitvec!(0; size as usize);

        for n in 0..size {
            let state = State(n);
            if automaton.is_accept(state) {
                accept.set(n as usize, true);
            }

            for (c, &point) in points.iter().enumerate() {
                let dest = automaton.transitions_from(state).iter().find(|t| t.min <= point && point <= t.max).map(|t| t.dest);
                transitions[n as usize * points.len() + c] = dest;
            }
        }

        Self { size, accept, transitions, points }
    }

    fn start_points(automaton: &Automaton) -> Vec<u32> {
        let mut points = std::collections::BTreeSet::new();
        points.insert(0u32);

        for n in 0..automaton.num_states() {
            for t in automaton.transitions_from(State(n)) {
                points.insert(t.min);
                if t.max < u32::MAX {
                    points.insert(t.max + 1);
                }
            }
        }

        points.into_iter().collect()
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_accept(&self, state: State) -> bool {
        self.accept[state.usize()]
    }

    /// The sorted class-interval start points used to tableize transitions.
    pub fn char_intervals(&self) -> &[u32] {
        &self.points
    }

    fn char_class(&self, c: u32) -> usize {
        match self.points.binary_search(&c) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        }
    }

    /// Returns the state reached by reading `c` from `state`, or `None` if no such transition
    /// exists (a dead state).
    pub fn step(&self, state: State, c: char) -> Option<State> {
        self.transitions[state.usize() * self.points.len() + self.char_class(c as u32)]
    }

    /// Outgoing live transitions from `state` as `(min, max, dest)` ranges in ascending order,
    /// skipping classes that lead to a dead state. Used by the seek-target search in
    /// [crate::index::automaton_term_cursor::AutomatonTermCursor] to find the smallest character
    /// continuing towards acceptance.
    pub fn live_transitions_from(&self, state: State) -> Vec<(u32, u32, State)> {
        let mut out = Vec::new();

        for (c, &min) in self.points.iter().enumerate() {
            if let Some(dest) = self.transitions[state.usize() * self.points.len() + c] {
                let max = self.points.get(c + 1).map(|&p| p - 1).unwrap_or(u32::MAX);
                out.push((min, max, dest));
            }
        }

        out
    }
}
