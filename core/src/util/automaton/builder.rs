//! Nondeterministic construction plus subset-construction determinization, scoped to finite
//! (acyclic-apart-from-a-dead-sink) automata over `char`. Grounded on the shape of
//! `core/src/util/automaton/automata.rs` (the `make_*`/`append_*` builder helpers) and
//! `core/src/util/automaton/operations.rs::determinize` (subset construction via a worklist of
//! NFA-state sets), trimmed to drop union/intersection/minimization, none of which the ladder
//! needs.

use std::collections::{BTreeSet, HashMap, VecDeque};

use super::{state::State, transition::Transition};

/// A finite automaton over `char`. Can hold either a nondeterministic construction (with
/// epsilon transitions and possibly-overlapping transition ranges) or, after [Automaton::determinize],
/// a deterministic one with disjoint transition ranges per state and no epsilons.
#[derive(Clone, Debug)]
pub struct Automaton {
    transitions: Vec<Vec<Transition>>,
    epsilons: Vec<Vec<State>>,
    accept: Vec<bool>,
    deterministic: bool,
}

impl Default for Automaton {
    fn default() -> Self {
        Self { transitions: Vec::new(), epsilons: Vec::new(), accept: Vec::new(), deterministic: true }
    }
}

impl Automaton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_state(&mut self) -> State {
        let id = self.transitions.len() as u32;
        self.transitions.push(Vec::new());
        self.epsilons.push(Vec::new());
        self.accept.push(false);
        State(id)
    }

    pub fn set_accept(&mut self, state: State, accept: bool) {
        self.accept[state.usize()] = accept;
    }

    pub fn is_accept(&self, state: State) -> bool {
        self.accept[state.usize()]
    }

    pub fn num_states(&self) -> u32 {
        self.transitions.len() as u32
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    pub fn add_transition(&mut self, source: State, dest: State, min: u32, max: u32) {
        self.transitions[source.usize()].push(Transition { source, dest, min, max });
        self.deterministic = false;
    }

    pub fn add_epsilon(&mut self, source: State, dest: State) {
        self.epsilons[source.usize()].push(dest);
        self.deterministic = false;
    }

    pub fn transitions_from(&self, state: State) -> &[Transition] {
        &self.transitions[state.usize()]
    }

    fn epsilon_closure(&self, seeds: impl IntoIterator<Item = u32>) -> BTreeSet<u32> {
        let mut closure: BTreeSet<u32> = BTreeSet::new();
        let mut queue: VecDeque<u32> = VecDeque::new();

        for s in seeds {
            if closure.insert(s) {
                queue.push_back(s);
            }
        }

        while let Some(s) = queue.pop_front() {
            for &next in &self.epsilons[s as usize] {
                if closure.insert(next.0) {
                    queue.push_back(next.0);
                }
            }
        }

        closure
    }

    /// Determinizes this automaton via subset construction. The language is unchanged; the
    /// caller no longer sees epsilon transitions or overlapping ranges.
    ///
    /// Assumes (as every ladder automaton does) that the language is finite, so the worklist
    /// always drains.
    pub fn determinize(&self) -> Automaton {
        if self.deterministic {
            return self.clone();
        }

        let mut result = Automaton::new();
        let mut id_of: HashMap<BTreeSet<u32>, State> = HashMap::new();
        let mut worklist: VecDeque<BTreeSet<u32>> = VecDeque::new();

        let start_set = self.epsilon_closure([0u32]);
        let start = result.create_state();
        result.set_accept(start, start_set.iter().any(|&s| self.accept[s as usize]));
        id_of.insert(start_set.clone(), start);
        worklist.push_back(start_set);

        while let Some(set) = worklist.pop_front() {
            let dfa_state = id_of[&set];

            // Collect all boundary points among transitions leaving any NFA state in `set`.
            let mut points: BTreeSet<u32> = BTreeSet::new();
            for &nfa_state in &set {
                for t in &self.transitions[nfa_state as usize] {
                    points.insert(t.min);
                    points.insert(t.max.saturating_add(1));
                }
            }

            if points.is_empty() {
                continue;
            }

            let points: Vec<u32> = points.into_iter().collect();

            for window in points.windows(2) {
                let (lo, hi_exclusive) = (window[0], window[1]);
                if lo >= hi_exclusive {
                    continue;
                }

                let representative = lo;
                let mut targets: BTreeSet<u32> = BTreeSet::new();

                for &nfa_state in &set {
                    for t in &self.transitions[nfa_state as usize] {
                        if t.min <= representative && representative <= t.max {
                            targets.insert(t.dest.0);
                        }
                    }
                }

                if targets.is_empty() {
                    continue;
                }

                let closure = self.epsilon_closure(targets);
                let dest_state = *id_of.entry(closure.clone()).or_insert_with(|| {
                    let s = result.create_state();
                    result.set_accept(s, closure.iter().any(|&n| self.accept[n as usize]));
                    worklist.push_back(closure.clone());
                    s
                });

                result.add_transition(dfa_state, dest_state, lo, hi_exclusive - 1);
            }
        }

        result.deterministic = true;
        result
    }

    /// Builds the nondeterministic concatenation of a literal prefix with `suffix`, then
    /// determinizes the result. If `prefix` is empty, `suffix` is returned unchanged (already
    /// determinized per its own invariant).
    pub fn concat_literal_prefix(prefix: &[char], suffix: &Automaton) -> Automaton {
        if prefix.is_empty() {
            return suffix.clone();
        }

        let mut combined = Automaton::new();
        let start = combined.create_state();
        let mut cur = start;

        for &c in prefix {
            let next = combined.create_state();
            combined.add_transition(cur, next, c as u32, c as u32);
            cur = next;
        }

        let offset = combined.num_states();
        for _ in 0..suffix.num_states() {
            combined.create_state();
        }

        for s in 0..suffix.num_states() {
            let mapped = State(s + offset);
            combined.set_accept(mapped, suffix.accept[s as usize]);

            for t in &suffix.transitions[s as usize] {
                combined.add_transition(mapped, State(t.dest.0 + offset), t.min, t.max);
            }

            for &e in &suffix.epsilons[s as usize] {
                combined.add_epsilon(mapped, State(e.0 + offset));
            }
        }

        combined.add_epsilon(cur, State(offset));
        combined.determinize()
    }
}

/// Builds a deterministic automaton accepting exactly the single string `chars`.
pub fn literal(chars: &[char]) -> Automaton {
    let mut a = Automaton::new();
    let mut cur = a.create_state();

    for &c in chars {
        let next = a.create_state();
        a.add_transition(cur, next, c as u32, c as u32);
        cur = next;
    }

    a.set_accept(cur, true);
    a
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq, test_log::test};

    fn accepts(a: &Automaton, s: &str) -> bool {
        let mut state = State(0);
        for c in s.chars() {
            let t = a.transitions_from(state).iter().find(|t| t.min <= c as u32 && c as u32 <= t.max);
            match t {
                Some(t) => state = t.dest,
                None => return false,
            }
        }
        a.is_accept(state)
    }

    #[test]
    fn literal_accepts_only_itself() {
        let a = literal(&['f', 'o', 'o']);
        assert!(accepts(&a, "foo"));
        assert!(!accepts(&a, "fo"));
        assert!(!accepts(&a, "foobar"));
    }

    #[test]
    fn determinize_of_already_deterministic_is_identity_language() {
        let a = literal(&['a', 'b']);
        let d = a.determinize();
        assert!(d.is_deterministic());
        assert!(accepts(&d, "ab"));
        assert!(!accepts(&d, "a"));
    }

    #[test]
    fn concat_literal_prefix_requires_prefix_then_suffix_language() {
        let suffix = literal(&['b', 'a', 'r']);
        let combined = Automaton::concat_literal_prefix(&['f', 'o', 'o'], &suffix);
        assert!(combined.is_deterministic());
        assert!(accepts(&combined, "foobar"));
        assert!(!accepts(&combined, "foo"));
        assert!(!accepts(&combined, "bar"));
    }

    #[test]
    fn concat_literal_prefix_with_empty_prefix_is_suffix() {
        let suffix = literal(&['x']);
        let combined = Automaton::concat_literal_prefix(&[], &suffix);
        assert_eq!(combined.num_states(), suffix.num_states());
    }
}
