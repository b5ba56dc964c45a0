use super::builder::Automaton;

/// Constructs, for a Unicode scalar sequence `X` and an edit budget `k`, the automaton accepting
/// exactly the strings within Levenshtein distance `k` of `X` (insert/delete/substitute only — no
/// transposition, per spec.md's Non-goals).
///
/// Grounded on the standard parametrized-NFA construction for Levenshtein automata: states are
/// pairs `(i, e)`, `0 ≤ i ≤ |X|`, `0 ≤ e ≤ k`, with epsilon transitions for deletion and
/// full-alphabet transitions for insertion/substitution. Unlike `core/src/util/automaton/operations.rs`'s
/// general-purpose NFA, this builds directly for the Levenshtein topology rather than going
/// through Lucene's precomputed "parametric description" tables — those tables are an offline
/// performance optimization for a fixed small set of `k` values and are not reproduced here; plain
/// subset construction is fast enough for `k ≤ K_MAX`.
pub struct LevenshteinAutomatonFactory;

/// Implementation ceiling on automaton edit distance. Above this, `AdaptiveFuzzyEnumerator` falls
/// back to [crate::fuzzy::linear_matcher::LinearFuzzyMatcher].
pub const K_MAX: u32 = 2;

impl LevenshteinAutomatonFactory {
    /// Builds `Lev_k(x)`, determinized. Returns `None` if `k` exceeds `k_max` — the caller must
    /// fall back to the linear matcher (spec.md §4.1's "Error conditions").
    pub fn build(x: &[char], k: u32, k_max: u32) -> Option<Automaton> {
        if k > k_max {
            return None;
        }

        Some(Self::nfa(x, k).determinize())
    }

    fn state_id(i: usize, e: u32, k: u32) -> u32 {
        (i as u32) * (k + 1) + e
    }

    fn nfa(x: &[char], k: u32) -> Automaton {
        let n = x.len();
        let mut a = Automaton::new();

        for _ in 0..=n {
            for _ in 0..=k {
                a.create_state();
            }
        }

        for i in 0..=n {
            for e in 0..=k {
                let here = super::state::State(Self::state_id(i, e, k));

                if i < n {
                    // Match: consume X[i] for free.
                    let next = super::state::State(Self::state_id(i + 1, e, k));
                    let c = x[i] as u32;
                    a.add_transition(here, next, c, c);
                }

                if e < k {
                    if i < n {
                        // Delete or substitute X[i]; both land on (i+1, e+1) — one via epsilon,
                        // the other by consuming whichever character was substituted in.
                        let advanced = super::state::State(Self::state_id(i + 1, e + 1, k));
                        a.add_epsilon(here, advanced);
                        a.add_transition(here, advanced, 0, char::MAX as u32);
                    }

                    // Insert any character before position i.
                    let ins = super::state::State(Self::state_id(i, e + 1, k));
                    a.add_transition(here, ins, 0, char::MAX as u32);
                }
            }
        }

        for e in 0..=k {
            a.set_accept(super::state::State(Self::state_id(n, e, k)), true);
        }

        a
    }
}
