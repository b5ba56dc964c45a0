use std::{cell::Cell, rc::Rc};

use log::debug;

use crate::{
    error::FuzzyResult,
    index::{FilteredTermsEnumBase, TermsEnum},
    util::automaton::{Automaton, LevenshteinAutomatonFactory, RunAutomaton, K_MAX},
};

use super::{
    automaton_matcher::AutomatonFuzzyMatcher, linear_matcher::LinearFuzzyMatcher, pattern::Pattern,
    similarity::SimilarityConfig,
};

/// A competitive-score floor shared between a consumer (typically a top-N collector) and an
/// [AdaptiveFuzzyEnumerator]: the consumer raises it as it fills its result set, and the
/// enumerator reads it on every step to decide whether it can narrow its edit budget.
///
/// Kept as a small explicit observable passed in at construction rather than discovered via
/// reflection or a trait object — there is exactly one producer and one consumer per enumeration,
/// and both are known at construction time.
pub struct CompetitiveFloor(Cell<f64>);

impl CompetitiveFloor {
    pub fn new() -> Self {
        Self(Cell::new(f64::NEG_INFINITY))
    }

    pub fn get(&self) -> f64 {
        self.0.get()
    }

    pub fn set(&self, value: f64) {
        if value > self.0.get() {
            self.0.set(value);
        }
    }
}

impl Default for CompetitiveFloor {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazily builds and caches each rung of the Levenshtein-automaton ladder, `A[0]` through
/// `A[k_max]`, where `A[i] = concat(literal(Wp), Lev_i(Ws))`. Once built, a rung is never rebuilt —
/// narrowing the edit budget from `k` to some `k' < k` only ever needs rungs already built while
/// enumerating at `k`.
struct Ladder {
    prefix: Vec<char>,
    suffix: Vec<char>,
    k_max: u32,
    rungs: Vec<Option<Rc<RunAutomaton>>>,
}

impl Ladder {
    fn new(prefix: Vec<char>, suffix: Vec<char>, k_max: u32) -> Self {
        Self { prefix, suffix, k_max, rungs: vec![None; k_max as usize + 1] }
    }

    fn get(&mut self, k: u32) -> Rc<RunAutomaton> {
        let idx = k as usize;
        if self.rungs[idx].is_none() {
            let suffix_automaton = LevenshteinAutomatonFactory::build(&self.suffix, k, self.k_max)
                .expect("k was validated against k_max before reaching the ladder");
            let full: Automaton = Automaton::concat_literal_prefix(&self.prefix, &suffix_automaton);
            self.rungs[idx] = Some(Rc::new(RunAutomaton::new(&full)));
        }

        self.rungs[idx].as_ref().unwrap().clone()
    }
}

/// Which strategy currently backs the enumeration.
enum Backing<T: TermsEnum> {
    Automaton(FilteredTermsEnumBase<T, AutomatonFuzzyMatcher>),
    Linear(FilteredTermsEnumBase<T, LinearFuzzyMatcher>),
}

/// Enumerates the terms of one field fuzzily matching a [Pattern], picking between the automaton
/// ladder and the banded-DP linear scan and swapping between them as a shared [CompetitiveFloor]
/// rises.
///
/// Construction computes the initial edit budget `k0 = floor((1 - s_min) * |W|)`. If `k0` is
/// within the automaton ladder's implementation ceiling the enumeration starts on
/// [AutomatonFuzzyMatcher]; otherwise it starts on [LinearFuzzyMatcher] and never narrows back to
/// the automaton path, since `k0` only ever decreases as the competitive floor rises and an edit
/// budget already above the ceiling stays above it.
pub struct AdaptiveFuzzyEnumerator<T: TermsEnum> {
    pattern: Pattern,
    config: SimilarityConfig,
    floor: Rc<CompetitiveFloor>,
    ladder: Ladder,
    k: u32,
    last_observed_floor: f64,
    backing: Option<Backing<T>>,
}

impl<T: TermsEnum> AdaptiveFuzzyEnumerator<T> {
    /// Builds an enumerator using the default automaton ceiling ([K_MAX]).
    pub fn new(tenum: T, pattern: Pattern, s_min: f64, floor: Rc<CompetitiveFloor>) -> FuzzyResult<Self> {
        Self::with_k_max(tenum, pattern, s_min, K_MAX, floor)
    }

    /// Builds an enumerator with a caller-chosen automaton edit-distance ceiling, for callers who
    /// need a tighter or looser automaton/linear crossover point than the historical default of 2.
    pub fn with_k_max(
        tenum: T,
        pattern: Pattern,
        s_min: f64,
        k_max: u32,
        floor: Rc<CompetitiveFloor>,
    ) -> FuzzyResult<Self> {
        let config = SimilarityConfig::new(s_min, k_max)?;

        let prefix = pattern.prefix().to_vec();
        let suffix = pattern.suffix().to_vec();
        let mut ladder = Ladder::new(prefix.clone(), suffix.clone(), config.k_max);

        let k0 = ((1.0 - s_min) * pattern.len() as f64).floor() as u32;

        let backing = if k0 <= config.k_max {
            let runs: Vec<Rc<RunAutomaton>> = (1..=k0).map(|i| ladder.get(i)).collect();
            let skip_run = ladder.get(k0);
            let matcher = AutomatonFuzzyMatcher::new(pattern.text(), config, k0, runs, skip_run, None);
            Backing::Automaton(FilteredTermsEnumBase::new(tenum, matcher))
        } else {
            let matcher = LinearFuzzyMatcher::new(&prefix, &suffix, config);
            Backing::Linear(FilteredTermsEnumBase::new(tenum, matcher))
        };

        Ok(Self {
            pattern,
            config,
            floor,
            ladder,
            k: k0,
            last_observed_floor: f64::NEG_INFINITY,
            backing: Some(backing),
        })
    }

    /// The maximum boost any term at edit distance exactly `k` could still contribute — once the
    /// competitive floor is at or above this, no term needing the current edit budget can ever
    /// make the cut, and the budget can narrow.
    fn max_boost_at(&self, k: u32) -> f64 {
        if self.pattern.is_empty() {
            return if k == 0 { 1.0 } else { f64::NEG_INFINITY };
        }

        let sim = 1.0 - k as f64 / self.pattern.len() as f64;
        self.config.boost(sim)
    }

    fn swap_to_automaton(&mut self, resume: Option<Vec<u8>>) {
        let tenum = match self.backing.take().expect("backing is always present between calls") {
            Backing::Automaton(base) => base.into_inner(),
            Backing::Linear(base) => base.into_inner(),
        };

        let runs: Vec<Rc<RunAutomaton>> = (1..=self.k).map(|i| self.ladder.get(i)).collect();
        let skip_run = self.ladder.get(self.k);
        let matcher = AutomatonFuzzyMatcher::new(self.pattern.text(), self.config, self.k, runs, skip_run, resume);

        self.backing = Some(Backing::Automaton(FilteredTermsEnumBase::new(tenum, matcher)));
    }

    /// Narrows the edit budget as far as the current competitive floor allows, swapping from the
    /// linear matcher to the automaton ladder if narrowing brings `k` back within `k_max`.
    fn adapt(&mut self, observed_floor: f64, resume: Option<Vec<u8>>) {
        let old_k = self.k;

        while self.k > 0 && observed_floor >= self.max_boost_at(self.k) {
            self.k -= 1;
        }

        if self.k == old_k {
            return;
        }

        if self.k <= self.config.k_max {
            debug!("narrowing fuzzy edit budget {} -> {}", old_k, self.k);
            // Previously-built rungs are reused from the ladder cache; only the matcher's R[..]
            // set and skip cursor need to reflect the narrower k.
            self.swap_to_automaton(resume);
        }
    }

    /// Advances to the next matching term, or `None` at end of stream.
    pub async fn next(&mut self) -> FuzzyResult<Option<Vec<u8>>> {
        let term = match self.backing.as_mut().expect("backing is always present between calls") {
            Backing::Automaton(base) => base.next().await?,
            Backing::Linear(base) => base.next().await?,
        };

        if term.is_some() {
            let observed_floor = self.floor.get();
            if observed_floor > self.last_observed_floor {
                self.last_observed_floor = observed_floor;
                self.adapt(observed_floor, term.clone());
            }
        }

        Ok(term)
    }

    /// The boost of the most recently returned term.
    pub fn last_boost(&self) -> f64 {
        match self.backing.as_ref().expect("backing is always present between calls") {
            Backing::Automaton(base) => base.last_boost(),
            Backing::Linear(base) => base.last_boost(),
        }
    }
}
