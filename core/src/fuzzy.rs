pub mod automaton_matcher;
pub mod enumerator;
pub mod linear_matcher;
pub mod pattern;
pub mod similarity;

pub use {
    enumerator::{AdaptiveFuzzyEnumerator, CompetitiveFloor},
    pattern::Pattern,
    similarity::SimilarityConfig,
};
