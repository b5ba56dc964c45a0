use crate::error::{FuzzyMatchError, FuzzyResult};

/// The query term being fuzzily matched against a field's terms: text `W` plus a required
/// unmodified prefix length.
///
/// `W` is stored as `char`s rather than bytes since every downstream computation (the Levenshtein
/// automaton ladder, the banded DP fallback) operates on Unicode scalar values, not raw UTF-8
/// bytes.
#[derive(Clone, Debug)]
pub struct Pattern {
    field: String,
    text: Vec<char>,
    prefix_len: usize,
}

impl Pattern {
    /// Builds a pattern, validating that `prefix_len` is not negative. `prefix_len` is silently
    /// clamped to `text`'s length by [Pattern::prefix_len] / [Pattern::l] — a caller asking for a
    /// longer required prefix than the pattern itself simply gets the whole pattern as prefix.
    pub fn new(field: impl Into<String>, text: &str, prefix_len: i64) -> FuzzyResult<Self> {
        if prefix_len < 0 {
            return Err(FuzzyMatchError::ArgumentInvalid(format!(
                "prefix length must not be negative, got {prefix_len}"
            )));
        }

        Ok(Self { field: field.into(), text: text.chars().collect(), prefix_len: prefix_len as usize })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn text(&self) -> &[char] {
        &self.text
    }

    /// `|W|`, in Unicode scalar values.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// `L = min(L_req, |W|)`: the effective required-unmodified-prefix length.
    pub fn l(&self) -> usize {
        self.prefix_len.min(self.text.len())
    }

    /// `Wp`: the first `L` characters of `W`, required to match literally.
    pub fn prefix(&self) -> &[char] {
        &self.text[..self.l()]
    }

    /// `Ws`: the remaining characters of `W` after the required prefix, subject to fuzzy matching.
    pub fn suffix(&self) -> &[char] {
        &self.text[self.l()..]
    }
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq, test_log::test};

    #[test]
    fn prefix_length_splits_text_into_prefix_and_suffix() {
        let p = Pattern::new("title", "foobar", 3).unwrap();
        assert_eq!(p.prefix(), &['f', 'o', 'o']);
        assert_eq!(p.suffix(), &['b', 'a', 'r']);
    }

    #[test]
    fn prefix_length_longer_than_text_is_clamped() {
        let p = Pattern::new("title", "hi", 5).unwrap();
        assert_eq!(p.l(), 2);
        assert_eq!(p.prefix(), &['h', 'i']);
        assert!(p.suffix().is_empty());
    }

    #[test]
    fn negative_prefix_length_is_rejected() {
        assert!(matches!(Pattern::new("title", "hi", -1), Err(FuzzyMatchError::ArgumentInvalid(_))));
    }

    #[test]
    fn empty_text_is_allowed() {
        let p = Pattern::new("title", "", 0).unwrap();
        assert!(p.is_empty());
        assert!(p.prefix().is_empty());
        assert!(p.suffix().is_empty());
    }
}
