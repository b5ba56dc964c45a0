pub mod automaton_term_cursor;
pub mod filtered_terms_enum;
pub mod terms_enum;

pub use {
    automaton_term_cursor::AutomatonTermCursor,
    filtered_terms_enum::{AcceptStatus, FilteredTermsEnum, FilteredTermsEnumBase},
    terms_enum::{SeekStatus, TermsEnum},
};
