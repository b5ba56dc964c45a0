use async_trait::async_trait;
use std::io::Result as IoResult;

/// Return value of [TermsEnum::seek_ceil].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SeekStatus {
    /// Seeking past the end of the term dictionary.
    End,

    /// The exact term was found.
    Found,

    /// A different (greater) term was found.
    NotFound,
}

/// A sorted cursor over the indexed terms of one field, borrowed from the term dictionary / index
/// reader for the lifetime of a fuzzy enumeration (spec.md §6's "consumed from the index reader").
///
/// Terms are always ordered by byte-lexicographic comparison of their UTF-8 encoding. The cursor is
/// unpositioned until the first successful [TermsEnum::next] or `seek_*` call.
#[async_trait(?Send)]
pub trait TermsEnum {
    /// The postings representation this index reader hands back for a term. Left abstract —
    /// postings are an explicit out-of-scope collaborator (spec.md §1).
    type Postings;

    /// The current term, or `None` if unpositioned.
    fn term(&self) -> Option<&[u8]>;

    /// Advances to the next term in byte-lexicographic order, or `None` at end of stream.
    async fn next(&mut self) -> IoResult<Option<Vec<u8>>>;

    /// Seeks to `target`, or the next term greater than it if `target` is not present.
    async fn seek_ceil(&mut self, target: &[u8]) -> IoResult<SeekStatus>;

    /// Seeks to exactly `target`. The default implementation delegates to [TermsEnum::seek_ceil].
    async fn seek_exact(&mut self, target: &[u8]) -> IoResult<bool> {
        Ok(self.seek_ceil(target).await? == SeekStatus::Found)
    }

    /// Ordinal position of the current term, if the codec tracks one.
    async fn ord(&self) -> IoResult<u64>;

    /// Seeks to the term at ordinal `ord`, as previously returned by [TermsEnum::ord].
    async fn seek_exact_ord(&mut self, ord: u64) -> IoResult<()>;

    /// Number of documents containing the current term. Passed through unchanged to the consumer
    /// (spec.md §6).
    async fn doc_freq(&self) -> IoResult<usize>;

    /// Postings for the current term. Passed through unchanged to the consumer.
    async fn postings(&self) -> IoResult<Self::Postings>;
}
