//! Data types for documents, chunks, and search results.

use serde::{Deserialize, Serialize};

/// An uploaded document: its sanitized name and extracted text.
///
/// The text may be empty or an extraction-error placeholder; either is
/// indexed as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Sanitized file name, extension included.
    pub file_name: String,
    /// File name without its final extension.
    pub base_name: String,
    /// The extracted text content.
    pub text: String,
}

impl Document {
    /// Build a document from the `(text, display_name)` pair handed over by
    /// the upload layer.
    pub fn from_upload(text: impl Into<String>, display_name: &str) -> Self {
        let file_name = sanitize_file_name(display_name);
        let base_name = match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => file_name.clone(),
        };
        Self { file_name, base_name, text: text.into() }
    }
}

/// Reduce an arbitrary display name to a safe single path component.
///
/// Directory parts are dropped, whitespace runs become `_`, anything outside
/// `[A-Za-z0-9._-]` becomes `_`, and leading dots are stripped. An empty
/// result falls back to `document`.
pub fn sanitize_file_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let joined = last.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() { "document".to_string() } else { cleaned }
}

/// A contiguous segment of a [`Document`]'s text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in document order, starting at zero.
    pub index: usize,
    /// Byte offset of the chunk's first character in the source text.
    pub start: usize,
    /// The text content of the chunk.
    pub text: String,
}

impl AsRef<str> for Chunk {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// A [`Chunk`] paired with its vector embedding, as persisted by a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedChunk {
    /// The chunk, stored inline with its embedding.
    #[serde(flatten)]
    pub chunk: Chunk,
    /// The vector embedding of the chunk text.
    pub embedding: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The cosine similarity score (higher is more relevant).
    pub score: f32,
}
