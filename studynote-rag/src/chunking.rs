//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`WhitespaceChunker`], which
//! packs whole words into chunks of a bounded character count and carries a
//! word-aligned overlap from one chunk into the next.

use tracing::warn;

use crate::document::Chunk;
use crate::error::{RagError, Result};

/// A strategy for splitting document text into chunks.
///
/// Implementations produce [`Chunk`]s in document order. Embeddings are
/// attached later by the indexer.
pub trait Chunker: Send + Sync {
    /// Split text into chunks.
    ///
    /// Returns an empty `Vec` if the text is empty or whitespace-only.
    fn split(&self, text: &str) -> Vec<Chunk>;
}

/// Splits text on whitespace boundaries, never inside a word.
///
/// Each chunk is a verbatim slice of the source running from the start of its
/// first word to the end of its last word, and holds at most `chunk_size`
/// characters. The next chunk starts with the trailing words of the previous
/// one whose combined span is at most `chunk_overlap` characters. A single
/// word longer than `chunk_size` is emitted as its own oversized chunk.
///
/// # Example
///
/// ```rust
/// use studynote_rag::{Chunker, WhitespaceChunker};
///
/// let chunker = WhitespaceChunker::new(10, 4).unwrap();
/// let chunks = chunker.split("aa bb cc dd ee ff");
/// let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
/// assert_eq!(texts, ["aa bb cc", "cc dd ee", "ee ff"]);
/// ```
#[derive(Debug, Clone)]
pub struct WhitespaceChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl WhitespaceChunker {
    /// Create a new `WhitespaceChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Chunking`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Chunking("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::Chunking(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }

}

/// A word's position in the source, in bytes (for slicing) and in
/// characters (for measuring).
#[derive(Debug, Clone, Copy)]
struct Word {
    byte_start: usize,
    byte_end: usize,
    char_start: usize,
    char_end: usize,
}

fn words(text: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    let mut char_pos = 0;

    for (byte_pos, c) in text.char_indices() {
        match (c.is_whitespace(), current) {
            (false, None) => current = Some((byte_pos, char_pos)),
            (true, Some((byte_start, char_start))) => {
                words.push(Word { byte_start, byte_end: byte_pos, char_start, char_end: char_pos });
                current = None;
            }
            _ => {}
        }
        char_pos += 1;
    }

    if let Some((byte_start, char_start)) = current {
        words.push(Word { byte_start, byte_end: text.len(), char_start, char_end: char_pos });
    }

    words
}

/// Character length of the source slice covering words `first..=last`.
fn span(words: &[Word], first: usize, last: usize) -> usize {
    words[last].char_end - words[first].char_start
}

impl Chunker for WhitespaceChunker {
    fn split(&self, text: &str) -> Vec<Chunk> {
        let words = words(text);
        if words.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut first = 0;

        loop {
            let mut last = first;
            while last + 1 < words.len() && span(&words, first, last + 1) <= self.chunk_size {
                last += 1;
            }

            let length = span(&words, first, last);
            if length > self.chunk_size {
                warn!(chunk_size = self.chunk_size, length, "word longer than chunk size");
            }

            let start = words[first].byte_start;
            chunks.push(Chunk {
                index: chunks.len(),
                start,
                text: text[start..words[last].byte_end].to_string(),
            });

            let next = last + 1;
            if next == words.len() {
                break;
            }

            // Walk back over trailing words that fit in the overlap, keeping
            // at least one word of progress.
            let mut resume = next;
            while resume - 1 > first && span(&words, resume - 1, last) <= self.chunk_overlap {
                resume -= 1;
            }
            // The resumed chunk must still have room for the next new word.
            while resume < next && span(&words, resume, next) > self.chunk_size {
                resume += 1;
            }
            first = resume;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn empty_and_blank_text_yield_no_chunks() {
        let chunker = WhitespaceChunker::new(100, 10).unwrap();
        assert!(chunker.split("").is_empty());
        assert!(chunker.split(" \n\t ").is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunker = WhitespaceChunker::new(5000, 100).unwrap();
        let chunks = chunker.split("Alpha Beta Gamma");
        assert_eq!(texts(&chunks), ["Alpha Beta Gamma"]);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].start, 0);
    }

    #[test]
    fn edge_whitespace_is_trimmed() {
        let chunker = WhitespaceChunker::new(100, 10).unwrap();
        let chunks = chunker.split("\n  Alpha  Beta \n");
        assert_eq!(texts(&chunks), ["Alpha  Beta"]);
        assert_eq!(chunks[0].start, 3);
    }

    #[test]
    fn overlap_carries_trailing_words() {
        let chunker = WhitespaceChunker::new(10, 4).unwrap();
        let chunks = chunker.split("aa bb cc dd ee ff");
        assert_eq!(texts(&chunks), ["aa bb cc", "cc dd ee", "ee ff"]);
        let indexes: Vec<_> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indexes, [0, 1, 2]);
    }

    #[test]
    fn zero_overlap_partitions_words() {
        let chunker = WhitespaceChunker::new(5, 0).unwrap();
        let chunks = chunker.split("aa bb cc dd");
        assert_eq!(texts(&chunks), ["aa bb", "cc dd"]);
    }

    #[test]
    fn oversized_word_gets_its_own_chunk() {
        let chunker = WhitespaceChunker::new(4, 1).unwrap();
        let chunks = chunker.split("ab abcdefgh cd");
        assert_eq!(texts(&chunks), ["ab", "abcdefgh", "cd"]);
    }

    #[test]
    fn sizes_are_counted_in_characters() {
        let chunker = WhitespaceChunker::new(5, 0).unwrap();
        let chunks = chunker.split("été où");
        assert_eq!(texts(&chunks), ["été", "où"]);
        assert_eq!(chunks[1].start, "été ".len());
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(WhitespaceChunker::new(0, 0).is_err());
        assert!(WhitespaceChunker::new(10, 10).is_err());
    }
}
