//! Property tests for whitespace chunking.

use proptest::prelude::*;
use studynote_rag::{Chunk, Chunker, WhitespaceChunker};

/// Text made of short words separated by assorted whitespace runs.
fn arb_text() -> impl Strategy<Value = String> {
    let word = "[a-zé]{1,12}";
    let separator = prop_oneof![Just(" "), Just("  "), Just("\n"), Just("\t "), Just("\n\n")];
    (
        prop_oneof![Just(""), Just(" "), Just("\n")],
        proptest::collection::vec((word, separator), 1..60),
    )
        .prop_map(|(lead, parts)| {
            let mut text = lead.to_string();
            for (word, separator) in parts {
                text.push_str(&word);
                text.push_str(separator);
            }
            text
        })
}

/// Chunk size and an overlap strictly below it.
fn arb_sizes() -> impl Strategy<Value = (usize, usize)> {
    (5usize..80).prop_flat_map(|size| (Just(size), 0..size))
}

fn end(chunk: &Chunk) -> usize {
    chunk.start + chunk.text.len()
}

/// Rebuild the source text from chunk offsets, keeping each overlap once.
fn reconstruct(text: &str, chunks: &[Chunk]) -> String {
    let mut out = chunks[0].text.clone();
    for pair in chunks.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.start < end(prev) {
            out.push_str(&next.text[end(prev) - next.start..]);
        } else {
            out.push_str(&text[end(prev)..next.start]);
            out.push_str(&next.text);
        }
    }
    out
}

/// **Property: chunks are verbatim word-aligned slices that rebuild the text**
mod prop_chunk_reconstruction {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn chunks_rebuild_trimmed_source(text in arb_text(), (size, overlap) in arb_sizes()) {
            let chunks = WhitespaceChunker::new(size, overlap).unwrap().split(&text);
            prop_assert!(!chunks.is_empty());

            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(chunk.index, i);
                prop_assert_eq!(&text[chunk.start..end(chunk)], chunk.text.as_str());
                prop_assert_eq!(chunk.text.trim(), chunk.text.as_str());
            }

            prop_assert_eq!(reconstruct(&text, &chunks), text.trim());
        }

        #[test]
        fn chunks_respect_size_unless_single_word(text in arb_text(), (size, overlap) in arb_sizes()) {
            let chunks = WhitespaceChunker::new(size, overlap).unwrap().split(&text);
            for chunk in &chunks {
                let single_word = !chunk.text.chars().any(char::is_whitespace);
                prop_assert!(
                    chunk.text.chars().count() <= size || single_word,
                    "chunk of {} chars exceeds {}", chunk.text.chars().count(), size
                );
            }
        }

        #[test]
        fn overlap_is_bounded_and_progress_is_made(text in arb_text(), (size, overlap) in arb_sizes()) {
            let chunks = WhitespaceChunker::new(size, overlap).unwrap().split(&text);
            for pair in chunks.windows(2) {
                let (prev, next) = (&pair[0], &pair[1]);
                prop_assert!(next.start > prev.start);
                prop_assert!(end(next) > end(prev));
                if next.start < end(prev) {
                    let shared = text[next.start..end(prev)].chars().count();
                    prop_assert!(shared <= overlap, "overlap {} exceeds {}", shared, overlap);
                }
            }
        }
    }
}

#[test]
fn text_shorter_than_chunk_is_one_chunk() {
    let chunks = WhitespaceChunker::new(5000, 100).unwrap().split("Alpha Beta Gamma Delta");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Alpha Beta Gamma Delta");
}
