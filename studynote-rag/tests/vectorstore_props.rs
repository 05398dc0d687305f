//! Property tests for vector store search ordering and sampling.

use proptest::prelude::*;
use studynote_rag::{Chunk, EmbeddedChunk, InMemoryVectorStore, LocalVectorStore, VectorStore};

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate records numbered in insertion order.
fn arb_records(dim: usize) -> impl Strategy<Value = Vec<EmbeddedChunk>> {
    proptest::collection::vec(("[a-z ]{5,30}", arb_normalized_embedding(dim)), 1..20).prop_map(
        |items| {
            items
                .into_iter()
                .enumerate()
                .map(|(index, (text, embedding))| EmbeddedChunk {
                    chunk: Chunk { index, start: index * 100, text },
                    embedding,
                })
                .collect()
        },
    )
}

/// *For any* set of records stored in an InMemoryVectorStore, searching with
/// a query embedding SHALL return results ordered by descending cosine
/// similarity, at most `top_k` of them, and every record when `top_k`
/// covers the store.
mod prop_inmemory_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_top_k(
            records in arb_records(DIM),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let results = rt.block_on(async {
                let store = InMemoryVectorStore::new(DIM);
                store.append(&records).await.unwrap();
                store.search(&query, top_k).await.unwrap()
            });

            prop_assert!(results.len() <= top_k);
            prop_assert_eq!(results.len(), top_k.min(records.len()));

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
                if window[0].score == window[1].score {
                    prop_assert!(window[0].chunk.index < window[1].chunk.index);
                }
            }
        }
    }
}

/// *For any* records appended to a LocalVectorStore in batches, `sample(n)`
/// SHALL return the first `n` chunks in insertion order, also after the
/// store is reopened from disk.
mod prop_local_sample_round_trip {
    use super::*;

    const DIM: usize = 8;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(30))]

        #[test]
        fn sample_returns_insertion_order_after_reopen(
            records in arb_records(DIM),
            split in 0usize..20,
            n in 0usize..25,
        ) {
            let dir = tempfile::tempdir().unwrap();
            let rt = tokio::runtime::Runtime::new().unwrap();
            let sampled = rt.block_on(async {
                let store = LocalVectorStore::open(dir.path(), DIM).await.unwrap();
                let (head, tail) = records.split_at(split.min(records.len()));
                store.append(head).await.unwrap();
                store.append(tail).await.unwrap();
                drop(store);

                let reopened = LocalVectorStore::open(dir.path(), DIM).await.unwrap();
                reopened.sample(n).await.unwrap()
            });

            let expected: Vec<Chunk> = records.iter().take(n).map(|r| r.chunk.clone()).collect();
            prop_assert_eq!(sampled, expected);
        }
    }
}

#[tokio::test]
async fn query_with_wrong_dimension_is_rejected() {
    let store = InMemoryVectorStore::new(3);
    assert!(store.search(&[1.0, 0.0], 1).await.is_err());
}
