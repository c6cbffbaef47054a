//! Grouping of a lazily produced mention stream into fixed-size batches.

use std::num::NonZeroUsize;

use async_stream::stream;
use futures_util::{Stream, StreamExt};

use tagall_core::{Batch, MentionFragment};

/// Group `fragments` into batches of `size`, preserving order.
///
/// Every batch holds exactly `size` fragments except possibly the last one,
/// which holds the remainder. Empty input yields no batches. The upstream is
/// pulled only as far as the consumer asks for batches; an upstream error is
/// yielded once and ends the stream.
pub fn batches<S, E>(fragments: S, size: NonZeroUsize) -> impl Stream<Item = Result<Batch, E>>
where
    S: Stream<Item = Result<MentionFragment, E>>,
{
    let size = size.get();
    stream! {
        let mut fragments = std::pin::pin!(fragments);
        let mut pending = Vec::with_capacity(size);
        while let Some(next) = fragments.next().await {
            match next {
                Ok(fragment) => {
                    pending.push(fragment);
                    if pending.len() == size {
                        let full = std::mem::replace(&mut pending, Vec::with_capacity(size));
                        yield Ok(Batch::from(full));
                    }
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
        if !pending.is_empty() {
            yield Ok(Batch::from(pending));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use tagall_core::MemberId;

    fn fragments(n: u64) -> Vec<MentionFragment> {
        (1..=n).map(|id| MentionFragment::for_member(MemberId(id))).collect()
    }

    async fn collect(n: u64, size: usize) -> Vec<Batch> {
        let input = stream::iter(fragments(n).into_iter().map(Ok::<_, ()>));
        batches(input, NonZeroUsize::new(size).unwrap())
            .map(|b| b.unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn twelve_by_five_is_five_five_two() {
        let sizes: Vec<usize> = collect(12, 5).await.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![5, 5, 2]);
    }

    #[tokio::test]
    async fn exact_multiple_has_no_short_tail() {
        let sizes: Vec<usize> = collect(10, 5).await.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![5, 5]);
    }

    #[tokio::test]
    async fn empty_input_yields_nothing() {
        assert!(collect(0, 5).await.is_empty());
    }

    #[tokio::test]
    async fn count_and_order_hold_for_many_shapes() {
        for n in 0..30u64 {
            for size in 1..8usize {
                let out = collect(n, size).await;
                assert_eq!(out.len(), (n as usize).div_ceil(size), "n={n} size={size}");
                for (i, batch) in out.iter().enumerate() {
                    if i + 1 < out.len() {
                        assert_eq!(batch.len(), size);
                    } else {
                        assert!((1..=size).contains(&batch.len()));
                    }
                }
                let flat: Vec<MentionFragment> =
                    out.into_iter().flat_map(Batch::into_fragments).collect();
                assert_eq!(flat, fragments(n));
            }
        }
    }

    #[tokio::test]
    async fn upstream_error_ends_the_stream() {
        let input = stream::iter(vec![
            Ok(MentionFragment::for_member(MemberId(1))),
            Ok(MentionFragment::for_member(MemberId(2))),
            Err("boom"),
            Ok(MentionFragment::for_member(MemberId(3))),
        ]);
        let out: Vec<Result<Batch, &str>> =
            batches(input, NonZeroUsize::new(2).unwrap()).collect().await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].as_ref().unwrap().len(), 2);
        assert_eq!(out[1], Err("boom"));
    }

    #[tokio::test]
    async fn upstream_is_pulled_lazily() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulled);
        let input = stream::iter(fragments(100)).map(move |f| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(f)
        });
        let mut out = std::pin::pin!(batches(input, NonZeroUsize::new(5).unwrap()));
        let first = out.next().await.unwrap().unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(pulled.load(Ordering::SeqCst), 5);
    }
}
