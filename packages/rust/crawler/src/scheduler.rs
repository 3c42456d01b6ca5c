//! Bounded-concurrency map over a list of items.
//!
//! `min(limit, len)` tokio tasks pull indices from one shared atomic cursor,
//! so no item is processed twice and no worker idles while work remains.
//! Each worker hands back `(index, result)` pairs which are slotted into a
//! pre-sized vector: output position `i` is always input item `i`.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::task::JoinSet;
use tracing::{debug, instrument};

use gradiomd_shared::{GradioMdError, Result};

/// Apply `mapper` to every item with at most `limit` calls in flight.
///
/// The first error fails the whole call. Workers stop claiming new items as
/// soon as any item fails, and tasks still running are aborted; their
/// results are never returned.
#[instrument(skip_all, fields(items = items.len(), limit = limit))]
pub async fn map_with_concurrency<T, R, F, Fut>(
    items: Vec<T>,
    limit: usize,
    mapper: F,
) -> Result<Vec<R>>
where
    T: Clone + Send + Sync + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    let total = items.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let worker_count = limit.max(1).min(total);
    debug!(worker_count, total, "starting workers");

    let items = Arc::new(items);
    let mapper = Arc::new(mapper);
    let cursor = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicBool::new(false));

    let mut join_set = JoinSet::new();
    for _ in 0..worker_count {
        let items = Arc::clone(&items);
        let mapper = Arc::clone(&mapper);
        let cursor = Arc::clone(&cursor);
        let failed = Arc::clone(&failed);

        join_set.spawn(async move {
            let mut produced = Vec::new();
            while !failed.load(Ordering::Acquire) {
                let index = cursor.fetch_add(1, Ordering::AcqRel);
                let Some(item) = items.get(index) else {
                    break;
                };
                match (*mapper)(item.clone()).await {
                    Ok(result) => produced.push((index, result)),
                    Err(e) => {
                        failed.store(true, Ordering::Release);
                        return Err(e);
                    }
                }
            }
            Ok(produced)
        });
    }

    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(total).collect();

    while let Some(joined) = join_set.join_next().await {
        let produced = match joined {
            Ok(Ok(produced)) => produced,
            Ok(Err(e)) => {
                join_set.abort_all();
                return Err(e);
            }
            Err(e) => {
                join_set.abort_all();
                return Err(GradioMdError::Scheduler(format!("worker task failed: {e}")));
            }
        };
        for (index, result) in produced {
            slots[index] = Some(result);
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| GradioMdError::Scheduler(format!("no result for item {index}")))
        })
        .collect()
}
