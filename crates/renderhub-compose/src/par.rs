//! Bounded parallel map over async mappers.

use std::future::Future;

use futures::stream::{self, StreamExt};
use tracing::warn;

use renderhub_core::result::AppResult;

/// Map `items` through an async `mapper` with at most `limit` in flight.
///
/// The result has the same length and order as the input. A mapper
/// failure produces an absent slot and a diagnostic event; the map
/// itself never fails. New starts proceed as previous items complete.
pub async fn bounded_map<T, U, F, Fut>(items: Vec<T>, limit: usize, mapper: F) -> Vec<Option<U>>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = AppResult<U>>,
{
    stream::iter(items.into_iter().enumerate().map(|(index, item)| {
        let fut = mapper(item);
        async move {
            match fut.await {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!(index, error = %err, "Mapped item failed, slot left absent");
                    None
                }
            }
        }
    }))
    .buffered(limit.max(1))
    .collect()
    .await
}
