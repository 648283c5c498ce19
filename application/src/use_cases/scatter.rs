//! Exception-isolated scatter/gather.
//!
//! All futures are polled together on the calling task, so a stage's
//! provider calls overlap at every network boundary without spawning.
//! Each future is wrapped in `catch_unwind`: a panic in one member becomes
//! that slot's [`GatherFailure`] and the siblings keep running.

use futures::FutureExt;
use futures::future::join_all;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use thiserror::Error;

/// A gathered future that did not produce a value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatherFailure {
    #[error("task panicked: {0}")]
    Panicked(String),
}

impl GatherFailure {
    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        GatherFailure::Panicked(message)
    }
}

/// Run every future concurrently and collect one result per input, in input order.
pub async fn scatter_gather<I, F, T>(futures: I) -> Vec<Result<T, GatherFailure>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = T>,
{
    join_all(
        futures
            .into_iter()
            .map(|fut| AssertUnwindSafe(fut).catch_unwind()),
    )
    .await
    .into_iter()
    .map(|slot| slot.map_err(GatherFailure::from_panic))
    .collect()
}
