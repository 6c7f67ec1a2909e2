//! Handler and error-hook seams.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{BoxError, HandlerError};
use crate::payload::Payload;

/// The function executed for each dispatched entry.
///
/// `name` is the entry's key, `data` the coalesced payload items in
/// admission order. The returned value is broadcast to every holder of the
/// entry's [`ResultHandle`](crate::cell::ResultHandle).
///
/// An `Err` (or a panic) is isolated by the dispatcher: the queue's error
/// hook is invoked and the result cell is delivered with `P::default()`.
#[async_trait]
pub trait Handler<P: Payload>: Send + Sync + 'static {
    async fn handle(&self, name: &P, data: &[P]) -> Result<P, BoxError>;
}

/// Plain functions work as handlers.
#[async_trait]
impl<P, F> Handler<P> for F
where
    P: Payload,
    F: Fn(&P, &[P]) -> Result<P, BoxError> + Send + Sync + 'static,
{
    async fn handle(&self, name: &P, data: &[P]) -> Result<P, BoxError> {
        (self)(name, data)
    }
}

/// Hook invoked with the entry name and the fault when a handler errors or
/// panics. Per-queue configuration, replaceable at runtime via
/// `set_error_func`.
pub type ErrorFunc<P> = Arc<dyn Fn(&P, &HandlerError) + Send + Sync>;

pub(crate) fn default_error_func<P: Payload>() -> ErrorFunc<P> {
    Arc::new(|name, error| {
        tracing::error!(name = ?name, %error, "error in queue on element");
    })
}
