use thiserror::Error;

/// Boxed error type returned by handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The queue was closed; no further admissions are accepted.
    #[error("queue is closed")]
    Closed,
}

/// A fault raised by a handler and isolated by the dispatcher.
///
/// The entry it belongs to still completes: the error hook sees the fault
/// and the result cell is delivered with the payload's default value.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error("handler panicked: {0}")]
    Panicked(String),
}
