use thiserror::Error;

/// Errors surfaced by the quiz core.
///
/// Everything here is recoverable from the caller's point of view: a failed
/// operation leaves the session (or ledger) in its prior state.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The dataset cannot back the requested round (too few columns or too
    /// few entries for the active question mode).
    #[error("malformed dataset: {0}")]
    MalformedDataset(String),

    /// Review mode was requested while the wrong book is empty. Callers
    /// should surface this as guidance, not as a failure.
    #[error("the wrong book is empty; answer some questions in normal mode first")]
    EmptyWrongBook,

    /// A progress snapshot could not be parsed. In-memory state is untouched.
    #[error("malformed progress snapshot: {0}")]
    MalformedSnapshot(String),

    /// An answer submission that the caller-facing contract should have
    /// rejected (empty text, out-of-range option position).
    #[error("invalid submission: {0}")]
    InvalidSubmission(&'static str),

    /// A transition was requested from the wrong session phase.
    #[error("invalid transition: {0}")]
    InvalidTransition(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
