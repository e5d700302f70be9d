use queue_transport::queue::QueueError;
use thiserror::Error;

/// Errors that fail a single record
#[derive(Error, Debug)]
pub enum RoutingError {
    /// The record carries no body
    #[error("Message has no body")]
    MissingBody,

    /// The body is not a JSON object
    #[error("Message body is not valid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// A required body field is absent
    #[error("Message body is missing field: {0}")]
    MissingField(&'static str),

    /// `createTimestamp` does not match the expected format
    #[error("Invalid createTimestamp {value:?}: {source}")]
    InvalidTimestamp {
        /// The rejected value
        value: String,
        /// Parse failure
        #[source]
        source: chrono::ParseError,
    },

    /// A body field has an unexpected type
    #[error("Message body field has an invalid type: {0}")]
    InvalidField(&'static str),

    /// `delay` cannot be represented as a duration
    #[error("Invalid delay: {0}")]
    InvalidDelay(f64),

    /// Resolving or sending to the holding queue failed
    #[error("Holding queue operation failed: {0}")]
    Queue(#[from] QueueError),
}

impl RoutingError {
    /// Returns true when the record itself is malformed, as opposed to a
    /// downstream failure
    #[must_use]
    pub const fn is_malformed_payload(&self) -> bool {
        !matches!(self, Self::Queue(_))
    }
}

/// Errors that prevent the batch report from being built
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReportError {
    /// A failed record has no message ID to report it by
    #[error("Failed record at position {index} has no message ID")]
    MissingMessageId {
        /// Position of the record in the batch
        index: usize,
    },
}
