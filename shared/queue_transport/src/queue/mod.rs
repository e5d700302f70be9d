//! Queue operations for the wait-queue router
//!
//! This module provides the Lambda SQS event types and the holding queue
//! client used to resend premature messages.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Error types for queue operations
pub mod error;
/// Holding queue client backed by SQS
pub mod sqs_queue;
/// Common types for queue operations
pub mod types;

pub use error::{QueueError, QueueResult};
pub use sqs_queue::{HoldingQueue, SqsHoldingQueue};
pub use types::{
    BatchItemFailure, OutboundAttribute, SqsBatchResponse, SqsEvent, SqsMessageAttribute,
    SqsRecord,
};
