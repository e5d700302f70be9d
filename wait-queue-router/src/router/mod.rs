//! Delayed-retry routing for SQS batches
//!
//! Messages whose declared delay has not elapsed are parked on a holding
//! queue, and every batch is summarised into a partial failure report.

pub mod aggregator;
pub mod coordinator;
pub mod delay;
pub mod error;
pub mod message;
pub mod requeue;

pub use aggregator::{
    BatchReport, Disposition, OutcomeAggregator, ProcessingStatus, RecordOutcome,
    ReportingStrategy,
};
pub use coordinator::BatchCoordinator;
pub use delay::{DelaySchedule, Readiness};
pub use error::{ReportError, RoutingError};
pub use message::{MessageView, RoutingPayload};
pub use requeue::{RequeueAction, RequeueRouter};

#[cfg(test)]
pub(crate) mod test_support;
