//! Queue transport for the wait-queue router
//!
//! This crate provides the SQS event shapes delivered to the router Lambda,
//! the partial batch response it returns, and the outbound SQS operations
//! used to park premature messages on a holding queue.

pub mod queue;
