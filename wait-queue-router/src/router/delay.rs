//! Readiness of a delayed message

use chrono::{NaiveDateTime, TimeDelta};
use strum::Display;

use super::{error::RoutingError, message::RoutingPayload};

/// Format of the `createTimestamp` body field
pub const CREATE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether a message may be processed now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Readiness {
    /// The delay has elapsed, or there is none
    Ready,
    /// The delay has not elapsed yet
    Premature,
}

/// Decides readiness from a delay, a creation time and the current time.
///
/// A message is premature only when it has a positive delay and its ready
/// time lies strictly after `now`.
#[must_use]
pub fn evaluate(delay: TimeDelta, created_at: NaiveDateTime, now: NaiveDateTime) -> Readiness {
    if delay <= TimeDelta::zero() {
        return Readiness::Ready;
    }

    // Overflow means the ready time is beyond anything representable
    let premature = created_at
        .checked_add_signed(delay)
        .is_none_or(|ready_at| ready_at > now);

    if premature {
        Readiness::Premature
    } else {
        Readiness::Ready
    }
}

/// Converts a delay in seconds, keeping millisecond precision.
///
/// Delays too large to represent saturate; only a negative overflow is rejected.
#[allow(clippy::cast_possible_truncation)]
fn delay_from_seconds(seconds: f64) -> Option<TimeDelta> {
    if !seconds.is_finite() {
        return None;
    }
    TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)
}

/// Delay and creation time parsed from a message body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelaySchedule {
    /// Declared delay, zero when absent
    pub delay: TimeDelta,
    /// Creation time as stated by the producer
    pub created_at: NaiveDateTime,
}

impl DelaySchedule {
    /// Builds a schedule from the routing fields of a body
    ///
    /// # Errors
    ///
    /// Returns `RoutingError` if `createTimestamp` is missing or malformed,
    /// or `delay` cannot be represented
    pub fn from_payload(payload: &RoutingPayload) -> Result<Self, RoutingError> {
        let raw_timestamp = payload
            .create_timestamp
            .as_deref()
            .ok_or(RoutingError::MissingField("createTimestamp"))?;

        let created_at = NaiveDateTime::parse_from_str(raw_timestamp, CREATE_TIMESTAMP_FORMAT)
            .map_err(|source| RoutingError::InvalidTimestamp {
                value: raw_timestamp.to_string(),
                source,
            })?;

        let seconds = payload.delay.unwrap_or(0.0);
        let delay = delay_from_seconds(seconds).ok_or(RoutingError::InvalidDelay(seconds))?;

        Ok(Self { delay, created_at })
    }

    /// Earliest time the message may be processed
    #[must_use]
    pub fn ready_at(&self) -> Option<NaiveDateTime> {
        self.created_at.checked_add_signed(self.delay)
    }

    #[must_use]
    pub fn evaluate(&self, now: NaiveDateTime) -> Readiness {
        evaluate(self.delay, self.created_at, now)
    }
}
