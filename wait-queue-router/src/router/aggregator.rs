//! Batch outcome aggregation
//!
//! Collects one outcome per record and turns the failures into the partial
//! batch report handed back to Lambda.

use queue_transport::queue::SqsBatchResponse;
use strum::{Display, EnumString};
use tracing::{error, warn};

use super::error::{ReportError, RoutingError};

/// Status reported for a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ProcessingStatus {
    /// Ready and processed
    Processed,
    /// Premature; relocated or left for redelivery
    PartiallyProcessed,
    /// Could not be evaluated
    Failed,
}

/// Result of evaluating a single record
#[derive(Debug)]
pub enum Disposition {
    /// The record was ready
    Processed,
    /// The record was premature and has been resent to its holding queue
    Relocated {
        /// URL of the holding queue
        queue_url: String,
        /// ID of the resent message
        sent_message_id: String,
    },
    /// The record is premature and already on its holding queue
    RetryRequested,
    /// The record could not be evaluated or relocated
    Failed(RoutingError),
}

impl Disposition {
    #[must_use]
    pub const fn status(&self) -> ProcessingStatus {
        match self {
            Self::Processed => ProcessingStatus::Processed,
            Self::Relocated { .. } | Self::RetryRequested => ProcessingStatus::PartiallyProcessed,
            Self::Failed(_) => ProcessingStatus::Failed,
        }
    }

    /// Whether SQS has to deliver the record again
    #[must_use]
    pub const fn requires_redelivery(&self) -> bool {
        matches!(self, Self::RetryRequested | Self::Failed(_))
    }
}

/// Outcome of one record in a batch
#[derive(Debug)]
pub struct RecordOutcome {
    pub message_id: Option<String>,
    pub body: Option<String>,
    pub disposition: Disposition,
}

impl RecordOutcome {
    #[must_use]
    pub const fn status(&self) -> ProcessingStatus {
        self.disposition.status()
    }
}

/// How failures are logged once a batch completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ReportingStrategy {
    /// One log line per failure (a warning for records left for redelivery,
    /// an error for failed records), except when the whole batch failed,
    /// which is logged as a single aggregated warning
    #[default]
    Silent,
    /// One log line per failure, always
    PerMessage,
}

/// Message IDs SQS must deliver again
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub failed_message_ids: Vec<String>,
}

impl From<BatchReport> for SqsBatchResponse {
    fn from(report: BatchReport) -> Self {
        Self::from_failed_ids(report.failed_message_ids)
    }
}

/// A log line emitted for the failures of one batch
#[derive(Debug)]
enum FailureObservation<'a> {
    /// Every record failed
    EntireBatch(Vec<&'a RecordOutcome>),
    Single(&'a RecordOutcome),
}

/// Collects the outcomes of one batch
#[derive(Debug, Default)]
pub struct OutcomeAggregator {
    strategy: ReportingStrategy,
    outcomes: Vec<RecordOutcome>,
}

impl OutcomeAggregator {
    #[must_use]
    pub const fn new(strategy: ReportingStrategy) -> Self {
        Self {
            strategy,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: RecordOutcome) {
        self.outcomes.push(outcome);
    }

    fn failures(&self) -> impl Iterator<Item = (usize, &RecordOutcome)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter(|(_, outcome)| outcome.disposition.requires_redelivery())
    }

    fn observations(&self) -> Vec<FailureObservation<'_>> {
        let failures: Vec<&RecordOutcome> = self.failures().map(|(_, outcome)| outcome).collect();

        if self.strategy == ReportingStrategy::Silent
            && !failures.is_empty()
            && failures.len() == self.outcomes.len()
        {
            return vec![FailureObservation::EntireBatch(failures)];
        }

        failures.into_iter().map(FailureObservation::Single).collect()
    }

    /// Builds the batch report.
    ///
    /// Returns `None` when no record needs to be redelivered.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if a record to redeliver has no message ID
    pub fn finish(self) -> Result<Option<BatchReport>, ReportError> {
        let failed_message_ids = self
            .failures()
            .map(|(index, outcome)| {
                outcome
                    .message_id
                    .clone()
                    .ok_or(ReportError::MissingMessageId { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if failed_message_ids.is_empty() {
            return Ok(None);
        }

        for observation in self.observations() {
            emit(&observation);
        }

        Ok(Some(BatchReport { failed_message_ids }))
    }
}

fn emit(observation: &FailureObservation<'_>) {
    match observation {
        FailureObservation::EntireBatch(failures) => {
            let errors: Vec<String> = failures.iter().map(|outcome| describe(outcome)).collect();
            warn!(
                count = failures.len(),
                ?errors,
                "All ({}) records failed processing",
                failures.len()
            );
        }
        FailureObservation::Single(outcome) => match &outcome.disposition {
            Disposition::Failed(e) if e.is_malformed_payload() => error!(
                message_id = ?outcome.message_id,
                body = ?outcome.body,
                error = %e,
                "Record has a malformed payload"
            ),
            Disposition::Failed(e) => error!(
                message_id = ?outcome.message_id,
                error = %e,
                "Record could not be relocated"
            ),
            _ => warn!(
                message_id = ?outcome.message_id,
                "Record cannot be processed yet"
            ),
        },
    }
}

fn describe(outcome: &RecordOutcome) -> String {
    let message_id = outcome.message_id.as_deref().unwrap_or("<unknown>");
    match &outcome.disposition {
        Disposition::Failed(e) => format!("{message_id}: {e}"),
        _ => format!("{message_id}: cannot be processed yet"),
    }
}
