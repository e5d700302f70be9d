use std::sync::Arc;

use chrono::Utc;
use futures::{stream, StreamExt};
use queue_transport::queue::{HoldingQueue, SqsEvent, SqsRecord};
use tracing::{debug, info, instrument, warn};

use super::{
    aggregator::{BatchReport, Disposition, OutcomeAggregator, RecordOutcome},
    delay::{DelaySchedule, Readiness},
    error::{ReportError, RoutingError},
    message::MessageView,
    requeue::{RequeueAction, RequeueRouter},
};
use crate::types::RouterConfig;

/// Runs every record of a batch through delay evaluation and rerouting
#[derive(Clone)]
pub struct BatchCoordinator {
    router: RequeueRouter,
    config: RouterConfig,
}

impl BatchCoordinator {
    /// Creates a new `BatchCoordinator`
    ///
    /// # Arguments
    ///
    /// * `queue` - Client used to park premature messages
    /// * `config` - Holding queue marker, reporting strategy and concurrency
    #[must_use]
    pub fn new(queue: Arc<dyn HoldingQueue>, config: RouterConfig) -> Self {
        Self {
            router: RequeueRouter::new(queue),
            config,
        }
    }

    /// Processes one delivered batch.
    ///
    /// Records are evaluated independently and a failure never stops the
    /// rest of the batch. Returns `None` when nothing has to be redelivered.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if the report itself cannot be built
    pub async fn handle_batch(&self, event: &SqsEvent) -> Result<Option<BatchReport>, ReportError> {
        info!(record_count = event.records.len(), "Received SQS records");
        debug!(records = ?event.records, "Received SQS records");

        let outcomes: Vec<RecordOutcome> = stream::iter(&event.records)
            .map(|record| self.process_record(record))
            .buffered(self.config.max_concurrent_records.max(1))
            .collect()
            .await;

        let mut aggregator = OutcomeAggregator::new(self.config.reporting_strategy);
        for outcome in outcomes {
            aggregator.record(outcome);
        }

        aggregator.finish()
    }

    /// Evaluates a single record, converting every error into a failed outcome
    #[instrument(skip_all, fields(message_id = ?record.message_id))]
    pub async fn process_record(&self, record: &SqsRecord) -> RecordOutcome {
        let disposition = match self.evaluate(record).await {
            Ok(disposition) => disposition,
            Err(e) => {
                debug!(error = %e, "Record processing failed");
                Disposition::Failed(e)
            }
        };

        let outcome = RecordOutcome {
            message_id: record.message_id.clone(),
            body: record.body.clone(),
            disposition,
        };

        info!(
            status = %outcome.status(),
            message_id = ?outcome.message_id,
            message_body = ?outcome.body,
            "Response"
        );

        if let Disposition::Relocated {
            queue_url,
            sent_message_id,
        } = &outcome.disposition
        {
            info!(%queue_url, %sent_message_id, "Message parked on wait queue");
        }

        outcome
    }

    async fn evaluate(&self, record: &SqsRecord) -> Result<Disposition, RoutingError> {
        let mut message = MessageView::new(record, &self.config.holding_queue_marker);
        let payload = message.payload()?;
        let schedule = DelaySchedule::from_payload(&payload)?;

        // Sampled per record so long batches do not drift
        let now = Utc::now().naive_utc();

        info!(
            delay = schedule.delay.num_seconds(),
            create_timestamp = %schedule.created_at,
            delayed_timestamp = ?schedule.ready_at(),
            %now,
            "Received message"
        );

        if schedule.evaluate(now) == Readiness::Ready {
            return Ok(Disposition::Processed);
        }

        warn!(message_id = ?message.message_id(), "Message evaluation result: message is premature");

        Ok(match self.router.route(&mut message, &payload).await? {
            RequeueAction::Relocated {
                queue_url,
                sent_message_id,
            } => Disposition::Relocated {
                queue_url,
                sent_message_id,
            },
            RequeueAction::RetryRequested => Disposition::RetryRequested,
        })
    }
}
