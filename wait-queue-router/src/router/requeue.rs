//! Rerouting of premature messages

use std::sync::Arc;

use queue_transport::queue::HoldingQueue;
use tracing::{info, instrument, warn};

use super::{error::RoutingError, message::MessageView, message::RoutingPayload};

/// What the router did with a premature message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequeueAction {
    /// Resent to the holding queue
    Relocated {
        /// URL the message was sent to
        queue_url: String,
        /// ID SQS assigned to the resent message
        sent_message_id: String,
    },
    /// Already on the holding queue; left for SQS to redeliver
    RetryRequested,
}

/// Parks premature messages on their holding queue
#[derive(Clone)]
pub struct RequeueRouter {
    queue: Arc<dyn HoldingQueue>,
}

impl RequeueRouter {
    #[must_use]
    pub fn new(queue: Arc<dyn HoldingQueue>) -> Self {
        Self { queue }
    }

    /// Routes a premature message.
    ///
    /// A message delivered by a holding queue is never resent; it is left to
    /// the holding queue's own redelivery. Any other message is tagged with
    /// its provenance and sent once to the queue named by `waitQueueName`.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError` if `waitQueueName` is missing or not a string,
    /// or the holding queue cannot be resolved or sent to
    #[instrument(skip_all, fields(message_id = ?message.message_id()))]
    pub async fn route(
        &self,
        message: &mut MessageView<'_>,
        payload: &RoutingPayload,
    ) -> Result<RequeueAction, RoutingError> {
        info!(
            origin_queue_arn = message.origin_queue_arn(),
            "Handling premature message"
        );

        if message.is_from_holding_queue() {
            warn!(
                origin_message_id = ?message.origin_message_id(),
                queue = message.queue_name(),
                "Message is still in wait condition, it will stay on the wait queue"
            );
            return Ok(RequeueAction::RetryRequested);
        }

        let wait_queue_name = payload
            .wait_queue_name
            .as_ref()
            .ok_or(RoutingError::MissingField("waitQueueName"))?
            .as_str()
            .ok_or(RoutingError::InvalidField("waitQueueName"))?;
        let body = message.body().ok_or(RoutingError::MissingBody)?;

        info!(
            wait_queue_name,
            "Message is premature and will be re-routed to the wait queue"
        );

        message.tag_provenance();

        let queue_url = self.queue.resolve_queue_url(wait_queue_name).await?;
        let sent_message_id = self
            .queue
            .send_message(&queue_url, body, message.outbound_attributes())
            .await?;

        Ok(RequeueAction::Relocated {
            queue_url,
            sent_message_id,
        })
    }
}
