//! Holding queue client
//!
//! Resolves holding queue names to URLs and resends premature messages
//! with their provenance attributes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_sqs::types::MessageAttributeValue;
use aws_sdk_sqs::Client as SqsClient;

use crate::queue::{
    error::{QueueError, QueueResult},
    types::OutboundAttribute,
};

/// Outbound queue operations needed to park a message on a holding queue
#[async_trait]
pub trait HoldingQueue: Send + Sync {
    /// Resolves a queue name to the URL messages are sent to
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the lookup fails or yields no URL
    async fn resolve_queue_url(&self, queue_name: &str) -> QueueResult<String>;

    /// Sends a message with the given attributes
    ///
    /// # Returns
    ///
    /// The message ID if successful or an empty string
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the send operation fails
    async fn send_message(
        &self,
        queue_url: &str,
        body: &str,
        attributes: &HashMap<String, OutboundAttribute>,
    ) -> QueueResult<String>;
}

/// [`HoldingQueue`] backed by AWS SQS
#[derive(Debug, Clone)]
pub struct SqsHoldingQueue {
    sqs_client: Arc<SqsClient>,
}

impl SqsHoldingQueue {
    /// Creates a new holding queue client
    ///
    /// # Arguments
    ///
    /// * `sqs_client` - Pre-configured SQS client
    #[must_use]
    pub const fn new(sqs_client: Arc<SqsClient>) -> Self {
        Self { sqs_client }
    }

    fn to_sqs_attributes(
        attributes: &HashMap<String, OutboundAttribute>,
    ) -> QueueResult<HashMap<String, MessageAttributeValue>> {
        attributes
            .iter()
            .map(|(name, attribute)| {
                let value = MessageAttributeValue::builder()
                    .data_type(&attribute.data_type)
                    .string_value(&attribute.string_value)
                    .build()
                    .map_err(|e| QueueError::InvalidAttribute(format!("{name}: {e}")))?;
                Ok((name.clone(), value))
            })
            .collect()
    }
}

#[async_trait]
impl HoldingQueue for SqsHoldingQueue {
    async fn resolve_queue_url(&self, queue_name: &str) -> QueueResult<String> {
        let result = self
            .sqs_client
            .get_queue_url()
            .queue_name(queue_name)
            .send()
            .await?;

        result
            .queue_url()
            .map(std::string::ToString::to_string)
            .ok_or_else(|| QueueError::MissingQueueUrl(queue_name.to_string()))
    }

    async fn send_message(
        &self,
        queue_url: &str,
        body: &str,
        attributes: &HashMap<String, OutboundAttribute>,
    ) -> QueueResult<String> {
        let message_attributes = Self::to_sqs_attributes(attributes)?;

        let result = self
            .sqs_client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .set_message_attributes(
                (!message_attributes.is_empty()).then_some(message_attributes),
            )
            .send()
            .await?;

        tracing::debug!(queue_url, "Sent message to holding queue");

        Ok(result
            .message_id()
            .map(std::string::ToString::to_string)
            .unwrap_or_default())
    }
}
