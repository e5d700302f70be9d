//! Read/write view over an incoming SQS record

use std::collections::HashMap;

use queue_transport::queue::{OutboundAttribute, SqsRecord};
use serde::Deserialize;

use super::error::RoutingError;

/// Substring in a queue name identifying a holding queue
pub const DEFAULT_HOLDING_QUEUE_MARKER: &str = "-wait-";
/// Attribute naming the queue a message was first delivered to
pub const ORIGIN_QUEUE_ARN_ATTRIBUTE: &str = "originQueueARN";
/// Attribute naming the message ID of the first delivery
pub const ORIGIN_MESSAGE_ID_ATTRIBUTE: &str = "originMessageId";

/// Fields of the message body used for routing
///
/// Other fields are ignored; the body is always resent untouched.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoutingPayload {
    /// Creation time, `YYYY-MM-DD HH:MM:SS`
    pub create_timestamp: Option<String>,
    /// Seconds to wait after creation before processing, may be fractional
    pub delay: Option<f64>,
    /// Holding queue for premature deliveries, only read when rerouting
    pub wait_queue_name: Option<serde_json::Value>,
}

/// Wraps a raw record and keeps provenance attributes in a local map
/// until the message is resent.
#[derive(Debug, Clone)]
pub struct MessageView<'a> {
    record: &'a SqsRecord,
    holding_queue_marker: &'a str,
    attributes: HashMap<String, OutboundAttribute>,
}

impl<'a> MessageView<'a> {
    #[must_use]
    pub fn new(record: &'a SqsRecord, holding_queue_marker: &'a str) -> Self {
        Self {
            record,
            holding_queue_marker,
            attributes: HashMap::new(),
        }
    }

    #[must_use]
    pub fn message_id(&self) -> Option<&'a str> {
        self.record.message_id.as_deref()
    }

    #[must_use]
    pub fn body(&self) -> Option<&'a str> {
        self.record.body.as_deref()
    }

    /// ARN of the queue that delivered this message
    #[must_use]
    pub fn source_arn(&self) -> &'a str {
        self.record.event_source_arn.as_deref().unwrap_or_default()
    }

    /// Last segment of the source ARN (or URL)
    #[must_use]
    pub fn queue_name(&self) -> &'a str {
        self.source_arn()
            .rsplit([':', '/'])
            .next()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_from_holding_queue(&self) -> bool {
        !self.holding_queue_marker.is_empty()
            && self.queue_name().contains(self.holding_queue_marker)
    }

    /// Queue this unit of work was first delivered to
    #[must_use]
    pub fn origin_queue_arn(&self) -> &str {
        self.attribute(ORIGIN_QUEUE_ARN_ATTRIBUTE)
            .unwrap_or_else(|| self.source_arn())
    }

    /// Message ID of the first delivery of this unit of work
    #[must_use]
    pub fn origin_message_id(&self) -> Option<&str> {
        self.attribute(ORIGIN_MESSAGE_ID_ATTRIBUTE)
            .or_else(|| self.message_id())
    }

    pub fn set_origin_queue_arn(&mut self, queue_arn: impl Into<String>) {
        self.attributes.insert(
            ORIGIN_QUEUE_ARN_ATTRIBUTE.to_string(),
            OutboundAttribute::string(queue_arn),
        );
    }

    pub fn set_origin_message_id(&mut self, message_id: impl Into<String>) {
        self.attributes.insert(
            ORIGIN_MESSAGE_ID_ATTRIBUTE.to_string(),
            OutboundAttribute::string(message_id),
        );
    }

    /// Pins both provenance attributes to their current values, keeping any
    /// provenance the record already carries.
    pub fn tag_provenance(&mut self) {
        let origin_queue_arn = self.origin_queue_arn().to_string();
        self.set_origin_queue_arn(origin_queue_arn);

        if let Some(origin_message_id) = self.origin_message_id().map(ToString::to_string) {
            self.set_origin_message_id(origin_message_id);
        }
    }

    /// Attributes to attach when the message is resent
    #[must_use]
    pub const fn outbound_attributes(&self) -> &HashMap<String, OutboundAttribute> {
        &self.attributes
    }

    /// Parses the routing fields out of the body
    ///
    /// # Errors
    ///
    /// Returns `RoutingError` if the body is absent or not a JSON object
    pub fn payload(&self) -> Result<RoutingPayload, RoutingError> {
        let body = self.body().ok_or(RoutingError::MissingBody)?;
        Ok(serde_json::from_str(body)?)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(|attribute| attribute.string_value.as_str())
            .or_else(|| {
                self.record
                    .message_attributes
                    .get(name)
                    .and_then(|attribute| attribute.string_value.as_deref())
            })
    }
}
