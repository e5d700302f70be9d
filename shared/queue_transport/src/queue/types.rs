use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// SQS event delivered to a Lambda function
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SqsEvent {
    /// Records in delivery order
    #[serde(rename = "Records", default)]
    pub records: Vec<SqsRecord>,
}

/// A single SQS message as delivered inside an [`SqsEvent`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SqsRecord {
    /// Message ID, unique per delivery attempt
    pub message_id: Option<String>,
    /// Receipt handle of this delivery
    pub receipt_handle: Option<String>,
    /// Raw message body
    pub body: Option<String>,
    /// MD5 digest of the body
    pub md5_of_body: Option<String>,
    /// MD5 digest of the message attributes
    pub md5_of_message_attributes: Option<String>,
    /// SQS system attributes
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    /// User defined message attributes
    #[serde(default)]
    pub message_attributes: HashMap<String, SqsMessageAttribute>,
    /// ARN of the queue that delivered this message
    #[serde(rename = "eventSourceARN")]
    pub event_source_arn: Option<String>,
    /// Event source, always `aws:sqs`
    pub event_source: Option<String>,
    /// Region of the source queue
    pub aws_region: Option<String>,
}

/// A user defined attribute on an incoming SQS message
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SqsMessageAttribute {
    /// String value, set for `String` and `Number` data types
    pub string_value: Option<String>,
    /// Base64 encoded binary value
    pub binary_value: Option<String>,
    /// Reserved by SQS
    #[serde(default)]
    pub string_list_values: Vec<String>,
    /// Reserved by SQS
    #[serde(default)]
    pub binary_list_values: Vec<String>,
    /// Attribute data type
    pub data_type: Option<String>,
}

/// A message attribute to attach to an outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundAttribute {
    /// Attribute data type (`String`, `Number`)
    pub data_type: String,
    /// Attribute value
    pub string_value: String,
}

impl OutboundAttribute {
    /// Creates a `String` typed attribute
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: "String".to_string(),
            string_value: value.into(),
        }
    }
}

/// A message the invoking runtime should redeliver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemFailure {
    /// Message ID of the failed record
    pub item_identifier: String,
}

/// Partial batch response returned to Lambda
///
/// Any message listed is redelivered by SQS, everything else in the batch
/// is deleted from the source queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SqsBatchResponse {
    /// Messages to be redelivered
    pub batch_item_failures: Vec<BatchItemFailure>,
}

impl SqsBatchResponse {
    /// Builds a response naming the given message IDs as failed
    #[must_use]
    pub fn from_failed_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            batch_item_failures: ids
                .into_iter()
                .map(|item_identifier| BatchItemFailure { item_identifier })
                .collect(),
        }
    }
}
