#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use queue_transport::queue::{HoldingQueue, OutboundAttribute, QueueError, QueueResult, SqsRecord};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

pub const ORDERS_ARN: &str = "arn:aws:sqs:us-east-1:123456789012:orders";
pub const ORDERS_WAIT_RETRY_ARN: &str = "arn:aws:sqs:us-east-1:123456789012:orders-wait-retry";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub queue_url: String,
    pub body: String,
    pub attributes: HashMap<String, OutboundAttribute>,
}

/// Holding queue that records every send instead of calling SQS
#[derive(Debug, Default)]
pub struct RecordingQueue {
    pub sent: Mutex<Vec<SentMessage>>,
    pub unresolvable: bool,
}

impl RecordingQueue {
    pub fn failing() -> Self {
        Self {
            unresolvable: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl HoldingQueue for RecordingQueue {
    async fn resolve_queue_url(&self, queue_name: &str) -> QueueResult<String> {
        if self.unresolvable {
            return Err(QueueError::MissingQueueUrl(queue_name.to_string()));
        }
        Ok(format!(
            "https://sqs.us-east-1.amazonaws.com/123456789012/{queue_name}"
        ))
    }

    async fn send_message(
        &self,
        queue_url: &str,
        body: &str,
        attributes: &HashMap<String, OutboundAttribute>,
    ) -> QueueResult<String> {
        let mut sent = self.sent.lock().expect("lock poisoned");
        sent.push(SentMessage {
            queue_url: queue_url.to_string(),
            body: body.to_string(),
            attributes: attributes.clone(),
        });
        Ok(format!("sent-{}", sent.len()))
    }
}

pub fn record(message_id: &str, source_arn: &str, body: &str) -> SqsRecord {
    SqsRecord {
        message_id: Some(message_id.to_string()),
        body: Some(body.to_string()),
        event_source_arn: Some(source_arn.to_string()),
        event_source: Some("aws:sqs".to_string()),
        aws_region: Some("us-east-1".to_string()),
        ..SqsRecord::default()
    }
}

/// Body created now with the given delay, formatted like a producer would
pub fn body_created_now(delay: i64, wait_queue_name: Option<&str>) -> String {
    let created = chrono::Utc::now()
        .naive_utc()
        .format(crate::router::delay::CREATE_TIMESTAMP_FORMAT)
        .to_string();

    let mut body = serde_json::json!({ "createTimestamp": created, "delay": delay });
    if let Some(name) = wait_queue_name {
        body["waitQueueName"] = serde_json::Value::from(name);
    }
    body.to_string()
}

/// Layer counting the WARN and ERROR events emitted while it is installed
#[derive(Debug, Clone, Default)]
pub struct LevelCounter {
    warnings: Arc<AtomicUsize>,
    errors: Arc<AtomicUsize>,
}

impl LevelCounter {
    pub fn warnings(&self) -> usize {
        self.warnings.load(Ordering::SeqCst)
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for LevelCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        match *event.metadata().level() {
            Level::WARN => {
                self.warnings.fetch_add(1, Ordering::SeqCst);
            }
            Level::ERROR => {
                self.errors.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }
    }
}
