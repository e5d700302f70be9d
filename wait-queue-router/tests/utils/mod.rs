#![allow(unused_imports, dead_code)]

pub mod sqs_setup;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use queue_transport::queue::{HoldingQueue, OutboundAttribute, QueueResult, SqsEvent};
use wait_queue_router::router::BatchCoordinator;
use wait_queue_router::types::RouterConfig;

pub const ORDERS_ARN: &str = "arn:aws:sqs:us-east-1:123456789012:orders";
pub const ORDERS_WAIT_RETRY_ARN: &str = "arn:aws:sqs:us-east-1:123456789012:orders-wait-retry";

/// Setup test environment variables and tracing
pub fn setup_test_env() {
    dotenvy::from_path(".env.example").ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// A message sent to the in-memory holding queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub queue_name: String,
    pub body: String,
    pub attributes: HashMap<String, OutboundAttribute>,
}

/// In-memory holding queue that resolves `name` to `memory://name`
#[derive(Debug, Default)]
pub struct InMemoryQueue {
    sent: Mutex<Vec<SentMessage>>,
}

impl InMemoryQueue {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl HoldingQueue for InMemoryQueue {
    async fn resolve_queue_url(&self, queue_name: &str) -> QueueResult<String> {
        Ok(format!("memory://{queue_name}"))
    }

    async fn send_message(
        &self,
        queue_url: &str,
        body: &str,
        attributes: &HashMap<String, OutboundAttribute>,
    ) -> QueueResult<String> {
        let mut sent = self.sent.lock().expect("lock poisoned");
        sent.push(SentMessage {
            queue_name: queue_url.trim_start_matches("memory://").to_string(),
            body: body.to_string(),
            attributes: attributes.clone(),
        });
        Ok(format!("hop-{}", sent.len()))
    }
}

/// Coordinator wired to an in-memory holding queue
pub struct TestContext {
    pub queue: Arc<InMemoryQueue>,
    pub coordinator: BatchCoordinator,
}

impl TestContext {
    pub fn new() -> Self {
        setup_test_env();

        let queue = Arc::new(InMemoryQueue::default());
        let coordinator = BatchCoordinator::new(queue.clone(), RouterConfig::default());

        Self { queue, coordinator }
    }
}

/// Current UTC time in the producer timestamp format
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Builds a Lambda SQS event from `(message_id, source_arn, body)` triples
pub fn sqs_event(records: &[(&str, &str, serde_json::Value)]) -> SqsEvent {
    let records: Vec<serde_json::Value> = records
        .iter()
        .map(|(message_id, source_arn, body)| {
            serde_json::json!({
                "messageId": message_id,
                "receiptHandle": format!("handle-{message_id}"),
                "body": body.to_string(),
                "attributes": {"ApproximateReceiveCount": "1"},
                "messageAttributes": {},
                "eventSource": "aws:sqs",
                "eventSourceARN": source_arn,
                "awsRegion": "us-east-1"
            })
        })
        .collect();

    serde_json::from_value(serde_json::json!({ "Records": records })).expect("valid SQS event")
}
