//! Queue test setup utilities

#![allow(dead_code)]

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_sqs::Client as SqsClient;
use std::sync::Arc;
use uuid::Uuid;

/// Test context that provides an SQS client and a source/holding queue pair
pub struct SqsSetup {
    pub sqs_client: Arc<SqsClient>,
    pub source_queue_name: String,
    pub source_queue_url: String,
    pub wait_queue_name: String,
    pub wait_queue_url: String,
}

impl SqsSetup {
    /// Creates uniquely named source and holding queues on `LocalStack`
    pub async fn new(prefix: &str) -> Self {
        // Setup LocalStack client with hardcoded credentials for CI
        let credentials = Credentials::from_keys(
            "test", // AWS_ACCESS_KEY_ID
            "test", // AWS_SECRET_ACCESS_KEY
            None,   // no session token
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url("http://localhost:4566")
            .region(aws_config::Region::new("us-east-1"))
            .credentials_provider(credentials)
            .load()
            .await;

        let sqs_client = Arc::new(SqsClient::new(&config));

        let suffix = Uuid::new_v4().simple().to_string();
        let source_queue_name = format!("{prefix}-{suffix}");
        let wait_queue_name = format!("{prefix}-wait-{suffix}");

        let source_queue_url = Self::create_queue(&sqs_client, &source_queue_name).await;
        let wait_queue_url = Self::create_queue(&sqs_client, &wait_queue_name).await;

        Self {
            sqs_client,
            source_queue_name,
            source_queue_url,
            wait_queue_name,
            wait_queue_url,
        }
    }

    async fn create_queue(sqs_client: &SqsClient, queue_name: &str) -> String {
        sqs_client
            .create_queue()
            .queue_name(queue_name)
            .send()
            .await
            .expect("Failed to create test queue")
            .queue_url()
            .expect("Queue URL not returned")
            .to_string()
    }
}

impl Drop for SqsSetup {
    fn drop(&mut self) {
        // Clean up the queues
        let client = self.sqs_client.clone();
        let queue_urls = [self.source_queue_url.clone(), self.wait_queue_url.clone()];

        let handle = tokio::runtime::Handle::try_current();
        if let Ok(handle) = handle {
            handle.spawn(async move {
                for queue_url in queue_urls {
                    let _ = client.delete_queue().queue_url(&queue_url).send().await;
                }
            });
        }
    }
}
