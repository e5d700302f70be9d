use std::sync::Arc;

use aws_sdk_sqs::Client as SqsClient;
use lambda_runtime::{service_fn, LambdaEvent};
use queue_transport::queue::{SqsBatchResponse, SqsEvent, SqsHoldingQueue};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wait_queue_router::router::BatchCoordinator;
use wait_queue_router::types::{Environment, RouterConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // CloudWatch adds its own timestamps
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .init();

    let env = Environment::from_env();
    info!("Starting wait-queue router in {} environment", env);

    let config = RouterConfig::from_env();
    info!(?config, region = %Environment::region_name(), "Loaded router configuration");

    let sqs_client = Arc::new(SqsClient::new(&env.aws_config().await));
    let coordinator = Arc::new(BatchCoordinator::new(
        Arc::new(SqsHoldingQueue::new(sqs_client)),
        config,
    ));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SqsEvent>| {
        let coordinator = Arc::clone(&coordinator);
        async move { handle_event(&coordinator, event).await }
    }))
    .await
    .map_err(|e| {
        error!("Lambda runtime error: {}", e);
        anyhow::anyhow!(e)
    })
}

async fn handle_event(
    coordinator: &BatchCoordinator,
    event: LambdaEvent<SqsEvent>,
) -> Result<SqsBatchResponse, lambda_runtime::Error> {
    let (batch, context) = event.into_parts();
    info!(request_id = %context.request_id, "Handling SQS batch");

    let report = coordinator.handle_batch(&batch).await?;

    Ok(report.map(SqsBatchResponse::from).unwrap_or_default())
}
