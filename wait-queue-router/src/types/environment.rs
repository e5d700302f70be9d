//! Environment configuration for different deployment stages

use std::{env, time::Duration};

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use strum::Display;

use crate::router::{aggregator::ReportingStrategy, message::DEFAULT_HOLDING_QUEUE_MARKER};

/// Region used when `REGION_NAME` is not set
pub const DEFAULT_REGION: &str = "us-east-1";

/// Records evaluated concurrently when `MAX_CONCURRENT_RECORDS` is not set
pub const DEFAULT_MAX_CONCURRENT_RECORDS: usize = 10;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment  
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some("http://localhost:4566"),
        }
    }

    /// Returns the AWS region, `REGION_NAME` or [`DEFAULT_REGION`]
    #[must_use]
    pub fn region_name() -> String {
        env::var("REGION_NAME")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(Self::region_name()))
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            loader = loader.endpoint_url(endpoint_url);
        }

        loader.load().await
    }
}

/// Configuration for the batch coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Substring in a queue name marking it as a holding queue
    pub holding_queue_marker: String,
    /// How failures are logged when a batch completes
    pub reporting_strategy: ReportingStrategy,
    /// Upper bound on records evaluated at the same time
    pub max_concurrent_records: usize,
}

impl RouterConfig {
    /// Creates a `RouterConfig` from `WAIT_QUEUE_MARKER`,
    /// `BATCH_FAILURE_LOGGING` and `MAX_CONCURRENT_RECORDS`, falling back to
    /// the defaults for unset values
    ///
    /// # Panics
    ///
    /// Panics if `BATCH_FAILURE_LOGGING` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let holding_queue_marker = env::var("WAIT_QUEUE_MARKER")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_HOLDING_QUEUE_MARKER.to_string());

        let reporting_strategy =
            env::var("BATCH_FAILURE_LOGGING").map_or(ReportingStrategy::Silent, |v| {
                v.trim()
                    .parse()
                    .unwrap_or_else(|_| panic!("Invalid batch failure logging strategy: {v}"))
            });

        let max_concurrent_records = env::var("MAX_CONCURRENT_RECORDS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_CONCURRENT_RECORDS)
            .max(1);

        Self {
            holding_queue_marker,
            reporting_strategy,
            max_concurrent_records,
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            holding_queue_marker: DEFAULT_HOLDING_QUEUE_MARKER.to_string(),
            reporting_strategy: ReportingStrategy::Silent,
            max_concurrent_records: DEFAULT_MAX_CONCURRENT_RECORDS,
        }
    }
}
