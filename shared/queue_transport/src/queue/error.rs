use aws_sdk_sqs::error::SdkError;
use aws_sdk_sqs::operation::get_queue_url::GetQueueUrlError;
use aws_sdk_sqs::operation::send_message::SendMessageError;
use thiserror::Error;

/// Result type alias for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Error types for queue operations
#[derive(Error, Debug)]
pub enum QueueError {
    /// Error resolving a queue name to its URL
    #[error("Failed to resolve queue URL from SQS")]
    GetQueueUrl(#[from] SdkError<GetQueueUrlError>),

    /// Error sending message to SQS
    #[error("Failed to send message to SQS")]
    SendMessage(#[from] SdkError<SendMessageError>),

    /// SQS answered the lookup without a queue URL
    #[error("No queue URL returned for queue: {0}")]
    MissingQueueUrl(String),

    /// A message attribute could not be built
    #[error("Invalid message attribute: {0}")]
    InvalidAttribute(String),
}
