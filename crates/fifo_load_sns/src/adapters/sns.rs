use aws_config::SdkConfig;
use aws_sdk_sns::config::retry::RetryConfig;
use aws_sdk_sns::config::{ProvideCredentials, Region};
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::types::MessageAttributeValue;
use fifo_load_core::{PublishError, PublishRequest, TopicPublisher};

/// One initial attempt plus a single SDK retry.
pub const MAX_ATTEMPTS: u32 = 2;
pub const STRING_DATA_TYPE: &str = "String";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    pub message: String,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SessionError {}

/// Loads the shared AWS configuration for `region` and builds an SNS client.
pub async fn connect(region: &str) -> Result<aws_sdk_sns::Client, SessionError> {
    let region = region.trim();
    if region.is_empty() {
        return Err(SessionError {
            message: "AWS region must be configured".to_string(),
        });
    }

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .retry_config(RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS))
        .load()
        .await;

    ensure_credentials(&aws_config).await?;

    Ok(aws_sdk_sns::Client::new(&aws_config))
}

/// Resolves credentials once, so a session without them fails at startup
/// instead of on every publish.
pub async fn ensure_credentials(aws_config: &SdkConfig) -> Result<(), SessionError> {
    let provider = aws_config
        .credentials_provider()
        .ok_or_else(|| SessionError {
            message: "no AWS credentials provider is configured".to_string(),
        })?;

    provider
        .provide_credentials()
        .await
        .map(|_| ())
        .map_err(|error| SessionError {
            message: format!(
                "failed to resolve AWS credentials: {}",
                DisplayErrorContext(&error)
            ),
        })
}

pub struct SnsTopicPublisher {
    topic_arn: String,
    sns_client: aws_sdk_sns::Client,
}

impl SnsTopicPublisher {
    pub fn new(sns_client: aws_sdk_sns::Client, topic_arn: impl Into<String>) -> Self {
        Self {
            topic_arn: topic_arn.into(),
            sns_client,
        }
    }

    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }
}

impl TopicPublisher for SnsTopicPublisher {
    async fn publish(&self, request: PublishRequest) -> Result<(), PublishError> {
        let mut call = self
            .sns_client
            .publish()
            .topic_arn(&self.topic_arn)
            .message(request.payload)
            .message_group_id(request.message_group_id)
            .message_deduplication_id(request.deduplication_id);

        for (name, value) in request.attributes {
            call = call.message_attributes(name, string_attribute(value)?);
        }

        call.send()
            .await
            .map(|_| ())
            .map_err(|error| {
                PublishError::Transport(format!(
                    "failed to publish to sns: {}",
                    DisplayErrorContext(&error)
                ))
            })
    }
}

fn string_attribute(value: String) -> Result<MessageAttributeValue, PublishError> {
    MessageAttributeValue::builder()
        .data_type(STRING_DATA_TYPE)
        .string_value(value)
        .build()
        .map_err(|error| {
            PublishError::InvalidRequest(format!("invalid message attribute: {error}"))
        })
}
