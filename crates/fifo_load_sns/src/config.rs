use clap::Parser;
use fifo_load_core::contract::DEFAULT_NUM_MESSAGES;
use fifo_load_core::ValidationError;

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Parser)]
#[command(
    name = "sns_load_test",
    about = "Throughput load test against an SNS FIFO topic",
    long_about = "Publishes one simulated order per message to an SNS FIFO topic,\n\
                  sharding by customer id, and reports throughput and success rate."
)]
pub struct Cli {
    /// Target topic ARN
    #[arg(long, env = "SNS_TOPIC_ARN")]
    pub topic_arn: Option<String>,
    /// Number of messages to publish; unset or unparsable values fall back to the default
    #[arg(long, env = "NUM_MESSAGES")]
    pub num_messages: Option<String>,
    /// AWS region of the topic
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTestConfig {
    pub topic_arn: String,
    pub num_messages: usize,
    pub region: String,
}

impl LoadTestConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ValidationError> {
        let topic_arn = cli
            .topic_arn
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        if topic_arn.is_empty() {
            return Err(ValidationError::new(
                "SNS_TOPIC_ARN environment variable is required",
            ));
        }

        Ok(Self {
            topic_arn,
            num_messages: parse_num_messages(cli.num_messages.as_deref()),
            region: cli.region,
        })
    }
}

/// Lenient: a missing or malformed count is not fatal.
pub fn parse_num_messages(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(DEFAULT_NUM_MESSAGES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(topic_arn: Option<&str>, num_messages: Option<&str>) -> Cli {
        Cli {
            topic_arn: topic_arn.map(str::to_string),
            num_messages: num_messages.map(str::to_string),
            region: DEFAULT_REGION.to_string(),
        }
    }

    #[test]
    fn missing_topic_is_fatal() {
        let error = LoadTestConfig::from_cli(cli(None, Some("10"))).expect_err("should fail");
        assert_eq!(
            error.message(),
            "SNS_TOPIC_ARN environment variable is required"
        );
    }

    #[test]
    fn blank_topic_is_fatal() {
        let error = LoadTestConfig::from_cli(cli(Some("   "), None)).expect_err("should fail");
        assert_eq!(
            error.message(),
            "SNS_TOPIC_ARN environment variable is required"
        );
    }

    #[test]
    fn num_messages_parses_or_falls_back() {
        assert_eq!(parse_num_messages(Some("1200")), 1_200);
        assert_eq!(parse_num_messages(Some(" 75 ")), 75);
        assert_eq!(parse_num_messages(Some("lots")), 50_000);
        assert_eq!(parse_num_messages(Some("-5")), 50_000);
        assert_eq!(parse_num_messages(None), 50_000);
    }

    #[test]
    fn explicit_flags_build_config() {
        let parsed = Cli::try_parse_from([
            "sns_load_test",
            "--topic-arn",
            "arn:aws:sns:us-east-1:123456789012:orders.fifo",
            "--num-messages",
            "250",
            "--region",
            "eu-west-1",
        ])
        .expect("flags should parse");

        let config = LoadTestConfig::from_cli(parsed).expect("config should build");
        assert_eq!(
            config.topic_arn,
            "arn:aws:sns:us-east-1:123456789012:orders.fifo"
        );
        assert_eq!(config.num_messages, 250);
        assert_eq!(config.region, "eu-west-1");
    }
}
