//! Session setup against the default credential chain. Lives in its own test
//! binary because it rewrites the process environment.

use fifo_load_sns::adapters::sns::connect;

const CREDENTIAL_VARIABLES: &[&str] = &[
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "AWS_SESSION_TOKEN",
    "AWS_PROFILE",
    "AWS_WEB_IDENTITY_TOKEN_FILE",
    "AWS_ROLE_ARN",
    "AWS_CONTAINER_CREDENTIALS_RELATIVE_URI",
    "AWS_CONTAINER_CREDENTIALS_FULL_URI",
];

#[tokio::test]
async fn connect_fails_at_startup_without_credentials() {
    for name in CREDENTIAL_VARIABLES {
        std::env::remove_var(name);
    }
    std::env::set_var("AWS_CONFIG_FILE", "/nonexistent/aws/config");
    std::env::set_var("AWS_SHARED_CREDENTIALS_FILE", "/nonexistent/aws/credentials");
    std::env::set_var("AWS_EC2_METADATA_DISABLED", "true");

    let error = connect("us-east-1")
        .await
        .expect_err("session without credentials should fail");

    assert!(
        error.message.starts_with("failed to resolve AWS credentials"),
        "unexpected message: {}",
        error.message
    );
}
