use aws_config::retry::RetryConfig;
use aws_config::SdkConfig;

/// Loads the SDK configuration from the Lambda environment with retries turned off.
///
/// Every call made with this config is attempted once; a failure surfaces to the
/// caller and any retry is left to the invoking platform.
pub async fn load_from_env() -> SdkConfig {
    aws_config::from_env()
        .retry_config(RetryConfig::disabled())
        .load()
        .await
}
