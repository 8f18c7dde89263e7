use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::DownstreamError;

/// The function whose invocations are being counted.
#[async_trait]
pub trait DownstreamInvoker: Send + Sync {
    async fn invoke(&self, event: &Value) -> Result<Value, DownstreamError>;
}

#[async_trait]
impl<T: DownstreamInvoker + ?Sized> DownstreamInvoker for Arc<T> {
    async fn invoke(&self, event: &Value) -> Result<Value, DownstreamError> {
        (**self).invoke(event).await
    }
}

#[async_trait]
impl<'a, T: DownstreamInvoker + ?Sized> DownstreamInvoker for &'a T {
    async fn invoke(&self, event: &Value) -> Result<Value, DownstreamError> {
        (**self).invoke(event).await
    }
}

/// Calls another Lambda function synchronously and waits for its payload.
#[derive(Debug, Clone)]
pub struct LambdaDownstream {
    client: aws_sdk_lambda::Client,
    function_name: String,
}

impl LambdaDownstream {
    pub fn new(client: aws_sdk_lambda::Client, function_name: impl Into<String>) -> Self {
        Self {
            client,
            function_name: function_name.into(),
        }
    }
}

#[async_trait]
impl DownstreamInvoker for LambdaDownstream {
    async fn invoke(&self, event: &Value) -> Result<Value, DownstreamError> {
        let body = serde_json::to_vec(event)
            .map_err(|e| DownstreamError::new(format!("cannot encode event: {}", e)))?;

        let output = self
            .client
            .invoke()
            .function_name(&self.function_name)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(body))
            .send()
            .await
            .map_err(|err| DownstreamError::new(DisplayErrorContext(&err).to_string()))?;

        debug!(
            function = %self.function_name,
            status = output.status_code(),
            function_error = ?output.function_error(),
            "downstream responded"
        );

        decode_response(output.function_error(), output.payload().map(|p| p.as_ref()))
    }
}

/// Error body the Lambda runtime writes when a function fails.
#[derive(Debug, Deserialize)]
struct FunctionErrorBody {
    #[serde(rename = "errorType")]
    error_type: Option<String>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

/// Turns a raw invoke response into the downstream's result or its failure.
pub fn decode_response(
    function_error: Option<&str>,
    payload: Option<&[u8]>,
) -> Result<Value, DownstreamError> {
    if let Some(kind) = function_error {
        let body = payload.unwrap_or_default();
        return Err(match serde_json::from_slice::<FunctionErrorBody>(body) {
            Ok(FunctionErrorBody {
                error_type,
                error_message: Some(message),
            }) => DownstreamError::with_type(error_type.unwrap_or_else(|| kind.to_owned()), message),
            _ if !body.is_empty() => {
                DownstreamError::with_type(kind, String::from_utf8_lossy(body).into_owned())
            }
            _ => DownstreamError::with_type(kind, kind),
        });
    }

    let payload =
        payload.ok_or_else(|| DownstreamError::new("empty response from downstream"))?;

    serde_json::from_slice(payload)
        .map_err(|e| DownstreamError::new(format!("downstream returned invalid JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_lambda::config::retry::RetryConfig;
    use aws_sdk_lambda::config::{Credentials, Region};
    use aws_smithy_client::test_connection::{capture_request, CaptureRequestHandler};
    use aws_smithy_http::body::SdkBody;
    use serde_json::json;

    fn lambda_client(connector: CaptureRequestHandler) -> aws_sdk_lambda::Client {
        let config = aws_sdk_lambda::Config::builder()
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("akid", "secret", None, None, "test"))
            .retry_config(RetryConfig::disabled())
            .http_connector(connector)
            .build();
        aws_sdk_lambda::Client::from_conf(config)
    }

    #[tokio::test]
    async fn invokes_synchronously_with_the_event_as_payload() {
        let reply = json!({ "statusCode": 200, "body": "Hello, CDK! You've hit /\n" });
        let (connector, requests) = capture_request(Some(
            http::Response::builder()
                .status(200)
                .body(SdkBody::from(reply.to_string()))
                .unwrap(),
        ));
        let downstream = LambdaDownstream::new(lambda_client(connector), "HelloHandler");
        let event = json!({ "path": "/", "httpMethod": "GET", "headers": { "Accept": "*/*" } });

        assert_eq!(downstream.invoke(&event).await, Ok(reply));

        let request = requests.expect_request();
        assert!(request
            .uri()
            .path()
            .ends_with("/functions/HelloHandler/invocations"));
        assert_eq!(
            request.headers().get("x-amz-invocation-type").unwrap(),
            "RequestResponse"
        );
        let sent: Value = serde_json::from_slice(request.body().bytes().unwrap()).unwrap();
        assert_eq!(sent, event);
    }

    #[tokio::test]
    async fn function_error_header_turns_into_downstream_error() {
        let (connector, _requests) = capture_request(Some(
            http::Response::builder()
                .status(200)
                .header("x-amz-function-error", "Unhandled")
                .body(SdkBody::from(
                    r#"{"errorType":"Error","errorMessage":"hello exploded"}"#,
                ))
                .unwrap(),
        ));
        let downstream = LambdaDownstream::new(lambda_client(connector), "HelloHandler");

        let err = downstream.invoke(&json!({ "path": "/" })).await.unwrap_err();
        assert_eq!(err, DownstreamError::with_type("Error", "hello exploded"));
    }

    #[test]
    fn successful_payload_is_returned_verbatim() {
        let payload = json!({
            "statusCode": 200,
            "headers": { "Content-Type": "text/plain" },
            "body": "Hello, CDK! You've hit /\n"
        });
        let bytes = serde_json::to_vec(&payload).unwrap();

        assert_eq!(decode_response(None, Some(bytes.as_slice())), Ok(payload));
    }

    #[test]
    fn function_error_keeps_type_and_message() {
        let body = br#"{"errorType":"TypeError","errorMessage":"cannot read 'x'","trace":[]}"#;
        let err = decode_response(Some("Unhandled"), Some(body.as_slice())).unwrap_err();

        assert_eq!(err, DownstreamError::with_type("TypeError", "cannot read 'x'"));
    }

    #[test]
    fn function_error_with_unstructured_body_keeps_raw_text() {
        let err =
            decode_response(Some("Unhandled"), Some(b"Task timed out".as_slice())).unwrap_err();
        assert_eq!(err, DownstreamError::with_type("Unhandled", "Task timed out"));

        let err = decode_response(Some("Unhandled"), None).unwrap_err();
        assert_eq!(err, DownstreamError::with_type("Unhandled", "Unhandled"));
    }

    #[test]
    fn missing_or_invalid_payload_is_a_downstream_error() {
        let err = decode_response(None, None).unwrap_err();
        assert_eq!(err.message, "empty response from downstream");

        let err = decode_response(None, Some(b"not json".as_slice())).unwrap_err();
        assert!(err.message.starts_with("downstream returned invalid JSON"));
    }
}
