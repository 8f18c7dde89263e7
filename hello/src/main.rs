use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use http::header::{HeaderValue, CONTENT_TYPE};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    shared::log::init();

    lambda_runtime::run(service_fn(func)).await?;
    Ok(())
}

async fn func(
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let path = event.payload.path.as_deref().unwrap_or("/");
    info!(path, "hello");

    Ok(respond(path))
}

fn respond(path: &str) -> ApiGatewayProxyResponse {
    let mut response = ApiGatewayProxyResponse {
        status_code: 200,
        body: Some(Body::Text(format!("Hello, CDK! You've hit {}\n", path))),
        ..Default::default()
    };
    response
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}
