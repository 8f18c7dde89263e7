use hit_counter::{Config, CountingProxy, DynamoHitStore, LambdaDownstream};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    shared::log::init();

    let config = Config::from_env()?;
    info!(
        table = %config.hits_table_name,
        downstream = %config.downstream_function_name,
        "starting hit counter"
    );

    let aws_config = shared::sdk::load_from_env().await;
    let store = DynamoHitStore::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        config.hits_table_name,
    );
    let downstream = LambdaDownstream::new(
        aws_sdk_lambda::Client::new(&aws_config),
        config.downstream_function_name,
    );
    let proxy = CountingProxy::new(store, downstream);

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| func(&proxy, event))).await?;
    Ok(())
}

async fn func(
    proxy: &CountingProxy<DynamoHitStore, LambdaDownstream>,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    let (payload, context) = event.into_parts();
    info!(request_id = %context.request_id, "invocation");

    Ok(proxy.handle(payload).await?)
}
