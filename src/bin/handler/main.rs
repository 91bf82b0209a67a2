use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt().init();
    lambda_runtime::run(service_fn(handler)).await?;
    Ok(())
}

// Placeholder until the real merkle info lookup lands here.
async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    info!("Hello from {}!", env::var("AWS_LAMBDA_FUNCTION_NAME")?);

    Ok(json!({
        "message": "merkle info handler not implemented",
        "input": event.payload,
    }))
}
