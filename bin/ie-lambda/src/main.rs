//! Entitlement Resolver Lambda
//!
//! Resolves one Identity Center user's account and application assignments
//! per invocation. The event is `{"IdStoreId", "UserName", "InstanceArn"}`;
//! the response is `{"statusCode": 200, "body": "<json>"}`. Failures are
//! returned to the runtime as invocation errors.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ENTITLEMENTS_CONFIG` | - | Path to a TOML config file |
//! | `ENTITLEMENTS_AWS_REGION` | SDK chain | Region override |
//! | `ENTITLEMENTS_AWS_ENDPOINT_URL` | - | Endpoint override (LocalStack) |
//! | `ENTITLEMENTS_MAX_CONCURRENT_PRINCIPALS` | `1` | Groups aggregated at once |
//! | `ENTITLEMENTS_LOG_FORMAT` / `LOG_FORMAT` | `text` | `text` or `json` |
//! | `ENTITLEMENTS_LOG_LEVEL` | `info` | Default level when `RUST_LOG` is unset |
//! | `RUST_LOG` | - | Log filter |

use std::sync::Arc;

use anyhow::Result;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, info_span, Instrument};

use ie_common::logging::{init_logging, LogFormat};
use ie_common::InvocationResponse;
use ie_config::AppConfig;
use ie_resolver::{aws, handle_event, EntitlementResolver};

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = AppConfig::load()?;
    let config = &loaded.config;
    init_logging(
        "ie-lambda",
        LogFormat::parse(&config.logging.format),
        &config.logging.level,
    );
    // Config is read before a subscriber exists, so its diagnostics are replayed here
    loaded.log();

    info!(
        max_concurrent_principals = config.resolver.max_concurrent_principals,
        "Starting entitlement resolver"
    );

    let sdk_config = aws::load_sdk_config(&config.aws).await;
    let resolver = Arc::new(EntitlementResolver::from_sdk_config(&sdk_config, &config.resolver));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let resolver = Arc::clone(&resolver);
        async move { invoke(&resolver, event).await }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}

async fn invoke(
    resolver: &EntitlementResolver,
    event: LambdaEvent<Value>,
) -> Result<InvocationResponse, lambda_runtime::Error> {
    let LambdaEvent { payload, context } = event;
    let span = info_span!("invocation", request_id = %context.request_id);

    async {
        handle_event(resolver, payload).await.map_err(|e| {
            error!(error = %e, "Entitlement resolution failed");
            lambda_runtime::Error::from(e)
        })
    }
    .instrument(span)
    .await
}
