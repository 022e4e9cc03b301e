//! AWS-backed service implementations
//!
//! Credentials come from the standard AWS SDK chain (env vars, profile,
//! Lambda execution role). Region and endpoint can be overridden through
//! [`ie_config::AwsConfig`], which is how LocalStack is targeted.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use tracing::info;

use ie_config::AwsConfig;

use crate::ResolveError;

mod identity_store;
mod sso_admin;

pub use identity_store::IdentityStoreDirectory;
pub use sso_admin::SsoAdminAssignments;

/// Error code both services use for unknown identifiers.
const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";

/// Load the shared SDK configuration.
pub async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = config.region() {
        loader = loader.region(Region::new(region.to_string()));
    }
    if let Some(endpoint_url) = config.endpoint_url() {
        info!(endpoint_url, "Using AWS endpoint override");
        loader = loader.endpoint_url(endpoint_url);
    }

    loader.load().await
}

/// Map an SDK failure to `NotFound` or `Service`.
///
/// `subject` names what was being looked up, for the error message.
pub(crate) fn classify_sdk_error<E>(operation: &str, subject: &str, err: E) -> ResolveError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    if err.code() == Some(RESOURCE_NOT_FOUND) {
        ResolveError::NotFound(format!("{} ({})", subject, operation))
    } else {
        ResolveError::Service(format!(
            "{} failed for {}: {}",
            operation,
            subject,
            DisplayErrorContext(&err)
        ))
    }
}

/// A required field the service left out of its response.
pub(crate) fn missing_field(operation: &str, field: &str) -> ResolveError {
    ResolveError::Service(format!("{} response is missing {}", operation, field))
}
