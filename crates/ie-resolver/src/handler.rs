//! Invocation boundary: raw event in, response envelope out.

use serde_json::Value;
use tracing::{info_span, Instrument};

use ie_common::{InvocationResponse, ResolveRequest};

use crate::{EntitlementResolver, ResolveError, Result};

/// Parse the event, resolve the user and wrap the result in a 200 response.
///
/// Errors are returned unchanged to the caller; no error status code is produced.
pub async fn handle_event(resolver: &EntitlementResolver, event: Value) -> Result<InvocationResponse> {
    let request = parse_request(event)?;

    let span = info_span!(
        "resolve",
        user_name = %request.user_name,
        identity_store_id = %request.identity_store_id,
    );
    let result = resolver.resolve(&request).instrument(span).await?;

    Ok(InvocationResponse::ok(&result)?)
}

/// Decode and check the invocation event before any remote call is made.
pub fn parse_request(event: Value) -> Result<ResolveRequest> {
    let request: ResolveRequest =
        serde_json::from_value(event).map_err(|e| ResolveError::InvalidRequest(e.to_string()))?;

    if let Some(field) = request.first_empty_field() {
        return Err(ResolveError::InvalidRequest(format!("{} must not be empty", field)));
    }
    Ok(request)
}
