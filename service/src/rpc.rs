//! Legacy remote-procedure endpoint.
//!
//! Kept for compatibility with old integrations. The endpoint is a known
//! brute-force target, so operators can switch it off entirely via the
//! `disable_legacy_rpc` policy; the gate is consulted before any method
//! dispatch happens.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::capabilities::Capabilities;
use crate::rest::ProblemDetails;

/// Methods the legacy surface still answers.
const METHODS: [&str; 2] = ["system.listMethods", "demo.sayHello"];

/// A legacy RPC call.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RpcRequest {
    /// Method name, e.g. `system.listMethods`
    pub method: String,
    /// Positional parameters
    #[serde(default)]
    pub params: Vec<serde_json::Value>,
}

/// Result envelope for a legacy RPC call.
#[derive(Debug, Serialize, ToSchema)]
pub struct RpcResponse {
    pub result: serde_json::Value,
}

/// Handle a legacy RPC call
///
/// Dispatches the named method. When the `disable_legacy_rpc` policy is in
/// effect every request is rejected, regardless of method.
///
/// # Errors
///
/// Returns `ProblemDetails` with 403 when the endpoint is disabled and 400
/// for unknown methods.
#[utoipa::path(
    post,
    path = "/rpc",
    tag = "Legacy",
    request_body = RpcRequest,
    responses(
        (status = 200, description = "Method executed", body = RpcResponse),
        (status = 400, description = "Unknown method", body = ProblemDetails),
        (status = 403, description = "Endpoint disabled by site policy", body = ProblemDetails)
    )
)]
#[allow(clippy::unused_async)] // Required for Axum handler signature
pub async fn handle_rpc(
    Extension(capabilities): Extension<Arc<Capabilities>>,
    Json(request): Json<RpcRequest>,
) -> Result<Json<RpcResponse>, ProblemDetails> {
    if capabilities.legacy_rpc_disabled() {
        return Err(ProblemDetails::forbidden(
            "The legacy RPC endpoint is disabled on this site",
        ));
    }

    tracing::debug!(method = %request.method, params = request.params.len(), "legacy rpc call");

    let result = match request.method.as_str() {
        "system.listMethods" => serde_json::json!(METHODS),
        "demo.sayHello" => serde_json::json!("Hello!"),
        other => {
            return Err(ProblemDetails::bad_request(&format!(
                "Unknown method '{other}'"
            )))
        }
    };

    Ok(Json(RpcResponse { result }))
}
