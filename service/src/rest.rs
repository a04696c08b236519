//! REST API handlers and `OpenAPI` documentation.
//!
//! This module provides the REST surface of the service and the RFC 7807
//! problem-details error body shared by every handler.

use crate::admin::FileContent;
use crate::build_info::BuildInfo;
use crate::rpc::{RpcRequest, RpcResponse};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Serialize, Serializer};
use utoipa::{OpenApi, ToSchema};

/// Serialize a `StatusCode` as its `u16` representation.
#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires `&T` signature
fn serialize_status_code<S: Serializer>(status: &StatusCode, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u16(status.as_u16())
}

/// RFC 7807 Problem Details error response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    /// URI reference identifying the problem type
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short human-readable summary
    pub title: String,
    /// HTTP status code
    #[serde(serialize_with = "serialize_status_code")]
    #[schema(value_type = u16)]
    pub status: StatusCode,
    /// Human-readable explanation specific to this occurrence
    pub detail: String,
    /// URI reference identifying the specific occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ProblemExtensions>,
}

/// Extended error information.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemExtensions {
    /// Stable machine-readable error code
    pub code: String,
    /// Field that caused the error (for validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ProblemDetails {
    fn new(slug: &str, title: &str, status: StatusCode, detail: &str, code: &str) -> Self {
        Self {
            problem_type: format!("https://sitewarden.io/errors/{slug}"),
            title: title.to_string(),
            status,
            detail: detail.to_string(),
            instance: None,
            extensions: Some(ProblemExtensions {
                code: code.to_string(),
                field: None,
            }),
        }
    }

    /// Create an internal server error response.
    #[must_use]
    pub fn internal_error(detail: &str) -> Self {
        Self::new(
            "internal",
            "Internal Server Error",
            StatusCode::INTERNAL_SERVER_ERROR,
            detail,
            "INTERNAL_ERROR",
        )
    }

    /// Create a forbidden response for a capability an operator switched off.
    #[must_use]
    pub fn forbidden(detail: &str) -> Self {
        Self::new(
            "forbidden",
            "Forbidden",
            StatusCode::FORBIDDEN,
            detail,
            "FORBIDDEN",
        )
    }

    /// Create a bad request response.
    #[must_use]
    pub fn bad_request(detail: &str) -> Self {
        Self::new(
            "bad-request",
            "Bad Request",
            StatusCode::BAD_REQUEST,
            detail,
            "BAD_REQUEST",
        )
    }

    /// Create a not found response.
    #[must_use]
    pub fn not_found(detail: &str) -> Self {
        Self::new(
            "not-found",
            "Not Found",
            StatusCode::NOT_FOUND,
            detail,
            "NOT_FOUND",
        )
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// `OpenAPI` documentation for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sitewarden API",
        version = "1.0.0",
        description = "REST API for Sitewarden",
        license(name = "MIT")
    ),
    servers(
        (url = "/api/v1", description = "REST API v1")
    ),
    paths(
        get_build_info,
        crate::rpc::handle_rpc,
        crate::admin::read_file,
        crate::admin::update_file
    ),
    components(schemas(
        BuildInfo,
        ProblemDetails,
        ProblemExtensions,
        RpcRequest,
        RpcResponse,
        FileContent
    ))
)]
pub struct ApiDoc;

/// Get build information
///
/// Returns metadata about the running service including version, git SHA, and build time.
///
/// # Errors
///
/// Returns `ProblemDetails` on internal server errors.
#[utoipa::path(
    get,
    path = "/build-info",
    tag = "System",
    responses(
        (status = 200, description = "Build information retrieved successfully", body = BuildInfo),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
#[allow(clippy::unused_async)] // Required for Axum handler signature
pub async fn get_build_info(
    Extension(build_info): Extension<BuildInfo>,
) -> Result<Json<BuildInfo>, ProblemDetails> {
    Ok(Json(build_info))
}
