//! Security headers middleware for HTTP responses.
//!
//! The header catalog below is the single source of truth for which
//! security headers this service can emit. Configuration gates presence
//! only; the header values themselves are fixed literals, and responses
//! carry them in the catalog's declared order regardless of request
//! method, path, or content.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::header::{
        HeaderName, HeaderValue, CONTENT_SECURITY_POLICY, REFERRER_POLICY,
        STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
    },
    middleware::Next,
    response::Response,
    Extension,
};

use crate::config::{Policy, PolicyConfig};

/// The ordered header catalog: one row per header policy, pairing it with
/// its literal header name and value.
fn header_catalog() -> [(Policy, HeaderName, HeaderValue); 7] {
    [
        (
            Policy::FrameOptions,
            X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ),
        (
            Policy::ContentSecurityPolicy,
            CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(
                "default-src 'self'; script-src 'self' 'unsafe-inline' https://trusted.cdn.com; \
                 style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; \
                 connect-src 'self' https://api.trusted.com",
            ),
        ),
        (
            Policy::Hsts,
            STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains; preload"),
        ),
        (
            Policy::ContentTypeOptions,
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ),
        (
            Policy::XssProtection,
            X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ),
        (
            Policy::ReferrerPolicy,
            REFERRER_POLICY,
            HeaderValue::from_static("no-referrer-when-downgrade"),
        ),
        (
            Policy::PermissionsPolicy,
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static("geolocation=(self), microphone=()"),
        ),
    ]
}

/// Build the response headers for every enabled header policy.
///
/// Walks the catalog in declared order and keeps the rows whose policy the
/// snapshot enables. The result is built once per configuration load and
/// shared across requests via an `Extension` layer; two calls with the same
/// snapshot produce identical lists.
#[must_use]
pub fn build_security_headers(policies: &PolicyConfig) -> Arc<Vec<(HeaderName, HeaderValue)>> {
    let headers = header_catalog()
        .into_iter()
        .filter(|(policy, _, _)| policies.is_enabled(*policy))
        .map(|(_, name, value)| (name, value))
        .collect();

    Arc::new(headers)
}

/// Middleware to add security headers to all responses.
///
/// Reads the pre-built header list from an `Extension` and inserts every
/// pair into the response. Applied as the outermost layer so the headers
/// reach every route, including error responses.
pub async fn security_headers_middleware(
    Extension(headers): Extension<Arc<Vec<(HeaderName, HeaderValue)>>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let response_headers = response.headers_mut();
    for (name, value) in headers.iter() {
        response_headers.insert(name.clone(), value.clone());
    }
    response
}
