//! Test app builder that mirrors main.rs wiring with injectable deps.
//!
//! This module provides a [`TestAppBuilder`] that constructs an Axum router
//! matching the production configuration in `main.rs`, but with the ability
//! to inject policy snapshots, pre-seeded capability state, and a scratch
//! content root.
//!
//! # Usage
//!
//! ```ignore
//! use crate::common::app_builder::TestAppBuilder;
//!
//! #[tokio::test]
//! async fn test_with_full_app() {
//!     let app = TestAppBuilder::new()
//!         .with_rpc()
//!         .with_policies(PolicyConfig::default())
//!         .build();
//!
//!     // Use app.oneshot(...) to send requests
//! }
//! ```
//!
//! # Preset Builders
//!
//! - [`TestAppBuilder::minimal()`] - Health check only
//! - [`TestAppBuilder::full()`] - All routes with default (all-off) policies

use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Router,
};
use sitewarden_api::{
    admin,
    build_info::BuildInfoProvider,
    capabilities::Capabilities,
    config::{AdminConfig, PolicyConfig},
    http::{build_security_headers, security_headers_middleware},
    rest, rpc,
};

/// Health check handler (mirrors main.rs)
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Builder for test applications that mirrors main.rs wiring.
///
/// Use the builder pattern to construct an Axum router with the exact same
/// layer ordering and configuration as production, while allowing injection
/// of test state.
pub struct TestAppBuilder {
    /// Whether to include the REST build-info route
    include_rest: bool,
    /// Whether to include the legacy RPC route
    include_rpc: bool,
    /// Whether to include the admin file-editing routes
    include_admin: bool,
    /// Whether to include the health check route
    include_health: bool,
    /// Policy snapshot driving headers and capability toggles
    policies: PolicyConfig,
    /// Pre-seeded capability state (None creates a fresh one and applies
    /// the policy snapshot, as main.rs does at startup)
    capabilities: Option<Arc<Capabilities>>,
    /// Content root for the file-editing surface
    content_root: Option<String>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    /// Create a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            include_rest: false,
            include_rpc: false,
            include_admin: false,
            include_health: false,
            policies: PolicyConfig::default(),
            capabilities: None,
            content_root: None,
        }
    }

    // =========================================================================
    // Preset Builders
    // =========================================================================

    /// Create a minimal app with only the health check endpoint.
    ///
    /// Use this for simple connectivity tests.
    #[must_use]
    pub fn minimal() -> Self {
        Self::new().with_health()
    }

    /// Create a full app with every route and default (all-off) policies.
    ///
    /// Mirrors production main.rs wiring.
    #[must_use]
    pub fn full() -> Self {
        Self::new()
            .with_rest()
            .with_rpc()
            .with_admin("content")
            .with_health()
    }

    // =========================================================================
    // Component Configuration
    // =========================================================================

    /// Include the REST build-info route (/api/v1/build-info).
    #[must_use]
    pub fn with_rest(mut self) -> Self {
        self.include_rest = true;
        self
    }

    /// Include the legacy RPC route (/api/v1/rpc).
    #[must_use]
    pub fn with_rpc(mut self) -> Self {
        self.include_rpc = true;
        self
    }

    /// Include the admin file-editing routes (/api/v1/admin/files/*).
    #[must_use]
    pub fn with_admin(mut self, content_root: &str) -> Self {
        self.include_admin = true;
        self.content_root = Some(content_root.to_string());
        self
    }

    /// Include health check route (/health).
    #[must_use]
    pub fn with_health(mut self) -> Self {
        self.include_health = true;
        self
    }

    /// Use a specific policy snapshot.
    ///
    /// Drives both the emitted security headers and, unless
    /// [`with_capabilities`](Self::with_capabilities) injects pre-seeded
    /// state, the capability toggles.
    #[must_use]
    pub fn with_policies(mut self, policies: PolicyConfig) -> Self {
        self.policies = policies;
        self
    }

    /// Inject pre-seeded capability state instead of deriving it from the
    /// policy snapshot.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Arc<Capabilities>) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Build the Axum router.
    ///
    /// The layer ordering matches main.rs exactly:
    /// 1. Routes (REST, RPC, Admin, Health)
    /// 2. Extensions (build info, capabilities, admin config)
    /// 3. Security headers middleware (outermost)
    #[must_use]
    pub fn build(self) -> Router {
        let build_info = BuildInfoProvider::from_lookup(|_| None).build_info();

        let capabilities = self.capabilities.unwrap_or_else(|| {
            let capabilities = Arc::new(Capabilities::new());
            capabilities.apply(&self.policies);
            capabilities
        });

        let security_headers = build_security_headers(&self.policies);

        let admin_config = Arc::new(AdminConfig {
            content_root: self.content_root.unwrap_or_else(|| "content".to_string()),
        });

        let mut rest_v1 = Router::new();

        if self.include_rest {
            rest_v1 = rest_v1.route("/build-info", get(rest::get_build_info));
        }

        if self.include_rpc {
            rest_v1 = rest_v1.route("/rpc", post(rpc::handle_rpc));
        }

        if self.include_admin {
            rest_v1 = rest_v1.route(
                "/admin/files/{*path}",
                get(admin::read_file).put(admin::update_file),
            );
        }

        let mut app = Router::new().nest("/api/v1", rest_v1);

        if self.include_health {
            app = app.route("/health", get(health_check));
        }

        app.layer(Extension(build_info))
            .layer(Extension(capabilities))
            .layer(Extension(admin_config))
            .layer(middleware::from_fn(security_headers_middleware))
            .layer(Extension(security_headers))
    }
}
