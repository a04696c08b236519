#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

use std::{net::SocketAddr, sync::Arc};

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
    config::Config,
    http::{build_security_headers, security_headers_middleware},
    rest::{self, ApiDoc},
    rpc,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Health check handler
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load and validate configuration first (fail-fast)
    let config = Config::load().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Set up logging from config
    std::env::set_var("RUST_LOG", &config.logging.level);
    tracing_subscriber::fmt::init();

    // Init banner so container logs clearly show startup
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "sitewarden-api starting up"
    );

    let build_info = BuildInfoProvider::from_env();
    let build_info_snapshot = build_info.build_info();
    tracing::info!(
        version = %build_info_snapshot.version,
        git_sha = %build_info_snapshot.git_sha,
        build_time = %build_info_snapshot.build_time,
        "resolved build metadata"
    );

    // Site capability toggles are evaluated once per configuration load,
    // not per request.
    let capabilities = Arc::new(Capabilities::new());
    capabilities.apply(&config.policies);
    if capabilities.legacy_rpc_disabled() {
        tracing::info!("Legacy RPC endpoint disabled by site policy");
    }
    if capabilities.file_editing_disabled() {
        tracing::info!("File editing disabled by site policy");
    }

    // The enabled header policies resolve to a fixed, ordered header list
    // shared across all responses.
    let security_headers = build_security_headers(&config.policies);
    tracing::info!(
        enabled = security_headers.len(),
        "security header policies resolved"
    );

    // Build the API
    let rest_v1 = Router::new()
        .route("/build-info", get(rest::get_build_info))
        .route("/rpc", post(rpc::handle_rpc))
        .route(
            "/admin/files/{*path}",
            get(admin::read_file).put(admin::update_file),
        );

    let mut app = Router::new()
        .nest("/api/v1", rest_v1)
        // Health check route
        .route("/health", get(health_check));

    if config.swagger.enabled {
        app = app
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    let app = app
        .layer(Extension(build_info_snapshot))
        .layer(Extension(capabilities))
        .layer(Extension(Arc::new(config.admin.clone())))
        .layer(TraceLayer::new_for_http())
        // Security headers middleware is outermost so every response,
        // including error responses, carries the configured headers.
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(Extension(security_headers));

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Starting server at http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
