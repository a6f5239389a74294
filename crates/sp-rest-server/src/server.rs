// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Main server implementation

use crate::dependencies::DefaultServerDependencies;
use crate::error::ServerResult;
use crate::handlers;
use crate::state::AppState;
use crate::{config::ServerConfig, error::ServerError};
use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

/// REST API server
pub struct Server {
    config: ServerConfig,
    app: Router,
}

impl Server {
    /// Create a new server instance
    pub async fn new(config: ServerConfig) -> ServerResult<Self> {
        let state = DefaultServerDependencies::new(config.clone()).await?.into_state();
        Ok(Self::with_state(config, state))
    }

    /// Construct a server from an already-built app state (used for custom dependencies)
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        let app = Self::build_app(state, &config);
        Self { config, app }
    }

    /// Build the Axum application with routes and middleware
    fn build_app(state: AppState, config: &ServerConfig) -> Router {
        let middleware_stack = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer({
                if config.enable_cors {
                    CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
                } else {
                    CorsLayer::new()
                        .allow_origin(vec![
                            HeaderValue::from_static("http://localhost:3000"),
                            HeaderValue::from_static("http://127.0.0.1:3000"),
                        ])
                        .allow_methods([
                            axum::http::Method::GET,
                            axum::http::Method::POST,
                            axum::http::Method::PUT,
                            axum::http::Method::DELETE,
                        ])
                        .allow_headers([
                            axum::http::header::CONTENT_TYPE,
                            axum::http::HeaderName::from_static(crate::auth::USER_KEY_HEADER),
                            axum::http::HeaderName::from_static(crate::auth::ROLE_HEADER),
                        ])
                }
            });

        let api_routes = Router::new()
            // Health and status endpoints
            .route("/healthz", get(handlers::health::health_check))
            .route("/readyz", get(handlers::health::readiness_check))
            // Repository settings
            .route(
                "/repos/:owner/:name",
                delete(handlers::repositories::delete_repository),
            )
            .route(
                "/repos/:owner/:name/rename",
                post(handlers::repositories::rename_repository),
            )
            .route(
                "/repos/:owner/:name/default-branch",
                post(handlers::repositories::set_default_branch),
            )
            .route(
                "/repos/:owner/:name/exclude-patterns",
                put(handlers::repositories::set_exclude_patterns),
            )
            .route(
                "/repos/:owner/:name/refresh-provider",
                post(handlers::repositories::refresh_provider),
            )
            // Branch pages
            .route(
                "/repos/:owner/:name/branches/:branch/analysis",
                post(handlers::repositories::toggle_branch_analysis),
            )
            .route(
                "/repos/:owner/:name/branches/:branch/ignore",
                post(handlers::repositories::ignore_code_file),
            )
            .route(
                "/repos/:owner/:name/branches/:branch/file",
                get(handlers::repositories::code_file),
            )
            .route(
                "/repos/:owner/:name/branches/:branch/view-more",
                get(handlers::repositories::view_more),
            );

        Router::new()
            .nest("/api/v1", api_routes)
            .route("/openapi.json", get(handlers::openapi::openapi_spec))
            .with_state(state)
            .layer(middleware_stack)
    }

    /// Run the server
    pub async fn run(self) -> ServerResult<()> {
        let addr = self.config.bind_addr;
        info!("Starting server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.app)
            .await
            .map_err(|err| ServerError::Internal(format!("REST server error: {err}")))?;

        Ok(())
    }

    /// Get the bind address
    pub fn addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
