//! API 路由与文档集成模块

pub mod handlers;
pub mod types;

use std::sync::Arc;

use axum::{http::Request, response::Response, routing::get, Extension, Router};
use handlers::ApiDoc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info_span, Span};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::providers::Providers;

/// 构建 API 路由与中间件
pub fn create_router(providers: Arc<Providers>) -> Router {
    use handlers::{
        app_info_route, bitbucket_badge_route, github_badge_route, gitlab_badge_route,
        static_badge_route,
    };
    Router::new()
        // API 文档
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        // API 路由
        .route("/", get(app_info_route))
        .route("/static", get(static_badge_route))
        .route("/github/{owner}/{repo}/{request_type}", get(github_badge_route))
        .route("/gitlab/{owner}/{repo}/{request_type}", get(gitlab_badge_route))
        .route(
            "/bitbucket/{owner}/{repo}/{request_type}",
            get(bitbucket_badge_route),
        )
        .layer(
            ServiceBuilder::new().layer(Extension(providers)).layer(
                TraceLayer::new_for_http()
                    .make_span_with(|request: &Request<axum::body::Body>| {
                        info_span!(
                            "HTTP Request",
                            method = %request.method(),
                            uri = %request.uri(),
                        )
                    })
                    .on_response(
                        |response: &Response, latency: std::time::Duration, span: &Span| {
                            span.record("status_code", response.status().as_u16());
                            tracing::info!(
                                status_code = response.status().as_u16(),
                                latency = ?latency,
                                "HTTP Response"
                            );
                        },
                    ),
            ),
        )
}
