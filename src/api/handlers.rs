use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use utoipa::OpenApi;

use crate::api::types::{AppInfo, BadgeQuery};
use crate::badge::{self, BadgeStyle, ResolvedBadgeParams};
use crate::error::AppError;
use crate::providers::{Providers, RepositoryHost};
use crate::state::{self, Provider};

/// OpenAPI 文档结构体
#[derive(OpenApi)]
#[openapi(
    components(schemas(BadgeStyle, AppInfo)),
    tags(
        (name = "Meta", description = "Meta API Endpoints"),
        (name = "Badge", description = "SVG Badge Endpoints")
    ),
    paths(
        app_info_route,
        static_badge_route,
        github_badge_route,
        gitlab_badge_route,
        bitbucket_badge_route,
    ),
    info(
        title = "Forgebadge API",
        version = env!("CARGO_PKG_VERSION"),
        description = r#"Renders shields.io-style SVG badges for repository metrics
(forks, issues, pull/merge requests, stars) fetched live from GitHub, GitLab or Bitbucket.
Badge texts can be overridden with the `color`, `status`, `subject`, `icon` and `style`
query parameters."#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

/// 写出徽章响应
fn badge_response(params: &ResolvedBadgeParams) -> Result<Response, AppError> {
    let svg = badge::render(params)?;
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("image/svg+xml;utf-8"),
    );
    // cache response in browser for 1 hour (3600), CDN for 1 hour (3600)
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600, s-maxage=3600"),
    );
    Ok((StatusCode::OK, headers, svg).into_response())
}

/// 静态徽章接口
#[utoipa::path(
    get,
    summary = "Static badge",
    description = "Renders a badge shaped entirely by the query parameters; no provider API is called.",
    path = "/static",
    tag = "Badge",
    params(BadgeQuery),
    responses(
        (status = 200, description = "SVG badge.", content_type = "image/svg+xml", body = String),
        (status = 500, description = "Renderer rejected the parameters.", body = String)
    )
)]
pub async fn static_badge_route(Query(query): Query<BadgeQuery>) -> Result<Response, AppError> {
    badge_response(&badge::resolve_static(&query.overrides()))
}

/// GitHub 仓库徽章接口
#[utoipa::path(
    get,
    summary = "GitHub repository badge",
    description = "Fetches the requested metric from the GitHub GraphQL API and renders it as an SVG badge. A fetch failure still yields a badge whose status text is the error message.",
    path = "/github/{owner}/{repo}/{request_type}",
    tag = "Badge",
    params(
        ("owner" = String, Path, description = "Repository owner."),
        ("repo" = String, Path, description = "Repository name."),
        ("request_type" = String, Path, description = "forks | issues | pull-requests | stars"),
        BadgeQuery
    ),
    responses(
        (status = 200, description = "SVG badge.", content_type = "image/svg+xml", body = String),
        (status = 404, description = "Unknown request type.", body = String),
        (status = 500, description = "Renderer rejected the parameters.", body = String)
    )
)]
pub async fn github_badge_route(
    Path((owner, repo, request_type)): Path<(String, String, String)>,
    Query(query): Query<BadgeQuery>,
    Extension(providers): Extension<Arc<Providers>>,
) -> Result<Response, AppError> {
    let metric = Provider::Github
        .parse_metric(&request_type)
        .ok_or(AppError::UnknownRequestType(request_type))?;
    let normalized = state::normalize(Provider::Github, metric, query.state.as_deref());
    let outcome = providers
        .github
        .count(&owner, &repo, metric, normalized.filter)
        .await;
    badge_response(&badge::resolve(
        normalized.subject,
        outcome,
        &query.overrides(),
    ))
}

/// GitLab 仓库徽章接口
#[utoipa::path(
    get,
    summary = "GitLab project badge",
    description = "Fetches the requested metric from the GitLab v4 REST API and renders it as an SVG badge. A fetch failure still yields a badge whose status text is the error message.",
    path = "/gitlab/{owner}/{repo}/{request_type}",
    tag = "Badge",
    params(
        ("owner" = String, Path, description = "Project namespace."),
        ("repo" = String, Path, description = "Project name."),
        ("request_type" = String, Path, description = "forks | issues | merge-requests | stars"),
        BadgeQuery
    ),
    responses(
        (status = 200, description = "SVG badge.", content_type = "image/svg+xml", body = String),
        (status = 404, description = "Unknown request type.", body = String),
        (status = 500, description = "Renderer rejected the parameters.", body = String)
    )
)]
pub async fn gitlab_badge_route(
    Path((owner, repo, request_type)): Path<(String, String, String)>,
    Query(query): Query<BadgeQuery>,
    Extension(providers): Extension<Arc<Providers>>,
) -> Result<Response, AppError> {
    let metric = Provider::Gitlab
        .parse_metric(&request_type)
        .ok_or(AppError::UnknownRequestType(request_type))?;
    let normalized = state::normalize(Provider::Gitlab, metric, query.state.as_deref());
    let outcome = providers
        .gitlab
        .count(&owner, &repo, metric, normalized.filter)
        .await;
    badge_response(&badge::resolve(
        normalized.subject,
        outcome,
        &query.overrides(),
    ))
}

/// Bitbucket 仓库徽章接口
#[utoipa::path(
    get,
    summary = "Bitbucket repository badge",
    description = "Fetches the requested metric from the Bitbucket 2.0 REST API and renders it as an SVG badge. A fetch failure still yields a badge whose status text is the error message.",
    path = "/bitbucket/{owner}/{repo}/{request_type}",
    tag = "Badge",
    params(
        ("owner" = String, Path, description = "Repository workspace."),
        ("repo" = String, Path, description = "Repository name."),
        ("request_type" = String, Path, description = "forks | issues | pull-requests | stars"),
        BadgeQuery
    ),
    responses(
        (status = 200, description = "SVG badge.", content_type = "image/svg+xml", body = String),
        (status = 404, description = "Unknown request type.", body = String),
        (status = 500, description = "Renderer rejected the parameters.", body = String)
    )
)]
pub async fn bitbucket_badge_route(
    Path((owner, repo, request_type)): Path<(String, String, String)>,
    Query(query): Query<BadgeQuery>,
    Extension(providers): Extension<Arc<Providers>>,
) -> Result<Response, AppError> {
    let metric = Provider::Bitbucket
        .parse_metric(&request_type)
        .ok_or(AppError::UnknownRequestType(request_type))?;
    let normalized = state::normalize(Provider::Bitbucket, metric, query.state.as_deref());
    let outcome = providers
        .bitbucket
        .count(&owner, &repo, metric, normalized.filter)
        .await;
    badge_response(&badge::resolve(
        normalized.subject,
        outcome,
        &query.overrides(),
    ))
}

/// 应用信息接口
#[utoipa::path(
    get,
    summary = "App Info",
    description = "Returns information about the application.",
    path = "/",
    responses(
        (status = 200, description = "Returns information about the application.", body = AppInfo,
         example = json!({ "project_name": "Forgebadge", "version": "0.1.0", "docs_path": "/scalar" }))
    ),
    tag = "Meta"
)]
pub async fn app_info_route() -> impl IntoResponse {
    let info = AppInfo {
        project_name: "Forgebadge".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs_path: "/scalar".to_string(),
    };
    Json(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_router;
    use crate::providers::{BitbucketClient, GithubClient, GitlabClient};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::{get, post};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Serve a mock upstream on an ephemeral port, returning its base URL.
    async fn serve_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// A GraphQL endpoint that answers every query with the given data.
    async fn github_upstream(data: Value) -> String {
        serve_upstream(Router::new().route(
            "/graphql",
            post(move || {
                let data = data.clone();
                async move { Json(json!({ "data": data })) }
            }),
        ))
        .await
    }

    fn app(github_base: &str, gitlab_base: &str, bitbucket_base: &str) -> Router {
        let providers = Arc::new(Providers {
            github: GithubClient::new(
                format!("{github_base}/graphql"),
                Some("test-token".to_string()),
            ),
            gitlab: GitlabClient::new(gitlab_base.to_string()),
            bitbucket: BitbucketClient::new(bitbucket_base.to_string()),
        });
        create_router(providers)
    }

    /// Unreachable upstream: connections to port 1 are refused immediately.
    const DEAD: &str = "http://127.0.0.1:1";

    async fn get_badge(app: Router, uri: &str) -> (StatusCode, HeaderMap, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn github_stars_render_the_count() {
        let github = github_upstream(json!({
            "repository": { "stargazers": { "totalCount": 42 } }
        }))
        .await;
        let app = app(&github, DEAD, DEAD);

        let (status, headers, body) = get_badge(app, "/github/octocat/hello-world/stars").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "image/svg+xml;utf-8");
        assert_eq!(
            headers[header::CACHE_CONTROL],
            "public, max-age=3600, s-maxage=3600"
        );
        assert!(body.contains("<svg"));
        assert!(body.contains("stars"));
        assert!(body.contains("42"));
    }

    #[tokio::test]
    async fn github_overrides_win_over_the_fetched_count() {
        let github = github_upstream(json!({
            "repository": { "forks": { "totalCount": 5 } }
        }))
        .await;
        let app = app(&github, DEAD, DEAD);

        let (status, _, body) =
            get_badge(app, "/github/a/b/forks?color=orange&status=99").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("99"));
    }

    #[tokio::test]
    async fn gitlab_closed_issues_come_from_the_x_total_header() {
        let gitlab = serve_upstream(Router::new().route(
            "/projects/{path}/issues",
            get(|| async { ([("X-Total", "7")], Json(json!([]))) }),
        ))
        .await;
        let app = app(DEAD, &gitlab, DEAD);

        let (status, _, body) = get_badge(app, "/gitlab/acme/widget/issues?state=closed").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("closed issues"));
        assert!(body.contains("7"));
    }

    #[tokio::test]
    async fn gitlab_stars_come_from_the_project_body() {
        let gitlab = serve_upstream(Router::new().route(
            "/projects/{path}",
            get(|| async { Json(json!({ "forks_count": 4, "star_count": 9 })) }),
        ))
        .await;
        let app = app(DEAD, &gitlab, DEAD);

        let (status, _, body) = get_badge(app, "/gitlab/acme/widget/stars").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("stars"));
        assert!(body.contains("9"));
    }

    #[tokio::test]
    async fn bitbucket_stars_count_watchers() {
        let bitbucket = serve_upstream(Router::new().route(
            "/repositories/{owner}/{repo}/watchers",
            get(|| async { Json(json!({ "size": 12, "values": [] })) }),
        ))
        .await;
        let app = app(DEAD, DEAD, &bitbucket);

        let (status, _, body) = get_badge(app, "/bitbucket/team/repo/stars").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("12"));
    }

    #[tokio::test]
    async fn fetch_failure_still_renders_a_badge() {
        let app = app(DEAD, DEAD, DEAD);

        let (status, headers, body) = get_badge(app, "/gitlab/acme/widget/forks").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "image/svg+xml;utf-8");
        assert!(body.contains("<svg"));
    }

    #[tokio::test]
    async fn unknown_style_is_a_server_error() {
        let app = app(DEAD, DEAD, DEAD);

        let (status, _, body) = get_badge(app, "/static?subject=build&style=bogus").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal Server Error");
    }

    #[tokio::test]
    async fn unknown_request_type_is_not_found() {
        let app = app(DEAD, DEAD, DEAD);

        let (status, _, _) = get_badge(app.clone(), "/github/a/b/branches").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // "pull-requests" is GitHub vocabulary, not GitLab's
        let (status, _, _) = get_badge(app, "/gitlab/a/b/pull-requests").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn static_badge_is_shaped_by_the_query() {
        let app = app(DEAD, DEAD, DEAD);

        let (status, _, body) = get_badge(app, "/static?subject=docs&status=latest").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("docs"));
        assert!(body.contains("latest"));
    }

    #[tokio::test]
    async fn identical_requests_render_identical_markup() {
        let github = github_upstream(json!({
            "repository": { "stargazers": { "totalCount": 42 } }
        }))
        .await;
        let app = app(&github, DEAD, DEAD);

        let (_, _, first) = get_badge(app.clone(), "/github/octocat/hello-world/stars").await;
        let (_, _, second) = get_badge(app, "/github/octocat/hello-world/stars").await;
        assert_eq!(first, second);
    }
}
