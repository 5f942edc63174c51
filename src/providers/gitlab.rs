//! GitLab metric fetcher: REST calls against the v4 API.
//!
//! Fork and star counts come from the project detail body. Issue and
//! merge-request counts come from the `X-Total` header of the paginated
//! listing endpoints, which reports the total across all pages.

use serde::Deserialize;

use super::{http_client, RepositoryHost};
use crate::error::FetchError;

pub const DEFAULT_ENDPOINT: &str = "https://gitlab.com/api/v4";

pub struct GitlabClient {
    client: reqwest::Client,
    base_url: String,
}

/// Subset of the project detail payload this service reads.
#[derive(Debug, Deserialize)]
struct GitlabProject {
    forks_count: u64,
    star_count: u64,
}

impl GitlabClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: http_client(),
            base_url,
        }
    }

    /// GitLab addresses a project by a single `owner%2Frepo` path segment.
    fn project_path(owner: &str, repo: &str) -> String {
        format!("{owner}%2F{repo}")
    }

    async fn project(&self, owner: &str, repo: &str) -> Result<GitlabProject, FetchError> {
        let url = format!(
            "{}/projects/{}",
            self.base_url,
            Self::project_path(owner, repo)
        );
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn listing_total(&self, url: String, state: Option<&str>) -> Result<u64, FetchError> {
        let mut request = self.client.get(url);
        if let Some(state) = state {
            request = request.query(&[("state", state)]);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let total = response
            .headers()
            .get("X-Total")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| FetchError::Payload("missing X-Total header".to_string()))?;
        total
            .parse()
            .map_err(|_| FetchError::Payload(format!("invalid X-Total header: {total}")))
    }
}

impl RepositoryHost for GitlabClient {
    async fn fork_count(&self, owner: &str, repo: &str) -> Result<u64, FetchError> {
        Ok(self.project(owner, repo).await?.forks_count)
    }

    async fn issue_count(
        &self,
        owner: &str,
        repo: &str,
        state: Option<&str>,
    ) -> Result<u64, FetchError> {
        let url = format!(
            "{}/projects/{}/issues",
            self.base_url,
            Self::project_path(owner, repo)
        );
        self.listing_total(url, state).await
    }

    async fn pull_request_count(
        &self,
        owner: &str,
        repo: &str,
        state: Option<&str>,
    ) -> Result<u64, FetchError> {
        let url = format!(
            "{}/projects/{}/merge_requests",
            self.base_url,
            Self::project_path(owner, repo)
        );
        self.listing_total(url, state).await
    }

    async fn stargazer_count(&self, owner: &str, repo: &str) -> Result<u64, FetchError> {
        Ok(self.project(owner, repo).await?.star_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_repo_collapse_into_one_segment() {
        assert_eq!(GitlabClient::project_path("acme", "widget"), "acme%2Fwidget");
    }

    #[test]
    fn project_body_decodes() {
        let project: GitlabProject = serde_json::from_str(
            r#"{"id": 1, "name": "widget", "forks_count": 4, "star_count": 9}"#,
        )
        .unwrap();
        assert_eq!(project.forks_count, 4);
        assert_eq!(project.star_count, 9);
    }
}
