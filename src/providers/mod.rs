//! Provider adapters for the supported source-control hosts.
//!
//! Each adapter implements the same capability set behind
//! [`RepositoryHost`]; everything provider-specific (endpoints, state
//! vocabulary, response shapes) lives inside the adapter.

pub mod bitbucket;
pub mod github;
pub mod gitlab;

pub use bitbucket::BitbucketClient;
pub use github::GithubClient;
pub use gitlab::GitlabClient;

use std::time::Duration;

use crate::error::FetchError;
use crate::state::Metric;

/// Capability set of a source-control host: one fetch per metric, plus a
/// dispatcher keyed by [`Metric`]. Each fetch makes exactly one outbound
/// call; there are no retries and no caching.
#[allow(async_fn_in_trait)]
pub trait RepositoryHost {
    async fn fork_count(&self, owner: &str, repo: &str) -> Result<u64, FetchError>;
    async fn issue_count(
        &self,
        owner: &str,
        repo: &str,
        state: Option<&str>,
    ) -> Result<u64, FetchError>;
    async fn pull_request_count(
        &self,
        owner: &str,
        repo: &str,
        state: Option<&str>,
    ) -> Result<u64, FetchError>;
    async fn stargazer_count(&self, owner: &str, repo: &str) -> Result<u64, FetchError>;

    /// Dispatch a metric to the matching fetcher.
    async fn count(
        &self,
        owner: &str,
        repo: &str,
        metric: Metric,
        state: Option<&str>,
    ) -> Result<u64, FetchError> {
        match metric {
            Metric::Forks => self.fork_count(owner, repo).await,
            Metric::Issues => self.issue_count(owner, repo, state).await,
            Metric::PullRequests => self.pull_request_count(owner, repo, state).await,
            Metric::Stars => self.stargazer_count(owner, repo).await,
        }
    }
}

/// One client per provider, shared read-only across requests.
pub struct Providers {
    pub github: GithubClient,
    pub gitlab: GitlabClient,
    pub bitbucket: BitbucketClient,
}

impl Providers {
    /// Build clients against the public provider endpoints. The GitHub
    /// token is read once by the caller and handed in here, so adapters
    /// never touch process environment themselves.
    pub fn new(github_token: Option<String>) -> Self {
        Self {
            github: GithubClient::new(github::DEFAULT_ENDPOINT.to_string(), github_token),
            gitlab: GitlabClient::new(gitlab::DEFAULT_ENDPOINT.to_string()),
            bitbucket: BitbucketClient::new(bitbucket::DEFAULT_ENDPOINT.to_string()),
        }
    }
}

/// Outbound calls carry a 10 second timeout; an abandoned request must
/// not outlive the response deadline of the request that started it.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("forgebadge/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
