//! GitHub metric fetcher: one typed GraphQL query per metric.

use serde::Deserialize;
use serde_json::json;

use super::{http_client, RepositoryHost};
use crate::error::FetchError;

pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

const FORK_QUERY: &str = "query($owner: String!, $repo: String!) \
    { repository(owner: $owner, name: $repo) { forks { totalCount } } }";

const ISSUE_QUERY: &str = "query($owner: String!, $repo: String!, $states: [IssueState!]) \
    { repository(owner: $owner, name: $repo) { issues(states: $states) { totalCount } } }";

const PULL_REQUEST_QUERY: &str =
    "query($owner: String!, $repo: String!, $states: [PullRequestState!]) \
    { repository(owner: $owner, name: $repo) { pullRequests(states: $states) { totalCount } } }";

const STARGAZER_QUERY: &str = "query($owner: String!, $repo: String!) \
    { repository(owner: $owner, name: $repo) { stargazers { totalCount } } }";

pub struct GithubClient {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(endpoint: String, token: Option<String>) -> Self {
        Self {
            client: http_client(),
            endpoint,
            token,
        }
    }

    async fn query<T: for<'de> Deserialize<'de>>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, FetchError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let body: GraphQlResponse<T> = response.json().await?;
        if let Some(error) = body.errors.unwrap_or_default().into_iter().next() {
            return Err(FetchError::Payload(error.message));
        }
        body.data
            .ok_or_else(|| FetchError::Payload("GraphQL response without data".to_string()))
    }

    /// The query always carries an explicit states list; an unrecognized
    /// filter counts every state rather than dropping the argument.
    fn issue_states(state: Option<&str>) -> &'static [&'static str] {
        match state {
            Some("open") => &["OPEN"],
            Some("closed") => &["CLOSED"],
            _ => &["OPEN", "CLOSED"],
        }
    }

    fn pull_request_states(state: Option<&str>) -> &'static [&'static str] {
        match state {
            Some("open") => &["OPEN"],
            Some("closed") => &["CLOSED"],
            Some("merged") => &["MERGED"],
            _ => &["OPEN", "CLOSED", "MERGED"],
        }
    }
}

impl RepositoryHost for GithubClient {
    async fn fork_count(&self, owner: &str, repo: &str) -> Result<u64, FetchError> {
        let data: ForkData = self
            .query(FORK_QUERY, json!({ "owner": owner, "repo": repo }))
            .await?;
        Ok(data.repository.forks.total_count)
    }

    async fn issue_count(
        &self,
        owner: &str,
        repo: &str,
        state: Option<&str>,
    ) -> Result<u64, FetchError> {
        let states = Self::issue_states(state);
        let data: IssueData = self
            .query(
                ISSUE_QUERY,
                json!({ "owner": owner, "repo": repo, "states": states }),
            )
            .await?;
        Ok(data.repository.issues.total_count)
    }

    async fn pull_request_count(
        &self,
        owner: &str,
        repo: &str,
        state: Option<&str>,
    ) -> Result<u64, FetchError> {
        let states = Self::pull_request_states(state);
        let data: PullRequestData = self
            .query(
                PULL_REQUEST_QUERY,
                json!({ "owner": owner, "repo": repo, "states": states }),
            )
            .await?;
        Ok(data.repository.pull_requests.total_count)
    }

    async fn stargazer_count(&self, owner: &str, repo: &str) -> Result<u64, FetchError> {
        let data: StargazerData = self
            .query(STARGAZER_QUERY, json!({ "owner": owner, "repo": repo }))
            .await?;
        Ok(data.repository.stargazers.total_count)
    }
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct TotalCount {
    #[serde(rename = "totalCount")]
    total_count: u64,
}

#[derive(Deserialize)]
struct ForkData {
    repository: ForkRepository,
}

#[derive(Deserialize)]
struct ForkRepository {
    forks: TotalCount,
}

#[derive(Deserialize)]
struct IssueData {
    repository: IssueRepository,
}

#[derive(Deserialize)]
struct IssueRepository {
    issues: TotalCount,
}

#[derive(Deserialize)]
struct PullRequestData {
    repository: PullRequestRepository,
}

#[derive(Deserialize)]
struct PullRequestRepository {
    #[serde(rename = "pullRequests")]
    pull_requests: TotalCount,
}

#[derive(Deserialize)]
struct StargazerData {
    repository: StargazerRepository,
}

#[derive(Deserialize)]
struct StargazerRepository {
    stargazers: TotalCount,
}
