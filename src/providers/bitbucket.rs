//! Bitbucket metric fetcher: REST calls against the 2.0 API.
//!
//! List endpoints report their across-pages total in the body `size`
//! field. Stars map to Bitbucket watchers, the closest equivalent.

use serde::Deserialize;

use super::{http_client, RepositoryHost};
use crate::error::FetchError;

pub const DEFAULT_ENDPOINT: &str = "https://api.bitbucket.org/2.0";

pub struct BitbucketClient {
    client: reqwest::Client,
    base_url: String,
}

/// Paginated list envelope; only the total is read.
#[derive(Debug, Deserialize)]
struct PagedList {
    size: u64,
}

impl BitbucketClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: http_client(),
            base_url,
        }
    }

    async fn list_size(
        &self,
        url: String,
        query: Option<(&str, String)>,
    ) -> Result<u64, FetchError> {
        let mut request = self.client.get(url);
        if let Some((name, value)) = query {
            request = request.query(&[(name, value)]);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let list: PagedList = response.json().await?;
        Ok(list.size)
    }

    /// Pull-request state filters are uppercase on the wire.
    fn pull_request_state(state: &str) -> String {
        state.to_ascii_uppercase()
    }
}

impl RepositoryHost for BitbucketClient {
    async fn fork_count(&self, owner: &str, repo: &str) -> Result<u64, FetchError> {
        let url = format!("{}/repositories/{owner}/{repo}/forks", self.base_url);
        self.list_size(url, None).await
    }

    async fn issue_count(
        &self,
        owner: &str,
        repo: &str,
        state: Option<&str>,
    ) -> Result<u64, FetchError> {
        let url = format!("{}/repositories/{owner}/{repo}/issues", self.base_url);
        let query = state.map(|state| ("q", format!("state=\"{state}\"")));
        self.list_size(url, query).await
    }

    async fn pull_request_count(
        &self,
        owner: &str,
        repo: &str,
        state: Option<&str>,
    ) -> Result<u64, FetchError> {
        let url = format!("{}/repositories/{owner}/{repo}/pullrequests", self.base_url);
        let query = state.map(|state| ("state", Self::pull_request_state(state)));
        self.list_size(url, query).await
    }

    async fn stargazer_count(&self, owner: &str, repo: &str) -> Result<u64, FetchError> {
        let url = format!("{}/repositories/{owner}/{repo}/watchers", self.base_url);
        self.list_size(url, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_request_states_go_uppercase() {
        assert_eq!(BitbucketClient::pull_request_state("open"), "OPEN");
        assert_eq!(BitbucketClient::pull_request_state("superseded"), "SUPERSEDED");
    }

    #[test]
    fn list_envelope_decodes() {
        let list: PagedList =
            serde_json::from_str(r#"{"pagelen": 10, "size": 42, "values": []}"#).unwrap();
        assert_eq!(list.size, 42);
    }
}
