//! Provider and metric vocabularies.
//!
//! Each provider names things differently: GitLab serves merge requests
//! where GitHub serves pull requests, and the accepted `state` filter
//! values are disjoint between the two. The tables here are the single
//! place where those vocabularies live; handlers and fetchers stay
//! provider-agnostic.

/// Source-control hosting services this server can badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Github,
    Gitlab,
    Bitbucket,
}

/// The repository quantity a badge reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Forks,
    Issues,
    PullRequests,
    Stars,
}

impl Provider {
    /// Parse the `{request_type}` route segment using this provider's
    /// vocabulary.
    pub fn parse_metric(self, segment: &str) -> Option<Metric> {
        match (self, segment) {
            (_, "forks") => Some(Metric::Forks),
            (_, "issues") => Some(Metric::Issues),
            (_, "stars") => Some(Metric::Stars),
            (Provider::Github | Provider::Bitbucket, "pull-requests") => {
                Some(Metric::PullRequests)
            }
            (Provider::Gitlab, "merge-requests") => Some(Metric::PullRequests),
            _ => None,
        }
    }
}

/// A recognized state filter plus the subject label shown on the badge.
///
/// `filter` is `None` when the requested state was absent or not in the
/// provider's vocabulary; fetchers then count across all states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedState {
    pub filter: Option<&'static str>,
    pub subject: &'static str,
}

const GITHUB_ISSUE_LABELS: &[(&str, &str)] =
    &[("open", "open issues"), ("closed", "closed issues")];

const GITHUB_PULL_REQUEST_LABELS: &[(&str, &str)] = &[
    ("open", "open PRs"),
    ("closed", "closed PRs"),
    ("merged", "merged PRs"),
];

const GITLAB_ISSUE_LABELS: &[(&str, &str)] =
    &[("opened", "opened issues"), ("closed", "closed issues")];

const GITLAB_MERGE_REQUEST_LABELS: &[(&str, &str)] = &[
    ("opened", "opened MRs"),
    ("closed", "closed MRs"),
    ("locked", "locked MRs"),
    ("merged", "merged MRs"),
];

const BITBUCKET_ISSUE_LABELS: &[(&str, &str)] = &[
    ("new", "new issues"),
    ("open", "open issues"),
    ("resolved", "resolved issues"),
    ("closed", "closed issues"),
];

const BITBUCKET_PULL_REQUEST_LABELS: &[(&str, &str)] = &[
    ("open", "open PRs"),
    ("merged", "merged PRs"),
    ("declined", "declined PRs"),
    ("superseded", "superseded PRs"),
];

fn state_labels(
    provider: Provider,
    metric: Metric,
) -> (&'static [(&'static str, &'static str)], &'static str) {
    match (provider, metric) {
        (_, Metric::Forks) => (&[], "forks"),
        (_, Metric::Stars) => (&[], "stars"),
        (Provider::Github, Metric::Issues) => (GITHUB_ISSUE_LABELS, "issues"),
        (Provider::Github, Metric::PullRequests) => (GITHUB_PULL_REQUEST_LABELS, "PRs"),
        (Provider::Gitlab, Metric::Issues) => (GITLAB_ISSUE_LABELS, "issues"),
        (Provider::Gitlab, Metric::PullRequests) => (GITLAB_MERGE_REQUEST_LABELS, "MRs"),
        (Provider::Bitbucket, Metric::Issues) => (BITBUCKET_ISSUE_LABELS, "issues"),
        (Provider::Bitbucket, Metric::PullRequests) => (BITBUCKET_PULL_REQUEST_LABELS, "PRs"),
    }
}

/// Map a raw `state` query value to the provider filter and subject label
/// for this provider/metric pair. Unrecognized or absent values fall back
/// to the all-states label with no filter.
pub fn normalize(provider: Provider, metric: Metric, state: Option<&str>) -> NormalizedState {
    let (labels, fallback) = state_labels(provider, metric);
    if let Some(raw) = state {
        if let Some((value, subject)) = labels.iter().copied().find(|(value, _)| *value == raw) {
            return NormalizedState {
                filter: Some(value),
                subject,
            };
        }
    }
    NormalizedState {
        filter: None,
        subject: fallback,
    }
}
