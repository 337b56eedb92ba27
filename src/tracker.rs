//! The issue tracker seen by the triage runner.
//!
//! [`IssueTracker`] has two capabilities: list issues by state and label, and
//! apply a [`Mutation`] to one issue. [`GithubTracker`] binds it to a GitHub
//! repository through the REST API.

use crate::github::{GithubClient, Issue, IssueRepository, Query};
use async_trait::async_trait;
use std::fmt;

/// A change applied to one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    RemoveLabel(String),
    Comment(String),
    Close,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mutation::RemoveLabel(name) => write!(f, "remove label {name:?}"),
            Mutation::Comment(_) => f.write_str("post comment"),
            Mutation::Close => f.write_str("close"),
        }
    }
}

#[async_trait]
pub trait IssueTracker {
    async fn list_issues(&self, query: &Query<'_>) -> anyhow::Result<Vec<Issue>>;

    async fn mutate(&self, issue: &Issue, mutation: Mutation) -> anyhow::Result<()>;
}

pub struct GithubTracker<'a> {
    client: &'a GithubClient,
    repo: IssueRepository,
}

impl<'a> GithubTracker<'a> {
    pub fn new(client: &'a GithubClient, repo: IssueRepository) -> Self {
        GithubTracker { client, repo }
    }

    pub fn repository(&self) -> &IssueRepository {
        &self.repo
    }
}

#[async_trait]
impl IssueTracker for GithubTracker<'_> {
    async fn list_issues(&self, query: &Query<'_>) -> anyhow::Result<Vec<Issue>> {
        self.repo.get_issues(self.client, query).await
    }

    async fn mutate(&self, issue: &Issue, mutation: Mutation) -> anyhow::Result<()> {
        match mutation {
            Mutation::RemoveLabel(label) => {
                self.repo
                    .remove_label(self.client, issue.number, &label)
                    .await
            }
            Mutation::Comment(body) => {
                self.repo
                    .post_comment(self.client, issue.number, &body)
                    .await
            }
            Mutation::Close => self.repo.close_issue(self.client, issue.number).await,
        }
    }
}
