use super::{GithubClient, Issue, Query};
use crate::errors::OptionsError;
use anyhow::Context;
use std::fmt;
use std::str::FromStr;
use tracing as log;
use url::Url;

/// Number of issues requested per page when listing.
const PER_PAGE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRepository {
    pub organization: String,
    pub repository: String,
}

impl fmt::Display for IssueRepository {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.repository)
    }
}

impl FromStr for IssueRepository {
    type Err = OptionsError;

    /// Parses `owner/name`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((organization, repository))
                if !organization.is_empty()
                    && !repository.is_empty()
                    && !repository.contains('/') =>
            {
                Ok(IssueRepository {
                    organization: organization.to_string(),
                    repository: repository.to_string(),
                })
            }
            _ => Err(OptionsError::InvalidRepository(s.to_string())),
        }
    }
}

impl IssueRepository {
    fn url(&self, client: &GithubClient) -> String {
        format!(
            "{}/repos/{}/{}",
            client.api_url, self.organization, self.repository
        )
    }

    /// Builds `{repo_url}/issues/{number}` followed by `segments`, each one
    /// percent-encoded as a single path segment.
    fn issue_url(
        &self,
        client: &GithubClient,
        number: u64,
        segments: &[&str],
    ) -> anyhow::Result<Url> {
        let base = self.url(client);
        let mut url = Url::parse(&base).with_context(|| format!("invalid api url {base}"))?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("api url {base} cannot be a base"))?
            .push("issues")
            .push(&number.to_string())
            .extend(segments);
        Ok(url)
    }

    /// Lists every issue and pull request matching `query`.
    ///
    /// All pages are fetched before returning, so the caller works on a
    /// complete snapshot even if it later changes the labels the query
    /// filters on.
    pub async fn get_issues(
        &self,
        client: &GithubClient,
        query: &Query<'_>,
    ) -> anyhow::Result<Vec<Issue>> {
        let base = format!("{}/issues", self.url(client));
        let mut issues = Vec::new();
        let mut page = 1;
        loop {
            let mut url = Url::parse(&base).with_context(|| format!("invalid api url {base}"))?;
            {
                let mut pairs = url.query_pairs_mut();
                for (key, val) in &query.filters {
                    pairs.append_pair(key, val);
                }
                if !query.include_labels.is_empty() {
                    pairs.append_pair("labels", &query.include_labels.join(","));
                }
                pairs
                    .append_pair("per_page", &PER_PAGE.to_string())
                    .append_pair("page", &page.to_string());
            }

            let new: Vec<Issue> = client
                .json(client.get(url.as_str()))
                .await
                .with_context(|| format!("failed to list issues from {url}"))?;
            let last_page = new.len() < PER_PAGE;
            issues.extend(new);
            if last_page {
                break;
            }
            page += 1;
        }
        log::debug!("{}: {} issues in {} page(s)", self, issues.len(), page);
        Ok(issues)
    }

    pub async fn remove_label(
        &self,
        client: &GithubClient,
        number: u64,
        label: &str,
    ) -> anyhow::Result<()> {
        log::info!("remove_label from {self}#{number}: {label:?}");
        // DELETE /repos/:owner/:repo/issues/:number/labels/:name
        let url = self.issue_url(client, number, &["labels", label])?;
        client
            .send_req(client.delete(url.as_str()))
            .await
            .with_context(|| format!("failed to remove label {label:?} from {self}#{number}"))?;
        Ok(())
    }

    pub async fn post_comment(
        &self,
        client: &GithubClient,
        number: u64,
        body: &str,
    ) -> anyhow::Result<()> {
        log::info!("post_comment on {self}#{number}");
        #[derive(serde::Serialize)]
        struct PostComment<'a> {
            body: &'a str,
        }
        let url = self.issue_url(client, number, &["comments"])?;
        client
            .send_req(client.post(url.as_str()).json(&PostComment { body }))
            .await
            .with_context(|| format!("failed to post comment on {self}#{number}"))?;
        Ok(())
    }

    pub async fn close_issue(&self, client: &GithubClient, number: u64) -> anyhow::Result<()> {
        log::info!("close {self}#{number}");
        #[derive(serde::Serialize)]
        struct CloseIssue<'a> {
            state: &'a str,
        }
        let url = self.issue_url(client, number, &[])?;
        client
            .send_req(
                client
                    .patch(url.as_str())
                    .json(&CloseIssue { state: "closed" }),
            )
            .await
            .with_context(|| format!("failed to close {self}#{number}"))?;
        Ok(())
    }
}
