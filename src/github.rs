pub(crate) mod client;
pub(crate) mod issue;
pub(crate) mod issue_repository;

pub use client::{GithubClient, resolve_token};
pub use issue::*;
pub use issue_repository::IssueRepository;
