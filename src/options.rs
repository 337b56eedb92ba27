use crate::errors::OptionsError;
use crate::github::IssueRepository;
use crate::triage::{DEFAULT_LABEL, DEFAULT_MAX_AGE_DAYS, Policy};
use clap::Parser;
use secrecy::SecretString;

/// Closes stale issues labelled "close pending" and clears the label from
/// issues which are already closed.
#[derive(Parser, Debug)]
#[command(name = "close-pending", version)]
pub struct Options {
    /// GitHub repository, as `owner/name`.
    #[arg(long)]
    pub repo: String,

    /// If specified, nothing is modified on GitHub.
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Label marking the issues to process.
    #[arg(long, default_value = DEFAULT_LABEL)]
    pub label: String,

    /// Open issues without update for more days than this are closed.
    #[arg(long, default_value_t = DEFAULT_MAX_AGE_DAYS, value_parser = clap::value_parser!(i64).range(0..))]
    pub max_age: i64,

    /// GitHub token. Defaults to GITHUB_TOKEN, GITHUB_API_TOKEN or the
    /// `github.oauth-token` git setting.
    #[arg(long)]
    pub token: Option<String>,

    /// Log debug messages.
    #[arg(long, short)]
    pub verbose: bool,
}

/// Validated options.
pub struct RunConfig {
    pub repo: IssueRepository,
    pub policy: Policy,
    pub dry_run: bool,
    pub token: Option<SecretString>,
}

impl Options {
    /// Checks the options and turns them into a [`RunConfig`].
    pub fn finalize(self) -> Result<RunConfig, OptionsError> {
        let repo = self.repo.parse::<IssueRepository>()?;
        let label = self.label.trim();
        if label.is_empty() {
            return Err(OptionsError::EmptyLabel);
        }
        if label.contains(',') {
            return Err(OptionsError::LabelWithComma(label.to_string()));
        }
        Ok(RunConfig {
            repo,
            policy: Policy {
                label: label.to_string(),
                max_age_days: self.max_age,
            },
            dry_run: self.dry_run,
            token: self
                .token
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty())
                .map(SecretString::from),
        })
    }
}
