//! Triage of issues carrying the "close pending" label.
//!
//! The label marks an issue as scheduled for closing. The runner takes one
//! snapshot of every labelled issue, in any state, and then walks it:
//!
//! * closed issues lose the label, it has no purpose anymore;
//! * open issues (not pull requests) without update for more than
//!   [`Policy::max_age_days`] are commented on, closed and unlabelled;
//! * everything else is only reported.
//!
//! One status line per issue is written to the output, plus one notice line
//! per issue that gets mutated.

use crate::github::{Issue, Query};
use crate::tracker::{IssueTracker, Mutation};
use anyhow::Context;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use itertools::Itertools;
use std::io::Write;
use tracing as log;

/// The label that marks an issue as waiting to be closed.
pub const DEFAULT_LABEL: &str = "close pending";
/// Open issues not updated for more days than this are closed.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    /// The sentinel label, used both to select issues and as the label removed.
    pub label: String,
    /// Open issues are closed once strictly older than this, in days.
    pub max_age_days: i64,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            label: DEFAULT_LABEL.to_string(),
            max_age_days: DEFAULT_MAX_AGE_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Already closed, only the label is left to remove.
    ClearLabel,
    /// Open for too long without update.
    Close { age: i64 },
    Keep,
}

/// Counts of what a run decided. Decisions are counted in dry-run mode too.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TriageReport {
    pub issues: usize,
    pub labels_cleared: usize,
    pub closed: usize,
}

/// Whole calendar days from the date of `updated_at` to `today`.
pub fn age_in_days(today: NaiveDate, updated_at: DateTime<Utc>) -> i64 {
    i64::from(today.num_days_from_ce()) - i64::from(updated_at.date_naive().num_days_from_ce())
}

impl Policy {
    pub fn decide(&self, issue: &Issue, age: i64) -> Decision {
        // The age is only looked at for open issues.
        if !issue.is_open() {
            Decision::ClearLabel
        } else if age > self.max_age_days && !issue.is_pr() {
            Decision::Close { age }
        } else {
            Decision::Keep
        }
    }

    /// "PR" for pull requests, then the state, then the other labels.
    pub fn describe<'a>(&'a self, issue: &'a Issue) -> Vec<&'a str> {
        let mut comments = Vec::new();
        if issue.is_pr() {
            comments.push("PR");
        }
        comments.push(issue.state.as_str());
        comments.extend(issue.label_names_except(&self.label));
        comments
    }

    pub fn status_line(&self, issue: &Issue, age: i64) -> String {
        format!(
            "#{}: {} ({}), updated {}, {} days ago",
            issue.number,
            issue.title,
            self.describe(issue).iter().format(", "),
            issue.updated_at.format("%Y-%m-%d"),
            age,
        )
    }

    pub fn closing_comment(&self, age: i64) -> String {
        format!(
            "Automatically closed after {age} days without update and \"{}\" label set.",
            self.label
        )
    }
}

/// Runs the triage over every issue labelled with `policy.label`.
///
/// `today` is the reference date for every age computed during the run. With
/// `dry_run` set, the output is the same but `tracker` is never mutated.
pub async fn run<T, W>(
    tracker: &T,
    policy: &Policy,
    today: NaiveDate,
    dry_run: bool,
    out: &mut W,
) -> anyhow::Result<TriageReport>
where
    T: IssueTracker + ?Sized,
    W: Write,
{
    // Collect everything before mutating: removing the label changes what the
    // query matches, which would shift the pages of a live listing.
    let issues = tracker
        .list_issues(&Query::all_with_label(&policy.label))
        .await
        .with_context(|| format!("failed to list {:?} issues", policy.label))?;
    log::info!("{} issue(s) labelled {:?}", issues.len(), policy.label);

    let mut report = TriageReport::default();
    for issue in &issues {
        report.issues += 1;
        let age = age_in_days(today, issue.updated_at);
        writeln!(out, "{}", policy.status_line(issue, age))?;

        match policy.decide(issue, age) {
            Decision::ClearLabel => {
                writeln!(
                    out,
                    "-> issue #{} is already closed, removing {} label",
                    issue.number, policy.label
                )?;
                apply(tracker, issue, Mutation::RemoveLabel(policy.label.clone()), dry_run)
                    .await?;
                report.labels_cleared += 1;
            }
            Decision::Close { age } => {
                writeln!(out, "-> issue #{} is too old, closing it", issue.number)?;
                apply(tracker, issue, Mutation::Comment(policy.closing_comment(age)), dry_run)
                    .await?;
                apply(tracker, issue, Mutation::Close, dry_run).await?;
                apply(tracker, issue, Mutation::RemoveLabel(policy.label.clone()), dry_run)
                    .await?;
                report.closed += 1;
            }
            Decision::Keep => {}
        }
    }

    Ok(report)
}

async fn apply<T>(
    tracker: &T,
    issue: &Issue,
    mutation: Mutation,
    dry_run: bool,
) -> anyhow::Result<()>
where
    T: IssueTracker + ?Sized,
{
    if dry_run {
        log::debug!("dry run, skipping {mutation} on #{}", issue.number);
        return Ok(());
    }
    let what = mutation.to_string();
    tracker
        .mutate(issue, mutation)
        .await
        .with_context(|| format!("failed to {what} on #{}", issue.number))
}
