use chrono::Utc;

/// An issue or pull request.
///
/// For convenience, since issues and pull requests share most of their
/// fields, this struct is used for both. The `pull_request` field can be used
/// to determine which it is.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub updated_at: chrono::DateTime<Utc>,
    pub labels: Vec<Label>,
    /// Indicator if this is a pull request.
    ///
    /// The issues listing returns pull requests too; GitHub sets this field
    /// only on those.
    #[serde(default)]
    pub pull_request: Option<PullRequestDetails>,
    /// Whether it is open or closed.
    pub state: IssueState,
}

#[derive(PartialEq, Eq, Debug, Clone, Ord, PartialOrd, serde::Deserialize)]
pub struct Label {
    pub name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Label {
        Label { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, serde::Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

/// Present on the listing entries that are pull requests.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct PullRequestDetails {}

impl Issue {
    pub fn is_pr(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    /// Names of the labels on this issue, minus `excluded`, in tracker order.
    pub fn label_names_except<'a>(&'a self, excluded: &'a str) -> impl Iterator<Item = &'a str> {
        self.labels
            .iter()
            .map(|l| l.name.as_str())
            .filter(move |name| *name != excluded)
    }
}

/// Filter for listing issues in a repository.
pub struct Query<'a> {
    // key/value filter, e.g. `("state", "all")`
    pub filters: Vec<(&'a str, &'a str)>,
    pub include_labels: Vec<&'a str>,
}

impl<'a> Query<'a> {
    /// Issues and pull requests in any state carrying `label`.
    pub fn all_with_label(label: &'a str) -> Query<'a> {
        Query {
            filters: vec![("state", "all")],
            include_labels: vec![label],
        }
    }
}
