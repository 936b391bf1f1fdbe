//! Core types for issue-corpus

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A selectable issue-tracker project
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    /// Unique project key (e.g. "SPARK")
    pub key: String,
    /// Human-readable project name
    pub name: String,
    /// Short project description
    pub description: String,
}

impl Project {
    /// Create a new Project
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

// ============================================================================
// Raw tracker records
// ============================================================================

/// `{ "name": ... }` wrapper used by the tracker for status and priority
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedField {
    /// Display name
    pub name: String,
}

/// `{ "displayName": ... }` wrapper used by the tracker for users
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// User display name
    #[serde(rename = "displayName")]
    pub display_name: String,
}

/// `{ "key": ... }` wrapper identifying the owning project
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project key
    pub key: String,
}

/// Field bag of a raw tracker issue
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIssueFields {
    /// Issue title
    pub summary: String,
    /// Long description, may be missing or null
    #[serde(default)]
    pub description: Option<String>,
    /// Workflow status
    pub status: NamedField,
    /// Priority, may be missing or null
    #[serde(default)]
    pub priority: Option<NamedField>,
    /// Reporter, may be missing or null
    #[serde(default)]
    pub reporter: Option<UserRef>,
    /// Assignee, may be missing or null
    #[serde(default)]
    pub assignee: Option<UserRef>,
    /// Creation timestamp (ISO-8601)
    pub created: String,
    /// Last update timestamp (ISO-8601)
    pub updated: String,
    /// Free-form labels
    #[serde(default)]
    pub labels: Vec<String>,
    /// Owning project
    #[serde(default)]
    pub project: Option<ProjectRef>,
}

/// Issue as returned by the tracker's REST API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIssue {
    /// Numeric identifier, as a string
    pub id: String,
    /// Issue key (e.g. "SPARK-38986")
    pub key: String,
    /// Issue fields
    pub fields: RawIssueFields,
}

/// Comment as returned by the tracker's REST API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComment {
    /// Comment author, may be missing or null
    #[serde(default)]
    pub author: Option<UserRef>,
    /// Creation timestamp (ISO-8601)
    pub created: String,
    /// Comment text
    pub body: String,
}

// ============================================================================
// Normalized records
// ============================================================================

/// Comment after defaulting rules have been applied
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedComment {
    /// Author display name ("Unknown" when absent)
    pub author: String,
    /// Creation timestamp
    pub created: String,
    /// Comment text
    pub body: String,
}

/// Flattened issue with all defaults applied
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedIssue {
    /// Numeric identifier
    pub id: String,
    /// Issue key
    pub key: String,
    /// Owning project key
    pub project: String,
    /// Issue title
    pub title: String,
    /// Description ("No description provided." when absent)
    pub description: String,
    /// Workflow status
    pub status: String,
    /// Priority ("N/A" when absent)
    pub priority: String,
    /// Reporter ("Unknown" when absent)
    pub reporter: String,
    /// Assignee; `None` means the issue is explicitly unassigned
    pub assignee: Option<String>,
    /// Creation timestamp
    pub created: String,
    /// Last update timestamp
    pub updated: String,
    /// Labels
    pub labels: Vec<String>,
    /// Comments in tracker order
    pub comments: Vec<NormalizedComment>,
}

// ============================================================================
// Corpus records
// ============================================================================

/// Issue metadata carried by every corpus line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueMetadata {
    /// Numeric identifier
    pub id: String,
    /// Issue key
    pub key: String,
    /// Owning project key
    pub project: String,
    /// Issue title
    pub title: String,
    /// Workflow status
    pub status: String,
    /// Priority
    pub priority: String,
    /// Reporter
    pub reporter: String,
    /// Assignee (serialized as `null` when unassigned)
    pub assignee: Option<String>,
    /// Creation timestamp
    pub created: String,
    /// Last update timestamp
    pub updated: String,
    /// Labels
    pub labels: Vec<String>,
}

/// A generated question/answer pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QnaPair {
    /// Question text
    pub question: String,
    /// Answer text
    pub answer: String,
}

/// Inputs (and, later, outputs) for downstream model tasks
///
/// The `*_output` fields and `qna_pairs` are left empty by the scraper and are
/// omitted from the serialized line until a downstream consumer fills them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedTasks {
    /// Input text for summarization
    pub summarization_input: String,
    /// Summary produced downstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summarization_output: Option<String>,
    /// Input text for classification
    pub classification_input: String,
    /// Class label produced downstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_output: Option<String>,
    /// Context for question answering
    pub qna_context: String,
    /// Question/answer pairs produced downstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qna_pairs: Option<Vec<QnaPair>>,
}

/// One line of the line-delimited JSON corpus
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRecord {
    /// Flattened issue fields
    pub issue_metadata: IssueMetadata,
    /// Title, description and comments joined by blank lines
    pub full_text: String,
    /// Task inputs derived from `full_text`
    pub derived_tasks: DerivedTasks,
}

// ============================================================================
// Progress and events
// ============================================================================

/// Snapshot of a scrape run's progress
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeProgress {
    /// Project currently being walked (empty in terminal snapshots)
    pub current_project: String,
    /// Human-readable status line
    pub status_message: String,
    /// Projects fully finished so far
    pub projects_scanned: usize,
    /// Issues turned into corpus lines so far
    pub issues_scraped: usize,
    /// Comments attached to those issues so far
    pub comments_processed: usize,
    /// Number of projects selected for this run
    pub total_projects: usize,
}

/// Terminal status of a run that walked every selected project
pub const STATUS_COMPLETE: &str = "Scraping complete.";

/// Terminal status of a run that observed its cancellation
pub const STATUS_STOPPED: &str = "Scraping stopped by user.";

impl ScrapeProgress {
    /// Progress shown before any run has started
    pub fn ready() -> Self {
        Self {
            status_message: "Ready to start.".to_string(),
            ..Default::default()
        }
    }

    /// Progress shown between `start` and the first engine snapshot
    pub fn initializing(total_projects: usize) -> Self {
        Self {
            status_message: "Initializing simulation...".to_string(),
            total_projects,
            ..Default::default()
        }
    }

    /// Whether this is the terminal snapshot of a cancelled run
    pub fn is_stopped(&self) -> bool {
        self.current_project.is_empty() && self.status_message == STATUS_STOPPED
    }

    /// Fraction of selected projects finished (0.0 to 100.0)
    pub fn percent(&self) -> f32 {
        if self.total_projects == 0 {
            return 0.0;
        }
        (self.projects_scanned as f32 / self.total_projects as f32) * 100.0
    }
}

/// State of the current (or most recent) scrape session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No run has been started
    #[default]
    Idle,
    /// A run is walking projects
    Running,
    /// The last run walked every project
    Complete,
    /// The last run was stopped by the user
    Stopped,
    /// The last run failed
    Failed,
}

/// Status report for the scrape session
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionStatus {
    /// Session state
    pub state: SessionState,
    /// Latest progress snapshot
    pub progress: ScrapeProgress,
    /// Number of lines in the latest corpus
    pub issue_count: usize,
    /// Hex SHA-256 digest of the latest corpus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corpus_sha256: Option<String>,
    /// Error message of the last failed run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the current or last run started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

/// Result of submitting a corpus to the analysis service
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    /// Analysis text returned by the model
    pub text: String,
    /// Model that produced the analysis
    pub model: String,
    /// When the analysis finished
    pub analyzed_at: DateTime<Utc>,
}

/// Event emitted during the scrape/analysis lifecycle
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A run was started
    ScrapeStarted {
        /// Selected project keys, in walk order
        projects: Vec<String>,
    },

    /// Progress snapshot from the running scrape
    Progress {
        /// The snapshot
        progress: ScrapeProgress,
    },

    /// Run walked every project
    ScrapeComplete {
        /// Number of corpus lines produced
        issues: usize,
        /// Number of comments processed
        comments: usize,
    },

    /// Run was stopped by the user
    ScrapeStopped {
        /// Number of corpus lines produced before stopping
        issues: usize,
        /// Number of comments processed before stopping
        comments: usize,
    },

    /// Run failed
    ScrapeFailed {
        /// Error message
        error: String,
    },

    /// Corpus analysis finished
    AnalysisComplete {
        /// Model that produced the analysis
        model: String,
    },

    /// Corpus analysis failed
    AnalysisFailed {
        /// Error message
        error: String,
    },
}

impl Event {
    /// Name used for the SSE `event:` field
    pub fn kind(&self) -> &'static str {
        match self {
            Event::ScrapeStarted { .. } => "scrape_started",
            Event::Progress { .. } => "progress",
            Event::ScrapeComplete { .. } => "scrape_complete",
            Event::ScrapeStopped { .. } => "scrape_stopped",
            Event::ScrapeFailed { .. } => "scrape_failed",
            Event::AnalysisComplete { .. } => "analysis_complete",
            Event::AnalysisFailed { .. } => "analysis_failed",
        }
    }
}
