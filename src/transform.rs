//! Raw tracker records → normalized issues → corpus lines.

use crate::error::Result;
use crate::types::{
    CorpusRecord, DerivedTasks, IssueMetadata, NormalizedComment, NormalizedIssue, RawComment,
    RawIssue,
};

/// Description used when an issue has none
pub const NO_DESCRIPTION: &str = "No description provided.";

/// Priority used when an issue has none
pub const NO_PRIORITY: &str = "N/A";

/// Display name used when a reporter or comment author is missing
pub const UNKNOWN_USER: &str = "Unknown";

/// Separator between the parts of `full_text`
const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Flatten a raw issue and its comments, applying the defaulting rules.
pub fn normalize(raw: &RawIssue, comments: &[RawComment]) -> NormalizedIssue {
    let fields = &raw.fields;

    let project = match &fields.project {
        Some(p) => p.key.clone(),
        None => raw
            .key
            .split_once('-')
            .map_or(raw.key.as_str(), |(prefix, _)| prefix)
            .to_string(),
    };

    let description = non_empty(fields.description.as_deref())
        .unwrap_or(NO_DESCRIPTION)
        .to_string();

    NormalizedIssue {
        id: raw.id.clone(),
        key: raw.key.clone(),
        project,
        title: fields.summary.clone(),
        description,
        status: fields.status.name.clone(),
        priority: non_empty(fields.priority.as_ref().map(|p| p.name.as_str()))
            .unwrap_or(NO_PRIORITY)
            .to_string(),
        reporter: non_empty(fields.reporter.as_ref().map(|u| u.display_name.as_str()))
            .unwrap_or(UNKNOWN_USER)
            .to_string(),
        assignee: non_empty(fields.assignee.as_ref().map(|u| u.display_name.as_str()))
            .map(str::to_string),
        created: fields.created.clone(),
        updated: fields.updated.clone(),
        labels: fields.labels.clone(),
        comments: comments.iter().map(normalize_comment).collect(),
    }
}

/// Empty strings count as missing
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn normalize_comment(raw: &RawComment) -> NormalizedComment {
    NormalizedComment {
        author: non_empty(raw.author.as_ref().map(|u| u.display_name.as_str()))
            .unwrap_or(UNKNOWN_USER)
            .to_string(),
        created: raw.created.clone(),
        body: raw.body.clone(),
    }
}

/// Title, description and one line per comment, separated by blank lines.
pub fn full_text(issue: &NormalizedIssue) -> String {
    let mut parts = Vec::with_capacity(2 + issue.comments.len());
    parts.push(format!("Title: {}", issue.title));
    parts.push(format!("Description: {}", issue.description));
    parts.extend(
        issue
            .comments
            .iter()
            .map(|c| format!("Comment by {}: {}", c.author, c.body)),
    );
    parts.join(PARAGRAPH_SEPARATOR)
}

/// Build the corpus record for a normalized issue.
pub fn to_corpus_record(issue: &NormalizedIssue) -> CorpusRecord {
    let text = full_text(issue);

    CorpusRecord {
        issue_metadata: IssueMetadata {
            id: issue.id.clone(),
            key: issue.key.clone(),
            project: issue.project.clone(),
            title: issue.title.clone(),
            status: issue.status.clone(),
            priority: issue.priority.clone(),
            reporter: issue.reporter.clone(),
            assignee: issue.assignee.clone(),
            created: issue.created.clone(),
            updated: issue.updated.clone(),
            labels: issue.labels.clone(),
        },
        derived_tasks: DerivedTasks {
            summarization_input: text.clone(),
            summarization_output: None,
            classification_input: text.clone(),
            classification_output: None,
            qna_context: text.clone(),
            qna_pairs: None,
        },
        full_text: text,
    }
}

/// Serialize a normalized issue as one NDJSON line (no trailing newline).
///
/// Keys follow struct declaration order, so identical input always produces
/// an identical line.
pub fn to_corpus_line(issue: &NormalizedIssue) -> Result<String> {
    Ok(serde_json::to_string(&to_corpus_record(issue))?)
}
