//! Read-only record store backing the scrape simulation.
//!
//! The store holds, per project key, the ordered list of raw issues and the
//! comments keyed by issue key. Lookups never fail: an unknown project yields
//! `None` and an issue without comments yields an empty slice.

use crate::error::Result;
use crate::types::{RawComment, RawIssue};
use serde::Deserialize;
use std::collections::HashMap;

/// Sample data captured from the public Apache Jira API
const SAMPLE_DATA: &str = include_str!("../data/sample_issues.json");

/// Source of raw tracker records for the scrape engine
pub trait RecordSource: Send + Sync {
    /// Ordered raw issues for a project, or `None` if the project is unknown
    fn issues(&self, project_key: &str) -> Option<&[RawIssue]>;

    /// Ordered raw comments for an issue (empty if none exist)
    fn comments(&self, issue_key: &str) -> &[RawComment];
}

/// Per-project records as laid out in the sample JSON
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectRecords {
    /// Issues in tracker order
    #[serde(default)]
    pub issues: Vec<RawIssue>,
    /// Comments keyed by issue key
    #[serde(default)]
    pub comments: HashMap<String, Vec<RawComment>>,
}

/// In-memory, read-only record store
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    issues: HashMap<String, Vec<RawIssue>>,
    comments: HashMap<String, Vec<RawComment>>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// The embedded Apache sample dataset
    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE_DATA)
    }

    /// Parse a `{ "<PROJECT>": { "issues": [...], "comments": {...} } }` document
    pub fn from_json(json: &str) -> Result<Self> {
        let projects: HashMap<String, ProjectRecords> = serde_json::from_str(json)?;
        let mut store = Self::new();
        for (key, records) in projects {
            store.insert_project(key, records);
        }
        Ok(store)
    }

    /// Add (or replace) a project's records
    pub fn insert_project(&mut self, key: impl Into<String>, records: ProjectRecords) {
        let key = key.into();
        tracing::debug!(
            project = %key,
            issues = records.issues.len(),
            "Loaded project records"
        );
        self.comments.extend(records.comments);
        self.issues.insert(key, records.issues);
    }

    /// Project keys present in the store, sorted
    pub fn project_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.issues.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Whether the store knows the given project
    pub fn contains_project(&self, project_key: &str) -> bool {
        self.issues.contains_key(project_key)
    }
}

impl RecordSource for RecordStore {
    fn issues(&self, project_key: &str) -> Option<&[RawIssue]> {
        self.issues.get(project_key).map(Vec::as_slice)
    }

    fn comments(&self, issue_key: &str) -> &[RawComment] {
        self.comments
            .get(issue_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
