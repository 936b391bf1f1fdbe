//! Configuration types for issue-corpus

use crate::error::{Error, Result};
use crate::types::Project;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, time::Duration};
use utoipa::ToSchema;

/// Scrape simulation settings
///
/// The two delays stand in for network latency: one per project (issue
/// search) and one per issue (comment fetch).
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ScrapeConfig {
    /// Maximum issues taken from each project (default: 20)
    #[serde(default = "default_issues_per_project")]
    pub issues_per_project: usize,

    /// Simulated latency of fetching a project's issues (default: 500ms)
    #[serde(
        default = "default_project_fetch_delay",
        with = "duration_ms_serde"
    )]
    #[schema(value_type = u64)]
    pub project_fetch_delay: Duration,

    /// Simulated latency of fetching an issue's comments (default: 50ms)
    #[serde(
        default = "default_comment_fetch_delay",
        with = "duration_ms_serde"
    )]
    #[schema(value_type = u64)]
    pub comment_fetch_delay: Duration,

    /// Capacity of the event broadcast channel (default: 1000)
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            issues_per_project: default_issues_per_project(),
            project_fetch_delay: default_project_fetch_delay(),
            comment_fetch_delay: default_comment_fetch_delay(),
            event_buffer: default_event_buffer(),
        }
    }
}

/// Text-analysis service settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalysisConfig {
    /// Base URL of the generative language API
    #[serde(default = "default_analysis_base_url")]
    pub base_url: String,

    /// Model used for analysis (default: "gemini-2.5-flash")
    #[serde(default = "default_analysis_model")]
    pub model: String,

    /// API key; when unset, `GEMINI_API_KEY` and then `API_KEY` are read from the environment
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout (default: 60 seconds)
    #[serde(default = "default_analysis_timeout", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: default_analysis_base_url(),
            model: default_analysis_model(),
            api_key: None,
            timeout: default_analysis_timeout(),
        }
    }
}

impl AnalysisConfig {
    /// Resolve the API key from config or environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// Retry configuration for transient failures
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 30 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// REST API settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind the API server (default: 127.0.0.1:6790)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Serve Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Main configuration for CorpusCreator
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Scrape simulation settings
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Selectable project catalog
    #[serde(default = "default_projects")]
    pub projects: Vec<Project>,

    /// Analysis service settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Retry settings for the analysis service
    #[serde(default)]
    pub retry: RetryConfig,

    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scrape: ScrapeConfig::default(),
            projects: default_projects(),
            analysis: AnalysisConfig::default(),
            retry: RetryConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file '{}': {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot enforce
    pub fn validate(&self) -> Result<()> {
        if self.scrape.issues_per_project == 0 {
            return Err(Error::Config {
                message: "issues_per_project must be at least 1".to_string(),
                key: Some("scrape.issues_per_project".to_string()),
            });
        }
        if self.scrape.event_buffer == 0 {
            return Err(Error::Config {
                message: "event_buffer must be at least 1".to_string(),
                key: Some("scrape.event_buffer".to_string()),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for project in &self.projects {
            if project.key.trim().is_empty() {
                return Err(Error::Config {
                    message: "project key must not be empty".to_string(),
                    key: Some("projects".to_string()),
                });
            }
            if !seen.insert(project.key.as_str()) {
                return Err(Error::Config {
                    message: format!("duplicate project key '{}'", project.key),
                    key: Some("projects".to_string()),
                });
            }
        }

        if url::Url::parse(&self.analysis.base_url).is_err() {
            return Err(Error::Config {
                message: format!("invalid analysis base_url '{}'", self.analysis.base_url),
                key: Some("analysis.base_url".to_string()),
            });
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(Error::Config {
                message: "backoff_multiplier must be >= 1.0".to_string(),
                key: Some("retry.backoff_multiplier".to_string()),
            });
        }
        Ok(())
    }

    /// Look up a catalog project by key
    pub fn project(&self, key: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.key == key)
    }
}

/// The Apache projects offered for selection by default
pub fn apache_projects() -> Vec<Project> {
    vec![
        Project::new(
            "SPARK",
            "Apache Spark",
            "A unified analytics engine for large-scale data processing.",
        ),
        Project::new(
            "KAFKA",
            "Apache Kafka",
            "A distributed event streaming platform.",
        ),
        Project::new(
            "HADOOP",
            "Apache Hadoop",
            "Framework for distributed storage and processing of big data.",
        ),
        Project::new(
            "FLINK",
            "Apache Flink",
            "A framework and distributed processing engine for stateful computations.",
        ),
        Project::new(
            "BEAM",
            "Apache Beam",
            "An advanced unified programming model for batch and streaming data.",
        ),
        Project::new(
            "AIRFLOW",
            "Apache Airflow",
            "A platform to programmatically author, schedule, and monitor workflows.",
        ),
    ]
}

fn default_projects() -> Vec<Project> {
    apache_projects()
}

fn default_issues_per_project() -> usize {
    20
}

fn default_project_fetch_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_comment_fetch_delay() -> Duration {
    Duration::from_millis(50)
}

fn default_event_buffer() -> usize {
    1000
}

fn default_analysis_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_analysis_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_analysis_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6790))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Duration serialization helper (milliseconds)
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
