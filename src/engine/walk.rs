//! The cancellable walk over selected projects and their issues.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::sink::CorpusSink;
use crate::transform;
use crate::types::{STATUS_COMPLETE, STATUS_STOPPED, ScrapeProgress};

use super::observer::ScrapeObserver;
use super::{RunOutcome, ScrapeEngine};

/// Running totals for one run
#[derive(Default)]
struct Tally {
    issues: usize,
    comments: usize,
}

/// State of the walk when the project loop ends
struct WalkResult {
    sink: CorpusSink,
    progress: ScrapeProgress,
    cancelled: bool,
}

/// Run the walk and translate its result into exactly one terminal callback.
pub(super) async fn execute<O>(
    engine: &ScrapeEngine,
    project_keys: &[String],
    observer: &mut O,
    cancel_token: &CancellationToken,
) -> RunOutcome
where
    O: ScrapeObserver,
{
    tracing::info!(
        projects = project_keys.len(),
        "Starting scrape simulation"
    );

    let result = AssertUnwindSafe(walk(engine, project_keys, observer, cancel_token))
        .catch_unwind()
        .await;

    let message = match result {
        Ok(Ok(walked)) => {
            let corpus = walked.sink.finish();
            observer.on_complete(&corpus);

            tracing::info!(
                issues = walked.progress.issues_scraped,
                comments = walked.progress.comments_processed,
                cancelled = walked.cancelled,
                "Scrape simulation finished"
            );

            return if walked.cancelled {
                RunOutcome::Cancelled {
                    corpus,
                    progress: walked.progress,
                }
            } else {
                RunOutcome::Completed {
                    corpus,
                    progress: walked.progress,
                }
            };
        }
        Ok(Err(e)) => e.to_string(),
        Err(panic) => panic_message(panic.as_ref()),
    };

    tracing::error!(error = %message, "An error occurred during scraping simulation");
    observer.on_error(&message);
    RunOutcome::Failed { message }
}

async fn walk<O>(
    engine: &ScrapeEngine,
    project_keys: &[String],
    observer: &mut O,
    cancel_token: &CancellationToken,
) -> Result<WalkResult>
where
    O: ScrapeObserver,
{
    let config = engine.config();
    let total_projects = project_keys.len();
    let mut tally = Tally::default();
    let mut sink = CorpusSink::new();
    let mut seen_keys: HashSet<String> = HashSet::new();

    let snapshot = |tally: &Tally, project: &str, message: String, scanned: usize| {
        ScrapeProgress {
            current_project: project.to_string(),
            status_message: message,
            projects_scanned: scanned,
            issues_scraped: tally.issues,
            comments_processed: tally.comments,
            total_projects,
        }
    };

    'projects: for (index, project_key) in project_keys.iter().enumerate() {
        if cancel_token.is_cancelled() {
            break;
        }

        observer.on_progress(&snapshot(
            &tally,
            project_key,
            format!("Fetching issues for project: {}...", project_key),
            index,
        ))?;

        tokio::time::sleep(config.project_fetch_delay).await;
        if cancel_token.is_cancelled() {
            break;
        }

        let Some(issues) = engine.source.issues(project_key) else {
            tracing::warn!(project = %project_key, "No sample data for project, skipping");
            continue;
        };

        for raw in issues.iter().take(config.issues_per_project) {
            if cancel_token.is_cancelled() {
                break 'projects;
            }

            observer.on_progress(&snapshot(
                &tally,
                project_key,
                format!("Processing issue {}", raw.key),
                index,
            ))?;

            tokio::time::sleep(config.comment_fetch_delay).await;
            if cancel_token.is_cancelled() {
                break 'projects;
            }

            if !seen_keys.insert(raw.key.clone()) {
                tracing::warn!(
                    project = %project_key,
                    issue = %raw.key,
                    "Issue already scraped in this run, skipping"
                );
                continue;
            }

            let comments = engine.source.comments(&raw.key);
            let issue = transform::normalize(raw, comments);
            sink.push(transform::to_corpus_line(&issue)?);

            tally.issues += 1;
            tally.comments += issue.comments.len();

            tracing::debug!(
                project = %project_key,
                issue = %raw.key,
                comments = issue.comments.len(),
                "Scraped issue"
            );
        }

        if cancel_token.is_cancelled() {
            break;
        }

        observer.on_progress(&snapshot(
            &tally,
            project_key,
            format!("Finished scraping {}.", project_key),
            index + 1,
        ))?;
    }

    let cancelled = cancel_token.is_cancelled();
    let message = if cancelled {
        STATUS_STOPPED
    } else {
        STATUS_COMPLETE
    };
    // Cancelled runs also report a full scan count so the bar reads 100%.
    let progress = snapshot(&tally, "", message.to_string(), total_projects);
    observer.on_progress(&progress)?;

    Ok(WalkResult {
        sink,
        progress,
        cancelled,
    })
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("scrape task panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("scrape task panicked: {}", s)
    } else {
        "An unknown error occurred.".to_string()
    }
}
