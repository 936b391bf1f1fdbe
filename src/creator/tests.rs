use super::*;
use crate::analysis::testing::StubAnalyzer;
use crate::engine::{RunOutcome, ScrapeObserver};
use crate::error::Error;
use crate::types::{ScrapeProgress, SessionState};
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;

fn creator_with(analyzer: StubAnalyzer) -> (CorpusCreator, Arc<StubAnalyzer>) {
    let analyzer = Arc::new(analyzer);
    let creator = CorpusCreator::with_parts(
        Config::default(),
        Arc::new(RecordStore::sample().unwrap()),
        analyzer.clone(),
    )
    .unwrap();
    (creator, analyzer)
}

fn creator() -> CorpusCreator {
    creator_with(StubAnalyzer::replying("analysis text")).0
}

fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return events,
            Err(TryRecvError::Lagged(_)) => continue,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn new_session_is_idle_and_ready() {
    let creator = creator();
    let status = creator.status();

    assert_eq!(status.state, SessionState::Idle);
    assert_eq!(status.progress.status_message, "Ready to start.");
    assert_eq!(status.issue_count, 0);
    assert!(status.corpus_sha256.is_none());
    assert!(matches!(creator.corpus(), Err(Error::NoCorpus)));
    assert_eq!(creator.projects().len(), 6);
}

#[tokio::test(start_paused = true)]
async fn empty_selection_is_rejected() {
    let creator = creator();
    let err = creator.start_scrape(Vec::new()).unwrap_err();

    assert!(matches!(err, Error::NoProjectsSelected));
    assert_eq!(creator.status().state, SessionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn full_session_completes_with_corpus() {
    let creator = creator();
    let mut rx = creator.subscribe();

    let initial = creator.start_scrape(keys(&["SPARK", "KAFKA"])).unwrap();
    assert_eq!(initial.status_message, "Initializing simulation...");
    assert_eq!(initial.total_projects, 2);
    assert_eq!(creator.status().state, SessionState::Running);

    let outcome = creator.wait_for_scrape().await.unwrap().unwrap();
    assert!(matches!(outcome, RunOutcome::Completed { .. }));

    let status = creator.status();
    assert_eq!(status.state, SessionState::Complete);
    assert_eq!(status.issue_count, 3);
    assert_eq!(status.progress.comments_processed, 4);
    assert_eq!(status.progress.status_message, "Scraping complete.");
    assert_eq!(status.corpus_sha256.as_ref().map(String::len), Some(64));
    assert!(status.started_at.is_some());
    assert_eq!(creator.corpus().unwrap().lines().count(), 3);

    let events = drain(&mut rx);
    assert!(matches!(
        events.first(),
        Some(Event::ScrapeStarted { projects }) if projects == &keys(&["SPARK", "KAFKA"])
    ));
    assert!(matches!(
        events.last(),
        Some(Event::ScrapeComplete { issues: 3, comments: 4 })
    ));
    assert!(
        events[1..events.len() - 1]
            .iter()
            .all(|e| matches!(e, Event::Progress { .. }))
    );
}

#[tokio::test(start_paused = true)]
async fn second_start_while_running_is_rejected() {
    let creator = creator();
    creator.start_scrape(keys(&["SPARK"])).unwrap();

    let err = creator.start_scrape(keys(&["KAFKA"])).unwrap_err();
    assert!(matches!(err, Error::ScrapeInProgress));

    creator.wait_for_scrape().await.unwrap();
    // Finished sessions may be restarted
    creator.start_scrape(keys(&["KAFKA"])).unwrap();
    creator.wait_for_scrape().await.unwrap();
    assert_eq!(creator.status().issue_count, 1);
}

#[tokio::test(start_paused = true)]
async fn stop_keeps_partial_corpus_and_reports_stopped() {
    let creator = creator();
    let mut rx = creator.subscribe();
    creator.start_scrape(keys(&["SPARK", "KAFKA"])).unwrap();

    // Stop once the first SPARK issue has been scraped
    loop {
        let event = rx.recv().await.unwrap();
        if let Event::Progress { progress } = &event
            && progress.issues_scraped == 1
        {
            break;
        }
    }
    creator.stop_scrape();
    creator.stop_scrape();

    let outcome = creator.wait_for_scrape().await.unwrap().unwrap();
    assert!(matches!(outcome, RunOutcome::Cancelled { .. }));

    let status = creator.status();
    assert_eq!(status.state, SessionState::Stopped);
    assert_eq!(status.issue_count, 1);
    assert_eq!(status.progress.status_message, "Scraping stopped by user.");
    assert_eq!(status.progress.projects_scanned, 2);

    let events = drain(&mut rx);
    assert!(matches!(
        events.last(),
        Some(Event::ScrapeStopped { issues: 1, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn stop_when_idle_is_a_no_op() {
    let creator = creator();
    creator.stop_scrape();
    assert_eq!(creator.status().state, SessionState::Idle);
    assert!(creator.wait_for_scrape().await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn stop_after_completion_does_not_change_state() {
    let creator = creator();
    creator.start_scrape(keys(&["FLINK"])).unwrap();
    creator.wait_for_scrape().await.unwrap();

    creator.stop_scrape();
    assert_eq!(creator.status().state, SessionState::Complete);
}

#[tokio::test(start_paused = true)]
async fn restart_clears_previous_corpus_until_finished() {
    let creator = creator();
    creator.start_scrape(keys(&["KAFKA"])).unwrap();
    creator.wait_for_scrape().await.unwrap();
    let first_digest = creator.status().corpus_sha256;

    creator.start_scrape(keys(&["HADOOP"])).unwrap();
    assert!(matches!(creator.corpus(), Err(Error::NoCorpus)));

    creator.wait_for_scrape().await.unwrap();
    let second = creator.status();
    assert_ne!(second.corpus_sha256, first_digest);
    assert!(creator.corpus().unwrap().contains("HADOOP-18032"));
}

#[tokio::test(start_paused = true)]
async fn identical_runs_produce_identical_digest() {
    let creator = creator();
    creator.start_scrape(keys(&["SPARK"])).unwrap();
    creator.wait_for_scrape().await.unwrap();
    let first = creator.status().corpus_sha256;

    creator.start_scrape(keys(&["SPARK"])).unwrap();
    creator.wait_for_scrape().await.unwrap();
    assert_eq!(creator.status().corpus_sha256, first);
}

#[tokio::test(start_paused = true)]
async fn analyze_without_corpus_fails() {
    let (creator, analyzer) = creator_with(StubAnalyzer::replying("unused"));
    assert!(matches!(creator.analyze().await, Err(Error::NoCorpus)));

    // An immediately stopped run leaves an empty corpus
    creator.start_scrape(keys(&["SPARK"])).unwrap();
    creator.stop_scrape();
    creator.wait_for_scrape().await.unwrap();
    assert_eq!(creator.corpus().unwrap(), "");
    assert!(matches!(creator.analyze().await, Err(Error::NoCorpus)));

    assert!(analyzer.seen.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn analyze_sends_latest_corpus() {
    let (creator, analyzer) = creator_with(StubAnalyzer::replying("Themes: none"));
    creator.start_scrape(keys(&["KAFKA"])).unwrap();
    creator.wait_for_scrape().await.unwrap();
    let mut rx = creator.subscribe();

    let result = creator.analyze().await.unwrap();
    assert_eq!(result.text, "Themes: none");
    assert_eq!(result.model, "stub-model");
    assert_eq!(analyzer.seen.lock().unwrap()[0], creator.corpus().unwrap());
    assert_eq!(creator.last_analysis().unwrap().text, "Themes: none");

    assert!(matches!(
        drain(&mut rx).as_slice(),
        [Event::AnalysisComplete { model }] if model == "stub-model"
    ));
}

#[tokio::test(start_paused = true)]
async fn analyzer_failure_is_returned_and_broadcast() {
    let (creator, _) = creator_with(StubAnalyzer::failing());
    creator.start_scrape(keys(&["KAFKA"])).unwrap();
    creator.wait_for_scrape().await.unwrap();
    let mut rx = creator.subscribe();

    let err = creator.analyze().await.unwrap_err();
    assert!(matches!(err, Error::Analysis(_)));
    assert!(matches!(
        drain(&mut rx).as_slice(),
        [Event::AnalysisFailed { .. }]
    ));
    // The corpus survives a failed analysis
    assert_eq!(creator.status().state, SessionState::Complete);
}

#[tokio::test(start_paused = true)]
async fn session_progress_tracks_engine_snapshots() {
    let creator = creator();
    creator.start_scrape(keys(&["SPARK"])).unwrap();

    // After the project fetch delay the first issue is being processed
    tokio::time::sleep(Duration::from_millis(510)).await;
    let status = creator.status();
    assert_eq!(status.state, SessionState::Running);
    assert_eq!(status.progress.current_project, "SPARK");
    assert_eq!(status.progress.status_message, "Processing issue SPARK-38986");

    creator.wait_for_scrape().await.unwrap();
}

#[test]
fn new_rejects_invalid_config() {
    let mut config = Config::default();
    config.scrape.issues_per_project = 0;
    assert!(matches!(
        CorpusCreator::new(config),
        Err(Error::Config { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn restart_discards_previous_analysis() {
    let (creator, _) = creator_with(StubAnalyzer::replying("Themes: none"));
    creator.start_scrape(keys(&["KAFKA"])).unwrap();
    creator.wait_for_scrape().await.unwrap();
    creator.analyze().await.unwrap();
    assert!(creator.last_analysis().is_some());

    creator.start_scrape(keys(&["KAFKA"])).unwrap();
    assert!(creator.last_analysis().is_none());
    creator.wait_for_scrape().await.unwrap();
    assert!(creator.last_analysis().is_none());
}

#[tokio::test(start_paused = true)]
async fn stop_reaches_run_whose_handle_is_held_by_a_waiter() {
    let creator = creator();
    creator.start_scrape(keys(&["SPARK", "KAFKA", "HADOOP"])).unwrap();

    let waiter = {
        let creator = creator.clone();
        tokio::spawn(async move { creator.wait_for_scrape().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    creator.stop_scrape();

    let outcome = waiter.await.unwrap().unwrap().unwrap();
    assert!(matches!(outcome, RunOutcome::Cancelled { .. }));

    let status = creator.status();
    assert_eq!(status.state, SessionState::Stopped);
    assert_eq!(status.progress.status_message, "Scraping stopped by user.");
    assert_eq!(status.issue_count, 0);
}

#[tokio::test(start_paused = true)]
async fn stop_after_last_check_leaves_session_complete() {
    let creator = creator();
    let (event_tx, mut rx) = tokio::sync::broadcast::channel(16);
    {
        let mut guard = session::lock(&creator.session);
        guard.state = SessionState::Running;
        guard.stop_requested = true;
    }
    let mut observer = session::SessionObserver {
        session: Arc::clone(&creator.session),
        event_tx,
    };

    // Terminal snapshot of a run that was not cancelled in time
    let terminal = ScrapeProgress {
        status_message: "Scraping complete.".to_string(),
        projects_scanned: 1,
        issues_scraped: 1,
        comments_processed: 1,
        total_projects: 1,
        ..Default::default()
    };
    observer.on_progress(&terminal).unwrap();
    observer.on_complete("{}");

    let status = creator.status();
    assert_eq!(status.state, SessionState::Complete);
    assert_eq!(status.progress.status_message, "Scraping complete.");
    assert!(matches!(
        drain(&mut rx).last(),
        Some(Event::ScrapeComplete { issues: 1, comments: 1 })
    ));
}

#[test]
fn with_parts_rejects_invalid_config() {
    let mut config = Config::default();
    config.scrape.event_buffer = 0;
    let result = CorpusCreator::with_parts(
        config,
        Arc::new(RecordStore::sample().unwrap()),
        Arc::new(StubAnalyzer::replying("unused")),
    );
    assert!(matches!(result, Err(Error::Config { .. })));
}
