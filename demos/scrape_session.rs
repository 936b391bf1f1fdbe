//! Scrape session example
//!
//! This example demonstrates the core functionality of issue-corpus:
//! - Creating a session controller over the bundled sample data
//! - Subscribing to events
//! - Running a scrape over a few projects
//! - Printing the resulting corpus
//! - Optionally requesting an analysis (needs GEMINI_API_KEY or API_KEY)

use issue_corpus::{Config, CorpusCreator, Event};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let creator = CorpusCreator::new(Config::default())?;

    let mut events = creator.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::Progress { progress } => {
                    println!(
                        "[{:>5.1}%] {}",
                        progress.percent(),
                        progress.status_message
                    );
                }
                Event::ScrapeComplete { issues, comments } => {
                    println!("✓ Scraped {} issues with {} comments", issues, comments);
                }
                Event::ScrapeStopped { issues, .. } => {
                    println!("■ Stopped after {} issues", issues);
                }
                Event::ScrapeFailed { error } => {
                    eprintln!("✗ Scrape failed: {}", error);
                }
                other => println!("{:?}", other),
            }
        }
    });

    let projects = vec!["SPARK".to_string(), "KAFKA".to_string(), "FLINK".to_string()];
    creator.start_scrape(projects)?;
    creator.wait_for_scrape().await?;

    let corpus = creator.corpus()?;
    println!();
    println!("{}", corpus);
    println!();
    println!("sha256: {:?}", creator.status().corpus_sha256);

    if creator.config().analysis.resolve_api_key().is_some() {
        let analysis = creator.analyze().await?;
        println!();
        println!("Analysis by {}:", analysis.model);
        println!("{}", analysis.text);
    }

    Ok(())
}
