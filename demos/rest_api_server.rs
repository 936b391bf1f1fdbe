//! REST API server example
//!
//! This example shows how to run issue-corpus with the REST API enabled,
//! allowing control via HTTP endpoints.
//!
//! After starting, you can:
//! - View Swagger UI at http://localhost:6790/swagger-ui
//! - Start a run via POST http://localhost:6790/scrapes
//! - Monitor progress via GET http://localhost:6790/scrapes/status
//! - Stream events via GET http://localhost:6790/events

use issue_corpus::CorpusCreator;
use issue_corpus::api::start_api_server;
use issue_corpus::config::Config;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    // Load settings from a JSON file if one is given
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let address = config.api.bind_address;

    let creator = Arc::new(CorpusCreator::new(config)?);

    println!("🚀 Starting issue-corpus REST API server");
    println!("📖 Swagger UI: http://{}/swagger-ui", address);
    println!("🔄 Events stream: http://{}/events", address);
    println!();
    println!("Example commands:");
    println!("  # Start a scrape");
    println!("  curl -X POST http://{}/scrapes \\", address);
    println!("    -H 'Content-Type: application/json' \\");
    println!("    -d '{{\"projects\": [\"SPARK\", \"KAFKA\"]}}'");
    println!();
    println!("  # Stop it");
    println!("  curl -X POST http://{}/scrapes/stop", address);
    println!();
    println!("  # Download the corpus");
    println!("  curl http://{}/scrapes/corpus", address);
    println!();
    println!("Press Ctrl+C to stop");

    start_api_server(creator).await?;

    Ok(())
}
