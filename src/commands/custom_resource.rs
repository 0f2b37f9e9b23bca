// ABOUTME: Custom resource command implementation.
// ABOUTME: Reads one deployment event, tags, and PUTs the response to the event's callback URL.

use ecr_release::custom_resource::{EcrConnector, HttpNotifier, IncomingEvent, process_incoming};
use ecr_release::error::Result;
use ecr_release::output::Output;
use std::path::Path;
use tokio::io::AsyncReadExt;

pub async fn custom_resource(
    event_path: Option<&Path>,
    region: Option<String>,
    output: Output,
) -> Result<()> {
    let raw = match event_path {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await?;
            raw
        }
    };
    // Only input with no callback URL to answer is an error here.
    let incoming = IncomingEvent::from_json(&raw)?;

    let connector = EcrConnector::new(region);
    let response = process_incoming(&incoming, &connector, &HttpNotifier::new()).await?;

    // A FAILED response was still delivered; the orchestrator owns that outcome.
    let message = match &response.reason {
        Some(reason) => format!("Sent {:?} response: {reason}", response.status),
        None => format!("Sent {:?} response", response.status),
    };
    output.result(&message, &response);
    Ok(())
}
