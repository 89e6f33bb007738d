//! Printing helpers shared by the command handlers.

use std::io::Write;

use anyhow::Result;
use console::Style;
use dify_client::{BufferedResponse, ResponseStream};
use futures::StreamExt;

/// Print a buffered response body as pretty JSON.
pub fn print_body(response: &BufferedResponse) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(response.body())?);
    Ok(())
}

/// Print a streamed response as it arrives.
///
/// With `raw`, each event's data is printed on its own line. Otherwise the
/// text deltas found under `field` are printed inline, and errors reported by
/// the server end the stream.
pub async fn print_events(stream: ResponseStream, field: &str, raw: bool) -> Result<()> {
    let dim = Style::new().dim();
    let events = stream.events();
    futures::pin_mut!(events);

    let mut has_output = false;
    while let Some(event) = events.next().await {
        let event = event?;

        if raw {
            println!("{}", event.data);
            continue;
        }

        let chunk: serde_json::Value = event.json()?;
        match chunk["event"].as_str().unwrap_or_default() {
            "error" => {
                if has_output {
                    println!();
                }
                let message = chunk["message"].as_str().unwrap_or("stream error");
                anyhow::bail!("{}", message);
            }
            "message_end" | "workflow_finished" => {
                if has_output {
                    println!();
                    has_output = false;
                }
                if let Some(id) = chunk["conversation_id"].as_str() {
                    println!("{}", dim.apply_to(format!("[conversation: {}]", id)));
                }
                if let Some(status) = chunk["data"]["status"].as_str() {
                    println!("{}", dim.apply_to(format!("[workflow: {}]", status)));
                }
            }
            _ => {
                let text = chunk[field]
                    .as_str()
                    .or_else(|| chunk["data"][field].as_str());
                if let Some(text) = text {
                    print!("{}", text);
                    std::io::stdout().flush()?;
                    has_output = true;
                }
            }
        }
    }

    if has_output {
        println!();
    }
    Ok(())
}
