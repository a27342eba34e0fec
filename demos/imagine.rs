//! Interactive demo: type a message, get either an answer or images.
//!
//! Requires the `http` feature and a `TOGETHER_API_KEY` in the environment
//! or a `.env` file:
//!
//!     cargo run --example imagine --features http

use std::io::{self, BufRead, Write};

use miette::{IntoDiagnostic, Result};

use imagineer::backends::{HttpChatBackend, HttpImageBackend};
use imagineer::telemetry;
use imagineer::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let chat = HttpChatBackend::from_env()?;
    let images = HttpImageBackend::from_env()?;
    let workflow = Workflow::builder()
        .chat_backend(chat)
        .image_backend(images)
        .build();

    print!("What are you imagining? ");
    io::stdout().flush().into_diagnostic()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).into_diagnostic()?;

    let state = workflow.run(line.trim()).await?;
    workflow.event_bus().stop_listener().await;

    println!();
    for message in &state.messages {
        println!("{}: {}", message.role, message.content);
    }
    if let Some(prompt) = &state.refined_prompt {
        println!("\nRefined prompt: {prompt}");
    }
    if !state.image_urls.is_empty() {
        println!("\nImages:");
        for url in &state.image_urls {
            println!("  {url}");
        }
    }

    Ok(())
}
