//! First API call: configuration, one request, and the parts of a response.
//!
//! This example shows how to:
//! - Load settings from the environment (and `.env`)
//! - Send a system + user conversation
//! - Read the reply text, finish reason and token usage
//!
//! # Running
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! export OPENAI_MODEL="gpt-4.1-mini"
//! cargo run --example first_call
//! ```

mod support;

use llm_labs::{Configuration, Message, RequestOptions, RequestRunner};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    support::init();

    support::banner("Step 1: Load configuration");
    let config = Configuration::load();
    println!(
        "API key: {}",
        config.masked_credential().unwrap_or_else(|| "<not set>".into())
    );
    println!(
        "Model:   {}",
        config.model_id.as_deref().unwrap_or("<not set>")
    );

    support::banner("Step 2: Build the conversation");
    let messages = [
        Message::system("You are a helpful assistant that explains things simply."),
        Message::user("What is a large language model? Answer in two sentences."),
    ];
    for message in &messages {
        println!("[{}] {}", message.role, message.content);
    }

    support::banner("Step 3: Make exactly one call");
    let options = RequestOptions::new()
        .with_timeout(Duration::from_secs(30))
        .with_temperature(0.7);
    let response = RequestRunner::new()
        .complete(&config, &messages, &options)
        .await?;

    support::banner("Step 4: Read the response");
    println!("Text: {}", response.text);
    println!(
        "Finish reason: {}",
        response.finish_reason.as_deref().unwrap_or("<none>")
    );
    if let Some(created) = response.created {
        println!("Created: {created}");
    }
    match response.usage {
        Some(usage) => println!(
            "Tokens: {} prompt + {} completion = {} total",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        ),
        None => println!("The endpoint did not report token usage"),
    }

    Ok(())
}
