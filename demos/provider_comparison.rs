//! One prompt, two providers, same code.
//!
//! Both calls go out concurrently; each has its own timeout and its own result.
//!
//! # Running
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..." OPENAI_MODEL="gpt-4.1-mini"
//! export GEMINI_API_KEY="..." GOOGLE_MODEL="gemini-2.5-flash"
//! cargo run --example provider_comparison
//! ```

mod support;

use llm_labs::{CallResult, Configuration, Message, ProviderSlot, RequestOptions, RequestRunner, Response};
use std::time::{Duration, Instant};

fn report(slot: ProviderSlot, elapsed: Duration, result: &CallResult<Response>) {
    println!("\n[{slot}] after {:.2}s", elapsed.as_secs_f64());
    match result {
        Ok(response) => {
            println!("{}", response.text);
            if let Some(usage) = response.usage {
                println!("({} tokens)", usage.total_tokens);
            }
        }
        Err(err) => println!("Failed: {}", err.user_message()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    support::init();
    let config = Configuration::load();
    let runner = RequestRunner::new();
    let options = RequestOptions::new().with_timeout(Duration::from_secs(30));

    let prompt = "Explain cloud computing in one sentence";
    support::banner("Same prompt, different providers");
    println!("Prompt: {prompt:?}");
    let messages = [Message::user(prompt)];

    let timed = |slot| {
        let (runner, config, messages) = (&runner, &config, &messages);
        async move {
            let start = Instant::now();
            let result = runner.complete_with(config, slot, messages, &options).await;
            (slot, start.elapsed(), result)
        }
    };

    let (primary, secondary) = tokio::join!(
        timed(ProviderSlot::Primary),
        timed(ProviderSlot::Secondary)
    );

    for (slot, elapsed, result) in [primary, secondary] {
        report(slot, elapsed, &result);
    }

    Ok(())
}
