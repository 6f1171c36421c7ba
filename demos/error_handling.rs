//! Error handling: every failure kind, what it means, and what to do.
//!
//! # Running
//!
//! ```bash
//! # Offline: walk through the error kinds
//! cargo run --example error_handling
//!
//! # Also make real failing calls (bad key, unreachable host, tiny timeout)
//! cargo run --example error_handling -- --live
//! ```
//!
//! # Error Categories
//!
//! | Category | Examples | Action |
//! |----------|----------|--------|
//! | Client | Missing variable, bad key | Fix configuration |
//! | Transient | Rate limit, timeout | Call again with backoff |
//! | External | Server errors, malformed replies | Log, maybe call again |

mod support;

use llm_labs::{
    complete_with_retry, error::ErrorCategory, CallError, Configuration, Message, MissingReason,
    ProviderSlot, RequestOptions, RequestRunner, RetryPolicy,
};
use std::time::Duration;

fn print_error_info(name: &str, error: &CallError) {
    println!("{name}:");
    println!("  Display:      {error}");
    println!("  Category:     {:?}", error.category());
    println!("  Severity:     {:?}", error.severity());
    println!("  Retryable:    {}", error.is_retryable());
    println!("  User message: {}", error.user_message());
    println!();
}

fn demonstrate_error_kinds() {
    support::banner("Error kinds");
    print_error_info(
        "MissingConfiguration",
        &CallError::MissingConfiguration {
            variable: "OPENAI_MODEL",
            reason: MissingReason::Empty,
        },
    );
    print_error_info(
        "Timeout",
        &CallError::Timeout {
            timeout: Duration::from_secs(30),
        },
    );
    print_error_info(
        "RemoteError (401)",
        &CallError::RemoteError {
            status: 401,
            message: "Incorrect API key provided".into(),
        },
    );
    print_error_info(
        "RemoteError (429)",
        &CallError::RemoteError {
            status: 429,
            message: "Rate limit reached".into(),
        },
    );
    print_error_info(
        "MalformedResponse",
        &CallError::MalformedResponse {
            message: "No choices in response".into(),
        },
    );
}

fn route(error: &CallError) -> &'static str {
    match error.category() {
        ErrorCategory::Client => "fix the configuration or the request",
        ErrorCategory::Transient => "wait and call again",
        ErrorCategory::External => "log it; the endpoint misbehaved",
    }
}

async fn demonstrate_live_failures() {
    let runner = RequestRunner::new();
    let messages = [Message::user("Say hello")];
    let real = Configuration::load();

    let cases = [
        (
            "Wrong API key",
            Configuration {
                credential: Some("sk-definitely-not-valid".into()),
                ..real.clone()
            },
            RequestOptions::default(),
        ),
        (
            "Unreachable host",
            Configuration {
                endpoint_base: Some("http://127.0.0.1:1/v1".into()),
                ..real.clone()
            },
            RequestOptions::default(),
        ),
        (
            "Impossible timeout",
            real.clone(),
            RequestOptions::new().with_timeout(Duration::from_millis(1)),
        ),
        ("Missing model", Configuration::default(), RequestOptions::default()),
    ];

    for (name, config, options) in cases {
        support::banner(name);
        match runner.complete(&config, &messages, &options).await {
            Ok(response) => println!("Unexpected success: {}", response.text),
            Err(err) => {
                println!("{}", err.user_message());
                println!("-> {}", route(&err));
            }
        }
    }

    support::banner("Caller-side retry");
    let policy = RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(200),
        ..RetryPolicy::default()
    };
    let flaky = Configuration {
        endpoint_base: Some("http://127.0.0.1:1/v1".into()),
        ..real
    };
    match complete_with_retry(
        &runner,
        &flaky,
        ProviderSlot::Primary,
        &messages,
        &RequestOptions::default(),
        &policy,
    )
    .await
    {
        Ok(response) => println!("Recovered: {}", response.text),
        Err(err) => println!("Gave up after {} attempts: {err}", policy.max_attempts),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    support::init();

    demonstrate_error_kinds();

    if std::env::args().any(|arg| arg == "--live") {
        demonstrate_live_failures().await;
    } else {
        println!("Run with --live to make real failing calls.");
    }

    Ok(())
}
