//! Tokens and costs: estimate before sending, measure after.
//!
//! This example shows how to:
//! - Count prompt tokens locally with tiktoken
//! - Compare the estimate with the usage the endpoint reports
//! - Turn usage into a cost breakdown
//!
//! # Running
//!
//! ```bash
//! cargo run --example tokens_and_costs
//! ```

mod support;

use llm_labs::{
    complete, Configuration, CostBreakdown, Message, RequestOptions, TokenCounter, TokenPricing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    support::init();
    let config = Configuration::load();
    let model = config.model_id.clone().unwrap_or_else(|| "gpt-4.1-mini".into());

    support::banner("What is a token?");
    let counter = TokenCounter::for_model(&model)?;
    for sample in ["Hello", "Hello, world!", "Tokenization splits text into pieces of words."] {
        println!("{:>3} tokens  {sample:?}", counter.count_tokens(sample));
    }

    support::banner("Estimate, then measure");
    let messages = [Message::user(
        "Explain in three sentences why output tokens cost more than input tokens.",
    )];
    let estimate = counter.count_message_tokens(&messages);
    println!("Estimated prompt tokens: {estimate}");

    let response = complete(&config, &messages, &RequestOptions::default()).await?;
    println!("\n{}\n", response.text);

    let Some(usage) = response.usage else {
        println!("The endpoint did not report usage; nothing to price.");
        return Ok(());
    };
    println!("Reported prompt tokens:  {}", usage.prompt_tokens);

    support::banner("Cost breakdown (GPT-4.1-mini pricing)");
    let cost = CostBreakdown::from_usage(&usage, &TokenPricing::GPT_4_1_MINI);
    println!("Input:  {:>5} tokens  ${:.6}", cost.input_tokens, cost.input_cost);
    println!("Output: {:>5} tokens  ${:.6}", cost.output_tokens, cost.output_cost);
    println!("Total:               ${:.6}", cost.total_cost);
    println!(
        "\n1,000 calls like this would cost about ${:.2}",
        cost.total_cost * 1000.0
    );

    Ok(())
}
