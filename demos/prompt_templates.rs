//! Prompt templates: write a prompt once, fill it many times.
//!
//! # Running
//!
//! ```bash
//! cargo run --example prompt_templates
//! ```

mod support;

use llm_labs::{Configuration, Message, PromptTemplate, RequestOptions, RequestRunner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    support::init();
    let config = Configuration::load();
    let runner = RequestRunner::new();

    support::banner("One template, many prompts");
    let template = PromptTemplate::new(
        "Explain {topic} to a {audience} in {length}.",
        ["topic", "audience", "length"],
    )?;
    println!("Template: {}", template.template());
    println!("Inputs:   {:?}", template.input_variables());

    let variations = [
        [("topic", "machine learning"), ("audience", "child"), ("length", "one sentence")],
        [("topic", "blockchain"), ("audience", "banker"), ("length", "two sentences")],
    ];

    for vars in variations {
        let messages = template.render_messages(vars)?;
        println!("\nPrompt: {}", messages[0].content);
        let response = runner
            .complete(&config, &messages, &RequestOptions::new().with_temperature(0.5))
            .await?;
        println!("Reply:  {}", response.text);
    }

    support::banner("System instructions plus a template");
    let translator = PromptTemplate::from_template("Translate into {language}: {text}")?
        .with_partial("language", "French");
    let messages = [
        Message::system("You are a precise translator. Reply with the translation only."),
        Message::user(translator.render([("text", "Tokens are pieces of words.")])?),
    ];
    let response = runner
        .complete(&config, &messages, &RequestOptions::default())
        .await?;
    println!("{}", response.text);

    support::banner("Missing variables are caught before any call");
    match template.render([("topic", "rust")]) {
        Ok(prompt) => println!("Unexpectedly rendered: {prompt}"),
        Err(err) => println!("{err}"),
    }

    Ok(())
}
