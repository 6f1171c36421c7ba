//! Output shaping: from free text to lists, JSON, typed records and choices.
//!
//! Each section runs one chain (template, one call, shaper) and prints the
//! shaped value. The last section repairs a reply that failed to shape.
//!
//! # Running
//!
//! ```bash
//! cargo run --example output_shaping
//! ```

mod support;

use llm_labs::{
    Chain, Configuration, DelimitedList, FieldKind, FieldSpec, FixedChoice, OutputSchema,
    OutputShaper, PatternExtraction, PlainText, PromptTemplate, Repair, RequestOptions,
    RequestRunner, SchemaTyped, StructuredData,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct TechInfo {
    name: String,
    year_released: i64,
    creator: String,
    tags: Vec<String>,
}

fn tech_info_schema() -> OutputSchema {
    OutputSchema::new("TechInfo")
        .field(FieldSpec::required("name", FieldKind::String, "Name of the technology"))
        .field(FieldSpec::required(
            "year_released",
            FieldKind::Integer,
            "Year it was first released",
        ))
        .field(FieldSpec::required(
            "creator",
            FieldKind::String,
            "Person or organization that created it",
        ))
        .field(FieldSpec::required(
            "tags",
            FieldKind::array_of(FieldKind::String),
            "List of keywords describing it",
        ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    support::init();
    let config = Configuration::load();
    let runner = RequestRunner::new();
    let options = RequestOptions::new().with_temperature(0.3);

    support::banner("Plain text");
    let chain = Chain::new(
        PromptTemplate::from_template(
            "Analyze {technology} and provide pros and cons in 2-3 sentences",
        )?,
        PlainText,
    )
    .with_options(options);
    let shaped = chain.run(&runner, &config, [("technology", "Blockchain")]).await?;
    println!("{}", shaped.as_text().unwrap_or_default());

    support::banner("Delimited list");
    let chain = Chain::new(
        PromptTemplate::new(
            "List 3 use cases for {technology}.\n{format_instructions}",
            ["technology", "format_instructions"],
        )?,
        DelimitedList::new(),
    )
    .with_options(options);
    let shaped = chain.run(&runner, &config, [("technology", "Blockchain")]).await?;
    println!("{:?}", shaped.as_list().unwrap_or_default());

    support::banner("Structured data");
    let chain = Chain::new(
        PromptTemplate::new(
            "Return a JSON object with 'name', 'rank', and 'attribute' for {topic}.\n{format_instructions}",
            ["topic", "format_instructions"],
        )?,
        StructuredData,
    )
    .with_options(options);
    let shaped = chain.run(&runner, &config, [("topic", "Python Programming")]).await?;
    println!("{}", serde_json::to_string_pretty(&shaped.into_json())?);

    support::banner("Schema-typed record");
    let pydantic_style = PromptTemplate::new(
        "Provide details about {technology}.\n{format_instructions}",
        ["technology", "format_instructions"],
    )?;
    let chain = Chain::new(pydantic_style.clone(), SchemaTyped::new(tech_info_schema()))
        .with_options(options);
    match chain.run(&runner, &config, [("technology", "React")]).await {
        Ok(shaped) => {
            let info: TechInfo = serde_json::from_value(shaped.into_json())?;
            println!("{} was created by {} in {}", info.name, info.creator, info.year_released);
        }
        Err(err) => println!("Schema check failed: {err}"),
    }

    support::banner("Answer with source");
    let chain = Chain::new(
        PromptTemplate::new(
            "Answer the user question as best as possible.\n{format_instructions}\n{question}",
            ["question", "format_instructions"],
        )?,
        SchemaTyped::new(OutputSchema::from_response_schemas(
            "AnswerWithSource",
            [
                ("answer", "answer to the user's question"),
                ("source", "source used to answer the user's question, should be a website."),
            ],
        )),
    )
    .with_options(options);
    let shaped = chain
        .run(&runner, &config, [("question", "What is the capital of France?")])
        .await?;
    println!("{}", serde_json::to_string_pretty(&shaped.into_json())?);

    support::banner("Pattern extraction");
    let chain = Chain::new(
        PromptTemplate::from_template(
            "Rate your confidence in {topic} from 1-100 and give reasoning.\n\
             Format: 'Confidence: <number>\nReasoning: <text>'",
        )?,
        PatternExtraction::new(
            r"Confidence:\s*(\d+)\s*\nReasoning:\s*(.*)",
            ["confidence", "reasoning"],
        )?,
    )
    .with_options(options);
    match chain.run(&runner, &config, [("topic", "AI Safety")]).await {
        Ok(shaped) => println!("{}", serde_json::to_string_pretty(&shaped.into_json())?),
        Err(err) => println!("Extraction failed: {err}"),
    }

    support::banner("Fixed choice");
    let difficulty = FixedChoice::new(["beginner", "intermediate", "advanced"]);
    let chain = Chain::new(
        PromptTemplate::new(
            "Rate the difficulty of learning {subject}.\n{format_instructions}\nDifficulty:",
            ["subject", "format_instructions"],
        )?,
        difficulty,
    )
    .with_options(options);
    match chain.run(&runner, &config, [("subject", "Quantum Physics")]).await {
        Ok(shaped) => println!("{}", shaped.as_choice().unwrap_or_default()),
        Err(err) => println!("Not a valid choice: {err}"),
    }

    support::banner("Repair a reply that failed to shape");
    let shaper = SchemaTyped::new(tech_info_schema());
    let bad_output = "React was created by Facebook in 2013 as a UI library. It is widely used.";
    println!("Bad output: {bad_output:?}");
    let Err(error) = shaper.shape(bad_output) else {
        println!("Shaped without repair");
        return Ok(());
    };
    println!("Rejected:   {error}");

    let original_prompt = pydantic_style
        .with_partial("format_instructions", shaper.format_instructions().unwrap_or_default())
        .render([("technology", "React")])?;
    let repair = Repair::new(shaper).with_options(options);
    match repair
        .repair_with_prompt(&runner, &config, bad_output, error, &original_prompt)
        .await
    {
        Ok(shaped) => println!("Repaired:   {}", shaped.into_json()),
        Err(err) => println!("Repair failed; original error: {}", err.original()),
    }

    Ok(())
}
