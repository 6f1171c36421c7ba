//! Integration Tests for Chains and Repair over HTTP
//!
//! UNIT UNDER TEST: Chain, Repair with the default HTTP transport
//!
//! BUSINESS RESPONSIBILITY:
//!   - Template, call and shape compose into one explicit pipeline
//!   - A rejected structured reply gets exactly one corrective request
//!
//! TEST COVERAGE:
//!   - Schema-typed chain end to end
//!   - Repair after a malformed structured reply
//!   - Repair that still fails surfaces the original error

mod common;

use common::*;
use llm_labs::{
    Chain, ChainError, FieldKind, FieldSpec, OutputSchema, OutputShaper, PromptTemplate, Repair,
    RepairError, RequestRunner, SchemaTyped, ShapeError,
};
use serde::Deserialize;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer};

#[derive(Debug, Deserialize, PartialEq)]
struct TechInfo {
    name: String,
    year_released: i64,
    creator: String,
    tags: Vec<String>,
}

fn tech_info_shaper() -> SchemaTyped {
    SchemaTyped::new(
        OutputSchema::new("TechInfo")
            .field(FieldSpec::required("name", FieldKind::String, "Name of the technology"))
            .field(FieldSpec::required(
                "year_released",
                FieldKind::Integer,
                "Year it was released",
            ))
            .field(FieldSpec::required("creator", FieldKind::String, "Who created it"))
            .field(FieldSpec::required(
                "tags",
                FieldKind::array_of(FieldKind::String),
                "Related tags",
            )),
    )
}

#[tokio::test]
async fn test_schema_chain_end_to_end() {
    // Arrange
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("Tell me about Python"))
        .and(body_string_contains("year_released"))
        .respond_with(create_completion_response(
            r#"{"name": "Python", "year_released": 1991, "creator": "Guido van Rossum", "tags": ["scripting", "general-purpose"]}"#,
            80,
            30,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let template = PromptTemplate::new(
        "Tell me about {technology}.\n{format_instructions}",
        ["technology", "format_instructions"],
    )
    .unwrap();
    let chain = Chain::new(template, tech_info_shaper());

    // Act
    let shaped = chain
        .run(
            &RequestRunner::new(),
            &create_test_config(&mock_server.uri()),
            [("technology", "Python")],
        )
        .await
        .unwrap();

    // Assert
    let info: TechInfo = serde_json::from_value(shaped.into_json()).unwrap();
    assert_eq!(info.year_released, 1991);
    assert_eq!(info.tags.len(), 2);
}

#[tokio::test]
async fn test_chain_reports_schema_mismatch() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(create_completion_response(
            r#"{"name": "Python", "year_released": 1991, "tags": []}"#,
            80,
            20,
        ))
        .mount(&mock_server)
        .await;

    let chain = Chain::new(
        PromptTemplate::from_template("Tell me about {technology}.").unwrap(),
        tech_info_shaper(),
    );

    let err = chain
        .run(
            &RequestRunner::new(),
            &create_test_config(&mock_server.uri()),
            [("technology", "Python")],
        )
        .await
        .unwrap_err();

    match err {
        ChainError::Shape(shape) => assert_eq!(shape.field_names(), vec!["creator"]),
        other => panic!("Expected shape failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_repair_fixes_malformed_reply_with_one_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("rejected with this error"))
        .respond_with(create_completion_response(
            r#"{"name": "Rust", "year_released": 2015, "creator": "Graydon Hoare", "tags": ["systems"]}"#,
            120,
            25,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let malformed = r#"{"name": "Rust", "year_released": 2015, "creator": "Graydon Hoare", "tags": ["systems"]"#;
    let shaper = tech_info_shaper();
    let error = shaper.shape(malformed).unwrap_err();
    assert!(matches!(error, ShapeError::InvalidSyntax { .. }));

    let shaped = Repair::new(shaper)
        .repair(
            &RequestRunner::new(),
            &create_test_config(&mock_server.uri()),
            malformed,
            error,
        )
        .await
        .unwrap();

    assert_eq!(shaped.as_record().unwrap()["creator"], "Graydon Hoare");
}

#[tokio::test]
async fn test_unfixable_reply_surfaces_original_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(create_completion_response("Sorry, I can only answer in prose.", 120, 9))
        .expect(1)
        .mount(&mock_server)
        .await;

    let original = tech_info_shaper().shape(r#"{"name": "Rust"}"#).unwrap_err();

    let err = Repair::new(tech_info_shaper())
        .shape_or_repair(
            &RequestRunner::new(),
            &create_test_config(&mock_server.uri()),
            r#"{"name": "Rust"}"#,
        )
        .await
        .unwrap_err();

    match err {
        RepairError::StillInvalid(surfaced) => {
            assert_eq!(surfaced, original);
            assert_eq!(
                surfaced.field_names(),
                vec!["year_released", "creator", "tags"]
            );
        }
        other => panic!("Expected StillInvalid, got {other:?}"),
    }
}
