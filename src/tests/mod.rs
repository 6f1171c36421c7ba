// Test modules for llm-labs crate
//
// Each source module has a corresponding test file that focuses on
// behavior verification. HTTP-level tests live in the crate's tests/ directory.

// Test helper utilities
pub mod helpers;

pub mod error;
pub mod prompt;
pub mod tokens;

// NOTE: TokenCounter tests live in tests/token_integration_tests.rs
// They load tokenizer data and are slow, so they don't belong in unit tests
