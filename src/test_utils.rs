//! Shared test utilities for metadata, generator and command tests.

use std::collections::VecDeque;
use std::io::Write;

use tempfile::NamedTempFile;

use crate::prompt::{Decision, DecisionProvider, PromptError};

/// A small shop schema: a user owning orders, and a namespaced product.
pub const SHOP_METADATA: &str = r#"{
    "entity_namespaces": ["App\\Entity"],
    "entities": [
        {
            "name": "App\\Entity\\User",
            "fields": [
                {"name": "active", "type": "boolean", "nullable": false},
                {"name": "email", "type": "string", "nullable": true},
                {"name": "age", "type": "smallint", "nullable": false}
            ],
            "associations": [
                {"name": "orders", "target_entity": "App\\Entity\\Order", "type": 4}
            ]
        },
        {
            "name": "App\\Entity\\Order",
            "fields": [
                {"name": "total", "type": "decimal"},
                {"name": "placed_at", "type": "datetime", "nullable": false}
            ],
            "associations": [
                {"name": "customer", "target_entity": "App\\Entity\\User", "type": "to_one_owning"},
                {"name": "products", "target_entity": "App\\Entity\\Shop\\Product", "type": 3}
            ]
        },
        {
            "name": "App\\Entity\\Shop\\Product",
            "fields": [
                {"name": "title", "type": "text", "nullable": true}
            ]
        }
    ]
}"#;

/// Create a temporary file with the given suffix containing `content`.
pub fn create_temp_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

/// Decision provider replaying canned operator answers.
///
/// Records every question asked. Running out of answers falls back to the
/// empty (default) answer.
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    answers: VecDeque<String>,
    pub questions: Vec<String>,
}

impl ScriptedDecisions {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            questions: Vec::new(),
        }
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn decide(&mut self, question: &str) -> Result<Decision, PromptError> {
        self.questions.push(question.to_string());
        let answer = self.answers.pop_front().unwrap_or_default();
        Ok(Decision::from_answer(&answer))
    }
}
