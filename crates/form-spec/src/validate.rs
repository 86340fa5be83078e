use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::answers::AnswerSet;
use crate::spec::{Field, FieldType, FormSchema};

/// Structural problem found in a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIssue {
    pub field_id: String,
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaReport {
    pub valid: bool,
    pub issues: Vec<SchemaIssue>,
}

/// Problem found in a single answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub question_id: String,
    pub path: String,
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub unknown_fields: Vec<String>,
}

pub fn validate_schema(schema: &FormSchema) -> SchemaReport {
    let mut issues = Vec::new();
    let mut seen = BTreeSet::new();

    for field in &schema.fields {
        if field.id.trim().is_empty() {
            issues.push(schema_issue(field, "question id cannot be empty", "empty_id"));
        } else if !seen.insert(field.id.as_str()) {
            issues.push(schema_issue(
                field,
                "duplicate question id",
                "duplicate_id",
            ));
        }

        if field.options.is_some() && !field.kind.has_options() {
            issues.push(schema_issue(
                field,
                "options are only allowed on multiple choice questions",
                "unexpected_options",
            ));
        }
    }

    SchemaReport {
        valid: issues.is_empty(),
        issues,
    }
}

fn schema_issue(field: &Field, message: &str, code: &str) -> SchemaIssue {
    SchemaIssue {
        field_id: field.id.clone(),
        message: message.into(),
        code: code.into(),
    }
}

pub fn validate_answers(schema: &FormSchema, answers: &AnswerSet) -> ValidationResult {
    let mut errors = Vec::new();

    for field in &schema.fields {
        let Some(value) = answers.get(&field.id) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        if let Some(error) = validate_value(field, value) {
            errors.push(error);
        }
    }

    let known: BTreeSet<&str> = schema.fields.iter().map(|field| field.id.as_str()).collect();
    let unknown_fields = answers
        .iter()
        .map(|(key, _)| key)
        .filter(|key| !known.contains(key))
        .map(String::from)
        .collect::<Vec<_>>();

    ValidationResult {
        valid: errors.is_empty() && unknown_fields.is_empty(),
        errors,
        unknown_fields,
    }
}

fn validate_value(field: &Field, value: &str) -> Option<ValidationError> {
    match field.kind {
        FieldType::Text | FieldType::Textarea => None,
        FieldType::Select => {
            let trimmed = value.trim();
            if field
                .display_options()
                .iter()
                .any(|option| option == trimmed)
            {
                None
            } else {
                Some(answer_error(field, "invalid option", "option_mismatch"))
            }
        }
        FieldType::File => {
            if value.starts_with("https://") || value.starts_with("http://") {
                None
            } else {
                Some(answer_error(
                    field,
                    "file answers must be an uploaded file URL",
                    "invalid_file_url",
                ))
            }
        }
    }
}

fn answer_error(field: &Field, message: &str, code: &str) -> ValidationError {
    ValidationError {
        question_id: field.id.clone(),
        path: format!("/{}", field.id),
        message: message.into(),
        code: code.into(),
    }
}
