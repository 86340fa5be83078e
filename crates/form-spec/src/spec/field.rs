use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Supported question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single line answer.
    Text,
    /// Multi line answer.
    Textarea,
    /// One answer picked from a list of options.
    Select,
    /// File handed to the upload backend on submit.
    File,
}

impl FieldType {
    /// Toolbox order.
    pub const ALL: [FieldType; 4] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::File,
    ];

    /// Serialized tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::File => "file",
        }
    }

    /// Human label shown in the toolbox.
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::Text => "Short Text",
            FieldType::Textarea => "Long Text",
            FieldType::Select => "Multiple Choice",
            FieldType::File => "File Upload",
        }
    }

    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Select)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown question type '{0}' (expected text, textarea, select or file)")]
pub struct ParseFieldTypeError(pub String);

impl FromStr for FieldType {
    type Err = ParseFieldTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "text" | "short" => Ok(FieldType::Text),
            "textarea" | "long" => Ok(FieldType::Textarea),
            "select" | "choice" => Ok(FieldType::Select),
            "file" | "upload" => Ok(FieldType::File),
            _ => Err(ParseFieldTypeError(value.to_string())),
        }
    }
}

/// A single question on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub label: String,
    /// Raw option strings; only present on select fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl Field {
    /// Fresh field as the builder toolbox creates it.
    pub fn untitled(kind: FieldType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            label: format!("Untitled {} question", kind),
            options: kind.has_options().then(Vec::new),
        }
    }

    /// Options trimmed for display, in schema order.
    pub fn display_options(&self) -> Vec<String> {
        self.options
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|option| option.trim().to_string())
            .collect()
    }
}
