use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::Field;

/// Title plus ordered questions, as saved by the builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormSchema {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl FormSchema {
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn field_ids(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.id.as_str()).collect()
    }
}

/// A schema as handed back by the backend for the fill view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StoredForm {
    pub id: String,
    pub schema: FormSchema,
}
