//! Editing state behind the builder view.

use thiserror::Error;

use crate::spec::{Field, FieldType, FormSchema};
use crate::validate::validate_schema;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("no question matches '{0}'")]
    UnknownField(String),
    #[error("question '{0}' is not a multiple choice question")]
    NotMultipleChoice(String),
    #[error("schema cannot be edited: {0}")]
    InvalidSchema(String),
}

/// Title plus ordered fields being composed.
#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    title: String,
    fields: Vec<Field>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume editing an exported schema. Edits address fields by id, so the
    /// schema must pass [`validate_schema`] first.
    pub fn from_schema(schema: FormSchema) -> Result<Self, BuilderError> {
        let report = validate_schema(&schema);
        if !report.valid {
            let details = report
                .issues
                .iter()
                .map(|issue| format!("'{}' {}", issue.field_id, issue.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(BuilderError::InvalidSchema(details));
        }
        Ok(Self {
            title: schema.title,
            fields: schema.fields,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Appends an untitled field and returns its id.
    pub fn add_field(&mut self, kind: FieldType) -> String {
        let field = Field::untitled(kind);
        let id = field.id.clone();
        self.fields.push(field);
        id
    }

    pub fn update_label(&mut self, id: &str, label: impl Into<String>) -> Result<(), BuilderError> {
        let field = self.field_mut(id)?;
        field.label = label.into();
        Ok(())
    }

    /// Stores the comma separated options verbatim; trimming happens on display.
    pub fn set_options_from_text(&mut self, id: &str, text: &str) -> Result<(), BuilderError> {
        let field = self.field_mut(id)?;
        if !field.kind.has_options() {
            return Err(BuilderError::NotMultipleChoice(id.to_string()));
        }
        field.options = Some(text.split(',').map(String::from).collect());
        Ok(())
    }

    pub fn remove_field(&mut self, id: &str) -> Result<Field, BuilderError> {
        let index = self.index_of(id)?;
        Ok(self.fields.remove(index))
    }

    /// Drag-end handling: `active` takes the slot of `over`.
    pub fn reorder(&mut self, active: &str, over: Option<&str>) -> Result<(), BuilderError> {
        let Some(over) = over else {
            return Ok(());
        };
        if active == over {
            return Ok(());
        }
        let from = self.index_of(active)?;
        let to = self.index_of(over)?;
        array_move(&mut self.fields, from, to);
        Ok(())
    }

    /// Moves a field to `index`, clamped to the list.
    pub fn move_to(&mut self, id: &str, index: usize) -> Result<(), BuilderError> {
        let from = self.index_of(id)?;
        let to = index.min(self.fields.len().saturating_sub(1));
        array_move(&mut self.fields, from, to);
        Ok(())
    }

    /// Looks a field up by 1-based position or by id.
    pub fn resolve(&self, reference: &str) -> Result<&Field, BuilderError> {
        let reference = reference.trim();
        if let Ok(position) = reference.parse::<usize>()
            && position >= 1
            && let Some(field) = self.fields.get(position - 1)
        {
            return Ok(field);
        }
        self.field(reference)
            .ok_or_else(|| BuilderError::UnknownField(reference.to_string()))
    }

    pub fn schema(&self) -> FormSchema {
        FormSchema {
            title: self.title.clone(),
            fields: self.fields.clone(),
        }
    }

    fn index_of(&self, id: &str) -> Result<usize, BuilderError> {
        self.fields
            .iter()
            .position(|field| field.id == id)
            .ok_or_else(|| BuilderError::UnknownField(id.to_string()))
    }

    fn field_mut(&mut self, id: &str) -> Result<&mut Field, BuilderError> {
        self.fields
            .iter_mut()
            .find(|field| field.id == id)
            .ok_or_else(|| BuilderError::UnknownField(id.to_string()))
    }
}

fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}
