use serde_json::{Map, Value, json};

use crate::{
    answers::{AnswerSet, PendingUploads},
    builder::FormBuilder,
    spec::{FieldType, StoredForm},
};

pub const SELECT_PLACEHOLDER: &str = "--Select--";

/// Status labels returned by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// Some question has no answer yet.
    NeedInput,
    /// Every question has an answer or an attached file.
    Complete,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::NeedInput => "need_input",
            RenderStatus::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillProgress {
    pub answered: usize,
    pub total: usize,
}

/// One question as the fill view shows it.
#[derive(Debug, Clone)]
pub struct FillQuestion {
    pub id: String,
    pub kind: FieldType,
    pub label: String,
    /// Trimmed options, select fields only.
    pub options: Option<Vec<String>>,
    pub current_value: Option<String>,
    pub attached_file: Option<String>,
}

impl FillQuestion {
    pub fn input(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn is_answered(&self) -> bool {
        self.current_value
            .as_deref()
            .is_some_and(|value| !value.is_empty())
            || self.attached_file.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct FillPayload {
    pub form_id: String,
    pub title: String,
    pub status: RenderStatus,
    pub progress: FillProgress,
    pub questions: Vec<FillQuestion>,
}

/// Build the fill view payload from a loaded form and the in-progress input.
pub fn build_fill_payload(
    form: &StoredForm,
    answers: &AnswerSet,
    uploads: &PendingUploads,
) -> FillPayload {
    let questions = form
        .schema
        .fields
        .iter()
        .map(|field| FillQuestion {
            id: field.id.clone(),
            kind: field.kind,
            label: field.label.clone(),
            options: field.kind.has_options().then(|| field.display_options()),
            current_value: match field.kind {
                FieldType::File => None,
                _ => answers.get(&field.id).map(String::from),
            },
            attached_file: match field.kind {
                FieldType::File => uploads.get(&field.id).map(|file| file.name.clone()),
                _ => None,
            },
        })
        .collect::<Vec<_>>();

    let answered = questions
        .iter()
        .filter(|question| question.is_answered())
        .count();
    let total = questions.len();
    let status = if answered < total {
        RenderStatus::NeedInput
    } else {
        RenderStatus::Complete
    };

    FillPayload {
        form_id: form.id.clone(),
        title: form.schema.title.clone(),
        status,
        progress: FillProgress { answered, total },
        questions,
    }
}

/// Render the fill payload as a structured JSON value.
pub fn render_fill_json(payload: &FillPayload) -> Value {
    let questions = payload
        .questions
        .iter()
        .map(|question| {
            let mut map = Map::new();
            map.insert("id".into(), Value::String(question.id.clone()));
            map.insert("type".into(), Value::String(question.kind.as_str().into()));
            map.insert("label".into(), Value::String(question.label.clone()));
            map.insert("input".into(), Value::String(question.input().into()));
            if let Some(options) = &question.options {
                let mut choices = vec![json!({ "title": SELECT_PLACEHOLDER, "value": "" })];
                choices.extend(
                    options
                        .iter()
                        .map(|option| json!({ "title": option, "value": option })),
                );
                map.insert("options".into(), Value::Array(choices));
            }
            if let Some(value) = &question.current_value {
                map.insert("current_value".into(), Value::String(value.clone()));
            }
            if let Some(file) = &question.attached_file {
                map.insert("attached_file".into(), Value::String(file.clone()));
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    json!({
        "form_id": payload.form_id,
        "title": payload.title,
        "status": payload.status.as_str(),
        "progress": {
            "answered": payload.progress.answered,
            "total": payload.progress.total,
        },
        "questions": questions,
    })
}

/// Render the fill payload as human-friendly text.
pub fn render_fill_text(payload: &FillPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!("# {}", payload.title));
    lines.push(format!(
        "Status: {} ({}/{})",
        payload.status.as_str(),
        payload.progress.answered,
        payload.progress.total
    ));

    for (index, question) in payload.questions.iter().enumerate() {
        lines.push(format!(
            "{}. {} [{}]",
            index + 1,
            question.label,
            question.kind.label()
        ));
        if let Some(options) = &question.options {
            lines.push(format!("   0) {}", SELECT_PLACEHOLDER));
            for (position, option) in options.iter().enumerate() {
                lines.push(format!("   {}) {}", position + 1, option));
            }
        }
        if let Some(value) = question.current_value.as_deref().filter(|v| !v.is_empty()) {
            lines.push(format!("   = {}", value));
        }
        if let Some(file) = &question.attached_file {
            lines.push(format!("   file: {}", file));
        }
    }

    lines.join("\n")
}

/// Render the builder canvas as numbered text.
pub fn render_canvas_text(builder: &FormBuilder) -> String {
    let mut lines = Vec::new();
    let title = if builder.title().is_empty() {
        "<untitled form>"
    } else {
        builder.title()
    };
    lines.push(format!("Form Title: {}", title));
    if builder.is_empty() {
        lines.push("Form Canvas: (empty)".to_string());
        return lines.join("\n");
    }

    lines.push("Form Canvas:".to_string());
    for (index, field) in builder.fields().iter().enumerate() {
        lines.push(format!(
            "{}. {} [{}] ({})",
            index + 1,
            field.label,
            field.kind.label(),
            field.id
        ));
        match field.kind {
            FieldType::Select => {
                let raw = field.options.as_deref().unwrap_or_default().join(",");
                lines.push(format!("   options: {}", raw));
            }
            FieldType::File => {
                lines.push("   This is a \"File Upload\" question. (Preview only)".to_string());
            }
            FieldType::Text | FieldType::Textarea => {}
        }
    }

    lines.join("\n")
}
