use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use form_spec::{
    AnswerSet, Field, FieldType, FillPayload, PendingUploads, StoredForm, UploadFile,
    build_fill_payload,
};

use crate::backend::{BackendError, FormBackend};

pub const SUBMITTED_MESSAGE: &str = "Form submitted!";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("form has no question '{0}'")]
    UnknownQuestion(String),
    #[error("question '{id}' is a {actual} question, expected {expected}")]
    WrongFieldType {
        id: String,
        actual: FieldType,
        expected: &'static str,
    },
    #[error("'{value}' is not an option of question '{id}' (choose one of: {options})")]
    InvalidOption {
        id: String,
        value: String,
        options: String,
    },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Answers and picked files for one loaded form.
pub struct FillSession {
    backend: Arc<dyn FormBackend>,
    form: StoredForm,
    answers: AnswerSet,
    uploads: PendingUploads,
}

impl FillSession {
    /// Fetch the form and start with empty input.
    pub async fn load(backend: Arc<dyn FormBackend>, id: &str) -> Result<Self, SessionError> {
        let form = backend.fetch_form(id).await?;
        debug!(form_id = %form.id, fields = form.schema.fields.len(), "form loaded");
        Ok(Self {
            backend,
            form,
            answers: AnswerSet::new(),
            uploads: PendingUploads::new(),
        })
    }

    pub fn form(&self) -> &StoredForm {
        &self.form
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn uploads(&self) -> &PendingUploads {
        &self.uploads
    }

    pub fn payload(&self) -> FillPayload {
        build_fill_payload(&self.form, &self.answers, &self.uploads)
    }

    /// Record a typed or selected answer. An empty value clears a selection.
    pub fn set_answer(&mut self, question_id: &str, value: &str) -> Result<(), SessionError> {
        let field = self.field(question_id)?;
        match field.kind {
            FieldType::Text | FieldType::Textarea => {
                self.answers.set(question_id, value);
            }
            FieldType::Select => {
                let selected = value.trim();
                let options = field.display_options();
                if !selected.is_empty() && !options.iter().any(|option| option == selected) {
                    return Err(SessionError::InvalidOption {
                        id: question_id.to_string(),
                        value: selected.to_string(),
                        options: options.join(", "),
                    });
                }
                self.answers.set(question_id, selected);
            }
            FieldType::File => {
                return Err(SessionError::WrongFieldType {
                    id: question_id.to_string(),
                    actual: field.kind,
                    expected: "text, textarea or select",
                });
            }
        }
        Ok(())
    }

    /// Pick (or clear, with `None`) the file for a file question.
    pub fn attach_file(
        &mut self,
        question_id: &str,
        file: Option<UploadFile>,
    ) -> Result<(), SessionError> {
        let field = self.field(question_id)?;
        if field.kind != FieldType::File {
            return Err(SessionError::WrongFieldType {
                id: question_id.to_string(),
                actual: field.kind,
                expected: "file",
            });
        }
        self.uploads.attach(question_id, file);
        Ok(())
    }

    /// Upload attached files, post the answers and reset the input.
    ///
    /// Each uploaded file's URL replaces the answer under its question id.
    /// Input is only reset once the backend accepted the submission.
    pub async fn submit(&mut self) -> Result<AnswerSet, SessionError> {
        let mut final_answers = self.answers.clone();
        for (question_id, file) in self.uploads.attached() {
            let url = self.backend.upload_file(file).await?;
            final_answers.set(question_id, url);
        }

        self.backend
            .submit_answers(&self.form.id, &final_answers)
            .await?;
        info!(form_id = %self.form.id, answers = final_answers.len(), "form submitted");

        self.answers.clear();
        self.uploads.clear();
        Ok(final_answers)
    }

    fn field(&self, question_id: &str) -> Result<&Field, SessionError> {
        self.form
            .schema
            .field(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))
    }
}
