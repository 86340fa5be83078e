use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use form_spec::{AnswerSet, Field, FieldType, FormSchema, StoredForm, UploadFile};

use crate::backend::{BackendError, FormBackend};

pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://fakeazure.blob.core.windows.net/...";

#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Prefix of the URLs handed back for uploaded files.
    pub upload_base_url: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
        }
    }
}

/// Answers recorded by [`MockBackend::submit_answers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub form_id: String,
    pub answers: AnswerSet,
}

/// A file accepted by [`MockBackend::upload_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub url: String,
    pub content_type: Option<String>,
    pub size: usize,
}

/// The canned form served for ids nobody saved.
pub fn mock_form(id: &str) -> StoredForm {
    StoredForm {
        id: id.to_string(),
        schema: FormSchema {
            title: "Mock Form Title".into(),
            fields: vec![
                Field {
                    id: "q1".into(),
                    kind: FieldType::Text,
                    label: "Your Name".into(),
                    options: None,
                },
                Field {
                    id: "q2".into(),
                    kind: FieldType::Select,
                    label: "Favorite Color".into(),
                    options: Some(vec!["Red".into(), "Green".into(), "Blue".into()]),
                },
                Field {
                    id: "q3".into(),
                    kind: FieldType::File,
                    label: "Upload a File".into(),
                    options: None,
                },
            ],
        },
    }
}

/// Backend stand-in: every call logs and succeeds immediately.
///
/// Saved forms are kept for the lifetime of the value so a form built in
/// one view can be opened in the other; nothing outlives the process.
#[derive(Debug, Default)]
pub struct MockBackend {
    config: MockConfig,
    forms: Mutex<Vec<StoredForm>>,
    uploads: Mutex<Vec<UploadRecord>>,
    submissions: Mutex<Vec<Submission>>,
}

impl MockBackend {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Serve `form` for its id instead of the canned form.
    pub fn with_form(self, form: StoredForm) -> Self {
        lock(&self.forms).push(form);
        self
    }

    pub fn saved_forms(&self) -> Vec<StoredForm> {
        lock(&self.forms).clone()
    }

    pub fn uploaded(&self) -> Vec<UploadRecord> {
        lock(&self.uploads).clone()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        lock(&self.submissions).clone()
    }

    fn upload_url(&self, file_name: &str) -> String {
        format!(
            "{}/{}",
            self.config.upload_base_url.trim_end_matches('/'),
            file_name
        )
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl FormBackend for MockBackend {
    async fn save_schema(&self, schema: &FormSchema) -> Result<String, BackendError> {
        let encoded = serde_json::to_string(schema)
            .map_err(|err| BackendError::Request(format!("encode schema: {}", err)))?;
        info!(title = %schema.title, fields = schema.fields.len(), "saving form schema");
        debug!(schema = %encoded, "form schema payload");

        let id = Uuid::new_v4().to_string();
        lock(&self.forms).push(StoredForm {
            id: id.clone(),
            schema: schema.clone(),
        });
        Ok(id)
    }

    async fn fetch_form(&self, id: &str) -> Result<StoredForm, BackendError> {
        let saved = lock(&self.forms)
            .iter()
            .rev()
            .find(|form| form.id == id)
            .cloned();
        match saved {
            Some(form) => {
                debug!(form_id = id, "serving saved form");
                Ok(form)
            }
            None => {
                debug!(form_id = id, "serving canned form");
                Ok(mock_form(id))
            }
        }
    }

    async fn upload_file(&self, file: &UploadFile) -> Result<String, BackendError> {
        let url = self.upload_url(&file.name);
        let content_type = file.content_type.as_deref().unwrap_or("application/octet-stream");
        info!(
            name = %file.name,
            content_type,
            bytes = file.size(),
            url = %url,
            "uploading file"
        );
        lock(&self.uploads).push(UploadRecord {
            url: url.clone(),
            content_type: file.content_type.clone(),
            size: file.size(),
        });
        Ok(url)
    }

    async fn submit_answers(&self, form_id: &str, answers: &AnswerSet) -> Result<(), BackendError> {
        let encoded = serde_json::to_string(answers)
            .map_err(|err| BackendError::Request(format!("encode answers: {}", err)))?;
        info!(form_id, answers = %encoded, "submitting to backend");
        lock(&self.submissions).push(Submission {
            form_id: form_id.to_string(),
            answers: answers.clone(),
        });
        Ok(())
    }
}
