use async_trait::async_trait;
use thiserror::Error;

use form_spec::{AnswerSet, FormSchema, StoredForm, UploadFile};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("form '{0}' was not found")]
    NotFound(String),
    #[error("upload of '{name}' failed: {reason}")]
    Upload { name: String, reason: String },
    #[error("backend request failed: {0}")]
    Request(String),
}

/// Calls the builder and fill views make against the forms backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormBackend: Send + Sync {
    /// Store a schema and return the id it is reachable under.
    async fn save_schema(&self, schema: &FormSchema) -> Result<String, BackendError>;

    /// Load a form for the fill view.
    async fn fetch_form(&self, id: &str) -> Result<StoredForm, BackendError>;

    /// Upload a file and return the URL it is served from.
    async fn upload_file(&self, file: &UploadFile) -> Result<String, BackendError>;

    /// Post the final answers of a fill session.
    async fn submit_answers(&self, form_id: &str, answers: &AnswerSet) -> Result<(), BackendError>;
}
