//! Runtime side of the form tooling: the backend contract, its mocked
//! implementation, the builder save flow and fill sessions.

pub mod backend;
pub mod builder;
pub mod mock;
pub mod session;

pub use backend::{BackendError, FormBackend};
pub use builder::{SaveError, SavedForm, save_form};
pub use mock::{
    DEFAULT_UPLOAD_BASE_URL, MockBackend, MockConfig, Submission, UploadRecord, mock_form,
};
pub use session::{FillSession, SUBMITTED_MESSAGE, SessionError};
