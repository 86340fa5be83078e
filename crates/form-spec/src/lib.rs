#![allow(missing_docs)]

pub mod answers;
pub mod builder;
pub mod link;
pub mod render;
pub mod route;
pub mod spec;
pub mod validate;

pub use answers::{AnswerSet, PendingUploads, UploadFile};
pub use builder::{BuilderError, FormBuilder};
pub use link::{DEFAULT_BASE_URL, LinkError, LinkTemplate};
pub use render::{
    FillPayload, FillProgress, FillQuestion, RenderStatus, build_fill_payload, render_canvas_text,
    render_fill_json, render_fill_text,
};
pub use route::{Route, RouteError};
pub use spec::{Field, FieldType, FormSchema, StoredForm};
pub use validate::{SchemaIssue, SchemaReport, ValidationError, ValidationResult};
pub use validate::{validate_answers, validate_schema};
