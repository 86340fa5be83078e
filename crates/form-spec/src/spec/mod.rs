pub mod field;
pub mod form;

pub use field::{Field, FieldType, ParseFieldTypeError};
pub use form::{FormSchema, StoredForm};
