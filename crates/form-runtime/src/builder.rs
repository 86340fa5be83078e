use thiserror::Error;
use tracing::info;

use form_spec::{FormBuilder, LinkError, LinkTemplate};

use crate::backend::{BackendError, FormBackend};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Link(#[from] LinkError),
}

/// Result of saving the builder state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedForm {
    pub id: String,
    pub link: String,
}

impl SavedForm {
    pub fn message(&self) -> String {
        format!("Form saved! Link: {}", self.link)
    }
}

/// Save the current title and fields and hand back the share link.
pub async fn save_form(
    backend: &dyn FormBackend,
    builder: &FormBuilder,
    links: &LinkTemplate,
) -> Result<SavedForm, SaveError> {
    let schema = builder.schema();
    let id = backend.save_schema(&schema).await?;
    let link = links.render(&id)?;
    info!(form_id = %id, link = %link, "form saved");
    Ok(SavedForm { id, link })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockFormBackend;
    use form_spec::FieldType;

    #[tokio::test]
    async fn save_posts_title_and_fields() {
        let mut builder = FormBuilder::new();
        builder.set_title("Signup");
        builder.add_field(FieldType::Text);
        builder.add_field(FieldType::Select);

        let mut backend = MockFormBackend::new();
        backend
            .expect_save_schema()
            .withf(|schema| schema.title == "Signup" && schema.fields.len() == 2)
            .times(1)
            .returning(|_| Ok("form-42".to_string()));

        let saved = save_form(&backend, &builder, &LinkTemplate::default())
            .await
            .expect("save");
        assert_eq!(saved.id, "form-42");
        assert_eq!(
            saved.message(),
            "Form saved! Link: http://localhost:3000/forms/form-42"
        );
    }

    #[tokio::test]
    async fn backend_failure_is_propagated() {
        let mut backend = MockFormBackend::new();
        backend
            .expect_save_schema()
            .returning(|_| Err(BackendError::Request("offline".into())));

        let err = save_form(&backend, &FormBuilder::new(), &LinkTemplate::default())
            .await
            .expect_err("save fails");
        assert!(matches!(err, SaveError::Backend(_)));
    }
}
