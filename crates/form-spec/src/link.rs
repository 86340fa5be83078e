use handlebars::Handlebars;
use serde_json::json;
use thiserror::Error;

use crate::route::Route;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_LINK_TEMPLATE: &str = "{{base_url}}/forms/{{id}}";

const TEMPLATE_NAME: &str = "share_link";

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("invalid link template: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),
    #[error("failed to render link: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Renders the share link handed out after a form is saved.
///
/// Templates see `base_url`, `id` and `path` (the fill route).
pub struct LinkTemplate {
    registry: Handlebars<'static>,
    base_url: String,
}

impl LinkTemplate {
    pub fn new(base_url: &str, template: &str) -> Result<Self, LinkError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(Box::new)?;
        Ok(Self {
            registry,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, LinkError> {
        Self::new(base_url, DEFAULT_LINK_TEMPLATE)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn render(&self, form_id: &str) -> Result<String, LinkError> {
        let route = Route::Fill {
            id: form_id.to_string(),
        };
        let data = json!({
            "base_url": self.base_url,
            "id": form_id,
            "path": route.path(),
        });
        Ok(self.registry.render(TEMPLATE_NAME, &data)?)
    }
}

impl Default for LinkTemplate {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL).expect("default link template is valid")
    }
}
