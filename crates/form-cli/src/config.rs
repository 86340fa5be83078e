use std::env;

use form_runtime::{DEFAULT_UPLOAD_BASE_URL, MockConfig};
use form_spec::{DEFAULT_BASE_URL, LinkError, LinkTemplate, link::DEFAULT_LINK_TEMPLATE};

pub const BASE_URL_VAR: &str = "FORMKIT_BASE_URL";
pub const LINK_TEMPLATE_VAR: &str = "FORMKIT_LINK_TEMPLATE";
pub const UPLOAD_BASE_URL_VAR: &str = "FORMKIT_UPLOAD_BASE_URL";

/// Settings resolved from flags and `FORMKIT_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub base_url: String,
    pub link_template: String,
    pub upload_base_url: String,
}

impl CliConfig {
    pub fn from_env(base_url_flag: Option<String>) -> Self {
        Self::resolve(base_url_flag, |key| env::var(key).ok())
    }

    /// Flags win over the environment, which wins over the defaults.
    pub fn resolve(base_url_flag: Option<String>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            base_url: base_url_flag
                .filter(|value| !value.trim().is_empty())
                .or_else(|| non_empty(BASE_URL_VAR))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            link_template: non_empty(LINK_TEMPLATE_VAR)
                .unwrap_or_else(|| DEFAULT_LINK_TEMPLATE.to_string()),
            upload_base_url: non_empty(UPLOAD_BASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_UPLOAD_BASE_URL.to_string()),
        }
    }

    pub fn links(&self) -> Result<LinkTemplate, LinkError> {
        LinkTemplate::new(&self.base_url, &self.link_template)
    }

    pub fn mock(&self) -> MockConfig {
        MockConfig {
            upload_base_url: self.upload_base_url.clone(),
        }
    }
}
