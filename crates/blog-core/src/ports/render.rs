//! Page rendering port.

use crate::application::Page;

/// Turns a [`Page`] (template name plus context) into a document.
pub trait PageRenderer: Send + Sync {
    fn render(&self, page: &Page) -> Result<String, RenderError>;
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to render {template}: {message}")]
pub struct RenderError {
    pub template: &'static str,
    pub message: String,
}
