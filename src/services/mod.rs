pub mod document_converter;
pub mod template_renderer;

pub use document_converter::DocumentConverter;
pub use template_renderer::{substitute_placeholder, TemplateRenderer};
