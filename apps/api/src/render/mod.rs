// Document serializers. The layout engine only guarantees page/line/offset
// structure; each format here turns that into a downloadable artifact.

pub mod pdf;

pub use pdf::{render_pdf, RenderError};
