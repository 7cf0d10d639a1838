// Report layout: greedy word-wrap over static font metrics and atomic
// paragraph pagination. Pure and CPU-bound; async callers must run it inside
// tokio::task::spawn_blocking.

pub mod config;
pub mod document;
pub mod font_metrics;
pub mod paginator;
pub mod wrap;

// Re-export the public API consumed by handlers and the PDF renderer.
pub use config::{LayoutConfig, LayoutError, LayoutOptions};
pub use document::Document;
pub use font_metrics::{FontFamily, FontMeasure};
pub use paginator::layout;

/// Test measurer: every character is one unit wide regardless of font size.
#[cfg(test)]
pub(crate) struct MonospaceMeasure;

#[cfg(test)]
impl font_metrics::TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, _font_size: f32) -> f32 {
        text.chars().count() as f32
    }
}
