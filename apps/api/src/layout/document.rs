//! Laid-out report structure handed to serializers.

use serde::Serialize;

/// Page-1 header: centred title, centred date line and a separator rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageHeader {
    pub title: String,
    pub date_line: String,
    /// Horizontal centre both header lines are aligned on.
    pub center_x: f32,
    pub title_y: f32,
    pub date_y: f32,
    pub rule_y: f32,
    pub rule_x_start: f32,
    pub rule_x_end: f32,
}

/// A body line at its final position. `y` is the baseline offset from the top
/// of the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    /// Index of the source paragraph among the non-empty paragraphs.
    pub paragraph: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub header: Option<PageHeader>,
    pub lines: Vec<PlacedLine>,
    /// Set when an oversized paragraph runs past the bottom margin.
    pub overflows: bool,
}

impl Page {
    pub(crate) fn new(number: usize, header: Option<PageHeader>) -> Self {
        Self {
            number,
            header,
            lines: Vec::new(),
            overflows: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub page_width: f32,
    pub page_height: f32,
    /// Body font size in points.
    pub font_size: f32,
    pub line_height: f32,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }
}
