//! Pagination: places wrapped paragraph blocks onto fixed-size pages.
//!
//! # Placement rules
//! - The body cursor starts at `margin + 30` on page 1 (below the header) and at
//!   `margin + 20` on every later page.
//! - A paragraph block is atomic: if `y + lines * line_height` would pass
//!   `page_height - margin`, the whole block moves to a new page.
//! - A block taller than a page is still placed whole at the top of a new page
//!   and runs past the bottom margin; that page is marked `overflows`.
//! - After each block the cursor advances by its height plus `paragraph_spacing`.

use tracing::{debug, warn};

use crate::layout::config::{LayoutConfig, LayoutError, DATE_LINE_OFFSET, RULE_OFFSET};
use crate::layout::document::{Document, Page, PageHeader, PlacedLine};
use crate::layout::font_metrics::TextMeasure;
use crate::layout::wrap::{normalize_newlines, split_paragraphs, wrap_paragraph, WrappedLine};

/// Where the next paragraph block goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    CurrentPage,
    NeedNewPage,
}

/// Accumulates pages while tracking the vertical cursor on the last one.
struct PageCursor<'c> {
    config: &'c LayoutConfig,
    pages: Vec<Page>,
    y: f32,
}

impl<'c> PageCursor<'c> {
    fn new(config: &'c LayoutConfig) -> Self {
        Self {
            config,
            pages: vec![Page::new(1, Some(build_header(config)))],
            y: config.first_page_start(),
        }
    }

    fn placement_for(&self, space_needed: f32) -> Placement {
        if self.y + space_needed > self.config.bottom_limit() {
            Placement::NeedNewPage
        } else {
            Placement::CurrentPage
        }
    }

    fn start_new_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page::new(number, None));
        self.y = self.config.continuation_page_start();
    }

    fn place_block(&mut self, paragraph: usize, lines: Vec<WrappedLine>, space_needed: f32) {
        let config = self.config;
        let top = self.y;
        let overflows = top + space_needed > config.bottom_limit();

        let Some(page) = self.pages.last_mut() else {
            return;
        };

        if overflows {
            page.overflows = true;
            warn!(
                page = page.number,
                paragraph,
                lines = lines.len(),
                "Paragraph is taller than the page body and runs past the bottom margin"
            );
        }

        page.lines.extend(lines.into_iter().enumerate().map(|(i, line)| PlacedLine {
            text: line.text,
            x: config.margin,
            y: top + i as f32 * config.line_height,
            width: line.width,
            paragraph,
        }));

        self.y = top + space_needed + config.paragraph_spacing;
    }

    fn finish(self) -> Document {
        Document {
            page_width: self.config.page_width,
            page_height: self.config.page_height,
            font_size: self.config.font_size,
            line_height: self.config.line_height,
            pages: self.pages,
        }
    }
}

fn build_header(config: &LayoutConfig) -> PageHeader {
    PageHeader {
        title: config.title_text.clone(),
        date_line: config.date_line(),
        center_x: config.page_width / 2.0,
        title_y: config.margin,
        date_y: config.margin + DATE_LINE_OFFSET,
        rule_y: config.margin + RULE_OFFSET,
        rule_x_start: config.margin,
        rule_x_end: config.page_width - config.margin,
    }
}

/// Lays review text out over fixed-size pages.
///
/// Fails only on invalid geometry; empty or whitespace-only text yields the
/// title page alone. Pure and deterministic for a deterministic `measure`.
pub fn layout(
    text: &str,
    config: &LayoutConfig,
    measure: &dyn TextMeasure,
) -> Result<Document, LayoutError> {
    config.validate()?;

    let normalized = normalize_newlines(text);
    let paragraphs = split_paragraphs(&normalized);
    let max_width = config.max_width();

    let mut cursor = PageCursor::new(config);

    for (index, paragraph) in paragraphs.iter().enumerate() {
        let lines = wrap_paragraph(paragraph, max_width, config.font_size, measure);
        let space_needed = lines.len() as f32 * config.line_height;

        if cursor.placement_for(space_needed) == Placement::NeedNewPage {
            cursor.start_new_page();
        }
        cursor.place_block(index, lines, space_needed);
    }

    let document = cursor.finish();
    debug!(
        paragraphs = paragraphs.len(),
        pages = document.page_count(),
        lines = document.line_count(),
        "Laid out review document"
    );
    Ok(document)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
