//! Page geometry for the review report and its validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cursor offset below the top margin on page 1 (title, date line and rule).
pub const FIRST_PAGE_BODY_OFFSET: f32 = 30.0;
/// Cursor offset below the top margin on every later page.
pub const CONTINUATION_BODY_OFFSET: f32 = 20.0;
/// Baseline of the date line below the top margin.
pub const DATE_LINE_OFFSET: f32 = 10.0;
/// Separator rule position below the top margin.
pub const RULE_OFFSET: f32 = 15.0;

pub const TITLE_FONT_SIZE: f32 = 16.0;
pub const DATE_FONT_SIZE: f32 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("Invalid layout config: {0}")]
    InvalidConfig(String),
}

/// Layout parameters for one report. Lengths are in layout units (mm for the
/// default A4 report); font sizes are in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub title_text: String,
    pub font_size: f32,
    pub line_height: f32,
    /// Gap added after every paragraph block.
    pub paragraph_spacing: f32,
    /// Date printed on the header's "Generated on" line.
    pub generated_on: NaiveDate,
}

impl LayoutConfig {
    /// A4 portrait, 20mm margins, 11pt body on 7mm lines.
    pub fn a4_report(title_text: impl Into<String>, generated_on: NaiveDate) -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 20.0,
            title_text: title_text.into(),
            font_size: 11.0,
            line_height: 7.0,
            paragraph_spacing: 5.0,
            generated_on,
        }
    }

    /// Usable line width between the side margins.
    pub fn max_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Lowest y any line may reach.
    pub fn bottom_limit(&self) -> f32 {
        self.page_height - self.margin
    }

    pub fn first_page_start(&self) -> f32 {
        self.margin + FIRST_PAGE_BODY_OFFSET
    }

    pub fn continuation_page_start(&self) -> f32 {
        self.margin + CONTINUATION_BODY_OFFSET
    }

    /// The header's date line, e.g. `Generated on: 3/7/2025`.
    pub fn date_line(&self) -> String {
        format!("Generated on: {}", self.generated_on.format("%-m/%-d/%Y"))
    }

    /// Rejects geometry that cannot hold a single line of text.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("margin", self.margin),
            ("font_size", self.font_size),
            ("line_height", self.line_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if !self.paragraph_spacing.is_finite() || self.paragraph_spacing < 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "paragraph_spacing must be zero or positive, got {}",
                self.paragraph_spacing
            )));
        }

        if self.margin * 2.0 >= self.page_width {
            return Err(LayoutError::InvalidConfig(format!(
                "margins ({} x 2) leave no room on a page {} wide",
                self.margin, self.page_width
            )));
        }

        if self.margin >= self.page_height {
            return Err(LayoutError::InvalidConfig(format!(
                "margin {} must be smaller than page height {}",
                self.margin, self.page_height
            )));
        }

        Ok(())
    }
}

/// Optional overrides accepted from API callers. Unset fields keep the
/// server's report defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutOptions {
    pub page_width: Option<f32>,
    pub page_height: Option<f32>,
    pub margin: Option<f32>,
    pub font_size: Option<f32>,
    pub line_height: Option<f32>,
    pub paragraph_spacing: Option<f32>,
}

impl LayoutOptions {
    pub fn apply(&self, mut config: LayoutConfig) -> LayoutConfig {
        if let Some(v) = self.page_width {
            config.page_width = v;
        }
        if let Some(v) = self.page_height {
            config.page_height = v;
        }
        if let Some(v) = self.margin {
            config.margin = v;
        }
        if let Some(v) = self.font_size {
            config.font_size = v;
        }
        if let Some(v) = self.line_height {
            config.line_height = v;
        }
        if let Some(v) = self.paragraph_spacing {
            config.paragraph_spacing = v;
        }
        config
    }
}
