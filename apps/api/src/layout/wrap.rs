//! Paragraph splitting and greedy word-wrap.
//!
//! Widths come from the injected [`TextMeasure`]. Words are measured once and
//! line widths are summed from them, relying on the measurer being additive.

use std::borrow::Cow;

use serde::Serialize;

use crate::layout::font_metrics::TextMeasure;

/// One width-constrained line of a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrappedLine {
    pub text: String,
    pub width: f32,
}

/// Converts CRLF line endings so the blank-line separator is always `"\n\n"`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Splits text on blank-line separators, dropping whitespace-only paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .filter(|paragraph| !paragraph.trim().is_empty())
        .collect()
}

/// Greedy word-wrap of one paragraph.
///
/// Single newlines inside the paragraph are forced breaks; blank lines are kept
/// as empty lines, including a leading one left by a run of three newlines.
/// Words are never broken unless a single word is wider than `max_width` on
/// its own. Each word is measured once, so the cost is linear in the text.
pub fn wrap_paragraph(
    paragraph: &str,
    max_width: f32,
    font_size: f32,
    measure: &dyn TextMeasure,
) -> Vec<WrappedLine> {
    let space_width = measure.measure(" ", font_size);
    let mut lines = Vec::new();

    for raw_line in paragraph.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in raw_line.split_whitespace() {
            for (piece, piece_width) in fit_word(word, max_width, font_size, measure) {
                if current.is_empty() {
                    current.push_str(piece);
                    current_width = piece_width;
                    continue;
                }

                let candidate_width = current_width + space_width + piece_width;
                if candidate_width > max_width {
                    // Current line is full: flush it and start the next one with this piece.
                    lines.push(WrappedLine {
                        text: std::mem::take(&mut current),
                        width: current_width,
                    });
                    current.push_str(piece);
                    current_width = piece_width;
                } else {
                    current.push(' ');
                    current.push_str(piece);
                    current_width = candidate_width;
                }
            }
        }

        lines.push(WrappedLine {
            text: current,
            width: current_width,
        });
    }

    lines
}

/// Returns the word with its width when it fits, otherwise splits it at
/// character boundaries into pieces that each fit.
fn fit_word<'a>(
    word: &'a str,
    max_width: f32,
    font_size: f32,
    measure: &dyn TextMeasure,
) -> Vec<(&'a str, f32)> {
    let width = measure.measure(word, font_size);
    if width <= max_width {
        return vec![(word, width)];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    let mut piece_width = 0.0_f32;

    for (idx, ch) in word.char_indices() {
        let ch_width = measure.measure(&word[idx..idx + ch.len_utf8()], font_size);
        if idx > start && piece_width + ch_width > max_width {
            pieces.push((&word[start..idx], piece_width));
            start = idx;
            piece_width = 0.0;
        }
        piece_width += ch_width;
    }
    if start < word.len() {
        pieces.push((&word[start..], piece_width));
    }

    pieces
}
