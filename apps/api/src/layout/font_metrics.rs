//! Static font-metric tables for the PDF base-14 fonts used by the report.
//!
//! Character widths are in em units (relative to font size), taken from the
//! Adobe AFM files for the standard Type1 fonts. The report is written with
//! WinAnsiEncoding, so text is measured in that code page: every char goes
//! through [`win_ansi_byte`], the same mapping the PDF renderer uses, and the
//! width of the resulting byte is looked up. Layout width and drawn width are
//! therefore identical.
//!
//! Tables cover bytes 0x20..=0xFF (224 slots). Index = byte - 32.

use serde::{Deserialize, Serialize};

/// Millimetres per PostScript point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

// ────────────────────────────────────────────────────────────────────────────
// Measurement seam
// ────────────────────────────────────────────────────────────────────────────

/// Measures the rendered width of a run of text, in layout units.
///
/// Widths must be additive (no kerning): the width of `"ab"` equals the width
/// of `"a"` plus the width of `"b"`. Word-wrap relies on this to extend lines
/// without re-measuring them.
pub trait TextMeasure: Send + Sync {
    fn measure(&self, text: &str, font_size: f32) -> f32;
}

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

/// The base-14 families the report renderer knows how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    /// Body text and date line.
    Helvetica,
    /// Report title.
    HelveticaBold,
}

impl FontFamily {
    /// PostScript name written into the PDF font dictionary.
    pub fn base_font(self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica",
            FontFamily::HelveticaBold => "Helvetica-Bold",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font family.
///
/// `widths[i]` = width of WinAnsi byte `(i + 32)` at 1em.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~  [95]=DEL
/// [96..223]=0x80..=0xFF (WinAnsi upper half; 0x81 0x8D 0x8F 0x90 0x9D unused)
/// ```
pub struct FontMetricTable {
    pub font: FontFamily,
    widths: [f32; 224],
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.byte_width(win_ansi_byte(c))).sum()
    }

    /// Width of one encoded byte in em units. Bytes below 0x20 are not drawn.
    pub fn byte_width(&self, byte: u8) -> f32 {
        if byte < 0x20 {
            return 0.0;
        }
        self.widths[usize::from(byte) - 32]
    }
}

/// Maps a char to its WinAnsiEncoding byte. Tabs become spaces; anything
/// outside the code page becomes `?`. Never returns a control byte.
pub fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        '\t' => b' ',
        _ => b'?',
    }
}

/// A metric table bound to a unit system.
///
/// `units_per_point` converts point-sized widths into layout units: 1.0 keeps
/// points, `MM_PER_PT` yields millimetres.
#[derive(Clone, Copy)]
pub struct FontMeasure {
    table: &'static FontMetricTable,
    units_per_point: f32,
}

impl FontMeasure {
    pub fn new(font: FontFamily, units_per_point: f32) -> Self {
        Self {
            table: get_metrics(font),
            units_per_point,
        }
    }

    /// Measures in millimetres, the unit the report layout works in.
    pub fn millimetres(font: FontFamily) -> Self {
        Self::new(font, MM_PER_PT)
    }

    /// Measures in PostScript points.
    pub fn points(font: FontFamily) -> Self {
        Self::new(font, 1.0)
    }
}

impl TextMeasure for FontMeasure {
    fn measure(&self, text: &str, font_size: f32) -> f32 {
        self.table.measure_str(text) * font_size * self.units_per_point
    }
}

impl std::fmt::Debug for FontMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMeasure")
            .field("font", &self.table.font)
            .field("units_per_point", &self.units_per_point)
            .finish()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (WinAnsi bytes 0x20..=0xFF)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Helvetica,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
        // 0x7F (DEL, never encoded)
        0.000,
        // 0x80
        0.556, 0.000, 0.222, 0.556, 0.333, 1.000, 0.556, 0.556, 0.333, 1.000, 0.667, 0.333, 1.000, 0.000, 0.611, 0.000,
        // 0x90
        0.000, 0.222, 0.222, 0.333, 0.333, 0.350, 0.556, 1.000, 0.333, 1.000, 0.500, 0.333, 0.944, 0.000, 0.500, 0.667,
        // 0xA0
        0.278, 0.333, 0.556, 0.556, 0.556, 0.556, 0.260, 0.556, 0.333, 0.737, 0.370, 0.556, 0.584, 0.333, 0.737, 0.333,
        // 0xB0
        0.400, 0.584, 0.333, 0.333, 0.333, 0.556, 0.537, 0.278, 0.333, 0.333, 0.365, 0.556, 0.834, 0.834, 0.834, 0.611,
        // 0xC0
        0.667, 0.667, 0.667, 0.667, 0.667, 0.667, 1.000, 0.722, 0.667, 0.667, 0.667, 0.667, 0.278, 0.278, 0.278, 0.278,
        // 0xD0
        0.722, 0.722, 0.778, 0.778, 0.778, 0.778, 0.778, 0.584, 0.778, 0.722, 0.722, 0.722, 0.722, 0.667, 0.667, 0.611,
        // 0xE0
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.889, 0.500, 0.556, 0.556, 0.556, 0.556, 0.278, 0.278, 0.278, 0.278,
        // 0xF0
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.584, 0.611, 0.556, 0.556, 0.556, 0.556, 0.500, 0.556, 0.500,
    ],
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::HelveticaBold,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
        // 0x7F (DEL, never encoded)
        0.000,
        // 0x80
        0.556, 0.000, 0.278, 0.556, 0.500, 1.000, 0.556, 0.556, 0.333, 1.000, 0.667, 0.333, 1.000, 0.000, 0.611, 0.000,
        // 0x90
        0.000, 0.278, 0.278, 0.500, 0.500, 0.350, 0.556, 1.000, 0.333, 1.000, 0.556, 0.333, 0.944, 0.000, 0.500, 0.667,
        // 0xA0
        0.278, 0.333, 0.556, 0.556, 0.556, 0.556, 0.280, 0.556, 0.333, 0.737, 0.370, 0.556, 0.584, 0.333, 0.737, 0.333,
        // 0xB0
        0.400, 0.584, 0.333, 0.333, 0.333, 0.611, 0.556, 0.278, 0.333, 0.333, 0.365, 0.556, 0.834, 0.834, 0.834, 0.611,
        // 0xC0
        0.722, 0.722, 0.722, 0.722, 0.722, 0.722, 1.000, 0.722, 0.667, 0.667, 0.667, 0.667, 0.278, 0.278, 0.278, 0.278,
        // 0xD0
        0.722, 0.722, 0.778, 0.778, 0.778, 0.778, 0.778, 0.584, 0.778, 0.722, 0.722, 0.722, 0.722, 0.667, 0.667, 0.611,
        // 0xE0
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.889, 0.556, 0.556, 0.556, 0.556, 0.556, 0.278, 0.278, 0.278, 0.278,
        // 0xF0
        0.611, 0.611, 0.611, 0.611, 0.611, 0.611, 0.611, 0.584, 0.611, 0.611, 0.611, 0.611, 0.611, 0.556, 0.611, 0.556,
    ],
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Helvetica => &HELVETICA_TABLE,
        FontFamily::HelveticaBold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        let metrics = get_metrics(FontFamily::Helvetica);
        assert_eq!(metrics.measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontFamily::Helvetica);
        // "Hello" = H(0.722) + e(0.556) + l(0.222) + l(0.222) + o(0.556) = 2.278
        let width = metrics.measure_str("Hello");
        assert!(
            (width - 2.278).abs() < 1e-3,
            "Hello width should be ~2.278, got {width}"
        );
    }

    #[test]
    fn test_measure_str_uses_win_ansi_widths() {
        let metrics = get_metrics(FontFamily::Helvetica);
        // emdash(1.000) + ellipsis(1.000) + quotedblleft(0.333) + quotedblright(0.333) + bullet(0.350)
        let width = metrics.measure_str("—…“”•");
        assert!((width - 3.016).abs() < 1e-4, "expected 3.016em, got {width}");

        let bold = get_metrics(FontFamily::HelveticaBold);
        // quotedblleft/right are 0.500 in the bold face
        assert!((bold.measure_str("“”") - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_measure_str_matches_encoded_bytes() {
        for font in [FontFamily::Helvetica, FontFamily::HelveticaBold] {
            let metrics = get_metrics(font);
            let text = "Æsthetic café — 50‰ “naïve” ™ Œuvre…";
            let by_bytes: f32 = text.chars().map(|c| metrics.byte_width(win_ansi_byte(c))).sum();
            assert!((metrics.measure_str(text) - by_bytes).abs() < 1e-4);
            assert_eq!(metrics.measure_str("Æ"), 1.0);
        }
    }

    #[test]
    fn test_unencodable_chars_measure_as_question_mark() {
        let metrics = get_metrics(FontFamily::Helvetica);
        assert_eq!(win_ansi_byte('日'), b'?');
        assert_eq!(metrics.measure_str("日本"), metrics.measure_str("??"));
        assert_eq!(metrics.measure_str("\u{7}"), metrics.measure_str("?"));
        assert_eq!(metrics.measure_str("\t"), metrics.measure_str(" "));
    }

    #[test]
    fn test_every_encoded_byte_has_a_width() {
        let metrics = get_metrics(FontFamily::Helvetica);
        for code in 0..=0x2FFFu32 {
            if let Some(c) = char::from_u32(code) {
                let byte = win_ansi_byte(c);
                assert!(byte >= 0x20 && byte != 0x7f, "{c:?} encoded to control byte");
                assert!(metrics.byte_width(byte) > 0.0, "{c:?} has no width");
            }
        }
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Peer Review Report";
        let regular = get_metrics(FontFamily::Helvetica).measure_str(text);
        let bold = get_metrics(FontFamily::HelveticaBold).measure_str(text);
        assert!(bold > regular, "bold {bold} should exceed regular {regular}");
    }

    #[test]
    fn test_font_measure_scales_to_millimetres() {
        // "Hello" = 2.278em; at 10pt that is 22.78pt = 8.036mm
        let measure = FontMeasure::millimetres(FontFamily::Helvetica);
        let width = measure.measure("Hello", 10.0);
        assert!((width - 8.036).abs() < 1e-2, "expected ~8.036mm, got {width}");
    }

    #[test]
    fn test_font_measure_points_scale_with_font_size() {
        let measure = FontMeasure::points(FontFamily::Helvetica);
        let at_10 = measure.measure("Review", 10.0);
        let at_20 = measure.measure("Review", 20.0);
        assert!((at_20 - 2.0 * at_10).abs() < 1e-3);
    }

    #[test]
    fn test_base_font_names() {
        assert_eq!(FontFamily::Helvetica.base_font(), "Helvetica");
        assert_eq!(FontFamily::HelveticaBold.base_font(), "Helvetica-Bold");
    }
}
