//! In-memory PDF serializer for laid-out review documents, built on `lopdf`.
//!
//! Layout coordinates are millimetres measured from the top-left corner; PDF
//! user space is points from the bottom-left, so every y is flipped.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream, StringFormat};
use thiserror::Error;

use crate::layout::config::{DATE_FONT_SIZE, TITLE_FONT_SIZE};
use crate::layout::document::{Document, Page, PageHeader};
use crate::layout::font_metrics::{win_ansi_byte, FontFamily, FontMeasure, TextMeasure};

const PT_PER_MM: f32 = 72.0 / 25.4;
/// Separator rule thickness, in millimetres.
const RULE_WIDTH_MM: f32 = 0.5;

const BODY_FONT: &str = "F1";
const TITLE_FONT: &str = "F2";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF library error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes a laid-out document into PDF bytes. One PDF page per `Page`.
pub fn render_pdf(document: &Document) -> Result<Vec<u8>, RenderError> {
    let mut pdf = lopdf::Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let body_font_id = pdf.add_object(font_dictionary(FontFamily::Helvetica));
    let title_font_id = pdf.add_object(font_dictionary(FontFamily::HelveticaBold));
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            BODY_FONT => body_font_id,
            TITLE_FONT => title_font_id,
        },
    });

    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        (document.page_width * PT_PER_MM).into(),
        (document.page_height * PT_PER_MM).into(),
    ];

    let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let content = page_content(page, document);
        let content_id = pdf.add_object(compressed_stream(&content)?);

        let page_id: ObjectId = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.clone(),
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id = pdf.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    pdf.trailer.set("Root", catalog_id);

    if let Some(header) = document.pages.first().and_then(|p| p.header.as_ref()) {
        let info_id = pdf.add_object(dictionary! {
            "Title" => win_ansi_string(&header.title),
            "Producer" => Object::string_literal(concat!("peer-review-api ", env!("CARGO_PKG_VERSION"))),
        });
        pdf.trailer.set("Info", info_id);
    }

    let mut buffer = Vec::new();
    pdf.save_to(&mut buffer)?;
    Ok(buffer)
}

fn font_dictionary(font: FontFamily) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn compressed_stream(content: &Content) -> Result<Stream, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&content.encode()?)?;
    let compressed = encoder.finish()?;
    Ok(Stream::new(dictionary! { "Filter" => "FlateDecode" }, compressed))
}

/// Builds the content stream operations for one page.
fn page_content(page: &Page, document: &Document) -> Content {
    let mut operations = Vec::new();

    if let Some(header) = &page.header {
        push_header(&mut operations, header, document.page_height);
    }

    if !page.lines.is_empty() {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![BODY_FONT.into(), document.font_size.into()],
        ));
        for line in page.lines.iter().filter(|l| !l.text.is_empty()) {
            // Absolute positioning: reset the text matrix for every line.
            operations.push(Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    (line.x * PT_PER_MM).into(),
                    flip_y(line.y, document.page_height).into(),
                ],
            ));
            operations.push(Operation::new("Tj", vec![win_ansi_string(&line.text)]));
        }
        operations.push(Operation::new("ET", vec![]));
    }

    Content { operations }
}

fn push_header(operations: &mut Vec<Operation>, header: &PageHeader, page_height: f32) {
    let center_pt = header.center_x * PT_PER_MM;

    let title_width =
        FontMeasure::points(FontFamily::HelveticaBold).measure(&header.title, TITLE_FONT_SIZE);
    let date_width =
        FontMeasure::points(FontFamily::Helvetica).measure(&header.date_line, DATE_FONT_SIZE);

    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new("Tf", vec![TITLE_FONT.into(), TITLE_FONT_SIZE.into()]));
    operations.push(Operation::new(
        "Td",
        vec![
            (center_pt - title_width / 2.0).into(),
            flip_y(header.title_y, page_height).into(),
        ],
    ));
    operations.push(Operation::new("Tj", vec![win_ansi_string(&header.title)]));
    operations.push(Operation::new("ET", vec![]));

    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new("Tf", vec![BODY_FONT.into(), DATE_FONT_SIZE.into()]));
    operations.push(Operation::new(
        "Td",
        vec![
            (center_pt - date_width / 2.0).into(),
            flip_y(header.date_y, page_height).into(),
        ],
    ));
    operations.push(Operation::new("Tj", vec![win_ansi_string(&header.date_line)]));
    operations.push(Operation::new("ET", vec![]));

    let rule_y = flip_y(header.rule_y, page_height);
    operations.push(Operation::new("w", vec![(RULE_WIDTH_MM * PT_PER_MM).into()]));
    operations.push(Operation::new(
        "m",
        vec![(header.rule_x_start * PT_PER_MM).into(), rule_y.into()],
    ));
    operations.push(Operation::new(
        "l",
        vec![(header.rule_x_end * PT_PER_MM).into(), rule_y.into()],
    ));
    operations.push(Operation::new("S", vec![]));
}

/// Converts a top-down millimetre offset into a bottom-up point coordinate.
fn flip_y(y_mm: f32, page_height_mm: f32) -> f32 {
    (page_height_mm - y_mm) * PT_PER_MM
}

fn win_ansi_string(text: &str) -> Object {
    Object::String(to_win_ansi(text), StringFormat::Literal)
}

/// Encodes text for the standard fonts' WinAnsiEncoding, byte for byte what
/// the layout measured.
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}
