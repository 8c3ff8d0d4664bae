use std::collections::HashMap;
use std::path::Path;

use encoding_rs::{UTF_16BE, WINDOWS_1252};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::error::ExtractError;

/// TJ adjustments more negative than this (thousandths of an em) read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;
/// Baseline moves smaller than this stay on the same line.
const LINE_TOLERANCE: f32 = 0.5;
/// Estimated advance of one glyph, in ems. Widths are not read from font metrics.
const GLYPH_WIDTH_EMS: f32 = 0.5;
/// A horizontal jump past the pen wider than this (in ems) separates words.
const WORD_GAP_EMS: f32 = 0.15;
/// A horizontal jump wider than this (in ems), or any move back past the pen,
/// starts a new span: the text belongs to another column.
const COLUMN_GAP_EMS: f32 = 3.0;
/// Upper bound on Parent hops when collecting inherited page resources.
const MAX_PARENT_DEPTH: usize = 32;

/// A run of text shown with a single font on a single line.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub font: String,
}

/// Per-page access to ordered text spans. The parser depends on nothing else.
pub trait SpanSource {
    fn page_count(&self) -> usize;
    fn page_spans(&self, page_index: usize) -> Result<Vec<Span>, ExtractError>;
}

/// In-memory spans, one `Vec` per page.
#[cfg(test)]
impl SpanSource for Vec<Vec<Span>> {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_spans(&self, page_index: usize) -> Result<Vec<Span>, ExtractError> {
        Ok(self.get(page_index).cloned().unwrap_or_default())
    }
}

/// A loaded PDF. The whole file is held in memory and released on drop.
pub struct PdfDocument {
    doc: Document,
    pages: Vec<ObjectId>,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        if !path.is_file() {
            return Err(ExtractError::InputMissing(path.to_path_buf()));
        }
        let doc = Document::load(path).map_err(|source| ExtractError::Pdf {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_document(doc))
    }

    #[cfg(test)]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, lopdf::Error> {
        Document::load_mem(bytes).map(Self::from_document)
    }

    fn from_document(doc: Document) -> Self {
        // get_pages is keyed by 1-based page number, so values come out in page order
        let pages = doc.get_pages().into_values().collect();
        Self { doc, pages }
    }

    /// Resource name (`F1`) → BaseFont (`Arial-BoldMT`), following inherited resources.
    fn page_fonts(&self, page_id: ObjectId) -> HashMap<Vec<u8>, String> {
        let mut fonts = HashMap::new();
        let mut node = self.doc.get_dictionary(page_id).ok();
        let mut depth = 0;

        while let Some(dict) = node {
            let font_dict = dict
                .get(b"Resources")
                .ok()
                .and_then(|r| self.resolve_dict(r))
                .and_then(|res| res.get(b"Font").ok())
                .and_then(|f| self.resolve_dict(f));

            if let Some(font_dict) = font_dict {
                for (name, obj) in font_dict.iter() {
                    if fonts.contains_key(name) {
                        continue;
                    }
                    let base = self
                        .resolve_dict(obj)
                        .and_then(|f| f.get(b"BaseFont").ok())
                        .and_then(|b| b.as_name().ok());
                    if let Some(base) = base {
                        fonts.insert(name.clone(), strip_subset_prefix(base));
                    }
                }
            }

            depth += 1;
            if depth >= MAX_PARENT_DEPTH {
                break;
            }
            node = dict.get(b"Parent").ok().and_then(|p| self.resolve_dict(p));
        }

        fonts
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

impl SpanSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_spans(&self, page_index: usize) -> Result<Vec<Span>, ExtractError> {
        let Some(&page_id) = self.pages.get(page_index) else {
            return Ok(Vec::new());
        };
        let page = page_index + 1;
        let raw = self
            .doc
            .get_page_content(page_id)
            .map_err(|source| ExtractError::PageContent { page, source })?;
        let content =
            Content::decode(&raw).map_err(|source| ExtractError::PageContent { page, source })?;

        let fonts = self.page_fonts(page_id);
        let spans = collect_spans(&content, &fonts);
        debug!(page, spans = spans.len(), fonts = fonts.len(), "decoded page content");
        Ok(spans)
    }
}

/// Walk text operators, cutting a new span on every font change, baseline move,
/// or horizontal jump into another column.
fn collect_spans(content: &Content, fonts: &HashMap<Vec<u8>, String>) -> Vec<Span> {
    let mut builder = SpanBuilder::default();

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => builder.begin_text(),
            "Tf" => {
                if let Some(name) = operands.first().and_then(|o| o.as_name().ok()) {
                    let font = fonts
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(name).into_owned());
                    let size = operands.get(1).and_then(as_number).unwrap_or(0.0);
                    builder.set_font(font, size);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(as_number) {
                    builder.leading = leading;
                }
            }
            "Td" | "TD" => {
                let tx = operands.first().and_then(as_number);
                let ty = operands.get(1).and_then(as_number);
                if let (Some(tx), Some(ty)) = (tx, ty) {
                    if op.operator == "TD" {
                        builder.leading = -ty;
                    }
                    builder.translate(tx, ty);
                }
            }
            "Tm" => {
                let m: Vec<f32> = operands.iter().filter_map(as_number).collect();
                if let [a, _, _, d, e, f] = m[..] {
                    builder.set_matrix(a, d, e, f);
                }
            }
            "T*" => builder.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    builder.push(&decode_pdf_string(bytes));
                }
            }
            "'" | "\"" => {
                builder.next_line();
                if let Some(Object::String(bytes, _)) = operands.last() {
                    builder.push(&decode_pdf_string(bytes));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => builder.push(&decode_pdf_string(bytes)),
                            other => {
                                if let Some(adjust) = as_number(other) {
                                    builder.kern(adjust);
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    builder.finish()
}

/// Accumulates shown text into spans while tracking an approximate pen position
/// in unscaled page space.
struct SpanBuilder {
    spans: Vec<Span>,
    font: String,
    font_size: f32,
    /// Horizontal and vertical scale of the text matrix.
    scale: (f32, f32),
    text: String,
    line_x: f32,
    line_y: f32,
    pen_x: f32,
    span_y: f32,
    leading: f32,
    pending_space: bool,
}

impl Default for SpanBuilder {
    fn default() -> Self {
        Self {
            spans: Vec::new(),
            font: String::new(),
            font_size: 0.0,
            scale: (1.0, 1.0),
            text: String::new(),
            line_x: 0.0,
            line_y: 0.0,
            pen_x: 0.0,
            span_y: 0.0,
            leading: 0.0,
            pending_space: false,
        }
    }
}

impl SpanBuilder {
    fn begin_text(&mut self) {
        // BT resets the text matrix; the next positioning operator decides the line
        self.scale = (1.0, 1.0);
        self.line_x = 0.0;
        self.line_y = 0.0;
    }

    fn set_font(&mut self, font: String, size: f32) {
        self.font_size = size;
        if font != self.font {
            self.flush();
            self.font = font;
        }
    }

    fn set_matrix(&mut self, a: f32, d: f32, e: f32, f: f32) {
        self.scale = (a.abs(), d.abs());
        self.move_to(e, f);
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.move_to(self.line_x + tx * self.scale.0, self.line_y + ty * self.scale.1);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.line_x = x;
        self.line_y = y;
        if !self.text.is_empty() {
            let em = self.em();
            let gap = x - self.pen_x;
            if (y - self.span_y).abs() > LINE_TOLERANCE
                || gap > COLUMN_GAP_EMS * em
                || gap < -em
            {
                self.flush();
            } else if gap > WORD_GAP_EMS * em {
                self.pending_space = true;
            }
        }
        self.pen_x = x;
    }

    fn next_line(&mut self) {
        self.line_y -= self.leading * self.scale.1;
        self.pen_x = self.line_x;
        self.flush();
    }

    fn push(&mut self, text: &str) {
        if self.text.is_empty() {
            self.span_y = self.line_y;
        } else if self.pending_space
            && !self.text.ends_with(char::is_whitespace)
            && !text.starts_with(char::is_whitespace)
        {
            self.text.push(' ');
        }
        self.pending_space = false;
        self.text.push_str(text);
        self.pen_x += text.chars().count() as f32 * GLYPH_WIDTH_EMS * self.em();
    }

    /// A TJ number: moves the pen left by `adjust` thousandths of an em.
    fn kern(&mut self, adjust: f32) {
        if adjust < -TJ_SPACE_THRESHOLD {
            self.push(" ");
        }
        self.pen_x -= adjust / 1000.0 * self.em();
    }

    /// Effective font size in page units, floored so thresholds never collapse to zero.
    fn em(&self) -> f32 {
        (self.font_size * self.scale.0).max(1.0)
    }

    fn flush(&mut self) {
        self.pending_space = false;
        if !self.text.is_empty() {
            self.spans.push(Span {
                text: std::mem::take(&mut self.text),
                font: self.font.clone(),
            });
        }
    }

    fn finish(mut self) -> Vec<Span> {
        self.flush();
        self.spans
    }
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// UTF-16BE when BOM-prefixed, otherwise the WinAnsi encoding simple fonts use.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xfe && bytes[1] == 0xff {
        UTF_16BE
            .decode_without_bom_handling(&bytes[2..])
            .0
            .into_owned()
    } else {
        WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()
    }
}

/// `ABCDEF+Arial-BoldMT` → `Arial-BoldMT`.
fn strip_subset_prefix(name: &[u8]) -> String {
    let start = name.iter().position(|&b| b == b'+').map_or(0, |i| i + 1);
    String::from_utf8_lossy(&name[start..]).into_owned()
}
