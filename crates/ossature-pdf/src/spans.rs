//! Content-stream interpretation: operators to positioned text spans, spans
//! to style-annotated lines.

use ossature_core::{BackendError, StyledLine};

use crate::source::{number, ContentOp, ContentSource, FontInfo, PageId, PdfValue};

/// A single run of text at a specific position on the page.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
    pub font_name: String,
}

/// Spans whose Y coordinates differ by less than this share a line.
const Y_TOLERANCE: f32 = 1.0;

/// Approximate character width as a fraction of font size; glyph metrics are
/// not available to the interpreter, 0.5 is reasonable for proportional fonts.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Minimum gap (in points) between adjacent spans before a space is inserted.
const MIN_WORD_GAP: f32 = 1.5;

/// The identity 2x3 text matrix: [a, b, c, d, tx, ty].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Mutable state tracked while walking a page's content stream.
#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5]
    }

    /// Rendered size is `font_size * sqrt(b^2 + d^2)` where b and d are the
    /// vertical-scale elements of the text matrix.
    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Apply a Td/TD-style translation to the line matrix.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    fn set_font(&mut self, key: Vec<u8>, base_font: &str, size: f32) {
        self.font_key = key;
        self.font_size = size;
        self.font_name = base_font.to_string();
    }
}

fn resolve_font<'a>(key: &[u8], fonts: &'a [FontInfo]) -> Option<&'a FontInfo> {
    fonts.iter().find(|info| info.key == key)
}

fn estimate_text_width(text: &str, state: &TextState) -> f32 {
    let n = text.chars().count() as f32;
    n * state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale
}

fn advance_after_show(text: &str, state: &mut TextState) {
    let mut total_dx: f32 = 0.0;
    for ch in text.chars() {
        total_dx += state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale
            + state.char_spacing;
        if ch == ' ' {
            total_dx += state.word_spacing;
        }
    }
    state.advance_x(total_dx);
}

fn decode_string(
    val: &PdfValue,
    source: &dyn ContentSource,
    page_id: PageId,
    font_key: &[u8],
) -> String {
    match val {
        PdfValue::Str(bytes) => {
            let decoded = source.decode_text(page_id, font_key, bytes);
            if decoded.is_empty() {
                crate::source::decode_text_simple(bytes)
            } else {
                decoded
            }
        }
        _ => String::new(),
    }
}

/// Walk a page's content stream and produce a flat list of [`TextSpan`]s.
///
/// A simplified PDF text-rendering state machine handling BT/ET, Tf, the
/// positioning operators (Tm, Td, TD, T*, TL), the spacing operators (Tc,
/// Tw, Tz, Ts), and the text-showing operators (Tj, TJ, ', ").
pub fn extract_page_spans(
    source: &dyn ContentSource,
    page_id: PageId,
) -> Result<Vec<TextSpan>, BackendError> {
    let raw_content = source.page_content(page_id)?;
    let ops = source.decode_content(&raw_content)?;
    let fonts = source.page_fonts(page_id).unwrap_or_default();

    let mut state = TextState::default();
    let mut spans: Vec<TextSpan> = Vec::new();

    for op in &ops {
        match op.operator.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            // Font state is kept across text objects; some PDFs reuse the
            // font set in an earlier object.
            "ET" => {}

            "Tf" => handle_tf(&op.operands, &fonts, &mut state),

            "Tm" => handle_tm(&op.operands, &mut state),
            "Td" => {
                if op.operands.len() >= 2 {
                    let tx = number(&op.operands[0]).unwrap_or(0.0);
                    let ty = number(&op.operands[1]).unwrap_or(0.0);
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                // Equivalent to: -ty TL ; tx ty Td
                if op.operands.len() >= 2 {
                    let tx = number(&op.operands[0]).unwrap_or(0.0);
                    let ty = number(&op.operands[1]).unwrap_or(0.0);
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.translate_line(0.0, -state.leading),
            "TL" => {
                if let Some(v) = op.operands.first().and_then(number) {
                    state.leading = v;
                }
            }

            "Tc" => {
                if let Some(v) = op.operands.first().and_then(number) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = op.operands.first().and_then(number) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = op.operands.first().and_then(number) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = op.operands.first().and_then(number) {
                    state.text_rise = v;
                }
            }

            "Tj" => {
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, source, page_id, &mut state, &mut spans);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = op.operands.first() {
                    handle_tj_array(arr, source, page_id, &mut state, &mut spans);
                }
            }
            "'" => {
                state.translate_line(0.0, -state.leading);
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, source, page_id, &mut state, &mut spans);
                }
            }
            "\"" => {
                // " aw ac string  =>  set Tw, Tc, T*, Tj
                if op.operands.len() >= 3 {
                    if let Some(aw) = number(&op.operands[0]) {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = number(&op.operands[1]) {
                        state.char_spacing = ac;
                    }
                    state.translate_line(0.0, -state.leading);
                    emit_show_string(&op.operands[2], source, page_id, &mut state, &mut spans);
                }
            }

            _ => {}
        }
    }

    Ok(spans)
}

fn handle_tf(operands: &[PdfValue], fonts: &[FontInfo], state: &mut TextState) {
    if operands.len() < 2 {
        return;
    }
    let key = match &operands[0] {
        PdfValue::Name(n) => n.clone(),
        PdfValue::Str(s) => s.clone(),
        _ => return,
    };
    let size = number(&operands[1]).unwrap_or(0.0);
    if let Some(info) = resolve_font(&key, fonts) {
        let base = info.base_font.as_deref().unwrap_or("");
        state.set_font(key, base, size);
    } else {
        // Font not in the resource dict, keep the raw key as the name.
        let name = String::from_utf8_lossy(&key).to_string();
        state.set_font(key, &name, size);
    }
}

fn handle_tm(operands: &[PdfValue], state: &mut TextState) {
    if operands.len() < 6 {
        return;
    }
    let vals: Vec<f32> = operands.iter().take(6).filter_map(number).collect();
    if vals.len() == 6 {
        state.text_matrix = [vals[0], vals[1], vals[2], vals[3], vals[4], vals[5]];
        state.line_matrix = state.text_matrix;
    }
}

fn emit_show_string(
    operand: &PdfValue,
    source: &dyn ContentSource,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<TextSpan>,
) {
    let text = decode_string(operand, source, page_id, &state.font_key);
    if text.is_empty() {
        return;
    }
    spans.push(TextSpan {
        text: text.clone(),
        x: state.x(),
        y: state.y() + state.text_rise,
        width: estimate_text_width(&text, state),
        font_size: state.effective_font_size(),
        font_name: state.font_name.clone(),
    });
    advance_after_show(&text, state);
}

/// Process a TJ array: strings to render interleaved with numeric kerning
/// adjustments in thousandths of a text-space unit.
fn handle_tj_array(
    arr: &[PdfValue],
    source: &dyn ContentSource,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<TextSpan>,
) {
    let mut buf = String::new();
    let mut span_x = state.x();
    let span_y = state.y() + state.text_rise;

    for elem in arr {
        match elem {
            PdfValue::Str(_) => {
                let fragment = decode_string(elem, source, page_id, &state.font_key);
                if buf.is_empty() {
                    span_x = state.x();
                }
                buf.push_str(&fragment);
                advance_after_show(&fragment, state);
            }
            val => {
                // Negative adjustment moves right, positive moves left.
                if let Some(adj) = number(val) {
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
                    let gap_threshold =
                        state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;
                    if dx > gap_threshold && !buf.is_empty() {
                        buf.push(' ');
                    }
                    state.advance_x(dx);
                }
            }
        }
    }

    let trimmed = buf.trim_end();
    if !trimmed.is_empty() {
        spans.push(TextSpan {
            text: trimmed.to_string(),
            x: span_x,
            y: span_y,
            width: estimate_text_width(trimmed, state),
            font_size: state.effective_font_size(),
            font_name: state.font_name.clone(),
        });
    }
}

/// Group a flat list of [`TextSpan`]s into [`StyledLine`]s.
///
/// Spans within [`Y_TOLERANCE`] points of each other share a line; lines are
/// ordered top of page first. Within a line, spans run left to right, with a
/// space inserted when the horizontal gap between spans looks like a word
/// break. The line's style attributes are those of its leftmost span; the
/// font size is rounded up to the nearest whole point.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<StyledLine> {
    if spans.is_empty() {
        return Vec::new();
    }

    // Sort by Y descending (top of page first), then X ascending.
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<StyledLine> = Vec::new();
    let mut current: Vec<TextSpan> = vec![spans.remove(0)];
    let mut current_y = current[0].y;

    for span in spans {
        if (span.y - current_y).abs() <= Y_TOLERANCE {
            current.push(span);
        } else {
            lines.push(assemble_line(std::mem::take(&mut current)));
            current_y = span.y;
            current.push(span);
        }
    }

    if !current.is_empty() {
        lines.push(assemble_line(current));
    }

    lines
}

fn assemble_line(mut spans: Vec<TextSpan>) -> StyledLine {
    spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

    let mut text = String::new();
    let mut prev_end: Option<f32> = None;

    for span in &spans {
        if let Some(end) = prev_end {
            let gap = span.x - end;
            if gap >= MIN_WORD_GAP && !text.ends_with(' ') {
                text.push(' ');
            }
        }
        text.push_str(&span.text);
        prev_end = Some(span.x + span.width);
    }

    let font_name = spans
        .first()
        .map(|s| s.font_name.clone())
        .unwrap_or_default();
    let font_size = spans
        .first()
        .map(|s| s.font_size.ceil() as i32)
        .unwrap_or(0);
    let x = spans.first().map(|s| s.x).unwrap_or(0.0);

    StyledLine::new(text, font_name, font_size, x)
}
