//! Low-level access to PDF objects and content streams.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{self, content::Content};
use ossature_core::BackendError;

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation).
pub type PageId = (u32, u16);

/// Font information pulled from a page's resource dictionary.
#[derive(Debug, Clone)]
pub struct FontInfo {
    /// The resource key as it appears in the content stream (e.g. `b"F1"`).
    pub key: Vec<u8>,
    /// Base font name from the font dictionary, if present.
    pub base_font: Option<String>,
    /// Encoding entry from the font dictionary, if present.
    pub encoding: Option<String>,
}

/// A simplified, lopdf-independent representation of a PDF value, so the
/// content-stream interpreter can work with pure data.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Dict(Vec<(Vec<u8>, PdfValue)>),
    Reference(PageId),
}

/// A single content-stream operation (operator + operands).
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

/// Extract an `f32` from a [`PdfValue`], accepting both `Integer` and `Real`.
pub fn number(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(f) => Some(*f),
        _ => None,
    }
}

fn convert_object(obj: &lopdf::Object) -> PdfValue {
    match obj {
        lopdf::Object::Null => PdfValue::Null,
        lopdf::Object::Boolean(b) => PdfValue::Bool(*b),
        lopdf::Object::Integer(i) => PdfValue::Integer(*i),
        lopdf::Object::Real(f) => PdfValue::Real(*f),
        lopdf::Object::Name(n) => PdfValue::Name(n.clone()),
        lopdf::Object::String(s, _) => PdfValue::Str(s.clone()),
        lopdf::Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        lopdf::Object::Dictionary(dict) => {
            let entries = dict
                .iter()
                .map(|(k, v)| (k.clone(), convert_object(v)))
                .collect();
            PdfValue::Dict(entries)
        }
        // Stream bytes are fetched through page_content, only the dict matters here.
        lopdf::Object::Stream(stream) => {
            let entries = stream
                .dict
                .iter()
                .map(|(k, v)| (k.clone(), convert_object(v)))
                .collect();
            PdfValue::Dict(entries)
        }
        lopdf::Object::Reference(id) => PdfValue::Reference(*id),
    }
}

/// Best-effort decoding of raw PDF string bytes into a Rust `String`:
/// UTF-16BE with BOM, then UTF-8, then Latin-1 byte-for-byte.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let code_units: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|chunk| {
                if chunk.len() == 2 {
                    Some(u16::from_be_bytes([chunk[0], chunk[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16_lossy(&code_units);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Abstraction over the PDF object store, so the content-stream interpreter
/// in [`crate::spans`] can be tested against a mock without real documents.
pub trait ContentSource {
    /// Mapping from 1-based page number to [`PageId`].
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Font information for every font referenced by the given page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<FontInfo>, BackendError>;

    /// Raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>, BackendError>;

    /// Decode raw content-stream bytes into a sequence of [`ContentOp`]s.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, BackendError>;

    /// Decode string bytes from a text-showing operator, using whatever
    /// encoding information is available for the given page and font.
    fn decode_text(&self, page: PageId, font_key: &[u8], bytes: &[u8]) -> String;
}

/// [`ContentSource`] backed by [`lopdf::Document`].
pub struct LopdfSource {
    doc: lopdf::Document,
}

impl LopdfSource {
    /// Open a PDF from disk.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let doc = lopdf::Document::load(path)
            .map_err(|e| BackendError::Open(format!("{}: {e}", path.display())))?;

        if doc.is_encrypted() {
            return Err(BackendError::Open(format!(
                "{}: document is encrypted",
                path.display()
            )));
        }

        Ok(Self { doc })
    }

    /// Parse a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BackendError> {
        let doc =
            lopdf::Document::load_mem(data).map_err(|e| BackendError::Open(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(BackendError::Open("document is encrypted".into()));
        }
        Ok(Self { doc })
    }

    fn font_encoding_name(&self, page: PageId, font_key: &[u8]) -> Option<String> {
        let fonts = self.doc.get_page_fonts(page).ok()?;
        let font_dict = fonts.get(font_key)?;
        match font_dict.get(b"Encoding").ok()? {
            lopdf::Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }
    }
}

impl ContentSource for LopdfSource {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<FontInfo>, BackendError> {
        let fonts_map = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| BackendError::Extract(format!("cannot get page fonts: {e}")))?;

        let mut result = Vec::with_capacity(fonts_map.len());
        for (key, dict) in &fonts_map {
            let base_font = dict
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).into_owned());

            let encoding = dict.get(b"Encoding").ok().and_then(|o| match o {
                lopdf::Object::Name(n) => Some(String::from_utf8_lossy(n).into_owned()),
                _ => None,
            });

            result.push(FontInfo {
                key: key.clone(),
                base_font,
                encoding,
            });
        }

        Ok(result)
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>, BackendError> {
        self.doc
            .get_page_content(page)
            .map_err(|e| BackendError::Extract(format!("cannot get page content: {e}")))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, BackendError> {
        let content = Content::decode(data)
            .map_err(|e| BackendError::Extract(format!("content stream decode error: {e}")))?;

        let ops = content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect();

        Ok(ops)
    }

    fn decode_text(&self, page: PageId, font_key: &[u8], bytes: &[u8]) -> String {
        // Identity-H / Identity-V fonts typically carry 2-byte CID codes
        // that map to Unicode, so try UTF-16BE first for those.
        if let Some(enc_name) = self.font_encoding_name(page, font_key)
            && enc_name.contains("Identity")
            && bytes.len() >= 2
            && bytes.len() % 2 == 0
        {
            let code_units: Vec<u16> = bytes
                .chunks(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            let decoded = String::from_utf16_lossy(&code_units);
            if !decoded.is_empty() && !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                return decoded;
            }
        }

        decode_text_simple(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_utf8_passes_through() {
        assert_eq!(decode_text_simple(b"Chapter 1"), "Chapter 1");
    }

    #[test]
    fn decode_latin1_fallback() {
        // 0xE9 is U+00E9 in Latin-1 but not valid standalone UTF-8.
        let input: &[u8] = &[0x63, 0x61, 0x66, 0xE9];
        assert_eq!(decode_text_simple(input), "caf\u{00E9}");
    }

    #[test]
    fn decode_utf16be_with_bom() {
        let input: &[u8] = &[0xFE, 0xFF, 0x00, 0x54, 0x00, 0x69];
        assert_eq!(decode_text_simple(input), "Ti");
    }

    #[test]
    fn decode_utf16be_ignores_odd_trailing_byte() {
        let input: &[u8] = &[0xFE, 0xFF, 0x00, 0x41, 0x00];
        assert_eq!(decode_text_simple(input), "A");
    }

    #[test]
    fn decode_empty_input() {
        assert_eq!(decode_text_simple(&[]), "");
    }

    #[test]
    fn number_accepts_integer_and_real() {
        assert_eq!(number(&PdfValue::Integer(42)), Some(42.0));
        assert_eq!(number(&PdfValue::Real(1.5)), Some(1.5));
        assert_eq!(number(&PdfValue::Str(b"x".to_vec())), None);
    }

    #[test]
    fn convert_preserves_nested_arrays() {
        let arr = lopdf::Object::Array(vec![
            lopdf::Object::Integer(1),
            lopdf::Object::Real(2.0),
            lopdf::Object::Name(b"F1".to_vec()),
        ]);
        assert_eq!(
            convert_object(&arr),
            PdfValue::Array(vec![
                PdfValue::Integer(1),
                PdfValue::Real(2.0),
                PdfValue::Name(b"F1".to_vec()),
            ]),
        );
    }

    #[test]
    fn convert_stream_keeps_dictionary_only() {
        let mut dict = lopdf::Dictionary::new();
        dict.set("Length", lopdf::Object::Integer(0));
        let obj = lopdf::Object::Stream(lopdf::Stream::new(dict, vec![]));
        match convert_object(&obj) {
            PdfValue::Dict(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].0, b"Length");
            }
            other => panic!("expected Dict, got {other:?}"),
        }
    }
}
