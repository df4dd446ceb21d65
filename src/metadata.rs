//! Document information dictionary post-processing built on top of `lopdf`.
//!
//! genpdf only writes a title, so author, subject, keywords and creator are added to the
//! `/Info` dictionary after rendering.

use lopdf::{Dictionary, Document, Object, StringFormat};
use thiserror::Error;

use crate::layout::DocumentInfo;

/// Errors that can occur while rewriting the information dictionary.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The PDF bytes could not be parsed or written by `lopdf`.
    #[error("failed to process PDF bytes: {0}")]
    Pdf(#[from] lopdf::Error),
    /// The existing `/Info` entry does not point to a dictionary.
    #[error("PDF info entry is not a dictionary")]
    InvalidInfo,
}

/// Writes `info` into the `/Info` dictionary of `pdf_bytes`.
///
/// Empty fields are left out; an existing dictionary keeps entries that are not replaced.
pub fn apply_document_info(pdf_bytes: &[u8], info: &DocumentInfo) -> Result<Vec<u8>, MetadataError> {
    let mut document = Document::load_mem(pdf_bytes)?;

    let mut entries = Vec::new();
    if !info.title.is_empty() {
        entries.push(("Title", text_string(&info.title)));
    }
    if !info.author.is_empty() {
        entries.push(("Author", text_string(&info.author)));
    }
    if !info.subject.is_empty() {
        entries.push(("Subject", text_string(&info.subject)));
    }
    if !info.keywords.is_empty() {
        entries.push(("Keywords", text_string(&info.keywords.join(", "))));
    }
    entries.push((
        "Creator",
        text_string(concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))),
    ));

    let existing = document
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .ok();

    match existing {
        Some(info_id) => {
            let dictionary = document
                .get_object_mut(info_id)?
                .as_dict_mut()
                .map_err(|_| MetadataError::InvalidInfo)?;
            for (key, value) in entries {
                dictionary.set(key, value);
            }
        }
        None => {
            let mut dictionary = Dictionary::new();
            for (key, value) in entries {
                dictionary.set(key, value);
            }
            let info_id = document.add_object(Object::Dictionary(dictionary));
            document.trailer.set("Info", Object::Reference(info_id));
        }
    }

    let mut buffer = Vec::new();
    document.save_to(&mut buffer).map_err(lopdf::Error::from)?;
    Ok(buffer)
}

/// Encodes a PDF text string: literal for ASCII, UTF-16BE with byte order mark otherwise.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_strings_stay_literal() {
        match text_string("Ada") {
            Object::String(bytes, StringFormat::Literal) => assert_eq!(bytes, b"Ada"),
            other => panic!("unexpected object {other:?}"),
        }
    }

    #[test]
    fn unicode_strings_use_utf16() {
        match text_string("Zoë") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(bytes, [0xFE, 0xFF, 0x00, b'Z', 0x00, b'o', 0x00, 0xEB]);
            }
            other => panic!("unexpected object {other:?}"),
        }
    }

    #[test]
    fn rejects_non_pdf_bytes() {
        let result = apply_document_info(b"not a pdf", &DocumentInfo::default());
        assert!(matches!(result, Err(MetadataError::Pdf(_))));
    }
}
