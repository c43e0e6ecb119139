//! Text extraction from uploaded files.

use std::path::Path;

use log::{debug, warn};
use lopdf::Document;

use crate::error::ExtractError;

/// Upload formats we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    Text,
}

impl UploadKind {
    /// Decides by file extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(UploadKind::Pdf),
            "txt" => Some(UploadKind::Text),
            _ => None,
        }
    }
}

/// Extracts the text of an uploaded file. Files with an unsupported extension
/// give `Ok(None)` and are meant to be ignored by the caller.
pub fn extract_upload(file_name: &str, bytes: &[u8]) -> Result<Option<String>, ExtractError> {
    match UploadKind::from_file_name(file_name) {
        Some(UploadKind::Pdf) => extract_pdf_text(bytes).map(Some),
        Some(UploadKind::Text) => Ok(Some(String::from_utf8(bytes.to_vec())?)),
        None => {
            debug!("Ignoring upload with unsupported extension: {}", file_name);
            Ok(None)
        }
    }
}

/// Text of every page, in page order, concatenated. Pages that fail to
/// extract are skipped, so the result may be partial.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let document = Document::load_mem(bytes)?;

    let mut text = String::new();
    // get_pages is keyed by page number, so iteration is already in page order
    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => warn!("Failed to extract text of PDF page {}: {}", page_number, e),
        }
    }
    Ok(text)
}

/// Extracts an upload and folds any failure into an empty string.
///
/// Used at the I/O boundaries, where a broken file must not fail the request.
pub fn extract_upload_lossy(file_name: &str, bytes: &[u8]) -> String {
    match extract_upload(file_name, bytes) {
        Ok(text) => text.unwrap_or_default(),
        Err(e) => {
            warn!("Could not read {}: {}", file_name, e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    use super::*;

    /// A PDF with one line of Courier text per page.
    fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = document.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                document.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => count,
                "Kids" => kids,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        document.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn kind_comes_from_the_extension() {
        assert_eq!(UploadKind::from_file_name("notes.pdf"), Some(UploadKind::Pdf));
        assert_eq!(UploadKind::from_file_name("NOTES.PDF"), Some(UploadKind::Pdf));
        assert_eq!(UploadKind::from_file_name("a.b.txt"), Some(UploadKind::Text));
        assert_eq!(UploadKind::from_file_name("slides.pptx"), None);
        assert_eq!(UploadKind::from_file_name("README"), None);
        assert_eq!(UploadKind::from_file_name(""), None);
    }

    #[test]
    fn text_files_are_decoded_as_utf8() {
        let text = extract_upload("notes.txt", "Café au lait.".as_bytes()).unwrap();
        assert_eq!(text.as_deref(), Some("Café au lait."));

        let err = extract_upload("notes.txt", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ExtractError::Utf8(_)));
    }

    #[test]
    fn unsupported_files_are_ignored() {
        assert_eq!(extract_upload("photo.png", b"\x89PNG").unwrap(), None);
    }

    #[test]
    fn pdf_pages_are_read_in_order() {
        let bytes = pdf_with_pages(&["First page sentence here.", "Second page sentence here."]);
        let text = extract_pdf_text(&bytes).unwrap();

        let first = text.find("First page sentence here.").unwrap();
        let second = text.find("Second page sentence here.").unwrap();
        assert!(first < second);

        let upload = extract_upload("Notes.PDF", &bytes).unwrap().unwrap();
        assert_eq!(upload, text);
    }

    #[test]
    fn broken_pdf_is_an_error() {
        let err = extract_pdf_text(b"%PDF-1.4 this is not really a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn lossy_extraction_never_fails() {
        assert_eq!(extract_upload_lossy("broken.pdf", b"garbage"), "");
        assert_eq!(extract_upload_lossy("bad.txt", &[0xff]), "");
        assert_eq!(extract_upload_lossy("ok.txt", b"Fine text."), "Fine text.");
        assert_eq!(extract_upload_lossy("skip.docx", b"whatever"), "");
    }
}
