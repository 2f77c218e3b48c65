use crate::utils::error::{InvoiceError, Result};
use lopdf::Document;

/// Characters of raw text shown before the preview is cut.
pub const PREVIEW_CHARS: usize = 3000;

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
}

/// Extracts the text of every page, in page order. Pages without text are skipped.
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedText> {
    let document = Document::load_mem(bytes)?;
    if document.is_encrypted() {
        return Err(InvoiceError::ProcessingError {
            message: "encrypted PDF documents are not supported".to_string(),
        });
    }

    let pages = document.get_pages();
    let mut text = String::new();

    for page_number in pages.keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) if !page_text.trim().is_empty() => {
                text.push_str(page_text.trim_end_matches('\n'));
                text.push('\n');
            }
            Ok(_) => tracing::debug!("Page {} has no extractable text", page_number),
            Err(e) => tracing::warn!("Skipping page {}: {}", page_number, e),
        }
    }

    Ok(ExtractedText {
        text,
        page_count: pages.len(),
    })
}

/// Cuts `text` to `limit` characters, marking the cut with `...`.
pub fn preview_text(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// One page per entry; `None` gives a page without any text operator.
    fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let operations = match page {
                Some(line) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_extract_text_keeps_page_order_and_skips_blank_pages() {
        let bytes = build_pdf(&[Some("page1"), None, Some("page3")]);

        let extracted = extract_text(&bytes).unwrap();

        assert_eq!(extracted.text, "page1\npage3\n");
        assert_eq!(extracted.page_count, 3);
    }

    #[test]
    fn test_extract_text_of_textless_document_is_empty() {
        let bytes = build_pdf(&[None, None]);

        let extracted = extract_text(&bytes).unwrap();

        assert!(extracted.text.is_empty());
        assert_eq!(extracted.page_count, 2);
    }

    #[test]
    fn test_preview_text_short_text_is_untouched() {
        assert_eq!(preview_text("Total: 42.00", PREVIEW_CHARS), "Total: 42.00");
    }

    #[test]
    fn test_preview_text_cuts_on_char_boundary() {
        let text = "é".repeat(3005);
        let preview = preview_text(&text, PREVIEW_CHARS);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_preview_text_exact_limit() {
        let text = "a".repeat(PREVIEW_CHARS);
        assert_eq!(preview_text(&text, PREVIEW_CHARS), text);
    }

    #[test]
    fn test_extract_text_rejects_garbage() {
        let result = extract_text(b"this is not a pdf");
        assert!(matches!(result, Err(InvoiceError::PdfError(_))));
    }
}
