//! PDF loading backed by `lopdf`.

use super::Page;
use crate::error::LoadError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Reads a PDF into one [`Page`] per physical page.
#[derive(Debug, Clone)]
pub struct PdfLoader {
    path: PathBuf,
}

impl PdfLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all pages in document order.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Vec<Page>, LoadError> {
        if !self.path.is_file() {
            return Err(LoadError::NotFound(self.path.clone()));
        }

        let document = lopdf::Document::load(&self.path).map_err(|source| LoadError::Parse {
            path: self.path.clone(),
            source,
        })?;

        // Keys are 1-based page numbers in document order.
        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(LoadError::Empty(self.path.clone()));
        }

        let pages: Vec<Page> = page_numbers
            .iter()
            .enumerate()
            .map(|(index, &number)| {
                let text = document.extract_text(&[number]).unwrap_or_else(|e| {
                    warn!("No text extracted from page {}: {}", number, e);
                    String::new()
                });
                debug!("Page {}: {} chars", number, text.len());
                Page::new(index, text)
            })
            .collect();

        info!("Loaded {} pages from {}", pages.len(), self.path.display());
        Ok(pages)
    }
}

/// Write a minimal PDF with one text line per page. Empty strings give blank pages.
#[cfg(test)]
pub(crate) fn write_test_pdf(path: &Path, pages: &[&str]) {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

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
    for text in pages {
        let operations = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
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
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_unit_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("three.pdf");
        write_test_pdf(&path, &["First page text.", "", "Third page text."]);

        let pages = PdfLoader::new(&path).load().unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(
            pages.iter().map(|p| p.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(pages[0].text.contains("First page"));
        assert!(pages[1].text.trim().is_empty());
        assert!(pages[2].text.contains("Third page"));
    }

    #[test]
    fn test_missing_file() {
        let err = PdfLoader::new("/definitely/not/here.pdf").load().unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_not_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, "this is plain text, not a PDF").unwrap();

        let err = PdfLoader::new(&path).load().unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
