//! Document loading: turns a PDF into page-level text units.

mod pdf;

pub use pdf::PdfLoader;
#[cfg(test)]
pub(crate) use pdf::write_test_pdf;

use serde::{Deserialize, Serialize};

/// A unit of extracted document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Zero-based index of the source page.
    pub index: usize,
    /// Extracted text. Empty for pages without a text layer.
    pub text: String,
}

impl Page {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// One-based page number for display.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// Split into windows of at most `max_chars` characters, `overlap`
    /// characters shared between neighbours. Windows keep the page index.
    ///
    /// Breaks fall on whitespace when one exists in the second half of the window.
    pub fn split(&self, max_chars: usize, overlap: usize) -> Vec<Page> {
        let chars: Vec<char> = self.text.chars().collect();
        if max_chars == 0 || chars.len() <= max_chars {
            return vec![self.clone()];
        }
        let overlap = overlap.min(max_chars.saturating_sub(1));

        let mut windows = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let mut end = (start + max_chars).min(chars.len());
            if end < chars.len() {
                let min_end = start + max_chars / 2;
                if let Some(ws) = (min_end..end).rev().find(|&i| chars[i].is_whitespace()) {
                    end = ws;
                }
            }

            let text: String = chars[start..end].iter().collect();
            let text = text.trim();
            if !text.is_empty() {
                windows.push(Page::new(self.index, text));
            }

            if end >= chars.len() {
                break;
            }
            start = end.saturating_sub(overlap).max(start + 1);
        }
        windows
    }
}

/// Apply optional splitting to a loaded page sequence.
pub fn split_pages(pages: Vec<Page>, max_chars: Option<usize>, overlap: usize) -> Vec<Page> {
    match max_chars {
        Some(max) => pages.iter().flat_map(|p| p.split(max, overlap)).collect(),
        None => pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_page_is_not_split() {
        let page = Page::new(3, "short text");
        assert_eq!(page.split(100, 10), vec![page.clone()]);
        assert_eq!(page.number(), 4);
    }

    #[test]
    fn test_split_keeps_index_and_bounds() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        let page = Page::new(1, text);
        let windows = page.split(20, 5);

        assert!(windows.len() > 1);
        for w in &windows {
            assert_eq!(w.index, 1);
            assert!(w.text.chars().count() <= 20, "window too long: {:?}", w.text);
        }
        assert!(windows[0].text.starts_with("alpha"));
        assert!(windows.last().unwrap().text.ends_with("mu"));
    }

    #[test]
    fn test_split_pages_disabled() {
        let pages = vec![Page::new(0, "a".repeat(50)), Page::new(1, "")];
        let out = split_pages(pages.clone(), None, 0);
        assert_eq!(out, pages);
    }
}
