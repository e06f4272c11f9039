//! Context assembly for RAG prompts.

use crate::llm::CHARS_PER_TOKEN;
use crate::loader::Page;
use tracing::warn;

/// Separator between page texts in the context string.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Join page texts with a blank line.
pub fn format_pages(pages: &[Page]) -> String {
    pages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// Character budget for the context, given the tokens left after the
/// template, the question and the answer reservation.
pub fn context_char_budget(tokens_left: usize) -> usize {
    tokens_left * CHARS_PER_TOKEN
}

/// Cut `context` down to `max_chars` characters.
///
/// The cut prefers the last page separator or whitespace within the budget,
/// so partial words are avoided where possible.
pub fn truncate_context(context: &str, max_chars: usize) -> String {
    let total = context.chars().count();
    if total <= max_chars {
        return context.to_string();
    }

    let byte_end = context
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(context.len());
    let head = &context[..byte_end];

    let cut = head
        .rfind(PAGE_SEPARATOR)
        .filter(|&i| i >= head.len() / 2)
        .or_else(|| head.rfind(char::is_whitespace).filter(|&i| i >= head.len() / 2))
        .unwrap_or(head.len());

    warn!(
        "Retrieved context of {} chars exceeds the {}-char budget, truncating",
        total, max_chars
    );
    head[..cut].trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pages() {
        let pages = vec![Page::new(0, "first"), Page::new(3, "second"), Page::new(1, "")];
        assert_eq!(format_pages(&pages), "first\n\nsecond\n\n");
        assert_eq!(format_pages(&[]), "");
    }

    #[test]
    fn test_truncate_within_budget_is_noop() {
        assert_eq!(truncate_context("short", 10), "short");
    }

    #[test]
    fn test_truncate_prefers_page_boundary() {
        let context = format!("{}\n\n{}", "a".repeat(30), "b".repeat(30));
        let cut = truncate_context(&context, 40);
        assert_eq!(cut, "a".repeat(30));
    }

    #[test]
    fn test_truncate_on_whitespace() {
        let cut = truncate_context("one two three four five six", 15);
        assert_eq!(cut, "one two three");
        assert!(cut.chars().count() <= 15);
    }

    #[test]
    fn test_truncate_multibyte() {
        let context = "é".repeat(20);
        let cut = truncate_context(&context, 5);
        assert_eq!(cut.chars().count(), 5);
    }
}
