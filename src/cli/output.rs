//! CLI output formatting utilities.

use crate::session::Exchange;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a retrieved page.
    pub fn page_result(page_number: usize, score: f32, content: &str) {
        println!(
            "\n{} {} (score: {:.2})",
            style(">>").green(),
            style(format!("Page {}", page_number)).bold(),
            score
        );
        println!("   {}", content_preview(content, 200));
    }

    /// Print a question and its answer.
    pub fn exchange(exchange: &Exchange) {
        println!(
            "\n{} {}",
            style(format!("[{}] You:", exchange.asked_at.format("%H:%M"))).green().bold(),
            exchange.question
        );
        println!("{} {}", style("AI:").cyan().bold(), exchange.answer);
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Flatten and shorten content for one-line display.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let head: String = content.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
