//! CLI module for askmypdf.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// askmypdf - ask questions about a PDF
///
/// Indexes a PDF page by page and answers questions with a local language
/// model, using the most relevant pages as context.
#[derive(Parser, Debug)]
#[command(name = "askmypdf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Env file with MODEL_NAME, PDF_PATH and PDF_NAME
    #[arg(long, global = true, default_value = ".env")]
    pub env_file: String,

    /// Generation model (overrides MODEL_NAME)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a document and answer one question about it
    Ask {
        /// The question to ask
        question: String,

        /// PDF to use instead of PDF_PATH/PDF_NAME
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Start an interactive session: upload, process, ask
    Chat {
        /// PDF to use instead of PDF_PATH/PDF_NAME
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Show the pages that would be used to answer a query
    Search {
        /// Search query
        query: String,

        /// PDF to use instead of PDF_PATH/PDF_NAME
        #[arg(short, long)]
        file: Option<String>,

        /// Number of pages to return
        #[arg(short, long)]
        k: Option<usize>,

        /// Candidate pool size before diversity re-ranking
        #[arg(long)]
        fetch_k: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from(["askmypdf", "-vv", "ask", "What is this?", "--file", "a.pdf"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.env_file, ".env");
        match cli.command {
            Commands::Ask { question, file } => {
                assert_eq!(question, "What is this?");
                assert_eq!(file.as_deref(), Some("a.pdf"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_overrides() {
        let cli = Cli::parse_from(["askmypdf", "search", "budget", "-k", "2", "--fetch-k", "8", "--json"]);
        match cli.command {
            Commands::Search { k, fetch_k, json, .. } => {
                assert_eq!(k, Some(2));
                assert_eq!(fetch_k, Some(8));
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
