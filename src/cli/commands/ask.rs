//! Ask command implementation.

use super::document_path;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(question: &str, file: Option<&str>, settings: Settings) -> Result<()> {
    let document = document_path(&settings, file);

    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask, &settings, &document) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Processing document...");
    let context = orchestrator.process_document(&document).await;
    spinner.finish_and_clear();

    let context = match context {
        Ok(context) => context,
        Err(e) => {
            Output::error(&format!("Failed to process document: {}", e));
            return Err(e.into());
        }
    };

    let spinner = Output::spinner("Thinking...");
    let answer = context.ask(question).await;
    spinner.finish_and_clear();

    match answer {
        Ok(answer) => {
            println!("\n{}\n", answer);
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
