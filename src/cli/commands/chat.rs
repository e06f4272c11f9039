//! Interactive chat: upload a PDF, process it, ask questions.

use super::document_path;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::{AskError, Result};
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use console::style;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const HELP: &str = "Commands:
  /upload <path>  copy a PDF into the asset directory and select it
  /process        index the selected document and load the model
  /history        show previous questions and answers
  /help           show this help
  exit            quit
Anything else is sent as a question.";

/// A line of chat input.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Exit,
    Help,
    History,
    Process,
    Upload(&'a str),
    Question(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return Input::Exit;
    }
    match line.split_once(char::is_whitespace) {
        Some(("/upload", path)) => Input::Upload(path.trim()),
        _ => match line {
            "/help" => Input::Help,
            "/history" => Input::History,
            "/process" => Input::Process,
            _ => Input::Question(line),
        },
    }
}

/// Copy `source` into `asset_dir`, returning the stored path.
pub(crate) fn store_upload(source: &Path, asset_dir: &Path) -> Result<PathBuf> {
    let is_pdf = source
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(AskError::InvalidInput(format!(
            "Only PDF files can be uploaded: {}",
            source.display()
        )));
    }
    let file_name = source
        .file_name()
        .ok_or_else(|| AskError::InvalidInput(format!("No file name in {}", source.display())))?;

    std::fs::create_dir_all(asset_dir)?;
    let target = asset_dir.join(file_name);
    if source.canonicalize().ok() != target.canonicalize().ok() {
        std::fs::copy(source, &target)?;
    }
    info!("Custom file stored at {}", target.display());
    Ok(target)
}

/// Run the interactive chat command.
pub async fn run_chat(file: Option<&str>, settings: Settings) -> anyhow::Result<()> {
    let mut document = document_path(&settings, file);
    let orchestrator = Orchestrator::new(settings)?;
    let mut session = Session::new();

    println!("\n{}", style("Ask my PDF").bold().cyan());
    Output::kv("Model", model_label(&orchestrator.settings().llm.model));
    Output::kv("File", &document.display().to_string());
    println!(
        "{}\n",
        style("Type /process to index the document, /help for commands, 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Exit => {
                Output::info("Goodbye!");
                break;
            }
            Input::Help => println!("{}", HELP),
            Input::History => {
                if session.history().is_empty() {
                    Output::info("No questions asked yet.");
                }
                for exchange in session.history() {
                    Output::exchange(exchange);
                }
            }
            Input::Upload(path) => {
                let source = Settings::expand_path(path);
                match store_upload(&source, &orchestrator.settings().asset_dir()) {
                    Ok(stored) => {
                        document = stored;
                        Output::success(&format!(
                            "Selected {}. Run /process to index it.",
                            document.display()
                        ));
                    }
                    Err(e) => Output::error(&format!("Upload failed: {}", e)),
                }
            }
            Input::Process => {
                if let Err(e) =
                    preflight::check(Operation::Ask, orchestrator.settings(), &document)
                {
                    Output::error(&format!("{}", e));
                    continue;
                }

                let spinner = Output::spinner("Processing document...");
                let result = orchestrator.process_document(&document).await;
                spinner.finish_and_clear();

                match result {
                    Ok(context) => {
                        Output::success(&format!(
                            "Indexed {} pages from {}",
                            context.knowledge_base().len(),
                            context.document().display()
                        ));
                        session.install(context);
                    }
                    Err(e) => Output::error(&format!("Failed to process document: {}", e)),
                }
            }
            Input::Question(question) => {
                debug!("Query: {}", question);
                if !session.is_ready() {
                    Output::warning("No document processed yet. Run /process first.");
                    continue;
                }

                let spinner = Output::spinner("Thinking...");
                let result = session.ask(question).await;
                spinner.finish_and_clear();

                match result {
                    Ok(answer) => {
                        debug!("AI: {}", answer);
                        println!("\n{} {}\n", style("AI:").cyan().bold(), answer);
                    }
                    Err(e) => Output::error(&format!("Error: {}", e)),
                }
            }
        }
    }

    Ok(())
}

/// Model file name without its directory.
fn model_label(model: &str) -> &str {
    model.rsplit('/').next().unwrap_or(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("   \n"), Input::Empty);
        assert_eq!(parse_input("QUIT\n"), Input::Exit);
        assert_eq!(parse_input("/process"), Input::Process);
        assert_eq!(parse_input("/history\n"), Input::History);
        assert_eq!(parse_input("/upload  ~/docs/a.pdf \n"), Input::Upload("~/docs/a.pdf"));
        assert_eq!(
            parse_input("What is the sky?\n"),
            Input::Question("What is the sky?")
        );
    }

    #[test]
    fn test_model_label() {
        assert_eq!(model_label("/models/llama-2-7b.gguf"), "llama-2-7b.gguf");
        assert_eq!(model_label("mistral"), "mistral");
    }

    #[test]
    fn test_store_upload_copies_into_asset_dir() {
        let src_dir = tempfile::tempdir().unwrap();
        let asset_dir = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("report.pdf");
        std::fs::write(&source, "%PDF-1.5").unwrap();

        let stored = store_upload(&source, &asset_dir.path().join("assets")).unwrap();
        assert_eq!(stored, asset_dir.path().join("assets").join("report.pdf"));
        assert_eq!(std::fs::read(&stored).unwrap(), b"%PDF-1.5");
    }

    #[test]
    fn test_store_upload_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("notes.txt");
        std::fs::write(&source, "hi").unwrap();
        assert!(matches!(
            store_upload(&source, dir.path()),
            Err(AskError::InvalidInput(_))
        ));
    }
}
