//! Search command implementation.

use super::document_path;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::vector_store::RetrieverConfig;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PageHit<'a> {
    page: usize,
    score: f32,
    text: &'a str,
}

/// Run the search command.
pub async fn run_search(
    query: &str,
    file: Option<&str>,
    k: Option<usize>,
    fetch_k: Option<usize>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let document = document_path(&settings, file);

    if let Err(e) = preflight::check(Operation::Search, &settings, &document) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let mut config = RetrieverConfig::from(&settings.retrieval);
    if let Some(k) = k {
        config.k = k;
    }
    if let Some(fetch_k) = fetch_k {
        config.fetch_k = fetch_k;
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Indexing document...");
    let knowledge_base = orchestrator.index_document(&document).await;
    spinner.finish_and_clear();

    let knowledge_base = match knowledge_base {
        Ok(knowledge_base) => knowledge_base,
        Err(e) => {
            Output::error(&format!("Failed to index document: {}", e));
            return Err(e.into());
        }
    };

    let results = match knowledge_base.as_retriever(config).retrieve_scored(query).await {
        Ok(results) => results,
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    };

    if json {
        let hits: Vec<PageHit> = results
            .iter()
            .map(|r| PageHit {
                page: r.page.number(),
                score: r.score,
                text: &r.page.text,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if results.is_empty() {
        Output::warning("No pages found for your query.");
    } else {
        Output::success(&format!(
            "Found {} of {} pages",
            results.len(),
            knowledge_base.len()
        ));
        for result in &results {
            Output::page_result(result.page.number(), result.score, &result.page.text);
        }
    }

    Ok(())
}
