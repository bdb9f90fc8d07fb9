//! Search command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::document;
use crate::engine::KnowledgeBase;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Run the search command.
pub async fn run_search(
    query: &str,
    docs: &[PathBuf],
    top_k: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let kb = KnowledgeBase::from_settings(&settings)?;
    let top_k = top_k.unwrap_or(settings.retrieval.top_k);

    let spinner = Output::spinner("Indexing documents...");
    for path in docs {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let text = match document::extract_text(&source, bytes).await {
            Ok(text) => text,
            Err(e) => {
                spinner.println(format!("Skipped {}: {}", source, e));
                continue;
            }
        };

        match kb.ingest(&text, &source).await {
            Ok(count) => spinner.println(format!("Indexed {} chunks from {}", count, source)),
            Err(e) if e.is_client_error() => {
                spinner.println(format!("Skipped {}: {}", source, e));
            }
            Err(e) => {
                spinner.finish_and_clear();
                Output::error(&format!("Indexing failed: {}", e));
                return Err(e.into());
            }
        }
    }
    spinner.finish_and_clear();

    let results = kb.retrieve_scored(query, top_k).await?;

    if results.is_empty() {
        Output::warning("No results found matching your query.");
    } else {
        Output::success(&format!("Found {} results", results.len()));
        for (rank, result) in results.iter().enumerate() {
            Output::search_result(
                rank + 1,
                &result.chunk.source,
                result.distance,
                &result.chunk.text,
            );
        }
    }

    Ok(())
}
