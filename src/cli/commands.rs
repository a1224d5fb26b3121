//! CLI command implementations.

use std::path::Path;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::config::CompendiumConfig;
use crate::engine::{Query, QueryEngine};
use crate::index::SearchIndex;
use crate::types::{CompendiumError, CompendiumResult, Dataset, EntryType, WorkerRequest};
use crate::viewport::{EntryRow, EntryRowRenderer, VirtualList};
use crate::worker::{spawn_worker, CompendiumSession};

/// Read a dataset file as raw JSON.
pub fn read_dataset_value(path: &Path) -> CompendiumResult<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Display counts and index statistics for a dataset file.
pub fn cmd_info(path: &Path, json: bool) -> CompendiumResult<()> {
    let dataset = Dataset::load(path)?;
    let index = SearchIndex::from_dataset(&dataset);
    let counts = index.counts();
    let dropped = dataset.len().saturating_sub(counts.total);

    if json {
        let info = serde_json::json!({
            "file": path.display().to_string(),
            "records": dataset.len(),
            "entries": counts,
            "dropped": dropped,
            "tokens": index.token_count(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("File: {}", path.display());
        println!("Records: {}", dataset.len());
        println!("Entries: {}", counts.total);
        for entry_type in EntryType::ALL {
            println!("  {}s: {}", entry_type.label(), counts.get(entry_type));
        }
        println!("Dropped: {}", dropped);
        println!("Distinct tokens: {}", index.token_count());
    }
    Ok(())
}

/// Run a query through a search worker and print the merged results.
pub async fn cmd_search(
    path: &Path,
    query: Query,
    limit: usize,
    config: &CompendiumConfig,
    json: bool,
) -> CompendiumResult<()> {
    let mut session =
        CompendiumSession::open(async { read_dataset_value(path) }, config).await?;
    let results = session.search_all(&query).await?;
    session.close().await?;

    let total = results.len();
    let shown = &results[..total.min(limit)];
    if json {
        let out = serde_json::json!({
            "query": query.text,
            "filters": query.type_filters.iter().map(|t| t.name()).collect::<Vec<_>>(),
            "total": total,
            "items": shown,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for entry in shown {
            println!("{} [{}] {}", entry.name, entry.id, entry.subtitle);
        }
        if total > shown.len() {
            println!("... {} more", total - shown.len());
        }
        println!("{} result(s)", total);
    }
    Ok(())
}

/// Show one entry in full.
pub fn cmd_get(path: &Path, id: &str, json: bool) -> CompendiumResult<()> {
    let index = SearchIndex::from_dataset(&Dataset::load(path)?);
    let entry = index
        .get(id)
        .ok_or_else(|| CompendiumError::EntryNotFound(id.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        println!("{}", entry.name);
        println!("  {}", entry.subtitle);
        for stat in &entry.stats {
            println!("  {}: {}", stat.label, stat.value);
        }
        if !entry.tags.is_empty() {
            println!("  Tags: {}", entry.tags.join(", "));
        }
        println!();
        println!("{}", entry.description);
        if !entry.source_detail.is_empty() {
            println!();
            println!("{}", entry.source_detail);
        }
    }
    Ok(())
}

/// Run a query and print the rows a viewport would materialize.
pub async fn cmd_window(
    path: &Path,
    query: Query,
    scroll_top: f64,
    viewport_height: f64,
    config: &CompendiumConfig,
    json: bool,
) -> CompendiumResult<()> {
    let mut session =
        CompendiumSession::open(async { read_dataset_value(path) }, config).await?;
    session.search_all(&query).await?;

    let mut list = VirtualList::new(config.viewport());
    list.scroll_to(scroll_top);
    list.resize(viewport_height);
    let total = session.results().len();
    let rendered = list.render(session.results().slots(), &mut EntryRowRenderer);
    session.close().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        let window = rendered.window;
        println!(
            "Rows {}..{} of {} (height {}px)",
            window.start, window.end, total, window.total_height
        );
        for row in &rendered.rows {
            match &row.row {
                EntryRow::Entry { name, subtitle, .. } => {
                    println!("  {:>6}px #{} {} ({})", row.top, row.index, name, subtitle)
                }
                EntryRow::Placeholder => println!("  {:>6}px #{} ...", row.top, row.index),
            }
        }
    }
    Ok(())
}

/// Serve the worker protocol over stdin/stdout as JSON lines.
///
/// Each input line is a `hydrate` or `search` request; each output line is a
/// response. Lines that do not parse are logged and skipped.
pub async fn cmd_serve(dataset: Option<&Path>, config: &CompendiumConfig) -> CompendiumResult<()> {
    let (handle, mut responses, task) =
        spawn_worker(QueryEngine::with_chunk_size(config.chunk_size));

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(response) = responses.recv().await {
            let mut line = serde_json::to_vec(&response)?;
            line.push(b'\n');
            stdout.write_all(&line).await?;
            stdout.flush().await?;
        }
        Ok::<(), CompendiumError>(())
    });

    if let Some(path) = dataset {
        let payload = read_dataset_value(path)?;
        if !handle.send(WorkerRequest::Hydrate { payload }) {
            return Err(CompendiumError::WorkerUnavailable);
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    log::info!("Serving search worker on stdio");
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<WorkerRequest>(trimmed) {
            Ok(request) => {
                if !handle.send(request) {
                    return Err(CompendiumError::WorkerUnavailable);
                }
            }
            Err(e) => log::warn!("Skipping malformed request: {e}"),
        }
    }

    log::info!("EOF on stdin, shutting down");
    drop(handle);
    task.await.map_err(|_| CompendiumError::WorkerUnavailable)?;
    writer
        .await
        .map_err(|_| CompendiumError::WorkerUnavailable)??;
    Ok(())
}
