use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::output::{print_json, print_table};
use fleet_core::config::{store_path, ConsoleConfig};
use fleet_core::status::{filter_dismissed, parse_feed};
use fleet_core::store::ConsoleStore;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn run(config_path: &Path, dismiss: Option<&str>, all: bool, json: bool) -> Result<()> {
    match dismiss {
        Some(id) => run_dismiss(id, json),
        None => run_list(config_path, all, json),
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn run_list(config_path: &Path, all: bool, json: bool) -> Result<()> {
    let config = ConsoleConfig::load(config_path).map_err(|e| anyhow!("{e}"))?;
    let store = ConsoleStore::open(&store_path()).map_err(|e| anyhow!("{e}"))?;
    let dismissed = store.dismissed().map_err(|e| anyhow!("{e}"))?;

    let rt = tokio::runtime::Runtime::new()?;
    let feed = rt.block_on(fetch_feed(&config.status_feed_url))?;

    let mut entries = filter_dismissed(parse_feed(&feed), &dismissed);
    if !all {
        entries.retain(|e| e.is_incident);
    }

    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!(
            "No {}status entries.",
            if all { "" } else { "active incident " }
        );
        return Ok(());
    }

    let headers = &["ACTIVE", "UPDATED", "TITLE", "ID"];
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                if e.is_incident { "yes" } else { "no" }.to_string(),
                e.updated.clone(),
                e.title.clone(),
                e.id.clone(),
            ]
        })
        .collect();
    print_table(headers, rows);
    Ok(())
}

async fn fetch_feed(url: &str) -> Result<String> {
    let body = reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("fetching status feed from {url}"))?
        .text()
        .await
        .context("reading status feed body")?;
    Ok(body)
}

// ---------------------------------------------------------------------------
// dismiss
// ---------------------------------------------------------------------------

fn run_dismiss(id: &str, json: bool) -> Result<()> {
    let store = ConsoleStore::open(&store_path()).map_err(|e| anyhow!("{e}"))?;
    store.dismiss(id).map_err(|e| anyhow!("{e}"))?;

    if json {
        return print_json(&serde_json::json!({ "dismissed": id }));
    }
    println!("Dismissed '{id}'.");
    Ok(())
}
