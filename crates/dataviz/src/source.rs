//! Where datasets come from: a small registry of bundled files, plus a
//! fetcher that takes either a URL or a filesystem path.

use crate::dataset::Dataset;
use anyhow::{anyhow, Result};
use std::time::Duration;

/// Built-in datasets offered by the data tab.
// Add more datasets here as needed.
pub const DATASET_REGISTRY: &[(&str, &str)] = &[("leukemia_risk", "data/leukemia_risk.csv")];

pub fn registry_path(name: &str) -> Option<&'static str> {
    DATASET_REGISTRY
        .iter()
        .find(|(entry, _)| *entry == name)
        .map(|(_, path)| *path)
}

/// Raw text from an http(s) URL or a local path.
pub async fn fetch_text(source: &str) -> Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let resp = client.get(source).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!("fetch failed: {}", resp.status()));
        }
        Ok(resp.text().await?)
    } else {
        Ok(std::fs::read_to_string(source)?)
    }
}

/// Fetch and parse in one step. A dataset with no data rows is an error so
/// the caller can surface one notice for every way a load can go wrong.
pub async fn load_dataset(name: &str, source: &str) -> Result<Dataset> {
    let text = fetch_text(source).await?;
    let dataset = Dataset::parse(name, &text);
    if dataset.records().is_empty() {
        return Err(anyhow!("dataset {} has no rows", name));
    }
    tracing::info!(name, rows = dataset.row_count(), "dataset loaded");
    Ok(dataset)
}
