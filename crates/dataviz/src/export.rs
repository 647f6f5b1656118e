//! CSV export of a (filtered) dataset. Ingestion is naive by contract, but
//! the way out goes through a real writer so embedded commas survive.

use crate::dataset::Dataset;
use anyhow::Result;

pub fn to_csv(dataset: &Dataset) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(dataset.columns().iter().map(|c| c.name.as_str()))?;
    for record in dataset.records() {
        writer.write_record(record.cells().iter().map(|v| v.to_string()))?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

/// Download name for a filtered dataset.
pub fn filtered_export_name(dataset_name: &str) -> String {
    format!("{}_filtered.csv", dataset_name)
}
