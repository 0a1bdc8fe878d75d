//! Training corpus loading.
//!
//! The corpus is a CSV with a `text,intent,response` header. A default
//! corpus ships embedded in the crate; deployments can point the `nlu`
//! config section at their own file. Responses are collected per intent
//! (trimmed, deduplicated, minimum length 4) and a fallback entry is
//! always present.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use teller_core::error::TellerError;

/// Built-in training corpus.
pub const DEFAULT_CORPUS: &str = include_str!("../data/intents.csv");

/// Fallback reply guaranteed to exist in every response catalog.
pub const FALLBACK_RESPONSE: &str = "I didn't quite get that, but I'm here to help.";

/// Minimum length for a usable canned response.
const MIN_RESPONSE_LENGTH: usize = 4;

/// One labelled training row.
#[derive(Clone, Debug, Deserialize)]
pub struct TrainingRow {
    pub text: String,
    pub intent: String,
    pub response: String,
}

/// Parse a `text,intent,response` CSV from any reader.
pub fn parse_corpus<R: Read>(reader: R) -> Result<Vec<TrainingRow>, TellerError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        let row: TrainingRow =
            record.map_err(|e| TellerError::Classifier(format!("Invalid corpus row: {}", e)))?;
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(TellerError::Classifier(
            "Training corpus has no rows".to_string(),
        ));
    }
    Ok(rows)
}

/// Load the corpus from a file, or the embedded default when `path` is None.
pub fn load_corpus(path: Option<&Path>) -> Result<Vec<TrainingRow>, TellerError> {
    match path {
        Some(path) => {
            let file = std::fs::File::open(path).map_err(|e| {
                TellerError::Classifier(format!(
                    "Cannot open training corpus {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let rows = parse_corpus(file)?;
            info!(path = %path.display(), rows = rows.len(), "Training corpus loaded");
            Ok(rows)
        }
        None => parse_corpus(DEFAULT_CORPUS.as_bytes()),
    }
}

/// Build the per-intent response catalog from corpus rows.
///
/// Responses are trimmed and deduplicated per intent; entries shorter
/// than [`MIN_RESPONSE_LENGTH`] are dropped. The `fallback` intent always
/// has at least one response.
pub fn build_responses(rows: &[TrainingRow]) -> HashMap<String, Vec<String>> {
    let mut catalog: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        let response = row.response.trim();
        if response.len() < MIN_RESPONSE_LENGTH {
            continue;
        }
        let entry = catalog.entry(row.intent.clone()).or_default();
        if !entry.iter().any(|r| r == response) {
            entry.push(response.to_string());
        }
    }
    catalog
        .entry("fallback".to_string())
        .or_insert_with(|| vec![FALLBACK_RESPONSE.to_string()]);
    catalog
}
