//! Offline-trained intent classification for the Teller chatbot.
//!
//! Wraps a linear bag-of-words model and a per-intent canned-response
//! catalog, both built once at startup from a `text,intent,response` CSV.
//! Implements the chat engine's [`IntentClassifier`] seam.

pub mod model;
pub mod training;

use std::collections::HashMap;
use std::path::Path;

use rand::Rng;
use tracing::info;

use teller_chat::IntentClassifier;
use teller_core::config::NluConfig;
use teller_core::error::TellerError;

pub use model::IntentModel;
pub use training::{load_corpus, TrainingRow};

/// Intent label returned when the model cannot score a message.
pub const FALLBACK_LABEL: &str = "fallback";

/// Trained classifier plus response catalog.
pub struct NluEngine {
    model: IntentModel,
    responses: HashMap<String, Vec<String>>,
}

impl NluEngine {
    /// Train from corpus rows.
    pub fn train(rows: &[TrainingRow]) -> Self {
        let model = IntentModel::train(
            rows.iter()
                .map(|r| (r.text.as_str(), r.intent.as_str())),
        );
        let responses = training::build_responses(rows);
        info!(
            rows = rows.len(),
            intents = model.label_count(),
            "Intent model trained"
        );
        Self { model, responses }
    }

    /// Train from the configured corpus path, or the embedded default.
    pub fn from_config(config: &NluConfig) -> Result<Self, TellerError> {
        let rows = training::load_corpus(config.training_data.as_deref().map(Path::new))?;
        Ok(Self::train(&rows))
    }

    /// Predict an intent label. Total: unscorable input is `fallback`.
    pub fn predict_label(&self, text: &str) -> String {
        self.model
            .predict(text)
            .unwrap_or_else(|| FALLBACK_LABEL.to_string())
    }

    /// A random canned response for an intent, if the catalog has one.
    pub fn pick_response(&self, intent: &str) -> Option<String> {
        let options = self.responses.get(intent)?;
        if options.is_empty() {
            return None;
        }
        let index = rand::rng().random_range(0..options.len());
        Some(options[index].clone())
    }
}

impl IntentClassifier for NluEngine {
    fn classify(&self, text: &str) -> Result<String, TellerError> {
        Ok(self.predict_label(text))
    }

    fn canned_reply(&self, intent: &str) -> Option<String> {
        self.pick_response(intent)
    }
}
