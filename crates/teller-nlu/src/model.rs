//! Linear bag-of-words intent model.
//!
//! A multinomial naive Bayes classifier over lowercased alphanumeric
//! tokens with add-one smoothing, trained once at startup from the
//! labelled corpus. Scoring happens in log space; prediction is the
//! arg-max label. The model never fails at prediction time: inputs it
//! cannot score return `None` and the caller maps that to the
//! `fallback` label.

use std::collections::{BTreeMap, HashMap, HashSet};

/// Split text into lowercased alphanumeric tokens, dropping single chars.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2)
        .map(str::to_string)
        .collect()
}

/// A trained intent classification model.
#[derive(Debug, Default)]
pub struct IntentModel {
    /// Per-label token frequency tables. BTreeMap keeps prediction
    /// deterministic when scores tie.
    label_tokens: BTreeMap<String, HashMap<String, u32>>,
    /// Total token count per label.
    label_totals: HashMap<String, u32>,
    /// Training document count per label.
    label_docs: HashMap<String, u32>,
    total_docs: u32,
    vocabulary: HashSet<String>,
}

impl IntentModel {
    /// Train a model from `(text, intent)` pairs.
    pub fn train<'a, I>(examples: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut model = IntentModel::default();
        for (text, label) in examples {
            let tokens = tokenize(text);
            if tokens.is_empty() {
                continue;
            }
            let table = model.label_tokens.entry(label.to_string()).or_default();
            for token in tokens {
                *table.entry(token.clone()).or_insert(0) += 1;
                *model.label_totals.entry(label.to_string()).or_insert(0) += 1;
                model.vocabulary.insert(token);
            }
            *model.label_docs.entry(label.to_string()).or_insert(0) += 1;
            model.total_docs += 1;
        }
        model
    }

    /// Number of distinct labels the model knows.
    pub fn label_count(&self) -> usize {
        self.label_tokens.len()
    }

    /// Predict the intent label for a message.
    ///
    /// Returns `None` when the model is empty or the message has no
    /// scorable tokens.
    pub fn predict(&self, text: &str) -> Option<String> {
        if self.total_docs == 0 {
            return None;
        }
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return None;
        }

        let vocab_size = self.vocabulary.len() as f64;
        let mut best: Option<(&str, f64)> = None;

        for (label, table) in &self.label_tokens {
            let docs = f64::from(*self.label_docs.get(label).unwrap_or(&0));
            let total = f64::from(*self.label_totals.get(label).unwrap_or(&0));
            let mut score = (docs / f64::from(self.total_docs)).ln();

            for token in &tokens {
                let count = f64::from(*table.get(token).unwrap_or(&0));
                score += ((count + 1.0) / (total + vocab_size)).ln();
            }

            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((label.as_str(), score)),
            }
        }

        best.map(|(label, _)| label.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained() -> IntentModel {
        IntentModel::train([
            ("show me my last transactions", "last_transactions"),
            ("recent transactions please", "last_transactions"),
            ("what did I spend recently", "last_transactions"),
            ("transaction history", "last_transactions"),
            ("when is the branch open", "support_hours"),
            ("what are your working hours", "support_hours"),
            ("are you open on sunday", "support_hours"),
            ("customer support timings", "support_hours"),
            ("the weather is nice", "fallback"),
            ("sing me a song", "fallback"),
            ("who won the match", "fallback"),
        ])
    }

    // ---- Tokenizer ----

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        assert_eq!(
            tokenize("Show ME my Last-Transactions!"),
            vec!["show", "me", "my", "last", "transactions"]
        );
    }

    #[test]
    fn test_tokenize_drops_single_chars() {
        assert_eq!(tokenize("I a m ok"), vec!["ok"]);
    }

    #[test]
    fn test_tokenize_keeps_digits() {
        assert_eq!(tokenize("account 998877"), vec!["account", "998877"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("!?!").is_empty());
    }

    // ---- Prediction ----

    #[test]
    fn test_predict_transactions() {
        let label = trained().predict("show my transaction history").unwrap();
        assert_eq!(label, "last_transactions");
    }

    #[test]
    fn test_predict_support_hours() {
        let label = trained().predict("what hours are you open").unwrap();
        assert_eq!(label, "support_hours");
    }

    #[test]
    fn test_predict_fallback_for_unrelated() {
        let label = trained().predict("who won the weather song").unwrap();
        assert_eq!(label, "fallback");
    }

    #[test]
    fn test_predict_is_case_insensitive() {
        let model = trained();
        assert_eq!(
            model.predict("RECENT TRANSACTIONS"),
            model.predict("recent transactions")
        );
    }

    #[test]
    fn test_empty_model_predicts_none() {
        let model = IntentModel::train(std::iter::empty::<(&str, &str)>());
        assert!(model.predict("anything").is_none());
    }

    #[test]
    fn test_no_tokens_predicts_none() {
        assert!(trained().predict("?!").is_none());
        assert!(trained().predict("").is_none());
    }

    #[test]
    fn test_unknown_tokens_still_predict_some_label() {
        // Smoothing means a message of entirely unseen tokens still
        // scores; the result is deterministic.
        let model = trained();
        let a = model.predict("entirely unseen words here").unwrap();
        let b = model.predict("entirely unseen words here").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_label_count() {
        assert_eq!(trained().label_count(), 3);
    }

    #[test]
    fn test_training_skips_empty_texts() {
        let model = IntentModel::train([("", "ghost"), ("real text here", "real")]);
        assert_eq!(model.label_count(), 1);
    }
}
