//! Disqualifier signal reference library
//!
//! Optional display-only data: per-trait example phrases and confirmation
//! probes that help the interviewer recognize disqualifying behavior. Nothing
//! here feeds scoring or session progression; a missing file is an empty
//! library.
//!
//! Entries are indexed by trait id. Numeric ids (`7` or `"7"`) normalize to
//! `trait_7` so they line up with rubric ids.

use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// One disqualifier signal for a question
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Signal {
    #[serde(default)]
    pub disqualifier_type: String,
    #[serde(default)]
    pub auto_disqualify_if_confirmed: bool,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub probe_to_confirm: String,
}

impl Signal {
    /// `emotion_dysregulation` → `Emotion Dysregulation`
    pub fn friendly_type(&self) -> String {
        if self.disqualifier_type.is_empty() {
            return "Unspecified".to_string();
        }
        self.disqualifier_type
            .replace('_', " ")
            .split_whitespace()
            .map(title_case)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Signal block for one trait's question
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuestionSignals {
    #[serde(default)]
    pub trait_id: Value,
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub primary_question: String,
    #[serde(default, alias = "signals")]
    pub disqualifier_signals: Vec<Signal>,
}

#[derive(Debug, Default, Deserialize)]
struct SignalDocument {
    #[serde(default)]
    questions: Vec<QuestionSignals>,
}

/// Normalize a raw trait id: digits become `trait_<n>`, blanks are dropped
pub fn normalize_trait_id(raw: &Value) -> Option<String> {
    let text = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else if text.chars().all(|c| c.is_ascii_digit()) {
        Some(format!("trait_{}", text))
    } else {
        Some(text)
    }
}

/// Signals indexed by normalized trait id
#[derive(Debug, Clone, Default)]
pub struct SignalLibrary {
    by_trait_id: HashMap<String, QuestionSignals>,
}

impl SignalLibrary {
    /// Load from `path`; a missing file yields an empty library
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "No signal library found, continuing without");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(Error::Config(format!(
                    "Failed to read signal library {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Self::from_json_str(&text)
    }

    /// Load, degrading to an empty library on any error
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(library) => library,
            Err(e) => {
                warn!("Ignoring signal library: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let doc: SignalDocument = serde_json::from_str(text)
            .map_err(|e| Error::Config(format!("signal library is not valid: {}", e)))?;

        let mut by_trait_id = HashMap::new();
        for question in doc.questions {
            if let Some(id) = normalize_trait_id(&question.trait_id) {
                by_trait_id.insert(id, question);
            }
        }
        Ok(Self { by_trait_id })
    }

    /// Signal block for a trait, if configured
    pub fn for_trait(&self, trait_id: &str) -> Option<&QuestionSignals> {
        self.by_trait_id.get(trait_id)
    }

    pub fn len(&self) -> usize {
        self.by_trait_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_trait_id.is_empty()
    }
}
