//! Rubric model and structural validation
//!
//! The rubric is loaded once per process and never mutated. Loading is
//! fail-fast: a document missing any required key or trait field is rejected
//! before an interview can start, so a malformed configuration cannot crash a
//! session halfway through.
//!
//! Validation is structural only. Weight and score ranges are not checked,
//! and a trait's `applicable_tracks` is not cross-checked against `tracks`;
//! those inconsistencies surface as lookup failures or empty trait lists and
//! are reported through [`Rubric::consistency_warnings`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

/// Wildcard entry in `applicable_tracks` matching every track
pub const ALL_TRACKS: &str = "all";

/// Top-level keys every rubric document must carry
const REQUIRED_KEYS: [&str; 5] = [
    "metadata",
    "scoring",
    "tracks",
    "traits",
    "absolute_disqualifiers",
];

/// Fields every trait entry must carry
const REQUIRED_TRAIT_FIELDS: [&str; 8] = [
    "id",
    "name",
    "priority",
    "weight",
    "primary_question",
    "descriptors",
    "sample_answers",
    "applicable_tracks",
];

/// Outcome thresholds for one track, in percent of the track maximum
///
/// All bounds are inclusive. `borderline_percent_min <= borderline_percent_max
/// <= hire_percent_min` is expected but not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub hire_percent_min: f64,
    pub borderline_percent_min: f64,
    pub borderline_percent_max: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            hire_percent_min: 80.0,
            borderline_percent_min: 65.0,
            borderline_percent_max: 79.0,
        }
    }
}

/// A named interview variant with its own trait subset and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Display label (e.g. "Infant/Toddler")
    #[serde(default)]
    pub label: String,

    /// Maximum attainable weighted total for this track
    pub max_weighted_total: i64,

    /// Hire/borderline cut-offs; defaults apply when omitted
    #[serde(default)]
    pub thresholds: Thresholds,
}

/// A single evaluated behavioral dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub id: String,
    pub name: String,
    /// `"critical"` (any case) marks a trait whose low scores lock the outcome
    pub priority: String,
    pub weight: i64,
    pub primary_question: String,
    /// Descriptor ladder keyed by rank "1".."5"
    pub descriptors: BTreeMap<String, String>,
    /// Sample answers keyed by rank "1".."5"
    pub sample_answers: BTreeMap<String, String>,
    /// Track keys this trait applies to; `"all"` matches every track
    pub applicable_tracks: Vec<String>,
}

impl Trait {
    /// Whether this trait carries critical priority
    pub fn is_critical(&self) -> bool {
        self.priority.eq_ignore_ascii_case("critical")
    }

    /// Whether this trait applies to `track_key` (directly or via the wildcard)
    pub fn applies_to(&self, track_key: &str) -> bool {
        self.applicable_tracks
            .iter()
            .any(|t| t == ALL_TRACKS || t == track_key)
    }

    /// Descriptor text for a rank, if configured
    pub fn descriptor(&self, rank: u8) -> Option<&str> {
        self.descriptors.get(&rank.to_string()).map(String::as_str)
    }

    /// Sample answer text for a rank, if configured
    pub fn sample_answer(&self, rank: u8) -> Option<&str> {
        self.sample_answers.get(&rank.to_string()).map(String::as_str)
    }
}

/// Scoring configuration: tracks, ordered traits, global disqualifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    /// Free-form document metadata (title, version, ...)
    pub metadata: Value,

    /// Free-form description of the scoring scale; reference only
    pub scoring: Value,

    pub tracks: BTreeMap<String, Track>,

    /// Declared order defines navigation order and numbering
    pub traits: Vec<Trait>,

    /// Human-readable disqualifier descriptions; never checked programmatically
    pub absolute_disqualifiers: Vec<String>,
}

impl Rubric {
    /// Read and validate a rubric JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Rubric file not found: {}", path.display()))
            } else {
                Error::Config(format!("Failed to read rubric {}: {}", path.display(), e))
            }
        })?;

        let rubric = Self::from_json_str(&text)?;
        info!(
            path = %path.display(),
            tracks = rubric.tracks.len(),
            traits = rubric.traits.len(),
            "Rubric loaded"
        );
        Ok(rubric)
    }

    /// Parse and validate a rubric from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::Config(format!("rubric is not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Validate structure, then decode into typed records
    pub fn from_value(value: Value) -> Result<Self> {
        validate_structure(&value)?;

        let rubric: Rubric = serde_json::from_value(value)
            .map_err(|e| Error::Config(format!("rubric has invalid field values: {}", e)))?;

        let mut seen = HashSet::new();
        for t in &rubric.traits {
            if !seen.insert(t.id.as_str()) {
                return Err(Error::Config(format!("Duplicate trait id: {}", t.id)));
            }
        }

        for warning in rubric.consistency_warnings() {
            warn!("{}", warning);
        }

        Ok(rubric)
    }

    /// Look up a track by key
    pub fn track(&self, key: &str) -> Result<&Track> {
        self.tracks
            .get(key)
            .ok_or_else(|| Error::Lookup(format!("unknown track '{}'", key)))
    }

    /// Look up a trait by id
    pub fn trait_by_id(&self, id: &str) -> Result<&Trait> {
        self.traits
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::Lookup(format!("unknown trait '{}'", id)))
    }

    /// Traits applicable to `track_key`, in declared order
    pub fn traits_for_track(&self, track_key: &str) -> Vec<&Trait> {
        crate::applicability::traits_for_track(self, track_key)
    }

    /// Referential inconsistencies that the structural check lets through
    ///
    /// Traits with no applicable track, or referencing a track key that is
    /// not configured, are accepted at load time but will never be scored
    /// under that key.
    pub fn consistency_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for t in &self.traits {
            if t.applicable_tracks.is_empty() {
                warnings.push(format!("Trait '{}' has no applicable tracks", t.id));
            }
            for key in &t.applicable_tracks {
                if key != ALL_TRACKS && !self.tracks.contains_key(key) {
                    warnings.push(format!(
                        "Trait '{}' references unknown track '{}'",
                        t.id, key
                    ));
                }
            }
        }
        warnings
    }
}

/// Enforce the minimum schema: required keys, a non-empty trait list, and
/// every required trait field present. Only presence is checked here.
pub fn validate_structure(value: &Value) -> Result<()> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::Config("rubric must be a JSON object".to_string()))?;

    for key in REQUIRED_KEYS {
        if !obj.contains_key(key) {
            return Err(Error::Config(format!("rubric missing required key: {}", key)));
        }
    }

    let traits = match obj.get("traits").and_then(Value::as_array) {
        Some(list) if !list.is_empty() => list,
        _ => {
            return Err(Error::Config(
                "rubric requires non-empty list: traits".to_string(),
            ))
        }
    };

    for (index, entry) in traits.iter().enumerate() {
        let label = entry
            .get("id")
            .map(|id| id.to_string())
            .unwrap_or_else(|| format!("#{}", index + 1));
        let fields = entry
            .as_object()
            .ok_or_else(|| Error::Config(format!("Trait {} is not an object", label)))?;
        for field in REQUIRED_TRAIT_FIELDS {
            if !fields.contains_key(field) {
                return Err(Error::Config(format!(
                    "Trait {} missing '{}'",
                    label, field
                )));
            }
        }
    }

    Ok(())
}
