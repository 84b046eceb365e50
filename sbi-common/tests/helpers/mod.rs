//! Shared fixtures for sbi-common integration tests
//!
//! - `sample_rubric()`: two tracks with shared and track-specific traits
//! - `RubricBuilder`: small rubrics with exact weights and thresholds
//! - `SessionBuilder`: sessions with candidate info and trait inputs filled in
//! - `FailingStore` / `FailingExporter`: persistence that always fails

#![allow(dead_code)]

use sbi_common::drafts::DraftStore;
use sbi_common::report::{ReportExporter, ReportHandoff};
use sbi_common::session::{CandidateInfo, InterviewSession, TraitInput};
use sbi_common::{Error, Result, Rubric};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Rubric with an `infant` and a `preschool` track
///
/// | id | priority | weight | tracks            |
/// |----|----------|--------|-------------------|
/// | t1 | critical | 3      | all               |
/// | t2 | high     | 2      | infant            |
/// | t3 | standard | 1      | preschool         |
/// | t4 | critical | 2      | infant, preschool |
pub fn sample_rubric() -> Rubric {
    Rubric::from_value(sample_rubric_value()).expect("sample rubric is valid")
}

pub fn sample_rubric_value() -> Value {
    json!({
        "metadata": {"title": "Test rubric"},
        "scoring": {"scale": "1-5"},
        "tracks": {
            "infant": {
                "label": "Infant/Toddler",
                "max_weighted_total": 40,
                "thresholds": {"hire_percent_min": 80, "borderline_percent_min": 65, "borderline_percent_max": 79}
            },
            "preschool": {
                "label": "Preschool",
                "max_weighted_total": 30,
                "thresholds": {"hire_percent_min": 80, "borderline_percent_min": 65, "borderline_percent_max": 79}
            }
        },
        "traits": [
            trait_value("t1", "Safety Judgment", "critical", 3, &["all"]),
            trait_value("t2", "Infant Routines", "high", 2, &["infant"]),
            trait_value("t3", "Group Management", "standard", 1, &["preschool"]),
            trait_value("t4", "Emotional Regulation", "critical", 2, &["infant", "preschool"]),
        ],
        "absolute_disqualifiers": ["Endorses physical punishment", "Leaves children unsupervised"]
    })
}

pub fn trait_value(id: &str, name: &str, priority: &str, weight: i64, tracks: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "priority": priority,
        "weight": weight,
        "primary_question": format!("Tell me about {}.", name.to_lowercase()),
        "descriptors": {"1": "poor", "3": "adequate", "5": "excellent"},
        "sample_answers": {"1": "I don't know.", "5": "A detailed, reflective answer."},
        "applicable_tracks": tracks,
    })
}

/// Single-track rubric builder for exact scoring scenarios
pub struct RubricBuilder {
    max_weighted_total: i64,
    thresholds: Option<(f64, f64, f64)>,
    traits: Vec<Value>,
}

impl RubricBuilder {
    pub const TRACK: &'static str = "main";

    pub fn new(max_weighted_total: i64) -> Self {
        Self {
            max_weighted_total,
            thresholds: None,
            traits: Vec::new(),
        }
    }

    pub fn thresholds(mut self, hire: f64, borderline_min: f64, borderline_max: f64) -> Self {
        self.thresholds = Some((hire, borderline_min, borderline_max));
        self
    }

    pub fn critical(mut self, id: &str, weight: i64) -> Self {
        self.traits
            .push(trait_value(id, id, "critical", weight, &["all"]));
        self
    }

    pub fn standard(mut self, id: &str, weight: i64) -> Self {
        self.traits
            .push(trait_value(id, id, "standard", weight, &["all"]));
        self
    }

    pub fn build(self) -> Rubric {
        let mut track = json!({"label": "Main", "max_weighted_total": self.max_weighted_total});
        if let Some((hire, min, max)) = self.thresholds {
            track["thresholds"] = json!({
                "hire_percent_min": hire,
                "borderline_percent_min": min,
                "borderline_percent_max": max
            });
        }
        Rubric::from_value(json!({
            "metadata": {},
            "scoring": {},
            "tracks": {Self::TRACK: track},
            "traits": self.traits,
            "absolute_disqualifiers": []
        }))
        .expect("built rubric is valid")
    }
}

/// Trait input with only a raw score
pub fn scored(raw: u8) -> TraitInput {
    TraitInput {
        raw_score: Some(raw),
        ..TraitInput::default()
    }
}

/// Trait input flagged as a disqualifier with verbatim evidence
pub fn disqualified(raw: u8, verbatim: &str) -> TraitInput {
    TraitInput {
        raw_score: Some(raw),
        verbatim_notes: verbatim.to_string(),
        absolute_disqualifier: true,
        ..TraitInput::default()
    }
}

pub fn candidate(name: &str, date: &str, school: &str, track: &str) -> CandidateInfo {
    CandidateInfo {
        name: name.to_string(),
        interview_date: date.to_string(),
        school: school.to_string(),
        track: track.to_string(),
    }
}

/// Builds an [`InterviewSession`] step by step
#[derive(Default)]
pub struct SessionBuilder {
    session: InterviewSession,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidate(mut self, name: &str, date: &str, school: &str, track: &str) -> Self {
        self.session.candidate = candidate(name, date, school, track);
        self
    }

    pub fn current_index(mut self, index: usize) -> Self {
        self.session.current_index = index;
        self
    }

    pub fn input(mut self, trait_id: &str, input: TraitInput) -> Self {
        self.session.trait_inputs.insert(trait_id.to_string(), input);
        self
    }

    pub fn score(self, trait_id: &str, raw: u8) -> Self {
        self.input(trait_id, scored(raw))
    }

    pub fn build(self) -> InterviewSession {
        self.session
    }
}

/// Draft store whose save always fails
pub struct FailingStore;

impl DraftStore for FailingStore {
    fn save(&self, _session: &InterviewSession) -> Result<PathBuf> {
        Err(Error::persistence("/unwritable/drafts", "permission denied"))
    }

    fn load(&self, path: &Path) -> Result<InterviewSession> {
        Err(Error::persistence(path, "not found"))
    }

    fn list(&self) -> Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}

/// Report exporter whose export always fails
pub struct FailingExporter;

impl ReportExporter for FailingExporter {
    fn export(&self, _rubric: &Rubric, _handoff: &ReportHandoff) -> Result<PathBuf> {
        Err(Error::persistence("/unwritable/final", "disk full"))
    }
}
