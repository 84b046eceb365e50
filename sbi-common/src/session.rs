//! Interview session model
//!
//! The serialized form of [`InterviewSession`] is the draft snapshot:
//! `{candidate:{name, interview_date, school, track}, current_index, trait_inputs}`.
//! Trait inputs are kept in a `BTreeMap` so a draft re-saved after loading is
//! byte-identical to the original.

use crate::rubric::Trait;
use crate::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date format accepted for the interview date
pub const INTERVIEW_DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether `value` parses as a `YYYY-MM-DD` calendar date
pub fn is_valid_interview_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, INTERVIEW_DATE_FORMAT).is_ok()
}

/// Interviewer input for one trait
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitInput {
    /// 1-5 once selected
    #[serde(default)]
    pub raw_score: Option<u8>,
    #[serde(default)]
    pub question_notes: String,
    #[serde(default)]
    pub trait_notes: String,
    #[serde(default)]
    pub verbatim_notes: String,
    #[serde(default)]
    pub absolute_disqualifier: bool,
}

impl TraitInput {
    /// Raw score if it is one of 1..=5
    pub fn valid_score(&self) -> Option<u8> {
        self.raw_score.filter(|s| (1..=5).contains(s))
    }

    /// Raw score as used by scoring; unset counts as zero
    pub fn score_or_zero(&self) -> i64 {
        self.raw_score.map(i64::from).unwrap_or(0)
    }

    /// Check the trait-screen invariants against `t`
    ///
    /// The raw score must be 1-5, and a flagged disqualifier needs verbatim
    /// evidence.
    pub fn check(&self, t: &Trait) -> Result<(), ValidationError> {
        if self.valid_score().is_none() {
            return Err(ValidationError::MissingRawScore {
                trait_id: t.id.clone(),
                trait_name: t.name.clone(),
            });
        }
        if self.absolute_disqualifier && self.verbatim_notes.trim().is_empty() {
            return Err(ValidationError::MissingVerbatimEvidence {
                trait_id: t.id.clone(),
                trait_name: t.name.clone(),
            });
        }
        Ok(())
    }
}

/// Candidate metadata captured on the candidate-info screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInfo {
    #[serde(default)]
    pub name: String,
    /// As entered; validated as `YYYY-MM-DD` before leaving the screen
    #[serde(default)]
    pub interview_date: String,
    /// School or location label
    #[serde(default)]
    pub school: String,
    /// Selected track key, empty until chosen
    #[serde(default)]
    pub track: String,
}

/// The mutable unit of work for one interview
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSession {
    #[serde(default)]
    pub candidate: CandidateInfo,

    /// 1-based position in the active trait list; 0 means no progress
    #[serde(default)]
    pub current_index: usize,

    /// Trait id → input; entries are never removed during a session
    #[serde(default)]
    pub trait_inputs: BTreeMap<String, TraitInput>,
}

impl InterviewSession {
    /// Fresh empty session dated `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            candidate: CandidateInfo {
                interview_date: today.format(INTERVIEW_DATE_FORMAT).to_string(),
                ..CandidateInfo::default()
            },
            ..Self::default()
        }
    }

    /// Selected track, `None` when not yet chosen
    pub fn track(&self) -> Option<&str> {
        let track = self.candidate.track.trim();
        if track.is_empty() {
            None
        } else {
            Some(track)
        }
    }

    /// Create a default input for every listed trait that lacks one
    ///
    /// Returns the number of entries created.
    pub fn ensure_defaults<'a, I>(&mut self, traits: I) -> usize
    where
        I: IntoIterator<Item = &'a Trait>,
    {
        let mut created = 0;
        for t in traits {
            if !self.trait_inputs.contains_key(&t.id) {
                self.trait_inputs.insert(t.id.clone(), TraitInput::default());
                created += 1;
            }
        }
        created
    }

    /// Input recorded for a trait, if any
    pub fn input(&self, trait_id: &str) -> Option<&TraitInput> {
        self.trait_inputs.get(trait_id)
    }
}
