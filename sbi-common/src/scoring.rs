//! Scoring engine
//!
//! Pure function of (rubric, track, per-trait inputs) → [`ScoringResult`].
//!
//! # Algorithm
//! 1. Resolve the active traits for the track (declared order)
//! 2. Missing inputs count as raw score 0; every active trait yields a row
//! 3. `weighted_total = Σ raw × weight`
//! 4. Override signals: any disqualifier, any critical at 1, any critical below 3
//! 5. `percent = total / max × 100` (0 when max is 0), rounded only for display
//! 6. Lock text: disqualifier text, replaced by the critical text when both hold
//! 7. Outcome, first match wins:
//!    - disqualifier or critical = 1 → No Hire
//!    - percent ≥ hire and no critical < 3 → Hire
//!    - borderline min ≤ percent ≤ borderline max and no critical = 1 → Borderline
//!    - otherwise → No Hire

use crate::rubric::Rubric;
use crate::session::TraitInput;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Lock text when an absolute disqualifier was flagged
pub const DISQUALIFIER_LOCK: &str = "Any Absolute Disqualifier observed => Immediate NO HIRE";

/// Lock text when a critical trait scored 1
pub const CRITICAL_LOCK: &str = "Any Critical trait raw score = 1 => Immediate NO HIRE";

/// Final recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "Hire")]
    Hire,
    #[serde(rename = "Borderline")]
    Borderline,
    #[serde(rename = "No Hire")]
    NoHire,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Hire => "Hire",
            Outcome::Borderline => "Borderline",
            Outcome::NoHire => "No Hire",
        };
        f.write_str(label)
    }
}

/// One scored trait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRow {
    pub trait_id: String,
    pub trait_name: String,
    pub priority: String,
    pub weight: i64,
    /// 0 when the interviewer never scored the trait
    pub raw_score: i64,
    pub weighted_score: i64,
    pub question_notes: String,
    pub trait_notes: String,
    pub verbatim_notes: String,
    pub absolute_disqualifier: bool,
    pub primary_question: String,
}

/// Derived scoring outcome for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub rows: Vec<ScoringRow>,
    pub weighted_total: i64,
    pub max_weighted_total: i64,
    /// Rounded to two decimals; thresholds were compared against the exact value
    pub percent_of_max: f64,
    pub critical_eq_1: bool,
    pub critical_lt_3: bool,
    pub disqualifier_present: bool,
    /// Why the outcome was forced, if it was
    pub locked_rule: Option<String>,
    pub outcome: Outcome,
}

impl ScoringResult {
    /// Whether an override forced No Hire regardless of percent
    pub fn is_locked(&self) -> bool {
        self.locked_rule.is_some()
    }

    /// Rows with a flagged disqualifier and non-blank verbatim evidence
    pub fn disqualifier_evidence(&self) -> impl Iterator<Item = &ScoringRow> {
        self.rows
            .iter()
            .filter(|r| r.absolute_disqualifier && !r.verbatim_notes.trim().is_empty())
    }
}

fn weight_overflow(trait_id: &str, weight: i64) -> Error {
    Error::Config(format!(
        "Weighted score overflows for trait '{}' (weight {})",
        trait_id, weight
    ))
}

/// Evaluate per-trait inputs against the rubric's rules for `track_key`
///
/// Fails with `Error::Lookup` if `track_key` is not configured, and with
/// `Error::Config` if a rubric weight is too large to total.
pub fn evaluate(
    rubric: &Rubric,
    track_key: &str,
    trait_inputs: &BTreeMap<String, TraitInput>,
) -> Result<ScoringResult> {
    let track = rubric.track(track_key)?;
    let empty = TraitInput::default();

    let mut rows = Vec::new();
    let mut weighted_total: i64 = 0;
    let mut critical_eq_1 = false;
    let mut critical_lt_3 = false;
    let mut disqualifier_present = false;

    for t in rubric.traits_for_track(track_key) {
        let input = trait_inputs.get(&t.id).unwrap_or(&empty);
        let raw = input.score_or_zero();
        let weighted = raw
            .checked_mul(t.weight)
            .ok_or_else(|| weight_overflow(&t.id, t.weight))?;
        weighted_total = weighted_total
            .checked_add(weighted)
            .ok_or_else(|| weight_overflow(&t.id, t.weight))?;

        if input.absolute_disqualifier {
            disqualifier_present = true;
        }
        if t.is_critical() {
            if raw == 1 {
                critical_eq_1 = true;
            }
            if raw < 3 {
                critical_lt_3 = true;
            }
        }

        rows.push(ScoringRow {
            trait_id: t.id.clone(),
            trait_name: t.name.clone(),
            priority: t.priority.clone(),
            weight: t.weight,
            raw_score: raw,
            weighted_score: weighted,
            question_notes: input.question_notes.clone(),
            trait_notes: input.trait_notes.clone(),
            verbatim_notes: input.verbatim_notes.clone(),
            absolute_disqualifier: input.absolute_disqualifier,
            primary_question: t.primary_question.clone(),
        });
    }

    let max_weighted_total = track.max_weighted_total;
    let percent = if max_weighted_total != 0 {
        weighted_total as f64 / max_weighted_total as f64 * 100.0
    } else {
        0.0
    };

    let mut locked_rule = None;
    if disqualifier_present {
        locked_rule = Some(DISQUALIFIER_LOCK.to_string());
    }
    if critical_eq_1 {
        locked_rule = Some(CRITICAL_LOCK.to_string());
    }

    let thresholds = &track.thresholds;
    let outcome = if disqualifier_present || critical_eq_1 {
        Outcome::NoHire
    } else if percent >= thresholds.hire_percent_min && !critical_lt_3 {
        Outcome::Hire
    } else if thresholds.borderline_percent_min <= percent
        && percent <= thresholds.borderline_percent_max
        && !critical_eq_1
    {
        // critical_eq_1 is already false here; the guard stays so that the
        // borderline rule reads the same as the documented outcome table.
        Outcome::Borderline
    } else {
        Outcome::NoHire
    };

    debug!(
        track = track_key,
        weighted_total,
        max_weighted_total,
        percent,
        disqualifier_present,
        critical_eq_1,
        critical_lt_3,
        outcome = %outcome,
        "Scoring complete"
    );

    Ok(ScoringResult {
        rows,
        weighted_total,
        max_weighted_total,
        percent_of_max: round2(percent),
        critical_eq_1,
        critical_lt_3,
        disqualifier_present,
        locked_rule,
        outcome,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
