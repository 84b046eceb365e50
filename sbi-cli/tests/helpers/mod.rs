//! Shared fixtures for sbi-cli tests

#![allow(dead_code)]

use sbi_common::Rubric;
use serde_json::json;

/// Infant track with a critical trait (x2) and an infant-only trait (x2);
/// maximum 20
pub fn rubric() -> Rubric {
    Rubric::from_value(rubric_json()).unwrap()
}

pub fn rubric_json() -> serde_json::Value {
    json!({
        "metadata": {"title": "CLI test rubric"},
        "scoring": {},
        "tracks": {
            "infant": {"label": "Infant/Toddler", "max_weighted_total": 20}
        },
        "traits": [
            {
                "id": "trait_1", "name": "Safety", "priority": "critical", "weight": 2,
                "primary_question": "What do you do when a child climbs a shelf?",
                "descriptors": {"1": "ignores", "3": "redirects", "5": "prevents"},
                "sample_answers": {"5": "I anchor the shelf and redirect."},
                "applicable_tracks": ["all"]
            },
            {
                "id": "trait_2", "name": "Routines", "priority": "standard", "weight": 2,
                "primary_question": "Walk me through nap time.",
                "descriptors": {"1": "unsafe", "5": "consistent"},
                "sample_answers": {},
                "applicable_tracks": ["infant"]
            }
        ],
        "absolute_disqualifiers": ["Leaves children unsupervised"]
    })
}

pub fn locations() -> Vec<String> {
    vec!["Hawthorne".to_string(), "Palmdale".to_string()]
}

/// Join script lines with newlines, ending with a newline
pub fn script(lines: &[&str]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}
