//! Text rendering for the terminal
//!
//! Pure formatting: every function takes a snapshot and returns a `String`,
//! so screens can be checked in tests without a terminal.

use sbi_common::rubric::Rubric;
use sbi_common::scoring::ScoringResult;
use sbi_common::signals::QuestionSignals;
use sbi_common::{Trait, TraitInput};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// CLI output formatter
pub struct CliFormatter;

impl CliFormatter {
    /// Screen heading with a rule underneath
    pub fn format_heading(title: &str) -> String {
        format!("\n{}\n{}\n", title, RULE)
    }

    /// One line per track: key, label, trait count, maximum
    pub fn format_tracks(rubric: &Rubric) -> String {
        let mut output = String::new();
        for (key, track) in &rubric.tracks {
            let count = sbi_common::applicability::trait_ids_for_track(rubric, key).len();
            output.push_str(&format!(
                "{:<12} {:<24} {} traits, max weighted total {}\n",
                key, track.label, count, track.max_weighted_total
            ));
        }
        output
    }

    /// Numbered menu of labels, 1-based
    pub fn format_choices<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| format!("  {}) {}\n", i + 1, item))
            .collect()
    }

    /// Full trait screen: header, question, descriptors and sample answers
    ///
    /// Example header: `Trait 2 of 5: Emotional Regulation [critical, x3]`
    pub fn format_trait_screen(t: &Trait, position: (usize, usize)) -> String {
        let mut output = String::new();
        output.push_str(&Self::format_heading(&format!(
            "Trait {} of {}: {} [{}, x{}]",
            position.0, position.1, t.name, t.priority, t.weight
        )));
        output.push_str(&format!("Primary question: {}\n\n", t.primary_question));

        for rank in (1..=5u8).rev() {
            let descriptor = t.descriptor(rank).unwrap_or("");
            output.push_str(&format!("  {}  {}\n", rank, descriptor));
            if let Some(sample) = t.sample_answer(rank) {
                output.push_str(&format!("       e.g. \"{}\"\n", sample));
            }
        }
        output
    }

    /// Disqualifier signals for the current question, if any
    pub fn format_signals(signals: &QuestionSignals) -> String {
        if signals.disqualifier_signals.is_empty() {
            return String::new();
        }

        let mut output = String::from("\nDisqualifier signals to listen for:\n");
        for signal in &signals.disqualifier_signals {
            let auto = if signal.auto_disqualify_if_confirmed {
                " (auto-disqualify if confirmed)"
            } else {
                ""
            };
            output.push_str(&format!("  ! {}{}\n", signal.friendly_type(), auto));
            for example in &signal.examples {
                output.push_str(&format!("      \"{}\"\n", example));
            }
            if !signal.probe_to_confirm.is_empty() {
                output.push_str(&format!("      Probe: {}\n", signal.probe_to_confirm));
            }
        }
        output
    }

    /// Compact view of a stored entry, shown when revisiting a trait
    pub fn format_entry(input: &TraitInput) -> String {
        let score = input
            .raw_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "Current: score {}, disqualifier {}\n",
            score,
            if input.absolute_disqualifier { "yes" } else { "no" }
        )
    }

    /// Score table, totals, override flags and outcome
    pub fn format_scoring(result: &ScoringResult) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{:<32} {:<10} {:>6} {:>4} {:>8}\n",
            "Trait", "Priority", "Weight", "Raw", "Weighted"
        ));
        for row in &result.rows {
            let flag = if row.absolute_disqualifier { " !" } else { "" };
            output.push_str(&format!(
                "{:<32} {:<10} {:>6} {:>4} {:>8}{}\n",
                row.trait_name, row.priority, row.weight, row.raw_score, row.weighted_score, flag
            ));
        }
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!(
            "Weighted total: {} / {} ({}%)\n",
            result.weighted_total, result.max_weighted_total, result.percent_of_max
        ));
        if let Some(rule) = &result.locked_rule {
            output.push_str(&format!("Locked: {}\n", rule));
        } else if result.critical_lt_3 {
            output.push_str("Hire blocked: a critical trait scored below 3\n");
        }
        output.push_str(&format!("Outcome: {}\n", result.outcome));
        output
    }
}
