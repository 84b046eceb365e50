//! Final report export
//!
//! Renders a finalized scoring result into a distributable Markdown document
//! and writes the machine-readable handoff (result + session snapshot +
//! global disqualifier list) next to it as JSON. The exporter only formats;
//! every decision in the report was already made by the scoring engine.

use crate::drafts::sanitize_filename;
use crate::rubric::Rubric;
use crate::scoring::ScoringResult;
use crate::session::InterviewSession;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything a report renderer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportHandoff {
    pub session: InterviewSession,
    pub scoring: ScoringResult,
    pub absolute_disqualifiers: Vec<String>,
}

impl ReportHandoff {
    pub fn new(rubric: &Rubric, session: InterviewSession, scoring: ScoringResult) -> Self {
        Self {
            session,
            scoring,
            absolute_disqualifiers: rubric.absolute_disqualifiers.clone(),
        }
    }

    /// `<date> - <school> - <name> - Interview`, without extension
    pub fn file_stem(&self) -> String {
        let candidate = &self.session.candidate;
        let school = if candidate.school.trim().is_empty() {
            "UnknownSchool".to_string()
        } else {
            sanitize_filename(&candidate.school)
        };
        format!(
            "{} - {} - {} - Interview",
            sanitize_filename(&candidate.interview_date),
            school,
            sanitize_filename(&candidate.name)
        )
    }
}

/// Renders a handoff into a file
pub trait ReportExporter {
    /// Write the report, returning the primary document's path
    fn export(&self, rubric: &Rubric, handoff: &ReportHandoff) -> Result<PathBuf>;
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Render the report body as Markdown
pub fn render_markdown(rubric: &Rubric, handoff: &ReportHandoff) -> String {
    let mut output = String::new();
    output.push_str(&format_candidate(rubric, handoff));
    output.push_str(&format_score_summary(&handoff.scoring));
    output.push_str(&format_overrides(&handoff.scoring));
    output.push_str(&format_trait_detail(&handoff.scoring));
    output.push_str(&format_disqualifiers(handoff));
    output
}

fn format_candidate(rubric: &Rubric, handoff: &ReportHandoff) -> String {
    let candidate = &handoff.session.candidate;
    let track_label = rubric
        .tracks
        .get(&candidate.track)
        .map(|t| t.label.as_str())
        .filter(|label| !label.is_empty())
        .unwrap_or(candidate.track.as_str());

    format!(
        "# Structured Behavioral Interview Report\n\n\
         - Candidate Name: {}\n\
         - Interview Date: {}\n\
         - School/Location: {}\n\
         - Track: {}\n\n",
        candidate.name, candidate.interview_date, candidate.school, track_label
    )
}

fn format_score_summary(scoring: &ScoringResult) -> String {
    let mut output = String::from("## Score Summary\n\n");
    output.push_str("| Trait | Priority | Weight | Raw Score | Weighted Score |\n");
    output.push_str("|---|---|---|---|---|\n");
    for row in &scoring.rows {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            row.trait_name, row.priority, row.weight, row.raw_score, row.weighted_score
        ));
    }
    output.push('\n');
    output.push_str(&format!(
        "Weighted Total: {} / {}\n\n",
        scoring.weighted_total, scoring.max_weighted_total
    ));
    output.push_str(&format!("Percent of Max: {}%\n\n", scoring.percent_of_max));
    output.push_str(&format!("Final Outcome: **{}**\n\n", scoring.outcome));
    output
}

fn format_overrides(scoring: &ScoringResult) -> String {
    format!(
        "## Override Summary\n\n\
         - Any Critical trait = 1: {}\n\
         - Any Absolute Disqualifier observed: {}\n\
         - Outcome lock rule: {}\n\n",
        yes_no(scoring.critical_eq_1),
        yes_no(scoring.disqualifier_present),
        scoring.locked_rule.as_deref().unwrap_or("None")
    )
}

fn format_trait_detail(scoring: &ScoringResult) -> String {
    let mut output = String::from("## Trait-by-Trait Detail\n\n");
    for (idx, row) in scoring.rows.iter().enumerate() {
        output.push_str(&format!("### {}. {}\n\n", idx + 1, row.trait_name));
        output.push_str(&format!("- Priority: {} | Weight: x{}\n", row.priority, row.weight));
        output.push_str(&format!("- Primary Question: {}\n", row.primary_question));
        output.push_str(&format!("- Selected Raw Score: {}\n", row.raw_score));
        output.push_str(&format!("- Question Notes: {}\n", row.question_notes));
        output.push_str(&format!("- Trait Notes: {}\n", row.trait_notes));
        output.push_str(&format!("- Verbatim quote/notes: {}\n\n", row.verbatim_notes));
    }
    output
}

fn format_disqualifiers(handoff: &ReportHandoff) -> String {
    let mut output = String::from("## Global Disqualifiers\n\n");
    for d in &handoff.absolute_disqualifiers {
        output.push_str(&format!("- {}\n", d));
    }
    output.push('\n');

    output.push_str("Observed disqualifier evidence (from verbatim notes):\n\n");
    let mut evidence_added = false;
    for row in handoff.scoring.disqualifier_evidence() {
        output.push_str(&format!("- {}: {}\n", row.trait_name, row.verbatim_notes.trim()));
        evidence_added = true;
    }
    if !evidence_added {
        output.push_str("- None recorded\n");
    }
    output
}

/// Writes `<stem>.md` and `<stem>.json` into the final-report directory
#[derive(Debug, Clone)]
pub struct FsReportExporter {
    output_dir: PathBuf,
}

impl FsReportExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.output_dir
    }
}

impl ReportExporter for FsReportExporter {
    fn export(&self, rubric: &Rubric, handoff: &ReportHandoff) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| Error::persistence(&self.output_dir, e))?;

        let stem = handoff.file_stem();
        let md_path = self.output_dir.join(format!("{}.md", stem));
        let json_path = self.output_dir.join(format!("{}.json", stem));

        let json = serde_json::to_string_pretty(handoff)
            .map_err(|e| Error::persistence(&json_path, e))?;
        std::fs::write(&json_path, json).map_err(|e| Error::persistence(&json_path, e))?;
        std::fs::write(&md_path, render_markdown(rubric, handoff))
            .map_err(|e| Error::persistence(&md_path, e))?;

        info!(
            path = %md_path.display(),
            outcome = %handoff.scoring.outcome,
            "Report exported"
        );
        Ok(md_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::evaluate;
    use crate::session::TraitInput;
    use serde_json::json;

    fn rubric() -> Rubric {
        Rubric::from_value(json!({
            "metadata": {}, "scoring": {},
            "absolute_disqualifiers": ["Leaves children unsupervised"],
            "tracks": {"pre": {"label": "Preschool (3-5)", "max_weighted_total": 10}},
            "traits": [
                {"id": "t1", "name": "Safety", "priority": "critical", "weight": 2,
                 "primary_question": "How do you keep kids safe?",
                 "descriptors": {}, "sample_answers": {}, "applicable_tracks": ["all"]}
            ]
        }))
        .unwrap()
    }

    fn handoff(disqualified: bool) -> ReportHandoff {
        let rubric = rubric();
        let mut session = InterviewSession::default();
        session.candidate.name = "Sam Ortiz".to_string();
        session.candidate.interview_date = "2024-05-01".to_string();
        session.candidate.school = "North Long Beach".to_string();
        session.candidate.track = "pre".to_string();
        session.trait_inputs.insert(
            "t1".to_string(),
            TraitInput {
                raw_score: Some(4),
                absolute_disqualifier: disqualified,
                verbatim_notes: if disqualified { " walked away ".to_string() } else { String::new() },
                ..TraitInput::default()
            },
        );
        let scoring = evaluate(&rubric, "pre", &session.trait_inputs).unwrap();
        ReportHandoff::new(&rubric, session, scoring)
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(
            handoff(false).file_stem(),
            "2024-05-01 - North Long Beach - Sam Ortiz - Interview"
        );
        let mut h = handoff(false);
        h.session.candidate.school.clear();
        assert!(h.file_stem().contains(" - UnknownSchool - "));
    }

    #[test]
    fn test_markdown_sections() {
        let md = render_markdown(&rubric(), &handoff(false));
        assert!(md.contains("- Track: Preschool (3-5)"));
        assert!(md.contains("| Safety | critical | 2 | 4 | 8 |"));
        assert!(md.contains("Weighted Total: 8 / 10"));
        assert!(md.contains("Percent of Max: 80%"));
        assert!(md.contains("Final Outcome: **Hire**"));
        assert!(md.contains("- Outcome lock rule: None"));
        assert!(md.contains("- Leaves children unsupervised"));
        assert!(md.contains("- None recorded"));
    }

    #[test]
    fn test_markdown_section_layout() {
        let md = render_markdown(&rubric(), &handoff(false));
        assert!(md.starts_with(
            "# Structured Behavioral Interview Report\n\n- Candidate Name: Sam Ortiz\n- Interview Date: 2024-05-01\n"
        ));
        assert!(md.contains("- Track: Preschool (3-5)\n\n## Score Summary\n\n| Trait |"));
        assert!(md.contains("- Outcome lock rule: None\n\n## Trait-by-Trait Detail\n\n### 1. Safety\n\n"));
        assert!(md.ends_with("(from verbatim notes):\n\n- None recorded\n"));
    }

    #[test]
    fn test_markdown_lists_evidence() {
        let md = render_markdown(&rubric(), &handoff(true));
        assert!(md.contains("Final Outcome: **No Hire**"));
        assert!(md.contains("- Any Absolute Disqualifier observed: Yes"));
        assert!(md.contains("- Safety: walked away"));
        assert!(!md.contains("None recorded"));
    }

    #[test]
    fn test_export_writes_markdown_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FsReportExporter::new(dir.path().join("final"));
        let h = handoff(false);
        let path = exporter.export(&rubric(), &h).unwrap();

        assert!(path.ends_with("2024-05-01 - North Long Beach - Sam Ortiz - Interview.md"));
        let json_path = path.with_extension("json");
        let back: ReportHandoff =
            serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(back, h);
    }
}
