//! Interactive driver tests over scripted input

mod helpers;

use sbi_cli::{Driver, RunSummary};
use sbi_common::drafts::{DraftStore, FsDraftStore};
use sbi_common::report::FsReportExporter;
use sbi_common::session::{CandidateInfo, InterviewSession, TraitInput};
use sbi_common::signals::SignalLibrary;
use sbi_common::{InterviewWizard, Screen};

struct Harness {
    _dir: tempfile::TempDir,
    store: FsDraftStore,
    exporter: FsReportExporter,
    signals: SignalLibrary,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        Self {
            store: FsDraftStore::new(dir.path().join("drafts")),
            exporter: FsReportExporter::new(dir.path().join("final")),
            signals: SignalLibrary::default(),
            _dir: dir,
        }
    }

    /// Run the driver over `lines`, returning the summary and the printed
    /// output
    fn run(&self, wizard: &mut InterviewWizard<'_>, lines: &[&str]) -> (RunSummary, String) {
        let input = helpers::script(lines);
        let mut output = Vec::new();
        let summary = Driver::new(
            input.as_bytes(),
            &mut output,
            &self.store,
            &self.exporter,
            &self.signals,
            helpers::locations(),
        )
        .run(wizard)
        .unwrap();
        (summary, String::from_utf8(output).unwrap())
    }
}

#[test]
fn test_end_of_input_on_start_quits() {
    let rubric = helpers::rubric();
    let harness = Harness::new();
    let mut wizard = InterviewWizard::new(&rubric);

    let (summary, output) = harness.run(&mut wizard, &[]);
    assert_eq!(summary, RunSummary::default());
    assert!(output.contains("[n] New interview"));
    assert_eq!(wizard.screen(), Screen::Start);
}

#[test]
fn test_full_interview_to_report() {
    let rubric = helpers::rubric();
    let harness = Harness::new();
    let mut wizard = InterviewWizard::new(&rubric);

    let (summary, output) = harness.run(
        &mut wizard,
        &[
            "n",
            "Jordan Lee",
            "2024-05-01",
            "2",
            "1",
            "n",
            // trait 1
            "5",
            "Anchored the shelf",
            "",
            "n",
            "",
            "n",
            // trait 2
            "4",
            "",
            "",
            "",
            "",
            "f",
            "q",
        ],
    );

    assert!(output.contains("Trait 1 of 2: Safety [critical, x2]"));
    assert!(output.contains("Trait 2 of 2: Routines [standard, x2]"));
    assert!(output.contains("Weighted total: 18 / 20 (90%)"));
    assert!(output.contains("Outcome: Hire"));
    assert_eq!(summary.reports.len(), 1);
    assert!(summary.added_locations.is_empty());

    let report = &summary.reports[0];
    assert!(report.ends_with("2024-05-01 - Palmdale - Jordan Lee - Interview.md"));
    let text = std::fs::read_to_string(report).unwrap();
    assert!(text.contains("- Question Notes: Anchored the shelf"));
    assert_eq!(wizard.screen(), Screen::Start);
}

#[test]
fn test_rejected_candidate_info_keeps_typed_values() {
    let rubric = helpers::rubric();
    let harness = Harness::new();
    let mut wizard = InterviewWizard::new(&rubric);

    let (summary, output) = harness.run(
        &mut wizard,
        &[
            "n",
            "",
            "2024-05-01",
            "Compton",
            "infant",
            "n",
            // redrawn with the typed school and track kept
            "Sam Ortiz",
            "",
            "",
            "",
            "n",
        ],
    );

    assert!(output.contains("✗ Validation failed: Candidate Name is required."));
    assert!(output.contains("School/Location (number or name) [Compton]"));
    assert_eq!(wizard.screen(), Screen::Trait(0));
    assert_eq!(wizard.session().candidate.school, "Compton");
    assert_eq!(summary.added_locations, vec!["Compton".to_string()]);
}

#[test]
fn test_rejected_trait_entry_is_redrawn_then_saved() {
    let rubric = helpers::rubric();
    let harness = Harness::new();
    let mut wizard = InterviewWizard::new(&rubric);

    let (summary, output) = harness.run(
        &mut wizard,
        &[
            "n",
            "Jordan Lee",
            "2024-05-01",
            "1",
            "1",
            "n",
            // disqualifier without verbatim notes
            "3",
            "",
            "",
            "y",
            "",
            "n",
            // redrawn: keep score and flag, add the quote, save
            "",
            "",
            "",
            "",
            "Said the kids would be fine alone",
            "s",
        ],
    );

    assert!(output.contains("has disqualifier checked but no verbatim notes"));
    assert!(output.contains("Current: score 3, disqualifier yes"));
    assert!(output.contains("✓ Draft saved to"));
    assert_eq!(summary.drafts_saved.len(), 1);
    assert_eq!(wizard.screen(), Screen::Trait(0));

    let saved = harness.store.load(&summary.drafts_saved[0]).unwrap();
    let input = saved.input("trait_1").unwrap();
    assert_eq!(input.raw_score, Some(3));
    assert!(input.absolute_disqualifier);
    assert_eq!(input.verbatim_notes, "Said the kids would be fine alone");
    assert_eq!(saved.candidate.school, "Hawthorne");
}

#[test]
fn test_non_numeric_score_is_asked_again() {
    let rubric = helpers::rubric();
    let harness = Harness::new();
    let mut wizard = InterviewWizard::new(&rubric);

    let (_, output) = harness.run(
        &mut wizard,
        &["n", "A", "2024-05-01", "1", "1", "n", "five", "5", "", "", "n", "", "n"],
    );

    assert!(output.contains("✗ Enter a number from 1 to 5."));
    assert_eq!(wizard.screen(), Screen::Trait(1));
    assert_eq!(wizard.session().input("trait_1").unwrap().raw_score, Some(5));
}

#[test]
fn test_open_draft_resumes_on_saved_trait() {
    let rubric = helpers::rubric();
    let harness = Harness::new();

    let mut session = InterviewSession {
        candidate: CandidateInfo {
            name: "Jordan Lee".to_string(),
            interview_date: "2024-05-01".to_string(),
            school: "Palmdale".to_string(),
            track: "infant".to_string(),
        },
        current_index: 2,
        ..InterviewSession::default()
    };
    session.trait_inputs.insert(
        "trait_2".to_string(),
        TraitInput {
            raw_score: Some(2),
            ..TraitInput::default()
        },
    );
    harness.store.save(&session).unwrap();

    let mut wizard = InterviewWizard::new(&rubric);
    let (_, output) = harness.run(&mut wizard, &["o", "1", "", "", "", "", "", "b"]);

    assert!(output.contains("Resumed draft-"));
    assert!(output.contains("Trait 2 of 2: Routines"));
    assert!(output.contains("Raw score (1-5) [2]"));
    assert_eq!(wizard.screen(), Screen::Trait(0));
}

#[test]
fn test_open_with_no_drafts() {
    let rubric = helpers::rubric();
    let harness = Harness::new();
    let mut wizard = InterviewWizard::new(&rubric);

    let (_, output) = harness.run(&mut wizard, &["o", "q"]);
    assert!(output.contains("No drafts found."));
    assert!(!harness.store.dir().exists());
}
