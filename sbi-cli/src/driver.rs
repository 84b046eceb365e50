//! Interactive interview loop
//!
//! Renders the wizard's current screen, reads the interviewer's answers line
//! by line and submits them as wizard commands. The driver holds no interview
//! state of its own beyond the form being typed; a rejected command prints
//! the reason and redraws the same screen with the typed values kept.
//!
//! Input conventions on every prompt:
//! - empty line keeps the value shown in brackets
//! - `-` clears a text field
//! - end of input quits (unsaved entries are discarded)

use crate::render::CliFormatter;
use anyhow::Result;
use sbi_common::drafts::DraftStore;
use sbi_common::report::ReportExporter;
use sbi_common::session::CandidateInfo;
use sbi_common::signals::SignalLibrary;
use sbi_common::wizard::Navigation;
use sbi_common::{InterviewWizard, Screen, TraitInput};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

/// What happened during one interactive run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub drafts_saved: Vec<PathBuf>,
    pub reports: Vec<PathBuf>,
    /// Locations typed in that were not in the configured list
    pub added_locations: Vec<String>,
}

enum Flow {
    Continue,
    Quit,
}

/// Line-oriented terminal front end for [`InterviewWizard`]
pub struct Driver<'a, R, W> {
    input: R,
    output: W,
    store: &'a dyn DraftStore,
    exporter: &'a dyn ReportExporter,
    signals: &'a SignalLibrary,
    locations: Vec<String>,
    pending_form: Option<CandidateInfo>,
    pending_entry: Option<TraitInput>,
    summary: RunSummary,
}

impl<'a, R: BufRead, W: Write> Driver<'a, R, W> {
    pub fn new(
        input: R,
        output: W,
        store: &'a dyn DraftStore,
        exporter: &'a dyn ReportExporter,
        signals: &'a SignalLibrary,
        locations: Vec<String>,
    ) -> Self {
        Self {
            input,
            output,
            store,
            exporter,
            signals,
            locations,
            pending_form: None,
            pending_entry: None,
            summary: RunSummary::default(),
        }
    }

    /// Drive `wizard` until the interviewer quits or input ends
    pub fn run(mut self, wizard: &mut InterviewWizard<'_>) -> Result<RunSummary> {
        loop {
            let flow = match wizard.screen() {
                Screen::Start => self.start_screen(wizard)?,
                Screen::CandidateInfo => self.candidate_screen(wizard)?,
                Screen::Trait(_) => self.trait_screen(wizard)?,
            };
            if let Flow::Quit = flow {
                break;
            }
        }
        self.output.flush()?;
        Ok(self.summary)
    }

    /// Next input line without the trailing newline; `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, label: &str, current: &str) -> Result<Option<String>> {
        if current.is_empty() {
            write!(self.output, "{}: ", label)?;
        } else {
            write!(self.output, "{} [{}]: ", label, current)?;
        }
        self.read_line()
    }

    /// Text field: empty keeps `current`, `-` clears
    fn prompt_text(&mut self, label: &str, current: &str) -> Result<Option<String>> {
        Ok(self.prompt(label, current)?.map(|line| {
            let line = line.trim();
            if line.is_empty() {
                current.to_string()
            } else if line == "-" {
                String::new()
            } else {
                line.to_string()
            }
        }))
    }

    fn report_error(&mut self, err: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "✗ {}", err)?;
        Ok(())
    }

    fn start_screen(&mut self, wizard: &mut InterviewWizard<'_>) -> Result<Flow> {
        write!(
            self.output,
            "{}",
            CliFormatter::format_heading("Structured Behavioral Interview")
        )?;
        writeln!(self.output, "[n] New interview  [o] Open draft  [q] Quit")?;
        let Some(choice) = self.prompt("Choice", "")? else {
            return Ok(Flow::Quit);
        };

        match choice.trim().to_ascii_lowercase().as_str() {
            "n" | "new" => {
                wizard.new_interview()?;
                self.pending_form = None;
            }
            "o" | "open" => return self.open_draft(wizard),
            "q" | "quit" => return Ok(Flow::Quit),
            other => self.report_error(format!("Unknown choice '{}'", other))?,
        }
        Ok(Flow::Continue)
    }

    fn open_draft(&mut self, wizard: &mut InterviewWizard<'_>) -> Result<Flow> {
        let drafts = match self.store.list() {
            Ok(drafts) => drafts,
            Err(e) => {
                self.report_error(e)?;
                return Ok(Flow::Continue);
            }
        };
        if drafts.is_empty() {
            writeln!(self.output, "No drafts found.")?;
            return Ok(Flow::Continue);
        }

        let names: Vec<String> = drafts
            .iter()
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect();
        write!(
            self.output,
            "{}",
            CliFormatter::format_choices(names.iter().map(String::as_str))
        )?;
        let Some(line) = self.prompt("Draft number", "")? else {
            return Ok(Flow::Quit);
        };

        match pick(&line, &drafts) {
            Some(path) => match wizard.open_draft(self.store, path) {
                Ok(screen) => {
                    self.pending_form = None;
                    self.pending_entry = None;
                    writeln!(self.output, "Resumed {} on {}", names_for(path), screen)?;
                }
                Err(e) => self.report_error(e)?,
            },
            None => self.report_error(format!("No draft numbered '{}'", line.trim()))?,
        }
        Ok(Flow::Continue)
    }

    fn candidate_screen(&mut self, wizard: &mut InterviewWizard<'_>) -> Result<Flow> {
        let rubric = wizard.rubric();
        let form = self
            .pending_form
            .take()
            .unwrap_or_else(|| wizard.session().candidate.clone());

        write!(self.output, "{}", CliFormatter::format_heading("Candidate Info"))?;

        let Some(name) = self.prompt_text("Candidate Name", &form.name)? else {
            return Ok(Flow::Quit);
        };
        let Some(interview_date) =
            self.prompt_text("Interview Date (YYYY-MM-DD)", &form.interview_date)?
        else {
            return Ok(Flow::Quit);
        };

        write!(
            self.output,
            "{}",
            CliFormatter::format_choices(self.locations.iter().map(String::as_str))
        )?;
        let Some(school) = self.prompt_text("School/Location (number or name)", &form.school)?
        else {
            return Ok(Flow::Quit);
        };
        let school = pick(&school, &self.locations).cloned().unwrap_or(school);

        let track_keys: Vec<&str> = rubric.tracks.keys().map(String::as_str).collect();
        let track_labels: Vec<String> = rubric
            .tracks
            .iter()
            .map(|(key, track)| format!("{} - {}", key, track.label))
            .collect();
        write!(
            self.output,
            "{}",
            CliFormatter::format_choices(track_labels.iter().map(String::as_str))
        )?;
        let Some(track) = self.prompt_text("Track (number or key)", &form.track)? else {
            return Ok(Flow::Quit);
        };
        let track = pick(&track, &track_keys)
            .map(|k| k.to_string())
            .unwrap_or(track);

        let form = CandidateInfo {
            name,
            interview_date,
            school,
            track,
        };

        writeln!(self.output, "[n] Next  [b] Back to start  [q] Quit")?;
        let Some(choice) = self.prompt("Choice", "n")? else {
            return Ok(Flow::Quit);
        };
        match choice.trim().to_ascii_lowercase().as_str() {
            "" | "n" | "next" => {
                let school = form.school.trim().to_string();
                match wizard.submit_candidate_info(form.clone()) {
                    Ok(_) => self.remember_location(&school),
                    Err(e) => {
                        self.report_error(e)?;
                        self.pending_form = Some(form);
                    }
                }
            }
            "b" | "back" => {
                wizard.back_to_start()?;
            }
            "q" | "quit" => return Ok(Flow::Quit),
            other => {
                self.report_error(format!("Unknown choice '{}'", other))?;
                self.pending_form = Some(form);
            }
        }
        Ok(Flow::Continue)
    }

    fn remember_location(&mut self, school: &str) {
        if !school.is_empty() && !self.locations.iter().any(|l| l == school) {
            debug!(school, "New location added");
            self.locations.push(school.to_string());
            self.summary.added_locations.push(school.to_string());
        }
    }

    /// Read the five trait fields, starting from `current`
    fn read_entry(&mut self, current: &TraitInput) -> Result<Option<TraitInput>> {
        let raw_score = loop {
            let shown = current.raw_score.map(|s| s.to_string()).unwrap_or_default();
            let Some(line) = self.prompt("Raw score (1-5)", &shown)? else {
                return Ok(None);
            };
            let line = line.trim();
            if line.is_empty() {
                break current.raw_score;
            }
            match line.parse::<u8>() {
                Ok(score) => break Some(score),
                Err(_) => self.report_error("Enter a number from 1 to 5.")?,
            }
        };

        let Some(question_notes) = self.prompt_text("Question notes", &current.question_notes)?
        else {
            return Ok(None);
        };
        let Some(trait_notes) = self.prompt_text("Trait notes", &current.trait_notes)? else {
            return Ok(None);
        };

        let absolute_disqualifier = loop {
            let shown = if current.absolute_disqualifier { "y" } else { "n" };
            let Some(line) = self.prompt("Absolute disqualifier observed? (y/n)", shown)? else {
                return Ok(None);
            };
            match line.trim().to_ascii_lowercase().as_str() {
                "" => break current.absolute_disqualifier,
                "y" | "yes" => break true,
                "n" | "no" => break false,
                _ => self.report_error("Answer y or n.")?,
            }
        };

        let Some(verbatim_notes) =
            self.prompt_text("Verbatim quote/notes", &current.verbatim_notes)?
        else {
            return Ok(None);
        };

        Ok(Some(TraitInput {
            raw_score,
            question_notes,
            trait_notes,
            verbatim_notes,
            absolute_disqualifier,
        }))
    }

    fn trait_screen(&mut self, wizard: &mut InterviewWizard<'_>) -> Result<Flow> {
        let (Some(t), Some(position)) = (wizard.current_trait(), wizard.position()) else {
            // Unreachable while the wizard upholds its invariants
            warn!(screen = %wizard.screen(), "Trait screen without an active trait");
            return Ok(Flow::Quit);
        };

        write!(self.output, "{}", CliFormatter::format_trait_screen(t, position))?;
        if let Some(question) = self.signals.for_trait(&t.id) {
            write!(self.output, "{}", CliFormatter::format_signals(question))?;
        }

        let current = self
            .pending_entry
            .take()
            .or_else(|| wizard.current_input().cloned())
            .unwrap_or_default();
        writeln!(self.output)?;
        write!(self.output, "{}", CliFormatter::format_entry(&current))?;

        let Some(entry) = self.read_entry(&current)? else {
            return Ok(Flow::Quit);
        };

        writeln!(
            self.output,
            "[n] Next  [b] Back  [s] Save draft  [f] Finalize  [q] Quit"
        )?;
        let Some(choice) = self.prompt("Choice", "n")? else {
            return Ok(Flow::Quit);
        };

        let result = match choice.trim().to_ascii_lowercase().as_str() {
            "" | "n" | "next" => wizard.next(entry.clone()).map(|nav| {
                if nav == Navigation::ReachedEnd {
                    Some("Last trait reached. Save a draft or finalize.".to_string())
                } else {
                    None
                }
            }),
            "b" | "back" => wizard.back(entry.clone()).map(|_| None),
            "s" | "save" => wizard.save_draft(entry.clone(), self.store).map(|path| {
                let message = format!("✓ Draft saved to {}", path.display());
                self.summary.drafts_saved.push(path);
                Some(message)
            }),
            "f" | "finalize" => wizard.finalize(entry.clone(), self.exporter).map(|done| {
                let message = format!(
                    "{}✓ Report written to {}",
                    CliFormatter::format_scoring(&done.handoff.scoring),
                    done.report_path.display()
                );
                self.summary.reports.push(done.report_path);
                Some(message)
            }),
            "q" | "quit" => return Ok(Flow::Quit),
            other => {
                self.report_error(format!("Unknown choice '{}'", other))?;
                self.pending_entry = Some(entry);
                return Ok(Flow::Continue);
            }
        };

        match result {
            Ok(Some(message)) => writeln!(self.output, "{}", message)?,
            Ok(None) => {}
            Err(e) => {
                self.report_error(e)?;
                self.pending_entry = Some(entry);
            }
        }
        Ok(Flow::Continue)
    }
}

/// 1-based numeric pick from `items`
fn pick<'i, T>(line: &str, items: &'i [T]) -> Option<&'i T> {
    line.trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| items.get(i))
}

fn names_for(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
