//! Interview wizard state machine
//!
//! Owns the in-progress [`InterviewSession`] and the current screen. Renderers
//! (the terminal driver, tests) read a snapshot through the accessors and
//! submit commands; every command either completes its transition or fails
//! with a specific reason and leaves the state untouched.
//!
//! ```text
//! Start ──new/open──▶ CandidateInfo ──submit──▶ Trait[0] ⇄ … ⇄ Trait[n-1]
//!   ▲                     │  ▲                                  │
//!   └──── back_to_start ──┘  └──────── back from Trait[0]        │
//!   └──────────────────────── finalize (success) ────────────────┘
//! ```
//!
//! Trait screens carry the interviewer's entry for the current trait with
//! every command. The entry is checked (score 1-5, verbatim evidence when a
//! disqualifier is flagged) before it is committed and before any move.

use crate::drafts::DraftStore;
use crate::finalize;
use crate::report::{ReportExporter, ReportHandoff};
use crate::rubric::{Rubric, Trait};
use crate::scoring;
use crate::session::{is_valid_interview_date, CandidateInfo, InterviewSession, TraitInput};
use crate::time::today;
use crate::{Error, Result, ValidationError};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where the interviewer currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    CandidateInfo,
    /// 0-based index into the active trait list
    Trait(usize),
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Start => f.write_str("start"),
            Screen::CandidateInfo => f.write_str("candidate info"),
            Screen::Trait(i) => write!(f, "trait {}", i + 1),
        }
    }
}

/// Result of a next/back command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Moved to a new screen
    Moved(Screen),
    /// Next was pressed on the last trait; the screen did not change
    ReachedEnd,
}

/// A successfully finalized interview
#[derive(Debug, Clone)]
pub struct Finalized {
    /// Primary report document
    pub report_path: PathBuf,
    pub handoff: ReportHandoff,
}

/// Single-interviewer session state machine
pub struct InterviewWizard<'a> {
    rubric: &'a Rubric,
    session: InterviewSession,
    screen: Screen,
    /// Traits for the session's track, resolved at track selection
    active: Vec<&'a Trait>,
}

impl<'a> InterviewWizard<'a> {
    /// Wizard on the start screen with an empty session dated today
    pub fn new(rubric: &'a Rubric) -> Self {
        Self {
            rubric,
            session: InterviewSession::new(today()),
            screen: Screen::Start,
            active: Vec::new(),
        }
    }

    pub fn rubric(&self) -> &'a Rubric {
        self.rubric
    }

    pub fn session(&self) -> &InterviewSession {
        &self.session
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Active traits in navigation order (empty before a track is chosen)
    pub fn active_traits(&self) -> &[&'a Trait] {
        &self.active
    }

    /// Trait shown on the current screen
    pub fn current_trait(&self) -> Option<&'a Trait> {
        match self.screen {
            Screen::Trait(i) => self.active.get(i).copied(),
            _ => None,
        }
    }

    /// Stored input for the current trait, used to prefill the form
    pub fn current_input(&self) -> Option<&TraitInput> {
        self.current_trait().and_then(|t| self.session.input(&t.id))
    }

    /// `(n, total)` for "Trait n of total", 1-based
    pub fn position(&self) -> Option<(usize, usize)> {
        match self.screen {
            Screen::Trait(i) => Some((i + 1, self.active.len())),
            _ => None,
        }
    }

    fn unavailable(&self, command: &str) -> Error {
        Error::InvalidState(format!(
            "'{}' is not available on the {} screen",
            command, self.screen
        ))
    }

    fn require(&self, allowed: bool, command: &str) -> Result<()> {
        if allowed {
            Ok(())
        } else {
            Err(self.unavailable(command))
        }
    }

    fn set_screen(&mut self, screen: Screen) {
        debug!(from = %self.screen, to = %screen, "Screen transition");
        self.screen = screen;
    }

    /// Start a fresh interview dated today, discarding any unsaved candidate info
    pub fn new_interview(&mut self) -> Result<Screen> {
        self.require(
            matches!(self.screen, Screen::Start | Screen::CandidateInfo),
            "new interview",
        )?;
        self.session = InterviewSession::new(today());
        self.active.clear();
        self.set_screen(Screen::CandidateInfo);
        Ok(self.screen)
    }

    /// Leave candidate info for the start screen; the session is kept
    pub fn back_to_start(&mut self) -> Result<Screen> {
        self.require(self.screen == Screen::CandidateInfo, "back to start")?;
        self.set_screen(Screen::Start);
        Ok(self.screen)
    }

    /// Load a saved draft and resume it
    pub fn open_draft(&mut self, store: &dyn DraftStore, path: &Path) -> Result<Screen> {
        self.require(self.screen == Screen::Start, "open draft")?;
        let session = store.load(path)?;
        self.resume(session)
    }

    /// Replace the session with `session` and jump to its saved position
    ///
    /// Sessions with no track or no progress resume on candidate info; others
    /// resume on the trait before the saved 1-based position.
    pub fn resume(&mut self, session: InterviewSession) -> Result<Screen> {
        self.require(self.screen == Screen::Start, "open draft")?;

        self.session = session;
        // A track the rubric no longer knows resumes on candidate info
        self.active = match self.session.track() {
            Some(track) if self.rubric.tracks.contains_key(track) => {
                self.rubric.traits_for_track(track)
            }
            _ => Vec::new(),
        };
        self.session.ensure_defaults(self.active.iter().copied());

        let saved = self.session.current_index;
        let target = if self.active.is_empty() || saved == 0 {
            Screen::CandidateInfo
        } else {
            let index = saved.saturating_sub(1);
            if index < self.active.len() {
                Screen::Trait(index)
            } else {
                Screen::CandidateInfo
            }
        };

        info!(
            candidate = %self.session.candidate.name,
            track = %self.session.candidate.track,
            saved_index = saved,
            screen = %target,
            "Session resumed"
        );
        self.set_screen(target);
        Ok(self.screen)
    }

    /// Submit candidate info and move to the first trait
    pub fn submit_candidate_info(&mut self, form: CandidateInfo) -> Result<Screen> {
        self.require(self.screen == Screen::CandidateInfo, "next")?;

        let name = form.name.trim();
        let interview_date = form.interview_date.trim();
        let school = form.school.trim();
        let track = form.track.trim();

        if name.is_empty() {
            return Err(ValidationError::MissingCandidateName.into());
        }
        if !is_valid_interview_date(interview_date) {
            return Err(ValidationError::InvalidInterviewDate(interview_date.to_string()).into());
        }
        if school.is_empty() {
            return Err(ValidationError::MissingLocation.into());
        }
        if track.is_empty() {
            return Err(ValidationError::MissingTrack.into());
        }
        if !self.rubric.tracks.contains_key(track) {
            return Err(ValidationError::UnknownTrack(track.to_string()).into());
        }
        let active = self.rubric.traits_for_track(track);
        if active.is_empty() {
            return Err(ValidationError::NoTraitsForTrack(track.to_string()).into());
        }

        self.session.candidate = CandidateInfo {
            name: name.to_string(),
            interview_date: interview_date.to_string(),
            school: school.to_string(),
            track: track.to_string(),
        };
        let created = self.session.ensure_defaults(active.iter().copied());
        self.active = active;
        self.session.current_index = 1;

        debug!(track, traits = self.active.len(), created, "Candidate info accepted");
        self.set_screen(Screen::Trait(0));
        Ok(self.screen)
    }

    /// Check `entry` for the current trait and apply it to a copy of the
    /// session. Returns the staged copy and the current trait index.
    fn stage_entry(&self, entry: TraitInput, command: &str) -> Result<(InterviewSession, usize)> {
        let index = match self.screen {
            Screen::Trait(i) => i,
            _ => return Err(self.unavailable(command)),
        };
        let t = self.active.get(index).ok_or_else(|| {
            Error::Lookup(format!("no active trait at position {}", index + 1))
        })?;

        entry.check(t)?;

        let mut staged = self.session.clone();
        staged.trait_inputs.insert(
            t.id.clone(),
            TraitInput {
                raw_score: entry.raw_score,
                question_notes: entry.question_notes.trim().to_string(),
                trait_notes: entry.trait_notes.trim().to_string(),
                verbatim_notes: entry.verbatim_notes.trim().to_string(),
                absolute_disqualifier: entry.absolute_disqualifier,
            },
        );
        staged.current_index = index + 1;
        Ok((staged, index))
    }

    /// Commit the current trait and move forward
    pub fn next(&mut self, entry: TraitInput) -> Result<Navigation> {
        let (staged, index) = self.stage_entry(entry, "next")?;
        self.session = staged;

        if index + 1 < self.active.len() {
            self.set_screen(Screen::Trait(index + 1));
            Ok(Navigation::Moved(self.screen))
        } else {
            debug!("Reached final trait");
            Ok(Navigation::ReachedEnd)
        }
    }

    /// Commit the current trait and move back
    pub fn back(&mut self, entry: TraitInput) -> Result<Navigation> {
        let (staged, index) = self.stage_entry(entry, "back")?;
        self.session = staged;

        let target = if index == 0 {
            Screen::CandidateInfo
        } else {
            Screen::Trait(index - 1)
        };
        self.set_screen(target);
        Ok(Navigation::Moved(self.screen))
    }

    /// Commit the current trait and persist a draft without moving
    pub fn save_draft(&mut self, entry: TraitInput, store: &dyn DraftStore) -> Result<PathBuf> {
        let (staged, _) = self.stage_entry(entry, "save draft")?;
        let path = store.save(&staged)?;
        self.session = staged;
        Ok(path)
    }

    /// Commit the current trait, validate, score and export
    ///
    /// On success the wizard returns to the start screen with a fresh session.
    pub fn finalize(&mut self, entry: TraitInput, exporter: &dyn ReportExporter) -> Result<Finalized> {
        let (staged, _) = self.stage_entry(entry, "finalize")?;

        finalize::validate(&staged, self.rubric)?;
        let track = staged.candidate.track.clone();
        let result = scoring::evaluate(self.rubric, &track, &staged.trait_inputs)?;
        let handoff = ReportHandoff::new(self.rubric, staged, result);
        let report_path = exporter.export(self.rubric, &handoff)?;

        info!(
            candidate = %handoff.session.candidate.name,
            outcome = %handoff.scoring.outcome,
            percent = handoff.scoring.percent_of_max,
            "Interview finalized"
        );

        self.session = InterviewSession::new(today());
        self.active.clear();
        self.set_screen(Screen::Start);

        Ok(Finalized {
            report_path,
            handoff,
        })
    }
}
