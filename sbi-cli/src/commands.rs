//! Non-interactive subcommands
//!
//! Each command writes human-readable output to `out` and returns an
//! `anyhow` error with context on failure.

use crate::render::CliFormatter;
use anyhow::{bail, Context, Result};
use sbi_common::config::{load_toml_config, write_toml_config, Settings};
use sbi_common::drafts::DraftStore;
use sbi_common::report::{ReportExporter, ReportHandoff};
use sbi_common::rubric::Rubric;
use sbi_common::scoring::evaluate;
use sbi_common::signals::SignalLibrary;
use sbi_common::{finalize, InterviewSession, ScoringResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load and validate a rubric file, then summarize it
pub fn check_rubric(path: &Path, out: &mut impl Write) -> Result<Rubric> {
    let rubric = Rubric::load(path)
        .with_context(|| format!("Rubric check failed for {}", path.display()))?;

    writeln!(
        out,
        "✓ Rubric OK: {} traits, {} tracks, {} absolute disqualifiers",
        rubric.traits.len(),
        rubric.tracks.len(),
        rubric.absolute_disqualifiers.len()
    )?;
    for warning in rubric.consistency_warnings() {
        writeln!(out, "⚠ {}", warning)?;
    }
    Ok(rubric)
}

pub fn list_tracks(rubric: &Rubric, out: &mut impl Write) -> Result<()> {
    write!(out, "{}", CliFormatter::format_tracks(rubric))?;
    Ok(())
}

/// Traits for a track in interview order, optionally with signal references
pub fn list_traits(
    rubric: &Rubric,
    track: &str,
    signals: Option<&SignalLibrary>,
    out: &mut impl Write,
) -> Result<()> {
    rubric.track(track)?;
    let traits = rubric.traits_for_track(track);
    if traits.is_empty() {
        writeln!(out, "Track '{}' has no applicable traits.", track)?;
        return Ok(());
    }

    for (i, t) in traits.iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {} ({}) [{}, x{}]",
            i + 1,
            t.name,
            t.id,
            t.priority,
            t.weight
        )?;
        writeln!(out, "    {}", t.primary_question)?;
        if let Some(question) = signals.and_then(|lib| lib.for_trait(&t.id)) {
            write!(out, "{}", CliFormatter::format_signals(question))?;
        }
    }
    Ok(())
}

/// Summary line for every saved draft
pub fn list_drafts(store: &dyn DraftStore, out: &mut impl Write) -> Result<()> {
    let drafts = store.list()?;
    if drafts.is_empty() {
        writeln!(out, "No drafts found.")?;
        return Ok(());
    }

    for path in drafts {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match store.load(&path) {
            Ok(session) => writeln!(
                out,
                "{}  {} / {} / {} (at trait {})",
                name,
                or_dash(&session.candidate.name),
                or_dash(&session.candidate.school),
                or_dash(&session.candidate.track),
                session.current_index
            )?,
            Err(e) => writeln!(out, "{}  (unreadable: {})", name, e)?,
        }
    }
    Ok(())
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Resolve a draft argument: as given, else relative to the drafts folder
pub fn resolve_draft_path(arg: &Path, drafts_dir: &Path) -> PathBuf {
    if arg.exists() || arg.is_absolute() {
        arg.to_path_buf()
    } else {
        drafts_dir.join(arg)
    }
}

fn score_session(rubric: &Rubric, session: &InterviewSession) -> Result<ScoringResult> {
    let Some(track) = session.track() else {
        bail!("Draft has no track selected; resume it to choose one");
    };
    Ok(evaluate(rubric, track, &session.trait_inputs)?)
}

/// Score a draft as it stands, without the finalization checks
pub fn score_draft(
    rubric: &Rubric,
    store: &dyn DraftStore,
    path: &Path,
    json: bool,
    out: &mut impl Write,
) -> Result<ScoringResult> {
    let session = store
        .load(path)
        .with_context(|| format!("Failed to open draft {}", path.display()))?;
    let result = score_session(rubric, &session)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        writeln!(
            out,
            "{} ({}, {})",
            or_dash(&session.candidate.name),
            session.candidate.interview_date,
            session.candidate.track
        )?;
        write!(out, "{}", CliFormatter::format_scoring(&result))?;
    }
    Ok(result)
}

/// Validate, score and export a draft in one step
pub fn finalize_draft(
    rubric: &Rubric,
    store: &dyn DraftStore,
    exporter: &dyn ReportExporter,
    path: &Path,
    out: &mut impl Write,
) -> Result<PathBuf> {
    let session = store
        .load(path)
        .with_context(|| format!("Failed to open draft {}", path.display()))?;

    finalize::validate(&session, rubric).context("Draft is not ready to finalize")?;
    let result = score_session(rubric, &session)?;
    let handoff = ReportHandoff::new(rubric, session, result);
    let report = exporter.export(rubric, &handoff)?;

    info!(draft = %path.display(), report = %report.display(), "Draft finalized");
    write!(out, "{}", CliFormatter::format_scoring(&handoff.scoring))?;
    writeln!(out, "✓ Report written to {}", report.display())?;
    Ok(report)
}

/// Merge new locations into the config file at `target`
///
/// An existing file keeps its other keys. A missing one is created from the
/// resolved settings.
pub fn save_locations(target: &Path, settings: &Settings, added: &[String]) -> Result<()> {
    let mut updated = settings.clone();
    for name in added {
        updated.add_location(name)?;
    }

    let config = if target.exists() {
        let mut existing = load_toml_config(target)?;
        existing.locations = Some(updated.locations);
        existing
    } else {
        updated.to_toml_config()
    };
    write_toml_config(&config, target)
        .with_context(|| format!("Failed to save locations to {}", target.display()))?;
    info!(config = %target.display(), added = added.len(), "Locations saved");
    Ok(())
}
