//! sbi - structured behavioral interview scoring tool
//!
//! Runs a guided interview against a rubric, saves drafts, scores sessions
//! and exports final reports. Without a subcommand an interactive interview
//! is started.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sbi_cli::commands;
use sbi_cli::{Driver, RunSummary};
use sbi_common::config::{default_config_path, Settings};
use sbi_common::drafts::FsDraftStore;
use sbi_common::report::FsReportExporter;
use sbi_common::signals::SignalLibrary;
use sbi_common::{InterviewWizard, Rubric};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Command-line arguments for sbi
#[derive(Parser, Debug)]
#[command(name = "sbi")]
#[command(about = "Structured behavioral interview scoring tool")]
#[command(version)]
struct Args {
    /// Config file (default: platform config folder)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base folder for drafts and final reports
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Rubric JSON, overriding the config file
    #[arg(long, value_name = "FILE")]
    rubric: Option<PathBuf>,

    /// Disqualifier signal library JSON, overriding the config file
    #[arg(long, value_name = "FILE")]
    signals: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the rubric and report consistency warnings
    CheckRubric,
    /// List configured tracks
    Tracks,
    /// List the traits asked for a track, in order
    Traits {
        #[arg(long)]
        track: String,
        /// Include disqualifier signals for each question
        #[arg(long)]
        signals: bool,
    },
    /// Start a new interactive interview
    Interview,
    /// Resume a saved draft interactively
    Resume { draft: PathBuf },
    /// List saved drafts
    Drafts,
    /// Score a draft as it stands
    Score {
        draft: PathBuf,
        /// Print the scoring result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate, score and export a draft
    Finalize { draft: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::resolve(args.base_dir.as_deref(), args.config.as_deref())
        .context("Failed to resolve settings")?;

    let level = if args.verbose {
        "debug"
    } else {
        settings.logging.level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();

    info!(
        "Starting sbi v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    settings.log_source();
    info!("Base folder: {}", settings.base_dir.display());

    let rubric_path = args.rubric.clone().unwrap_or_else(|| settings.rubric_path.clone());
    let signals_path = args.signals.clone().unwrap_or_else(|| settings.signals_path.clone());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let command = args.command.unwrap_or(Command::Interview);
    if let Command::CheckRubric = command {
        commands::check_rubric(&rubric_path, &mut out)?;
        return Ok(());
    }

    let rubric = Rubric::load(&rubric_path)
        .with_context(|| format!("Failed to load rubric from {}", rubric_path.display()))?;
    let store = FsDraftStore::new(settings.drafts_dir());
    let exporter = FsReportExporter::new(settings.final_dir());

    match command {
        Command::CheckRubric => {}
        Command::Tracks => commands::list_tracks(&rubric, &mut out)?,
        Command::Traits { track, signals } => {
            let library = signals.then(|| SignalLibrary::load_or_empty(&signals_path));
            commands::list_traits(&rubric, &track, library.as_ref(), &mut out)?;
        }
        Command::Drafts => commands::list_drafts(&store, &mut out)?,
        Command::Score { draft, json } => {
            let path = commands::resolve_draft_path(&draft, store.dir());
            commands::score_draft(&rubric, &store, &path, json, &mut out)?;
        }
        Command::Finalize { draft } => {
            let path = commands::resolve_draft_path(&draft, store.dir());
            commands::finalize_draft(&rubric, &store, &exporter, &path, &mut out)?;
        }
        Command::Interview => {
            run_interactive(args.config.as_deref(), &settings, &rubric, &signals_path, None, &mut out)?
        }
        Command::Resume { draft } => {
            let path = commands::resolve_draft_path(&draft, store.dir());
            run_interactive(args.config.as_deref(), &settings, &rubric, &signals_path, Some(&path), &mut out)?
        }
    }

    out.flush()?;
    Ok(())
}

/// Run the interactive interview on stdin/stdout, optionally resuming a draft
fn run_interactive(
    config: Option<&Path>,
    settings: &Settings,
    rubric: &Rubric,
    signals_path: &Path,
    resume: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    settings
        .ensure_directories()
        .context("Failed to create drafts and final folders")?;
    let store = FsDraftStore::new(settings.drafts_dir());
    let exporter = FsReportExporter::new(settings.final_dir());
    let library = SignalLibrary::load_or_empty(signals_path);
    let mut wizard = InterviewWizard::new(rubric);

    if let Some(path) = resume {
        wizard
            .open_draft(&store, path)
            .with_context(|| format!("Failed to resume {}", path.display()))?;
    }

    let stdin = io::stdin();
    let summary = Driver::new(
        stdin.lock(),
        out,
        &store,
        &exporter,
        &library,
        settings.locations.clone(),
    )
    .run(&mut wizard)?;

    finish_interactive(config, settings, &summary);
    Ok(())
}

/// Log the run and remember any new locations in the config file
fn finish_interactive(config: Option<&Path>, settings: &Settings, summary: &RunSummary) {
    info!(
        drafts = summary.drafts_saved.len(),
        reports = summary.reports.len(),
        "Interview session ended"
    );
    if summary.added_locations.is_empty() {
        return;
    }

    let Some(target) = config.map(Path::to_path_buf).or_else(default_config_path) else {
        warn!("No config location available; new locations were not saved");
        return;
    };
    if let Err(e) = commands::save_locations(&target, settings, &summary.added_locations) {
        warn!("Could not save new locations to {}: {}", target.display(), e);
    }
}
