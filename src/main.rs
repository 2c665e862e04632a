use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use configurator::config::DEFAULT_CONFIG_FILE;
use configurator::tui::{self, App};
use configurator::{EditSession, EditorSettings, EmptyDirectoryPolicy, SaveMode};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(ClapParser, Debug)]
#[command(name = "configurator")]
#[command(version)]
#[command(about = "Edit a YAML configuration file in the terminal")]
struct Args {
    /// Configuration file to edit; the editor runs in its directory
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    file: PathBuf,

    /// Treat a bare destination filename as naming a missing directory
    /// (rejects every destination)
    #[arg(long)]
    strict_paths: bool,

    /// Save through a temporary file renamed over the destination
    #[arg(long)]
    atomic: bool,

    /// Write logs to this file (the terminal belongs to the editor)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    info!("Starting configurator v{}", env!("CARGO_PKG_VERSION"));

    let file = enter_file_directory(&args.file)?;
    let settings = EditorSettings {
        file,
        empty_directory_policy: if args.strict_paths {
            EmptyDirectoryPolicy::Strict
        } else {
            EmptyDirectoryPolicy::CurrentDirectory
        },
        save_mode: if args.atomic {
            SaveMode::Atomic
        } else {
            SaveMode::InPlace
        },
        ..Default::default()
    };
    info!("Settings: {:?}", settings);

    // A file that cannot be loaded ends the run before the terminal is touched
    let session = EditSession::initialize(&settings.file)
        .with_context(|| format!("failed to load {}", settings.file.display()))?
        .with_save_mode(settings.save_mode);

    tui::run(App::new(session, settings))
}

/// Install a file logger when requested; without one, events are dropped
fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Change into the directory holding `file` and return its bare name
///
/// Destination filenames entered in the editor may not contain path
/// separators, so the editor works relative to the file's own directory.
fn enter_file_directory(file: &Path) -> Result<PathBuf> {
    let name = file
        .file_name()
        .map(PathBuf::from)
        .with_context(|| format!("{} does not name a file", file.display()))?;

    if let Some(dir) = file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to enter directory {}", dir.display()))?;
        info!("Working directory: {:?}", dir);
    }

    Ok(name)
}
