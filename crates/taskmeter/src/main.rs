//! CLI entry point for taskmeter.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use taskmeter_app::{AppConfig, Controller, TaskStore};
use taskmeter_core::TaskId;
use taskmeter_store_fs::FileStore;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;
mod config;
mod tui;

/// Track progress toward numeric targets.
#[derive(Parser, Debug)]
#[command(
    name = "taskmeter",
    version,
    about = "taskmeter: named tasks with numeric targets, tracked from the terminal"
)]
struct Cli {
    /// Directory holding the task snapshot (overrides the config file).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a task with no progress.
    Add {
        #[arg(long)]
        name: String,
        /// Goal value, a whole number of at least 1.
        #[arg(long)]
        target: String,
    },

    /// Add progress to a task (clamped to its target).
    Inc {
        #[arg(long)]
        id: TaskId,
        #[arg(long, default_value_t = 1)]
        by: i64,
    },

    /// Remove progress from a task (clamped to zero).
    Dec {
        #[arg(long)]
        id: TaskId,
        #[arg(long, default_value_t = 1)]
        by: i64,
    },

    /// Change name, progress and target in one step.
    Edit {
        #[arg(long)]
        id: TaskId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        current: Option<String>,
        #[arg(long)]
        target: Option<String>,
    },

    /// Delete a task.
    Rm {
        #[arg(long)]
        id: TaskId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Rearrange tasks; ids not listed are dropped.
    Reorder {
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        ids: Vec<TaskId>,
    },

    /// List tasks in order.
    Ls {
        #[arg(long, value_enum, default_value_t = LsFormat::Text)]
        format: LsFormat,
    },

    /// Write every task to a dated JSON file.
    Export {
        /// Destination file (defaults to ./task-progress-data-<date>.json).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace every task with the contents of a JSON file.
    Import {
        path: PathBuf,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Delete every task.
    Clear {
        /// Skip both confirmation prompts.
        #[arg(long)]
        yes: bool,
    },

    /// Launch interactive terminal UI.
    Tui,

    /// Manage the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a configuration file with the defaults.
    Init {
        /// Output path (defaults to the platform config directory).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Overwrite an existing file without asking.
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LsFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let Cli { data_dir, config, cmd } = Cli::parse();

    if should_install_tracing(&cmd) {
        install_tracing();
    }

    execute_command(data_dir.as_deref(), config.as_deref(), cmd)
}

fn execute_command(data_dir: Option<&Path>, config_path: Option<&Path>, command: Command) -> Result<()> {
    match command {
        Command::Config {
            action: ConfigAction::Init { output, force },
        } => config::init_config(output.as_deref().or(config_path), force),
        Command::Tui => tui::run(open_controller(data_dir, config_path)?, config_path),
        other => {
            let mut controller = open_controller(data_dir, config_path)?;
            commands::run(other, &mut controller)
        }
    }
}

fn open_controller(data_dir: Option<&Path>, config_path: Option<&Path>) -> Result<Controller<FileStore>> {
    let app_config = AppConfig::load(config_path)?;
    let store: TaskStore<FileStore> = app_config.open_store(data_dir)?;
    Ok(Controller::new(store, app_config.autosave_interval()))
}

const fn should_install_tracing(cmd: &Command) -> bool {
    !matches!(cmd, Command::Tui)
}

fn install_tracing() {
    // RUST_LOG is honoured; INFO by default.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
