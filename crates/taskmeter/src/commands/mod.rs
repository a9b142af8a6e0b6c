use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use taskmeter_app::{Board, Confirm, Controller, FixedAnswer, Gesture, ImportPick, Outcome, SnapshotStorage, load_pick};
use taskmeter_core::{Task, TaskId};
use time::OffsetDateTime;
use tracing::warn;

use crate::{Command, LsFormat};

/// Run a one-shot CLI command against `controller`.
///
/// Mutating commands flush the store once more before returning; `ls` and
/// `export` leave the snapshot file untouched.
pub fn run<S: SnapshotStorage>(command: Command, controller: &mut Controller<S>) -> Result<()> {
    report_load_problem(controller, &mut io::stderr())?;
    let mutating = mutates(&command);
    let mut confirm: Box<dyn Confirm> = if assumes_yes(&command) {
        Box::new(FixedAnswer(true))
    } else {
        Box::new(PromptConfirm::new(io::stdin().lock(), io::stdout()))
    };

    execute(command, controller, confirm.as_mut(), &mut io::stdout())?;

    if mutating {
        controller.shutdown().context("failed to save tasks")?;
    }
    Ok(())
}

/// Print the reason the saved tasks could not be used, once, before the
/// command runs.
fn report_load_problem<S: SnapshotStorage>(controller: &mut Controller<S>, err: &mut dyn Write) -> Result<()> {
    if let Some(problem) = controller.take_load_warning() {
        writeln!(err, "warning: {problem}")?;
    }
    Ok(())
}

const fn mutates(command: &Command) -> bool {
    !matches!(command, Command::Ls { .. } | Command::Export { .. })
}

const fn assumes_yes(command: &Command) -> bool {
    matches!(
        command,
        Command::Rm { yes: true, .. } | Command::Import { yes: true, .. } | Command::Clear { yes: true }
    )
}

fn execute<S: SnapshotStorage>(
    command: Command,
    controller: &mut Controller<S>,
    confirm: &mut dyn Confirm,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Add { name, target } => {
            let outcome = controller.dispatch(Gesture::Create { name, target }, confirm)?;
            report(&outcome, out)?;
            if let Some(task) = controller.store().tasks().last() {
                writeln!(out, "created task: {}", task.id())?;
            }
        }
        Command::Inc { id, by } => {
            require(controller, id)?;
            let outcome = controller.dispatch(Gesture::Step { id, delta: by }, confirm)?;
            report(&outcome, out)?;
            print_task(controller, id, out)?;
        }
        Command::Dec { id, by } => {
            require(controller, id)?;
            let delta = by.saturating_neg();
            let outcome = controller.dispatch(Gesture::Step { id, delta }, confirm)?;
            report(&outcome, out)?;
            print_task(controller, id, out)?;
        }
        Command::Edit {
            id,
            name,
            current,
            target,
        } => {
            let task = require(controller, id)?;
            let gesture = Gesture::Edit {
                id,
                name: name.unwrap_or_else(|| task.name().to_owned()),
                current: current.unwrap_or_else(|| task.current().to_string()),
                target: target.unwrap_or_else(|| task.target().to_string()),
            };
            let outcome = controller.dispatch(gesture, confirm)?;
            report(&outcome, out)?;
            print_task(controller, id, out)?;
        }
        Command::Rm { id, .. } => {
            require(controller, id)?;
            let outcome = controller.dispatch(Gesture::Delete(id), confirm)?;
            report(&outcome, out)?;
        }
        Command::Reorder { ids } => {
            let outcome = controller.dispatch(Gesture::Reorder(ids), confirm)?;
            report(&outcome, out)?;
            render_board(controller.board(), out)?;
        }
        Command::Ls { format } => match format {
            LsFormat::Text => render_board(controller.board(), out)?,
            LsFormat::Json => writeln!(out, "{}", controller.store().export_all()?)?,
        },
        Command::Export { out: destination } => {
            let export = controller.export(OffsetDateTime::now_utc().date())?;
            let path = destination.unwrap_or_else(|| PathBuf::from(&export.file_name));
            fs::write(&path, &export.contents)
                .with_context(|| format!("failed to write export file: {}", path.display()))?;
            writeln!(
                out,
                "exported {} tasks to {}",
                controller.store().len(),
                path.display()
            )?;
        }
        Command::Import { path, .. } => {
            let display = path.display().to_string();
            let Some(tasks) =
                load_pick(ImportPick::Chosen(path)).with_context(|| format!("failed to import {display}"))?
            else {
                return Ok(());
            };
            let outcome = controller.dispatch(Gesture::Import(tasks), confirm)?;
            report(&outcome, out)?;
        }
        Command::Clear { .. } => {
            let outcome = controller.dispatch(Gesture::ClearAll, confirm)?;
            report(&outcome, out)?;
        }
        Command::Tui | Command::Config { .. } => unreachable!("Unhandled command routed to commands::run"),
    }

    Ok(())
}

fn require<S: SnapshotStorage>(controller: &Controller<S>, id: TaskId) -> Result<Task> {
    match controller.store().get(id) {
        Some(task) => Ok(task.clone()),
        None => bail!("task {id} not found"),
    }
}

fn report(outcome: &Outcome, out: &mut dyn Write) -> Result<()> {
    if let Some(notice) = &outcome.notice {
        writeln!(out, "{notice}")?;
    }
    if let Some(warning) = &outcome.warning {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

fn print_task<S: SnapshotStorage>(controller: &Controller<S>, id: TaskId, out: &mut dyn Write) -> Result<()> {
    if let Some(card) = controller.board().cards().iter().find(|card| card.id == id) {
        writeln!(out, "{} | {} | {}", card.id, card.progress_label(), card.name)?;
    }
    Ok(())
}

fn render_board(board: &Board, out: &mut dyn Write) -> Result<()> {
    match board {
        Board::Empty(empty) => {
            writeln!(out, "{}", empty.title)?;
            writeln!(out, "{}", empty.hint)?;
        }
        Board::Cards(cards) => {
            writeln!(out, "ID | Progress | Name")?;
            writeln!(out, "-- | -------- | ----")?;
            for card in cards {
                let done = if card.complete { " ✓" } else { "" };
                writeln!(out, "{} | {}{} | {}", card.id, card.progress_label(), done, card.name)?;
            }
        }
    }
    Ok(())
}

/// `[y/N]` prompt on a line-based terminal.
struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> io::Result<bool> {
        write!(self.output, "{prompt} [y/N]: ")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.ask(prompt).unwrap_or_else(|err| {
            warn!(error = %err, "Failed to read confirmation; treating as no");
            false
        })
    }
}
