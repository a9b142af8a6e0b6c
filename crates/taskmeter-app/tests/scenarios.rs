#![allow(missing_docs)]

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use taskmeter_app::{
    AppConfig, Board, Confirm, Controller, FixedAnswer, Gesture, ImportPick, Redraw, load_pick,
};
use taskmeter_core::{Task, TaskId};
use taskmeter_store_fs::FileStore;
use tempfile::tempdir;

struct CountingYes(u8);

impl Confirm for CountingYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0 += 1;
        true
    }
}

fn open(dir: &Path) -> Result<Controller<FileStore>> {
    let config = AppConfig::default();
    let store = config.open_store(Some(dir))?;
    Ok(Controller::new(store, Duration::from_secs(30)))
}

fn snapshot(dir: &Path) -> Result<serde_json::Value> {
    let raw = fs::read_to_string(dir.join("task-progress-data.json"))?;
    Ok(serde_json::from_str(&raw)?)
}

fn create(ctrl: &mut Controller<FileStore>, name: &str, target: i64) -> Result<TaskId> {
    ctrl.dispatch(
        Gesture::Create {
            name: name.to_owned(),
            target: target.to_string(),
        },
        &mut FixedAnswer(false),
    )?;
    ctrl.store()
        .tasks()
        .last()
        .map(Task::id)
        .ok_or_else(|| anyhow::anyhow!("no task created"))
}

#[test]
fn progress_survives_restart() -> Result<()> {
    let dir = tempdir()?;
    let id = {
        let mut ctrl = open(dir.path())?;
        let id = create(&mut ctrl, "Read books", 10)?;
        for _ in 0..3 {
            ctrl.dispatch(Gesture::Increment(id), &mut FixedAnswer(false))?;
        }
        ctrl.shutdown()?;
        id
    };

    let ctrl = open(dir.path())?;
    let task = ctrl
        .store()
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("task lost on restart"))?;
    assert_eq!(task.current(), 3);
    assert_eq!(task.name(), "Read books");
    assert_eq!(snapshot(dir.path())?[0]["current"], 3);
    Ok(())
}

#[test]
fn order_survives_restart() -> Result<()> {
    let dir = tempdir()?;
    let mut ctrl = open(dir.path())?;
    let a = create(&mut ctrl, "a", 1)?;
    let b = create(&mut ctrl, "b", 1)?;
    let c = create(&mut ctrl, "c", 1)?;
    ctrl.dispatch(Gesture::Reorder(vec![c, a, b]), &mut FixedAnswer(false))?;
    drop(ctrl);

    let reopened = open(dir.path())?;
    let ids: Vec<TaskId> = reopened.store().tasks().iter().map(Task::id).collect();
    assert_eq!(ids, [c, a, b]);
    Ok(())
}

#[test]
fn corrupt_snapshot_starts_empty() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("task-progress-data.json"), "not json at all")?;
    let ctrl = open(dir.path())?;
    assert!(ctrl.store().is_empty());
    assert!(matches!(ctrl.board(), Board::Empty(_)));
    Ok(())
}

#[test]
fn out_of_range_snapshot_is_kept_aside_before_the_next_save() -> Result<()> {
    let dir = tempdir()?;
    let raw = r#"[{"id":1,"name":"Read books","target":10,"current":3},{"id":2,"name":"Run","target":5,"current":9}]"#;
    fs::write(dir.path().join("task-progress-data.json"), raw)?;

    let mut ctrl = open(dir.path())?;
    let warning = ctrl
        .take_load_warning()
        .ok_or_else(|| anyhow::anyhow!("load problem was not reported"))?;
    assert!(warning.to_string().contains("task-progress-data.corrupt"));
    assert_eq!(fs::read_to_string(dir.path().join("task-progress-data.corrupt.json"))?, raw);

    create(&mut ctrl, "Fresh", 2)?;
    ctrl.shutdown()?;
    assert_eq!(snapshot(dir.path())?[0]["name"], "Fresh");
    assert_eq!(fs::read_to_string(dir.path().join("task-progress-data.corrupt.json"))?, raw);
    Ok(())
}

#[test]
fn import_file_replaces_everything() -> Result<()> {
    let dir = tempdir()?;
    let import = dir.path().join("backup.json");
    fs::write(&import, r#"[{"id":1,"name":"A","target":5,"current":2}]"#)?;

    let mut ctrl = open(dir.path())?;
    create(&mut ctrl, "old", 2)?;
    let tasks = load_pick(ImportPick::Chosen(import))?.ok_or_else(|| anyhow::anyhow!("cancelled"))?;
    let outcome = ctrl.dispatch(Gesture::Import(tasks), &mut FixedAnswer(true))?;
    assert_eq!(outcome.redraw, Redraw::Full);

    assert_eq!(
        snapshot(dir.path())?,
        serde_json::json!([{ "id": 1, "name": "A", "target": 5, "current": 2 }])
    );
    let next = create(&mut ctrl, "new", 1)?;
    assert!(next.get() > 1);
    Ok(())
}

#[test]
fn invalid_import_changes_nothing() -> Result<()> {
    let dir = tempdir()?;
    let import = dir.path().join("bad.json");
    fs::write(
        &import,
        r#"[{"id":1,"name":"A","target":5,"current":2},{"id":2,"name":"B","target":"many","current":0}]"#,
    )?;

    let mut ctrl = open(dir.path())?;
    create(&mut ctrl, "keep", 2)?;
    let before = snapshot(dir.path())?;
    assert!(load_pick(ImportPick::Chosen(import)).is_err());
    assert_eq!(snapshot(dir.path())?, before);
    assert_eq!(ctrl.store().len(), 1);
    Ok(())
}

#[test]
fn export_then_import_round_trips() -> Result<()> {
    let dir = tempdir()?;
    let mut ctrl = open(dir.path())?;
    let a = create(&mut ctrl, "a", 4)?;
    create(&mut ctrl, "b", 9)?;
    ctrl.dispatch(Gesture::Step { id: a, delta: 3 }, &mut FixedAnswer(false))?;
    let export = ctrl.export(time::OffsetDateTime::now_utc().date())?;
    let exported = dir.path().join(&export.file_name);
    fs::write(&exported, &export.contents)?;

    let other = tempdir()?;
    let mut fresh = open(other.path())?;
    let tasks = load_pick(ImportPick::Chosen(exported))?.ok_or_else(|| anyhow::anyhow!("cancelled"))?;
    fresh.dispatch(Gesture::Import(tasks), &mut FixedAnswer(true))?;
    assert_eq!(fresh.store().tasks(), ctrl.store().tasks());
    Ok(())
}

#[test]
fn double_confirmed_clear_persists_empty_list() -> Result<()> {
    let dir = tempdir()?;
    let mut ctrl = open(dir.path())?;
    create(&mut ctrl, "a", 1)?;
    create(&mut ctrl, "b", 2)?;

    let mut gate = CountingYes(0);
    ctrl.dispatch(Gesture::ClearAll, &mut gate)?;
    assert_eq!(gate.0, 2);
    assert_eq!(snapshot(dir.path())?, serde_json::json!([]));
    Ok(())
}

#[test]
fn quota_failure_keeps_tasks_in_memory() -> Result<()> {
    let dir = tempdir()?;
    let mut config = AppConfig::default();
    config.storage.quota_bytes = 2;
    let mut ctrl = Controller::new(config.open_store(Some(dir.path()))?, Duration::from_secs(30));

    let outcome = ctrl.dispatch(
        Gesture::Create {
            name: "too big to save".to_owned(),
            target: "3".to_owned(),
        },
        &mut FixedAnswer(false),
    )?;
    assert!(outcome.warning.is_some());
    assert_eq!(ctrl.store().len(), 1);
    assert!(!dir.path().join("task-progress-data.json").exists());
    Ok(())
}
