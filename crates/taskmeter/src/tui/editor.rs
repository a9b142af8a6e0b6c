use taskmeter_core::Task;

/// Fields read back from the task editor. Numbers stay as typed so the
/// controller can report exactly what was wrong with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct TaskForm {
    pub(super) name: String,
    pub(super) current: Option<String>,
    pub(super) target: String,
}

pub(super) fn new_task_editor_template() -> String {
    [
        "# Create a new task.",
        "# target must be a whole number of at least 1.",
        "# Saving with an empty name cancels.",
        "name: ",
        "target: ",
        "",
    ]
    .join("\n")
}

pub(super) fn edit_task_editor_template(task: &Task) -> String {
    [
        "# Edit the selected task.".to_owned(),
        "# current must stay between 0 and target.".to_owned(),
        "# Saving with an empty name cancels.".to_owned(),
        format!("name: {}", task.name()),
        format!("current: {}", task.current()),
        format!("target: {}", task.target()),
        String::new(),
    ]
    .join("\n")
}

pub(super) fn import_path_template() -> String {
    [
        "# Enter the path of a JSON file to import.",
        "# Every current task is replaced after confirmation.",
        "# Saving without a path cancels.",
        "",
    ]
    .join("\n")
}

pub(super) fn parse_task_editor_output(raw: &str) -> Result<Option<TaskForm>, String> {
    let mut name: Option<&str> = None;
    let mut current: Option<&str> = None;
    let mut target: Option<&str> = None;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once(':') else {
            return Err(format!("malformed line: {trimmed}"));
        };
        let value = value.trim();
        match key.trim() {
            "name" => name = Some(value),
            "current" => current = Some(value),
            "target" => target = Some(value),
            unknown => return Err(format!("unknown field: {unknown}")),
        }
    }

    let name = name.unwrap_or("");
    if name.is_empty() {
        return Ok(None);
    }

    Ok(Some(TaskForm {
        name: name.to_owned(),
        current: current.map(str::to_owned),
        target: target.unwrap_or("").to_owned(),
    }))
}
