//! Row codec for the `Goals` and `Tasks` sheets.
//!
//! The first columns of each sheet keep the legacy layout; the later ones
//! are optional on read so older workbooks still load. Columns are matched
//! by header name, ignoring case and surrounding whitespace.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use csv::{ByteRecord, ReaderBuilder, StringRecord, Writer};

use crate::goal::{
    domain::{
        Goal, GoalHierarchy, GoalId, GoalType, PersistedGoalData, PersistedTaskData, Task,
        TaskId, TaskPriority, TaskStatus,
    },
    ports::{GoalStoreError, GoalStoreResult, LoadWarning, LoadedGoals, Sheet},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

const GOAL_ID: &str = "goal id";
const GOAL_TITLE: &str = "title";
const GOAL_TYPE: &str = "type";
const TARGET_DATE: &str = "target date";
const PARENT_ID: &str = "parent id";
const DESCRIPTION: &str = "description";
const COMPLETED: &str = "completed";
const NOTES: &str = "notes";
const LAST_MODIFIED: &str = "last modified";

const TASK_ID: &str = "task id";
const OWNER_TITLE: &str = "goal title";
const PRIORITY: &str = "priority";
const DUE_DATE: &str = "due date";
const TASK_TITLE: &str = "title";
const STATUS: &str = "status";
const START_DATE: &str = "start date";
const COMPLETED_DATE: &str = "completed date";

const GOAL_HEADERS: [&str; 9] = [
    GOAL_ID,
    GOAL_TITLE,
    GOAL_TYPE,
    TARGET_DATE,
    PARENT_ID,
    DESCRIPTION,
    COMPLETED,
    NOTES,
    LAST_MODIFIED,
];
const GOAL_REQUIRED: [&str; 4] = [GOAL_ID, GOAL_TITLE, GOAL_TYPE, TARGET_DATE];

const TASK_HEADERS: [&str; 10] = [
    TASK_ID,
    OWNER_TITLE,
    DESCRIPTION,
    PRIORITY,
    DUE_DATE,
    COMPLETED,
    TASK_TITLE,
    STATUS,
    START_DATE,
    COMPLETED_DATE,
];
const TASK_REQUIRED: [&str; 6] = [TASK_ID, OWNER_TITLE, DESCRIPTION, PRIORITY, DUE_DATE, COMPLETED];

/// Serialises every goal, in pre-order, into the `Goals` sheet.
pub(super) fn encode_goals(hierarchy: &GoalHierarchy) -> GoalStoreResult<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer
        .write_record(GOAL_HEADERS)
        .map_err(GoalStoreError::persistence)?;
    for goal in hierarchy.flattened() {
        writer
            .write_record(goal_row(goal))
            .map_err(GoalStoreError::persistence)?;
    }
    writer
        .into_inner()
        .map_err(|err| GoalStoreError::persistence(err.into_error()))
}

/// Serialises every task, grouped by goal in pre-order, into the `Tasks`
/// sheet.
pub(super) fn encode_tasks(hierarchy: &GoalHierarchy) -> GoalStoreResult<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer
        .write_record(TASK_HEADERS)
        .map_err(GoalStoreError::persistence)?;
    for goal in hierarchy.flattened() {
        for task in goal.tasks() {
            writer
                .write_record(task_row(goal, task))
                .map_err(GoalStoreError::persistence)?;
        }
    }
    writer
        .into_inner()
        .map_err(|err| GoalStoreError::persistence(err.into_error()))
}

fn goal_row(goal: &Goal) -> [String; 9] {
    [
        goal.id().to_string(),
        goal.title().to_owned(),
        goal.goal_type().as_str().to_owned(),
        format_date(goal.target_date()),
        goal.parent().map(|id| id.to_string()).unwrap_or_default(),
        goal.description().unwrap_or_default().to_owned(),
        goal.is_completed().to_string(),
        goal.notes().to_owned(),
        goal.last_modified().to_rfc3339(),
    ]
}

fn task_row(goal: &Goal, task: &Task) -> [String; 10] {
    [
        task.id().to_string(),
        goal.title().to_owned(),
        task.description().unwrap_or_default().to_owned(),
        task.priority().as_str().to_owned(),
        format_date(task.due_date()),
        task.is_completed().to_string(),
        task.title().to_owned(),
        task.status().as_str().to_owned(),
        format_date(task.start_date()),
        format_date(task.completed_date()),
    ]
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|value| value.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Rebuilds a hierarchy from raw sheet bytes.
///
/// Rows that cannot be decoded, including rows that are not valid UTF-8,
/// are skipped with a warning. Tasks are attached to the first goal, in
/// sheet order, whose title matches their `goal title` cell.
pub(super) fn decode(
    goals_sheet: &[u8],
    tasks_sheet: Option<&[u8]>,
    fallback_modified: DateTime<Utc>,
) -> GoalStoreResult<LoadedGoals> {
    let mut warnings = Vec::new();
    let mut goal_rows = decode_goal_rows(goals_sheet, fallback_modified, &mut warnings)?;
    if let Some(bytes) = tasks_sheet {
        let task_rows = decode_task_rows(bytes, &mut warnings)?;
        attach_tasks(&mut goal_rows, task_rows, &mut warnings);
    }
    let hierarchy = link_goals(goal_rows, &mut warnings);
    Ok(LoadedGoals {
        hierarchy,
        warnings,
    })
}

struct Columns {
    sheet: Sheet,
    index: HashMap<String, usize>,
}

impl Columns {
    fn from_headers(
        sheet: Sheet,
        raw_headers: &ByteRecord,
        required: &[&'static str],
    ) -> GoalStoreResult<Self> {
        let headers = StringRecord::from_byte_record(raw_headers.clone())
            .map_err(GoalStoreError::persistence)?;
        let mut index = HashMap::new();
        for (position, name) in headers.iter().enumerate() {
            index
                .entry(name.trim().to_ascii_lowercase())
                .or_insert(position);
        }
        if let Some(column) = required
            .iter()
            .copied()
            .find(|column| !index.contains_key(*column))
        {
            return Err(GoalStoreError::MissingColumn { sheet, column });
        }
        Ok(Self { sheet, index })
    }

    /// Cell text as written; empty when the column or cell is absent.
    fn text<'r>(&self, record: &'r StringRecord, column: &str) -> &'r str {
        self.index
            .get(column)
            .and_then(|position| record.get(*position))
            .unwrap_or("")
    }

    /// Trimmed cell text, for ids, enums, dates and flags.
    fn cell<'r>(&self, record: &'r StringRecord, column: &str) -> &'r str {
        self.text(record, column).trim()
    }

    fn optional<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        Some(self.cell(record, column)).filter(|text| !text.is_empty())
    }

    /// Untrimmed free text, absent when blank.
    fn optional_text(&self, record: &StringRecord, column: &str) -> Option<String> {
        Some(self.text(record, column))
            .filter(|text| !text.trim().is_empty())
            .map(str::to_owned)
    }
}

struct GoalRow {
    row: usize,
    parent: Option<GoalId>,
    data: PersistedGoalData,
}

struct TaskRow {
    row: usize,
    owner_title: String,
    task: Task,
}

fn records(bytes: &[u8]) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(bytes)
}

fn utf8_record(record: csv::Result<ByteRecord>) -> Result<StringRecord, String> {
    let bytes = record.map_err(|err| err.to_string())?;
    StringRecord::from_byte_record(bytes).map_err(|err| format!("row is not valid UTF-8: {err}"))
}

fn decode_goal_rows(
    bytes: &[u8],
    fallback_modified: DateTime<Utc>,
    warnings: &mut Vec<LoadWarning>,
) -> GoalStoreResult<Vec<GoalRow>> {
    let mut reader = records(bytes);
    let headers = reader.byte_headers().map_err(GoalStoreError::persistence)?;
    let columns = Columns::from_headers(Sheet::Goals, headers, &GOAL_REQUIRED)?;
    let mut rows = Vec::new();
    for (offset, raw) in reader.byte_records().enumerate() {
        let row = offset + 1;
        let parsed = utf8_record(raw)
            .and_then(|record| parse_goal(&columns, &record, row, fallback_modified));
        match parsed {
            Ok(goal_row) => rows.push(goal_row),
            Err(reason) => warnings.push(LoadWarning::new(columns.sheet, row, reason)),
        }
    }
    Ok(rows)
}

fn parse_goal(
    columns: &Columns,
    record: &StringRecord,
    row: usize,
    fallback_modified: DateTime<Utc>,
) -> Result<GoalRow, String> {
    let id = parse_id::<GoalId>(columns.cell(record, GOAL_ID), GOAL_ID)?;
    let title = columns
        .optional(record, GOAL_TITLE)
        .ok_or_else(|| "goal title is empty".to_owned())?
        .to_owned();
    let goal_type =
        GoalType::try_from(columns.cell(record, GOAL_TYPE)).map_err(|err| err.to_string())?;
    let target_date = parse_date(columns.cell(record, TARGET_DATE), TARGET_DATE)?;
    let parent = columns
        .optional(record, PARENT_ID)
        .map(|text| parse_id::<GoalId>(text, PARENT_ID))
        .transpose()?;
    let completed = parse_flag(columns.cell(record, COMPLETED))?;
    let last_modified = match columns.optional(record, LAST_MODIFIED) {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .map(|stamp| stamp.with_timezone(&Utc))
            .map_err(|err| format!("invalid {LAST_MODIFIED} '{text}': {err}"))?,
        None => fallback_modified,
    };

    Ok(GoalRow {
        row,
        parent,
        data: PersistedGoalData {
            id,
            title,
            description: columns.optional_text(record, DESCRIPTION),
            goal_type,
            target_date,
            completed,
            notes: columns.text(record, NOTES).to_owned(),
            last_modified,
            tasks: Vec::new(),
        },
    })
}

fn decode_task_rows(
    bytes: &[u8],
    warnings: &mut Vec<LoadWarning>,
) -> GoalStoreResult<Vec<TaskRow>> {
    let mut reader = records(bytes);
    let headers = reader.byte_headers().map_err(GoalStoreError::persistence)?;
    let columns = Columns::from_headers(Sheet::Tasks, headers, &TASK_REQUIRED)?;
    let mut rows = Vec::new();
    for (offset, raw) in reader.byte_records().enumerate() {
        let row = offset + 1;
        let parsed = utf8_record(raw).and_then(|record| parse_task(&columns, &record, row));
        match parsed {
            Ok(task_row) => rows.push(task_row),
            Err(reason) => warnings.push(LoadWarning::new(columns.sheet, row, reason)),
        }
    }
    Ok(rows)
}

fn parse_task(columns: &Columns, record: &StringRecord, row: usize) -> Result<TaskRow, String> {
    let id = parse_id::<TaskId>(columns.cell(record, TASK_ID), TASK_ID)?;
    let owner_title = columns
        .optional(record, OWNER_TITLE)
        .ok_or_else(|| "owning goal title is empty".to_owned())?
        .to_owned();
    let description = columns.optional_text(record, DESCRIPTION);
    let title = columns
        .optional(record, TASK_TITLE)
        .or_else(|| description.as_deref().map(str::trim))
        .map(str::to_owned)
        .ok_or_else(|| "task has neither a title nor a description".to_owned())?;
    let priority =
        TaskPriority::try_from(columns.cell(record, PRIORITY)).map_err(|err| err.to_string())?;
    let status = match columns.optional(record, STATUS) {
        Some(text) => TaskStatus::try_from(text).map_err(|err| err.to_string())?,
        None if parse_flag(columns.cell(record, COMPLETED))? => TaskStatus::Done,
        None => TaskStatus::ToDo,
    };

    Ok(TaskRow {
        row,
        owner_title,
        task: Task::from_persisted(PersistedTaskData {
            id,
            title,
            description,
            priority,
            status,
            due_date: parse_date(columns.cell(record, DUE_DATE), DUE_DATE)?,
            start_date: parse_date(columns.cell(record, START_DATE), START_DATE)?,
            completed_date: parse_date(columns.cell(record, COMPLETED_DATE), COMPLETED_DATE)?,
        }),
    })
}

fn attach_tasks(goal_rows: &mut [GoalRow], task_rows: Vec<TaskRow>, warnings: &mut Vec<LoadWarning>) {
    let mut by_title: HashMap<String, usize> = HashMap::new();
    let mut ambiguous: HashSet<String> = HashSet::new();
    for (position, goal_row) in goal_rows.iter().enumerate() {
        match by_title.entry(goal_row.data.title.clone()) {
            Entry::Occupied(_) => {
                ambiguous.insert(goal_row.data.title.clone());
            }
            Entry::Vacant(slot) => {
                slot.insert(position);
            }
        }
    }

    let mut seen = HashSet::new();
    for TaskRow {
        row,
        owner_title,
        task,
    } in task_rows
    {
        if !seen.insert(task.id()) {
            warnings.push(LoadWarning::new(
                Sheet::Tasks,
                row,
                format!("duplicate task id {}", task.id()),
            ));
            continue;
        }
        let Some(goal_row) = by_title
            .get(&owner_title)
            .and_then(|position| goal_rows.get_mut(*position))
        else {
            warnings.push(LoadWarning::new(
                Sheet::Tasks,
                row,
                format!("no goal titled '{owner_title}'; task dropped"),
            ));
            continue;
        };
        if ambiguous.contains(&owner_title) {
            warnings.push(LoadWarning::new(
                Sheet::Tasks,
                row,
                format!("goal title '{owner_title}' is not unique; attached to the first match"),
            ));
        }
        goal_row.data.tasks.push(task);
    }
}

fn link_goals(goal_rows: Vec<GoalRow>, warnings: &mut Vec<LoadWarning>) -> GoalHierarchy {
    let mut hierarchy = GoalHierarchy::new();
    let mut links = Vec::new();
    for GoalRow { row, parent, data } in goal_rows {
        match hierarchy.insert_root(Goal::from_persisted(data)) {
            Ok(id) => {
                if let Some(parent_id) = parent {
                    links.push((row, parent_id, id));
                }
            }
            Err(err) => warnings.push(LoadWarning::new(Sheet::Goals, row, err.to_string())),
        }
    }
    for (row, parent, child) in links {
        if let Err(err) = hierarchy.add_child_goal(parent, child) {
            warnings.push(LoadWarning::new(
                Sheet::Goals,
                row,
                format!("{err}; kept as a root goal"),
            ));
        }
    }
    hierarchy
}

fn parse_id<T>(text: &str, column: &str) -> Result<T, String>
where
    T: std::str::FromStr<Err = uuid::Error>,
{
    text.parse::<T>()
        .map_err(|err| format!("invalid {column} '{text}': {err}"))
}

fn parse_date(text: &str, column: &str) -> Result<Option<NaiveDate>, String> {
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(Some)
        .map_err(|err| format!("invalid {column} '{text}': {err}"))
}

fn parse_flag(text: &str) -> Result<bool, String> {
    match text.to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "0" => Ok(false),
        "true" | "yes" | "1" => Ok(true),
        _ => Err(format!("invalid {COMPLETED} flag '{text}'")),
    }
}
