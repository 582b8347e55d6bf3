//! Command implementations for the CLI interface.
//!
//! Each handler works against a store that `main` has already built and
//! cold-started, and reports problems as a message for `main` to print.

use clap::Subcommand;
use clap_complete::{generate, Shell};
use chrono::{Local, NaiveDate};

use tasks_hub::config::HubConfig;
use tasks_hub::display::*;
use tasks_hub::enhance::{local_id_now, LocalDraft};
use tasks_hub::fields::{SortOrder, Status};
use tasks_hub::gateway::TaskGateway;
use tasks_hub::query::TaskQuery;
use tasks_hub::store::{AddOrigin, TaskStore};
use tasks_hub::task::{TaskId, TaskPatch};

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks with optional search, filter and sort.
    List {
        /// Only this column.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Order by end date.
        #[arg(long, value_enum, default_value_t = SortOrder::Newest)]
        sort: SortOrder,
        /// Case-insensitive title search.
        #[arg(long)]
        search: Option<String>,
        /// Group rows by status column.
        #[arg(long)]
        group: bool,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by ID or title.
    View {
        /// Task ID or title to view
        id: String,
    },

    /// Add a task to a column.
    Add {
        /// Short title for the task.
        title: String,
        /// Longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Column to place the task in.
        #[arg(long, value_enum, default_value_t = Status::Todo)]
        status: Status,
        /// Start date: YYYY-MM-DD, "today", "tomorrow", "in Nd", weekday. Defaults to today.
        #[arg(long)]
        start: Option<String>,
        /// End date, same forms as --start. Defaults to the start date.
        #[arg(long)]
        end: Option<String>,
        /// Keep the task on this machine only; the API is never called for it.
        #[arg(long)]
        local: bool,
    },

    /// Update fields on a task.
    Update {
        /// Task ID or title to update
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Move to another column.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Mark completed.
        #[arg(long, conflicts_with = "undone")]
        done: bool,
        /// Mark not completed.
        #[arg(long)]
        undone: bool,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },

    /// Delete a task by ID or title.
    Delete {
        /// Task ID or title to delete
        id: String,
    },

    /// Fetch a single record straight from the API.
    Remote {
        id: TaskId,
    },

    /// Forget cached tasks and local ids; the next command reloads from the API.
    Reset,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_date_arg(flag: &str, value: &str) -> Result<NaiveDate, String> {
    parse_date_input(value).ok_or_else(|| format!("Could not understand --{flag} '{value}'"))
}

fn parse_optional_date(flag: &str, value: Option<String>) -> Result<Option<NaiveDate>, String> {
    value.map(|v| parse_date_arg(flag, &v)).transpose()
}

/// List tasks with optional filtering and sorting.
pub fn cmd_list<G: TaskGateway>(
    store: &TaskStore<G>,
    status: Option<Status>,
    sort: SortOrder,
    search: Option<String>,
    group: bool,
    limit: Option<usize>,
) -> Result<(), String> {
    let tasks = store.tasks();
    let query = TaskQuery { search, status: status.into(), sort };
    let limit = limit.unwrap_or(usize::MAX);

    if group {
        for (status, column) in query.grouped(&tasks) {
            print_group_heading(status, column.len());
            let shown: Vec<_> = column.into_iter().take(limit).collect();
            if !shown.is_empty() {
                print_table(&shown, |id| store.is_local(id));
            }
        }
        return Ok(());
    }

    let rows: Vec<_> = query.apply(&tasks).into_iter().take(limit).collect();
    if rows.is_empty() {
        println!("No tasks.");
        return Ok(());
    }
    print_table(&rows, |id| store.is_local(id));
    Ok(())
}

/// Show every field of one task.
pub fn cmd_view<G: TaskGateway>(store: &TaskStore<G>, config: &HubConfig, id: String) -> Result<(), String> {
    let tasks = store.tasks();
    let id = resolve_task_identifier(&id, &tasks)?;
    let t = store.get(id).ok_or_else(|| format!("Task with ID {id} not found"))?;
    let today = Local::now().date_naive();

    println!("ID:          {}{}", t.id, if store.is_local(t.id) { " (local)" } else { "" });
    println!("Title:       {}", t.title);
    println!("Status:      {}", t.status);
    println!("Completed:   {}", if t.completed { "yes" } else { "no" });
    println!("Owner:       {}", t.user_id);
    println!("Description: {}", t.description);
    println!("Start:       {}", format_long_date(t.start_date, config.locale));
    println!("End:         {} ({})", format_long_date(t.end_date, config.locale), format_relative(t.end_date, today));
    println!("Comments:    {}", t.comments);
    println!("Attachments: {}", t.attachments);
    println!("Checklist:   {}", format_checklist(&t));
    let avatars: Vec<String> = t.avatars.iter().map(|a| a.to_string()).collect();
    println!("Avatars:     {}", avatars.join(", "));
    Ok(())
}

/// Add a new task.
pub async fn cmd_add<G: TaskGateway>(
    store: &mut TaskStore<G>,
    title: String,
    desc: Option<String>,
    status: Status,
    start: Option<String>,
    end: Option<String>,
    local: bool,
) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title cannot be empty".into());
    }
    let start_date = parse_optional_date("start", start)?.unwrap_or_else(|| Local::now().date_naive());
    let end_date = parse_optional_date("end", end)?.unwrap_or(start_date);
    if end_date < start_date {
        return Err("End date cannot be before start date".into());
    }

    let draft = LocalDraft {
        title: title.trim().to_string(),
        description: desc.unwrap_or_default(),
        status,
        start_date,
        end_date,
    };
    let task = store.enhancer().draft_local(draft, local_id_now());
    let origin = if local { AddOrigin::Local } else { AddOrigin::Remote };

    let id = store.add_task(task, origin).await.map_err(|e| format!("Failed to add task: {e}"))?;
    println!("Added task {id}{}", if store.is_local(id) { " (local)" } else { "" });
    Ok(())
}

/// Update fields on a task.
#[allow(clippy::too_many_arguments)]
pub async fn cmd_update<G: TaskGateway>(
    store: &mut TaskStore<G>,
    id: String,
    title: Option<String>,
    desc: Option<String>,
    status: Option<Status>,
    done: bool,
    undone: bool,
    start: Option<String>,
    end: Option<String>,
) -> Result<(), String> {
    let id = resolve_task_identifier(&id, &store.tasks())?;
    let patch = update_patch(title, desc, status, done, undone, start, end)?;

    store.update_task(id, patch).await.map_err(|e| format!("Failed to update task {id}: {e}"))?;
    println!("Updated task {id}");
    Ok(())
}

/// Fields for `update`. Moving to a column sets `completed` to match it
/// unless `--done` or `--undone` says otherwise.
fn update_patch(
    title: Option<String>,
    desc: Option<String>,
    status: Option<Status>,
    done: bool,
    undone: bool,
    start: Option<String>,
    end: Option<String>,
) -> Result<TaskPatch, String> {
    let completed = match (done, undone) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => status.map(Status::is_completed),
    };
    let patch = TaskPatch {
        title,
        description: desc,
        completed,
        status,
        start_date: parse_optional_date("start", start)?,
        end_date: parse_optional_date("end", end)?,
    };
    if patch.is_empty() {
        return Err("Nothing to update".into());
    }
    Ok(patch)
}

/// Delete a task.
pub async fn cmd_delete<G: TaskGateway>(store: &mut TaskStore<G>, id: String) -> Result<(), String> {
    let id = resolve_task_identifier(&id, &store.tasks())?;
    store.delete_task(id).await.map_err(|e| format!("Failed to delete task {id}: {e}"))?;
    println!("Deleted task {id}");
    Ok(())
}

/// Print a record as the API has it, without touching the store.
pub async fn cmd_remote<G: TaskGateway>(store: &TaskStore<G>, id: TaskId) -> Result<(), String> {
    let task = store.gateway().get_by_id(id).await.map_err(|e| format!("Failed to fetch todo {id}: {e}"))?;
    println!("ID:        {}", task.id);
    println!("Title:     {}", task.title);
    println!("Completed: {}", if task.completed { "yes" } else { "no" });
    println!("Owner:     {}", task.user_id);
    Ok(())
}

/// Drop cached state so the next run reloads from the API.
pub fn cmd_reset<G: TaskGateway>(store: &mut TaskStore<G>, config: &HubConfig) -> Result<(), String> {
    store.reset();
    println!("Cleared cached tasks in {}", config.data_dir.display());
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
