//! Command implementations for the CLI interface.
//!
//! Apart from `ui`, every command is read-only: it builds a session from the
//! seed, prints one view of it and exits. Table rendering lives in `render_*`
//! helpers so the printed text can be checked without a terminal.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use tracing::debug;

use crate::cli::Cli;
use crate::fields::*;
use crate::overview::Overview;
use crate::policy::{can_perform, Action};
use crate::record::ShiftRecord;
use crate::seed::SeedData;
use crate::session::{authenticate, Credentials, Session};
use crate::task::Task;
use crate::timer::LOGIN_DELAY;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive terminal UI.
    Ui,

    /// Print the kanban board.
    Board {
        /// Only print this column.
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
    },

    /// List shift records.
    Records {
        /// Filter by operator, steel type or date.
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one shift record with its comments.
    Record {
        /// Record ID.
        id: u64,
    },

    /// Print the dashboard figures.
    Overview,

    /// Print what each role may do.
    Roles,

    /// Check login credentials. The role comes from the global --role.
    Login {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Write the built-in seed data as JSON.
    Seed {
        /// Output file path.
        #[arg(long, short, default_value = "seed.json")]
        output: PathBuf,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Load the seed or exit with the error.
pub fn load_seed(path: Option<&Path>) -> SeedData {
    match SeedData::load_or_builtin(path) {
        Ok(seed) => seed,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Launch the terminal user interface.
pub fn cmd_ui(seed: SeedData) {
    if let Err(e) = run_tui(seed) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Print the board, optionally a single column.
pub fn cmd_board(session: &Session, status: Option<TaskStatus>) {
    let columns: Vec<TaskStatus> = match status {
        Some(s) => vec![s],
        None => TaskStatus::ALL.to_vec(),
    };
    for (i, s) in columns.iter().enumerate() {
        if i > 0 {
            println!();
        }
        for line in render_column(*s, &session.board.tasks_by_status(*s)) {
            println!("{line}");
        }
    }
}

/// Column heading plus one row per task.
pub fn render_column(status: TaskStatus, tasks: &[&Task]) -> Vec<String> {
    let mut lines = vec![format!("== {} ({}) ==", format_task_status(status), tasks.len())];
    if tasks.is_empty() {
        lines.push("  -".to_string());
    }
    for t in tasks {
        lines.push(format!(
            "  #{:<4} {:<6} {:<36} {:<16} by {}",
            t.id,
            format_priority(t.priority),
            truncate(&t.title, 36),
            truncate(&t.assignee, 16),
            t.created_by
        ));
    }
    lines
}

/// List records, filtered by `search`.
pub fn cmd_records(session: &Session, search: Option<String>) {
    let term = search.unwrap_or_default();
    let records = session.review.search(&term);
    for line in render_records(&records) {
        println!("{line}");
    }
}

/// Record table.
pub fn render_records(records: &[&ShiftRecord]) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<5} {:<11} {:<6} {:<14} {:<8} {:<15} {}",
        "ID", "Date", "Shift", "Operator", "Steel", "Status", "Comments"
    )];
    if records.is_empty() {
        lines.push("No records found".to_string());
    }
    for r in records {
        lines.push(format!(
            "{:<5} {:<11} {:<6} {:<14} {:<8} {:<15} {}",
            r.id,
            r.date,
            format_shift(r.shift),
            truncate(&r.operator, 14),
            truncate(&r.steel_type, 8),
            format_record_status(r.status),
            r.comments.len()
        ));
    }
    lines
}

/// Show a record in detail.
pub fn cmd_record(session: &Session, id: u64) {
    match session.review.get(id) {
        Some(record) => {
            for line in render_record(record) {
                println!("{line}");
            }
        }
        None => {
            eprintln!("Record {id} not found.");
            std::process::exit(1);
        }
    }
}

pub fn render_record(r: &ShiftRecord) -> Vec<String> {
    let mut lines = vec![
        format!("ID:          {}", r.id),
        format!("Date:        {}", r.date),
        format!("Shift:       {}", format_shift(r.shift)),
        format!("Operator:    {}", r.operator),
        format!("Steel type:  {}", r.steel_type),
        format!("Status:      {}", format_record_status(r.status)),
        String::new(),
        "Comments:".to_string(),
    ];
    if r.comments.is_empty() {
        lines.push("  No comments yet".to_string());
    }
    for c in &r.comments {
        lines.push(format!("  [{}] {} ({}) {}", c.id, c.author, format_role(c.role), c.timestamp));
        lines.push(format!("      {}", c.text));
    }
    lines
}

/// Print dashboard figures.
pub fn cmd_overview(session: &Session) {
    for line in render_overview(&Overview::compute(session)) {
        println!("{line}");
    }
}

pub fn render_overview(o: &Overview) -> Vec<String> {
    let rate = o
        .approval_rate
        .map(|r| format!("{r:.0}%"))
        .unwrap_or_else(|| "-".to_string());
    let mut lines = vec![
        format!("Shift records:     {}", o.records_total),
        format!("Approved:          {rate}"),
        format!("Awaiting review:   {}", o.awaiting_review()),
        format!("Submitted today:   {}", o.submissions),
        String::new(),
        "Records by status:".to_string(),
    ];
    for (s, n) in &o.records_by_status {
        lines.push(format!("  {:<16} {}", format_record_status(*s), n));
    }
    lines.push("Tasks by column:".to_string());
    for (s, n) in &o.tasks_by_column {
        lines.push(format!("  {:<16} {}", format_task_status(*s), n));
    }
    lines.push("Steel types:".to_string());
    for (steel, n) in &o.steel_types {
        lines.push(format!("  {:<16} {}", truncate(steel, 16), n));
    }
    lines.push("Open tasks by assignee:".to_string());
    for (who, n) in &o.open_tasks_by_assignee {
        lines.push(format!("  {:<16} {}", truncate(who, 16), n));
    }
    lines
}

/// Print the capability matrix, marking the acting role.
pub fn cmd_roles(acting: Role) {
    for line in render_roles(acting) {
        println!("{line}");
    }
}

pub fn render_roles(acting: Role) -> Vec<String> {
    let mut header = format!("{:<24}", "Action");
    for role in Role::ALL {
        let name = format_role(role);
        let marked = if role == acting { format!("*{name}") } else { name.to_string() };
        header.push_str(&format!(" {marked:<12}"));
    }
    let mut lines = vec![header.trim_end().to_string()];
    for action in Action::ALL {
        let mut row = format!("{:<24}", action.to_string());
        for role in Role::ALL {
            let mark = if can_perform(role, action) { "yes" } else { "-" };
            row.push_str(&format!(" {mark:<12}"));
        }
        lines.push(row.trim_end().to_string());
    }
    lines
}

/// Check credentials after the simulated delay.
pub fn cmd_login(name: String, email: String, role: Role, password: String) {
    std::thread::sleep(LOGIN_DELAY);
    match authenticate(Credentials { name, email, role, password }) {
        Ok(user) => println!("Logged in as {} <{}> ({})", user.name, user.email, format_role(user.role)),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Write the built-in seed so it can be edited and passed back via --seed.
pub fn cmd_seed(output: &Path) {
    let result = SeedData::builtin().and_then(|seed| seed.write(output));
    match result {
        Ok(()) => {
            debug!(path = %output.display(), "seed written");
            println!("Wrote seed data to {}", output.display());
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::from_seed(SeedData::builtin().unwrap())
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Abner", 14), "Abner");
        assert_eq!(truncate("Calibração dos sensores", 6), "Calib…");
    }

    #[test]
    fn test_render_column_lists_tasks() {
        let s = session();
        let lines = render_column(TaskStatus::Done, &s.board.tasks_by_status(TaskStatus::Done));
        assert_eq!(lines[0], "== Concluído (1) ==");
        assert!(lines[1].contains("#4"));
        assert!(lines[1].contains("Roberto Almeida"));
    }

    #[test]
    fn test_render_empty_column() {
        let lines = render_column(TaskStatus::Review, &[]);
        assert_eq!(lines, vec!["== Em Revisão (0) ==".to_string(), "  -".to_string()]);
    }

    #[test]
    fn test_render_filtered_records() {
        let s = session();
        let lines = render_records(&s.review.search("316L"));
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("2 "));
        assert!(lines[1].contains("Requer Revisão"));
    }

    #[test]
    fn test_render_no_records() {
        let lines = render_records(&[]);
        assert_eq!(lines.last().unwrap(), "No records found");
    }

    #[test]
    fn test_render_record_with_comments() {
        let s = session();
        let lines = render_record(s.review.get(1).unwrap());
        assert!(lines.iter().any(|l| l.contains("Ana Márcia (Engenheiro)")));
        let lines = render_record(s.review.get(3).unwrap());
        assert!(lines.iter().any(|l| l.contains("No comments yet")));
    }

    #[test]
    fn test_render_roles_marks_acting_role() {
        let lines = render_roles(Role::Manager);
        assert!(lines[0].contains("*Gerente"));
        let status_row = lines.iter().find(|l| l.starts_with("change record status")).unwrap();
        assert_eq!(status_row.matches("yes").count(), 2);
    }

    #[test]
    fn test_render_overview() {
        let lines = render_overview(&Overview::compute(&session()));
        assert!(lines.contains(&"Approved:          33%".to_string()));
        assert!(lines.contains(&"Awaiting review:   2".to_string()));
    }
}
