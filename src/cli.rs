use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::fields::Role;

/// Shift desk for the pickling line.
/// Every run starts from the built-in seed data, or from --seed.
#[derive(Parser)]
#[command(name = "shiftdesk", version, about = "Shift records, kanban board and team chat for a pickling line")]
pub struct Cli {
    /// JSON seed file replacing the built-in data set.
    #[arg(long, global = true)]
    pub seed: Option<PathBuf>,

    /// Acting role for read-only commands.
    #[arg(long, value_enum, global = true, default_value_t = Role::Operator)]
    pub role: Role,

    /// Log filter, e.g. "info" or "shiftdesk=debug". RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Write logs to this file while the UI is running.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
