//! # shiftdesk - Pickling line shift desk
//!
//! A terminal dashboard for the pickling line: operators log their shift,
//! engineers and managers review the logged records, and everyone shares a
//! kanban board and a team chat.
//!
//! ## Key Features
//!
//! - **Kanban Board**: Four columns (A Fazer, Em Progresso, Em Revisão, Concluído);
//!   cards are created, edited, deleted and carried between columns
//! - **Shift Record Review**: Search by operator, steel type or date, comment
//!   threads, and status changes for engineers and managers
//! - **Shift Submission**: The full chemical and electrolytic pickling form
//! - **Team Chat**: Contacts with presence and a simulated reply
//! - **Role Capabilities**: One policy table decides what each role may do
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the dashboard (log in with password 123456)
//! shiftdesk ui
//!
//! # Print the board as an engineer would see it
//! shiftdesk board --role engineer
//!
//! # Find records for a steel type
//! shiftdesk records --search 316L
//! ```
//!
//! Nothing is persisted. Every run starts from the built-in seed data, or from
//! the file given with `--seed` (write a starting point with `shiftdesk seed`).

use clap::Parser;

pub mod board;
pub mod chat;
pub mod cli;
pub mod cmd;
pub mod error;
pub mod fields;
pub mod logging;
pub mod overview;
pub mod policy;
pub mod record;
pub mod review;
pub mod seed;
pub mod session;
pub mod shift_form;
pub mod task;
pub mod timer;
pub mod tui {
    pub mod app;
    pub mod board_view;
    pub mod chat_view;
    pub mod colors;
    pub mod enums;
    pub mod form_view;
    pub mod input;
    pub mod login;
    pub mod overview_view;
    pub mod records_view;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use logging::{init_tracing, LogTarget};
use policy::role_signature;
use session::{Session, User};

fn main() {
    let cli = Cli::parse();

    let target = match (&cli.command, cli.log_file.as_deref()) {
        (Commands::Ui, Some(path)) => LogTarget::File(path),
        (Commands::Ui, None) => LogTarget::Discard,
        _ => LogTarget::Stderr,
    };
    let _guard = match init_tracing(&cli.log_level, target) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Commands that don't read the seed
    match &cli.command {
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            return;
        }
        Commands::Seed { output } => {
            cmd_seed(output);
            return;
        }
        Commands::Roles => {
            cmd_roles(cli.role);
            return;
        }
        _ => {}
    }

    let seed = load_seed(cli.seed.as_deref());

    // Read-only views act as the --role signature holder
    let viewer = User {
        name: role_signature(cli.role).to_string(),
        email: String::new(),
        role: cli.role,
    };

    match cli.command {
        Commands::Ui => cmd_ui(seed),
        Commands::Board { status } => cmd_board(&Session::with_user(seed, viewer), status),
        Commands::Records { search } => cmd_records(&Session::with_user(seed, viewer), search),
        Commands::Record { id } => cmd_record(&Session::with_user(seed, viewer), id),
        Commands::Overview => cmd_overview(&Session::with_user(seed, viewer)),
        Commands::Login { name, email, password } => cmd_login(name, email, cli.role, password),
        Commands::Roles | Commands::Seed { .. } | Commands::Completions { .. } => {
            unreachable!("handled above")
        }
    }
}
