//! Enumerations for TUI state management.

use crate::policy::Action;

/// Top-level screens, in tab order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Overview,
    Records,
    SubmitShift,
    Kanban,
    Chat,
}

impl Screen {
    pub const ALL: [Screen; 5] =
        [Screen::Overview, Screen::Records, Screen::SubmitShift, Screen::Kanban, Screen::Chat];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Overview => "Visão Geral",
            Screen::Records => "Registros",
            Screen::SubmitShift => "Novo Registro",
            Screen::Kanban => "Kanban",
            Screen::Chat => "Chat",
        }
    }

    /// Capability a role needs for the tab to be shown at all.
    pub fn required_action(self) -> Option<Action> {
        match self {
            Screen::SubmitShift => Some(Action::SubmitShiftRecord),
            Screen::Chat => Some(Action::UseChat),
            Screen::Overview | Screen::Records | Screen::Kanban => None,
        }
    }
}

/// Whether a key press was consumed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyOutcome {
    /// The key was used.
    Handled,
    /// Nobody used the key; pass it on.
    Ignored,
}
