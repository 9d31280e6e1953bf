//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Presence, Priority, RecordStatus, TaskStatus};

/// Header and selection accent
pub const STEEL_BLUE: Color = Color::Rgb(30, 80, 140);
/// Focused field border
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Destructive dialogs and error notices
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Success notices
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);

pub fn priority_color(p: Priority) -> Color {
    match p {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

pub fn column_color(s: TaskStatus) -> Color {
    match s {
        TaskStatus::Todo => Color::Gray,
        TaskStatus::InProgress => Color::Blue,
        TaskStatus::Review => Color::Magenta,
        TaskStatus::Done => Color::Green,
    }
}

pub fn record_status_color(s: RecordStatus) -> Color {
    match s {
        RecordStatus::Pending => Color::Yellow,
        RecordStatus::Approved => Color::Green,
        RecordStatus::NeedsReview => Color::Red,
    }
}

pub fn presence_color(p: Presence) -> Color {
    match p {
        Presence::Online => Color::Green,
        Presence::Away => Color::Yellow,
        Presence::Offline => Color::DarkGray,
    }
}
