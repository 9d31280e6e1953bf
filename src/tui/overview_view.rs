//! Overview screen: headline figures from the live session.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::fields::*;
use crate::overview::Overview;
use crate::session::Session;
use crate::tui::colors::{column_color, record_status_color, DARK_GREEN, STEEL_BLUE};

pub fn render_overview(f: &mut Frame, area: Rect, session: &Session) {
    let o = Overview::compute(session);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[0]);
    let open_tasks: usize = o.open_tasks_by_assignee.values().sum();
    let figures = [
        ("Registros", o.records_total.to_string()),
        ("Aguardando revisão", o.awaiting_review().to_string()),
        ("Tarefas abertas", open_tasks.to_string()),
        ("Enviados nesta sessão", o.submissions.to_string()),
    ];
    for (i, (label, value)) in figures.into_iter().enumerate() {
        let card = Paragraph::new(Line::from(Span::styled(value, Style::default().add_modifier(Modifier::BOLD))))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(label).border_style(Style::default().fg(STEEL_BLUE)));
        f.render_widget(card, cards[i]);
    }

    let ratio = o.approval_rate.unwrap_or(0.0) / 100.0;
    let label = match o.approval_rate {
        Some(rate) => format!("{rate:.0}% aprovados"),
        None => "Sem registros".to_string(),
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Taxa de aprovação"))
        .gauge_style(Style::default().fg(DARK_GREEN).bg(Color::Black))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, chunks[1]);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    let mut left = vec![Line::from(Span::styled("Registros por status", Style::default().add_modifier(Modifier::BOLD)))];
    for (status, n) in o.records_by_status {
        left.push(Line::from(vec![
            Span::styled(format!("  {:<16}", format_record_status(status)), Style::default().fg(record_status_color(status))),
            Span::raw(n.to_string()),
        ]));
    }
    left.push(Line::from(""));
    left.push(Line::from(Span::styled("Tarefas por coluna", Style::default().add_modifier(Modifier::BOLD))));
    for (status, n) in o.tasks_by_column {
        left.push(Line::from(vec![
            Span::styled(format!("  {:<16}", format_task_status(status)), Style::default().fg(column_color(status))),
            Span::raw(n.to_string()),
        ]));
    }
    f.render_widget(Paragraph::new(left).block(Block::default().borders(Borders::ALL).title("Status")), panels[0]);

    let mut right = vec![Line::from(Span::styled("Tipos de aço", Style::default().add_modifier(Modifier::BOLD)))];
    for (steel, n) in &o.steel_types {
        right.push(Line::from(format!("  {steel:<16}{}", "█".repeat(*n))));
    }
    right.push(Line::from(""));
    right.push(Line::from(Span::styled("Tarefas abertas por responsável", Style::default().add_modifier(Modifier::BOLD))));
    for (who, n) in &o.open_tasks_by_assignee {
        right.push(Line::from(format!("  {who:<20}{n}")));
    }
    f.render_widget(Paragraph::new(right).block(Block::default().borders(Borders::ALL).title("Produção")), panels[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::seed::SeedData;

    #[test]
    fn test_render_overview_figures() {
        let session = Session::from_seed(SeedData::builtin().unwrap());
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render_overview(f, area, &session);
            })
            .unwrap();
        let text: String = terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("33% aprovados"));
        assert!(text.contains("Requer Revisão"));
        assert!(text.contains("316L"));
    }
}
