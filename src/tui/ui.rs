//! UI rendering for the TUI.

use super::app::App;
use super::focus::Panel;
use super::modal::Modal;
use crate::session::PortMode;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};

/// Set up the terminal for TUI rendering.
pub fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to normal mode.
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn mode_tag(mode: PortMode) -> &'static str {
    match mode {
        PortMode::Hex => "HEX",
        PortMode::Raw => "RAW",
    }
}

/// Render the entire UI.
pub fn render(app: &App, frame: &mut Frame) {
    let size = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(1)])
        .split(size);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(22), Constraint::Percentage(78)])
        .split(rows[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(5)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(columns[1]);

    render_settings(app, frame, left[0]);
    render_switch(app, frame, left[1]);
    render_display(app, frame, right[0]);
    render_input(app, frame, right[1]);
    render_footer(app, frame, rows[1]);

    match app.modal.current() {
        Some(Modal::OptionPicker { .. }) => render_picker(app, frame, size),
        Some(Modal::ErrorDialog { .. }) => render_error(app, frame, size),
        None => {}
    }
}

fn panel_border(app: &App, panel: Panel) -> Style {
    if !app.modal.is_open() && app.focus.active() == panel {
        Style::default().fg(app.theme.accent)
    } else {
        Style::default().fg(app.theme.border)
    }
}

fn render_settings(app: &App, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = app
        .registry
        .summary()
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let style = if i == app.selected_setting {
                Style::default()
                    .fg(app.theme.fg)
                    .bg(app.theme.selection)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.fg)
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(panel_border(app, Panel::Settings))
            .title(" Settings "),
    );
    frame.render_widget(list, area);
}

fn render_switch(app: &App, frame: &mut Frame, area: Rect) {
    let (label, color) = if app.session_active() {
        ("RUNNING", app.theme.ok)
    } else {
        ("STOPPED", app.theme.error)
    };

    let body = Paragraph::new(Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(panel_border(app, Panel::Switch))
            .title(" Switch "),
    );
    frame.render_widget(body, area);
}

fn render_display(app: &App, frame: &mut Frame, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let end = app.display.len().saturating_sub(app.scroll_offset);
    let start = end.saturating_sub(height);

    let lines: Vec<Line> = app
        .display
        .iter()
        .skip(start)
        .take(end - start)
        .map(|l| Line::from(l.as_str()))
        .collect();

    let title = format!(" Display ({}) ", mode_tag(app.display_mode_tag()));
    let body = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.fg))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(panel_border(app, Panel::Display))
                .title(title),
        );
    frame.render_widget(body, area);

    if !app.modal.is_open()
        && app.focus.active() == Panel::Display
        && app.focus.allows_text_cursor()
    {
        frame.set_cursor_position((area.x + 1, area.y + area.height.saturating_sub(2)));
    }
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let title = format!(" Input ({}) ", mode_tag(app.input_mode_tag()));
    let body = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(app.theme.fg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(panel_border(app, Panel::Input))
                .title(title),
        );
    frame.render_widget(body, area);

    if !app.modal.is_open()
        && app.focus.active() == Panel::Input
        && app.focus.allows_text_cursor()
    {
        frame.set_cursor_position((area.x + 1 + app.input_cursor as u16, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let status = app.status.as_deref().unwrap_or("Ready");
    let hints = "Tab:focus  Enter:activate  Ctrl+C:quit";

    let line = Line::from(vec![
        Span::styled(format!(" {status} "), Style::default().fg(app.theme.fg)),
        Span::raw(" | "),
        Span::styled(hints, Style::default().fg(app.theme.inactive)),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(app.theme.selection)),
        area,
    );
}

fn render_picker(app: &App, frame: &mut Frame, area: Rect) {
    let Some(Modal::OptionPicker {
        setting_key,
        candidates,
        selected,
        ..
    }) = app.modal.current()
    else {
        return;
    };

    let popup = centered_rect(40, 50, area);
    frame.render_widget(Clear, popup);

    let items: Vec<ListItem> = candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let style = if i == *selected {
                Style::default()
                    .fg(app.theme.fg)
                    .bg(app.theme.selection)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.fg)
            };
            ListItem::new(candidate.as_str()).style(style)
        })
        .collect();

    let title = format!(" {} ", app.registry.get(setting_key).name());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.accent))
            .title(title),
    );
    frame.render_widget(list, popup);
}

fn render_error(app: &App, frame: &mut Frame, area: Rect) {
    let Some(Modal::ErrorDialog { message, .. }) = app.modal.current() else {
        return;
    };

    let popup = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup);

    let body = Paragraph::new(vec![
        Line::from(message.as_str()),
        Line::from(""),
        Line::from(Span::styled(
            "Enter/Esc to dismiss",
            Style::default().fg(app.theme.inactive),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.error))
            .title(" Error "),
    );
    frame.render_widget(body, popup);
}

/// A centered rect occupying the given percentages of `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
