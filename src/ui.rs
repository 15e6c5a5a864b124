use ratatui::{prelude::*, widgets::*};

use crate::app::{App, InputMode};
use crate::theme::{Palette, ThemeMode};
use crate::timer::SessionKind;
use crate::view::{TaskListView, TaskRow, TimerView};

pub fn render_ui(f: &mut Frame, app: &App) {
    let palette = app.theme.palette();
    let mode = app.theme_mode();

    let root = Block::default()
        .title(Span::styled(
            format!(" 🍅 POMOTASK  {} ", mode_badge(mode)),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.background).fg(palette.foreground));
    let inner = root.inner(f.size());
    f.render_widget(root, f.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(inner);

    render_timer(f, &app.timer_view(), &palette, chunks[0]);
    render_tasks(f, &app.task_view(), &palette, chunks[1]);
    render_input(f, app, &palette, chunks[2]);
    render_footer(f, app, &palette, chunks[3]);
}

fn mode_badge(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => "☀ light",
        ThemeMode::Dark => "☾ dark",
    }
}

fn render_timer(f: &mut Frame, view: &TimerView, palette: &Palette, area: Rect) {
    let session_color = match view.kind {
        SessionKind::Work => palette.work,
        SessionKind::Break => palette.rest,
    };
    let clock_style = if view.warning {
        Style::default().fg(palette.warning).add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK)
    } else {
        Style::default().fg(session_color).add_modifier(Modifier::BOLD)
    };
    let (status, status_color) = if view.running {
        ("RUNNING", session_color)
    } else {
        ("PAUSED", palette.muted)
    };

    let lines = vec![
        Line::from(Span::styled(view.label, Style::default().fg(session_color).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(view.clock.clone(), clock_style)),
        Line::from(""),
        Line::from(Span::styled(format!("{} {}", view.control, status), Style::default().fg(status_color))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Work ", Style::default().fg(palette.muted)),
            Span::styled(format!("− {} +", view.work_minutes), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("   Break ", Style::default().fg(palette.muted)),
            Span::styled(format!("− {} +", view.break_minutes), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(view.pomodoros.clone()),
    ];

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_tasks(f: &mut Frame, view: &TaskListView, palette: &Palette, area: Rect) {
    let block = Block::default()
        .title(" Tasks ")
        .borders(Borders::TOP)
        .border_style(Style::default().fg(palette.border));

    match view {
        TaskListView::Placeholder(text) => {
            f.render_widget(
                Paragraph::new(*text)
                    .style(Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC))
                    .alignment(Alignment::Center)
                    .block(block),
                area,
            );
        }
        TaskListView::Rows(rows) => {
            let items: Vec<ListItem> = rows.iter().map(|row| task_item(row, palette)).collect();
            f.render_widget(List::new(items).block(block), area);
        }
    }
}

fn task_item<'a>(row: &'a TaskRow, palette: &Palette) -> ListItem<'a> {
    let row_bg = if row.dark { ThemeMode::Dark } else { ThemeMode::Light }.palette().row;
    let text_style = if row.completed {
        Style::default().fg(palette.muted).add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(palette.foreground)
    };
    let prefix = if row.selected { "► " } else { "  " };

    ListItem::new(Line::from(vec![
        Span::styled(prefix, Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)),
        Span::styled(row.checkbox(), Style::default().fg(palette.accent)),
        Span::raw(" "),
        Span::styled(row.text.as_str(), text_style),
    ]))
    .style(Style::default().bg(row_bg))
}

fn render_input(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let mut spans = vec![Span::raw(app.input.as_str())];
    if editing {
        spans.push(Span::styled("█", Style::default().fg(palette.accent)));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(if editing { " New task (Enter add • Esc done) " } else { " New task (a) " })
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(if editing { palette.accent } else { palette.muted })),
        ),
        area,
    );
}

fn render_footer(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let line = if app.notifier.is_requesting_permission() {
        Line::from(vec![
            Span::styled("🔔 Allow desktop notifications? ", Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)),
            key_span("y", palette),
            Span::raw(" / "),
            key_span("n", palette),
        ])
    } else {
        Line::from(vec![
            key_span("Space", palette), Span::raw(" Start/Stop • "),
            key_span("R", palette), Span::raw(" Reset • "),
            key_span("S", palette), Span::raw(" Switch • "),
            key_span("w/W b/B", palette), Span::raw(" Durations • "),
            key_span("T", palette), Span::raw(" Theme • "),
            key_span("Q", palette), Span::raw(" Quit"),
        ])
    };
    let tasks_help = Line::from(vec![
        key_span("↑↓", palette), Span::raw(" Select • "),
        key_span("X", palette), Span::raw(" Done • "),
        key_span("D", palette), Span::raw(" Delete"),
    ]);

    f.render_widget(
        Paragraph::new(vec![line, tasks_help])
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.muted)),
        area,
    );
}

fn key_span<'a>(text: &'a str, palette: &Palette) -> Span<'a> {
    Span::styled(text, Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
}
