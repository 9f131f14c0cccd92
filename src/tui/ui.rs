// ui rendering

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::tui::app::App;
use crate::tui::session::Role;

const BOT_NAME: &str = "CloudSageAI";

pub fn render(frame: &mut Frame, app: &mut App) {
    let theme = &app.theme;

    frame.render_widget(Clear, frame.area());
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    // header + transcript + input + footer
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, main[0]);
    render_transcript(frame, app, main[1]);
    render_input(frame, app, main[2]);
    render_footer(frame, app, main[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let model = app.last_model.as_deref().unwrap_or("-");
    let latency = app.last_latency.as_deref().unwrap_or("-");

    let line = Line::from(vec![
        Span::styled(BOT_NAME, theme.title()),
        Span::styled("  | API: ", theme.muted()),
        Span::styled(app.api_base.as_str(), theme.base()),
        Span::styled("  | Model: ", theme.muted()),
        Span::styled(model, theme.base()),
        Span::styled(" | ", theme.muted()),
        Span::styled(latency, theme.accent()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border())
        .style(theme.base());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_transcript(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .title(Span::styled(" Chat ", theme.title()))
        .borders(Borders::ALL)
        .border_style(theme.border())
        .style(theme.base());

    if app.session.transcript().is_empty() && !app.session.is_loading() {
        let welcome = vec![
            Line::default(),
            Line::styled(format!("Welcome to {BOT_NAME}"), theme.title()),
            Line::default(),
            Line::styled(
                "Ask me anything about DevOps, cloud engineering, or search your Jira tickets and Confluence pages.",
                theme.muted(),
            ),
        ];
        let paragraph = Paragraph::new(welcome)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for entry in app.session.transcript() {
        let (name, style) = match entry.role {
            Role::User => ("You", theme.user()),
            Role::Assistant => (BOT_NAME, theme.accent()),
            Role::Error => (BOT_NAME, theme.error()),
        };
        lines.push(Line::styled(name, style));

        let body_style = if entry.role == Role::Error {
            theme.error()
        } else {
            theme.base()
        };
        lines.extend(
            entry
                .text
                .lines()
                .map(|l| Line::styled(l.to_string(), body_style)),
        );
        lines.push(Line::default());
    }

    if app.session.is_loading() {
        lines.push(Line::styled(BOT_NAME, theme.accent()));
        lines.push(Line::styled("Thinking...", theme.muted()));
    }

    // keep the newest lines in view unless the user scrolled up
    let inner = area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    let overflow = wrapped_height(&lines, inner.width).saturating_sub(inner.height);
    app.clamp_scroll(overflow);
    let offset = overflow - app.scroll;

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));
    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let busy = app.session.is_loading();

    let block = Block::default()
        .title(Span::styled(" Message ", theme.title()))
        .borders(Borders::ALL)
        .border_style(if busy { theme.border() } else { theme.accent() })
        .style(theme.base());

    let content = if app.input.is_empty() {
        let hint = if busy { "waiting for answer..." } else { "Ask something..." };
        Line::styled(hint, theme.muted())
    } else {
        Line::styled(app.input.as_str(), theme.base())
    };

    frame.render_widget(Paragraph::new(content).block(block), area);

    if !busy {
        let inner = area.inner(Margin {
            horizontal: 1,
            vertical: 1,
        });
        let col = cursor_column(app.cursor, inner.width);
        frame.set_cursor_position((inner.x + col, inner.y));
    }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let line = Line::from(vec![
        Span::styled(" Enter ", theme.base().bg(theme.accent).fg(theme.bg)),
        Span::styled(" Send ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("Up/Down ", theme.accent()),
        Span::styled("History ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("PgUp/PgDn ", theme.accent()),
        Span::styled("Scroll ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("^T ", theme.accent()),
        Span::styled(format!("Theme ({}) ", app.theme_kind.name()), theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("Esc ", theme.accent()),
        Span::styled("Quit ", theme.muted()),
    ]);

    frame.render_widget(Paragraph::new(line).style(theme.base()), area);
}

// last visible column wins once the input is wider than the box
fn cursor_column(cursor: usize, width: u16) -> u16 {
    let last = width.saturating_sub(1);
    u16::try_from(cursor).map_or(last, |col| col.min(last))
}

// rough count of rows the paragraph takes once wrapped
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    let rows: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum();
    rows.min(u16::MAX as usize) as u16
}
