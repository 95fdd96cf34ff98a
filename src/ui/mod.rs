mod components;
pub mod layout;

use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Popup};
use crate::theme::Theme;
use layout::AppLayout;

// Load theme colors from the system once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::load)
}

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let layout = AppLayout::new(area, app.selector.selection());

    draw_status_line(f, app, layout.status);
    draw_input_box(f, app, &layout);
    draw_footer(f, layout.footer);

    // Dropdown floats over whatever is below the input
    if let Some(rect) = dropdown_area(app, area, &layout) {
        draw_dropdown(f, app, rect);
    }

    if app.popup == Popup::Help {
        draw_help_popup(f);
    }
}

/// The dropdown rect for the current frame, if it should be shown
fn dropdown_area(app: &App, area: Rect, layout: &AppLayout) -> Option<Rect> {
    let anchor = app.selector.dropdown()?;
    layout::dropdown_rect(anchor, app.selector.filtered(), app.dropdown_min_width, area, layout.footer)
}

fn draw_status_line(f: &mut Frame, app: &App, area: Rect) {
    let t = theme();
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status.as_str(), Style::default().fg(t.accent)))
    } else if let Some(chip) = app.selector.pending_removal().and_then(|i| app.selector.selection().get(i)) {
        Line::from(Span::styled(
            format!("Backspace removes {}", chip.person.name),
            Style::default().fg(t.chip_armed),
        ))
    } else {
        let count = app.selector.selection().len();
        let text = match count {
            0 => "Type to search people".to_string(),
            1 => "1 person selected".to_string(),
            n => format!("{} people selected", n),
        };
        Line::from(Span::styled(text, Style::default().fg(t.text_dim)))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_input_box(f: &mut Frame, app: &App, layout: &AppLayout) {
    let t = theme();
    let active = app.popup == Popup::None;
    let border_color = if active { t.accent } else { t.border };

    let block = Block::default()
        .title(Span::styled(" To ", Style::default().fg(border_color).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    f.render_widget(block, layout.input);

    let focused = app.selector.focused_chip();
    for (i, (slot, chip)) in layout.chips.iter().zip(app.selector.selection()).enumerate() {
        let line = components::chip_line(chip, focused == Some(i), t);
        f.render_widget(Paragraph::new(line), slot.area);
    }

    let query = app.selector.query();
    let placeholder = app.selector.selection().is_empty() && query.is_empty();
    let text = if placeholder {
        Span::styled("name or email", Style::default().fg(t.text_dim).add_modifier(Modifier::ITALIC))
    } else {
        Span::styled(query, Style::default().fg(t.text))
    };
    f.render_widget(Paragraph::new(Line::from(text)), layout.query);

    if active && layout.query.width > 0 {
        let offset = u16::try_from(Span::raw(query).width()).unwrap_or(u16::MAX);
        let x = layout.query.x.saturating_add(offset).min(layout.query.right().saturating_sub(1));
        f.set_cursor_position((x, layout.query.y));
    }
}

fn draw_dropdown(f: &mut Frame, app: &App, area: Rect) {
    let t = theme();
    f.render_widget(Clear, area);

    // Only the rows that fit, starting at the scroll offset
    let highlighted = app.selector.highlighted();
    let start = app.selector.scroll();
    let rows: Vec<Line> = app
        .selector
        .filtered()
        .iter()
        .enumerate()
        .skip(start)
        .take(layout::visible_rows(area))
        .map(|(i, person)| components::person_row(person, highlighted == Some(i), t))
        .collect();

    let list = Paragraph::new(rows).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.border)),
    );
    f.render_widget(list, area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let t = theme();
    let key = |k: &'static str| Span::styled(k, Style::default().fg(t.accent));
    let label = |l: &'static str| Span::styled(l, Style::default().fg(t.text_dim));

    let footer = Paragraph::new(Line::from(vec![
        key("↑/↓"),
        label(" move  "),
        key("Enter"),
        label(" add  "),
        key("⌫"),
        label(" remove last  "),
        key("Esc"),
        label(" close  "),
        key("F1"),
        label(" help  "),
        key("^Q"),
        label(" quit"),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame) {
    let t = theme();
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 90 } else { 60 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(t.accent).add_modifier(Modifier::BOLD)))
    };
    let entry = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", keys), Style::default().fg(t.accent)),
            Span::raw(what),
        ])
    };

    let help_text = vec![
        section("═══ Search ═══"),
        entry("type", "Filter people by name or email"),
        entry("↑/↓", "Move through suggestions"),
        entry("Enter", "Add the highlighted person"),
        entry("Esc", "Close the suggestions"),
        Line::from(""),
        section("═══ Chips ═══"),
        entry("Backspace", "On an empty query: mark the last chip,"),
        entry("", "press again to remove it"),
        entry("click", "Focus a chip"),
        entry("Delete", "Remove the focused chip"),
        entry("click x", "Remove that chip"),
        Line::from(""),
        section("═══ General ═══"),
        entry("F1", "Toggle this help"),
        entry("Ctrl+Q", "Quit"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" chipbox Help ", Style::default().fg(t.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.accent)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
