//! Span builders for chips and dropdown rows

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::selector::{Person, SelectedPerson};
use crate::theme::Theme;

/// One chip. Matches `layout::chip_label` cell for cell.
pub fn chip_line<'a>(chip: &'a SelectedPerson, focused: bool, theme: &Theme) -> Line<'a> {
    let bg = if chip.armed {
        theme.chip_armed
    } else if focused {
        theme.chip_focus
    } else {
        theme.chip_bg
    };
    let base = Style::default().bg(bg);
    let fg = if chip.armed { Color::Black } else { theme.chip_fg };

    let mut name_style = base.fg(fg);
    if focused {
        name_style = name_style.add_modifier(Modifier::BOLD);
    }

    Line::from(vec![
        Span::styled(" ", base),
        Span::styled("●", base.fg(theme.avatar)),
        Span::styled(" ", base),
        Span::styled(chip.person.name.as_str(), name_style),
        Span::styled(" ", base),
        Span::styled("x", base.fg(theme.danger).add_modifier(Modifier::BOLD)),
        Span::styled(" ", base),
    ])
}

/// One dropdown row: avatar, name, then the email dimmed
pub fn person_row<'a>(person: &'a Person, highlighted: bool, theme: &Theme) -> Line<'a> {
    let base = if highlighted {
        Style::default().bg(theme.row_selected)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(" ", base),
        Span::styled("●", base.fg(theme.avatar)),
        Span::styled(" ", base),
        Span::styled(person.name.as_str(), base.fg(theme.text)),
        Span::styled("  ", base),
        Span::styled(person.email.as_str(), base.fg(theme.text_dim)),
        Span::styled(" ", base),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::layout::{chip_label, row_width};

    #[test]
    fn test_chip_line_matches_layout_width() {
        let chip = SelectedPerson::from(Person::new("Jane Doe", "jane@example.com"));
        let line = chip_line(&chip, false, &Theme::default());
        assert_eq!(line.width(), chip_label(&chip.person).chars().count());
    }

    #[test]
    fn test_armed_chip_uses_armed_color() {
        let theme = Theme::default();
        let mut chip = SelectedPerson::from(Person::new("Jane Doe", "jane@example.com"));
        chip.armed = true;
        let line = chip_line(&chip, false, &theme);
        assert_eq!(line.spans[0].style.bg, Some(theme.chip_armed));
    }

    #[test]
    fn test_person_row_matches_layout_width() {
        let person = Person::new("Bob Johnson", "bob@example.com");
        let line = person_row(&person, true, &Theme::default());
        assert_eq!(line.width(), usize::from(row_width(&person)));
    }
}
