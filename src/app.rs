use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::config::AppConfig;
use crate::selector::{BackspaceOutcome, ChipSelector, Person};
use crate::ui::layout::{self, AppLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

pub struct App {
    pub selector: ChipSelector,
    pub popup: Popup,
    pub dropdown_min_width: u16,

    // Status message (shown in the top line until the next event)
    pub status_message: Option<String>,

    pub should_quit: bool,

    // Last known terminal size, used to locate the input box
    area: Option<Rect>,
}

impl App {
    pub fn new(config: &AppConfig, area: Option<Rect>) -> Self {
        Self {
            selector: ChipSelector::new(config.candidates.clone()),
            popup: Popup::None,
            dropdown_min_width: config.dropdown_min_width,
            status_message: None,
            should_quit: false,
            area,
        }
    }

    pub fn resize(&mut self, area: Rect) {
        self.area = Some(area);
        self.follow_input();
    }

    /// The selected people, in the order they were added
    pub fn selection(&self) -> Vec<Person> {
        self.selector.selected_people()
    }

    fn layout(&self) -> Option<AppLayout> {
        self.area.map(|area| AppLayout::new(area, self.selector.selection()))
    }

    fn input_rect(&self) -> Option<Rect> {
        self.layout().map(|l| l.input)
    }

    fn dropdown_rect(&self, area: Rect, layout: &AppLayout) -> Option<Rect> {
        let anchor = self.selector.dropdown()?;
        layout::dropdown_rect(anchor, self.selector.filtered(), self.dropdown_min_width, area, layout.footer)
    }

    /// The input box moves when chips wrap; keep an open dropdown under it
    /// and its highlighted row scrolled into view
    fn follow_input(&mut self) {
        let Some(area) = self.area else {
            return;
        };
        let layout = AppLayout::new(area, self.selector.selection());
        self.selector.follow_input(layout.input);
        if let Some(rect) = self.dropdown_rect(area, &layout) {
            self.selector.keep_highlight_visible(layout::visible_rows(rect));
        }
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        // AltGr arrives as Ctrl+Alt on Windows and must still type
        if key.modifiers.contains(KeyModifiers::CONTROL) && !key.modifiers.contains(KeyModifiers::ALT) {
            if matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
                self.should_quit = true;
            }
            return;
        }

        if self.popup == Popup::Help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter) {
                self.popup = Popup::None;
            }
            return;
        }

        let input = self.input_rect();
        match key.code {
            KeyCode::Char(c) => self.selector.input_char(c, input),
            KeyCode::Backspace => match self.selector.backspace(input) {
                BackspaceOutcome::Armed(person) => {
                    self.set_status(format!("Press Backspace again to remove {}", person.name));
                }
                BackspaceOutcome::Removed(person) => self.set_status(format!("Removed {}", person.name)),
                BackspaceOutcome::Edited | BackspaceOutcome::Ignored => {}
            },
            KeyCode::Delete => {
                if let Some(person) = self.selector.delete_focused() {
                    self.set_status(format!("Removed {}", person.name));
                }
            }
            KeyCode::Down => self.selector.arrow_down(),
            KeyCode::Up => self.selector.arrow_up(),
            KeyCode::Enter => {
                if let Some(person) = self.selector.enter() {
                    self.set_status(format!("Added {}", person.name));
                }
            }
            KeyCode::Esc => self.selector.escape(),
            KeyCode::F(1) => self.popup = Popup::Help,
            _ => {}
        }

        self.follow_input();
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }
        self.status_message = None;

        if self.popup == Popup::Help {
            self.popup = Popup::None;
            return;
        }

        let Some(area) = self.area else {
            self.selector.click_outside();
            return;
        };
        let layout = AppLayout::new(area, self.selector.selection());
        let pos = Position::new(mouse.column, mouse.row);

        // Dropdown sits on top, so it wins over anything under it
        if let Some(rect) = self.dropdown_rect(area, &layout) {
            if rect.contains(pos) {
                let rows = self.selector.filtered().len();
                if let Some(row) = layout::row_at(rect, rows, self.selector.scroll(), pos) {
                    if let Some(person) = self.selector.click_suggestion(row) {
                        self.set_status(format!("Added {}", person.name));
                    }
                }
                self.follow_input();
                return;
            }
        }

        match layout.chip_at(pos) {
            Some((index, true)) => {
                if let Some(person) = self.selector.click_chip_remove(index) {
                    self.set_status(format!("Removed {}", person.name));
                }
            }
            Some((index, false)) => self.selector.click_chip(index),
            None if layout.input.contains(pos) => self.selector.click_input(Some(layout.input)),
            None => self.selector.click_outside(),
        }

        self.follow_input();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::DropdownAnchor;

    const AREA: Rect = Rect { x: 0, y: 0, width: 80, height: 20 };

    fn app() -> App {
        App::new(&AppConfig::default(), Some(AREA))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    #[test]
    fn test_keyboard_select() {
        let mut app = app();
        type_str(&mut app, "nick");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.selection(), vec![Person::new("Nick Giannopoulos", "nick@example.com")]);
        assert_eq!(app.status_message.as_deref(), Some("Added Nick Giannopoulos"));

        press(&mut app, KeyCode::Esc);
        click(&mut app, 60, 2);
        assert_eq!(app.selector.filtered().len(), 4);
    }

    #[test]
    fn test_backspace_twice_removes_and_reopens() {
        let mut app = app();
        app.selector.commit(Person::new("Jane Doe", "jane@example.com"));

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.selection().len(), 1);
        assert_eq!(app.status_message.as_deref(), Some("Press Backspace again to remove Jane Doe"));

        press(&mut app, KeyCode::Backspace);
        assert!(app.selection().is_empty());
        assert_eq!(app.selector.dropdown(), Some(DropdownAnchor { top: 4, left: 0 }));
        assert_eq!(app.selector.filtered().last().map(|p| p.name.as_str()), Some("Jane Doe"));
    }

    #[test]
    fn test_click_suggestion_row() {
        let mut app = app();
        click(&mut app, 10, 2); // input box
        assert_eq!(app.selector.dropdown(), Some(DropdownAnchor { top: 4, left: 0 }));

        // Border on row 4, Nick on row 5, John on row 6
        click(&mut app, 3, 6);
        assert_eq!(app.selection(), vec![Person::new("John Doe", "john@example.com")]);
    }

    #[test]
    fn test_click_chip_remove() {
        let mut app = app();
        app.selector.commit(Person::new("Nick Giannopoulos", "nick@example.com"));
        click(&mut app, 22, 2);
        assert!(app.selection().is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Removed Nick Giannopoulos"));
    }

    #[test]
    fn test_click_chip_then_delete() {
        let mut app = app();
        app.selector.commit(Person::new("Nick Giannopoulos", "nick@example.com"));
        app.selector.commit(Person::new("Jane Doe", "jane@example.com"));
        click(&mut app, 3, 2);
        assert_eq!(app.selector.focused_chip(), Some(0));

        press(&mut app, KeyCode::Delete);
        assert_eq!(app.selection(), vec![Person::new("Jane Doe", "jane@example.com")]);
    }

    #[test]
    fn test_click_outside_closes_dropdown() {
        let mut app = app();
        type_str(&mut app, "a");
        assert!(app.selector.dropdown().is_some());
        click(&mut app, 70, 15);
        assert_eq!(app.selector.dropdown(), None);
    }

    #[test]
    fn test_dropdown_follows_growing_input() {
        let mut app = App::new(&AppConfig::default(), Some(Rect::new(0, 0, 40, 20)));
        for person in crate::selector::person::default_candidates().into_iter().take(3) {
            app.selector.commit(person);
        }
        type_str(&mut app, "a");
        let top = app.selector.dropdown().map(|a| a.top);
        // Three chips wrap onto two rows in 38 columns
        assert_eq!(top, Some(5));
    }

    #[test]
    fn test_help_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::F(1));
        type_str(&mut app, "jo");
        assert_eq!(app.selector.query(), "");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.popup, Popup::None);
    }

    fn many_people(n: usize) -> AppConfig {
        AppConfig {
            candidates: (0..n)
                .map(|i| Person::new(format!("Person {}", i), format!("p{}@example.com", i)))
                .collect(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_long_list_scrolls_to_highlight() {
        let mut app = App::new(&many_people(30), Some(AREA));
        click(&mut app, 10, 2);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selector.highlighted(), Some(29));
        // Rows 5..=17 hold 13 people
        assert_eq!(app.selector.scroll(), 17);

        press(&mut app, KeyCode::Down);
        for _ in 0..14 {
            press(&mut app, KeyCode::Up);
        }
        assert_eq!(app.selector.highlighted(), Some(15));
        assert_eq!(app.selector.scroll(), 15);
    }

    #[test]
    fn test_click_on_scrolled_row() {
        let mut app = App::new(&many_people(30), Some(AREA));
        click(&mut app, 10, 2);
        press(&mut app, KeyCode::Up);

        // Last visible row
        click(&mut app, 3, 17);
        assert_eq!(app.selection(), vec![Person::new("Person 29", "p29@example.com")]);
    }

    #[test]
    fn test_altgr_characters_type() {
        let mut app = app();
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        app.handle_key(KeyEvent::new(KeyCode::Char('@'), altgr));
        assert_eq!(app.selector.query(), "@");
        assert!(!app.should_quit);
    }

    #[test]
    fn test_ctrl_q_quits() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert_eq!(app.selector.query(), "");
    }

    #[test]
    fn test_without_layout_typing_still_filters() {
        let mut app = App::new(&AppConfig::default(), None);
        type_str(&mut app, "bob");
        assert_eq!(app.selector.filtered().len(), 1);
        assert_eq!(app.selector.dropdown(), None);
    }
}
