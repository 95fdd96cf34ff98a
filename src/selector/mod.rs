//! Chip selector state machine
//!
//! Holds the query, the chip row and the dropdown list, and applies one
//! input event at a time. Rendering and hit-testing live in `ui`; this
//! module only sees the input box as an optional `Rect` so a missing
//! layout degrades to a no-op instead of an error.

pub mod filter;
pub mod person;

use ratatui::layout::Rect;

pub use person::{Person, SelectedPerson};

/// Where the dropdown's top-left corner goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropdownAnchor {
    pub top: u16,
    pub left: u16,
}

impl DropdownAnchor {
    /// Directly under the input box, sharing its left edge
    pub fn below(input: Rect) -> Self {
        Self {
            top: input.bottom(),
            left: input.x,
        }
    }
}

/// What a Backspace press did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackspaceOutcome {
    Edited,
    Armed(Person),
    Removed(Person),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct ChipSelector {
    candidates: Vec<Person>,
    query: String,
    selection: Vec<SelectedPerson>,
    filtered: Vec<Person>,

    // Keyboard highlight in the dropdown
    highlighted: Option<usize>,
    // Chip armed by the first Backspace
    pending_removal: Option<usize>,
    // Chip clicked with the mouse
    focused_chip: Option<usize>,

    dropdown: Option<DropdownAnchor>,
    // First dropdown row shown when the list is taller than the dropdown
    scroll: usize,
}

impl ChipSelector {
    pub fn new(candidates: Vec<Person>) -> Self {
        Self {
            candidates,
            query: String::new(),
            selection: Vec::new(),
            filtered: Vec::new(),
            highlighted: None,
            pending_removal: None,
            focused_chip: None,
            dropdown: None,
            scroll: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selection(&self) -> &[SelectedPerson] {
        &self.selection
    }

    pub fn filtered(&self) -> &[Person] {
        &self.filtered
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn pending_removal(&self) -> Option<usize> {
        self.pending_removal
    }

    pub fn focused_chip(&self) -> Option<usize> {
        self.focused_chip
    }

    pub fn dropdown(&self) -> Option<DropdownAnchor> {
        self.dropdown
    }

    /// The selected people, without chip state
    pub fn selected_people(&self) -> Vec<Person> {
        self.selection.iter().map(|s| s.person.clone()).collect()
    }

    // ---- keyboard ----

    /// Append a character to the query
    pub fn input_char(&mut self, c: char, input: Option<Rect>) {
        self.disarm();
        self.focused_chip = None;
        self.query.push(c);
        self.refilter();
        self.reposition(input);
    }

    /// Edit the query, or arm/remove the last chip when the query is empty
    pub fn backspace(&mut self, input: Option<Rect>) -> BackspaceOutcome {
        if !self.query.is_empty() {
            self.disarm();
            self.query.pop();
            self.refilter();
            self.reposition(input);
            return BackspaceOutcome::Edited;
        }

        if self.selection.is_empty() {
            return BackspaceOutcome::Ignored;
        }

        let armed = self
            .pending_removal
            .and_then(|i| self.selection.get(i).map(|s| s.person.clone()));

        match armed {
            None => {
                let last = self.selection.len() - 1;
                self.selection[last].armed = true;
                self.pending_removal = Some(last);
                tracing::debug!("Armed chip {}", self.selection[last].person.email);
                BackspaceOutcome::Armed(self.selection[last].person.clone())
            }
            Some(person) => {
                // Refilter while the chip is still selected so removal appends it last
                if let Some(rect) = input {
                    self.dropdown = Some(DropdownAnchor::below(rect));
                }
                self.refilter();
                self.remove_chip(&person.email);
                self.pending_removal = None;
                BackspaceOutcome::Removed(person)
            }
        }
    }

    pub fn arrow_down(&mut self) {
        self.disarm();
        if self.filtered.is_empty() {
            return;
        }
        let last = self.filtered.len() - 1;
        self.highlighted = Some(match self.highlighted {
            Some(i) => (i + 1).min(last),
            None => 0,
        });
    }

    pub fn arrow_up(&mut self) {
        self.disarm();
        if self.filtered.is_empty() {
            return;
        }
        let last = self.filtered.len() - 1;
        self.highlighted = Some(match self.highlighted {
            Some(i) => i.saturating_sub(1),
            None => last,
        });
    }

    /// Commit the highlighted suggestion, if any
    pub fn enter(&mut self) -> Option<Person> {
        self.disarm();
        let person = self.highlighted.and_then(|i| self.filtered.get(i)).cloned()?;
        self.commit(person)
    }

    /// Remove the chip focused by a click
    pub fn delete_focused(&mut self) -> Option<Person> {
        self.disarm();
        let email = self
            .focused_chip
            .and_then(|i| self.selection.get(i))
            .map(|s| s.person.email.clone())?;
        self.remove_chip(&email)
    }

    /// Esc behaves like a click outside the input
    pub fn escape(&mut self) {
        self.click_outside();
    }

    // ---- pointer ----

    pub fn click_input(&mut self, input: Option<Rect>) {
        self.disarm();
        self.highlighted = None;
        self.focused_chip = None;
        if let Some(rect) = input {
            self.dropdown = Some(DropdownAnchor::below(rect));
            self.refilter();
        }
    }

    pub fn click_chip(&mut self, index: usize) {
        self.disarm();
        if index < self.selection.len() {
            self.focused_chip = Some(index);
        }
        self.dropdown = None;
    }

    /// Click on a chip's `x`
    pub fn click_chip_remove(&mut self, index: usize) -> Option<Person> {
        self.disarm();
        self.dropdown = None;
        let email = self.selection.get(index)?.person.email.clone();
        self.remove_chip(&email)
    }

    pub fn click_suggestion(&mut self, index: usize) -> Option<Person> {
        self.disarm();
        let person = self.filtered.get(index).cloned()?;
        self.commit(person)
    }

    pub fn click_outside(&mut self) {
        self.disarm();
        self.focused_chip = None;
        if self.dropdown.take().is_some() {
            tracing::debug!("Dropdown closed");
        }
    }

    // ---- selection ----

    /// Add `person` as a chip. Returns `None` if it is already selected.
    pub fn commit(&mut self, person: Person) -> Option<Person> {
        if self.selection.iter().any(|s| s.person.email == person.email) {
            return None;
        }
        tracing::info!("Selected {} <{}>", person.name, person.email);
        self.selection.push(person.clone().into());
        self.query.clear();
        self.filtered.clear();
        self.scroll = 0;
        self.highlighted = None;
        Some(person)
    }

    /// Remove the chip with `email` and put the person back at the end of
    /// the dropdown list without refiltering
    pub fn remove_chip(&mut self, email: &str) -> Option<Person> {
        let index = self.selection.iter().position(|s| s.person.email == email)?;
        let removed = self.selection.remove(index).person;

        self.pending_removal = shift_after_removal(self.pending_removal, index);
        self.focused_chip = shift_after_removal(self.focused_chip, index);

        if !self.filtered.iter().any(|p| p.email == removed.email) {
            self.filtered.push(removed.clone());
        }
        self.clamp_highlight();

        tracing::info!("Removed {} <{}>", removed.name, removed.email);
        Some(removed)
    }

    /// Keep an open dropdown under the input after the input moved
    pub fn follow_input(&mut self, input: Rect) {
        if self.dropdown.is_some() {
            self.dropdown = Some(DropdownAnchor::below(input));
        }
    }

    /// Scroll so the highlighted row is among the `visible` rows shown
    pub fn keep_highlight_visible(&mut self, visible: usize) {
        if visible == 0 {
            return;
        }
        if let Some(i) = self.highlighted {
            if i < self.scroll {
                self.scroll = i;
            } else if i >= self.scroll + visible {
                self.scroll = i + 1 - visible;
            }
        }
        self.scroll = self.scroll.min(self.filtered.len().saturating_sub(visible));
    }

    fn refilter(&mut self) {
        self.scroll = 0;
        self.filtered = filter::filter_candidates(&self.candidates, &self.selection, &self.query);
        self.clamp_highlight();
    }

    fn reposition(&mut self, input: Option<Rect>) {
        if let Some(rect) = input {
            self.dropdown = Some(DropdownAnchor::below(rect));
        }
    }

    fn clamp_highlight(&mut self) {
        if self.highlighted.is_some_and(|i| i >= self.filtered.len()) {
            self.highlighted = None;
        }
    }

    fn disarm(&mut self) {
        if let Some(i) = self.pending_removal.take() {
            if let Some(chip) = self.selection.get_mut(i) {
                chip.armed = false;
            }
        }
    }
}

fn shift_after_removal(slot: Option<usize>, removed: usize) -> Option<usize> {
    match slot {
        Some(i) if i == removed => None,
        Some(i) if i > removed => Some(i - 1),
        other => other,
    }
}
