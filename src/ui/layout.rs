//! Screen geometry shared by drawing and mouse hit-testing

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::Span,
};

use crate::selector::{DropdownAnchor, Person, SelectedPerson};

/// Gap between chips
const CHIP_GAP: u16 = 1;
/// Cells kept free after the last chip before the query wraps to its own row
const MIN_QUERY_WIDTH: u16 = 12;
/// Dropdown rows are ` ● name  email `
const ROW_PADDING: u16 = 6;

/// Text of a chip: ` ● Name x `
pub fn chip_label(person: &Person) -> String {
    format!(" ● {} x ", person.name)
}

fn text_width(s: &str) -> u16 {
    u16::try_from(Span::raw(s).width()).unwrap_or(u16::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipSlot {
    pub area: Rect,
    /// The `x ` at the end of the chip
    pub remove: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLayout {
    pub status: Rect,
    pub input: Rect,
    pub chips: Vec<ChipSlot>,
    pub query: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, selection: &[SelectedPerson]) -> Self {
        // Borders take one column on each side
        let inner_width = area.width.saturating_sub(2);
        let (placements, query_row, query_col) = flow(inner_width, selection);
        let input_height = query_row + 1 + 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),            // Status line
                Constraint::Length(input_height), // Input box with chips
                Constraint::Min(0),               // Room for the dropdown
                Constraint::Length(1),            // Footer
            ])
            .split(area);

        let input = chunks[1];
        let inner = Rect {
            x: input.x.saturating_add(1),
            y: input.y.saturating_add(1),
            width: inner_width,
            height: input.height.saturating_sub(2),
        };

        let chips = placements
            .into_iter()
            .filter(|(row, _, _)| *row < inner.height)
            .map(|(row, col, width)| {
                let area = Rect {
                    x: inner.x + col,
                    y: inner.y + row,
                    width,
                    height: 1,
                };
                let remove = Rect {
                    x: area.x + width.saturating_sub(2),
                    y: area.y,
                    width: width.min(2),
                    height: 1,
                };
                ChipSlot { area, remove }
            })
            .collect();

        let query = Rect {
            x: inner.x + query_col,
            y: inner.y + query_row.min(inner.height.saturating_sub(1)),
            width: inner.width.saturating_sub(query_col),
            height: 1,
        }
        .intersection(area);

        Self {
            status: chunks[0],
            input,
            chips,
            query,
            footer: chunks[3],
        }
    }

    /// Index of the chip under `pos`, and whether the `x` was hit
    pub fn chip_at(&self, pos: Position) -> Option<(usize, bool)> {
        self.chips
            .iter()
            .position(|slot| slot.area.contains(pos))
            .map(|i| (i, self.chips[i].remove.contains(pos)))
    }
}

/// Lay chips out left to right, wrapping when a row is full. Returns
/// `(row, col, width)` per chip plus the row and column where the query starts.
fn flow(width: u16, selection: &[SelectedPerson]) -> (Vec<(u16, u16, u16)>, u16, u16) {
    let mut placements = Vec::with_capacity(selection.len());
    let mut row = 0u16;
    let mut col = 0u16;

    for chip in selection {
        let chip_width = text_width(&chip_label(&chip.person)).min(width.max(1));
        if col > 0 && col + chip_width > width {
            row += 1;
            col = 0;
        }
        placements.push((row, col, chip_width));
        col += chip_width + CHIP_GAP;
    }

    if col > 0 && col + MIN_QUERY_WIDTH > width {
        row += 1;
        col = 0;
    }
    (placements, row, col)
}

/// Text of a dropdown row, shared with the renderer so widths agree
pub fn row_width(person: &Person) -> u16 {
    text_width(&person.name)
        .saturating_add(text_width(&person.email))
        .saturating_add(ROW_PADDING)
}

/// Where the dropdown lands, clipped to the frame above the footer.
/// `None` when there is nothing to show.
pub fn dropdown_rect(anchor: DropdownAnchor, rows: &[Person], min_width: u16, frame: Rect, footer: Rect) -> Option<Rect> {
    if rows.is_empty() {
        return None;
    }

    let content_width = rows.iter().map(row_width).max().unwrap_or(0);
    let width = content_width.saturating_add(2).max(min_width);
    let height = u16::try_from(rows.len()).unwrap_or(u16::MAX).saturating_add(2);

    let bottom_limit = footer.y;
    let available = bottom_limit.saturating_sub(anchor.top);
    let rect = Rect {
        x: anchor.left,
        y: anchor.top,
        width: width.min(frame.right().saturating_sub(anchor.left)),
        height: height.min(available),
    };

    // Need at least one row inside the border
    if rect.width < 3 || rect.height < 3 {
        return None;
    }
    Some(rect)
}

/// Rows that fit inside the dropdown border
pub fn visible_rows(dropdown: Rect) -> usize {
    usize::from(dropdown.height.saturating_sub(2))
}

/// Index into the full list of the row under `pos`, with the first
/// `scroll` rows scrolled out of view
pub fn row_at(dropdown: Rect, row_count: usize, scroll: usize, pos: Position) -> Option<usize> {
    let inner = Rect {
        x: dropdown.x + 1,
        y: dropdown.y + 1,
        width: dropdown.width.saturating_sub(2),
        height: dropdown.height.saturating_sub(2),
    };
    if !inner.contains(pos) {
        return None;
    }
    let index = scroll + usize::from(pos.y - inner.y);
    (index < row_count).then_some(index)
}
