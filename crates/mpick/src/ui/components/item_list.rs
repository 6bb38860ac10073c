//! Filtered list of picker entries.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};

use crate::domain::item::{Item, ItemKind};

/// Which entries are visible and which one is highlighted.
#[derive(Debug, Default, Clone)]
pub struct ItemListState {
    visible: Vec<usize>,
    selected: usize,
}

impl ItemListState {
    /// Replace the visible entries, keeping the highlight in range.
    pub fn set_visible(&mut self, visible: Vec<usize>) {
        self.visible = visible;
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }

    /// Move the highlight back to the first entry.
    pub fn reset_selection(&mut self) {
        self.selected = 0;
    }

    /// Advance selection to the next entry if possible.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
        }
    }

    /// Move selection to the previous entry if possible.
    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Index into the picker's item list of the highlighted entry.
    pub fn selected_item(&self) -> Option<usize> {
        self.visible.get(self.selected).copied()
    }

    /// Position of the highlight within the visible entries.
    pub fn selected_index(&self) -> Option<usize> {
        if self.visible.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn visible(&self) -> &[usize] {
        &self.visible
    }
}

/// Ratatui component rendering the visible entries.
#[derive(Debug, Default)]
pub struct ItemList;

impl ItemList {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, items: &[Item], state: &ItemListState) {
        if state.visible().is_empty() {
            let placeholder = Paragraph::new("No matching entries").style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
            frame.render_widget(placeholder, area);
            return;
        }

        let rows: Vec<ListItem> = state
            .visible()
            .iter()
            .filter_map(|index| items.get(*index))
            .map(|item| {
                ListItem::new(item.label().to_owned())
                    .style(Style::default().fg(kind_color(item.kind())))
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(state.selected_index());

        let list = List::new(rows)
            .block(Block::default())
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        frame.render_stateful_widget(list, area, &mut list_state);
    }
}

fn kind_color(kind: ItemKind) -> Color {
    match kind {
        ItemKind::Editor => Color::Yellow,
        ItemKind::File => Color::White,
        ItemKind::Git => Color::Green,
        ItemKind::Command => Color::Magenta,
    }
}
