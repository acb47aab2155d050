use super::app_state::{AppMode, Choice, MenuRow};
use crate::command_table::{CommandTable, OPEN_HANDLERS_FOLDER_LABEL};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Flattens the command table into rows in the order the host must render them.
pub fn rows_from_table(table: &CommandTable) -> Vec<MenuRow> {
    let mut rows = Vec::with_capacity(table.handler_count() + table.groups.len() + 1);
    for group in &table.groups {
        if group.separator_before {
            rows.push(MenuRow::Separator);
        }
        for (id, entry) in &group.entries {
            rows.push(MenuRow::Handler {
                id: *id,
                label: entry.display_name.clone(),
                icon: entry
                    .icon
                    .as_ref()
                    .map(|i| i.as_str().to_string())
                    .unwrap_or_else(|| " ".to_string()),
            });
        }
    }
    if !rows.is_empty() {
        rows.push(MenuRow::Separator);
    }
    rows.push(MenuRow::OpenHandlersFolder {
        id: table.open_handlers_folder,
    });
    rows
}

pub(super) fn row_text(row: &MenuRow) -> String {
    match row {
        MenuRow::Handler { label, icon, .. } => format!("{} {}", icon, label),
        MenuRow::Separator => "────────────────".to_string(),
        MenuRow::OpenHandlersFolder { .. } => format!("  {}", OPEN_HANDLERS_FOLDER_LABEL),
    }
}

pub struct MenuApp {
    pub(super) title: String,
    pub(super) rows: Vec<MenuRow>,
    pub(super) current_row_idx: usize,
    pub(super) scroll_offset: usize,
    pub(super) quit: bool,
    pub(super) choice: Option<Choice>,
    pub(super) mode: AppMode,
    pub(super) filter_input: String,
    pub(super) filter_cursor_pos: usize,
    pub(super) list_viewport_height: usize,
}

impl MenuApp {
    pub fn new(title: String, rows: Vec<MenuRow>) -> Self {
        let current_row_idx = rows
            .iter()
            .position(|r| r.command_id().is_some())
            .unwrap_or(0);
        MenuApp {
            title,
            rows,
            current_row_idx,
            scroll_offset: 0,
            quit: false,
            choice: None,
            mode: AppMode::Normal,
            filter_input: String::new(),
            filter_cursor_pos: 0,
            list_viewport_height: 0, // Set by ui_renderer
        }
    }

    /// Rows currently on screen. A filter hides separators and non-matching handlers;
    /// the "open handlers folder" row always stays.
    pub(super) fn visible_row_indices(&self) -> Vec<usize> {
        if self.filter_input.is_empty() {
            return (0..self.rows.len()).collect();
        }
        let needle = self.filter_input.to_lowercase();
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| match row {
                MenuRow::Handler { label, .. } => label.to_lowercase().contains(&needle),
                MenuRow::Separator => false,
                MenuRow::OpenHandlersFolder { .. } => true,
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    fn selectable_visible_indices(&self) -> Vec<usize> {
        self.visible_row_indices()
            .into_iter()
            .filter(|&idx| self.rows[idx].command_id().is_some())
            .collect()
    }

    pub(super) fn move_selection(&mut self, delta: i32) {
        let selectable = self.selectable_visible_indices();
        if selectable.is_empty() {
            return;
        }
        let new_pos = match selectable.iter().position(|&i| i == self.current_row_idx) {
            Some(pos) => (pos as i32 + delta).rem_euclid(selectable.len() as i32) as usize,
            None if delta > 0 => 0,
            None => selectable.len() - 1,
        };
        self.current_row_idx = selectable[new_pos];
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn select_first(&mut self) {
        if let Some(&first) = self.selectable_visible_indices().first() {
            self.current_row_idx = first;
        }
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn select_last(&mut self) {
        if let Some(&last) = self.selectable_visible_indices().last() {
            self.current_row_idx = last;
        }
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn activate_current(&mut self, elevate: bool) {
        if !self.selectable_visible_indices().contains(&self.current_row_idx) {
            return;
        }
        if let Some(command_id) = self.rows[self.current_row_idx].command_id() {
            self.choice = Some(Choice {
                command_id,
                elevate,
            });
            self.quit = true;
        }
    }

    pub(super) fn ensure_selection_is_valid_after_filter(&mut self) {
        let selectable = self.selectable_visible_indices();
        if !selectable.contains(&self.current_row_idx) {
            if let Some(&first) = selectable.first() {
                self.current_row_idx = first;
            }
        }
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn ensure_selection_is_visible_in_viewport(&mut self) {
        if self.list_viewport_height == 0 {
            return;
        }
        let visible = self.visible_row_indices();
        let list_height = self.list_viewport_height;
        if let Some(pos) = visible.iter().position(|&i| i == self.current_row_idx) {
            if pos < self.scroll_offset {
                self.scroll_offset = pos;
            } else if pos >= self.scroll_offset + list_height {
                self.scroll_offset = pos + 1 - list_height;
            }
        }
        if visible.len() <= list_height {
            self.scroll_offset = 0;
        } else {
            self.scroll_offset = self.scroll_offset.min(visible.len() - list_height);
        }
    }

    // --- Event handling sub-methods ---
    pub(super) fn handle_normal_mode_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('/') => self.mode = AppMode::Filtering,
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Home | KeyCode::Char('g') => self.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.select_last(),
            KeyCode::Enter => {
                self.activate_current(key_event.modifiers.contains(KeyModifiers::SHIFT))
            }
            KeyCode::Char('e') | KeyCode::Char('E') => self.activate_current(true),
            _ => {}
        }
    }

    pub(super) fn handle_filtering_mode_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => {
                self.mode = AppMode::Normal;
                self.ensure_selection_is_valid_after_filter();
            }
            KeyCode::Esc => {
                self.mode = AppMode::Normal;
                self.filter_input.clear();
                self.filter_cursor_pos = 0;
                self.ensure_selection_is_valid_after_filter();
            }
            KeyCode::Char(c) => {
                self.filter_input.insert(self.filter_cursor_pos, c);
                self.filter_cursor_pos += c.len_utf8();
                self.ensure_selection_is_valid_after_filter();
            }
            KeyCode::Backspace => {
                if let Some(prev) = self.filter_input[..self.filter_cursor_pos].chars().next_back() {
                    self.filter_cursor_pos -= prev.len_utf8();
                    self.filter_input.remove(self.filter_cursor_pos);
                    self.ensure_selection_is_valid_after_filter();
                }
            }
            KeyCode::Left => {
                if let Some(prev) = self.filter_input[..self.filter_cursor_pos].chars().next_back() {
                    self.filter_cursor_pos -= prev.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(next) = self.filter_input[self.filter_cursor_pos..].chars().next() {
                    self.filter_cursor_pos += next.len_utf8();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_table::CommandGroup;
    use crate::handler_directory::HandlerEntry;
    use crate::selection::Category;
    use crossterm::event::KeyEvent;
    use std::path::PathBuf;

    fn entry(name: &str) -> HandlerEntry {
        HandlerEntry {
            display_name: name.to_string(),
            full_path: PathBuf::from(format!("/h/{name}.exe")),
            icon: None,
        }
    }

    fn app() -> MenuApp {
        let table = CommandTable {
            groups: vec![
                CommandGroup {
                    category: Category::SpecificExtension,
                    separator_before: false,
                    entries: vec![(1, entry("Markdown Viewer"))],
                },
                CommandGroup {
                    category: Category::Everything,
                    separator_before: true,
                    entries: vec![(2, entry("Hex Editor")), (3, entry("Vim"))],
                },
            ],
            open_handlers_folder: 4,
            host_separator: 5,
            submenu_anchor: 6,
            id_first: 1,
        };
        MenuApp::new("Open with".to_string(), rows_from_table(&table))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn rows_mirror_groups_and_separators() {
        let app = app();
        let ids: Vec<Option<u32>> = app.rows.iter().map(MenuRow::command_id).collect();
        assert_eq!(ids, vec![Some(1), None, Some(2), Some(3), None, Some(4)]);
    }

    #[test]
    fn navigation_skips_separators_and_wraps() {
        let mut app = app();
        assert_eq!(app.current_row_idx, 0);
        app.handle_normal_mode_input(key(KeyCode::Down));
        assert_eq!(app.rows[app.current_row_idx].command_id(), Some(2));
        app.handle_normal_mode_input(key(KeyCode::End));
        assert_eq!(app.rows[app.current_row_idx].command_id(), Some(4));
        app.handle_normal_mode_input(key(KeyCode::Down));
        assert_eq!(app.rows[app.current_row_idx].command_id(), Some(1));
        app.handle_normal_mode_input(key(KeyCode::Up));
        assert_eq!(app.rows[app.current_row_idx].command_id(), Some(4));
    }

    #[test]
    fn enter_activates_and_shift_elevates() {
        let mut plain = app();
        plain.handle_normal_mode_input(key(KeyCode::Enter));
        assert_eq!(
            plain.choice,
            Some(Choice {
                command_id: 1,
                elevate: false
            })
        );
        assert!(plain.quit);

        let mut elevated = app();
        elevated.handle_normal_mode_input(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        assert_eq!(elevated.choice.map(|c| c.elevate), Some(true));

        let mut by_key = app();
        by_key.handle_normal_mode_input(key(KeyCode::Char('e')));
        assert_eq!(by_key.choice.map(|c| c.elevate), Some(true));
    }

    #[test]
    fn filter_narrows_handlers_but_keeps_open_folder() {
        let mut app = app();
        app.handle_normal_mode_input(key(KeyCode::Char('/')));
        for c in "VI".chars() {
            app.handle_filtering_mode_input(key(KeyCode::Char(c)));
        }
        let visible: Vec<Option<u32>> = app
            .visible_row_indices()
            .into_iter()
            .map(|i| app.rows[i].command_id())
            .collect();
        // "Markdown Viewer" and "Vim" both contain "vi".
        assert_eq!(visible, vec![Some(1), Some(3), Some(4)]);

        app.handle_filtering_mode_input(key(KeyCode::Backspace));
        app.handle_filtering_mode_input(key(KeyCode::Backspace));
        app.handle_filtering_mode_input(key(KeyCode::Char('x')));
        let visible: Vec<Option<u32>> = app
            .visible_row_indices()
            .into_iter()
            .map(|i| app.rows[i].command_id())
            .collect();
        assert_eq!(visible, vec![Some(2), Some(4)]);
        assert_eq!(app.rows[app.current_row_idx].command_id(), Some(2));

        app.handle_filtering_mode_input(key(KeyCode::Esc));
        assert_eq!(app.visible_row_indices().len(), app.rows.len());
    }

    #[test]
    fn quitting_leaves_no_choice() {
        let mut app = app();
        app.handle_normal_mode_input(key(KeyCode::Char('q')));
        assert!(app.quit);
        assert_eq!(app.choice, None);
    }

    #[test]
    fn empty_table_still_offers_open_folder() {
        let table = CommandTable {
            groups: vec![],
            open_handlers_folder: 9,
            host_separator: 10,
            submenu_anchor: 11,
            id_first: 9,
        };
        let rows = rows_from_table(&table);
        assert_eq!(rows, vec![MenuRow::OpenHandlersFolder { id: 9 }]);
    }
}
