use super::app_logic::{MenuApp, row_text};
use super::app_state::{AppMode, MenuRow};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

// Shift+Enter only arrives where the terminal reports modifiers on Enter.
const HELP_LINES: [&str; 2] = [
    "Arrows/jk: Nav | g/G: First/Last | Enter: Open | e: Run elevated",
    "Shift+Enter: Run elevated (if the terminal reports it) | /: Filter | q/Esc: Cancel",
];

fn draw_help_block(f: &mut Frame, app: &MenuApp, area: Rect) {
    let help_text_lines_content: Vec<Line> = HELP_LINES.iter().map(|l| Line::from(*l)).collect();
    let help_paragraph = Paragraph::new(help_text_lines_content)
        .block(Block::default().borders(Borders::ALL).title(app.title.as_str()));
    f.render_widget(help_paragraph, area);
}

fn draw_filter_input_block(f: &mut Frame, app: &MenuApp, area: Rect) {
    let input_text = format!("/{}", app.filter_input);
    let filter_paragraph = Paragraph::new(input_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Filter (Esc to cancel, Enter to apply)"),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(filter_paragraph, area);
    let cursor_col = app.filter_input[..app.filter_cursor_pos].chars().count() as u16;
    f.set_cursor_position((area.x + 1 + cursor_col + 1, area.y + 1));
}

fn draw_menu_block(f: &mut Frame, app: &mut MenuApp, area: Rect) {
    app.list_viewport_height = area.height.saturating_sub(2) as usize;
    app.ensure_selection_is_visible_in_viewport();

    let visible_row_indices = app.visible_row_indices();
    let num_visible_rows = visible_row_indices.len();

    let rows_to_render = visible_row_indices
        .get(app.scroll_offset..(app.scroll_offset + app.list_viewport_height).min(num_visible_rows))
        .unwrap_or(&[]);

    let list_items: Vec<ListItem> = rows_to_render
        .iter()
        .map(|&row_idx| {
            let row = &app.rows[row_idx];
            let item = ListItem::new(row_text(row));
            match row {
                MenuRow::Separator => item.style(Style::default().fg(Color::DarkGray)),
                MenuRow::OpenHandlersFolder { .. } => {
                    item.style(Style::default().add_modifier(Modifier::ITALIC))
                }
                MenuRow::Handler { .. } => item,
            }
        })
        .collect();

    let list_title = if !app.filter_input.is_empty() && app.mode == AppMode::Normal {
        format!("{} (Filter: '{}')", crate::menu::SUBMENU_LABEL, app.filter_input)
    } else {
        format!("{} ▸", crate::menu::SUBMENU_LABEL)
    };

    let list_widget = List::new(list_items)
        .block(Block::default().borders(Borders::ALL).title(list_title))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("❯ ");

    let mut list_state_for_view = ratatui::widgets::ListState::default();
    if let Some(pos) = visible_row_indices
        .iter()
        .position(|&idx| idx == app.current_row_idx)
    {
        if pos >= app.scroll_offset && pos < app.scroll_offset + app.list_viewport_height {
            list_state_for_view.select(Some(pos - app.scroll_offset));
        }
    }
    f.render_stateful_widget(list_widget, area, &mut list_state_for_view);
}

pub(super) fn ui_frame(frame: &mut Frame, app: &mut MenuApp) {
    let help_lines = 2;
    let filter_input_height = if app.mode == AppMode::Filtering { 3 } else { 0 };
    let top_block_container_height = (help_lines + 2) + filter_input_height;

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(top_block_container_height),
            Constraint::Min(0),
        ])
        .split(frame.area());

    let top_content_constraints = if app.mode == AppMode::Filtering {
        vec![
            Constraint::Length(help_lines + 2),
            Constraint::Length(filter_input_height),
        ]
    } else {
        vec![Constraint::Length(help_lines + 2)]
    };
    let top_content_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(top_content_constraints)
        .split(main_chunks[0]);

    draw_help_block(frame, app, top_content_chunks[0]);
    if app.mode == AppMode::Filtering {
        draw_filter_input_block(frame, app, top_content_chunks[1]);
    }

    draw_menu_block(frame, app, main_chunks[1]);
}
