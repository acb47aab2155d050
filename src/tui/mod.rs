// Interactive rendering of a command table as a terminal submenu.
mod app_logic;
mod app_state;
mod event_handler;
mod ui_renderer;

pub use self::run_tui::run_menu;

mod run_tui {
    use super::app_logic::{MenuApp, rows_from_table};
    use super::app_state::Choice;
    use super::event_handler::handle_events;
    use super::ui_renderer::ui_frame;
    use crate::menu::ContextMenu;
    use anyhow::Result;
    use crossterm::{
        event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
        execute,
        terminal::{
            EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
            supports_keyboard_enhancement,
        },
    };
    use ratatui::prelude::{CrosstermBackend, Terminal};
    use std::io::{self, Stdout};

    /// Shows the menu until the user activates a row or cancels (`None`).
    pub fn run_menu(menu: &ContextMenu) -> Result<Option<Choice>> {
        let selected = menu.selection().len();
        let title = format!(
            "openwith: {} item{} selected",
            selected,
            if selected == 1 { "" } else { "s" }
        );
        let mut app = MenuApp::new(title, rows_from_table(menu.table()));

        let (mut terminal, enhanced_keys) = init_terminal()?;
        let outcome = event_loop(&mut terminal, &mut app);
        restore_terminal(terminal, enhanced_keys)?;
        outcome?;

        Ok(app.choice)
    }

    fn event_loop(
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        app: &mut MenuApp,
    ) -> Result<()> {
        while !app.quit {
            terminal.draw(|frame| ui_frame(frame, app))?;
            handle_events(app)?;
        }
        Ok(())
    }

    // Without the keyboard enhancement protocol most terminals send Shift+Enter
    // as a plain Enter. The second value records whether it was switched on.
    fn init_terminal() -> Result<(Terminal<CrosstermBackend<Stdout>>, bool)> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let enhanced_keys = supports_keyboard_enhancement().unwrap_or(false);
        if enhanced_keys {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
            )?;
        }
        tracing::debug!(enhanced_keys, "Terminal initialised");
        let backend = CrosstermBackend::new(stdout);
        Ok((Terminal::new(backend)?, enhanced_keys))
    }

    fn restore_terminal(
        mut terminal: Terminal<CrosstermBackend<Stdout>>,
        enhanced_keys: bool,
    ) -> Result<()> {
        if enhanced_keys {
            execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
        }
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor().map_err(Into::into)
    }
}
