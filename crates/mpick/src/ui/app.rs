//! Application loop for the TUI.

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};

use crate::app::picker::Picker;
use crate::app::root::resolve_root;
use crate::infra::git::{GitMetadata, metadata_for_path};
use crate::infra::host::TerminalHost;
use crate::ui::components::item_list::{ItemList, ItemListState};
use crate::ui::components::prompt::{Prompt, PromptState};

const TICK_RATE: Duration = Duration::from_millis(120);

/// How the interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Cancelled,
}

/// Interactive front end over a [`Picker`].
pub struct UiApp {
    picker: Picker<TerminalHost>,
    list: ItemListState,
    prompt: PromptState,
    list_component: ItemList,
    prompt_component: Prompt,
    title: String,
    outcome: Option<Outcome>,
}

impl UiApp {
    pub fn new(picker: Picker<TerminalHost>) -> Self {
        Self {
            picker,
            list: ItemListState::default(),
            prompt: PromptState::default(),
            list_component: ItemList,
            prompt_component: Prompt,
            title: "mpick".to_owned(),
            outcome: None,
        }
    }

    /// Populate the picker, then run the terminal UI until an entry is accepted
    /// or the user cancels.
    pub fn run(&mut self) -> Result<Outcome> {
        self.bootstrap()?;

        enable_raw_mode().context("failed to enable raw mode")?;
        // stdout stays clean for print-mode effects.
        let mut stderr = io::stderr();
        execute!(stderr, EnterAlternateScreen).context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        terminal.hide_cursor().ok();

        let event_loop_result = self.event_loop(&mut terminal);

        disable_raw_mode().ok();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        event_loop_result
    }

    /// Hand the picker back, e.g. to carry out recorded effects.
    pub fn into_picker(self) -> Picker<TerminalHost> {
        self.picker
    }

    fn bootstrap(&mut self) -> Result<()> {
        self.picker.show()?;
        self.title = title_for(resolve_root(self.picker.host()).as_deref());
        self.refresh_visible();
        self.pull_notices();
        Ok(())
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    ) -> Result<Outcome> {
        loop {
            terminal.draw(|frame| self.render(frame))?;
            self.prompt.purge_expired_messages();

            if let Some(outcome) = self.outcome {
                return Ok(outcome);
            }

            if event::poll(TICK_RATE)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key_event(key)?;
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>) {
        let size = frame.size();
        let block = Block::default()
            .title(self.title.clone())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(size);
        frame.render_widget(block, size);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        self.prompt_component.render(frame, layout[0], &self.prompt);
        self.list_component
            .render(frame, layout[1], self.picker.items(), &self.list);

        let hints = Paragraph::new(Line::from(vec![
            Span::styled("↑/↓", Style::default().fg(Color::Cyan)),
            Span::raw(" move · "),
            Span::styled("↵", Style::default().fg(Color::Cyan)),
            Span::raw(" open · "),
            Span::styled("ctrl+r", Style::default().fg(Color::Cyan)),
            Span::raw(" refresh · "),
            Span::styled("esc", Style::default().fg(Color::Cyan)),
            Span::raw(" cancel "),
            Span::styled(
                format!("{}/{}", self.list.visible().len(), self.picker.items().len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]))
        .style(Style::default().fg(Color::Gray));
        frame.render_widget(hints, layout[2]);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => self.cancel(),
                KeyCode::Char('n') => self.list.select_next(),
                KeyCode::Char('p') => self.list.select_previous(),
                KeyCode::Char('u') => {
                    self.prompt.clear();
                    self.refresh_visible();
                }
                KeyCode::Char('r') => {
                    self.picker.show()?;
                    self.refresh_visible();
                    self.pull_notices();
                }
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => self.cancel(),
            KeyCode::Enter => self.accept()?,
            KeyCode::Down => self.list.select_next(),
            KeyCode::Up => self.list.select_previous(),
            KeyCode::Backspace => {
                self.prompt.pop_char();
                self.refresh_visible();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::ALT) => {
                self.prompt.push_char(ch);
                self.refresh_visible();
            }
            _ => {}
        }
        Ok(())
    }

    fn accept(&mut self) -> Result<()> {
        let selected = self.list.selected_item();
        if self.picker.accept(selected)? {
            self.outcome = Some(Outcome::Accepted);
        }
        Ok(())
    }

    fn cancel(&mut self) {
        self.picker.hide();
        self.outcome = Some(Outcome::Cancelled);
    }

    fn refresh_visible(&mut self) {
        let visible = self.picker.filter(self.prompt.input());
        self.list.set_visible(visible);
        self.list.reset_selection();
    }

    fn pull_notices(&mut self) {
        for notice in self.picker.host_mut().take_notices() {
            self.prompt.show_notice(notice);
        }
    }
}

/// Window title: the repository root and branch when inside a repository,
/// otherwise the workspace root.
fn title_for(root: Option<&Path>) -> String {
    let Some(root) = root else {
        return "mpick".to_owned();
    };
    match metadata_for_path(root) {
        Some(GitMetadata {
            branch: Some(branch),
            root: repo_root,
        }) => format!("mpick · {} ({branch})", repo_root.display()),
        Some(GitMetadata { root: repo_root, .. }) => format!("mpick · {}", repo_root.display()),
        None => format!("mpick · {}", root.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use ratatui::backend::TestBackend;

    use crate::app::picker::PickerState;
    use crate::domain::model::{CommandContribution, Contributes, ExtensionManifest};
    use crate::infra::config::Config;
    use crate::infra::dispatch::{Dispatcher, Effect};
    use crate::infra::session::HostSnapshot;

    fn app(root: &Path) -> UiApp {
        let snapshot = HostSnapshot {
            workspace_folders: vec![root.to_path_buf()],
            ..HostSnapshot::default()
        };
        let extensions = vec![ExtensionManifest {
            id: "ext".into(),
            contributes: Some(Contributes {
                commands: Some(vec![CommandContribution {
                    command: "ext.hello".into(),
                    title: None,
                }]),
            }),
        }];
        let mut config = Config::default();
        config.sources.git = Some(false);
        let host = TerminalHost::new(
            snapshot,
            extensions,
            Dispatcher::new(config.dispatch.clone()),
        );
        UiApp::new(Picker::new(host, config))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_query(app: &mut UiApp, query: &str) -> Result<()> {
        for ch in query.chars() {
            app.handle_key_event(key(KeyCode::Char(ch)))?;
        }
        Ok(())
    }

    #[test]
    fn filtering_and_accepting_records_effect() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::write(temp.path().join("notes.md"), "")?;
        fs::write(temp.path().join("todo.txt"), "")?;

        let mut app = app(temp.path());
        app.bootstrap()?;
        assert_eq!(app.list.visible().len(), 3);

        type_query(&mut app, "TODO")?;
        assert_eq!(app.list.visible().len(), 1);

        app.handle_key_event(key(KeyCode::Enter))?;
        assert_eq!(app.outcome, Some(Outcome::Accepted));

        let picker = app.into_picker();
        assert_eq!(picker.state(), PickerState::Closed);
        assert_eq!(
            picker.host().effects(),
            &[Effect::Open(temp.path().join("todo.txt"))]
        );
        Ok(())
    }

    #[test]
    fn enter_with_no_match_keeps_picker_open() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut app = app(temp.path());
        app.bootstrap()?;

        type_query(&mut app, "nothing matches this")?;
        app.handle_key_event(key(KeyCode::Enter))?;
        assert_eq!(app.outcome, None);
        assert!(app.picker.is_open());
        Ok(())
    }

    #[test]
    fn escape_cancels_without_effects() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut app = app(temp.path());
        app.bootstrap()?;

        app.handle_key_event(key(KeyCode::Down))?;
        app.handle_key_event(key(KeyCode::Esc))?;
        assert_eq!(app.outcome, Some(Outcome::Cancelled));
        assert!(app.into_picker().host().effects().is_empty());
        Ok(())
    }

    #[test]
    fn title_names_repository_root_and_branch() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let repo = temp.path().join("checkout");
        fs::create_dir_all(repo.join("src"))?;
        gix::init(&repo)?;

        let title = title_for(Some(&repo.join("src")));
        assert!(title.starts_with("mpick · "));
        assert!(title.contains("checkout ("));
        assert!(title.ends_with(')'));
        Ok(())
    }

    #[test]
    fn title_without_root_is_plain() {
        assert_eq!(title_for(None), "mpick");
    }

    #[test]
    fn renders_items_and_title() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::write(temp.path().join("readme.md"), "")?;
        let mut app = app(temp.path());
        app.bootstrap()?;

        let mut terminal = Terminal::new(TestBackend::new(80, 12))?;
        terminal.draw(|frame| app.render(frame))?;

        let buffer = terminal.backend().buffer().clone();
        let rendered: String = buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("readme.md"));
        assert!(rendered.contains("ext.hello"));
        assert!(rendered.contains("mpick"));
        Ok(())
    }
}
