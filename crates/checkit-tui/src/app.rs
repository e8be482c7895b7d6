use crate::controller::{LoadResult, Mode, PanelController};
use crate::events::{self, Event, EventHandler};
use crate::ui;
use checkit_core::{AppConfig, CheckitResult, TextField};
use checkit_persistence::ConfigStore;
use checkit_sheets::SheetLoader;
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

pub struct App {
    pub should_quit: bool,
    pub controller: PanelController,
    load_rx: mpsc::UnboundedReceiver<LoadResult>,
}

enum Step {
    Input(Option<Event>),
    Loaded(Option<LoadResult>),
}

impl App {
    pub fn new(store: Arc<dyn ConfigStore>, loader: SheetLoader, settings: AppConfig) -> Self {
        let (controller, load_rx) = PanelController::new(store, loader, settings);
        Self {
            should_quit: false,
            controller,
            load_rx,
        }
    }

    pub async fn handle_key_event(&mut self, key: KeyEvent) {
        match self.controller.mode {
            Mode::Normal => self.handle_normal_key(key).await,
            Mode::Search => self.handle_search_key(key),
            Mode::Export(_) => self.handle_export_key(key),
            Mode::Options(_) => self.handle_options_key(key).await,
            Mode::Help => self.controller.mode = Mode::Normal,
        }
    }

    async fn handle_normal_key(&mut self, key: KeyEvent) {
        if events::should_quit(&key) {
            self.should_quit = true;
            return;
        }
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Up if shift => self.move_selected(-1).await,
            KeyCode::Down if shift => self.move_selected(1).await,
            KeyCode::Char('K') => self.move_selected(-1).await,
            KeyCode::Char('J') => self.move_selected(1).await,
            KeyCode::Char('j') | KeyCode::Down => self.controller.cursor_down(),
            KeyCode::Char('k') | KeyCode::Up => self.controller.cursor_up(),
            KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => self.controller.next_tab(),
            KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => self.controller.prev_tab(),
            KeyCode::Enter | KeyCode::Char(' ') => self.controller.activate(),
            KeyCode::Char('/') => self.controller.mode = Mode::Search,
            KeyCode::Char('r') => {
                self.controller.request_refresh().await;
            }
            KeyCode::Char('e') => self.controller.open_export(),
            KeyCode::Char('o') => self.controller.open_options().await,
            KeyCode::Char('?') => self.controller.mode = Mode::Help,
            _ => {}
        }
    }

    async fn move_selected(&mut self, direction: isize) {
        // failures are surfaced through the banner
        let _ = self.controller.move_selected(direction).await;
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.controller.search.clear();
                self.controller.apply_search();
                self.controller.mode = Mode::Normal;
            }
            KeyCode::Enter => {
                self.controller.apply_search();
                self.controller.mode = Mode::Normal;
            }
            _ => {
                if edit_field(&mut self.controller.search, key) {
                    self.controller.search_changed(Instant::now());
                }
            }
        }
    }

    fn handle_export_key(&mut self, key: KeyEvent) {
        let Mode::Export(form) = &mut self.controller.mode else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.controller.mode = Mode::Normal,
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Enter => {
                if let Err(e) = self.controller.submit_export() {
                    tracing::debug!("Export not written: {}", e);
                }
            }
            _ => {
                edit_field(form.focused_mut(), key);
            }
        }
    }

    async fn handle_options_key(&mut self, key: KeyEvent) {
        let Mode::Options(form) = &mut self.controller.mode else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.controller.mode = Mode::Normal,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.toggle_field(),
            KeyCode::Enter => {
                if let Err(e) = self.controller.save_options().await {
                    tracing::debug!("Options not saved: {}", e);
                }
            }
            _ => {
                edit_field(form.focused_mut(), key);
            }
        }
    }

    pub async fn run(&mut self) -> CheckitResult<()> {
        let mut terminal = setup_terminal()?;
        let mut events = EventHandler::new();

        self.controller.request_refresh().await;

        while !self.should_quit {
            terminal.draw(|frame| ui::render(&self.controller, frame))?;

            let step = tokio::select! {
                event = events.next() => Step::Input(event),
                result = self.load_rx.recv() => Step::Loaded(result),
            };

            match step {
                Step::Input(Some(Event::Key(key))) => self.handle_key_event(key).await,
                Step::Input(Some(Event::Tick)) => self.controller.tick(Instant::now()),
                Step::Loaded(Some(result)) => self.controller.apply_load(result),
                Step::Input(None) | Step::Loaded(None) => self.should_quit = true,
            }
        }

        events.stop();
        restore_terminal(&mut terminal)?;
        Ok(())
    }
}

/// Applies an editing key to a text field. Returns whether the text changed.
fn edit_field(field: &mut TextField, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => field.insert_char(c),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left => {
            field.move_left();
            false
        }
        KeyCode::Right => {
            field.move_right();
            false
        }
        KeyCode::Home => {
            field.move_home();
            false
        }
        KeyCode::End => {
            field.move_end();
            false
        }
        _ => false,
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
