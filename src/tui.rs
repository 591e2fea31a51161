use crate::types::AppResult;
use crate::ui::player_panel::PlayerSnapshot;
use crate::ui::ui::Ui;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, KeyEvent, MouseEvent};
use crossterm::terminal::Clear;
use crossterm::terminal::SetTitle;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self};
use std::panic;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

#[derive(Debug)]
pub struct Tui<B: Backend> {
    pub terminal: Terminal<B>,
    raw_mode: bool,
}

impl Tui<CrosstermBackend<io::Stdout>> {
    pub fn new_local() -> AppResult<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        let mut tui = Self {
            terminal,
            raw_mode: true,
        };
        tui.init()?;
        Ok(tui)
    }

    fn init(&mut self) -> AppResult<()> {
        terminal::enable_raw_mode()?;

        crossterm::execute!(
            self.terminal.backend_mut(),
            EnterAlternateScreen,
            EnableMouseCapture,
            SetTitle("Tiny player"),
            Clear(crossterm::terminal::ClearType::All),
            Hide
        )?;

        // Define a custom panic hook to reset the terminal properties.
        // This way, you won't have your terminal messed up if an unexpected error happens.
        let panic_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic| {
            if let Err(e) = Self::reset() {
                eprintln!("failed to reset the terminal: {e}");
            }
            panic_hook(panic);
        }));

        Ok(())
    }

    fn reset() -> AppResult<()> {
        crossterm::execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            Clear(crossterm::terminal::ClearType::All),
            Show
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl<B: Backend> Tui<B> {
    /// Wraps an arbitrary backend without touching the real terminal.
    pub fn headless(backend: B) -> AppResult<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            raw_mode: false,
        })
    }

    pub fn draw(&mut self, ui: &mut Ui, snapshot: &PlayerSnapshot) -> AppResult<()> {
        self.terminal.draw(|frame| ui.render(frame, snapshot))?;
        Ok(())
    }

    pub fn resize(&mut self, size: (u16, u16)) -> AppResult<()> {
        self.terminal.resize(Rect {
            x: 0,
            y: 0,
            width: size.0,
            height: size.1,
        })?;
        Ok(())
    }

    pub fn exit(&mut self) -> AppResult<()> {
        if self.raw_mode {
            crossterm::execute!(
                io::stdout(),
                LeaveAlternateScreen,
                DisableMouseCapture,
                Clear(crossterm::terminal::ClearType::All),
                Show
            )?;
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}
