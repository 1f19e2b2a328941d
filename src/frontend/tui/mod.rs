//! 端末版フロントエンド
//!
//! 端末の raw モード・代替画面・貼り付けモードは `TerminalSession` が保持し、
//! ドロップ時に必ず元へ戻す。

use crate::core::Backend;
use crate::error::{AddError, Result, UiError};
use crate::ui::Renderer;
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};
use std::time::Duration;

/// 入力待ちの間隔（分析中のスピナー更新もこの周期）
const POLL_INTERVAL: Duration = Duration::from_millis(16);

pub struct TuiApplication {
    backend: Backend,
    renderer: Renderer,
}

impl TuiApplication {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            renderer: Renderer::new(),
        }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// 終了コマンドまで入力を処理する
    pub fn run(&mut self) -> Result<()> {
        let mut session = TerminalSession::enter()?;
        log::info!("terminal ui started");
        self.event_loop(&mut session.terminal)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut needs_redraw = true;

        while self.backend.is_running() {
            needs_redraw |= self.backend.tick();
            if needs_redraw {
                self.draw(terminal)?;
                needs_redraw = false;
            }

            if !event::poll(POLL_INTERVAL).map_err(|err| terminal_error("event poll", err))? {
                continue;
            }
            needs_redraw = match event::read().map_err(|err| terminal_error("event read", err))? {
                Event::Key(key_event) => {
                    self.backend.handle_key_event(key_event);
                    true
                }
                Event::Paste(text) => {
                    self.backend.handle_paste(&text);
                    true
                }
                Event::Resize(_, _) => true,
                Event::Mouse(_) | Event::FocusGained | Event::FocusLost => false,
            };
        }

        Ok(())
    }

    fn draw<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let view = self.backend.render_view();
        self.renderer
            .render(terminal, &view)
            .map_err(|err| terminal_error("render", err))?;
        self.backend.set_page_height(self.renderer.text_height());
        Ok(())
    }
}

/// 端末状態の保持
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        enable_raw_mode().map_err(|err| terminal_error("enable raw mode", err))?;
        if let Err(err) = execute!(stdout(), EnterAlternateScreen, EnableBracketedPaste) {
            let _ = disable_raw_mode();
            return Err(terminal_error("enter alternate screen", err));
        }

        match Terminal::new(CrosstermBackend::new(stdout())) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                restore_terminal();
                Err(terminal_error("terminal init", err))
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = self.terminal.show_cursor() {
            log::warn!("failed to show cursor: {}", err);
        }
        restore_terminal();
        log::info!("terminal restored");
    }
}

fn restore_terminal() {
    if let Err(err) = execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen) {
        log::warn!("failed to leave alternate screen: {}", err);
    }
    if let Err(err) = disable_raw_mode() {
        log::warn!("failed to disable raw mode: {}", err);
    }
}

fn terminal_error(context: &str, err: impl std::fmt::Display) -> AddError {
    AddError::Ui(UiError::RenderingFailed {
        component: format!("{}: {}", context, err),
    })
}
