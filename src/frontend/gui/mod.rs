#![cfg(feature = "gui")]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::core::{Mode, Reaction, Session};
use crate::error::{AddError, MessageLevel, Result, UiError};
use crate::input::{Command, Key, KeyCode, KeyMap};
use crate::ui::StatusLineInfo;
use slint::{ComponentHandle, SharedString, Timer, TimerMode};

mod components;
use components::AppWindow;

/// デスクトップ版アプリケーション
///
/// テキストの編集はネイティブの `TextEdit` が担い、ショートカットだけを
/// セッションへ渡す。
pub struct GuiApplication {
    session: Rc<RefCell<Session>>,
    keymap: Rc<KeyMap>,
    window: AppWindow,
    timer: Timer,
}

impl GuiApplication {
    pub fn new(session: Session) -> Result<Self> {
        let window = AppWindow::new().map_err(gui_error)?;
        window.set_text(SharedString::from(session.document().text()));
        let keymap = KeyMap::for_variant(session.variant());

        Ok(Self {
            session: Rc::new(RefCell::new(session)),
            keymap: Rc::new(keymap),
            window,
            timer: Timer::default(),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.setup_callbacks();
        self.start_timer();
        update_view(&self.window, &self.session.borrow(), &self.keymap);

        self.window.show().map_err(gui_error)?;
        self.window.invoke_focus_editor();
        slint::run_event_loop().map_err(gui_error)?;
        Ok(())
    }

    fn setup_callbacks(&mut self) {
        let session = self.session.clone();
        let keymap = self.keymap.clone();
        let window_weak = self.window.as_weak();
        self.window.on_shortcut(move |text| {
            let Some(key) = shortcut_key(text.as_str()) else {
                return false;
            };
            let Some(command) = keymap.lookup(&key) else {
                return false;
            };
            run_command(&session, &keymap, &window_weak, command)
        });

        let session = self.session.clone();
        let keymap = self.keymap.clone();
        let window_weak = self.window.as_weak();
        self.window.on_text_edited(move |text| {
            if let Ok(mut session) = session.try_borrow_mut() {
                session.update_text(text.as_str());
                if let Some(window) = window_weak.upgrade() {
                    update_view(&window, &session, &keymap);
                }
            }
        });

        let session = self.session.clone();
        let keymap = self.keymap.clone();
        let window_weak = self.window.as_weak();
        self.window.on_prompt_accepted(move |text| {
            run_command(&session, &keymap, &window_weak, Command::SubmitPrompt(text.to_string()));
        });

        let session = self.session.clone();
        let keymap = self.keymap.clone();
        let window_weak = self.window.as_weak();
        self.window.on_prompt_cancelled(move || {
            run_command(&session, &keymap, &window_weak, Command::Cancel);
        });

        let session = self.session.clone();
        let keymap = self.keymap.clone();
        let window_weak = self.window.as_weak();
        self.window.on_analysis_closed(move || {
            run_command(&session, &keymap, &window_weak, Command::DismissAnalysis);
        });
    }

    fn start_timer(&mut self) {
        let session = self.session.clone();
        let keymap = self.keymap.clone();
        let window_weak = self.window.as_weak();

        self.timer
            .start(TimerMode::Repeated, Duration::from_millis(80), move || {
                let Ok(mut session) = session.try_borrow_mut() else {
                    return;
                };
                if session.tick() {
                    if let Some(window) = window_weak.upgrade() {
                        update_view(&window, &session, &keymap);
                    }
                }
            });
    }
}

/// コマンドを実行してウィジェットへ反映する。キー入力を消費したら true
fn run_command(
    session: &Rc<RefCell<Session>>,
    keymap: &KeyMap,
    window: &slint::Weak<AppWindow>,
    command: Command,
) -> bool {
    let Some(app) = window.upgrade() else {
        return false;
    };
    let (reaction, selection) = {
        let Ok(mut session) = session.try_borrow_mut() else {
            return false;
        };
        let reaction = session.execute(command);
        let selection = match &reaction {
            Reaction::JumpTo(span) => Some(span.byte_range(session.document().text())),
            _ => None,
        };
        update_view(&app, &session, keymap);
        (reaction, selection)
    };

    match reaction {
        Reaction::OpenPrompt { kind, initial } => {
            app.set_prompt_label(SharedString::from(kind.label()));
            app.set_prompt_input(SharedString::from(initial));
            app.set_prompt_visible(true);
            app.invoke_focus_prompt();
        }
        Reaction::JumpTo(_) => {
            if let Some(range) = selection {
                app.invoke_select_range(range.start as i32, range.end as i32);
            }
        }
        // カットはウィジェット標準の処理に任せる
        Reaction::Cut => return false,
        Reaction::Quit => {
            let _ = slint::quit_event_loop();
        }
        Reaction::None => {}
    }
    true
}

/// セッションの状態をウィンドウへ反映
fn update_view(app: &AppWindow, session: &Session, keymap: &KeyMap) {
    let document = session.document();
    let name = document.display_name();
    let dirty = if document.is_dirty() { "*" } else { "" };
    app.set_window_title(SharedString::from(format!("{}{} - add", name, dirty)));

    let info = StatusLineInfo {
        file_label: &name,
        is_modified: document.is_dirty(),
        hints: keymap.hints(),
        busy: session.analysis_elapsed().filter(|_| session.is_busy()),
    };
    app.set_status_label(SharedString::from(info.text().trim()));
    app.set_busy(session.is_busy());

    let (message, level) = match session.status_message() {
        Some(status) => (
            status.text.clone(),
            match status.level {
                MessageLevel::Info => 0,
                MessageLevel::Warning => 1,
                MessageLevel::Error => 2,
            },
        ),
        None => (String::new(), 0),
    };
    app.set_status_message(SharedString::from(message));
    app.set_status_level(level);

    let prompting = matches!(session.mode(), Mode::Prompting(_));
    if !prompting && app.get_prompt_visible() {
        app.set_prompt_visible(false);
        app.invoke_focus_editor();
    }

    let viewing = session.mode() == Mode::ViewingAnalysis;
    app.set_analysis_visible(viewing);
    if viewing {
        app.set_analysis_text(SharedString::from(session.analysis().unwrap_or_default()));
    }
}

/// slint のキーテキストを内部のキーへ変換
fn shortcut_key(text: &str) -> Option<Key> {
    if text == "escape" {
        return Some(Key::plain(KeyCode::Esc));
    }
    let mut chars = text.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(Key::ctrl(resolve_character(ch)))
}

/// Ctrl 併用時に制御文字で届いた場合は英字へ戻す
fn resolve_character(ch: char) -> char {
    match ch {
        '\u{0001}'..='\u{001A}' => char::from(b'a' + (ch as u8 - 1)),
        _ => ch.to_ascii_lowercase(),
    }
}

fn gui_error(err: impl std::fmt::Display) -> AddError {
    AddError::Ui(UiError::RenderingFailed {
        component: format!("GUI: {}", err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_key_mapping() {
        assert_eq!(shortcut_key("s"), Some(Key::ctrl('s')));
        assert_eq!(shortcut_key("S"), Some(Key::ctrl('s')));
        assert_eq!(shortcut_key("\u{0013}"), Some(Key::ctrl('s')));
        assert_eq!(shortcut_key("escape"), Some(Key::plain(KeyCode::Esc)));
        assert_eq!(shortcut_key(""), None);
    }
}
