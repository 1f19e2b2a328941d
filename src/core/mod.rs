//! コアモジュール
//!
//! コマンドディスパッチと編集セッション、端末版のバックエンド

pub mod dispatch;
pub mod session;

pub use dispatch::{dispatch, DispatchContext, Effect, Mode, Notice, PromptKind, Transition};
pub use session::{Reaction, Session};

use crate::ai::Analyzer;
use crate::editor::TextBuffer;
use crate::error::StatusMessage;
use crate::file::Document;
use crate::input::{Command, Key, KeyCode, KeyMap, Variant};
use crate::minibuffer::{Minibuffer, PromptResult};
use crate::search::SearchHighlight;
use crossterm::event::{KeyEvent, KeyEventKind};
use std::path::Path;
use std::time::Duration;

/// 分析結果の1回あたりのページ送り行数
const ANALYSIS_PAGE: u16 = 10;

/// 端末版のバックエンド
///
/// セッションに加えて、端末で編集するためのテキストバッファとミニバッファを持つ。
#[derive(Debug)]
pub struct Backend {
    session: Session,
    buffer: TextBuffer,
    minibuffer: Minibuffer,
    keymap: KeyMap,
    analysis_scroll: u16,
    page_height: usize,
}

/// 描画に必要な状態の参照
#[derive(Debug)]
pub struct RenderView<'a> {
    pub buffer: &'a TextBuffer,
    pub path: Option<&'a Path>,
    pub file_label: String,
    pub is_modified: bool,
    pub mode: Mode,
    pub minibuffer: &'a Minibuffer,
    pub status: Option<&'a StatusMessage>,
    pub highlights: Vec<SearchHighlight>,
    pub hints: &'a [(&'static str, &'static str)],
    pub analysis: Option<&'a str>,
    pub analysis_scroll: u16,
    pub analysis_elapsed: Option<Duration>,
}

impl Backend {
    pub fn new(document: Document, analyzer: Analyzer) -> Self {
        let buffer = TextBuffer::from_text(document.text());
        Self {
            session: Session::new(document, analyzer, Variant::Terminal),
            buffer,
            minibuffer: Minibuffer::new(),
            keymap: KeyMap::terminal(),
            analysis_scroll: 0,
            page_height: 1,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn minibuffer(&self) -> &Minibuffer {
        &self.minibuffer
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    /// PageUp/PageDown の移動量（テキスト領域の高さ）
    pub fn set_page_height(&mut self, height: usize) {
        self.page_height = height.max(1);
    }

    /// 定期処理。表示更新が必要なら true
    pub fn tick(&mut self) -> bool {
        let changed = self.session.tick();
        if self.session.mode() != Mode::ViewingAnalysis {
            self.analysis_scroll = 0;
        }
        changed
    }

    /// crossterm のキーイベントを処理（押下のみ）
    pub fn handle_key_event(&mut self, event: KeyEvent) {
        if event.kind != KeyEventKind::Press {
            return;
        }
        self.handle_key(Key::from(event));
    }

    /// キー入力を処理
    pub fn handle_key(&mut self, key: Key) {
        match self.session.mode() {
            Mode::Prompting(_) => self.handle_prompt_key(&key),
            Mode::ViewingAnalysis => self.handle_analysis_key(&key),
            Mode::AwaitingAiResult => {
                if key.is_cancel() {
                    self.execute(Command::Cancel);
                } else if let Some(command) = self.keymap.lookup(&key) {
                    self.execute(command);
                }
            }
            Mode::Editing => {
                if let Some(command) = self.keymap.lookup(&key) {
                    self.execute(command);
                } else if let Some(action) = self.keymap.edit_action(&key) {
                    if self.buffer.apply(&action, self.page_height) {
                        self.sync_text();
                    }
                    self.session.set_cursor_offset(self.buffer.char_offset());
                }
            }
        }
    }

    /// 貼り付け
    pub fn handle_paste(&mut self, text: &str) {
        match self.session.mode() {
            Mode::Prompting(_) => self.minibuffer.insert_str(text),
            Mode::Editing => {
                self.buffer.insert_str(text);
                self.sync_text();
                self.session.set_cursor_offset(self.buffer.char_offset());
            }
            Mode::AwaitingAiResult | Mode::ViewingAnalysis => {}
        }
    }

    fn handle_prompt_key(&mut self, key: &Key) {
        match self.minibuffer.handle_key(key) {
            PromptResult::Completed(input) => self.execute(Command::SubmitPrompt(input)),
            PromptResult::Cancelled => self.execute(Command::Cancel),
            PromptResult::InProgress => {}
        }
    }

    fn handle_analysis_key(&mut self, key: &Key) {
        match key.code {
            KeyCode::Up => self.analysis_scroll = self.analysis_scroll.saturating_sub(1),
            KeyCode::Down => self.analysis_scroll = self.analysis_scroll.saturating_add(1),
            KeyCode::PageUp => {
                self.analysis_scroll = self.analysis_scroll.saturating_sub(ANALYSIS_PAGE)
            }
            KeyCode::PageDown => {
                self.analysis_scroll = self.analysis_scroll.saturating_add(ANALYSIS_PAGE)
            }
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => {
                self.execute(Command::DismissAnalysis)
            }
            _ if key.is_cancel() => self.execute(Command::DismissAnalysis),
            _ => {}
        }
    }

    fn execute(&mut self, command: Command) {
        match self.session.execute(command) {
            Reaction::OpenPrompt { kind, initial } => self.minibuffer.start(kind, initial),
            Reaction::JumpTo(span) => self.buffer.move_to_char_offset(span.start),
            Reaction::Cut | Reaction::Quit | Reaction::None => {}
        }

        if !matches!(self.session.mode(), Mode::Prompting(_)) && self.minibuffer.is_active() {
            self.minibuffer.end();
        }
    }

    fn sync_text(&mut self) {
        let text = self.buffer.text();
        self.session.update_text(&text);
    }

    /// 描画用ビュー
    pub fn render_view(&self) -> RenderView<'_> {
        let document = self.session.document();
        RenderView {
            buffer: &self.buffer,
            path: document.path(),
            file_label: document.display_name(),
            is_modified: document.is_dirty(),
            mode: self.session.mode(),
            minibuffer: &self.minibuffer,
            status: self.session.status_message(),
            highlights: self.session.search().highlights(document.text()),
            hints: self.keymap.hints(),
            analysis: self.session.analysis(),
            analysis_scroll: self.analysis_scroll,
            analysis_elapsed: self.session.analysis_elapsed(),
        }
    }
}
