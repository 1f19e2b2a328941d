//! プロンプト管理
//!
//! 検索語・新しいファイル名などの1行入力を受け付ける

use crate::core::PromptKind;
use crate::input::{Key, KeyCode};

/// プロンプトの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    /// 入力が完了した
    Completed(String),
    /// 入力がキャンセルされた
    Cancelled,
    /// 入力継続中
    InProgress,
}

/// ミニバッファ
#[derive(Debug, Clone, Default)]
pub struct Minibuffer {
    /// 表示中のプロンプト
    kind: Option<PromptKind>,
    /// 現在の入力内容
    input: String,
}

impl Minibuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// プロンプトを開始（`initial` は初期入力）
    pub fn start(&mut self, kind: PromptKind, initial: impl Into<String>) {
        self.kind = Some(kind);
        self.input = initial.into();
    }

    /// プロンプトを終了
    pub fn end(&mut self) {
        self.kind = None;
        self.input.clear();
    }

    pub fn is_active(&self) -> bool {
        self.kind.is_some()
    }

    /// プロンプトメッセージ
    pub fn message(&self) -> &'static str {
        self.kind.map_or("", |kind| kind.label())
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// キー入力を処理
    pub fn handle_key(&mut self, key: &Key) -> PromptResult {
        if !self.is_active() {
            return PromptResult::Cancelled;
        }

        if key.is_cancel() {
            self.end();
            return PromptResult::Cancelled;
        }

        match key.code {
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.input);
                self.end();
                PromptResult::Completed(input)
            }
            KeyCode::Backspace => {
                self.input.pop();
                PromptResult::InProgress
            }
            KeyCode::Char(ch) if key.is_insertable_char() => {
                self.input.push(ch);
                PromptResult::InProgress
            }
            _ => PromptResult::InProgress,
        }
    }

    /// 貼り付け（改行は無視）
    pub fn insert_str(&mut self, text: &str) {
        if self.is_active() {
            self.input.extend(text.chars().filter(|ch| !ch.is_control()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyModifiers;

    fn key(code: KeyCode) -> Key {
        Key::plain(code)
    }

    #[test]
    fn inactive_by_default() {
        let minibuffer = Minibuffer::new();
        assert!(!minibuffer.is_active());
        assert_eq!(minibuffer.message(), "");
        assert_eq!(minibuffer.input(), "");
    }

    #[test]
    fn typing_and_completing() {
        let mut minibuffer = Minibuffer::new();
        minibuffer.start(PromptKind::Search, "");

        assert_eq!(minibuffer.handle_key(&key(KeyCode::Char('a'))), PromptResult::InProgress);
        assert_eq!(minibuffer.handle_key(&key(KeyCode::Char('b'))), PromptResult::InProgress);
        assert_eq!(minibuffer.handle_key(&key(KeyCode::Backspace)), PromptResult::InProgress);
        assert_eq!(minibuffer.input(), "a");

        assert_eq!(
            minibuffer.handle_key(&key(KeyCode::Enter)),
            PromptResult::Completed("a".to_string())
        );
        assert!(!minibuffer.is_active());
    }

    #[test]
    fn initial_text_is_editable() {
        let mut minibuffer = Minibuffer::new();
        minibuffer.start(PromptKind::Search, "foo");
        minibuffer.handle_key(&key(KeyCode::Char('d')));
        assert_eq!(minibuffer.input(), "food");
        assert_eq!(minibuffer.message(), PromptKind::Search.label());
    }

    #[test]
    fn escape_and_ctrl_g_cancel() {
        let mut minibuffer = Minibuffer::new();
        minibuffer.start(PromptKind::Rename, "x");
        assert_eq!(minibuffer.handle_key(&key(KeyCode::Esc)), PromptResult::Cancelled);
        assert!(!minibuffer.is_active());

        minibuffer.start(PromptKind::Rename, "x");
        assert_eq!(minibuffer.handle_key(&Key::ctrl('g')), PromptResult::Cancelled);
    }

    #[test]
    fn control_chords_are_ignored() {
        let mut minibuffer = Minibuffer::new();
        minibuffer.start(PromptKind::Search, "");
        let chord = Key {
            modifiers: KeyModifiers {
                ctrl: true,
                alt: false,
                shift: false,
            },
            code: KeyCode::Char('s'),
        };
        assert_eq!(minibuffer.handle_key(&chord), PromptResult::InProgress);
        assert_eq!(minibuffer.input(), "");
    }

    #[test]
    fn paste_drops_newlines() {
        let mut minibuffer = Minibuffer::new();
        minibuffer.start(PromptKind::Search, "");
        minibuffer.insert_str("ab\ncd");
        assert_eq!(minibuffer.input(), "abcd");
    }
}
