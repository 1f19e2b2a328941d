//! キーバインドシステム
//!
//! 固定のショートカットをコマンドへ対応付ける。端末版と GUI 版で
//! 同じ意味のキーを共有し、差分（保存して終了 / カット）だけを切り替える。

use super::commands::{Command, Direction, EditAction};
use crossterm::event::{KeyCode as CrosstermKeyCode, KeyEvent, KeyModifiers as CrosstermModifiers};
use std::collections::HashMap;

/// キー入力の内部表現
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    /// 修飾キー
    pub modifiers: KeyModifiers,
    /// 基本キー
    pub code: KeyCode,
}

/// 修飾キーの組み合わせ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// 基本キーコード
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Esc,
    Unknown,
}

impl Key {
    /// 修飾なしのキー
    pub fn plain(code: KeyCode) -> Self {
        Self {
            modifiers: KeyModifiers::default(),
            code,
        }
    }

    /// Ctrl+文字
    pub fn ctrl(ch: char) -> Self {
        Self {
            modifiers: KeyModifiers {
                ctrl: true,
                alt: false,
                shift: false,
            },
            code: KeyCode::Char(ch.to_ascii_lowercase()),
        }
    }

    /// 挿入可能な文字かどうかを判定
    pub fn is_insertable_char(&self) -> bool {
        matches!(self.code, KeyCode::Char(_)) && !self.modifiers.ctrl && !self.modifiers.alt
    }

    /// プロンプト取り消しキー（Esc / C-g）
    pub fn is_cancel(&self) -> bool {
        matches!(self.code, KeyCode::Esc)
            || (self.modifiers.ctrl && matches!(self.code, KeyCode::Char('g')))
    }

    /// 比較用に正規化（Ctrl 併用時の Shift と大文字を無視）
    fn normalized(&self) -> Self {
        match self.code {
            KeyCode::Char(ch) if self.modifiers.ctrl => Key::ctrl(ch),
            _ => self.clone(),
        }
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        let modifiers = KeyModifiers {
            ctrl: event.modifiers.contains(CrosstermModifiers::CONTROL),
            alt: event.modifiers.contains(CrosstermModifiers::ALT),
            shift: event.modifiers.contains(CrosstermModifiers::SHIFT),
        };

        let code = match event.code {
            CrosstermKeyCode::Char(c) => KeyCode::Char(c),
            CrosstermKeyCode::Enter => KeyCode::Enter,
            CrosstermKeyCode::Backspace => KeyCode::Backspace,
            CrosstermKeyCode::Delete => KeyCode::Delete,
            CrosstermKeyCode::Tab => KeyCode::Tab,
            CrosstermKeyCode::Up => KeyCode::Up,
            CrosstermKeyCode::Down => KeyCode::Down,
            CrosstermKeyCode::Left => KeyCode::Left,
            CrosstermKeyCode::Right => KeyCode::Right,
            CrosstermKeyCode::Home => KeyCode::Home,
            CrosstermKeyCode::End => KeyCode::End,
            CrosstermKeyCode::PageUp => KeyCode::PageUp,
            CrosstermKeyCode::PageDown => KeyCode::PageDown,
            CrosstermKeyCode::Esc => KeyCode::Esc,
            _ => KeyCode::Unknown,
        };

        Self { modifiers, code }
    }
}

/// フロントエンドの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// 端末版
    Terminal,
    /// デスクトップ GUI 版
    Desktop,
}

/// キーマップ
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<Key, Command>,
    hints: Vec<(&'static str, &'static str)>,
}

impl KeyMap {
    /// フロントエンドに応じたキーマップを作成
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Terminal => Self::terminal(),
            Variant::Desktop => Self::desktop(),
        }
    }

    /// 端末版のキーマップ
    pub fn terminal() -> Self {
        let mut map = Self::common();
        map.bind(Key::ctrl('x'), Command::SaveAndExit, "C-x", "Save & Exit");
        map
    }

    /// GUI 版のキーマップ
    pub fn desktop() -> Self {
        let mut map = Self::common();
        map.bind(Key::ctrl('x'), Command::Cut, "C-x", "Cut");
        map
    }

    fn common() -> Self {
        let mut map = Self {
            bindings: HashMap::new(),
            hints: Vec::new(),
        };
        map.bind(Key::ctrl('h'), Command::Save, "C-h", "Save");
        map.bind(Key::ctrl('s'), Command::Search, "C-s", "Search");
        map.bind(Key::ctrl('r'), Command::Rename, "C-r", "Rename");
        map.bind(Key::ctrl('a'), Command::Analyze, "C-a", "Analyze");
        map.bindings.insert(Key::plain(KeyCode::Esc), Command::Cancel);
        map.bindings.insert(Key::ctrl('g'), Command::Cancel);
        map
    }

    fn bind(&mut self, key: Key, command: Command, label: &'static str, description: &'static str) {
        self.bindings.insert(key, command);
        self.hints.push((label, description));
    }

    /// キーに対応するコマンド
    pub fn lookup(&self, key: &Key) -> Option<Command> {
        self.bindings.get(&key.normalized()).cloned()
    }

    /// ステータスライン用のキー説明
    pub fn hints(&self) -> &[(&'static str, &'static str)] {
        &self.hints
    }

    /// コマンドに割り当てられていないキーを編集操作へ変換
    pub fn edit_action(&self, key: &Key) -> Option<EditAction> {
        if key.is_insertable_char() {
            if let KeyCode::Char(ch) = key.code {
                return Some(EditAction::InsertChar(ch));
            }
        }

        let action = match (&key.code, key.modifiers.ctrl) {
            (KeyCode::Enter, _) => EditAction::InsertNewline,
            (KeyCode::Tab, false) => EditAction::InsertTab,
            (KeyCode::Backspace, _) => EditAction::DeleteBackward,
            (KeyCode::Delete, _) => EditAction::DeleteForward,
            (KeyCode::Up, _) => EditAction::Move(Direction::Up),
            (KeyCode::Down, _) => EditAction::Move(Direction::Down),
            (KeyCode::Left, _) => EditAction::Move(Direction::Left),
            (KeyCode::Right, _) => EditAction::Move(Direction::Right),
            (KeyCode::Home, true) => EditAction::BufferStart,
            (KeyCode::End, true) => EditAction::BufferEnd,
            (KeyCode::Home, false) => EditAction::LineStart,
            (KeyCode::End, false) => EditAction::LineEnd,
            (KeyCode::PageUp, _) => EditAction::PageUp,
            (KeyCode::PageDown, _) => EditAction::PageDown,
            _ => return None,
        };
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl_event(ch: char) -> KeyEvent {
        KeyEvent::new(CrosstermKeyCode::Char(ch), CrosstermModifiers::CONTROL)
    }

    #[test]
    fn terminal_shortcuts() {
        let map = KeyMap::terminal();
        assert_eq!(map.lookup(&ctrl_event('h').into()), Some(Command::Save));
        assert_eq!(map.lookup(&ctrl_event('x').into()), Some(Command::SaveAndExit));
        assert_eq!(map.lookup(&ctrl_event('s').into()), Some(Command::Search));
        assert_eq!(map.lookup(&ctrl_event('r').into()), Some(Command::Rename));
        assert_eq!(map.lookup(&ctrl_event('a').into()), Some(Command::Analyze));
        assert_eq!(map.lookup(&Key::plain(KeyCode::Esc)), Some(Command::Cancel));
    }

    #[test]
    fn desktop_binds_cut_instead_of_exit() {
        let map = KeyMap::desktop();
        assert_eq!(map.lookup(&Key::ctrl('x')), Some(Command::Cut));
        assert!(!map.hints().iter().any(|(_, d)| *d == "Save & Exit"));
    }

    #[test]
    fn variant_selects_keymap() {
        let terminal = KeyMap::for_variant(Variant::Terminal);
        let desktop = KeyMap::for_variant(Variant::Desktop);
        assert_eq!(terminal.lookup(&Key::ctrl('x')), Some(Command::SaveAndExit));
        assert_eq!(desktop.lookup(&Key::ctrl('x')), Some(Command::Cut));
        assert_eq!(desktop.hints(), KeyMap::desktop().hints());
    }

    #[test]
    fn shift_with_ctrl_is_ignored() {
        let map = KeyMap::terminal();
        let event = KeyEvent::new(
            CrosstermKeyCode::Char('S'),
            CrosstermModifiers::CONTROL | CrosstermModifiers::SHIFT,
        );
        assert_eq!(map.lookup(&event.into()), Some(Command::Search));
    }

    #[test]
    fn plain_characters_are_edits() {
        let map = KeyMap::terminal();
        let key: Key = KeyEvent::new(CrosstermKeyCode::Char('a'), CrosstermModifiers::NONE).into();
        assert_eq!(map.lookup(&key), None);
        assert_eq!(map.edit_action(&key), Some(EditAction::InsertChar('a')));

        let shifted: Key = KeyEvent::new(CrosstermKeyCode::Char('A'), CrosstermModifiers::SHIFT).into();
        assert_eq!(map.edit_action(&shifted), Some(EditAction::InsertChar('A')));

        assert_eq!(map.edit_action(&Key::ctrl('q')), None);
    }
}
