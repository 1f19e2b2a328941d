//! 端末版のテキストバッファ
//!
//! 行の配列とカーソル位置（文字単位）のみを持つ最小のバッファ。
//! 取り消し・やり直しは持たない。

use crate::input::{Direction, EditAction};

/// 空白で展開するタブ幅
pub const TAB_WIDTH: usize = 4;

/// カーソル位置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorPosition {
    /// 行番号（0ベース）
    pub line: usize,
    /// 列番号（0ベース、文字単位）
    pub column: usize,
}

#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: CursorPosition,
    /// 上下移動で維持する列
    preferred_column: Option<usize>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::from_text("")
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            cursor: CursorPosition::default(),
            preferred_column: None,
        }
    }

    /// 全文（`\n` 区切り）
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| l.chars().count())
    }

    fn byte_index(&self, line: usize, column: usize) -> usize {
        let text = &self.lines[line];
        text.char_indices()
            .nth(column)
            .map_or(text.len(), |(idx, _)| idx)
    }

    /// 編集操作を適用。テキストが変わった場合は true
    pub fn apply(&mut self, action: &EditAction, page_height: usize) -> bool {
        let page = page_height.max(1);
        match action {
            EditAction::InsertChar(ch) => {
                self.insert_char(*ch);
                true
            }
            EditAction::InsertNewline => {
                self.insert_newline();
                true
            }
            EditAction::InsertTab => {
                self.insert_str(&" ".repeat(TAB_WIDTH));
                true
            }
            EditAction::DeleteBackward => self.delete_backward(),
            EditAction::DeleteForward => self.delete_forward(),
            EditAction::Move(direction) => {
                self.move_cursor(*direction);
                false
            }
            EditAction::LineStart => {
                self.set_cursor(self.cursor.line, 0);
                false
            }
            EditAction::LineEnd => {
                self.set_cursor(self.cursor.line, self.line_len(self.cursor.line));
                false
            }
            EditAction::PageUp => {
                self.move_vertical(-(page as isize));
                false
            }
            EditAction::PageDown => {
                self.move_vertical(page as isize);
                false
            }
            EditAction::BufferStart => {
                self.set_cursor(0, 0);
                false
            }
            EditAction::BufferEnd => {
                let last = self.lines.len() - 1;
                self.set_cursor(last, self.line_len(last));
                false
            }
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        let CursorPosition { line, column } = self.cursor;
        let idx = self.byte_index(line, column);
        self.lines[line].insert(idx, ch);
        self.set_cursor(line, column + 1);
    }

    /// 貼り付けなど複数文字の挿入（`\r\n` は `\n` に揃える）
    pub fn insert_str(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        for ch in normalized.chars() {
            self.insert_char(ch);
        }
    }

    pub fn insert_newline(&mut self) {
        let CursorPosition { line, column } = self.cursor;
        let idx = self.byte_index(line, column);
        let rest = self.lines[line].split_off(idx);
        self.lines.insert(line + 1, rest);
        self.set_cursor(line + 1, 0);
    }

    pub fn delete_backward(&mut self) -> bool {
        let CursorPosition { line, column } = self.cursor;
        if column > 0 {
            let idx = self.byte_index(line, column - 1);
            self.lines[line].remove(idx);
            self.set_cursor(line, column - 1);
            true
        } else if line > 0 {
            let current = self.lines.remove(line);
            let prev_len = self.line_len(line - 1);
            self.lines[line - 1].push_str(&current);
            self.set_cursor(line - 1, prev_len);
            true
        } else {
            false
        }
    }

    pub fn delete_forward(&mut self) -> bool {
        let CursorPosition { line, column } = self.cursor;
        if column < self.line_len(line) {
            let idx = self.byte_index(line, column);
            self.lines[line].remove(idx);
            true
        } else if line + 1 < self.lines.len() {
            let next = self.lines.remove(line + 1);
            self.lines[line].push_str(&next);
            true
        } else {
            false
        }
    }

    fn move_cursor(&mut self, direction: Direction) {
        let CursorPosition { line, column } = self.cursor;
        match direction {
            Direction::Left if column > 0 => self.set_cursor(line, column - 1),
            Direction::Left if line > 0 => self.set_cursor(line - 1, self.line_len(line - 1)),
            Direction::Right if column < self.line_len(line) => self.set_cursor(line, column + 1),
            Direction::Right if line + 1 < self.lines.len() => self.set_cursor(line + 1, 0),
            Direction::Up => self.move_vertical(-1),
            Direction::Down => self.move_vertical(1),
            _ => {}
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let preferred = self.preferred_column.unwrap_or(self.cursor.column);
        let last = self.lines.len() as isize - 1;
        let target = (self.cursor.line as isize + delta).clamp(0, last) as usize;
        self.cursor = CursorPosition {
            line: target,
            column: preferred.min(self.line_len(target)),
        };
        self.preferred_column = Some(preferred);
    }

    fn set_cursor(&mut self, line: usize, column: usize) {
        let line = line.min(self.lines.len() - 1);
        self.cursor = CursorPosition {
            line,
            column: column.min(self.line_len(line)),
        };
        self.preferred_column = None;
    }

    /// カーソルの文字オフセット
    pub fn char_offset(&self) -> usize {
        self.lines[..self.cursor.line]
            .iter()
            .map(|l| l.chars().count() + 1)
            .sum::<usize>()
            + self.cursor.column
    }

    /// 文字オフセットへカーソルを移動
    pub fn move_to_char_offset(&mut self, offset: usize) {
        let mut remaining = offset;
        for (line, text) in self.lines.iter().enumerate() {
            let len = text.chars().count();
            if remaining <= len {
                self.set_cursor(line, remaining);
                return;
            }
            remaining -= len + 1;
        }
        let last = self.lines.len() - 1;
        self.set_cursor(last, self.line_len(last));
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}
