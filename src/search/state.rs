//! 検索状態の管理
//!
//! 最後のパターンとマッチ集合を保持し、同じパターンの再検索で次のマッチへ
//! 進む。テキストが編集されたらマッチは無効になる。

use super::matcher::find_all;
use super::types::{MatchSpan, SearchHighlight};

/// 検索結果の通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// マッチあり（現在位置は 1-based）
    Found { current: usize, total: usize, wrapped: bool },
    /// マッチなし
    NotFound,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// 検索パターン
    pattern: String,
    /// マッチ集合
    matches: Vec<MatchSpan>,
    /// 現在選択されているマッチ
    current_index: Option<usize>,
}

impl SearchState {
    /// 新しい状態を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 最後に使ったパターン
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self) -> &[MatchSpan] {
        &self.matches
    }

    pub fn current(&self) -> Option<&MatchSpan> {
        self.current_index.and_then(|idx| self.matches.get(idx))
    }

    pub fn is_active(&self) -> bool {
        !self.matches.is_empty()
    }

    /// 検索を実行
    ///
    /// 直前と同じパターンでマッチが残っていれば次のマッチへ進み、そうでなければ
    /// `cursor`（文字インデックス）以降の最初のマッチを選ぶ。
    pub fn search(&mut self, text: &str, pattern: &str, cursor: usize) -> SearchOutcome {
        if pattern == self.pattern && self.is_active() {
            return self.advance();
        }

        self.pattern = pattern.to_string();
        self.matches = find_all(text, pattern);

        if self.matches.is_empty() {
            self.current_index = None;
            return SearchOutcome::NotFound;
        }

        let (index, wrapped) = match self.matches.iter().position(|m| m.start >= cursor) {
            Some(index) => (index, false),
            None => (0, true),
        };
        self.current_index = Some(index);
        self.outcome(wrapped)
    }

    /// 次のマッチへ進む（末尾で先頭へ折り返す）
    pub fn advance(&mut self) -> SearchOutcome {
        if self.matches.is_empty() {
            return SearchOutcome::NotFound;
        }

        let next = self.current_index.map_or(0, |idx| idx + 1);
        let wrapped = next >= self.matches.len();
        self.current_index = Some(if wrapped { 0 } else { next });
        self.outcome(wrapped)
    }

    /// マッチを破棄（パターンは次回の初期値として残す）
    pub fn invalidate(&mut self) {
        self.matches.clear();
        self.current_index = None;
    }

    fn outcome(&self, wrapped: bool) -> SearchOutcome {
        SearchOutcome::Found {
            current: self.current_index.map_or(0, |idx| idx + 1),
            total: self.matches.len(),
            wrapped,
        }
    }

    /// 行単位のハイライトへ変換
    ///
    /// 改行をまたぐマッチは行ごとに分割する。
    pub fn highlights(&self, text: &str) -> Vec<SearchHighlight> {
        if self.matches.is_empty() {
            return Vec::new();
        }

        let mut highlights = Vec::new();
        let mut spans = self.matches.iter().enumerate().peekable();
        let mut line = 0usize;
        let mut column = 0usize;
        let mut open: Option<(usize, bool)> = None;

        for (char_idx, ch) in text.chars().enumerate() {
            if open.is_none() {
                if let Some((idx, span)) = spans.peek() {
                    if span.start == char_idx {
                        open = Some((column, Some(*idx) == self.current_index));
                    }
                }
            }

            if let Some((start_column, is_current)) = open {
                let span_end = spans.peek().map_or(char_idx, |(_, span)| span.end);
                if ch == '\n' || char_idx + 1 == span_end {
                    let end_column = if ch == '\n' { column } else { column + 1 };
                    if end_column > start_column {
                        highlights.push(SearchHighlight {
                            line,
                            start_column,
                            end_column,
                            is_current,
                        });
                    }
                    if char_idx + 1 == span_end {
                        open = None;
                        spans.next();
                    } else {
                        // 次の行の先頭から継続
                        open = Some((0, is_current));
                    }
                }
            }

            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }

        highlights
    }
}
