//! 検索関連の共通型

/// 1件の検索マッチ情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    /// マッチ開始位置（文字インデックス）
    pub start: usize,
    /// マッチ終了位置（文字インデックス、排他的）
    pub end: usize,
    /// マッチ開始行
    pub line: usize,
    /// マッチ開始列
    pub column: usize,
}

impl MatchSpan {
    /// `(start, end)` の組
    pub fn range(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// 元テキスト上のバイト範囲（GUI ウィジェットの選択に使う）
    pub fn byte_range(&self, text: &str) -> std::ops::Range<usize> {
        let mut start = text.len();
        let mut end = text.len();
        for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
            if char_idx == self.start {
                start = byte_idx;
            }
            if char_idx == self.end {
                end = byte_idx;
                break;
            }
        }
        start..end
    }
}

/// UI描画用のハイライト情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHighlight {
    /// 行番号
    pub line: usize,
    /// 行内開始位置（文字単位）
    pub start_column: usize,
    /// 行内終了位置（文字単位、排他的）
    pub end_column: usize,
    /// 現在のマッチであるか
    pub is_current: bool,
}
