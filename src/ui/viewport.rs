//! テキスト領域のスクロール位置
//!
//! 縦は行、横は表示幅（桁）で管理する。カーソルが画面外に出たときだけ動く。

use std::ops::Range;

/// 下方向へスクロールするときに残す行数
const SCROLL_MARGIN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    top: usize,
    left: usize,
    rows: usize,
    columns: usize,
}

impl Viewport {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            top: 0,
            left: 0,
            rows: rows.max(1),
            columns: columns.max(1),
        }
    }

    /// 描画領域の大きさを反映
    pub fn resize(&mut self, rows: usize, columns: usize) {
        self.rows = rows.max(1);
        self.columns = columns.max(1);
    }

    /// カーソル（行, 表示桁）が見えるように移動。動いたら true
    pub fn follow(&mut self, line: usize, column: usize) -> bool {
        let before = (self.top, self.left);

        if line < self.top {
            self.top = line;
        } else if line >= self.top + self.rows {
            // 末尾付近で余白を残す（画面が狭いときは余白なし）
            let margin = if self.rows > SCROLL_MARGIN * 2 { SCROLL_MARGIN } else { 0 };
            self.top = line + 1 + margin - self.rows;
        }

        if column < self.left {
            self.left = column;
        } else if column >= self.left + self.columns {
            self.left = column + 1 - self.columns;
        }

        before != (self.top, self.left)
    }

    /// 表示される行の範囲
    pub fn lines(&self) -> Range<usize> {
        self.top..self.top + self.rows
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// 文書上の位置を画面上の相対位置へ
    pub fn to_screen(&self, line: usize, column: usize) -> Option<(usize, usize)> {
        let y = line.checked_sub(self.top).filter(|y| *y < self.rows)?;
        let x = column.checked_sub(self.left).filter(|x| *x < self.columns)?;
        Some((x, y))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_put_while_cursor_is_visible() {
        let mut viewport = Viewport::new(10, 80);
        assert!(!viewport.follow(9, 79));
        assert_eq!(viewport.lines(), 0..10);
    }

    #[test]
    fn scrolling_down_keeps_a_margin() {
        let mut viewport = Viewport::new(10, 80);
        assert!(viewport.follow(10, 0));
        assert_eq!(viewport.lines(), 3..13);

        // 狭い画面では余白を取らない
        let mut small = Viewport::new(3, 80);
        small.follow(5, 0);
        assert_eq!(small.lines(), 3..6);
    }

    #[test]
    fn scrolling_up_puts_cursor_on_top_row() {
        let mut viewport = Viewport::new(5, 80);
        viewport.follow(20, 0);
        assert!(viewport.follow(4, 0));
        assert_eq!(viewport.lines().start, 4);
    }

    #[test]
    fn horizontal_follow() {
        let mut viewport = Viewport::new(4, 10);
        assert!(viewport.follow(0, 12));
        assert_eq!(viewport.left(), 3);
        assert_eq!(viewport.to_screen(0, 12), Some((9, 0)));
        assert_eq!(viewport.to_screen(0, 2), None);

        assert!(viewport.follow(0, 0));
        assert_eq!(viewport.left(), 0);
    }
}
