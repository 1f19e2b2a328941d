//! テキストエリア描画
//!
//! 構文の色と検索ハイライトを重ね、ビューポートで切り出して描画する。

use std::collections::HashMap;

use super::highlight::StyledLine;
use super::viewport::Viewport;
use crate::editor::TextBuffer;
use crate::search::SearchHighlight;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// 文字の表示幅（タブは1桁の空白として扱う）
pub fn char_width(ch: char) -> usize {
    if ch == '\t' {
        1
    } else {
        ch.width().unwrap_or(0)
    }
}

/// 行頭から `column` 文字目までの表示幅
pub fn display_width(line: &str, column: usize) -> usize {
    line.chars().take(column).map(char_width).sum()
}

#[derive(Debug, Default)]
pub struct TextAreaRenderer {
    viewport: Viewport,
}

impl TextAreaRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// テキストエリアを描画し、画面上のカーソル位置を返す
    pub fn render(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        buffer: &TextBuffer,
        styled: &[StyledLine],
        highlights: &[SearchHighlight],
    ) -> Option<(u16, u16)> {
        let cursor = buffer.cursor();
        let cursor_line_text = buffer.lines().get(cursor.line).map_or("", String::as_str);
        let cursor_x = display_width(cursor_line_text, cursor.column);

        self.viewport.resize(area.height as usize, area.width as usize);
        self.viewport.follow(cursor.line, cursor_x);

        let mut grouped: HashMap<usize, Vec<&SearchHighlight>> = HashMap::new();
        for highlight in highlights {
            grouped.entry(highlight.line).or_default().push(highlight);
        }

        let visible = self.viewport.lines();
        let left = self.viewport.left();
        let lines: Vec<Line<'static>> = buffer
            .lines()
            .iter()
            .enumerate()
            .skip(visible.start)
            .take(visible.len())
            .map(|(idx, text)| {
                let line_highlights = grouped.get(&idx).map_or(&[][..], Vec::as_slice);
                build_line(
                    text,
                    styled.get(idx),
                    line_highlights,
                    left,
                    self.viewport.columns(),
                )
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);

        let (x, y) = self.viewport.to_screen(cursor.line, cursor_x)?;
        Some((area.x + x as u16, area.y + y as u16))
    }
}

fn match_style(is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).bg(Color::Rgb(0, 80, 80))
    }
}

/// 1行分の描画内容を作る
fn build_line(
    text: &str,
    styled: Option<&StyledLine>,
    highlights: &[&SearchHighlight],
    left: usize,
    width: usize,
) -> Line<'static> {
    let mut cells: Vec<(char, Style)> = match styled {
        Some(ranges) => ranges
            .iter()
            .flat_map(|(style, part)| part.chars().map(move |ch| (ch, *style)))
            .collect(),
        None => text.chars().map(|ch| (ch, Style::default())).collect(),
    };

    for highlight in highlights {
        let end = highlight.end_column.min(cells.len());
        for cell in cells.iter_mut().take(end).skip(highlight.start_column) {
            cell.1 = match_style(highlight.is_current);
        }
    }

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    let mut x = 0usize;

    for (ch, style) in cells {
        let w = char_width(ch);
        if x < left {
            // 左端で切れた全角文字は空白で埋める
            if x + w > left {
                push_run(&mut spans, &mut run, run_style);
                run_style = Style::default();
                run.push_str(&" ".repeat(x + w - left));
            }
            x += w;
            continue;
        }
        if x + w > left + width {
            break;
        }
        if style != run_style {
            push_run(&mut spans, &mut run, run_style);
            run_style = style;
        }
        run.push(if ch == '\t' { ' ' } else { ch });
        x += w;
    }
    push_run(&mut spans, &mut run, run_style);

    Line::from(spans)
}

fn push_run(spans: &mut Vec<Span<'static>>, run: &mut String, style: Style) {
    if !run.is_empty() {
        spans.push(Span::styled(std::mem::take(run), style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("abc", 2), 2);
        assert_eq!(display_width("日本語", 2), 4);
        assert_eq!(display_width("a\tb", 3), 3);
    }

    #[test]
    fn test_horizontal_clip() {
        let line = build_line("hello world", None, &[], 6, 3);
        assert_eq!(plain(&line), "wor");
    }

    #[test]
    fn test_wide_char_cut_at_left_edge() {
        let line = build_line("日本", None, &[], 1, 10);
        assert_eq!(plain(&line), " 本");
    }

    #[test]
    fn test_search_highlight_overrides_style() {
        let highlight = SearchHighlight {
            line: 0,
            start_column: 2,
            end_column: 4,
            is_current: true,
        };
        let line = build_line("abcdef", None, &[&highlight], 0, 80);
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content.as_ref(), "cd");
        assert_eq!(line.spans[1].style, match_style(true));
    }
}
