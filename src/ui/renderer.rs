//! 画面全体の描画
//!
//! テキストエリア・区切り線・ステータスライン・ミニバッファの4段構成。
//! 分析結果は中央のオーバーレイに表示する。

use super::highlight::{StyledLine, SyntaxHighlighter};
use super::status_line::StatusLineInfo;
use super::text_area::{display_width, TextAreaRenderer};
use crate::core::{Mode, RenderView};
use crate::error::MessageLevel;
use ratatui::{
    backend::Backend,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::{Path, PathBuf};

const STATUS_BG: Color = Color::Rgb(0x22, 0x22, 0x22);

#[derive(Debug, Default)]
pub struct Renderer {
    text_area: TextAreaRenderer,
    highlighter: Option<SyntaxHighlighter>,
    /// ハイライタを作成したときのパス
    highlighter_path: Option<PathBuf>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// テキストエリアの高さ（直近の描画時点）
    pub fn text_height(&self) -> usize {
        self.text_area.viewport().rows()
    }

    /// 1フレーム描画
    pub fn render<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        view: &RenderView<'_>,
    ) -> io::Result<()> {
        self.refresh_highlighter(view.path);
        terminal.draw(|frame| self.render_frame(frame, view))?;
        Ok(())
    }

    fn refresh_highlighter(&mut self, path: Option<&Path>) {
        if self.highlighter.is_none() || self.highlighter_path.as_deref() != path {
            self.highlighter = Some(SyntaxHighlighter::for_path(path));
            self.highlighter_path = path.map(Path::to_path_buf);
        }
    }

    fn render_frame(&mut self, frame: &mut Frame<'_>, view: &RenderView<'_>) {
        let [text_area, separator, status, minibuffer] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        // 表示範囲は必ずカーソル行を含むので、その下の画面1枚分まであれば足りる
        let upto = view.buffer.cursor().line + text_area.height as usize + 1;
        let styled: &[StyledLine] = match self.highlighter.as_mut() {
            Some(highlighter) => highlighter.highlight(view.buffer.lines(), upto),
            None => &[],
        };
        let text_cursor =
            self.text_area
                .render(frame, text_area, view.buffer, styled, &view.highlights);

        frame.render_widget(
            Paragraph::new("─".repeat(separator.width as usize)),
            separator,
        );

        let info = StatusLineInfo {
            file_label: &view.file_label,
            is_modified: view.is_modified,
            hints: view.hints,
            busy: view.analysis_elapsed.filter(|_| view.mode.is_busy()),
        };
        frame.render_widget(
            Paragraph::new(info.text()).style(Style::default().bg(STATUS_BG).fg(Color::White)),
            status,
        );

        let prompt_cursor = render_minibuffer(frame, minibuffer, view);

        if view.mode == Mode::ViewingAnalysis {
            render_analysis(frame, view);
            return;
        }

        let cursor = match view.mode {
            Mode::Prompting(_) => prompt_cursor,
            Mode::Editing => text_cursor,
            Mode::AwaitingAiResult | Mode::ViewingAnalysis => None,
        };
        if let Some((x, y)) = cursor {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

/// ミニバッファ描画。入力中ならカーソル位置を返す
fn render_minibuffer(frame: &mut Frame<'_>, area: Rect, view: &RenderView<'_>) -> Option<(u16, u16)> {
    frame.render_widget(Clear, area);

    if view.minibuffer.is_active() {
        let label = view.minibuffer.message();
        let input = view.minibuffer.input();
        let line = Line::from(vec![
            Span::styled(label.to_string(), Style::default().fg(Color::Cyan)),
            Span::raw(input.to_string()),
        ]);
        frame.render_widget(Paragraph::new(line), area);

        let width = display_width(label, usize::MAX) + display_width(input, usize::MAX);
        let x = (width as u16).min(area.width.saturating_sub(1));
        return Some((area.x + x, area.y));
    }

    if let Some(status) = view.status {
        let color = match status.level {
            MessageLevel::Info => Color::Green,
            MessageLevel::Warning => Color::Yellow,
            MessageLevel::Error => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(status.text.as_str()).style(Style::default().fg(color)),
            area,
        );
    }

    None
}

fn render_analysis(frame: &mut Frame<'_>, view: &RenderView<'_>) {
    let area = centered(frame.area(), 80, 80);
    let block = Block::bordered()
        .title(" AI Analysis ")
        .title_bottom(" ↑↓ PgUp PgDn: スクロール | Enter / Esc / q: 閉じる ")
        .border_style(Style::default().fg(Color::Green));
    let paragraph = Paragraph::new(view.analysis.unwrap_or_default())
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((view.analysis_scroll, 0));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// 親領域の中央に指定割合の矩形を取る
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}
