//! シンタックスハイライト
//!
//! ファイル名から構文を選び、syntect で行ごとの色を求める。
//! 対応する構文がなければプレーンテキストとして扱う。
//!
//! 各行の解析状態を保持しておき、編集後は最初に変わった行から
//! 表示に必要な行までだけ解析し直す。

use ratatui::style::{Color, Modifier, Style};
use std::path::Path;
use syntect::highlighting::{
    FontStyle, HighlightIterator, HighlightState, Highlighter, Theme, ThemeSet,
};
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};

const THEME_NAME: &str = "base16-ocean.dark";

/// 1行分の色付き区間
pub type StyledLine = Vec<(Style, String)>;

pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    syntax_name: String,
    /// 解析済みの行（元の文字列）
    sources: Vec<String>,
    styled: Vec<StyledLine>,
    /// 各行の解析を終えた時点の状態
    states: Vec<(HighlightState, ParseState)>,
}

impl SyntaxHighlighter {
    /// ファイル名に応じたハイライタを作成
    pub fn for_path(path: Option<&Path>) -> Self {
        let syntax_set = SyntaxSet::load_defaults_nonewlines();
        let theme = ThemeSet::load_defaults()
            .themes
            .remove(THEME_NAME)
            .unwrap_or_default();
        let syntax_name = find_syntax(&syntax_set, path).name.clone();
        log::debug!("syntax highlighting: {}", syntax_name);

        Self {
            syntax_set,
            theme,
            syntax_name,
            sources: Vec::new(),
            styled: Vec::new(),
            states: Vec::new(),
        }
    }

    /// 選ばれた構文名
    pub fn syntax_name(&self) -> &str {
        &self.syntax_name
    }

    pub fn is_plain_text(&self) -> bool {
        self.syntax_name == "Plain Text"
    }

    /// 解析済みの行数
    pub fn cached_lines(&self) -> usize {
        self.styled.len()
    }

    /// 先頭から `upto` 行目（含まない）までをハイライト
    ///
    /// 前回と同じ行は解析し直さない。返す行数は `upto` より多いことも
    /// 少ないこともある（末尾まで届いた場合）。
    pub fn highlight(&mut self, lines: &[String], upto: usize) -> &[StyledLine] {
        let unchanged = self
            .sources
            .iter()
            .zip(lines)
            .take_while(|(cached, line)| cached == line)
            .count();
        self.sources.truncate(unchanged);
        self.styled.truncate(unchanged);
        self.states.truncate(unchanged);

        let end = upto.min(lines.len());
        if unchanged < end {
            self.extend(&lines[unchanged..end]);
        }
        &self.styled
    }

    /// 最後に解析した行の状態から続けて解析
    fn extend(&mut self, lines: &[String]) {
        let syntax = self
            .syntax_set
            .find_syntax_by_name(&self.syntax_name)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let highlighter = Highlighter::new(&self.theme);
        let (mut highlight_state, mut parse_state) = match self.states.last() {
            Some(state) => state.clone(),
            None => (
                HighlightState::new(&highlighter, ScopeStack::new()),
                ParseState::new(syntax),
            ),
        };

        for line in lines {
            let styled = match parse_state.parse_line(line, &self.syntax_set) {
                Ok(ops) => HighlightIterator::new(&mut highlight_state, &ops, line, &highlighter)
                    .map(|(style, text)| (to_ratatui_style(style), text.to_string()))
                    .collect(),
                Err(err) => {
                    log::debug!("highlight failed: {}", err);
                    vec![(Style::default(), line.clone())]
                }
            };
            self.sources.push(line.clone());
            self.styled.push(styled);
            self.states
                .push((highlight_state.clone(), parse_state.clone()));
        }
    }
}

impl std::fmt::Debug for SyntaxHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxHighlighter")
            .field("syntax_name", &self.syntax_name)
            .finish_non_exhaustive()
    }
}

fn find_syntax<'a>(syntax_set: &'a SyntaxSet, path: Option<&Path>) -> &'a SyntaxReference {
    let by_extension = path
        .and_then(|p| p.extension())
        .and_then(|ext| ext.to_str())
        .and_then(|ext| syntax_set.find_syntax_by_extension(ext));
    let by_name = || {
        path.and_then(|p| p.file_name())
            .and_then(|name| name.to_str())
            .and_then(|name| syntax_set.find_syntax_by_extension(name))
    };

    by_extension
        .or_else(by_name)
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text())
}

fn to_ratatui_style(style: syntect::highlighting::Style) -> Style {
    let mut out = Style::default().fg(Color::Rgb(
        style.foreground.r,
        style.foreground.g,
        style.foreground.b,
    ));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}
