//! ステータスライン

use std::time::Duration;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// ステータスライン表示情報
#[derive(Debug, Clone, Copy)]
pub struct StatusLineInfo<'a> {
    pub file_label: &'a str,
    pub is_modified: bool,
    pub hints: &'a [(&'static str, &'static str)],
    /// 分析中なら経過時間
    pub busy: Option<Duration>,
}

impl StatusLineInfo<'_> {
    /// 表示文字列
    pub fn text(&self) -> String {
        let mut text = format!(
            " {}{}",
            self.file_label,
            if self.is_modified { "*" } else { "" }
        );

        match self.busy {
            Some(elapsed) => {
                text.push_str(&format!(
                    " | {} AI 分析中... {}s (Esc: キャンセル) ",
                    spinner_frame(elapsed),
                    elapsed.as_secs()
                ));
            }
            None => {
                for (key, description) in self.hints {
                    text.push_str(&format!(" | {}: {}", key, description));
                }
                text.push(' ');
            }
        }

        text
    }
}

/// 経過時間に応じたスピナーの文字
pub fn spinner_frame(elapsed: Duration) -> &'static str {
    SPINNER[(elapsed.as_millis() / 100) as usize % SPINNER.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyMap;

    #[test]
    fn terminal_status_line() {
        let keymap = KeyMap::terminal();
        let info = StatusLineInfo {
            file_label: "notes.txt",
            is_modified: true,
            hints: keymap.hints(),
            busy: None,
        };
        assert_eq!(
            info.text(),
            " notes.txt* | C-h: Save | C-s: Search | C-r: Rename | C-a: Analyze | C-x: Save & Exit "
        );
    }

    #[test]
    fn desktop_status_line_uses_desktop_hints() {
        let keymap = KeyMap::desktop();
        let info = StatusLineInfo {
            file_label: "notes.txt",
            is_modified: false,
            hints: keymap.hints(),
            busy: None,
        };
        assert_eq!(
            info.text().trim(),
            "notes.txt | C-h: Save | C-s: Search | C-r: Rename | C-a: Analyze | C-x: Cut"
        );
    }

    #[test]
    fn busy_status_line_shows_elapsed() {
        let info = StatusLineInfo {
            file_label: "a.rs",
            is_modified: false,
            hints: &[],
            busy: Some(Duration::from_millis(3_250)),
        };
        let text = info.text();
        assert!(text.starts_with(" a.rs | "));
        assert!(text.contains("3s"));
    }

    #[test]
    fn spinner_cycles() {
        assert_eq!(spinner_frame(Duration::ZERO), SPINNER[0]);
        assert_eq!(spinner_frame(Duration::from_millis(1_000)), SPINNER[0]);
        assert_eq!(spinner_frame(Duration::from_millis(150)), SPINNER[1]);
    }
}
