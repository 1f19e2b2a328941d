//! コマンドライン引数の解析

use std::path::PathBuf;

/// 起動モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// 端末版
    Tui,
    /// デスクトップ版（`gui` フィーチャ有効時のみ）
    Gui,
}

/// 起動オプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub mode: RunMode,
    /// 編集するファイル（GUI 版では省略可）
    pub file: Option<PathBuf>,
    /// ログファイル
    pub debug_log: Option<PathBuf>,
}

/// 解析結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Run(CliOptions),
    /// `--help`
    Help,
    /// 引数の誤り（使い方を表示して終了コード1）
    Usage(String),
}

/// 使い方の文言
pub fn usage() -> String {
    let mut text = String::from("Usage: add <filename>\n");
    if cfg!(feature = "gui") {
        text.push_str("       add --gui [filename]\n");
    }
    text.push_str("\nOptions:\n");
    text.push_str("  --debug-log <path>  ログをファイルへ出力\n");
    if cfg!(feature = "gui") {
        text.push_str("  --gui               デスクトップ版で起動\n");
    }
    text.push_str("  -h, --help          このヘルプを表示\n");
    text
}

/// 引数（プログラム名を除く）を解析
pub fn parse_args(args: &[String]) -> CliAction {
    let mut mode = RunMode::Tui;
    let mut debug_log: Option<PathBuf> = None;
    let mut positional: Vec<&String> = Vec::new();

    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return CliAction::Help,
            "--gui" if cfg!(feature = "gui") => mode = RunMode::Gui,
            "--debug-log" => match iter.peek() {
                Some(next) if !next.starts_with('-') => {
                    debug_log = Some(PathBuf::from(next.as_str()));
                    iter.next();
                }
                _ => return CliAction::Usage("--debug-log にはパスが必要です".to_string()),
            },
            "--" => positional.extend(iter.by_ref()),
            other if other.starts_with('-') && other.len() > 1 => {
                return CliAction::Usage(format!("不明なオプションです: {}", other));
            }
            _ => positional.push(arg),
        }
    }

    let file = match (mode, positional.as_slice()) {
        (_, [single]) => Some(PathBuf::from(single.as_str())),
        (RunMode::Gui, _) => {
            if positional.len() > 1 {
                log::warn!("ignoring {} file arguments; opening an untitled buffer", positional.len());
            }
            None
        }
        (RunMode::Tui, []) => return CliAction::Usage("ファイル名を指定してください".to_string()),
        (RunMode::Tui, _) => {
            return CliAction::Usage("ファイルは1つだけ指定してください".to_string())
        }
    };

    CliAction::Run(CliOptions {
        mode,
        file,
        debug_log,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_file_runs_terminal() {
        assert_eq!(
            parse_args(&args(&["notes.txt"])),
            CliAction::Run(CliOptions {
                mode: RunMode::Tui,
                file: Some(PathBuf::from("notes.txt")),
                debug_log: None,
            })
        );
    }

    #[test]
    fn missing_or_extra_files_are_usage_errors() {
        assert!(matches!(parse_args(&[]), CliAction::Usage(_)));
        assert!(matches!(parse_args(&args(&["a", "b"])), CliAction::Usage(_)));
    }

    #[test]
    fn debug_log_takes_a_path() {
        match parse_args(&args(&["--debug-log", "/tmp/add.log", "x.rs"])) {
            CliAction::Run(options) => {
                assert_eq!(options.debug_log, Some(PathBuf::from("/tmp/add.log")));
                assert_eq!(options.file, Some(PathBuf::from("x.rs")));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(parse_args(&args(&["--debug-log"])), CliAction::Usage(_)));
    }

    #[test]
    fn help_and_unknown_options() {
        assert_eq!(parse_args(&args(&["--help"])), CliAction::Help);
        assert!(matches!(parse_args(&args(&["--bogus", "a"])), CliAction::Usage(_)));
        assert!(usage().starts_with("Usage: add <filename>"));
    }

    #[test]
    fn double_dash_allows_dash_file_names() {
        match parse_args(&args(&["--", "-notes"])) {
            CliAction::Run(options) => assert_eq!(options.file, Some(PathBuf::from("-notes"))),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[cfg(feature = "gui")]
    #[test]
    fn gui_defaults_to_untitled() {
        for list in [&["--gui"][..], &["--gui", "a", "b"][..]] {
            match parse_args(&args(list)) {
                CliAction::Run(options) => {
                    assert_eq!(options.mode, RunMode::Gui);
                    assert_eq!(options.file, None);
                }
                other => panic!("unexpected: {:?}", other),
            }
        }
    }
}
