//! ロギングシステム
//!
//! `log` ファサードのバックエンド。TUI は画面を占有するため標準エラー出力は
//! 使わず、デバッグ時のみファイルへ追記する。

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

/// デバッグログを有効化する環境変数
pub const DEBUG_ENV_VAR: &str = "ADD_EDITOR_DEBUG";

/// ロガー
#[derive(Debug)]
pub struct Logger {
    level: LevelFilter,
    output_stderr: bool,
    output_file: Option<PathBuf>,
    file_lock: Mutex<()>,
}

impl Logger {
    /// デフォルト構築
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            output_stderr: false,
            output_file: None,
            file_lock: Mutex::new(()),
        }
    }

    /// 開発者向けロガー
    pub fn for_development() -> Self {
        Self::new(LevelFilter::Debug)
    }

    /// ログレベルを取得
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// ログレベルを変更
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// ファイル出力を設定
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// 標準エラー出力を有効化（端末を占有しない起動前処理向け）
    pub fn with_stderr(mut self) -> Self {
        self.output_stderr = true;
        self
    }

    fn should_log(&self, level: log::Level) -> bool {
        level <= self.level
    }

    fn write_line(&self, message: &str) {
        if self.output_stderr {
            eprintln!("{}", message);
        }

        if let Some(path) = &self.output_file {
            let _guard = self.file_lock.lock();
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", message);
            }
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.should_log(metadata.level())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.write_line(&format!(
            "[{}] {} {}: {}",
            timestamp_secs(),
            record.level(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {}
}

fn timestamp_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|dur| dur.as_secs())
        .unwrap_or_default()
}

/// 既定のデバッグログ出力先（`~/.add-editor/debug.log`）
pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".add-editor").join("debug.log"))
}

/// 実行時に使うログ出力先を決定
///
/// 明示指定を優先し、なければ環境変数が設定されている場合のみ既定パスを使う。
pub fn resolve_log_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None if std::env::var_os(DEBUG_ENV_VAR).is_some() => default_log_path(),
        None => None,
    }
}

/// グローバルロガーを登録
///
/// 出力先がない場合は何も登録せず、`log` マクロは破棄される。
pub fn init(log_path: Option<PathBuf>) {
    let Some(path) = log_path else {
        return;
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    let logger = Logger::for_development().with_file_output(path);
    let level = logger.level();
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}
