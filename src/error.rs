//! エラーハンドリングシステム
//!
//! エディタ全体で使用される統一されたエラー型と、ステータスライン表示用の
//! メッセージ整形を定義する。致命的なのは初回セットアップ時の API キー欠落と
//! 端末初期化の失敗のみで、それ以外はすべて境界で捕捉して表示する。

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum AddError {
    /// ファイル操作エラー
    #[error("File operation failed: {0}")]
    File(#[from] FileError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// AI サービスエラー
    #[error("AI service error: {0}")]
    Ai(#[from] AiError),

    /// UI操作エラー
    #[error("UI operation failed: {0}")]
    Ui(#[from] UiError),
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("File already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("Encoding error in {path}: {message}")]
    Encoding { path: String, message: String },

    #[error("Buffer has no file name")]
    Untitled,

    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },
}

impl FileError {
    /// `std::io::Error` をパス情報付きで分類
    pub fn from_io(path: &Path, error: &io::Error) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            io::ErrorKind::NotFound => FileError::NotFound { path },
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            io::ErrorKind::AlreadyExists => FileError::AlreadyExists { path },
            io::ErrorKind::InvalidData => FileError::Encoding {
                path,
                message: error.to_string(),
            },
            _ => FileError::Io {
                path,
                message: error.to_string(),
            },
        }
    }
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file: {path}")]
    InvalidFile { path: String },

    #[error("Missing required setting: {key}")]
    MissingRequired { key: String },

    #[error("Configuration IO error: {message}")]
    Io { message: String },
}

/// AI 呼び出し固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    #[error("network error: {message}")]
    Transport { message: String },

    #[error("API returned status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("invalid API response: {message}")]
    InvalidResponse { message: String },

    #[error("API returned no text{}", .reason.as_ref().map(|r| format!(" ({})", r)).unwrap_or_default())]
    EmptyResponse { reason: Option<String> },

    #[error("no response within {seconds} seconds")]
    TimedOut { seconds: u64 },

    #[error("analysis worker failed: {message}")]
    Worker { message: String },
}

/// UI操作固有のエラー
#[derive(Error, Debug, Clone)]
pub enum UiError {
    #[error("Rendering failed: {component}")]
    RenderingFailed { component: String },
}

/// メッセージレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// ステータスライン表示情報
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// 表示メッセージ
    pub text: String,
    /// レベル
    pub level: MessageLevel,
    /// 表示開始時刻
    pub start_time: Instant,
    /// 表示持続時間
    pub duration: Duration,
}

impl StatusMessage {
    const DEFAULT_DURATION: Duration = Duration::from_secs(5);

    pub fn new(text: impl Into<String>, level: MessageLevel) -> Self {
        Self {
            text: text.into(),
            level,
            start_time: Instant::now(),
            duration: Self::DEFAULT_DURATION,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, MessageLevel::Info)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text, MessageLevel::Warning)
    }

    pub fn from_error(error: &AddError) -> Self {
        Self::new(describe(error), MessageLevel::Error)
    }

    pub fn is_error(&self) -> bool {
        self.level == MessageLevel::Error
    }

    pub fn is_expired(&self) -> bool {
        self.start_time.elapsed() >= self.duration
    }
}

/// ユーザー向けのエラー文言
pub fn describe(error: &AddError) -> String {
    match error {
        AddError::File(FileError::NotFound { path }) => {
            format!("ファイルが見つかりません: {}", path)
        }
        AddError::File(FileError::PermissionDenied { path }) => {
            format!("アクセス権限がありません: {}", path)
        }
        AddError::File(FileError::AlreadyExists { path }) => {
            format!("同名のファイルが既に存在します: {}", path)
        }
        AddError::File(FileError::InvalidPath { path }) => format!("無効なパスです: {}", path),
        AddError::File(FileError::Encoding { path, .. }) => {
            format!("UTF-8 として読み込めません: {}", path)
        }
        AddError::File(FileError::Untitled) => "ファイル名が設定されていません".to_string(),
        AddError::File(FileError::Io { path, message }) => {
            format!("ファイル操作に失敗しました: {} ({})", path, message)
        }
        AddError::Config(ConfigError::MissingRequired { key }) => {
            format!("必須の設定がありません: {}", key)
        }
        AddError::Ai(err) => format!("AI 分析でエラーが発生しました: {}", err),
        _ => format!("エラーが発生しました: {}", error),
    }
}

/// パニックハンドラの設定
///
/// 端末を raw モードのまま残さないよう、メッセージ出力前に復元する。
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen);

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());

        let message: &str = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.as_str()
        } else {
            "Unknown panic payload"
        };

        log::error!("PANIC at {}: {}", location, message);
        eprintln!("PANIC at {}: {}", location, message);
        eprintln!("Stack trace: {}", std::backtrace::Backtrace::capture());
        std::process::exit(1);
    }));
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, AddError>;

/// 各モジュール固有のResult型
pub mod file {
    pub type Result<T> = std::result::Result<T, super::FileError>;
}

pub mod ai {
    pub type Result<T> = std::result::Result<T, super::AiError>;
}

// std::io::Error から AddError への変換（パス不明の場合）
impl From<io::Error> for AddError {
    fn from(error: io::Error) -> Self {
        AddError::File(FileError::Io {
            path: String::new(),
            message: error.to_string(),
        })
    }
}
