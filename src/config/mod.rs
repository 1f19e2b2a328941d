//! 設定
//!
//! AI 呼び出しに必要な API キーとモデル名を保持する。設定は起動時に一度だけ
//! 解決し、`AiConfig` として AI クライアントへ明示的に渡す。

pub mod setup;
pub mod store;

pub use setup::ensure_ai_config;
pub use store::{ConfigStore, ConfigValues, StoreFormat};

use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

/// API キーのキー名
pub const API_KEY_KEY: &str = "GEMINI_API_KEY";
/// モデル名のキー名
pub const MODEL_KEY: &str = "GEMINI_MODEL_NAME";
/// エンドポイント上書き用のキー名
pub const ENDPOINT_KEY: &str = "GEMINI_API_ENDPOINT";
/// タイムアウト秒数のキー名
pub const TIMEOUT_KEY: &str = "ADD_EDITOR_AI_TIMEOUT_SECS";
/// 設定ファイルパスを上書きする環境変数
pub const CONFIG_PATH_ENV: &str = "ADD_EDITOR_CONFIG";

/// 既定の設定ファイル名（ホームディレクトリ直下）
pub const DEFAULT_CONFIG_FILE: &str = ".add_editor_config.env";
/// モデル未入力時の既定値
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
/// 既定の API エンドポイント
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
/// 既定のタイムアウト
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// AI 呼び出し設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl AiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// ファイルの値と環境変数から設定を組み立てる
    ///
    /// 環境変数が設定されていればファイルより優先する。任意項目の不正な値は
    /// 警告して既定値を使う。
    pub fn resolve<F>(values: &ConfigValues, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| -> Option<String> {
            env(key)
                .or_else(|| values.get(key).cloned())
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = lookup(API_KEY_KEY).ok_or_else(|| ConfigError::MissingRequired {
            key: API_KEY_KEY.to_string(),
        })?;
        let model = lookup(MODEL_KEY).ok_or_else(|| ConfigError::MissingRequired {
            key: MODEL_KEY.to_string(),
        })?;

        let mut config = AiConfig::new(api_key, model);

        if let Some(endpoint) = lookup(ENDPOINT_KEY) {
            config.endpoint = endpoint.trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_KEY) {
            match raw.parse::<u64>().ok().filter(|secs| *secs > 0) {
                Some(seconds) => config.timeout = Duration::from_secs(seconds),
                None => log::warn!(
                    "ignoring invalid {}={:?}; using {}s",
                    TIMEOUT_KEY,
                    raw,
                    DEFAULT_TIMEOUT.as_secs()
                ),
            }
        }

        Ok(config)
    }
}

/// 使用する設定ファイルのパス
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(raw) = std::env::var(CONFIG_PATH_ENV) {
        if !raw.trim().is_empty() {
            return shellexpand::full(raw.trim())
                .map(|expanded| PathBuf::from(expanded.as_ref()))
                .map_err(|_| ConfigError::InvalidFile { path: raw.clone() });
        }
    }

    dirs::home_dir()
        .map(|home| home.join(DEFAULT_CONFIG_FILE))
        .ok_or_else(|| ConfigError::InvalidFile {
            path: format!("~/{}", DEFAULT_CONFIG_FILE),
        })
}
