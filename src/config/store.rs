//! 設定ファイルの読み書き
//!
//! 拡張子が `.json` なら文字列値のフラットなオブジェクト、それ以外は
//! `KEY=value` 形式の env ファイルとして扱う。env ファイルの読み込みは
//! dotenvy、書き込みは対象の行だけを置き換える。

use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 設定値の集合
pub type ConfigValues = BTreeMap<String, String>;

/// ファイル形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Env,
    Json,
}

/// キー・値ストア
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    format: StoreFormat,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => StoreFormat::Json,
            _ => StoreFormat::Env,
        };
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    /// 全ての値を読み込む（ファイルがなければ空）
    pub fn load(&self) -> Result<ConfigValues, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(ConfigValues::new()),
            Err(err) => {
                return Err(ConfigError::Io {
                    message: format!("{}: {}", self.path.display(), err),
                })
            }
        };

        match self.format {
            StoreFormat::Env => Ok(parse_env(&content)),
            StoreFormat::Json => parse_json(&content).ok_or_else(|| ConfigError::InvalidFile {
                path: self.path.display().to_string(),
            }),
        }
    }

    /// 1つのキーを書き込む（他のキーと行は保持する）
    pub fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let existing = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(ConfigError::Io {
                    message: format!("{}: {}", self.path.display(), err),
                })
            }
        };

        let updated = match self.format {
            StoreFormat::Env => set_env_line(&existing, key, value),
            StoreFormat::Json => {
                let mut values = if existing.trim().is_empty() {
                    ConfigValues::new()
                } else {
                    parse_json(&existing).ok_or_else(|| ConfigError::InvalidFile {
                        path: self.path.display().to_string(),
                    })?
                };
                values.insert(key.to_string(), value.to_string());
                serde_json::to_string_pretty(&values).map_err(|err| ConfigError::Io {
                    message: err.to_string(),
                })? + "\n"
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| ConfigError::Io {
                    message: err.to_string(),
                })?;
            }
        }
        fs::write(&self.path, updated).map_err(|err| ConfigError::Io {
            message: format!("{}: {}", self.path.display(), err),
        })
    }
}

/// env 形式を解析
///
/// 解釈は dotenvy に任せる（引用符、`export`、行末コメント）。
/// 解析できない行は警告を出して読み飛ばす。
pub fn parse_env(content: &str) -> ConfigValues {
    let mut values = ConfigValues::new();
    for entry in dotenvy::from_read_iter(content.as_bytes()) {
        match entry {
            Ok((key, value)) => {
                values.insert(key, value);
            }
            Err(err) => log::warn!("skipping malformed config line: {}", err),
        }
    }
    values
}

fn parse_json(content: &str) -> Option<ConfigValues> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    let object = value.as_object()?;
    let mut values = ConfigValues::new();
    for (key, value) in object {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => continue,
            other => other.to_string(),
        };
        values.insert(key.clone(), text);
    }
    Some(values)
}

fn set_env_line(existing: &str, key: &str, value: &str) -> String {
    let entry = format!("{}='{}'", key, value);
    let mut replaced = false;
    let mut lines: Vec<String> = existing
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            let body = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let matches_key = body
                .split_once('=')
                .map_or(false, |(k, _)| k.trim() == key);
            if matches_key && !replaced {
                replaced = true;
                entry.clone()
            } else {
                line.to_string()
            }
        })
        .collect();

    if !replaced {
        lines.push(entry);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
