//! 初回セットアップ
//!
//! API キーまたはモデル名が見つからない場合、端末で入力を求めて設定ファイルへ
//! 保存する。API キーが空のままなら起動を中止する。

use super::store::ConfigStore;
use super::{AiConfig, API_KEY_KEY, DEFAULT_MODEL, MODEL_KEY};
use crate::error::ConfigError;
use std::io::{BufRead, Write};

/// 設定を読み込み、不足分を対話的に補う
pub fn ensure_ai_config<R, W, F>(
    store: &ConfigStore,
    env: F,
    input: &mut R,
    output: &mut W,
) -> Result<AiConfig, ConfigError>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Option<String>,
{
    let mut values = store.load()?;
    let has = |values: &super::ConfigValues, key: &str| {
        env(key)
            .or_else(|| values.get(key).cloned())
            .map_or(false, |value| !value.trim().is_empty())
    };

    let missing_key = !has(&values, API_KEY_KEY);
    let missing_model = !has(&values, MODEL_KEY);

    if missing_key || missing_model {
        write_line(output, "== 初回セットアップ ==")?;
        write_line(output, "AI 設定が見つかりません。設定を行います。")?;

        if missing_key {
            let api_key = ask(input, output, "Gemini API キーを入力してください: ")?;
            if api_key.is_empty() {
                return Err(ConfigError::MissingRequired {
                    key: API_KEY_KEY.to_string(),
                });
            }
            store.set(API_KEY_KEY, &api_key)?;
            values.insert(API_KEY_KEY.to_string(), api_key);
        }

        if missing_model {
            let prompt = format!(
                "使用する Gemini モデルを入力してください (既定: {}): ",
                DEFAULT_MODEL
            );
            let mut model = ask(input, output, &prompt)?;
            if model.is_empty() {
                model = DEFAULT_MODEL.to_string();
            }
            store.set(MODEL_KEY, &model)?;
            values.insert(MODEL_KEY.to_string(), model);
        }

        write_line(
            output,
            &format!("設定を保存しました: {}", store.path().display()),
        )?;
        log::info!("first-run configuration written to {}", store.path().display());
    }

    AiConfig::resolve(&values, env)
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String, ConfigError> {
    write!(output, "{}", prompt).map_err(io_error)?;
    output.flush().map_err(io_error)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(io_error)?;
    Ok(line.trim().to_string())
}

fn write_line<W: Write>(output: &mut W, text: &str) -> Result<(), ConfigError> {
    writeln!(output, "{}", text).map_err(io_error)
}

fn io_error(err: std::io::Error) -> ConfigError {
    ConfigError::Io {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn existing_configuration_needs_no_input() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("c.env"));
        store.set(API_KEY_KEY, "k").unwrap();
        store.set(MODEL_KEY, "m").unwrap();

        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let config = ensure_ai_config(&store, |_| None, &mut input, &mut output).unwrap();

        assert_eq!(config.api_key, "k");
        assert!(output.is_empty());
    }

    #[test]
    fn blank_model_uses_default() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("c.env"));

        let mut input = Cursor::new(b"secret\n\n".to_vec());
        let mut output = Vec::new();
        let config = ensure_ai_config(&store, |_| None, &mut input, &mut output).unwrap();

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(store.load().unwrap().get(MODEL_KEY).unwrap(), DEFAULT_MODEL);
    }
}
