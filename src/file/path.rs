//! パス入力の解決
//!
//! ミニバッファやダイアログで入力されたファイル名を実際のパスへ変換する。

use crate::error::file::Result;
use crate::error::FileError;
use std::path::{Path, PathBuf};

/// `~` と環境変数を展開
pub fn expand_path(input: &str) -> Result<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.contains('\0') {
        return Err(FileError::InvalidPath {
            path: input.to_string(),
        });
    }

    shellexpand::full(trimmed)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|_| FileError::InvalidPath {
            path: input.to_string(),
        })
}

/// リネーム先を解決
///
/// 区切り文字を含まない単純な名前は現在のファイルと同じディレクトリに置く。
pub fn resolve_rename_target(current: &Path, input: &str) -> Result<PathBuf> {
    let trimmed = input.trim();
    let is_bare_name = !trimmed.is_empty()
        && !trimmed.contains(std::path::MAIN_SEPARATOR)
        && !trimmed.contains('/')
        && !trimmed.starts_with('~')
        && !trimmed.contains('$');

    if is_bare_name {
        if trimmed == "." || trimmed == ".." {
            return Err(FileError::InvalidPath {
                path: input.to_string(),
            });
        }
        let parent = current.parent().unwrap_or_else(|| Path::new(""));
        return Ok(parent.join(trimmed));
    }

    expand_path(trimmed)
}

/// 表示用のファイル名
pub fn display_name(path: Option<&Path>) -> String {
    match path {
        Some(path) => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        None => "[untitled]".to_string(),
    }
}
