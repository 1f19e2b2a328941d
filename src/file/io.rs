//! ファイルI/O操作
//!
//! 読み込み・直接書き込み・リネームの最小実装。ロック、アトミック置換、
//! バックアップは行わない。

use crate::error::file::Result;
use crate::error::FileError;
use std::fs;
use std::path::Path;

/// ファイル操作のトレイト
pub trait FileOperations {
    /// ファイルからテキストを読み込み
    fn read_file(&self, path: &Path) -> Result<String>;

    /// テキストをファイルに書き込み
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// 空ファイルを作成
    fn create_empty(&self, path: &Path) -> Result<()>;

    /// ファイル名を変更
    fn rename_file(&self, from: &Path, to: &Path) -> Result<()>;
}

/// `std::fs` による実装
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFileOperations;

impl FileOperations for DefaultFileOperations {
    fn read_file(&self, path: &Path) -> Result<String> {
        if path.is_dir() {
            return Err(FileError::InvalidPath {
                path: path.display().to_string(),
            });
        }

        fs::read_to_string(path).map_err(|err| FileError::from_io(path, &err))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if path.is_dir() {
            return Err(FileError::InvalidPath {
                path: path.display().to_string(),
            });
        }

        fs::write(path, content.as_bytes()).map_err(|err| FileError::from_io(path, &err))
    }

    fn create_empty(&self, path: &Path) -> Result<()> {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map(|_| ())
            .map_err(|err| FileError::from_io(path, &err))
    }

    fn rename_file(&self, from: &Path, to: &Path) -> Result<()> {
        // fs::rename は Unix で既存ファイルを黙って上書きするため事前に拒否する
        if to.exists() {
            return Err(FileError::AlreadyExists {
                path: to.display().to_string(),
            });
        }

        fs::rename(from, to).map_err(|err| FileError::from_io(to, &err))
    }
}

/// ファイル読み込みの便利関数
pub fn read_file(path: &Path) -> Result<String> {
    DefaultFileOperations.read_file(path)
}

/// ファイル書き込みの便利関数
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    DefaultFileOperations.write_file(path, content)
}
