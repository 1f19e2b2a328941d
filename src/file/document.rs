//! 編集中ドキュメント
//!
//! 現在のファイルパス、メモリ上のテキスト、最後に保存した内容を保持する。
//! 変更状態は常に `text != saved_snapshot` から導出する。

use super::io::{DefaultFileOperations, FileOperations};
use super::path::{display_name, resolve_rename_target};
use crate::error::file::Result;
use crate::error::FileError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: Option<PathBuf>,
    text: String,
    saved_snapshot: String,
}

impl Document {
    /// パス未設定の空ドキュメント
    pub fn untitled() -> Self {
        Self {
            path: None,
            text: String::new(),
            saved_snapshot: String::new(),
        }
    }

    /// ファイルを開く
    ///
    /// 存在しない場合は空ファイルを作成して空のドキュメントを返す。
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let ops = DefaultFileOperations;

        let text = if path.exists() {
            ops.read_file(&path)?
        } else {
            ops.create_empty(&path)?;
            log::info!("created empty file {}", path.display());
            String::new()
        };

        log::info!("opened {} ({} bytes)", path.display(), text.len());
        Ok(Self {
            path: Some(path),
            saved_snapshot: text.clone(),
            text,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn saved_snapshot(&self) -> &str {
        &self.saved_snapshot
    }

    /// 表示用の名前
    pub fn display_name(&self) -> String {
        display_name(self.path())
    }

    /// 編集結果を反映。内容が変わった場合は true
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return false;
        }
        self.text = text;
        true
    }

    pub fn is_dirty(&self) -> bool {
        self.text != self.saved_snapshot
    }

    /// 現在のパスへ保存
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.as_deref().ok_or(FileError::Untitled)?;
        DefaultFileOperations.write_file(path, &self.text)?;
        log::info!("saved {} ({} bytes)", path.display(), self.text.len());
        self.saved_snapshot = self.text.clone();
        Ok(())
    }

    /// 新しいパスへ保存し、以後そのパスを使う
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        DefaultFileOperations.write_file(&path, &self.text)?;
        log::info!("saved as {} ({} bytes)", path.display(), self.text.len());
        self.path = Some(path);
        self.saved_snapshot = self.text.clone();
        Ok(())
    }

    /// ファイル名を変更
    pub fn rename(&mut self, new_name: &str) -> Result<&Path> {
        let current = self.path.as_deref().ok_or(FileError::Untitled)?;
        if !current.exists() {
            return Err(FileError::NotFound {
                path: current.display().to_string(),
            });
        }

        let target = resolve_rename_target(current, new_name)?;
        DefaultFileOperations.rename_file(current, &target)?;
        log::info!("renamed {} -> {}", current.display(), target.display());

        Ok(self.path.insert(target).as_path())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::untitled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn edits_mark_the_document_dirty_until_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let mut doc = Document::open(&path).unwrap();
        assert!(!doc.is_dirty());

        assert!(doc.set_text("hello world"));
        assert!(doc.is_dirty());

        doc.save().unwrap();
        assert!(!doc.is_dirty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello world");
    }

    #[test]
    fn reverting_an_edit_is_clean() {
        let mut doc = Document::untitled();
        doc.set_text("x");
        assert!(doc.is_dirty());
        doc.set_text("");
        assert!(!doc.is_dirty());
    }

    #[test]
    fn save_without_path_is_untitled_error() {
        let mut doc = Document::untitled();
        doc.set_text("draft");
        assert_eq!(doc.save(), Err(FileError::Untitled));
        assert!(doc.is_dirty());
    }

    #[test]
    fn save_as_adopts_the_new_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("draft.md");

        let mut doc = Document::untitled();
        doc.set_text("# draft");
        doc.save_as(&path).unwrap();

        assert_eq!(doc.path(), Some(path.as_path()));
        assert!(!doc.is_dirty());
        assert_eq!(doc.display_name(), "draft.md");
    }

    #[test]
    fn rename_moves_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("old.txt");
        fs::write(&path, "body").unwrap();

        let mut doc = Document::open(&path).unwrap();
        let renamed = doc.rename("new.txt").unwrap().to_path_buf();

        assert_eq!(renamed, dir.path().join("new.txt"));
        assert!(!path.exists());
        assert_eq!(fs::read_to_string(&renamed).unwrap(), "body");
    }

    #[test]
    fn rename_requires_a_path() {
        let mut doc = Document::untitled();
        assert!(matches!(doc.rename("x.txt"), Err(FileError::Untitled)));
    }
}
