//! ファイル操作
//!
//! ドキュメントの読み込み・保存・リネーム

pub mod document;
pub mod io;
pub mod path;

pub use document::Document;
pub use io::{read_file, write_file, DefaultFileOperations, FileOperations};
pub use path::{display_name, expand_path, resolve_rename_target};
