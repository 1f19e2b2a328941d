//! add - small text editor with AI-assisted file analysis
//!
//! 端末版（ratatui）とデスクトップ版（slint）の2つのフロントエンドが、
//! 同じ編集セッションとコマンドディスパッチを共有する。

// コアモジュール
pub mod cli;
pub mod core;
pub mod error;
pub mod frontend;
pub mod logging;

// データ層
pub mod config;
pub mod file;

// 編集層
pub mod editor;

// ロジック層
pub mod ai;
pub mod input;
pub mod minibuffer;
pub mod search;

// 表示層
pub mod ui;

// 公開API
pub use core::{Backend, Session};
pub use error::{AddError, Result};
#[cfg(feature = "gui")]
pub use frontend::GuiApplication;
pub use frontend::TuiApplication;
