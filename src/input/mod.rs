//! 入力処理
//!
//! キーイベントの正規化とコマンドへの対応付け

pub mod commands;
pub mod keybinding;

pub use commands::{Command, Direction, EditAction};
pub use keybinding::{Key, KeyCode, KeyMap, KeyModifiers, Variant};
