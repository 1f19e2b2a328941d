//! エディタモジュール
//!
//! 端末版で使うテキストバッファ

pub mod text_buffer;

pub use text_buffer::{CursorPosition, TextBuffer, TAB_WIDTH};
