//! ミニバッファ
//!
//! 画面下部の1行入力領域

pub mod prompt;

pub use prompt::{Minibuffer, PromptResult};
