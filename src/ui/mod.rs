//! UIモジュール
//!
//! ratatuiベースのターミナルUI機能

pub mod highlight;
pub mod renderer;
pub mod status_line;
pub mod text_area;
pub mod viewport;

// 公開API
pub use highlight::{StyledLine, SyntaxHighlighter};
pub use renderer::Renderer;
pub use status_line::{spinner_frame, StatusLineInfo};
pub use text_area::{char_width, display_width, TextAreaRenderer};
pub use viewport::Viewport;
