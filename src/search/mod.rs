//! 検索機能
//!
//! 大文字小文字を区別しない線形走査と、描画用ハイライトの生成

pub mod matcher;
pub mod state;
pub mod types;

pub use matcher::{find_all, find_all_with, LiteralMatcher, StringMatcher};
pub use state::{SearchOutcome, SearchState};
pub use types::{MatchSpan, SearchHighlight};
