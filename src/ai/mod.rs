//! AI によるファイル分析
//!
//! プロンプト生成、外部サービス呼び出し、バックグラウンド実行。
//! 呼び出しの失敗は常に表示用の文字列に変換され、セッションを終了させない。

pub mod client;
pub mod prompt;
pub mod task;

pub use client::{GeminiClient, TextGenerator};
pub use prompt::build_prompt;
pub use task::{AnalysisTask, TaskPoll};

use crate::error::{describe, AddError, AiError};
use std::sync::Arc;
use std::time::Duration;

/// ドキュメント全文を分析し、表示用テキストを返す
pub fn analyze(generator: &dyn TextGenerator, content: &str) -> String {
    let prompt = build_prompt(content);
    match generator.generate(&prompt) {
        Ok(text) => {
            log::info!("analysis finished ({} chars)", text.len());
            text
        }
        Err(err) => {
            log::warn!("analysis failed: {}", err);
            error_text(&err)
        }
    }
}

/// AI エラーの表示文言
pub fn error_text(error: &AiError) -> String {
    describe(&AddError::Ai(error.clone()))
}

/// 分析の起動に必要な依存をまとめたもの
#[derive(Clone)]
pub struct Analyzer {
    generator: Arc<dyn TextGenerator>,
    deadline: Duration,
}

impl Analyzer {
    pub fn new(generator: Arc<dyn TextGenerator>, deadline: Duration) -> Self {
        Self { generator, deadline }
    }

    /// バックグラウンドで分析を開始
    pub fn start(&self, content: String) -> AnalysisTask {
        log::info!("starting analysis ({} bytes)", content.len());
        AnalysisTask::spawn(Arc::clone(&self.generator), content, self.deadline)
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ai::Result;

    struct Failing;

    impl TextGenerator for Failing {
        fn generate(&self, _prompt: &str) -> Result<String> {
            Err(AiError::Transport {
                message: "connection reset".to_string(),
            })
        }
    }

    struct Capture(std::sync::Mutex<String>);

    impl TextGenerator for Capture {
        fn generate(&self, prompt: &str) -> Result<String> {
            *self.0.lock().unwrap() = prompt.to_string();
            Ok("looks fine".to_string())
        }
    }

    #[test]
    fn network_failure_becomes_display_text() {
        let text = analyze(&Failing, "body");
        assert!(text.contains("エラー"));
        assert!(text.contains("connection reset"));
    }

    #[test]
    fn sends_the_whole_document() {
        let capture = Capture(std::sync::Mutex::new(String::new()));
        assert_eq!(analyze(&capture, "line1\nline2"), "looks fine");
        assert!(capture.0.lock().unwrap().ends_with("```\nline1\nline2\n```"));
    }
}
