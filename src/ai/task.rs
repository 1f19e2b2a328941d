//! バックグラウンド分析タスク
//!
//! 分析はワーカースレッドで実行し、結果はチャネルで UI スレッドへ返す。
//! タスクは期限を持ち、期限を過ぎた結果やキャンセル後の結果は破棄される。

use super::{analyze, error_text, TextGenerator};
use crate::error::AiError;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// ポーリング結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPoll {
    /// 実行中
    Pending,
    /// 完了（表示用テキスト。エラー時はエラー文言）
    Finished(String),
}

/// 実行中の分析
#[derive(Debug)]
pub struct AnalysisTask {
    receiver: Receiver<String>,
    started: Instant,
    deadline: Duration,
}

impl AnalysisTask {
    /// ワーカースレッドを起動
    pub fn spawn(generator: Arc<dyn TextGenerator>, content: String, deadline: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("ai-analysis".to_string())
            .spawn(move || {
                let result = analyze(generator.as_ref(), &content);
                // 受信側がキャンセル済みなら送信失敗は無視する
                let _ = sender.send(result);
            });

        if let Err(err) = spawned {
            log::warn!("failed to spawn analysis worker: {}", err);
        }

        Self {
            receiver,
            started: Instant::now(),
            deadline,
        }
    }

    /// 経過時間
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// 非ブロッキングで結果を確認
    pub fn poll(&self) -> TaskPoll {
        match self.receiver.try_recv() {
            Ok(text) => TaskPoll::Finished(text),
            Err(TryRecvError::Empty) if self.elapsed() >= self.deadline => {
                log::warn!("analysis timed out after {:?}", self.deadline);
                TaskPoll::Finished(error_text(&AiError::TimedOut {
                    seconds: self.deadline.as_secs(),
                }))
            }
            Err(TryRecvError::Empty) => TaskPoll::Pending,
            Err(TryRecvError::Disconnected) => TaskPoll::Finished(error_text(&AiError::Worker {
                message: "worker exited without a result".to_string(),
            })),
        }
    }

    /// 結果を待たずに破棄
    pub fn cancel(self) {
        log::info!("analysis cancelled after {:?}", self.elapsed());
    }
}
