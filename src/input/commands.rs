//! コマンドシステム
//!
//! キーバインドから生成されるエディタコマンドと、ホスト側の
//! テキストバッファへ直接適用される編集操作の定義

/// ディスパッチャが処理するコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 保存
    Save,
    /// 保存して終了（端末版のみ）
    SaveAndExit,
    /// 検索プロンプトを開く
    Search,
    /// リネームプロンプトを開く
    Rename,
    /// AI 分析
    Analyze,
    /// カット（GUI 版のみ、ウィジェットへ委譲）
    Cut,
    /// キャンセル / ハイライト解除
    Cancel,
    /// プロンプト入力の確定
    SubmitPrompt(String),
    /// 分析タスクの完了通知
    AnalysisFinished,
    /// 分析結果表示を閉じる
    DismissAnalysis,
}

impl Command {
    /// 表示名
    pub fn name(&self) -> &'static str {
        match self {
            Command::Save => "save",
            Command::SaveAndExit => "save-and-exit",
            Command::Search => "search",
            Command::Rename => "rename",
            Command::Analyze => "analyze",
            Command::Cut => "cut",
            Command::Cancel => "cancel",
            Command::SubmitPrompt(_) => "submit-prompt",
            Command::AnalysisFinished => "analysis-finished",
            Command::DismissAnalysis => "dismiss-analysis",
        }
    }
}

/// 移動方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// テキストバッファへの編集操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    InsertChar(char),
    InsertNewline,
    InsertTab,
    DeleteBackward,
    DeleteForward,
    Move(Direction),
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
    BufferStart,
    BufferEnd,
}
