//! コマンドディスパッチ
//!
//! 現在のモードとコマンドから、次のモードと実行すべき副作用を決める純粋関数。
//! ファイル操作や AI 呼び出しそのものは [`super::Session`] が行う。

use crate::input::{Command, Variant};

/// 入力プロンプトの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// 検索語
    Search,
    /// 新しいファイル名
    Rename,
    /// 保存先（パス未設定時）
    SaveAs { then_exit: bool },
}

impl PromptKind {
    /// ミニバッファに表示するラベル
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::Search => "Search: ",
            PromptKind::Rename => "Rename to: ",
            PromptKind::SaveAs { .. } => "Save as: ",
        }
    }
}

/// エディタのモード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// 通常の編集
    #[default]
    Editing,
    /// プロンプト入力中
    Prompting(PromptKind),
    /// AI 分析の完了待ち
    AwaitingAiResult,
    /// 分析結果の表示中
    ViewingAnalysis,
}

impl Mode {
    pub fn is_busy(&self) -> bool {
        matches!(self, Mode::AwaitingAiResult)
    }
}

/// 状態遷移に伴う通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// 未保存のためリネームできない
    RenameNeedsSavedFile,
    /// この版では使えないコマンド
    Unavailable(&'static str),
    /// 分析中のため受け付けない
    Busy,
}

/// ディスパッチ結果として実行する副作用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// 現在のパスへ保存
    Save { then_exit: bool },
    /// 指定パスへ保存
    SaveAs { path: String, then_exit: bool },
    /// プロンプトを開く
    OpenPrompt(PromptKind),
    /// ファイル名変更
    Rename(String),
    /// 検索
    Search(String),
    /// 検索ハイライトを解除
    ClearSearch,
    /// AI 分析を開始
    StartAnalysis,
    /// 実行中の分析を取り消す
    CancelAnalysis,
    /// カット（ホストのウィジェットへ委譲）
    Cut,
    /// ステータスラインへの通知
    Notify(Notice),
}

/// ディスパッチに必要な文書側の情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchContext {
    /// 文書がファイルパスを持つか
    pub has_path: bool,
    /// フロントエンドの種類
    pub variant: Variant,
}

/// 遷移結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub mode: Mode,
    pub effect: Option<Effect>,
}

impl Transition {
    fn stay(mode: Mode) -> Self {
        Self { mode, effect: None }
    }

    fn to(mode: Mode, effect: Effect) -> Self {
        Self {
            mode,
            effect: Some(effect),
        }
    }
}

/// コマンドを処理して次の状態を返す
pub fn dispatch(mode: &Mode, context: DispatchContext, command: Command) -> Transition {
    match mode {
        Mode::Editing => dispatch_editing(context, command),
        Mode::Prompting(kind) => dispatch_prompting(*kind, command),
        Mode::AwaitingAiResult => match command {
            Command::Cancel => Transition::to(Mode::Editing, Effect::CancelAnalysis),
            Command::AnalysisFinished => Transition::stay(Mode::ViewingAnalysis),
            _ => Transition::to(Mode::AwaitingAiResult, Effect::Notify(Notice::Busy)),
        },
        Mode::ViewingAnalysis => match command {
            Command::Cancel | Command::DismissAnalysis | Command::SubmitPrompt(_) => {
                Transition::stay(Mode::Editing)
            }
            _ => Transition::stay(Mode::ViewingAnalysis),
        },
    }
}

fn dispatch_editing(context: DispatchContext, command: Command) -> Transition {
    let editing = Mode::Editing;
    match command {
        Command::Save => save_transition(context, false),
        Command::SaveAndExit => match context.variant {
            Variant::Terminal => save_transition(context, true),
            Variant::Desktop => Transition::to(
                editing,
                Effect::Notify(Notice::Unavailable(command.name())),
            ),
        },
        Command::Search => prompt(PromptKind::Search),
        Command::Rename if context.has_path => prompt(PromptKind::Rename),
        Command::Rename => Transition::to(editing, Effect::Notify(Notice::RenameNeedsSavedFile)),
        Command::Analyze => Transition::to(Mode::AwaitingAiResult, Effect::StartAnalysis),
        Command::Cut => match context.variant {
            Variant::Desktop => Transition::to(editing, Effect::Cut),
            Variant::Terminal => Transition::to(
                editing,
                Effect::Notify(Notice::Unavailable(command.name())),
            ),
        },
        Command::Cancel => Transition::to(editing, Effect::ClearSearch),
        Command::SubmitPrompt(_) | Command::AnalysisFinished | Command::DismissAnalysis => {
            Transition::stay(editing)
        }
    }
}

fn dispatch_prompting(kind: PromptKind, command: Command) -> Transition {
    match command {
        Command::Cancel => Transition::stay(Mode::Editing),
        Command::SubmitPrompt(input) => {
            let effect = match kind {
                PromptKind::Search => Effect::Search(input),
                PromptKind::Rename => {
                    let name = input.trim();
                    if name.is_empty() {
                        return Transition::stay(Mode::Editing);
                    }
                    Effect::Rename(name.to_string())
                }
                PromptKind::SaveAs { then_exit } => {
                    let path = input.trim();
                    if path.is_empty() {
                        return Transition::stay(Mode::Editing);
                    }
                    Effect::SaveAs {
                        path: path.to_string(),
                        then_exit,
                    }
                }
            };
            Transition::to(Mode::Editing, effect)
        }
        _ => Transition::stay(Mode::Prompting(kind)),
    }
}

fn save_transition(context: DispatchContext, then_exit: bool) -> Transition {
    if context.has_path {
        Transition::to(Mode::Editing, Effect::Save { then_exit })
    } else {
        prompt(PromptKind::SaveAs { then_exit })
    }
}

fn prompt(kind: PromptKind) -> Transition {
    Transition::to(Mode::Prompting(kind), Effect::OpenPrompt(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TERMINAL: DispatchContext = DispatchContext {
        has_path: true,
        variant: Variant::Terminal,
    };
    const DESKTOP: DispatchContext = DispatchContext {
        has_path: true,
        variant: Variant::Desktop,
    };

    #[test]
    fn save_with_path_saves() {
        let t = dispatch(&Mode::Editing, TERMINAL, Command::Save);
        assert_eq!(t.mode, Mode::Editing);
        assert_eq!(t.effect, Some(Effect::Save { then_exit: false }));
    }

    #[test]
    fn save_without_path_asks_for_name() {
        let untitled = DispatchContext {
            has_path: false,
            ..DESKTOP
        };
        let t = dispatch(&Mode::Editing, untitled, Command::Save);
        let kind = PromptKind::SaveAs { then_exit: false };
        assert_eq!(t.mode, Mode::Prompting(kind));
        assert_eq!(t.effect, Some(Effect::OpenPrompt(kind)));

        let t = dispatch(&t.mode, untitled, Command::SubmitPrompt("  out.txt ".into()));
        assert_eq!(t.mode, Mode::Editing);
        assert_eq!(
            t.effect,
            Some(Effect::SaveAs {
                path: "out.txt".into(),
                then_exit: false
            })
        );
    }

    #[test]
    fn save_and_exit_is_terminal_only() {
        let t = dispatch(&Mode::Editing, TERMINAL, Command::SaveAndExit);
        assert_eq!(t.effect, Some(Effect::Save { then_exit: true }));

        let t = dispatch(&Mode::Editing, DESKTOP, Command::SaveAndExit);
        assert!(matches!(t.effect, Some(Effect::Notify(Notice::Unavailable(_)))));
    }

    #[test]
    fn cut_is_desktop_only() {
        assert_eq!(
            dispatch(&Mode::Editing, DESKTOP, Command::Cut).effect,
            Some(Effect::Cut)
        );
        assert!(matches!(
            dispatch(&Mode::Editing, TERMINAL, Command::Cut).effect,
            Some(Effect::Notify(Notice::Unavailable(_)))
        ));
    }

    #[test]
    fn rename_requires_path() {
        let untitled = DispatchContext {
            has_path: false,
            ..TERMINAL
        };
        let t = dispatch(&Mode::Editing, untitled, Command::Rename);
        assert_eq!(t.mode, Mode::Editing);
        assert_eq!(t.effect, Some(Effect::Notify(Notice::RenameNeedsSavedFile)));

        let t = dispatch(&Mode::Editing, TERMINAL, Command::Rename);
        assert_eq!(t.mode, Mode::Prompting(PromptKind::Rename));
    }

    #[test]
    fn empty_rename_input_cancels() {
        let mode = Mode::Prompting(PromptKind::Rename);
        let t = dispatch(&mode, TERMINAL, Command::SubmitPrompt("   ".into()));
        assert_eq!(t, Transition::stay(Mode::Editing));
    }

    #[test]
    fn search_submission_keeps_raw_input() {
        let mode = Mode::Prompting(PromptKind::Search);
        let t = dispatch(&mode, TERMINAL, Command::SubmitPrompt(" a ".into()));
        assert_eq!(t.effect, Some(Effect::Search(" a ".into())));
    }

    #[test]
    fn prompting_ignores_other_commands() {
        let mode = Mode::Prompting(PromptKind::Search);
        assert_eq!(
            dispatch(&mode, TERMINAL, Command::Save),
            Transition::stay(mode)
        );
        assert_eq!(
            dispatch(&mode, TERMINAL, Command::Cancel),
            Transition::stay(Mode::Editing)
        );
    }

    #[test]
    fn analysis_lifecycle() {
        let t = dispatch(&Mode::Editing, TERMINAL, Command::Analyze);
        assert_eq!(t.mode, Mode::AwaitingAiResult);
        assert_eq!(t.effect, Some(Effect::StartAnalysis));

        let busy = dispatch(&t.mode, TERMINAL, Command::Save);
        assert_eq!(busy.mode, Mode::AwaitingAiResult);
        assert_eq!(busy.effect, Some(Effect::Notify(Notice::Busy)));

        let done = dispatch(&t.mode, TERMINAL, Command::AnalysisFinished);
        assert_eq!(done.mode, Mode::ViewingAnalysis);

        let closed = dispatch(&done.mode, TERMINAL, Command::DismissAnalysis);
        assert_eq!(closed.mode, Mode::Editing);
    }

    #[test]
    fn cancel_while_waiting_cancels_task() {
        let t = dispatch(&Mode::AwaitingAiResult, TERMINAL, Command::Cancel);
        assert_eq!(t.mode, Mode::Editing);
        assert_eq!(t.effect, Some(Effect::CancelAnalysis));
    }

    #[test]
    fn cancel_while_editing_clears_search() {
        let t = dispatch(&Mode::Editing, TERMINAL, Command::Cancel);
        assert_eq!(t.effect, Some(Effect::ClearSearch));
    }
}
