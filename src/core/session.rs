//! 編集セッション
//!
//! ドキュメント・モード・検索状態・分析タスクを所有し、`dispatch` が返す
//! 副作用を実行する。端末版と GUI 版で共通。

use super::dispatch::{dispatch, DispatchContext, Effect, Mode, Notice, PromptKind};
use crate::ai::{AnalysisTask, Analyzer, TaskPoll};
use crate::error::{AddError, StatusMessage};
use crate::file::{expand_path, Document};
use crate::input::{Command, Variant};
use crate::search::{MatchSpan, SearchOutcome, SearchState};
use std::time::Duration;

/// フロントエンドが追加で行う処理
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// 何もしない
    None,
    /// プロンプトを開く
    OpenPrompt { kind: PromptKind, initial: String },
    /// マッチ位置へカーソルを移動
    JumpTo(MatchSpan),
    /// ウィジェットのカットを実行
    Cut,
    /// アプリケーション終了
    Quit,
}

#[derive(Debug)]
pub struct Session {
    document: Document,
    mode: Mode,
    variant: Variant,
    search: SearchState,
    status: Option<StatusMessage>,
    analyzer: Analyzer,
    task: Option<AnalysisTask>,
    analysis: Option<String>,
    running: bool,
    /// 検索開始位置（文字オフセット）
    cursor_offset: usize,
}

impl Session {
    pub fn new(document: Document, analyzer: Analyzer, variant: Variant) -> Self {
        Self {
            document,
            mode: Mode::Editing,
            variant,
            search: SearchState::new(),
            status: None,
            analyzer,
            task: None,
            analysis: None,
            running: true,
            cursor_offset: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_busy(&self) -> bool {
        self.mode.is_busy()
    }

    /// 期限切れでないステータスメッセージ
    pub fn status_message(&self) -> Option<&StatusMessage> {
        self.status.as_ref().filter(|status| !status.is_expired())
    }

    /// 最後の分析結果
    pub fn analysis(&self) -> Option<&str> {
        self.analysis.as_deref()
    }

    /// 実行中の分析の経過時間
    pub fn analysis_elapsed(&self) -> Option<Duration> {
        self.task.as_ref().map(AnalysisTask::elapsed)
    }

    /// ウィジェット側の編集結果を反映
    pub fn update_text(&mut self, text: &str) {
        if self.document.set_text(text) {
            self.search.invalidate();
        }
    }

    pub fn set_cursor_offset(&mut self, offset: usize) {
        self.cursor_offset = offset;
    }

    /// コマンドを実行
    pub fn execute(&mut self, command: Command) -> Reaction {
        log::debug!("command {} in {:?}", command.name(), self.mode);
        let context = DispatchContext {
            has_path: self.document.has_path(),
            variant: self.variant,
        };
        let transition = dispatch(&self.mode, context, command);
        self.mode = transition.mode;

        match transition.effect {
            Some(effect) => self.perform(effect),
            None => Reaction::None,
        }
    }

    /// 分析タスクの確認。表示更新が必要なら true
    pub fn tick(&mut self) -> bool {
        let expired = self.status.as_ref().is_some_and(StatusMessage::is_expired);
        if expired {
            self.status = None;
        }

        let Some(task) = self.task.as_ref() else {
            return expired;
        };

        match task.poll() {
            TaskPoll::Pending => true,
            TaskPoll::Finished(text) => {
                self.task = None;
                self.analysis = Some(text);
                self.execute(Command::AnalysisFinished);
                true
            }
        }
    }

    fn perform(&mut self, effect: Effect) -> Reaction {
        match effect {
            Effect::Save { then_exit } => self.save(then_exit),
            Effect::SaveAs { path, then_exit } => self.save_as(&path, then_exit),
            Effect::OpenPrompt(kind) => {
                let initial = match kind {
                    PromptKind::Search => self.search.pattern().to_string(),
                    PromptKind::Rename | PromptKind::SaveAs { .. } => String::new(),
                };
                Reaction::OpenPrompt { kind, initial }
            }
            Effect::Rename(name) => {
                let renamed = self.document.rename(&name).map(|_| ());
                match renamed {
                    Ok(()) => {
                        let label = self.document.display_name();
                        self.set_status(StatusMessage::info(format!(
                            "'{}' に名前を変更しました",
                            label
                        )));
                    }
                    Err(err) => self.report(err.into()),
                }
                Reaction::None
            }
            Effect::Search(term) => self.search_for(&term),
            Effect::ClearSearch => {
                self.search.invalidate();
                Reaction::None
            }
            Effect::StartAnalysis => {
                self.analysis = None;
                self.task = Some(self.analyzer.start(self.document.text().to_string()));
                Reaction::None
            }
            Effect::CancelAnalysis => {
                if let Some(task) = self.task.take() {
                    task.cancel();
                }
                self.set_status(StatusMessage::info("AI 分析をキャンセルしました"));
                Reaction::None
            }
            Effect::Cut => Reaction::Cut,
            Effect::Notify(notice) => {
                self.set_status(StatusMessage::warning(notice_text(notice)));
                Reaction::None
            }
        }
    }

    fn save(&mut self, then_exit: bool) -> Reaction {
        match self.document.save() {
            Ok(()) => self.after_save(then_exit),
            Err(err) => {
                self.report(err.into());
                Reaction::None
            }
        }
    }

    fn save_as(&mut self, input: &str, then_exit: bool) -> Reaction {
        let saved = expand_path(input).and_then(|path| self.document.save_as(path));
        match saved {
            Ok(()) => self.after_save(then_exit),
            Err(err) => {
                self.report(err.into());
                Reaction::None
            }
        }
    }

    fn after_save(&mut self, then_exit: bool) -> Reaction {
        let label = self.document.display_name();
        self.set_status(StatusMessage::info(format!("'{}' を保存しました", label)));
        if then_exit {
            self.running = false;
            Reaction::Quit
        } else {
            Reaction::None
        }
    }

    fn search_for(&mut self, term: &str) -> Reaction {
        if term.is_empty() {
            self.search.invalidate();
            return Reaction::None;
        }

        match self.search.search(self.document.text(), term, self.cursor_offset) {
            SearchOutcome::Found {
                current,
                total,
                wrapped,
            } => {
                let suffix = if wrapped { "（先頭から再検索）" } else { "" };
                self.set_status(StatusMessage::info(format!(
                    "'{}' {}/{}{}",
                    term, current, total, suffix
                )));
                match self.search.current() {
                    Some(span) => {
                        self.cursor_offset = span.end;
                        Reaction::JumpTo(*span)
                    }
                    None => Reaction::None,
                }
            }
            SearchOutcome::NotFound => {
                self.set_status(StatusMessage::warning(format!(
                    "'{}' は見つかりませんでした",
                    term
                )));
                Reaction::None
            }
        }
    }

    fn report(&mut self, error: AddError) {
        log::warn!("{}", error);
        self.set_status(StatusMessage::from_error(&error));
    }

    fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }
}

fn notice_text(notice: Notice) -> String {
    match notice {
        Notice::RenameNeedsSavedFile => {
            "リネームするには先にファイルを保存してください".to_string()
        }
        Notice::Unavailable(name) => format!("'{}' はこの画面では使えません", name),
        Notice::Busy => "AI 分析中です（Esc でキャンセル）".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::TextGenerator;
    use crate::error::ai::Result;
    use std::sync::Arc;
    use std::time::Instant;
    use tempfile::TempDir;

    struct Echo;

    impl TextGenerator for Echo {
        fn generate(&self, prompt: &str) -> Result<String> {
            Ok(format!("len={}", prompt.len()))
        }
    }

    fn session(document: Document, variant: Variant) -> Session {
        let analyzer = Analyzer::new(Arc::new(Echo), Duration::from_secs(5));
        Session::new(document, analyzer, variant)
    }

    #[test]
    fn save_clears_dirty_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        let mut s = session(Document::open(&path).unwrap(), Variant::Terminal);

        s.update_text("hello");
        assert!(s.document().is_dirty());
        assert_eq!(s.execute(Command::Save), Reaction::None);
        assert!(!s.document().is_dirty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
        assert!(s.status_message().unwrap().text.contains("保存しました"));
    }

    #[test]
    fn save_and_exit_quits_after_saving() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        let mut s = session(Document::open(&path).unwrap(), Variant::Terminal);
        s.update_text("bye");

        assert_eq!(s.execute(Command::SaveAndExit), Reaction::Quit);
        assert!(!s.is_running());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "bye");
    }

    #[test]
    fn untitled_save_goes_through_prompt() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("new.txt");
        let mut s = session(Document::untitled(), Variant::Desktop);
        s.update_text("draft");

        let reaction = s.execute(Command::Save);
        assert!(matches!(reaction, Reaction::OpenPrompt { .. }));
        s.execute(Command::SubmitPrompt(target.display().to_string()));

        assert_eq!(s.mode(), Mode::Editing);
        assert_eq!(s.document().path(), Some(target.as_path()));
        assert!(!s.document().is_dirty());
    }

    #[test]
    fn search_jumps_and_reports_position() {
        let mut s = session(Document::untitled(), Variant::Terminal);
        s.update_text("foo bar foo");

        s.execute(Command::Search);
        let reaction = s.execute(Command::SubmitPrompt("FOO".into()));
        match reaction {
            Reaction::JumpTo(span) => assert_eq!(span.range(), (0, 3)),
            other => panic!("unexpected reaction: {:?}", other),
        }
        assert!(s.status_message().unwrap().text.contains("1/2"));

        s.execute(Command::Search);
        let reaction = s.execute(Command::SubmitPrompt("FOO".into()));
        assert!(matches!(reaction, Reaction::JumpTo(span) if span.start == 8));
    }

    #[test]
    fn search_prompt_is_prefilled_with_last_pattern() {
        let mut s = session(Document::untitled(), Variant::Terminal);
        s.update_text("abc");
        s.execute(Command::Search);
        s.execute(Command::SubmitPrompt("b".into()));

        assert_eq!(
            s.execute(Command::Search),
            Reaction::OpenPrompt {
                kind: PromptKind::Search,
                initial: "b".to_string()
            }
        );
    }

    #[test]
    fn editing_invalidates_matches() {
        let mut s = session(Document::untitled(), Variant::Terminal);
        s.update_text("abc abc");
        s.execute(Command::Search);
        s.execute(Command::SubmitPrompt("abc".into()));
        assert!(s.search().is_active());

        s.update_text("abc ab");
        assert!(!s.search().is_active());
    }

    #[test]
    fn not_found_is_reported() {
        let mut s = session(Document::untitled(), Variant::Terminal);
        s.update_text("abc");
        s.execute(Command::Search);
        assert_eq!(s.execute(Command::SubmitPrompt("zzz".into())), Reaction::None);
        assert!(s.status_message().unwrap().text.contains("見つかりません"));
    }

    #[test]
    fn rename_without_path_warns() {
        let mut s = session(Document::untitled(), Variant::Terminal);
        assert_eq!(s.execute(Command::Rename), Reaction::None);
        assert_eq!(s.mode(), Mode::Editing);
        assert!(s.status_message().is_some());
    }

    #[test]
    fn analysis_result_is_delivered_by_tick() {
        let mut s = session(Document::untitled(), Variant::Terminal);
        s.update_text("abc");
        s.execute(Command::Analyze);
        assert!(s.is_busy());

        let start = Instant::now();
        while s.is_busy() && start.elapsed() < Duration::from_secs(5) {
            s.tick();
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(s.mode(), Mode::ViewingAnalysis);
        assert!(s.analysis().unwrap().starts_with("len="));
        s.execute(Command::DismissAnalysis);
        assert_eq!(s.mode(), Mode::Editing);
    }

    #[test]
    fn cancelling_analysis_returns_to_editing() {
        let mut s = session(Document::untitled(), Variant::Terminal);
        s.execute(Command::Analyze);
        s.execute(Command::Cancel);
        assert_eq!(s.mode(), Mode::Editing);
        assert!(s.analysis_elapsed().is_none());
        assert!(!s.tick());
    }

    #[test]
    fn cut_is_forwarded_on_desktop() {
        let mut s = session(Document::untitled(), Variant::Desktop);
        assert_eq!(s.execute(Command::Cut), Reaction::Cut);
    }
}
