use add_editor::ai::{Analyzer, GeminiClient};
use add_editor::cli::{self, CliAction, CliOptions, RunMode};
use add_editor::config::{self, ConfigStore};
use add_editor::file::Document;
use add_editor::{error, logging, Backend, TuiApplication};
#[cfg(feature = "gui")]
use add_editor::{input::Variant, GuiApplication, Session};
use anyhow::Context;
use std::io;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    error::setup_panic_handler();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match cli::parse_args(&args) {
        CliAction::Run(options) => options,
        CliAction::Help => {
            print!("{}", cli::usage());
            return Ok(());
        }
        CliAction::Usage(message) => {
            eprintln!("{}\n", message);
            eprint!("{}", cli::usage());
            std::process::exit(1);
        }
    };

    logging::init(logging::resolve_log_path(options.debug_log.as_deref()));
    log::info!("add {} starting ({:?})", env!("CARGO_PKG_VERSION"), options.mode);

    let analyzer = setup_analyzer()?;
    run(options, analyzer)
}

/// 設定を読み込み（初回は対話的に作成）、分析器を用意する
fn setup_analyzer() -> anyhow::Result<Analyzer> {
    let path = config::config_path().context("設定ファイルのパスを解決できません")?;
    let store = ConfigStore::new(path);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let ai_config = config::ensure_ai_config(
        &store,
        |key| std::env::var(key).ok(),
        &mut stdin.lock(),
        &mut stdout,
    )
    .with_context(|| format!("AI の設定を読み込めません ({})", store.path().display()))?;

    let client = GeminiClient::new(&ai_config);
    Ok(Analyzer::new(Arc::new(client), ai_config.timeout))
}

fn run(options: CliOptions, analyzer: Analyzer) -> anyhow::Result<()> {
    let document = match &options.file {
        Some(path) => Document::open(path)
            .with_context(|| format!("ファイルを開けません: {}", path.display()))?,
        None => Document::untitled(),
    };

    match options.mode {
        RunMode::Tui => {
            let mut app = TuiApplication::new(Backend::new(document, analyzer));
            app.run().context("端末 UI の実行に失敗しました")?;
        }
        #[cfg(feature = "gui")]
        RunMode::Gui => {
            let session = Session::new(document, analyzer, Variant::Desktop);
            let mut app = GuiApplication::new(session)?;
            app.run().context("GUI の実行に失敗しました")?;
        }
        #[cfg(not(feature = "gui"))]
        RunMode::Gui => anyhow::bail!("このビルドは GUI に対応していません"),
    }

    log::info!("add exiting");
    Ok(())
}
