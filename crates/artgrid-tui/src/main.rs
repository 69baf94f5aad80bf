use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use artgrid_core::store::KeyValueStore;
use artgrid_core::{ArticCatalog, CatalogSource, Config, FileStore, SelectionController, StateStore};

mod action;
mod app;
mod backend;
mod input;
mod model;
mod theme;
mod tui_event;
mod view;

use app::App;

/// artgrid: page through the Art Institute of Chicago catalog and keep a
/// selection of artworks across pages.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the catalog API
    #[arg(long)]
    api_url: Option<String>,

    /// Rows per page
    #[arg(long)]
    page_size: Option<u32>,

    /// Directory holding the persisted selection and page
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Open this page instead of the persisted one
    #[arg(long)]
    page: Option<u32>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Print the persisted selection as JSON and exit
    #[arg(long)]
    print_selection: bool,
}

/// Resolve config from CLI flags > env vars > config file > defaults.
fn resolve_config(args: &Args, file: &artgrid_core::config_file::ConfigFile) -> Config {
    let mut config = Config::default();
    file.apply_to(&mut config);

    if let Some(url) = args
        .api_url
        .clone()
        .or_else(|| std::env::var("ARTGRID_API_URL").ok())
    {
        config.api_url = url;
    }
    if let Some(size) = args.page_size.filter(|&s| s > 0) {
        config.page_size = size;
    }
    if let Some(dir) = args
        .state_dir
        .clone()
        .or_else(|| std::env::var("ARTGRID_STATE_DIR").ok().map(PathBuf::from))
    {
        config.state_dir = Some(dir);
    }
    config
}

/// Log to a daily file under the cache dir; stdout belongs to the TUI.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = dirs::cache_dir()?.join("artgrid").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(
        dir,
        "artgrid.log",
    ));
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = init_logging();

    let config_file = artgrid_core::config_file::load_config();
    let config = resolve_config(&args, &config_file);
    tracing::info!(?config, "starting");

    let Some(state_dir) = config.resolved_state_dir() else {
        anyhow::bail!("could not determine a state directory; pass --state-dir");
    };
    let kv = FileStore::open(&state_dir)?;

    if args.print_selection {
        let selection = StateStore::new(kv).load_selection()?;
        println!("{}", serde_json::to_string_pretty(&selection)?);
        return Ok(());
    }

    let theme_name = args
        .theme
        .clone()
        .or_else(|| config_file.theme().map(str::to_string))
        .unwrap_or_else(|| "hacker".to_string());
    let theme = theme::Theme::from_name(&theme_name);

    let catalog: Arc<dyn CatalogSource> = Arc::new(ArticCatalog::from_config(&config));
    let store: StateStore<Box<dyn KeyValueStore>> = StateStore::new(Box::new(kv));
    let controller = SelectionController::new(Arc::clone(&catalog), store, config.page_size);
    let start_page = args.page.unwrap_or_else(|| controller.current_page());

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(controller, theme);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    app.backend_cmd_tx = Some(cmd_tx);

    tokio::spawn(backend::run(
        Arc::clone(&catalog),
        cmd_rx,
        event_tx,
        cancel.clone(),
    ));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    app.request_page(start_page);

    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let action = input::map_event(&evt, &app.input_mode);
                        app.update(action);
                    }
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit || cancel.is_cancelled() {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    tracing::info!(
        selected = app.controller.selection().len(),
        page = app.controller.current_page(),
        "exiting"
    );
    Ok(())
}
