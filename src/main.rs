use std::fs;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use dotenvy::dotenv;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use unievent_client::api::ApiClient;
use unievent_client::app::{async_ops, App};
use unievent_client::config::Config;
use unievent_client::session::SessionStore;
use unievent_client::ui;
use unievent_client::utils::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();
    let config = Config::from_env();
    init_logging(&config)?;

    tracing::info!(api = %config.api_base_url, "Starting UNIEVENT client");

    let client = Arc::new(ApiClient::new(config.api_base_url.clone())?);
    let mut app = App::new(SessionStore::new(config.session_file.clone()));
    let (tx, mut rx) = mpsc::unbounded_channel();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, client, tx, &mut rx, config.tick_ms).await;

    // Always restore the terminal, even when the loop errored.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        e.log();
    }
    result
}

/// The terminal owns stdout, so log output goes to a file.
fn init_logging(config: &Config) -> Result<(), AppError> {
    if let Some(parent) = config.log_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = fs::File::create(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: Arc<ApiClient>,
    tx: mpsc::UnboundedSender<async_ops::CommandResult>,
    rx: &mut mpsc::UnboundedReceiver<async_ops::CommandResult>,
    tick_ms: u64,
) -> Result<(), AppError> {
    let tick = Duration::from_millis(tick_ms);
    loop {
        if let Some(command) = app.pending_command.take() {
            async_ops::dispatch(client.clone(), command, tx.clone());
        }

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Fold in whatever finished since the last frame.
        while let Ok(result) = rx.try_recv() {
            app.apply_command_result(result);
        }

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key.code) {
                    tracing::info!("Exiting");
                    return Ok(());
                }
            }
        }
    }
}
