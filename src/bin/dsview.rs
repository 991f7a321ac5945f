use clap::{Parser, ValueEnum};
use color_eyre::Result;
use crossterm::event::{Event as CEvent, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use dsview::config::Config;
use dsview::services::{Completion, HttpDatasetClient};
use dsview::tui::{App, KeyBindings};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info, warn};

/// Terminal client for exploring CSV datasets held by a dataset service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable file logging at the given level (overrides RUST_LOG)
    #[arg(long = "logging", value_enum)]
    logging: Option<LogLevel>,
    /// Path to a config file (overrides default config discovery)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Base URL of the dataset service (overrides the config file)
    #[arg(long = "server", value_name = "URL")]
    server: Option<String>,
    /// Path to the log file
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// CSV file to preselect in the chooser
    #[arg(long = "file", value_name = "PATH")]
    file: Option<PathBuf>,
    /// Upload the selected file on startup
    #[arg(long = "upload", requires = "file")]
    upload: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    dsview::logging::init_with(args.log_file.clone(), args.logging.map(Into::into))?;

    let mut config = Config::from_path(args.config.as_ref())?;
    if let Some(server) = args.server {
        config.service.base_url = server;
    }

    let keybindings = match &config.keybindings {
        Some(path) => KeyBindings::load_from_file(path)?,
        None => KeyBindings::default(),
    };
    for warning in keybindings.validate() {
        warn!("{warning}");
    }

    let client = HttpDatasetClient::builder(&config.service.base_url)
        .timeout(config.service.timeout())
        .histogram_bins(config.histogram.bins)
        .build()?;
    info!("using dataset service at {}", client.base_url());

    let (mut app, completions) = App::new(client, config.table.header_mode, keybindings);
    app.select_file(args.file);
    if args.upload {
        app.upload_selected();
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, completions).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    if let Err(e) = &res {
        error!("Error: {e}");
    }
    res
}

async fn run_app<B, S>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    mut completions: UnboundedReceiver<Completion>,
) -> Result<()>
where
    B: ratatui::backend::Backend,
    S: dsview::DatasetService + Send + Sync + 'static,
{
    let mut events = EventStream::new();

    while !app.should_quit() {
        terminal.draw(|f| app.render(f))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(CEvent::Key(key))) => app.handle_key_event(key)?,
                // Resize and friends only need a redraw
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(completion) = completions.recv() => app.on_completion(completion),
        }
    }

    Ok(())
}
