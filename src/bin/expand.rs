use ceph_expand::api::create_backend;
use ceph_expand::error::{ExpandError, Result};
use ceph_expand::event::{Event, EventHandler};
use ceph_expand::expand::{ExpandAction, ExpandApp, ExpandConfig, Outbox};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::panic;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ceph-expand")]
#[command(author, version, about = "Cluster expansion wizard for the Ceph Dashboard")]
struct Args {
    /// Path to config file (default: /etc/ceph-expand/expand.toml)
    #[arg(long)]
    config: Option<String>,

    /// Dashboard URL, overrides the config file
    #[arg(long)]
    url: Option<String>,

    /// Dashboard user, overrides the config file
    #[arg(long)]
    user: Option<String>,

    /// Dashboard password, skips the login prompt
    #[arg(long, env = "CEPH_DASHBOARD_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Run against a built-in demo cluster (password: demo)
    #[arg(long)]
    dryrun: bool,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = Args::parse();

    // Set up logging only if log file is specified
    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();

            info!("Starting ceph-expand");
        }
    }

    let config = load_config(&args);
    let password = args.password.take().map(zeroize::Zeroizing::new);

    // Set up panic handler to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;

    let result = run_expand(&mut terminal, config, password.as_deref().map(String::as_str)).await;

    restore_terminal()?;

    if let Err(ref e) = result {
        error!("Expand error: {}", e);
    }

    result
}

/// Config file with command line overrides applied
fn load_config(args: &Args) -> ExpandConfig {
    let loaded = match args.config.as_deref() {
        Some(path) => ExpandConfig::load_from(path),
        None => ExpandConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        ExpandConfig::default()
    });

    if let Some(url) = &args.url {
        config.dashboard.url = url.clone();
    }
    if let Some(user) = &args.user {
        config.dashboard.username = user.clone();
    }
    if args.dryrun {
        config.general.dryrun = true;
    }
    config
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().map_err(|e| ExpandError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| ExpandError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).map_err(|e| ExpandError::Terminal(e.to_string()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| ExpandError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen).map_err(|e| ExpandError::Terminal(e.to_string()))?;
    Ok(())
}

async fn run_expand(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: ExpandConfig,
    password: Option<&str>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut events = EventHandler::new(tick_rate);

    let api = create_backend(&config.client_options(), config.general.dryrun)?;
    if config.general.dryrun {
        info!("Dry run: using the demo cluster");
    }

    let (outbox, mut messages) = Outbox::channel();
    let mut app = ExpandApp::new(config, api, outbox);

    if let Some(password) = password {
        app.set_password(password);
        app.perform(ExpandAction::Login);
    }

    loop {
        terminal
            .draw(|frame| ceph_expand::expand::ui::draw(frame, &app))
            .map_err(|e| ExpandError::Terminal(e.to_string()))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Event::Key(key)) => {
                    if let Some(action) = app.handle_key(key) {
                        app.perform(action);
                    }
                }
                Some(Event::Resize) => {}
                Some(Event::Tick) => app.tick(),
                None => break,
            },
            Some(msg) = messages.recv() => app.handle_message(msg),
        }

        if app.should_exit {
            break;
        }
    }

    Ok(())
}
