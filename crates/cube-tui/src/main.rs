mod app;
mod render;
mod theme;

use app::App;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use cube_core::{create_client, ClientMode, ConfigError, Orchestrator, SolverConfig};
use log::{info, LevelFilter};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "cube", version, about = "Terminal 3x3 cube with a remote solver")]
struct Cli {
    /// Config file in TOML format
    #[arg(long, short = 'c', env = "CUBE_SOLVER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL of the solve service
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Seconds to wait for each solve request
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Don't contact the solve service; solving falls back to reversing moves
    #[arg(long)]
    offline: bool,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cube-solver").join("config.toml"))
}

/// Defaults, then the config file, then environment, then flags
fn load_config(cli: &Cli) -> Result<SolverConfig, ConfigError> {
    let mut config = match (&cli.config, default_config_path()) {
        (Some(path), _) => SolverConfig::load(path)?,
        (None, Some(path)) => SolverConfig::load_or_default(&path)?,
        (None, None) => SolverConfig::default(),
    };
    config.apply_env()?;

    if let Some(url) = &cli.url {
        config.base_url = url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    Ok(config)
}

/// Log to a file so the alternate screen stays clean
fn init_logging(verbosity: u8) {
    let Some(path) = dirs::data_local_dir().map(|dir| dir.join("cube-solver.log")) else {
        return;
    };
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    env_logger::Builder::new()
        .filter_level(match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mode = if cli.offline {
        ClientMode::Offline
    } else {
        ClientMode::Http
    };
    let client = create_client(mode, &config);
    info!(
        "using {} solver at {} ({}s budget)",
        client.name(),
        config.base_url,
        config.timeout_secs
    );
    let orchestrator = Orchestrator::from_config(client, &config);
    let mut app = App::new(orchestrator, config.playback_delays());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.get_tick_rate();

        render::render(stdout, app)?;
        stdout.flush()?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            if let Event::Key(key) = event::read()? {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }

                match app.handle_key(key) {
                    app::AppAction::Continue => {}
                    app::AppAction::Quit => break,
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
