mod docker;
mod input;
mod logging;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

use laboon_core::controller::{Controller, InputEvent, Outcome, STATUS_TTL};
use laboon_core::fake::FakeRuntime;
use laboon_core::runtime::{RuntimeClient, RuntimeError};

use docker::DockerRuntime;
use ui::theme::Palette;

/// How long to wait for input before redrawing (keeps the status line ticking)
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "laboon")]
#[command(about = "Browse, select, pause, unpause, start and stop Docker containers", long_about = None)]
struct Cli {
    /// Write logs here instead of the system temp directory
    #[arg(long, env = "LABOON_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Seconds Docker waits for a container to stop before killing it
    #[arg(long, env = "LABOON_STOP_TIMEOUT", default_value_t = 10)]
    stop_timeout: i64,

    /// Only list running containers
    #[arg(long)]
    running_only: bool,

    /// Use built-in sample containers instead of Docker
    #[arg(long)]
    demo: bool,

    /// High contrast colours
    #[arg(long)]
    high_contrast: bool,
}

// --- Terminal setup/teardown ---
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init_file_logging(&log_path) {
        eprintln!("Warning: logging disabled ({}): {}", log_path.display(), e);
    }

    ui::theme::init(if cli.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::docker()
    });

    if cli.demo {
        info!("running in demo mode with the in-memory runtime");
        run(Ok(FakeRuntime::demo())).await
    } else {
        run(DockerRuntime::connect(cli.stop_timeout, cli.running_only).await).await
    }
}

/// Load the initial snapshot, then hand the terminal to the event loop.
/// Connection and listing failures end the process with status 1.
async fn run<R: RuntimeClient>(runtime: Result<R, RuntimeError>) -> io::Result<()> {
    let connected = match runtime {
        Ok(runtime) => Controller::connect(runtime).await,
        Err(e) => Err(e),
    };

    let controller = match connected {
        Ok(controller) => controller,
        Err(e) => {
            error!(error = %e, "startup failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    run_tui(controller).await
}

async fn run_tui<R: RuntimeClient>(mut controller: Controller<R>) -> io::Result<()> {
    let mut terminal = setup_terminal()?;

    let size = terminal.size()?;
    controller.handle(InputEvent::Resize {
        width: size.width,
        height: size.height,
    });

    let result = tui_loop(&mut terminal, &mut controller).await;
    restore_terminal(terminal)?;
    result
}

async fn tui_loop<R: RuntimeClient>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut Controller<R>,
) -> io::Result<()> {
    loop {
        controller.expire_status(Instant::now(), STATUS_TTL);
        terminal.draw(|f| ui::draw(f, controller))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        let Some(ev) = input::translate(event::read()?) else {
            continue;
        };

        match controller.handle(ev) {
            Outcome::Quit => break,
            Outcome::Dispatch(batch) => {
                // Show pending markers while the runtime calls block input
                terminal.draw(|f| ui::draw(f, controller))?;
                controller.dispatch(batch).await;
            }
            Outcome::Refresh => controller.reload().await,
            Outcome::Handled | Outcome::Ignored => {}
        }
    }

    info!("quit");
    Ok(())
}
