mod app;
mod ipc_client;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use aerokeys_core::config::Settings;
use app::App;
use ipc_client::{DaemonMessage, Messages, Requests};

#[tokio::main]
async fn main() -> io::Result<()> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => println!("aerokeys {}", env!("CARGO_PKG_VERSION")),
            _ => {
                println!("Usage: aerokeys");
                println!("Live AeroSpace cheat-sheet. Needs a running aerokeysd.");
                println!("For one-shot output use: aerokeys-cli show");
            }
        }
        return Ok(());
    }

    // Connect to daemon before terminal setup so errors print cleanly
    let (daemon_tx, daemon_rx) = match ipc_client::subscribe().await {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Failed to connect to aerokeysd daemon: {e}");
            eprintln!("Is the daemon running? Start it with: aerokeysd");
            std::process::exit(1);
        }
    };
    let settings = Settings::load();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &settings, daemon_tx, daemon_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
    daemon_tx: Requests,
    mut daemon_rx: Messages,
) -> io::Result<()> {
    let mut app = App::new(daemon_tx, settings);

    // Dedicated thread for crossterm event reading
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    std::thread::spawn(move || loop {
        if event::poll(Duration::from_millis(50)).unwrap_or(false) {
            if let Ok(ev) = event::read() {
                if event_tx.send(ev).is_err() {
                    break;
                }
            }
        }
    });

    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));
    let mut reconnect_interval = tokio::time::interval(Duration::from_secs(2));

    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        tokio::select! {
            Some(ev) = event_rx.recv() => {
                if let Event::Key(key) = ev {
                    if key.kind == KeyEventKind::Press {
                        app.handle_key(key);
                    }
                }
            }
            Some(msg) = daemon_rx.recv() => {
                match msg {
                    DaemonMessage::Event(event) => app.apply_event(*event),
                    DaemonMessage::Disconnected => app.connected = false,
                }
            }
            _ = tick_interval.tick() => {
                app.clear_expired_status();
            }
            _ = reconnect_interval.tick(), if !app.connected => {
                if let Ok((new_tx, new_rx)) = ipc_client::subscribe().await {
                    app.daemon_tx = new_tx;
                    daemon_rx = new_rx;
                    app.connected = true;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
