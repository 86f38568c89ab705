// ABOUTME: Entry point for the Metal HUD toggle.
// ABOUTME: Loads config, reads the HUD preference, and runs the winit window with its timer thread.

mod activity;
mod config;
mod hud;
mod persistence;
mod state;
mod timers;
mod window;

use winit::event_loop::EventLoop;

use config::Config;
use timers::{AppEvent, Timers};
use window::App;

type DynError = Box<dyn std::error::Error + Send + Sync>;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        tracing::error!("Fatal: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), DynError> {
    let config = Config::load()?;
    tracing::info!("Preference shell: {}", config.defaults.shell);

    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    let timers = Timers::spawn(event_loop.create_proxy());

    let mut app = App::new(config, timers, persistence::state_file_path());
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.take_fatal() {
        return Err(e);
    }
    tracing::info!("Window closed, exiting");
    Ok(())
}
