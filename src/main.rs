use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use chordpad::audio::{CpalDevice, GuitarEngine, OfflineDevice};
use chordpad::config::{self, Config, CHORDPAD_DIR};
use chordpad::loader::DirSource;
use chordpad::middle::Middle;
use chordpad::pipeline::Session;
use chordpad::shared::InputEvent;
use chordpad::tui;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let project_dir: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    init_logging(&project_dir)?;

    let config = config::load_config(&project_dir).unwrap_or_else(|e| {
        log::warn!("ignoring config: {e:#}");
        Config::default()
    });

    let mut track = config.track_settings();
    if let Some(name) = project_dir.file_name().and_then(|n| n.to_str()) {
        let _ = track.rename(name);
    }

    let samples = DirSource::new(config.samples_path(&project_dir));
    log::info!("samples from {}", samples.root().display());
    let engine = if probe_output() {
        GuitarEngine::new(CpalDevice, samples, config.engine_settings())
    } else {
        log::warn!("no usable audio output, running silent");
        GuitarEngine::new(OfflineDevice::new(44100), samples, config.engine_settings())
    };
    let mut middle = Middle::new(Session::new(track), engine, config.scheduler());

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = std::time::Duration::from_millis(16); // ~60fps
    let mut last_tick = Instant::now();
    let blink_start = Instant::now();

    loop {
        let blink_on = (blink_start.elapsed().as_millis() / 250) % 2 == 0;
        let ds = middle.display_state();

        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds, blink_on);
        })?;

        for event in tui::input::poll_input(tick_rate)? {
            if event == InputEvent::Quit {
                middle.handle_input(InputEvent::Stop);
                drop(term);
                log::info!("bye");
                return Ok(());
            }
            middle.handle_input(event);
        }

        let elapsed = last_tick.elapsed().as_secs_f64();
        last_tick = Instant::now();
        middle.tick(elapsed);
    }
}

// Logs go to <project_dir>/.chordpad/chordpad.log, the terminal belongs to the UI
fn init_logging(project_dir: &Path) -> anyhow::Result<()> {
    let dir = project_dir.join(CHORDPAD_DIR);
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("chordpad.log"))
        .context("opening log file")?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// Whether cpal can find a default output at all. The real stream is only
// opened when the first sound is needed.
fn probe_output() -> bool {
    use cpal::traits::HostTrait;
    cpal::default_host().default_output_device().is_some()
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
