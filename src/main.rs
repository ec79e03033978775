use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyEvent, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::env;
use std::fs::File;
use std::io::{stdout, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fireworks::clock::FrameClock;
use fireworks::input::{Action, HeldKeys};
use fireworks::render::{self, Canvas, Hud};
use fireworks::sim::{Config, Simulation, WORLD_HEIGHT};

const DEFAULT_BG_COLOR: (u8, u8, u8) = (5, 5, 25);
const FPS: u32 = 60;

struct Options {
    config_path: PathBuf,
    seed: Option<u64>,
    bg_color: (u8, u8, u8),
    log_path: Option<PathBuf>,
}

fn print_usage() {
    eprintln!("fireworks - Terminal fireworks with live-tunable physics");
    eprintln!();
    eprintln!("Usage: fireworks [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config PATH      JSON settings file (default: config.json)");
    eprintln!("  --seed N           Seed the random source for a reproducible show");
    eprintln!("  --bg-color RRGGBB  Set background color as hex (e.g., --bg-color 1a1b26)");
    eprintln!("  --log PATH         Write logs to PATH (filter with RUST_LOG)");
    eprintln!();
    eprintln!("Controls:");
    eprintln!("  SPACE pause, ESC reset, G/B gravity, Up/Down rocket speed,");
    eprintln!("  Q/E launch rate, R/F spark spread, PgUp/PgDn spark count");
    eprintln!();
    eprintln!("Press 'x' or Ctrl+C to exit");
}

/// Owns the terminal modes for the lifetime of the show and restores them
/// on drop, whichever way the loop exits.
struct TerminalGuard {
    stdout: BufWriter<Stdout>,
    enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self {
            stdout: BufWriter::with_capacity(1024 * 64, stdout()),
            enhanced: false,
        };
        execute!(guard.stdout, EnterAlternateScreen, Hide, Clear(ClearType::All), EnableFocusChange)?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                guard.stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            guard.enhanced = true;
        }
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(self.stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen, DisableFocusChange);
        let _ = terminal::disable_raw_mode();
    }
}

/// Feeds one key to the show. Returns true when the key asks to quit.
fn apply_key(keys: &mut HeldKeys, sim: &mut Simulation, key: &KeyEvent) -> bool {
    match keys.handle(key) {
        Some(Action::Quit) => return true,
        Some(Action::TogglePause) => sim.toggle_pause(),
        Some(Action::Reset) => sim.reset(),
        Some(Action::Adjust(_)) | None => {}
    }
    false
}

fn run(options: &Options) -> std::io::Result<()> {
    let config = Config::load_or_default(&options.config_path);
    let rng = match options.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let mut term = TerminalGuard::enter()?;
    let (cols, rows) = terminal::size()?;
    let mut canvas = Canvas::new(cols as usize, rows as usize, options.bg_color);
    let mut sim = Simulation::new(canvas.world_width(), WORLD_HEIGHT, config, rng);
    let mut hud = Hud::new(cols as usize, rows as usize);
    let mut keys = HeldKeys::new(term.enhanced);
    let mut clock = FrameClock::new(FPS);
    info!(cols, rows, key_release = term.enhanced, "show started");

    let mut quit = false;
    loop {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => quit |= apply_key(&mut keys, &mut sim, &key),
                Event::Resize(cols, rows) => {
                    canvas = Canvas::new(cols as usize, rows as usize, options.bg_color);
                    sim.set_bounds(canvas.world_width(), WORLD_HEIGHT);
                    // the panel has to be repainted onto the cleared screen
                    hud = Hud::new(cols as usize, rows as usize);
                    execute!(term.stdout, Clear(ClearType::All))?;
                    let (world_width, _) = sim.bounds();
                    info!(cols, rows, world_width, "terminal resized");
                }
                Event::FocusLost => keys.release_all(),
                _ => {}
            }
        }

        sim.step(keys.take_active());

        render::draw_scene(&mut canvas, &sim);
        term.stdout.write_all(canvas.encode()?)?;
        term.stdout.write_all(hud.overlay(&sim)?)?;
        term.stdout.flush()?;

        // quit takes effect once the frame it arrived in is on screen
        if quit {
            break;
        }
        clock.tick();
    }

    info!(
        fireworks = sim.fireworks().len(),
        sparks = sim.particle_count(),
        "show stopped"
    );
    Ok(())
}

fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

fn exit_with(message: &str) -> ! {
    eprintln!("{message}");
    eprintln!();
    print_usage();
    std::process::exit(1);
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut options = Options {
        config_path: PathBuf::from("config.json"),
        seed: None,
        bg_color: DEFAULT_BG_COLOR,
        log_path: None,
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--config" => match value {
                Some(path) => options.config_path = PathBuf::from(path),
                None => exit_with("--config requires a file path"),
            },
            "--seed" => match value.map(|v| v.parse::<u64>()) {
                Some(Ok(seed)) => options.seed = Some(seed),
                Some(Err(_)) => exit_with("--seed expects an unsigned integer"),
                None => exit_with("--seed requires a value"),
            },
            "--bg-color" => match value {
                Some(hex) => match parse_hex_color(hex) {
                    Some(color) => options.bg_color = color,
                    None => exit_with(&format!(
                        "Invalid hex color: {hex}\nExpected format: RRGGBB (e.g., 1a1b26)"
                    )),
                },
                None => exit_with("--bg-color requires a hex color value"),
            },
            "--log" => match value {
                Some(path) => options.log_path = Some(PathBuf::from(path)),
                None => exit_with("--log requires a file path"),
            },
            "help" | "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            arg => exit_with(&format!("Unknown option: {arg}")),
        }
        i += 2;
    }

    if let Some(path) = &options.log_path {
        init_logging(path)?;
    }
    info!(
        config = %options.config_path.display(),
        seed = ?options.seed,
        "starting fireworks"
    );

    let result = run(&options);
    if let Err(err) = &result {
        warn!(%err, "show aborted");
    }
    result
}
