mod app;
mod braille;
mod config;
mod error;
mod export;
mod logging;
mod particles;
mod physics;
mod settings;
mod sprites;
mod ui;

use app::{App, Focus};
use clap::Parser;
use config::{AppConfig, MAX_PARTICLES};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::{ColorMode, SizeChoice, SIZE_CHOICES};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "disk-bounce")]
#[command(about = "Elastic disk collisions animated in the terminal")]
struct Args {
    /// Number of disks in a session (1-200)
    #[arg(short = 'p', long)]
    particles: Option<usize>,

    /// Disk diameter shared by all disks (0, 8, 16, 24, 32, 48, 64, 96; 0 = random per disk)
    #[arg(short = 's', long)]
    size: Option<u32>,

    /// Paint every disk in the same gold color
    #[arg(long)]
    mono: bool,

    /// Hide the center dots
    #[arg(long = "no-dots")]
    no_dots: bool,

    /// Start with the animation stopped
    #[arg(long)]
    paused: bool,

    /// Physics steps per frame (1-10)
    #[arg(long)]
    speed: Option<usize>,

    /// Seed for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,

    /// Load settings from this JSON file instead of the default config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file (logging is off without it)
    #[arg(long = "log-path")]
    log_path: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,
}

/// Load the explicit config file, or the saved default if one exists
fn load_config(args: &Args) -> Result<AppConfig, String> {
    if let Some(path) = &args.config {
        return AppConfig::load_from_file(path);
    }
    match AppConfig::default_path() {
        Some(path) if path.exists() => AppConfig::load_from_file(&path).or_else(|e| {
            eprintln!("Warning: {}, using defaults", e);
            Ok(AppConfig::default())
        }),
        _ => Ok(AppConfig::default()),
    }
}

/// Command line flags take precedence over the loaded config
fn apply_args(mut config: AppConfig, args: &Args) -> Result<AppConfig, String> {
    if let Some(particles) = args.particles {
        config.num_particles = particles.clamp(1, MAX_PARTICLES);
    }
    if let Some(size) = args.size {
        config.display.size = SizeChoice::new(size)
            .ok_or_else(|| format!("--size must be one of {:?}", SIZE_CHOICES))?;
    }
    if args.mono {
        config.display.color_mode = ColorMode::Shared;
    }
    if args.no_dots {
        config.display.show_dots = false;
    }
    if args.paused {
        config.display.animate = false;
    }
    if let Some(speed) = args.speed {
        config.display.steps_per_frame = speed.clamp(1, 10);
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_path {
        logging::setup_logging(path, &args.log_level)?;
    }

    let config = apply_args(load_config(&args)?, &args)?;
    let config_path = args.config.clone().or_else(AppConfig::default_path);

    // Build the session before taking over the terminal so errors print normally
    let (cols, rows) = crossterm::terminal::size()?;
    let (canvas_width, canvas_height) =
        ui::get_canvas_size(ratatui::layout::Rect::new(0, 0, cols, rows), false);
    let mut app = App::new(config, braille::calculate_viewport(canvas_width, canvas_height))?;
    app.config_path = config_path;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout
        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    match key.code {
                        // System controls
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => {
                            app.toggle_animate();
                            app.focus = Focus::Animate;
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
                        KeyCode::Char('v') | KeyCode::Char('V') => {
                            let size = terminal.size()?;
                            app.toggle_fullscreen(size.width, size.height);
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                        KeyCode::Char('c') | KeyCode::Char('C') => {
                            app.toggle_color_mode();
                            app.focus = Focus::Colors;
                        }
                        KeyCode::Char('d') | KeyCode::Char('D') => {
                            app.toggle_dots();
                            app.focus = Focus::Dots;
                        }
                        KeyCode::Char('x') | KeyCode::Char('X') => {
                            app.next_size();
                            app.focus = Focus::Size;
                        }
                        KeyCode::Char('z') | KeyCode::Char('Z') => {
                            app.prev_size();
                            app.focus = Focus::Size;
                        }
                        KeyCode::Char('+') | KeyCode::Char('=') => {
                            app.increase_speed();
                            app.focus = Focus::Speed;
                        }
                        KeyCode::Char('-') | KeyCode::Char('_') => {
                            app.decrease_speed();
                            app.focus = Focus::Speed;
                        }
                        KeyCode::Char('w') | KeyCode::Char('W') => app.save_config(),
                        KeyCode::Char('p') | KeyCode::Char('P') => app.snapshot(),
                        KeyCode::Char('g') | KeyCode::Char('G') => app.toggle_recording(),

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up | KeyCode::Right => {
                            if !app.show_help {
                                app.adjust_focused_up();
                            }
                        }
                        KeyCode::Down | KeyCode::Left => {
                            if !app.show_help {
                                app.adjust_focused_down();
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else if app.focus.is_param() {
                                app.focus = Focus::Controls;
                            }
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') => {
                            if app.show_help {
                                app.scroll_help_down(ui::HELP_CONTENT_LINES);
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Resize(width, height) => app.fit_to_terminal(width, height),
                _ => {}
            }
        }

        // Run simulation tick
        app.tick();
    }
}
