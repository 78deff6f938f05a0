use crate::braille;
use crate::config::{AppConfig, MAX_PARTICLES};
use crate::error::SimError;
use crate::export::{self, GifRecorder};
use crate::particles::{ParticleSet, SampleRange, Viewport};
use crate::physics::{self, StepReport};
use crate::settings::DisplaySettings;
use crate::sprites::FrameView;
use crate::ui;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::layout::Rect;
use std::path::PathBuf;

/// Frames a status message stays visible (about three seconds at 60fps)
const STATUS_FRAMES: u32 = 180;

/// Focus state for parameter editing in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    Animate,
    Colors,
    Dots,
    Size,
    Speed,
    Particles,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters in sidebar order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Animate,
            Focus::Animate => Focus::Colors,
            Focus::Colors => Focus::Dots,
            Focus::Dots => Focus::Size,
            Focus::Size => Focus::Speed,
            Focus::Speed => Focus::Particles,
            Focus::Particles => Focus::Animate,
        }
    }

    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Particles,
            Focus::Animate => Focus::Particles,
            Focus::Colors => Focus::Animate,
            Focus::Dots => Focus::Colors,
            Focus::Size => Focus::Dots,
            Focus::Speed => Focus::Size,
            Focus::Particles => Focus::Speed,
        }
    }

    /// Get the line index in the parameters box for this focus
    pub fn line_index(&self) -> u16 {
        match self {
            Focus::None | Focus::Controls => 0,
            Focus::Animate => 0,
            Focus::Colors => 1,
            Focus::Dots => 2,
            Focus::Size => 3,
            Focus::Speed => 4,
            Focus::Particles => 5,
        }
    }

    /// Check if focus is on a parameter (not Controls or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }
}

/// Main application state. Owns the particle set of the running session.
pub struct App {
    pub particles: ParticleSet,
    pub viewport: Viewport,
    pub display: DisplaySettings,
    pub num_particles: usize,
    speed_range: SampleRange,
    radius_range: SampleRange,
    seed: Option<u64>,
    rng: StdRng,
    /// Frames advanced in the current session
    pub frame: u64,
    pub last_report: StepReport,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    /// One-line feedback shown in the status box
    pub status: Option<String>,
    status_frames: u32,
    recorder: Option<GifRecorder>,
    /// Where `W` writes the configuration
    pub config_path: Option<PathBuf>,
    /// Where snapshots and recordings go
    pub output_dir: PathBuf,
}

impl App {
    pub fn new(config: AppConfig, viewport: Viewport) -> Result<Self, SimError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let particles = ParticleSet::initialize(
            config.num_particles,
            viewport,
            config.speed_range,
            config.radius_range,
            &mut rng,
        )?;
        tracing::info!(
            particles = config.num_particles,
            width = viewport.width,
            height = viewport.height,
            seed = ?config.seed,
            "session started"
        );

        Ok(Self {
            particles,
            viewport,
            display: config.display,
            num_particles: config.num_particles,
            speed_range: config.speed_range,
            radius_range: config.radius_range,
            seed: config.seed,
            rng,
            frame: 0,
            last_report: StepReport::default(),
            focus: Focus::Controls,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            status: None,
            status_frames: 0,
            recorder: None,
            config_path: AppConfig::default_path(),
            output_dir: PathBuf::from("."),
        })
    }

    /// Run the physics steps for one rendered frame, then feed an active recording
    pub fn tick(&mut self) {
        if self.status_frames > 0 {
            self.status_frames -= 1;
            if self.status_frames == 0 {
                self.status = None;
            }
        }

        if self.display.animate {
            let mode = self.display.size.radius_mode();
            let mut report = StepReport::default();
            for _ in 0..self.display.steps_per_frame {
                let step = physics::advance(&mut self.particles, mode, self.viewport);
                report.collisions += step.collisions;
                report.wall_bounces += step.wall_bounces;
            }
            self.frame += 1;
            self.last_report = report;
            tracing::trace!(
                frame = self.frame,
                collisions = report.collisions,
                wall_bounces = report.wall_bounces,
                "frame advanced"
            );
        }
        self.record_frame();
    }

    /// Read-only view of the current frame for the renderers
    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView::new(&self.particles, &self.display, self.viewport)
    }

    /// Throw the current particles away and scatter a fresh set
    pub fn start_session(&mut self) -> Result<(), SimError> {
        self.particles = ParticleSet::initialize(
            self.num_particles,
            self.viewport,
            self.speed_range,
            self.radius_range,
            &mut self.rng,
        )?;
        self.frame = 0;
        self.last_report = StepReport::default();
        tracing::info!(
            particles = self.num_particles,
            width = self.viewport.width,
            height = self.viewport.height,
            "session restarted"
        );
        Ok(())
    }

    /// Reset simulation
    pub fn reset(&mut self) {
        if let Err(e) = self.start_session() {
            tracing::error!(error = %e, "could not restart session");
            self.set_status(format!("Reset failed: {}", e));
        }
    }

    /// Resize the viewport to match a new canvas size. A new size means a new session.
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        let viewport = braille::calculate_viewport(canvas_width, canvas_height);
        if viewport != self.viewport {
            self.viewport = viewport;
            self.stop_recording();
            self.reset();
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Animate => self.display.toggle_animate(),
            Focus::Colors => self.display.toggle_color_mode(),
            Focus::Dots => self.display.toggle_dots(),
            Focus::Size => self.next_size(),
            Focus::Speed => self.display.adjust_steps_per_frame(1),
            Focus::Particles => self.adjust_particles(5),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Animate => self.display.toggle_animate(),
            Focus::Colors => self.display.toggle_color_mode(),
            Focus::Dots => self.display.toggle_dots(),
            Focus::Size => self.prev_size(),
            Focus::Speed => self.display.adjust_steps_per_frame(-1),
            Focus::Particles => self.adjust_particles(-5),
        }
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn toggle_animate(&mut self) {
        self.display.toggle_animate();
    }

    pub fn toggle_color_mode(&mut self) {
        self.display.toggle_color_mode();
    }

    pub fn toggle_dots(&mut self) {
        self.display.toggle_dots();
    }

    pub fn next_size(&mut self) {
        self.display.size = self.display.size.next();
    }

    pub fn prev_size(&mut self) {
        self.display.size = self.display.size.prev();
    }

    /// Increase simulation speed
    pub fn increase_speed(&mut self) {
        self.display.adjust_steps_per_frame(1);
    }

    /// Decrease simulation speed
    pub fn decrease_speed(&mut self) {
        self.display.adjust_steps_per_frame(-1);
    }

    /// Change the particle count (clamped) and start a new session with it
    pub fn adjust_particles(&mut self, delta: i32) {
        let new_val = (self.num_particles as i32 + delta).clamp(1, MAX_PARTICLES as i32) as usize;
        if new_val != self.num_particles {
            self.num_particles = new_val;
            self.reset();
        }
    }

    /// Show a message in the status box until it expires
    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.status_frames = STATUS_FRAMES;
    }

    /// Toggle fullscreen mode and refit the viewport to the new canvas
    pub fn toggle_fullscreen(&mut self, terminal_width: u16, terminal_height: u16) {
        self.fullscreen_mode = !self.fullscreen_mode;
        self.fit_to_terminal(terminal_width, terminal_height);
    }

    /// Size the viewport to the canvas left over in a terminal of this size
    pub fn fit_to_terminal(&mut self, terminal_width: u16, terminal_height: u16) {
        let (canvas_width, canvas_height) = ui::get_canvas_size(
            Rect::new(0, 0, terminal_width, terminal_height),
            self.fullscreen_mode,
        );
        self.resize(canvas_width, canvas_height);
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Snapshot of everything needed to recreate this setup
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            num_particles: self.num_particles,
            display: self.display.clone(),
            speed_range: self.speed_range,
            radius_range: self.radius_range,
            seed: self.seed,
            ..AppConfig::default()
        }
    }

    /// Write the running configuration to the config path
    pub fn save_config(&mut self) {
        let Some(path) = self.config_path.clone() else {
            self.set_status("No config directory available".to_string());
            return;
        };
        match self.to_config().save_to_file(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "config saved");
                self.set_status(format!("Saved {}", path.display()));
            }
            Err(e) => {
                tracing::error!(error = %e, "config save failed");
                self.set_status(e);
            }
        }
    }

    /// Save the current frame as a PNG
    pub fn snapshot(&mut self) {
        let path = export::timestamped_path(&self.output_dir, "png");
        match export::save_png(&self.frame_view(), &path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "snapshot saved");
                self.set_status(format!("Saved {}", path.display()));
            }
            Err(e) => {
                tracing::error!(error = %e, "snapshot failed");
                self.set_status(e);
            }
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Start a GIF recording, or finish the one in progress
    pub fn toggle_recording(&mut self) {
        if self.is_recording() {
            self.stop_recording();
            return;
        }
        let path = export::timestamped_path(&self.output_dir, "gif");
        match GifRecorder::start(&path, &self.frame_view()) {
            Ok(recorder) => {
                tracing::info!(path = %path.display(), "recording started");
                self.set_status("Recording...".to_string());
                self.recorder = Some(recorder);
            }
            Err(e) => {
                tracing::error!(error = %e, "recording failed to start");
                self.set_status(e);
            }
        }
    }

    fn stop_recording(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let frames = recorder.frames();
            match recorder.finish() {
                Ok(path) => {
                    tracing::info!(path = %path.display(), frames, "recording saved");
                    self.set_status(format!("Saved {} ({} frames)", path.display(), frames));
                }
                Err(e) => {
                    tracing::error!(error = %e, "recording failed to finish");
                    self.set_status(e);
                }
            }
        }
    }

    fn record_frame(&mut self) {
        let Some(mut recorder) = self.recorder.take() else {
            return;
        };
        let result = recorder.push(&self.frame_view());
        self.recorder = Some(recorder);
        match result {
            Ok(true) => {}
            Ok(false) => self.stop_recording(),
            Err(e) => {
                tracing::error!(error = %e, "recording aborted");
                self.set_status(e);
                self.recorder = None;
            }
        }
    }
}
