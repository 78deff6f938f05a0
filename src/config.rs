use crate::particles::{SampleRange, DEFAULT_RADIUS, DEFAULT_SPEED};
use crate::settings::DisplaySettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default number of disks in a session
pub const DEFAULT_PARTICLES: usize = 15;

/// Upper bound on the particle count (pairwise checks grow quadratically)
pub const MAX_PARTICLES: usize = 200;

/// Complete application configuration for export/import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Number of disks created per session
    pub num_particles: usize,
    /// Toggles and selectors from the sidebar
    pub display: DisplaySettings,
    /// Initial speed range (pixels per frame)
    pub speed_range: SampleRange,
    /// Range for per-disk random radii
    pub radius_range: SampleRange,
    /// Fixed RNG seed for reproducible sessions
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Default location: `<config dir>/disk-bounce/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("disk-bounce").join("config.json"))
    }

    /// Export config to a JSON file, creating parent directories as needed
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;
        Ok(config.sanitized())
    }

    /// Clamp values edited by hand into the ranges the UI allows
    pub fn sanitized(mut self) -> Self {
        self.num_particles = self.num_particles.clamp(1, MAX_PARTICLES);
        self.display.steps_per_frame = self.display.steps_per_frame.clamp(1, 10);
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            num_particles: DEFAULT_PARTICLES,
            display: DisplaySettings::default(),
            speed_range: DEFAULT_SPEED,
            radius_range: DEFAULT_RADIUS,
            seed: None,
        }
    }
}
