use crate::particles::RadiusMode;
use serde::{Deserialize, Serialize};

/// Diameters offered by the size selector. Zero means every disk keeps its own random size.
pub const SIZE_CHOICES: [u32; 8] = [0, 8, 16, 24, 32, 48, 64, 96];

/// Color mode - how disks are painted
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    /// One constant gold color for every disk
    Shared,
    /// Each disk keeps the random color it was created with
    #[default]
    Random,
}

impl ColorMode {
    pub fn name(&self) -> &str {
        match self {
            ColorMode::Shared => "Gold",
            ColorMode::Random => "Random",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            ColorMode::Shared => ColorMode::Random,
            ColorMode::Random => ColorMode::Shared,
        }
    }
}

/// Disk size selector, stored as a diameter in simulation pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SizeChoice(u32);

impl Default for SizeChoice {
    fn default() -> Self {
        SizeChoice(32)
    }
}

impl SizeChoice {
    /// Accept only the diameters the selector offers
    pub fn new(diameter: u32) -> Option<Self> {
        SIZE_CHOICES.contains(&diameter).then_some(SizeChoice(diameter))
    }

    pub fn diameter(&self) -> u32 {
        self.0
    }

    pub fn is_random(&self) -> bool {
        self.0 == 0
    }

    pub fn radius_mode(&self) -> RadiusMode {
        RadiusMode::from_size(self.0)
    }

    pub fn name(&self) -> String {
        if self.is_random() {
            "Random".to_string()
        } else {
            format!("{}px", self.diameter())
        }
    }

    fn position(&self) -> usize {
        SIZE_CHOICES.iter().position(|&d| d == self.0).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        SizeChoice(SIZE_CHOICES[(self.position() + 1) % SIZE_CHOICES.len()])
    }

    pub fn prev(&self) -> Self {
        let len = SIZE_CHOICES.len();
        SizeChoice(SIZE_CHOICES[(self.position() + len - 1) % len])
    }
}

impl TryFrom<u32> for SizeChoice {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        SizeChoice::new(value).ok_or_else(|| {
            format!("size {} is not one of {:?}", value, SIZE_CHOICES)
        })
    }
}

impl From<SizeChoice> for u32 {
    fn from(size: SizeChoice) -> Self {
        size.0
    }
}

/// Everything the user can toggle while the simulation is running
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Whether frames advance the physics
    pub animate: bool,
    pub color_mode: ColorMode,
    /// Draw a small black marker at each disk center
    pub show_dots: bool,
    pub size: SizeChoice,
    /// Physics steps per rendered frame (1-10)
    pub steps_per_frame: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            animate: true,
            color_mode: ColorMode::Random,
            show_dots: true,
            size: SizeChoice::default(),
            steps_per_frame: 1,
        }
    }
}

impl DisplaySettings {
    pub fn toggle_animate(&mut self) {
        self.animate = !self.animate;
    }

    pub fn toggle_color_mode(&mut self) {
        self.color_mode = self.color_mode.toggle();
    }

    pub fn toggle_dots(&mut self) {
        self.show_dots = !self.show_dots;
    }

    /// Adjust steps per frame within bounds
    pub fn adjust_steps_per_frame(&mut self, delta: i32) {
        self.steps_per_frame = (self.steps_per_frame as i32 + delta).clamp(1, 10) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_cycles_through_choices() {
        let mut size = SizeChoice::new(0).unwrap();
        for expected in SIZE_CHOICES.iter().skip(1) {
            size = size.next();
            assert_eq!(size.diameter(), *expected);
        }
        assert!(size.next().is_random());
        assert_eq!(SizeChoice::new(0).unwrap().prev().diameter(), 96);
    }

    #[test]
    fn test_size_maps_to_radius_mode() {
        assert_eq!(SizeChoice::default().radius_mode(), RadiusMode::Shared(16.0));
        assert_eq!(SizeChoice::new(0).unwrap().radius_mode(), RadiusMode::PerParticle);
        assert!(SizeChoice::new(33).is_none());
    }

    #[test]
    fn test_size_serde_rejects_unknown() {
        let size: SizeChoice = serde_json::from_str("48").unwrap();
        assert_eq!(size.diameter(), 48);
        assert!(serde_json::from_str::<SizeChoice>("50").is_err());
    }

    #[test]
    fn test_steps_per_frame_bounds() {
        let mut settings = DisplaySettings::default();
        settings.adjust_steps_per_frame(-5);
        assert_eq!(settings.steps_per_frame, 1);
        settings.adjust_steps_per_frame(50);
        assert_eq!(settings.steps_per_frame, 10);
    }

    #[test]
    fn test_color_mode_toggle() {
        let mut settings = DisplaySettings::default();
        settings.toggle_color_mode();
        assert_eq!(settings.color_mode, ColorMode::Shared);
        settings.toggle_color_mode();
        assert_eq!(settings.color_mode, ColorMode::Random);
    }
}
