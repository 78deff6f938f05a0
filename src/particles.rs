use crate::error::SimError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Speed range of freshly spawned particles, in pixels per frame
pub const DEFAULT_SPEED: SampleRange = SampleRange { min: 4.0, max: 7.0 };

/// Radius range used when every particle keeps its own size
pub const DEFAULT_RADIUS: SampleRange = SampleRange { min: 8.0, max: 40.0 };

/// Drawing area in simulation pixels. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Width and height as floating point bounds
    pub fn bounds(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }
}

/// Closed interval that particle properties are sampled from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRange {
    pub min: f32,
    pub max: f32,
}

impl SampleRange {
    #[cfg(test)]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Check bounds are finite, ordered, and not below `floor`.
    /// With `inclusive_floor` false the lower bound must be strictly above it.
    fn validate(&self, name: &'static str, floor: f32, inclusive_floor: bool) -> Result<(), SimError> {
        let above_floor = if inclusive_floor {
            self.min >= floor
        } else {
            self.min > floor
        };
        if !self.min.is_finite() || !self.max.is_finite() || !above_floor || self.min > self.max {
            return Err(SimError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.gen_range(self.min..=self.max)
    }
}

/// A single disk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Velocity in pixels per frame
    pub vx: f32,
    pub vy: f32,
    /// Stored radius, used when sizes are per particle
    pub radius: f32,
    /// RGB components in [0, 1]
    pub color: [f32; 3],
}

impl Particle {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            radius,
            color: [1.0, 1.0, 1.0],
        }
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }
}

/// How the effective radius of each particle is chosen for a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusMode {
    /// Every particle uses the same radius
    Shared(f32),
    /// Every particle uses its own stored radius
    PerParticle,
}

impl RadiusMode {
    /// Map the size parameter (a diameter) to a radius mode. Zero selects per-particle sizes.
    pub fn from_size(size: u32) -> Self {
        if size == 0 {
            RadiusMode::PerParticle
        } else {
            RadiusMode::Shared(size as f32 / 2.0)
        }
    }

    /// Build the effective radius of every particle for one frame
    pub fn resolve(&self, set: &ParticleSet) -> Vec<f32> {
        match *self {
            RadiusMode::Shared(radius) => vec![radius; set.len()],
            RadiusMode::PerParticle => set.particles.iter().map(|p| p.radius).collect(),
        }
    }
}

/// The whole population of a session. The particle count never changes after creation.
#[derive(Debug, Clone)]
pub struct ParticleSet {
    particles: Vec<Particle>,
}

impl ParticleSet {
    /// Scatter `n` particles uniformly over the viewport with random headings, speeds,
    /// radii and colors.
    pub fn initialize<R: Rng + ?Sized>(
        n: usize,
        viewport: Viewport,
        speed: SampleRange,
        radius: SampleRange,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        if n == 0 {
            return Err(SimError::EmptyPopulation);
        }
        viewport.validate()?;
        speed.validate("speed", 0.0, true)?;
        radius.validate("radius", 0.0, false)?;

        let (width, height) = viewport.bounds();
        let mut particles = Vec::with_capacity(n);
        for _ in 0..n {
            let x = rng.gen_range(0.0..=width);
            let y = rng.gen_range(0.0..=height);
            let magnitude = speed.sample(rng);
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let r = radius.sample(rng);
            let color = [rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>()];
            particles.push(
                Particle::new(x, y, magnitude * angle.cos(), magnitude * angle.sin(), r)
                    .with_color(color),
            );
        }

        Ok(Self { particles })
    }

    /// Build a set from explicit particles
    #[cfg(test)]
    pub fn from_particles(particles: Vec<Particle>) -> Result<Self, SimError> {
        if particles.is_empty() {
            return Err(SimError::EmptyPopulation);
        }
        Ok(Self { particles })
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[cfg(test)]
    pub fn particle(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    /// Centers of every particle, in index order
    pub fn positions(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.particles.iter().map(|p| (p.x, p.y))
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}
