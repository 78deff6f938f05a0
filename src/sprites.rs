use crate::particles::{ParticleSet, Viewport};
use crate::settings::{ColorMode, DisplaySettings};

/// Color shared by all disks when random colors are off
pub const GOLD: [u8; 3] = [255, 215, 0];

/// Canvas clear color (30% gray)
pub const BACKGROUND: [u8; 3] = [77, 77, 77];

/// Center marker color
pub const MARKER: [u8; 3] = [0, 0, 0];

/// Diameter of the center marker in simulation pixels
const MARKER_SIZE: f32 = 6.0;

/// Read-only view of one frame, handed to the renderers after physics has run
pub struct FrameView<'a> {
    pub set: &'a ParticleSet,
    /// Effective radius of each particle for this frame
    pub radii: Vec<f32>,
    pub color_mode: ColorMode,
    pub show_dots: bool,
    pub viewport: Viewport,
}

impl<'a> FrameView<'a> {
    pub fn new(set: &'a ParticleSet, display: &DisplaySettings, viewport: Viewport) -> Self {
        Self {
            set,
            radii: display.size.radius_mode().resolve(set),
            color_mode: display.color_mode,
            show_dots: display.show_dots,
            viewport,
        }
    }

    /// Display color of particle `index`
    pub fn color_of(&self, index: usize) -> [u8; 3] {
        match self.color_mode {
            ColorMode::Shared => GOLD,
            ColorMode::Random => {
                let c = self.set.particles()[index].color;
                [to_byte(c[0]), to_byte(c[1]), to_byte(c[2])]
            }
        }
    }
}

fn to_byte(component: f32) -> u8 {
    (component.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// What ended up on a pixel after all sprites were drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    Background,
    Disk([u8; 3]),
    Marker,
}

impl Pixel {
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Pixel::Background => BACKGROUND,
            Pixel::Disk(color) => *color,
            Pixel::Marker => MARKER,
        }
    }
}

/// Rasterized frame, row-major
pub struct PixelGrid {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Pixel>,
}

impl PixelGrid {
    pub fn get(&self, x: usize, y: usize) -> Pixel {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Pixel::Background
        }
    }

    /// Packed RGB bytes, three per pixel
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.rgb()).collect()
    }
}

/// Draw the frame onto a `width` x `height` grid stretched over the whole viewport.
///
/// A pixel is covered when its sample point lies strictly inside a disk's effective radius.
/// Disks are painted in index order so later particles cover earlier ones. With the dots
/// overlay on, a small marker goes over every center after all disks.
pub fn rasterize(view: &FrameView, width: usize, height: usize) -> PixelGrid {
    let mut grid = PixelGrid {
        width,
        height,
        pixels: vec![Pixel::Background; width * height],
    };
    if width == 0 || height == 0 || view.set.is_empty() {
        return grid;
    }

    let (vw, vh) = view.viewport.bounds();
    // Simulation pixels per grid pixel
    let sx = vw / width as f32;
    let sy = vh / height as f32;

    for (i, p) in view.set.particles().iter().enumerate() {
        let color = Pixel::Disk(view.color_of(i));
        fill_disk(&mut grid, p.x, p.y, view.radii[i], sx, sy, color);
    }

    if view.show_dots {
        for (x, y) in view.set.positions() {
            fill_disk(&mut grid, x, y, MARKER_SIZE / 2.0, sx, sy, Pixel::Marker);
            // Keep the marker visible when grid pixels are larger than the marker
            let cx = (x / sx).floor();
            let cy = (y / sy).floor();
            if cx >= 0.0 && cy >= 0.0 && (cx as usize) < width && (cy as usize) < height {
                grid.pixels[cy as usize * width + cx as usize] = Pixel::Marker;
            }
        }
    }

    grid
}

/// Cover every grid pixel whose center sample lies inside the disk
fn fill_disk(grid: &mut PixelGrid, x: f32, y: f32, r: f32, sx: f32, sy: f32, pixel: Pixel) {
    if r <= 0.0 {
        return;
    }

    // Pixel index bounds of the disk's bounding box
    let min_px = ((x - r) / sx).floor().max(0.0) as usize;
    let max_px = (((x + r) / sx).ceil().max(0.0) as usize).min(grid.width);
    let min_py = ((y - r) / sy).floor().max(0.0) as usize;
    let max_py = (((y + r) / sy).ceil().max(0.0) as usize).min(grid.height);
    let r_sq = r * r;

    for py in min_py..max_py {
        let sample_y = (py as f32 + 0.5) * sy;
        let dy = sample_y - y;
        for px in min_px..max_px {
            let sample_x = (px as f32 + 0.5) * sx;
            let dx = sample_x - x;
            if dx * dx + dy * dy < r_sq {
                grid.pixels[py * grid.width + px] = pixel;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::Particle;
    use crate::settings::SizeChoice;

    fn display(size: u32, color_mode: ColorMode, show_dots: bool) -> DisplaySettings {
        DisplaySettings {
            size: SizeChoice::new(size).unwrap(),
            color_mode,
            show_dots,
            ..DisplaySettings::default()
        }
    }

    #[test]
    fn test_disk_covers_inside_only() {
        let set = ParticleSet::from_particles(vec![Particle::new(50.0, 50.0, 0.0, 0.0, 10.0)])
            .unwrap();
        let view = FrameView::new(&set, &display(0, ColorMode::Shared, false), Viewport::new(100, 100));

        let grid = rasterize(&view, 100, 100);

        assert_eq!(grid.get(50, 50), Pixel::Disk(GOLD));
        assert_eq!(grid.get(56, 56), Pixel::Disk(GOLD));
        // Corner of the bounding box lies outside the circle
        assert_eq!(grid.get(41, 41), Pixel::Background);
        assert_eq!(grid.get(70, 50), Pixel::Background);
    }

    #[test]
    fn test_shared_size_overrides_stored_radius() {
        let set = ParticleSet::from_particles(vec![Particle::new(50.0, 50.0, 0.0, 0.0, 2.0)])
            .unwrap();
        let view = FrameView::new(&set, &display(32, ColorMode::Shared, false), Viewport::new(100, 100));

        assert_eq!(view.radii, vec![16.0]);
        let grid = rasterize(&view, 100, 100);
        assert_eq!(grid.get(63, 50), Pixel::Disk(GOLD));
    }

    #[test]
    fn test_random_colors_and_draw_order() {
        let set = ParticleSet::from_particles(vec![
            Particle::new(40.0, 50.0, 0.0, 0.0, 10.0).with_color([1.0, 0.0, 0.0]),
            Particle::new(50.0, 50.0, 0.0, 0.0, 10.0).with_color([0.0, 0.0, 1.0]),
        ])
        .unwrap();
        let view = FrameView::new(&set, &display(0, ColorMode::Random, false), Viewport::new(100, 100));

        let grid = rasterize(&view, 100, 100);

        assert_eq!(grid.get(33, 50), Pixel::Disk([255, 0, 0]));
        // Overlap goes to the later particle
        assert_eq!(grid.get(45, 50), Pixel::Disk([0, 0, 255]));
    }

    #[test]
    fn test_center_markers_drawn_on_top() {
        let set = ParticleSet::from_particles(vec![Particle::new(50.0, 50.0, 0.0, 0.0, 10.0)])
            .unwrap();
        let viewport = Viewport::new(100, 100);

        let with_dots = FrameView::new(&set, &display(0, ColorMode::Shared, true), viewport);
        let grid = rasterize(&with_dots, 100, 100);
        assert_eq!(grid.get(50, 50), Pixel::Marker);
        assert_eq!(grid.get(56, 50), Pixel::Disk(GOLD));

        // Coarse grid: marker smaller than a grid pixel is still visible
        let coarse = rasterize(&with_dots, 10, 10);
        assert_eq!(coarse.get(5, 5), Pixel::Marker);
    }

    #[test]
    fn test_scaled_grid_and_empty_grid() {
        let set = ParticleSet::from_particles(vec![Particle::new(200.0, 100.0, 0.0, 0.0, 20.0)])
            .unwrap();
        let view = FrameView::new(&set, &display(0, ColorMode::Shared, false), Viewport::new(400, 200));

        let grid = rasterize(&view, 40, 20);
        assert_eq!(grid.get(20, 10), Pixel::Disk(GOLD));
        assert_eq!(grid.get(0, 0), Pixel::Background);

        let empty = rasterize(&view, 0, 0);
        assert!(empty.pixels.is_empty());
    }

    #[test]
    fn test_rgb_bytes_layout() {
        let set = ParticleSet::from_particles(vec![Particle::new(0.5, 0.5, 0.0, 0.0, 0.4)])
            .unwrap();
        let view = FrameView::new(&set, &display(0, ColorMode::Shared, false), Viewport::new(2, 1));

        let bytes = rasterize(&view, 2, 1).to_rgb_bytes();
        assert_eq!(bytes, vec![255, 215, 0, 77, 77, 77]);
    }
}
