use crate::particles::Viewport;
use crate::sprites::{self, FrameView, Pixel};
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// Simulation pixels per braille dot
pub const PIXELS_PER_DOT: u32 = 4;

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

pub fn to_color(rgb: [u8; 3]) -> Color {
    Color::Rgb(rgb[0], rgb[1], rgb[2])
}

/// Render a frame to Braille characters.
///
/// A dot is lit where a disk covers it. Center markers stay unlit so they show through as
/// holes in the background color. Each cell takes the most common disk color among its dots.
pub fn render_to_braille(view: &FrameView, canvas_width: u16, canvas_height: u16) -> Vec<BrailleCell> {
    let braille_width = canvas_width as usize * 2;
    let braille_height = canvas_height as usize * 4;
    let grid = sprites::rasterize(view, braille_width, braille_height);

    let mut cells = Vec::new();

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            // At most 8 distinct colors per cell
            let mut counts: Vec<([u8; 3], usize)> = Vec::with_capacity(8);

            let base_bx = cx as usize * 2;
            let base_by = cy as usize * 4;

            for dx in 0..2 {
                for dy in 0..4 {
                    if let Pixel::Disk(color) = grid.get(base_bx + dx, base_by + dy) {
                        pattern |= BRAILLE_DOTS[dx][dy];
                        match counts.iter_mut().find(|(c, _)| *c == color) {
                            Some((_, n)) => *n += 1,
                            None => counts.push((color, 1)),
                        }
                    }
                }
            }

            // Only emit cells that have at least one dot
            if pattern != 0 {
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                let dominant = counts
                    .iter()
                    .max_by_key(|(_, n)| *n)
                    .map(|(c, _)| *c)
                    .unwrap_or(sprites::GOLD);

                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                    color: to_color(dominant),
                });
            }
        }
    }

    cells
}

/// Calculate the simulation viewport for a given canvas size
pub fn calculate_viewport(canvas_width: u16, canvas_height: u16) -> Viewport {
    // Braille gives 2x4 resolution per character
    let width = (canvas_width as u32 * 2).max(32) * PIXELS_PER_DOT;
    let height = (canvas_height as u32 * 4).max(32) * PIXELS_PER_DOT;
    Viewport::new(width, height)
}
