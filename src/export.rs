use crate::sprites::{self, FrameView};
use image::RgbImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Recordings stop on their own after this many frames
pub const MAX_GIF_FRAMES: usize = 300;

/// GIF frames are captured at this fraction of the viewport size
const GIF_DOWNSCALE: u32 = 2;

/// Frame delay in hundredths of a second
const GIF_FRAME_DELAY: u16 = 3;

/// Quantizer speed for GIF frames (1 = best quality, 30 = fastest)
const GIF_QUANT_SPEED: i32 = 20;

/// Render the frame at full viewport resolution
pub fn render_image(view: &FrameView) -> Result<RgbImage, String> {
    let width = view.viewport.width;
    let height = view.viewport.height;
    let grid = sprites::rasterize(view, width as usize, height as usize);
    RgbImage::from_raw(width, height, grid.to_rgb_bytes())
        .ok_or_else(|| "Rendered frame has the wrong size".to_string())
}

/// Write a PNG snapshot of the frame
pub fn save_png(view: &FrameView, path: &Path) -> Result<(), String> {
    let image = render_image(view)?;
    image
        .save(path)
        .map_err(|e| format!("Failed to write snapshot {}: {}", path.display(), e))
}

/// File name with a unix timestamp, e.g. `disk-bounce-1700000000.png`
pub fn timestamped_path(dir: &Path, extension: &str) -> PathBuf {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    dir.join(format!("disk-bounce-{}.{}", secs, extension))
}

/// Streams rendered frames into an animated GIF
pub struct GifRecorder {
    encoder: gif::Encoder<BufWriter<File>>,
    path: PathBuf,
    width: u16,
    height: u16,
    frames: usize,
}

impl GifRecorder {
    /// Create the output file. Frames are captured at a reduced size.
    pub fn start(path: &Path, view: &FrameView) -> Result<Self, String> {
        let width = (view.viewport.width / GIF_DOWNSCALE).clamp(1, u16::MAX as u32) as u16;
        let height = (view.viewport.height / GIF_DOWNSCALE).clamp(1, u16::MAX as u32) as u16;

        let file = File::create(path)
            .map_err(|e| format!("Failed to create recording {}: {}", path.display(), e))?;
        let mut encoder = gif::Encoder::new(BufWriter::new(file), width, height, &[])
            .map_err(|e| format!("Failed to start recording: {}", e))?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(|e| format!("Failed to start recording: {}", e))?;

        Ok(Self {
            encoder,
            path: path.to_path_buf(),
            width,
            height,
            frames: 0,
        })
    }

    /// Append one frame. Returns false once the frame limit is reached.
    pub fn push(&mut self, view: &FrameView) -> Result<bool, String> {
        if self.is_full() {
            return Ok(false);
        }
        let grid = sprites::rasterize(view, self.width as usize, self.height as usize);
        let mut frame =
            gif::Frame::from_rgb_speed(self.width, self.height, &grid.to_rgb_bytes(), GIF_QUANT_SPEED);
        frame.delay = GIF_FRAME_DELAY;
        self.encoder
            .write_frame(&frame)
            .map_err(|e| format!("Failed to write recording frame: {}", e))?;
        self.frames += 1;
        Ok(!self.is_full())
    }

    pub fn is_full(&self) -> bool {
        self.frames >= MAX_GIF_FRAMES
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Write the trailer and flush the file
    pub fn finish(self) -> Result<PathBuf, String> {
        let mut writer = self
            .encoder
            .into_inner()
            .map_err(|e| format!("Failed to finish recording: {}", e))?;
        writer
            .flush()
            .map_err(|e| format!("Failed to finish recording: {}", e))?;
        Ok(self.path)
    }
}
