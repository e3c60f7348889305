//! Snapshot raster value objects

use thiserror::Error;

/// Fixed snapshot raster width
pub const SNAPSHOT_WIDTH: u32 = 480;

/// Fixed snapshot raster height
pub const SNAPSHOT_HEIGHT: u32 = 360;

/// Error when encoding a raster
#[derive(Debug, Clone, Error)]
#[error("Failed to encode snapshot: {0}")]
pub struct EncodeError(pub String);

/// A decoded RGBA video frame of arbitrary size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl VideoFrame {
    /// A frame is usable when it has pixels and its buffer matches its size
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.rgba.len() == (self.width as usize) * (self.height as usize) * 4
    }
}

/// Fixed-size RGBA raster a frame is rendered into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Raster {
    /// Blank placeholder: opaque black at the fixed snapshot size
    pub fn blank() -> Self {
        let mut rgba = vec![0u8; (SNAPSHOT_WIDTH * SNAPSHOT_HEIGHT * 4) as usize];
        for pixel in rgba.chunks_exact_mut(4) {
            pixel[3] = 0xFF;
        }
        Self {
            width: SNAPSHOT_WIDTH,
            height: SNAPSHOT_HEIGHT,
            rgba,
        }
    }

    /// Render a frame into the fixed raster with nearest-neighbour scaling.
    /// Malformed frames render as the placeholder.
    pub fn render(frame: &VideoFrame) -> Self {
        if !frame.is_valid() {
            return Self::blank();
        }

        let (w, h) = (SNAPSHOT_WIDTH as usize, SNAPSHOT_HEIGHT as usize);
        let (src_w, src_h) = (frame.width as usize, frame.height as usize);
        let mut rgba = Vec::with_capacity(w * h * 4);

        for y in 0..h {
            let sy = y * src_h / h;
            for x in 0..w {
                let sx = x * src_w / w;
                let offset = (sy * src_w + sx) * 4;
                rgba.extend_from_slice(&frame.rgba[offset..offset + 4]);
            }
        }

        Self {
            width: SNAPSHOT_WIDTH,
            height: SNAPSHOT_HEIGHT,
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }

    /// RGBA value at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.rgba[offset..offset + 4]);
        Some(px)
    }

    /// Encode as PNG
    pub fn to_png(&self) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| EncodeError(e.to_string()))?;
            writer
                .write_image_data(&self.rgba)
                .map_err(|e| EncodeError(e.to_string()))?;
        }
        Ok(out)
    }

    /// Encode as a `data:image/png;base64,...` locator
    pub fn to_data_url(&self) -> Result<String, EncodeError> {
        use base64::Engine;
        let png = self.to_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }
}
