//! The render target: an in-memory canvas with a 2D drawing context.
//!
//! This is the headless stand-in for the hosting page's `<canvas>` element.
//! The canvas owns an RGBA pixel surface; resizing it follows the HTML
//! element's semantics (assigning `width` or `height` clears the surface).

use crate::error::{Error, Result};
use image::RgbaImage;

/// Fallback canvas dimensions when the element carries no size attributes.
/// These match the HTML defaults for a bare `<canvas>`.
const DEFAULT_WIDTH: u32 = 300;
const DEFAULT_HEIGHT: u32 = 150;

/// A canvas surface located on the hosting page.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    ctx: Context2d,
}

impl Canvas {
    /// Create a canvas with explicit pixel dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ctx: Context2d::new(width, height),
        }
    }

    /// Build a canvas from the element's `width`/`height` attributes,
    /// falling back to the HTML defaults when absent or unparsable.
    pub fn from_attributes(width: Option<&str>, height: Option<&str>) -> Self {
        let width = width
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_WIDTH);
        let height = height
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_HEIGHT);
        Self::new(width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set the pixel width. The surface is reallocated and cleared, matching
    /// the HTML canvas behavior where assigning a dimension resets content.
    pub fn set_width(&mut self, width: u32) {
        self.width = width;
        self.ctx = Context2d::new(self.width, self.height);
    }

    /// Set the pixel height. Clears the surface, see [`Canvas::set_width`].
    pub fn set_height(&mut self, height: u32) {
        self.height = height;
        self.ctx = Context2d::new(self.width, self.height);
    }

    /// The canvas's 2D drawing context.
    pub fn context_2d(&mut self) -> &mut Context2d {
        &mut self.ctx
    }

    /// Read-only view of the drawing context, for inspection.
    pub fn context(&self) -> &Context2d {
        &self.ctx
    }

    /// Encode the current surface as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::RenderError("Canvas has no pixels".into()));
        }
        let img = RgbaImage::from_raw(self.width, self.height, self.ctx.pixels.clone())
            .ok_or_else(|| Error::RenderError("Canvas buffer has unexpected size".into()))?;
        let mut out = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut out),
            image::ImageFormat::Png,
        )
        .map_err(|e| Error::RenderError(format!("PNG encoding failed: {}", e)))?;
        Ok(out)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

/// A 2D drawing context bound to a canvas surface.
///
/// Pixels are RGBA8, row-major, starting transparent.
#[derive(Debug, Clone)]
pub struct Context2d {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Context2d {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA surface, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Whether nothing has been drawn yet (every byte still zero).
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&b| b == 0)
    }

    /// Blit an RGBA image onto the surface with its top-left corner at
    /// `(dx, dy)`. Pixels falling outside the surface are clipped.
    pub fn draw_image(&mut self, image: &RgbaImage, dx: i64, dy: i64) {
        let (src_w, src_h) = (image.width() as i64, image.height() as i64);
        let (dst_w, dst_h) = (self.width as i64, self.height as i64);

        for sy in 0..src_h {
            let ty = dy + sy;
            if ty < 0 || ty >= dst_h {
                continue;
            }
            for sx in 0..src_w {
                let tx = dx + sx;
                if tx < 0 || tx >= dst_w {
                    continue;
                }
                let src = image.get_pixel(sx as u32, sy as u32).0;
                let off = (ty as usize * self.width as usize + tx as usize) * 4;
                self.pixels[off..off + 4].copy_from_slice(&src);
            }
        }
    }
}
