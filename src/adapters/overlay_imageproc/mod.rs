// Overlay adapter - Rectangle fill and text rasterisation with imageproc

use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::domain::errors::*;
use crate::domain::model::OverlaySpec;
use crate::error::{TimelapseError, TimelapseResult};
use crate::ports::*;

/// Ascent-to-descent height in pixels; Fira Code's em comes out near 24.6px
const LABEL_SCALE: f32 = 32.0;
/// Horizontal offset of the second strike that emboldens the label
const BOLD_STRIKE_OFFSET: i32 = 1;

const BACKING: Rgb<u8> = Rgb([0, 0, 0]);
const INK: Rgb<u8> = Rgb([255, 255, 255]);

/// Burns labels with a monospace font, bold by double strike
pub struct ImageprocOverlayAdapter {
    font: FontArc,
    scale: PxScale,
}

impl ImageprocOverlayAdapter {
    /// Adapter using the embedded Fira Code face
    pub fn new() -> Result<Self, DomainError> {
        let font = FontArc::try_from_slice(ttf_firacode::REGULAR).map_err(|e| {
            TimelapseError::FontError {
                message: format!("embedded font: {}", e),
            }
        })?;
        Ok(Self::with_font(font))
    }

    /// Adapter using a TrueType/OpenType font file
    pub fn from_font_file(path: &Path) -> Result<Self, DomainError> {
        Ok(Self::with_font(Self::load_font(path)?))
    }

    fn load_font(path: &Path) -> TimelapseResult<FontArc> {
        let bytes = std::fs::read(path)?;
        FontArc::try_from_vec(bytes).map_err(|e| TimelapseError::FontError {
            message: format!("{}: {}", path.display(), e),
        })
    }

    fn with_font(font: FontArc) -> Self {
        Self {
            font,
            scale: PxScale::from(LABEL_SCALE),
        }
    }
}

impl OverlayPort for ImageprocOverlayAdapter {
    fn overlay(&self, image: &mut RgbImage, spec: &OverlaySpec) -> Result<(), DomainError> {
        // Drawing clips to the bitmap, so undersized stills lose part of the label
        let (width, height) = image.dimensions();
        if spec.rect_x >= width as i32 || spec.rect_y >= height as i32 {
            tracing::warn!(width, height, "overlay lies outside the image");
        }

        let backing = Rect::at(spec.rect_x, spec.rect_y).of_size(spec.rect_width, spec.rect_height);
        draw_filled_rect_mut(image, backing, BACKING);

        for dx in 0..=BOLD_STRIKE_OFFSET {
            draw_text_mut(
                image,
                INK,
                spec.text_x + dx,
                spec.text_y,
                self.scale,
                &self.font,
                &spec.text,
            );
        }
        Ok(())
    }
}
