//! Crop engine
//!
//! Four draggable corner points over an image. The visual shape is a free
//! quadrilateral but the crop result is always the axis-aligned bounding
//! rectangle of the corners, not a perspective-corrected extraction.
//!
//! Drag wiring is an explicit state machine:
//! `Idle → Dragging(corner) → Idle`, driven by begin/update/end calls.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use crate::error::{Error, Result};
use crate::geometry::{bounding_box, pointer_to_fraction, Point};

/// JPEG quality for crop output (0.8 equivalent).
pub const CROP_JPEG_QUALITY: u8 = 80;

/// Ordered corner set of the crop quadrilateral. Visually top-left,
/// top-right, bottom-right, bottom-left, but ordering and convexity are
/// not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropShape {
    pub corners: [Point; 4],
}

impl Default for CropShape {
    /// Full image extent.
    fn default() -> Self {
        Self {
            corners: [
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.0, 1.0),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging(usize),
}

/// Result of a committed crop.
#[derive(Debug, Clone)]
pub struct CropOutput {
    /// JPEG-encoded crop
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CropOutput {
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.jpeg)
    }
}

/// One interactive crop session over a single image.
#[derive(Debug, Clone)]
pub struct CropSession {
    shape: CropShape,
    drag: DragState,
}

impl Default for CropSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CropSession {
    pub fn new() -> Self {
        Self {
            shape: CropShape::default(),
            drag: DragState::Idle,
        }
    }

    pub fn shape(&self) -> &CropShape {
        &self.shape
    }

    pub fn dragging_corner(&self) -> Option<usize> {
        match self.drag {
            DragState::Dragging(i) => Some(i),
            DragState::Idle => None,
        }
    }

    /// Selects a corner as the active drag target. Ignored when a drag is
    /// already active or the index is out of range.
    pub fn begin_drag(&mut self, corner: usize) {
        if corner < 4 && self.drag == DragState::Idle {
            self.drag = DragState::Dragging(corner);
        }
    }

    /// Moves the active corner to the pointer position, converted into
    /// container-fractional coordinates and clamped to [0, 1] per axis.
    /// A missing drag or degenerate container is a no-op tick.
    pub fn update_drag(
        &mut self,
        pointer: (f32, f32),
        container_origin: (f32, f32),
        container_size: (f32, f32),
    ) {
        let DragState::Dragging(corner) = self.drag else {
            return;
        };
        if let Some(p) = pointer_to_fraction(pointer, container_origin, container_size) {
            self.shape.corners[corner] = p;
        }
    }

    /// Clears the active corner. Idempotent.
    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Discards the in-progress shape with no other side effect.
    pub fn cancel(self) {}

    /// Crops the source image to the bounding rectangle of the four
    /// corners and encodes the result as JPEG.
    ///
    /// A zero-area box is tolerated and yields a 1x1 image rather than
    /// an error.
    pub fn compute_crop(&self, source: &DynamicImage) -> Result<CropOutput> {
        compute_crop(&self.shape, source)
    }
}

/// Bounding-box crop of `source` by the normalized shape.
pub fn compute_crop(shape: &CropShape, source: &DynamicImage) -> Result<CropOutput> {
    let natural_w = source.width();
    let natural_h = source.height();
    if natural_w == 0 || natural_h == 0 {
        return Err(Error::Image("source image has zero size".into()));
    }

    let (min_x, min_y, max_x, max_y) = bounding_box(&shape.corners);

    let x = (min_x * natural_w as f32).round() as u32;
    let y = (min_y * natural_h as f32).round() as u32;
    let x = x.min(natural_w - 1);
    let y = y.min(natural_h - 1);

    // Degenerate (zero-area) boxes fall back to a 1x1 crop.
    let w = ((max_x * natural_w as f32).round() as u32)
        .min(natural_w)
        .saturating_sub(x)
        .max(1);
    let h = ((max_y * natural_h as f32).round() as u32)
        .min(natural_h)
        .saturating_sub(y)
        .max(1);

    let cropped = source.crop_imm(x, y, w, h);

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, CROP_JPEG_QUALITY);
    cropped
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| Error::Image(format!("JPEG encode failed: {}", e)))?;

    Ok(CropOutput {
        jpeg,
        width: w,
        height: h,
    })
}

/// Decodes a base64 image payload back into the raw encoded bytes.
pub fn decode_base64_bytes(data: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(data.trim())
        .map_err(|e| Error::Image(format!("base64 decode failed: {}", e)))
}

/// Decodes a base64 image payload (JPEG/PNG) into a raster. Reports a
/// failure state instead of panicking; the caller re-invokes from a fresh
/// image.
pub fn decode_base64_image(data: &str) -> Result<DynamicImage> {
    let bytes = decode_base64_bytes(data)?;
    image::load_from_memory(&bytes).map_err(|e| Error::Image(format!("image decode failed: {}", e)))
}

/// Encodes raw image bytes to base64 for inline storage.
pub fn encode_image_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}
