//! Decoded splash image frames.

use crate::Error;

/// A decoded splash image, ready for a [`SplashSurface`](crate::SplashSurface).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// RGBA pixel data, row-major.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Decode an encoded image blob (PNG, JPEG, ...) into an RGBA [`Frame`].
///
/// The session decodes both configured blobs before displaying anything, so
/// a bad blob surfaces as a configuration error at startup rather than a
/// blank surface later.
///
/// # Errors
/// Returns [`Error::Decode`] if the blob is not a decodable image.
pub fn decode(blob: &[u8]) -> Result<Frame, Error> {
    let decoded = image::load_from_memory(blob)?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Frame {
        data: rgba.into_raw(),
        width,
        height,
    })
}
