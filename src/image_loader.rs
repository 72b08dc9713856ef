//! # Image Loading and Decoding
//!
//! Resolves image sources (data URIs, file paths, raw base64) to bytes and
//! prepares bytes for PDF embedding. JPEG images pass through without
//! re-encoding (the PDF spec supports DCTDecode natively). PNG images are
//! decoded to RGB pixels with a separate alpha channel for SMask
//! transparency.
//!
//! Every failure here becomes [`FolioError::MalformedContent`].

use std::io::Cursor;

use crate::error::FolioError;
use crate::model::{Dimensions, Extension};

/// A fully decoded/loaded image ready for PDF embedding.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

/// The pixel data in a format the PDF serializer can consume directly.
#[derive(Debug, Clone)]
pub enum ImagePixelData {
    /// Raw JPEG bytes, embedded directly with DCTDecode.
    Jpeg {
        data: Vec<u8>,
        color_space: JpegColorSpace,
    },
    /// Decoded RGB pixels + optional alpha channel.
    Decoded {
        /// width * height * 3 bytes (RGB)
        rgb: Vec<u8>,
        /// width * height bytes (grayscale alpha). None if fully opaque.
        alpha: Option<Vec<u8>>,
    },
}

/// JPEG color space for the PDF /ColorSpace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegColorSpace {
    DeviceRGB,
    DeviceGray,
}

/// Resolve a source string to raw image bytes.
///
/// Supported `src` formats:
/// - `data:image/...;base64,...` data URI
/// - File path (absolute or `./`/`../` relative), read from disk
/// - Raw base64-encoded image data
pub fn read_source_bytes(src: &str) -> Result<Vec<u8>, FolioError> {
    if src.starts_with("data:image/") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| FolioError::MalformedContent("Invalid data URI: missing comma".to_string()))?;
        return base64_decode(&src[comma_pos + 1..]);
    }

    // Only explicit path prefixes, so base64 strings containing '/' are not
    // mistaken for paths.
    if src.starts_with('/') || src.starts_with("./") || src.starts_with("../") {
        #[cfg(not(target_arch = "wasm32"))]
        {
            return std::fs::read(src).map_err(|e| {
                FolioError::MalformedContent(format!("Failed to read image file '{}': {}", src, e))
            });
        }
        #[cfg(target_arch = "wasm32")]
        {
            return Err(FolioError::MalformedContent(format!(
                "File path images not supported in WASM: '{}'. Use data URIs or base64.",
                src
            )));
        }
    }

    base64_decode(src)
}

/// Guess the extension from a data URI's media type or a file name.
pub fn extension_from_source(src: &str) -> Option<Extension> {
    let lower = src.to_ascii_lowercase();
    if lower.starts_with("data:image/png") || lower.ends_with(".png") {
        Some(Extension::Png)
    } else if lower.starts_with("data:image/jpeg")
        || lower.starts_with("data:image/jpg")
        || lower.ends_with(".jpg")
        || lower.ends_with(".jpeg")
    {
        Some(Extension::Jpeg)
    } else {
        None
    }
}

fn base64_decode(input: &str) -> Result<Vec<u8>, FolioError> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| FolioError::MalformedContent(format!("Base64 decode error: {}", e)))
}

/// Read pixel dimensions without decoding pixel data.
pub fn probe_dimensions(data: &[u8], extension: Extension) -> Result<Dimensions, FolioError> {
    check_signature(data, extension)?;
    let (width, height) = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| FolioError::MalformedContent(format!("Image format detection error: {}", e)))?
        .into_dimensions()
        .map_err(|e| FolioError::MalformedContent(format!("Failed to read image dimensions: {}", e)))?;
    Ok(Dimensions::new(width as f64, height as f64))
}

/// Decode image bytes for embedding. The magic bytes must agree with the
/// declared extension.
pub fn decode_image_bytes(data: &[u8], extension: Extension) -> Result<LoadedImage, FolioError> {
    check_signature(data, extension)?;
    if extension.is_jpeg() {
        decode_jpeg(data)
    } else {
        decode_png(data)
    }
}

fn check_signature(data: &[u8], extension: Extension) -> Result<(), FolioError> {
    if data.len() < 4 {
        return Err(FolioError::MalformedContent("Image data too short".to_string()));
    }
    let matches = match extension {
        Extension::Jpg | Extension::Jpeg => is_jpeg(data),
        Extension::Png => is_png(data),
    };
    if matches {
        Ok(())
    } else {
        Err(FolioError::MalformedContent(format!(
            "Image bytes are not a valid {:?} file",
            extension
        )))
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn is_png(data: &[u8]) -> bool {
    data.len() >= 4 && data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47
}

/// JPEG: read dimensions and color space without decoding pixels.
fn decode_jpeg(data: &[u8]) -> Result<LoadedImage, FolioError> {
    let dimensions = probe_dimensions(data, Extension::Jpeg)?;

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: data.to_vec(),
            color_space: detect_jpeg_color_space(data),
        },
        width_px: dimensions.width as u32,
        height_px: dimensions.height as u32,
    })
}

/// Scan JPEG markers to find the SOF segment and read the number of
/// components to determine color space.
fn detect_jpeg_color_space(data: &[u8]) -> JpegColorSpace {
    let mut i = 2; // skip SOI marker (FF D8)
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            break;
        }
        let marker = data[i + 1];
        // SOF markers: C0-C3, C5-C7, C9-CB, CD-CF
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_sof && i + 9 < data.len() {
            // length(2) + precision(1) + height(2) + width(2) + num_components(1)
            return if data[i + 9] == 1 {
                JpegColorSpace::DeviceGray
            } else {
                JpegColorSpace::DeviceRGB
            };
        }
        if i + 3 < data.len() {
            let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            i += 2 + seg_len;
        } else {
            break;
        }
    }
    JpegColorSpace::DeviceRGB
}

/// PNG: decode to RGBA, split into RGB + alpha.
fn decode_png(data: &[u8]) -> Result<LoadedImage, FolioError> {
    let img = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| FolioError::MalformedContent(format!("PNG format detection error: {}", e)))?
        .decode()
        .map_err(|e| FolioError::MalformedContent(format!("Failed to decode PNG: {}", e)))?;

    let rgba = img.to_rgba8();
    let width = rgba.width();
    let height = rgba.height();

    let pixel_count = (width * height) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    let mut has_transparency = false;

    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel[3]);
        if pixel[3] != 255 {
            has_transparency = true;
        }
    }

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: if has_transparency { Some(alpha) } else { None },
        },
        width_px: width,
        height_px: height,
    })
}
