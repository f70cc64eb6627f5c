//! # Pixel Buffer Module
//!
//! Tipi dati condivisi dalla pipeline di conversione.
//!
//! ## Strutture dati:
//! - `PixelLayout`: RGBA (4 canali) o RGB (3 canali)
//! - `ImageBuffer`: pixel decodificati con dimensioni e layout
//! - `ContainerFormat`: formato contenitore (PNG o JPEG)
//! - `EncodedImage`: byte compressi pronti per la scrittura
//!
//! ## Invariante:
//! La lunghezza del buffer è sempre `width * height * channels`. Il costruttore
//! rifiuta buffer che la violano, quindi nessun `ImageBuffer` esiste in stato invalido.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Channel layout of a pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgba,
    Rgb,
}

impl PixelLayout {
    /// Bytes per pixel
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Rgba => 4,
            PixelLayout::Rgb => 3,
        }
    }
}

/// Decoded pixel data in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Create a buffer, checking that `data` holds exactly `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Result<Self, ConvertError> {
        let expected = Self::expected_len(width, height, layout);
        if data.len() != expected {
            return Err(ConvertError::BufferLength {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Byte length a buffer of these dimensions must have
    pub fn expected_len(width: u32, height: u32, layout: PixelLayout) -> usize {
        (width as usize) * (height as usize) * layout.channels()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Drop the alpha channel.
    ///
    /// Output triplet `i` is input bytes `[4i, 4i+1, 4i+2]`. Alpha is discarded,
    /// not composited. An RGB buffer is returned as is.
    pub fn to_rgb(self) -> ImageBuffer {
        match self.layout {
            PixelLayout::Rgb => self,
            PixelLayout::Rgba => {
                let mut rgb = Vec::with_capacity(self.data.len() / 4 * 3);
                for pixel in self.data.chunks_exact(4) {
                    rgb.extend_from_slice(&pixel[..3]);
                }

                ImageBuffer {
                    width: self.width,
                    height: self.height,
                    layout: PixelLayout::Rgb,
                    data: rgb,
                }
            }
        }
    }
}

/// Container formats the pipeline reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    Png,
    Jpeg,
}

impl ContainerFormat {
    /// Match a file extension, case-insensitive
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compressed image bytes tagged with their container format
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub format: ContainerFormat,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn new(format: ContainerFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let result = ImageBuffer::new(2, 2, PixelLayout::Rgba, vec![0u8; 15]);
        assert!(matches!(
            result,
            Err(ConvertError::BufferLength { expected: 16, actual: 15 })
        ));

        let result = ImageBuffer::new(2, 2, PixelLayout::Rgb, vec![0u8; 16]);
        assert!(matches!(
            result,
            Err(ConvertError::BufferLength { expected: 12, actual: 16 })
        ));
    }

    #[test]
    fn test_new_accepts_empty_image() {
        let buffer = ImageBuffer::new(0, 5, PixelLayout::Rgb, Vec::new()).unwrap();
        assert_eq!(buffer.dimensions(), (0, 5));
        assert!(buffer.as_bytes().is_empty());
    }

    #[test]
    fn test_to_rgb_drops_alpha() {
        let rgba = vec![
            1, 2, 3, 4, //
            5, 6, 7, 8, //
            9, 10, 11, 12, //
            13, 14, 15, 16,
        ];
        let buffer = ImageBuffer::new(2, 2, PixelLayout::Rgba, rgba).unwrap();
        let rgb = buffer.to_rgb();

        assert_eq!(rgb.layout(), PixelLayout::Rgb);
        assert_eq!(rgb.dimensions(), (2, 2));
        assert_eq!(rgb.as_bytes(), &[1, 2, 3, 5, 6, 7, 9, 10, 11, 13, 14, 15]);
    }

    #[test]
    fn test_to_rgb_ignores_transparency() {
        // Fully transparent white stays white: alpha is dropped, not blended
        let buffer = ImageBuffer::new(1, 1, PixelLayout::Rgba, vec![255, 255, 255, 0]).unwrap();
        assert_eq!(buffer.to_rgb().into_bytes(), vec![255, 255, 255]);
    }

    #[test]
    fn test_to_rgb_on_rgb_is_identity() {
        let buffer = ImageBuffer::new(1, 2, PixelLayout::Rgb, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let same = buffer.clone().to_rgb();
        assert_eq!(same, buffer);
    }

    #[test]
    fn test_container_format_from_extension() {
        assert_eq!(ContainerFormat::from_extension("png"), Some(ContainerFormat::Png));
        assert_eq!(ContainerFormat::from_extension("PNG"), Some(ContainerFormat::Png));
        assert_eq!(ContainerFormat::from_extension("jpg"), Some(ContainerFormat::Jpeg));
        assert_eq!(ContainerFormat::from_extension("JpEg"), Some(ContainerFormat::Jpeg));
        assert_eq!(ContainerFormat::from_extension("txt"), None);
        assert_eq!(ContainerFormat::from_extension(""), None);
    }

    #[test]
    fn test_container_format_from_path() {
        assert_eq!(ContainerFormat::from_path(Path::new("a/b/photo.JPG")), Some(ContainerFormat::Jpeg));
        assert_eq!(ContainerFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(ContainerFormat::from_path(Path::new("README")), None);
    }
}
