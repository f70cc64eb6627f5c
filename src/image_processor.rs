//! # Image Processing Module
//!
//! Questo modulo contiene la pipeline di conversione in memoria: decodifica,
//! normalizzazione del layout dei pixel e ricodifica JPEG.
//!
//! ## Pipeline di Conversione
//!
//! | Input | Passi                                         | Output |
//! |-------|-----------------------------------------------|--------|
//! | PNG   | `decode_png` → `to_rgb` → `encode_jpeg`       | JPEG   |
//! | JPEG  | `decode_jpeg` → `encode_jpeg` (`recompress`)  | JPEG   |
//!
//! I file JPEG passano sempre dallo spazio dei pixel: la ricompressione è lossy
//! e non idempotente.
//!
//! ## Encoder JPEG
//!
//! - Baseline, nessun subsampling della crominanza (4:4:4)
//! - Qualità passata così com'è: l'encoder la limita al range 1-100
//!
//! ## Gestione risorse
//!
//! Decoder, encoder e buffer sono valori posseduti dalla singola chiamata e vengono
//! rilasciati su ogni percorso di uscita, errori inclusi.
//!
//! ## Esempio:
//! ```rust
//! let pipeline = ImagePipeline::new(85);
//! let encoded = pipeline.convert(ContainerFormat::Png, &png_bytes)?;
//! std::fs::write("photo_processed.png", &encoded.bytes)?;
//! ```

use crate::error::ConvertError;
use crate::image_buffer::{ContainerFormat, EncodedImage, ImageBuffer, PixelLayout};
use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::codecs::png::PngDecoder;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder};
use std::io::Cursor;
use tracing::debug;

/// Converts one image at a time: PNG to JPEG, or JPEG to JPEG at a new quality.
///
/// Holds only the target quality; every call is independent of the previous one.
#[derive(Debug, Clone, Copy)]
pub struct ImagePipeline {
    quality: u8,
}

impl ImagePipeline {
    /// Creates a pipeline encoding at `quality`.
    ///
    /// The value is not validated here. The JPEG encoder clamps it to 1-100.
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }

    /// Converts the bytes of a file in `format` into JPEG bytes.
    pub fn convert(&self, format: ContainerFormat, bytes: &[u8]) -> Result<EncodedImage, ConvertError> {
        match format {
            ContainerFormat::Png => {
                let rgba = Self::decode_png(bytes)?;
                Self::encode_jpeg(&rgba.to_rgb(), self.quality)
            }
            ContainerFormat::Jpeg => Self::recompress(bytes, self.quality),
        }
    }

    /// Decodes a PNG stream into 8-bit RGBA.
    ///
    /// Palette, grayscale and 16-bit images are expanded, so the buffer is always
    /// `width * height * 4` bytes.
    pub fn decode_png(bytes: &[u8]) -> Result<ImageBuffer, ConvertError> {
        let decoder = PngDecoder::new(Cursor::new(bytes))
            .map_err(|e| ConvertError::Decode(format!("Failed to decode PNG file: {}", e)))?;

        let (width, height) = decoder.dimensions();
        debug!("PNG header: {}x{} {:?}", width, height, decoder.color_type());

        let rgba = DynamicImage::from_decoder(decoder)
            .map_err(|e| ConvertError::Decode(format!("Failed to decode PNG file: {}", e)))?
            .into_rgba8();

        ImageBuffer::new(width, height, PixelLayout::Rgba, rgba.into_raw())
    }

    /// Decodes a JPEG stream into packed RGB.
    ///
    /// The header is read first for dimensions and color layout; grayscale and CMYK
    /// sources come out as RGB.
    pub fn decode_jpeg(bytes: &[u8]) -> Result<ImageBuffer, ConvertError> {
        let decoder = JpegDecoder::new(Cursor::new(bytes))
            .map_err(|e| ConvertError::Decode(format!("Failed to decompress JPEG header: {}", e)))?;

        let (width, height) = decoder.dimensions();
        debug!("JPEG header: {}x{} {:?}", width, height, decoder.color_type());

        let rgb = DynamicImage::from_decoder(decoder)
            .map_err(|e| ConvertError::Decode(format!("Failed to decompress JPEG: {}", e)))?
            .into_rgb8();

        ImageBuffer::new(width, height, PixelLayout::Rgb, rgb.into_raw())
    }

    /// Encodes an RGB buffer as baseline JPEG with 4:4:4 chroma sampling.
    pub fn encode_jpeg(buffer: &ImageBuffer, quality: u8) -> Result<EncodedImage, ConvertError> {
        if buffer.layout() != PixelLayout::Rgb {
            return Err(ConvertError::Encode(format!(
                "JPEG encoder expects RGB pixels, got {:?}",
                buffer.layout()
            )));
        }

        let (width, height) = buffer.dimensions();
        if width == 0 || height == 0 {
            return Err(ConvertError::Encode(format!(
                "Invalid dimensions: width ({}) and height ({}) must be non-zero",
                width, height
            )));
        }

        let mut output = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut output, quality)
            .write_image(buffer.as_bytes(), width, height, ExtendedColorType::Rgb8)
            .map_err(|e| ConvertError::Encode(format!("Failed to compress image to JPEG: {}", e)))?;

        let bytes = output.into_inner();
        debug!("Encoded {}x{} JPEG at quality {}: {} bytes", width, height, quality, bytes.len());

        Ok(EncodedImage::new(ContainerFormat::Jpeg, bytes))
    }

    /// Fully decodes and re-encodes a JPEG at `quality`.
    pub fn recompress(bytes: &[u8], quality: u8) -> Result<EncodedImage, ConvertError> {
        let rgb = Self::decode_jpeg(bytes)?;
        Self::encode_jpeg(&rgb, quality)
    }
}


#[cfg(test)]
mod tests {
    use super::test_images::{gradient_rgb, solid_png};
    use super::*;
    use image::{GrayImage, ImageFormat, Luma};

    fn mean_absolute_error(a: &[u8], b: &[u8]) -> f64 {
        assert_eq!(a.len(), b.len());
        let total: u64 = a
            .iter()
            .zip(b)
            .map(|(x, y)| (*x as i32 - *y as i32).unsigned_abs() as u64)
            .sum();
        total as f64 / a.len() as f64
    }

    #[test]
    fn test_decode_png_is_rgba_sized() {
        let png = solid_png(7, 3, [10, 20, 30, 255]);
        let buffer = ImagePipeline::decode_png(&png).unwrap();

        assert_eq!(buffer.dimensions(), (7, 3));
        assert_eq!(buffer.layout(), PixelLayout::Rgba);
        assert_eq!(buffer.as_bytes().len(), 7 * 3 * 4);
        assert_eq!(&buffer.as_bytes()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_png_expands_grayscale() {
        let gray = GrayImage::from_pixel(4, 4, Luma([77]));
        let mut png = Vec::new();
        DynamicImage::ImageLuma8(gray)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let buffer = ImagePipeline::decode_png(&png).unwrap();
        assert_eq!(buffer.as_bytes().len(), 4 * 4 * 4);
        assert_eq!(&buffer.as_bytes()[..4], &[77, 77, 77, 255]);
    }

    #[test]
    fn test_decode_png_rejects_garbage() {
        let result = ImagePipeline::decode_png(b"definitely not a png");
        assert!(matches!(result, Err(ConvertError::Decode(_))));
    }

    #[test]
    fn test_decode_png_rejects_truncated() {
        let png = solid_png(16, 16, [1, 2, 3, 255]);
        let result = ImagePipeline::decode_png(&png[..png.len() / 2]);
        assert!(matches!(result, Err(ConvertError::Decode(_))));
    }

    #[test]
    fn test_decode_jpeg_rejects_empty() {
        let result = ImagePipeline::decode_jpeg(&[]);
        assert!(matches!(result, Err(ConvertError::Decode(_))));
    }

    #[test]
    fn test_decode_jpeg_rejects_garbage() {
        let result = ImagePipeline::decode_jpeg(&[0xFF, 0xD8, 0x00, 0x01, 0x02]);
        assert!(matches!(result, Err(ConvertError::Decode(_))));
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let buffer = ImageBuffer::new(16, 16, PixelLayout::Rgb, vec![128u8; 16 * 16 * 3]).unwrap();
        let encoded = ImagePipeline::encode_jpeg(&buffer, 90).unwrap();

        assert_eq!(encoded.format, ContainerFormat::Jpeg);
        assert_eq!(&encoded.bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(&encoded.bytes[encoded.len() - 2..], &[0xFF, 0xD9]);
    }

    /// Sampling factor byte of each component in the SOF0 segment
    fn sof0_sampling_factors(jpeg: &[u8]) -> Vec<u8> {
        // Walk the header segments after SOI until the SOF0 frame header
        let mut pos = 2;
        loop {
            assert_eq!(jpeg[pos], 0xFF, "expected a marker at offset {}", pos);
            let marker = jpeg[pos + 1];
            let length = u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]) as usize;
            assert_ne!(marker, 0xDA, "reached SOS without a SOF0 segment");

            if marker == 0xC0 {
                // length(2) precision(1) height(2) width(2) components(1), then 3 bytes each
                let components = jpeg[pos + 9] as usize;
                return (0..components).map(|i| jpeg[pos + 10 + i * 3 + 1]).collect();
            }
            pos += 2 + length;
        }
    }

    #[test]
    fn test_encode_jpeg_is_baseline_444() {
        let buffer = ImageBuffer::new(24, 16, PixelLayout::Rgb, gradient_rgb(24, 16)).unwrap();

        for quality in [0, 1, 90, 100, 255] {
            let encoded = ImagePipeline::encode_jpeg(&buffer, quality).unwrap();
            assert_eq!(
                sof0_sampling_factors(&encoded.bytes),
                vec![0x11, 0x11, 0x11],
                "quality {}",
                quality
            );
        }
    }

    #[test]
    fn test_encode_jpeg_rejects_rgba() {
        let buffer = ImageBuffer::new(2, 2, PixelLayout::Rgba, vec![0u8; 16]).unwrap();
        let result = ImagePipeline::encode_jpeg(&buffer, 90);
        assert!(matches!(result, Err(ConvertError::Encode(_))));
    }

    #[test]
    fn test_encode_jpeg_rejects_zero_dimension() {
        let buffer = ImageBuffer::new(0, 10, PixelLayout::Rgb, Vec::new()).unwrap();
        let result = ImagePipeline::encode_jpeg(&buffer, 90);
        assert!(matches!(result, Err(ConvertError::Encode(_))));
    }

    #[test]
    fn test_encode_jpeg_out_of_range_quality_passes_through() {
        let buffer = ImageBuffer::new(8, 8, PixelLayout::Rgb, vec![200u8; 8 * 8 * 3]).unwrap();
        assert!(ImagePipeline::encode_jpeg(&buffer, 0).is_ok());
        assert!(ImagePipeline::encode_jpeg(&buffer, 255).is_ok());
    }

    #[test]
    fn test_round_trip_keeps_dimensions() {
        for (width, height) in [(1, 1), (2, 2), (17, 5), (64, 33)] {
            let buffer = ImageBuffer::new(width, height, PixelLayout::Rgb, gradient_rgb(width, height)).unwrap();
            let encoded = ImagePipeline::encode_jpeg(&buffer, 75).unwrap();
            let decoded = ImagePipeline::decode_jpeg(&encoded.bytes).unwrap();

            assert_eq!(decoded.dimensions(), (width, height));
            assert_eq!(decoded.layout(), PixelLayout::Rgb);
        }
    }

    #[test]
    fn test_higher_quality_does_not_increase_error() {
        let (width, height) = (64, 64);
        let original = gradient_rgb(width, height);
        let buffer = ImageBuffer::new(width, height, PixelLayout::Rgb, original.clone()).unwrap();

        let error_at = |quality: u8| {
            let encoded = ImagePipeline::encode_jpeg(&buffer, quality).unwrap();
            let decoded = ImagePipeline::decode_jpeg(&encoded.bytes).unwrap();
            mean_absolute_error(&original, decoded.as_bytes())
        };

        let low = error_at(10);
        let high = error_at(95);
        assert!(high <= low + 0.5, "quality 95 error {} exceeds quality 10 error {}", high, low);
    }

    #[test]
    fn test_red_png_converts_to_red_jpeg() {
        let png = solid_png(2, 2, [0xFF, 0x00, 0x00, 0xFF]);
        let encoded = ImagePipeline::new(90).convert(ContainerFormat::Png, &png).unwrap();
        let decoded = ImagePipeline::decode_jpeg(&encoded.bytes).unwrap();

        assert_eq!(decoded.dimensions(), (2, 2));
        for pixel in decoded.as_bytes().chunks_exact(3) {
            assert!(pixel[0] >= 200, "red channel too low: {:?}", pixel);
            assert!(pixel[1] <= 50, "green channel too high: {:?}", pixel);
            assert!(pixel[2] <= 50, "blue channel too high: {:?}", pixel);
        }
    }

    #[test]
    fn test_recompress_is_lossy_round_trip() {
        let buffer = ImageBuffer::new(32, 32, PixelLayout::Rgb, gradient_rgb(32, 32)).unwrap();
        let first = ImagePipeline::encode_jpeg(&buffer, 90).unwrap();
        let second = ImagePipeline::new(40).convert(ContainerFormat::Jpeg, &first.bytes).unwrap();

        let decoded = ImagePipeline::decode_jpeg(&second.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (32, 32));
        assert_ne!(first.bytes, second.bytes);
    }

    #[test]
    fn test_convert_png_bytes_as_jpeg_fails() {
        let png = solid_png(4, 4, [0, 0, 0, 255]);
        let result = ImagePipeline::new(80).convert(ContainerFormat::Jpeg, &png);
        assert!(matches!(result, Err(ConvertError::Decode(_))));
    }
}
