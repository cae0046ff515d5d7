//! Minimal binary PPM (P6) reader and writer.
//!
//! Only what the distortion texture needs: 8-bit RGB, no alpha, no compression.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use thiserror::Error;

/// Error type for raster image loading.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing magic number")]
    MissingMagic,

    #[error("malformed header: {0}")]
    InvalidHeader(String),

    #[error("unsupported max value {0} (expected 1..=255)")]
    UnsupportedMaxValue(u32),

    #[error("truncated pixel data: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// An 8-bit RGB image with interleaved pixels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wraps an RGB buffer of `width * height * 3` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        let expected = rgb_len(width, height)?;
        if pixels.len() != expected {
            return Err(RasterError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// The "no texture data" image: zero dimensions, no bytes.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved RGB bytes, row by row from the top.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Loads a binary PPM file.
    pub fn load_ppm(path: impl AsRef<Path>) -> Result<Self, RasterError> {
        let file = File::open(path.as_ref())?;
        Self::read_ppm(BufReader::new(file))
    }

    /// Loads a binary PPM file, falling back to [`RasterImage::empty`] on failure.
    ///
    /// The failure is reported through the logger rather than returned.
    pub fn load_ppm_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_ppm(path) {
            Ok(image) => {
                log::debug!(
                    "loaded {}x{} image from {}",
                    image.width,
                    image.height,
                    path.display()
                );
                image
            }
            Err(e) => {
                log::error!("failed to load image {}: {e}", path.display());
                Self::empty()
            }
        }
    }

    /// Decodes a binary PPM held in memory.
    pub fn decode_ppm(bytes: &[u8]) -> Result<Self, RasterError> {
        Self::read_ppm(bytes)
    }

    /// Reads a binary PPM from a buffered reader.
    ///
    /// The header is a magic token, width, height and max value separated by
    /// whitespace, with `#` comments running to the end of their line. Exactly one
    /// whitespace byte separates the max value from the pixel data, which must
    /// hold `width * height * 3` bytes.
    pub fn read_ppm<R: BufRead>(mut reader: R) -> Result<Self, RasterError> {
        let magic = next_token(&mut reader)?.ok_or(RasterError::MissingMagic)?;
        if magic.is_empty() {
            return Err(RasterError::MissingMagic);
        }

        let width = header_number(&mut reader, "width")?;
        let height = header_number(&mut reader, "height")?;
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidHeader(format!(
                "zero dimension {width}x{height}"
            )));
        }

        let max_value = header_number(&mut reader, "max value")?;
        if max_value == 0 || max_value > 255 {
            return Err(RasterError::UnsupportedMaxValue(max_value));
        }

        let expected = rgb_len(width, height)?;
        // Sized by the bytes actually present; the header alone can claim anything.
        let mut pixels = Vec::new();
        let actual = reader.take(expected as u64).read_to_end(&mut pixels)?;
        if actual < expected {
            return Err(RasterError::Truncated { expected, actual });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Encodes the image as a binary PPM with max value 255.
    pub fn encode_ppm(&self) -> Vec<u8> {
        let mut out = format!("P6\n{} {}\n255\n", self.width, self.height).into_bytes();
        out.extend_from_slice(&self.pixels);
        out
    }

    /// Writes the image to a binary PPM file.
    pub fn save_ppm(&self, path: impl AsRef<Path>) -> Result<(), RasterError> {
        let mut file = File::create(path)?;
        file.write_all(&self.encode_ppm())?;
        Ok(())
    }

    /// Expands the pixels to RGBA with opaque alpha.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixels.len() / 3 * 4);
        for px in self.pixels.chunks_exact(3) {
            rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        rgba
    }
}

fn rgb_len(width: u32, height: u32) -> Result<usize, RasterError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| RasterError::InvalidHeader(format!("image too large: {width}x{height}")))
}

fn header_number<R: BufRead>(reader: &mut R, what: &str) -> Result<u32, RasterError> {
    let token = next_token(reader)?
        .ok_or_else(|| RasterError::InvalidHeader(format!("missing {what}")))?;
    std::str::from_utf8(&token)
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| {
            RasterError::InvalidHeader(format!(
                "invalid {what} '{}'",
                String::from_utf8_lossy(&token)
            ))
        })
}

fn read_byte<R: BufRead>(reader: &mut R) -> Result<Option<u8>, RasterError> {
    let mut byte = [0u8; 1];
    match reader.read(&mut byte)? {
        0 => Ok(None),
        _ => Ok(Some(byte[0])),
    }
}

/// Returns the next header token, consuming the single whitespace byte after it.
fn next_token<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>, RasterError> {
    // Skip whitespace and comments.
    let first = loop {
        match read_byte(reader)? {
            None => return Ok(None),
            Some(b'#') => {
                let mut comment = Vec::new();
                reader.read_until(b'\n', &mut comment)?;
            }
            Some(b) if b.is_ascii_whitespace() => {}
            Some(b) => break b,
        }
    };

    let mut token = vec![first];
    loop {
        match read_byte(reader)? {
            None => break,
            Some(b) if b.is_ascii_whitespace() => break,
            Some(b'#') => {
                let mut comment = Vec::new();
                reader.read_until(b'\n', &mut comment)?;
                break;
            }
            Some(b) => token.push(b),
        }
    }
    Ok(Some(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn checkerboard() -> RasterImage {
        let pixels = vec![
            255, 0, 0, 0, 255, 0, 0, 0, 255, //
            10, 20, 30, 40, 50, 60, 70, 80, 90,
        ];
        RasterImage::new(3, 2, pixels).unwrap()
    }

    #[test]
    fn test_decode_simple() {
        let mut bytes = b"P6\n2 1\n255\n".to_vec();
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        let image = RasterImage::decode_ppm(&bytes).unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 1);
        assert_eq!(image.pixels(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_decode_skips_comments() {
        let mut bytes = b"P6\n# made by hand\n# second comment\n1 1\n# max\n255\n".to_vec();
        bytes.extend_from_slice(&[9, 8, 7]);
        let image = RasterImage::decode_ppm(&bytes).unwrap();
        assert_eq!(image.pixels(), &[9, 8, 7]);
    }

    #[test]
    fn test_decode_single_line_header() {
        let mut bytes = b"P6 1 1 255\n".to_vec();
        bytes.extend_from_slice(&[1, 2, 3]);
        let image = RasterImage::decode_ppm(&bytes).unwrap();
        assert_eq!((image.width(), image.height()), (1, 1));
    }

    #[test]
    fn test_pixel_bytes_may_look_like_whitespace() {
        // First pixel byte is '\n' and the second is '#': both must be kept as data.
        let mut bytes = b"P6\n1 1\n255\n".to_vec();
        bytes.extend_from_slice(&[b'\n', b'#', 0]);
        let image = RasterImage::decode_ppm(&bytes).unwrap();
        assert_eq!(image.pixels(), &[b'\n', b'#', 0]);
    }

    #[test]
    fn test_round_trip() {
        let image = checkerboard();
        let decoded = RasterImage::decode_ppm(&image.encode_ppm()).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_encoding_readable_by_image_crate() {
        let image = checkerboard();
        let decoded =
            image::load_from_memory_with_format(&image.encode_ppm(), image::ImageFormat::Pnm)
                .unwrap()
                .to_rgb8();
        assert_eq!(decoded.width(), image.width());
        assert_eq!(decoded.height(), image.height());
        assert_eq!(decoded.into_raw(), image.pixels());
    }

    #[test]
    fn test_truncated_pixels() {
        let mut bytes = b"P6\n2 2\n255\n".to_vec();
        bytes.extend_from_slice(&[0; 11]);
        let err = RasterImage::decode_ppm(&bytes).unwrap_err();
        assert!(matches!(
            err,
            RasterError::Truncated {
                expected: 12,
                actual: 11
            }
        ));
    }

    #[test]
    fn test_huge_header_with_few_pixels() {
        let mut bytes = b"P6\n2000000000 2000000000\n255\n".to_vec();
        bytes.extend_from_slice(&[0; 12]);
        let err = RasterImage::decode_ppm(&bytes).unwrap_err();
        // 64-bit targets can size the claim and report the short read; 32-bit ones
        // reject the header outright.
        assert!(matches!(
            err,
            RasterError::Truncated { actual: 12, .. } | RasterError::InvalidHeader(_)
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            RasterImage::decode_ppm(b""),
            Err(RasterError::MissingMagic)
        ));
    }

    #[test]
    fn test_malformed_header() {
        assert!(matches!(
            RasterImage::decode_ppm(b"P6\nwide 2\n255\n"),
            Err(RasterError::InvalidHeader(_))
        ));
        assert!(matches!(
            RasterImage::decode_ppm(b"P6\n2"),
            Err(RasterError::InvalidHeader(_))
        ));
        assert!(matches!(
            RasterImage::decode_ppm(b"P6\n0 2\n255\n"),
            Err(RasterError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_unsupported_max_value() {
        assert!(matches!(
            RasterImage::decode_ppm(b"P6\n1 1\n65535\n"),
            Err(RasterError::UnsupportedMaxValue(65535))
        ));
    }

    #[test]
    fn test_missing_file_yields_empty_image() {
        let image = RasterImage::load_ppm_or_empty("does/not/exist.ppm");
        assert!(image.is_empty());
        assert_eq!((image.width(), image.height()), (0, 0));
    }

    #[test]
    fn test_truncated_file_yields_empty_image() {
        let path = std::env::temp_dir().join(format!("waterplane_truncated_{}.ppm", std::process::id()));
        let mut bytes = b"P6\n4 4\n255\n".to_vec();
        bytes.extend_from_slice(&[7; 20]);
        std::fs::write(&path, &bytes).unwrap();

        let image = RasterImage::load_ppm_or_empty(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(image.is_empty());
        assert_eq!((image.width(), image.height()), (0, 0));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("waterplane_saved_{}.ppm", std::process::id()));
        let image = checkerboard();
        image.save_ppm(&path).unwrap();
        let loaded = RasterImage::load_ppm(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, image);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(matches!(
            RasterImage::new(2, 2, vec![0; 5]),
            Err(RasterError::SizeMismatch {
                expected: 12,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_to_rgba8() {
        let image = RasterImage::new(1, 1, vec![1, 2, 3]).unwrap();
        assert_eq!(image.to_rgba8(), vec![1, 2, 3, 255]);
    }

    proptest! {
        #[test]
        fn prop_round_trip(width in 1u32..16, height in 1u32..16, seed in any::<u8>()) {
            let len = (width * height * 3) as usize;
            let pixels: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect();
            let image = RasterImage::new(width, height, pixels).unwrap();
            let decoded = RasterImage::decode_ppm(&image.encode_ppm()).unwrap();
            prop_assert_eq!(decoded, image);
        }
    }
}
