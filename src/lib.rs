//! # zenconvert
//!
//! Transcode raster images between BMP, PPM and JPEG.
//!
//! Every format sits behind the same two operations on a [`PixelBuffer`]:
//! decode from a [`std::io::Read`] and encode to a [`std::io::Write`]. The
//! format is picked from the file name's extension, never from content.
//!
//! ## Supported Formats
//!
//! ### BMP
//! - Uncompressed 24-bit, `BITMAPINFOHEADER`, bottom-up, rows padded to 4 bytes
//! - Decode also accepts larger info headers, a data offset past the headers,
//!   and top-down (negative height) files
//!
//! ### PPM
//! - Decode P6 and P3, any maxval up to 65535
//! - Encode P6, maxval 255
//!
//! ### JPEG (`jpeg` feature, default)
//! - Delegated to the [`image`](https://docs.rs/image) crate
//!
//! ## Non-Goals
//!
//! - Color management, resizing, or any other pixel transform
//! - Alpha channels, palettes, RLE or bitfield BMPs
//!
//! ## Usage
//!
//! ```no_run
//! use zenconvert::{Codec, Limits, Unstoppable};
//!
//! let input = std::fs::File::open("in.bmp")?;
//! let image = Codec::Bmp.decode(std::io::BufReader::new(input), &Limits::default(), &Unstoppable)?;
//!
//! let mut ppm = Vec::new();
//! Codec::Ppm.encode(&mut ppm, &image, &Unstoppable)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod codec;
mod convert;
mod error;
mod format;
mod limits;
mod pixel;

mod bmp;
#[cfg(feature = "jpeg")]
mod jpeg;
mod pnm;

use std::io::{Read, Write};

// Re-exports
pub use bmp::row_stride as bmp_row_stride;
pub use codec::{Codec, DEFAULT_JPEG_QUALITY};
pub use convert::Converter;
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::{CodecError, ConvertError};
pub use format::ImageFormat;
pub use limits::Limits;
pub use pixel::PixelBuffer;
pub use rgb::RGB8;

/// Decode a 24-bit BMP stream.
pub fn decode_bmp<R: Read>(
    reader: R,
    limits: &Limits,
    stop: impl Stop,
) -> Result<PixelBuffer, CodecError> {
    bmp::decode(reader, limits, &stop)
}

/// Encode as 24-bit bottom-up BMP with zeroed row padding.
pub fn encode_bmp<W: Write>(
    writer: W,
    image: &PixelBuffer,
    stop: impl Stop,
) -> Result<(), CodecError> {
    bmp::encode(writer, image, &stop)
}

/// Decode a P6 or P3 PPM stream.
pub fn decode_ppm<R: Read>(
    reader: R,
    limits: &Limits,
    stop: impl Stop,
) -> Result<PixelBuffer, CodecError> {
    pnm::decode(reader, limits, &stop)
}

/// Encode as binary PPM (P6, maxval 255).
pub fn encode_ppm<W: Write>(
    writer: W,
    image: &PixelBuffer,
    stop: impl Stop,
) -> Result<(), CodecError> {
    pnm::encode(writer, image, &stop)
}

/// Decode a JPEG stream.
#[cfg(feature = "jpeg")]
pub fn decode_jpeg<R: Read>(
    reader: R,
    limits: &Limits,
    stop: impl Stop,
) -> Result<PixelBuffer, CodecError> {
    jpeg::decode(reader, limits, &stop)
}

/// Encode as baseline JPEG with the given quality (1..=100).
#[cfg(feature = "jpeg")]
pub fn encode_jpeg<W: Write>(
    writer: W,
    image: &PixelBuffer,
    quality: u8,
    stop: impl Stop,
) -> Result<(), CodecError> {
    jpeg::encode(writer, image, quality, &stop)
}
