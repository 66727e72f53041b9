use std::io::{Read, Write};
use std::path::Path;

use enough::Stop;

use crate::error::CodecError;
use crate::format::ImageFormat;
use crate::limits::Limits;
use crate::pixel::PixelBuffer;

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// An encoder/decoder for one container format.
///
/// Closed set: adding a format means adding a variant and the compiler
/// points at every `match` that needs it.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Codec {
    Bmp,
    Ppm,
    #[cfg(feature = "jpeg")]
    Jpeg {
        /// 1..=100.
        quality: u8,
    },
}

impl Codec {
    /// Codec for `format` with default settings, or `None` if support for
    /// it was compiled out.
    pub fn for_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Bmp => Some(Codec::Bmp),
            ImageFormat::Ppm => Some(Codec::Ppm),
            #[cfg(feature = "jpeg")]
            ImageFormat::Jpeg => Some(Codec::Jpeg {
                quality: DEFAULT_JPEG_QUALITY,
            }),
            #[cfg(not(feature = "jpeg"))]
            ImageFormat::Jpeg => None,
        }
    }

    /// Codec for the file at `path`, chosen by extension only.
    pub fn for_path(path: impl AsRef<Path>) -> Option<Self> {
        ImageFormat::from_path(path).and_then(Self::for_format)
    }

    pub fn format(&self) -> ImageFormat {
        match self {
            Codec::Bmp => ImageFormat::Bmp,
            Codec::Ppm => ImageFormat::Ppm,
            #[cfg(feature = "jpeg")]
            Codec::Jpeg { .. } => ImageFormat::Jpeg,
        }
    }

    /// Set JPEG quality. No effect on other codecs.
    #[cfg_attr(not(feature = "jpeg"), allow(unused_variables))]
    pub fn with_jpeg_quality(self, quality: u8) -> Self {
        match self {
            #[cfg(feature = "jpeg")]
            Codec::Jpeg { .. } => Codec::Jpeg { quality },
            other => other,
        }
    }

    /// Decode one image from `reader`. On error nothing is returned; there is
    /// no partially decoded image.
    pub fn decode<R: Read>(
        &self,
        reader: R,
        limits: &Limits,
        stop: &dyn Stop,
    ) -> Result<PixelBuffer, CodecError> {
        match self {
            Codec::Bmp => crate::bmp::decode(reader, limits, stop),
            Codec::Ppm => crate::pnm::decode(reader, limits, stop),
            #[cfg(feature = "jpeg")]
            Codec::Jpeg { .. } => crate::jpeg::decode(reader, limits, stop),
        }
    }

    /// Encode `image` into `writer`. Any failed write fails the whole call.
    pub fn encode<W: Write>(
        &self,
        writer: W,
        image: &PixelBuffer,
        stop: &dyn Stop,
    ) -> Result<(), CodecError> {
        match self {
            Codec::Bmp => crate::bmp::encode(writer, image, stop),
            Codec::Ppm => crate::pnm::encode(writer, image, stop),
            #[cfg(feature = "jpeg")]
            Codec::Jpeg { quality } => crate::jpeg::encode(writer, image, *quality, stop),
        }
    }
}
