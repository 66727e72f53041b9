//! Uncompressed 24-bit BMP (internal).
//!
//! Layout: a 14-byte file header, a 40-byte `BITMAPINFOHEADER`, then
//! `height` rows of [`row_stride`] bytes each, bottom row first, pixels in
//! B, G, R byte order. All header fields are little-endian.
//!
//! Use top-level [`crate::decode_bmp`] and [`crate::encode_bmp`].

mod decode;
mod encode;
mod header;

use std::io::{Read, Write};

use enough::Stop;

use crate::error::CodecError;
use crate::limits::Limits;
use crate::pixel::PixelBuffer;

/// Bytes per pixel in the payload.
const BYTES_PER_PIXEL: usize = 3;

/// Bytes one row of `width` pixels occupies on disk: `width * 3` rounded up
/// to a multiple of 4. `None` on overflow.
pub fn row_stride(width: usize) -> Option<usize> {
    width
        .checked_mul(BYTES_PER_PIXEL)
        .and_then(|r| r.checked_add(3))
        .map(|r| r & !3)
}

/// Decode a BMP stream into a new buffer.
pub(crate) fn decode<R: Read>(
    reader: R,
    limits: &Limits,
    stop: &dyn Stop,
) -> Result<PixelBuffer, CodecError> {
    decode::decode_bmp(reader, limits, stop)
}

/// Encode to BMP.
pub(crate) fn encode<W: Write>(
    writer: W,
    image: &PixelBuffer,
    stop: &dyn Stop,
) -> Result<(), CodecError> {
    encode::encode_bmp(writer, image, stop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_matches_formula() {
        for w in [0usize, 1, 2, 3, 4, 5, 16, 17] {
            let stride = row_stride(w).unwrap();
            assert_eq!(stride, 4 * ((w * 3 + 3) / 4), "width {w}");
            assert_eq!(stride % 4, 0, "width {w}");
            assert!(stride >= w * 3, "width {w}");
        }
    }

    #[test]
    fn stride_known_values() {
        assert_eq!(row_stride(0), Some(0));
        assert_eq!(row_stride(1), Some(4));
        assert_eq!(row_stride(2), Some(8));
        assert_eq!(row_stride(3), Some(12));
        assert_eq!(row_stride(4), Some(12));
        assert_eq!(row_stride(5), Some(16));
    }

    #[test]
    fn stride_overflow() {
        assert_eq!(row_stride(usize::MAX), None);
        assert_eq!(row_stride(usize::MAX / 3), None);
    }
}
