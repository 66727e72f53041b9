//! BMP decoder for 24-bit uncompressed images.
//!
//! Reads straight from the stream: headers, an optional gap up to the data
//! offset, then one padded row at a time. Any short read fails the whole
//! decode; no partially filled buffer is ever returned.

use std::io::{self, Read};

use enough::Stop;
use rgb::RGB8;

use super::header::{FileHeader, InfoHeader, SIGNATURE};
use super::{BYTES_PER_PIXEL, row_stride};
use crate::error::CodecError;
use crate::limits::Limits;
use crate::pixel::PixelBuffer;

/// Pixels reserved up front; beyond this the buffer grows as rows arrive.
const INITIAL_PIXELS: usize = 1 << 16;

pub(crate) fn decode_bmp<R: Read>(
    mut reader: R,
    limits: &Limits,
    stop: &dyn Stop,
) -> Result<PixelBuffer, CodecError> {
    let mut raw = [0u8; FileHeader::SIZE];
    reader.read_exact(&mut raw)?;
    let file_header = FileHeader::from_bytes(&raw);
    if file_header.signature != SIGNATURE {
        return Err(CodecError::UnrecognizedFormat);
    }

    let mut raw = [0u8; InfoHeader::SIZE];
    reader.read_exact(&mut raw)?;
    let info = InfoHeader::from_bytes(&raw);

    if (info.header_size as usize) < InfoHeader::SIZE {
        return Err(CodecError::UnsupportedVariant(format!(
            "BMP info header of {} bytes",
            info.header_size
        )));
    }
    if !info.is_24bit_uncompressed() {
        return Err(CodecError::UnsupportedVariant(format!(
            "BMP with {} bits per pixel, compression {}",
            info.bits_per_pixel, info.compression
        )));
    }
    if info.width < 0 {
        return Err(CodecError::InvalidHeader(format!(
            "negative BMP width {}",
            info.width
        )));
    }
    if info.planes != 1 {
        tracing::warn!(planes = info.planes, "BMP plane count is not 1, ignoring");
    }

    // Everything between the 40-byte prefix and the payload: the rest of a
    // larger info header plus any gap the writer left.
    let headers_end = (FileHeader::SIZE + InfoHeader::SIZE) as u64;
    let data_offset = u64::from(file_header.data_offset);
    let min_offset = FileHeader::SIZE as u64 + u64::from(info.header_size);
    if data_offset < min_offset {
        return Err(CodecError::InvalidHeader(format!(
            "BMP data offset {data_offset} overlaps headers ending at {min_offset}"
        )));
    }
    skip(&mut reader, data_offset - headers_end)?;

    let top_down = info.height < 0;
    let width = info.width as usize;
    let height = info.height.unsigned_abs() as usize;
    let stride = row_stride(width).ok_or(CodecError::DimensionsTooLarge {
        width: width as u64,
        height: height as u64,
    })?;

    tracing::debug!(
        width,
        height,
        stride,
        top_down,
        data_offset,
        "decoding 24-bit BMP"
    );

    let expected_size = (stride as u64)
        .saturating_mul(height as u64)
        .saturating_add(data_offset);
    if u64::from(file_header.file_size) != expected_size {
        tracing::debug!(
            declared = file_header.file_size,
            expected = expected_size,
            "BMP file size field disagrees with dimensions"
        );
    }

    PixelBuffer::check_alloc(width, height, limits)?;

    // Storage grows with the rows actually read, so a short file declaring
    // huge dimensions never costs more than its own length.
    let mut pixels: Vec<RGB8> =
        Vec::with_capacity(width.saturating_mul(height).min(INITIAL_PIXELS));
    let mut row = Vec::with_capacity(stride.min(INITIAL_PIXELS * BYTES_PER_PIXEL));

    for i in 0..height {
        if i % 16 == 0 {
            stop.check()?;
        }
        row.clear();
        reader.by_ref().take(stride as u64).read_to_end(&mut row)?;
        if row.len() != stride {
            return Err(CodecError::UnexpectedEof);
        }
        pixels.extend(
            row[..width * BYTES_PER_PIXEL]
                .chunks_exact(BYTES_PER_PIXEL)
                .map(|bgr| RGB8::new(bgr[2], bgr[1], bgr[0])),
        );
    }

    if !top_down {
        reverse_rows(&mut pixels, width);
    }
    Ok(PixelBuffer::from_packed(pixels, width, height))
}

/// Reverse the row order of a tightly packed image in place.
fn reverse_rows(pixels: &mut [RGB8], width: usize) {
    if width == 0 {
        return;
    }
    let height = pixels.len() / width;
    for y in 0..height / 2 {
        let (top, bottom) = pixels.split_at_mut((height - 1 - y) * width);
        top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
    }
}

fn skip<R: Read>(reader: &mut R, n: u64) -> Result<(), CodecError> {
    if n == 0 {
        return Ok(());
    }
    let skipped = io::copy(&mut reader.by_ref().take(n), &mut io::sink())?;
    if skipped != n {
        return Err(CodecError::UnexpectedEof);
    }
    Ok(())
}
