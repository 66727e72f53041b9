//! PPM: P6 (binary) and P3 (plain text) portable pixmaps.
//!
//! Decoding accepts any maxval from 1 to 65535 and rescales samples to
//! 8 bits. Encoding always writes P6 with maxval 255.

mod decode;
mod encode;

use std::io::{Read, Write};

use enough::Stop;

use crate::error::CodecError;
use crate::limits::Limits;
use crate::pixel::PixelBuffer;

/// Which PPM sub-format a header declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PpmVariant {
    /// P6 — binary samples.
    Binary,
    /// P3 — ASCII decimal samples.
    Plain,
}

/// Parsed PPM header (internal).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PpmHeader {
    pub variant: PpmVariant,
    pub width: u32,
    pub height: u32,
    pub maxval: u32,
    pub data_offset: usize,
}

/// Decode a PPM stream. The stream is read to its end.
pub(crate) fn decode<R: Read>(
    mut reader: R,
    limits: &Limits,
    stop: &dyn Stop,
) -> Result<PixelBuffer, CodecError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let header = decode::parse_header(&data)?;
    tracing::debug!(
        variant = ?header.variant,
        width = header.width,
        height = header.height,
        maxval = header.maxval,
        "decoding PPM"
    );

    let (width, height) = (header.width as usize, header.height as usize);
    PixelBuffer::check_alloc(width, height, limits)?;
    let body = data
        .get(header.data_offset..)
        .ok_or(CodecError::UnexpectedEof)?;
    // The whole stream is in memory, so a raster that cannot fit in it is
    // rejected before the pixel buffer is allocated.
    let needed = decode::min_raster_len(&header).ok_or(CodecError::DimensionsTooLarge {
        width: width as u64,
        height: height as u64,
    })?;
    if body.len() < needed {
        return Err(CodecError::UnexpectedEof);
    }

    let mut image = PixelBuffer::try_new(width, height, limits)?;
    stop.check()?;

    match header.variant {
        PpmVariant::Binary => decode::decode_binary(body, &header, &mut image, stop)?,
        PpmVariant::Plain => decode::decode_plain(body, &header, &mut image, stop)?,
    }
    Ok(image)
}

/// Encode to binary PPM (P6).
pub(crate) fn encode<W: Write>(
    writer: W,
    image: &PixelBuffer,
    stop: &dyn Stop,
) -> Result<(), CodecError> {
    encode::encode_ppm(writer, image, stop)
}
