//! PPM header parser and sample decoders.

use enough::Stop;
use rgb::{AsPixels as _, RGB8};

use super::{PpmHeader, PpmVariant};
use crate::error::CodecError;
use crate::pixel::PixelBuffer;

const MAX_MAXVAL: u32 = 65_535;

/// Skip whitespace and `#` comments (which run to the end of the line).
fn skip_whitespace(data: &[u8], pos: &mut usize) {
    while let Some(&b) = data.get(*pos) {
        if b == b'#' {
            while let Some(&c) = data.get(*pos) {
                if c == b'\n' || c == b'\r' {
                    break;
                }
                *pos += 1;
            }
        } else if b.is_ascii_whitespace() {
            *pos += 1;
        } else {
            break;
        }
    }
}

/// Read an unsigned decimal after optional whitespace/comments.
fn read_uint(data: &[u8], pos: &mut usize, what: &str) -> Result<u32, CodecError> {
    skip_whitespace(data, pos);
    let start = *pos;
    let mut value: u32 = 0;
    while let Some(&b) = data.get(*pos) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(b - b'0')))
            .ok_or_else(|| CodecError::InvalidHeader(format!("{what} out of range")))?;
        *pos += 1;
    }
    if *pos == start {
        return match data.get(*pos) {
            None => Err(CodecError::UnexpectedEof),
            Some(&b) => Err(CodecError::InvalidHeader(format!(
                "expected {what}, found byte 0x{b:02x}"
            ))),
        };
    }
    Ok(value)
}

pub(crate) fn parse_header(data: &[u8]) -> Result<PpmHeader, CodecError> {
    let magic = data.get(0..2).ok_or(CodecError::UnexpectedEof)?;
    let variant = match magic {
        b"P6" => PpmVariant::Binary,
        b"P3" => PpmVariant::Plain,
        [b'P', other] => {
            return Err(CodecError::UnsupportedVariant(format!(
                "PNM type P{}",
                *other as char
            )));
        }
        _ => return Err(CodecError::UnrecognizedFormat),
    };

    let mut pos = 2;
    match data.get(pos) {
        Some(b) if b.is_ascii_whitespace() || *b == b'#' => {}
        Some(_) => {
            return Err(CodecError::InvalidHeader(
                "missing whitespace after magic".into(),
            ));
        }
        None => return Err(CodecError::UnexpectedEof),
    }

    let width = read_uint(data, &mut pos, "width")?;
    let height = read_uint(data, &mut pos, "height")?;
    let maxval = read_uint(data, &mut pos, "maxval")?;
    if maxval == 0 || maxval > MAX_MAXVAL {
        return Err(CodecError::InvalidHeader(format!(
            "maxval {maxval} outside 1..={MAX_MAXVAL}"
        )));
    }

    if variant == PpmVariant::Binary {
        // Exactly one whitespace byte separates the header from the raster.
        match data.get(pos) {
            Some(b) if b.is_ascii_whitespace() => pos += 1,
            Some(_) => {
                return Err(CodecError::InvalidHeader(
                    "missing whitespace after maxval".into(),
                ));
            }
            None => return Err(CodecError::UnexpectedEof),
        }
    }

    Ok(PpmHeader {
        variant,
        width,
        height,
        maxval,
        data_offset: pos,
    })
}

/// Fewest raster bytes that can hold every sample the header declares.
///
/// Plain samples need at least one digit each plus a separator between them.
pub(crate) fn min_raster_len(header: &PpmHeader) -> Option<usize> {
    let samples = (header.width as usize)
        .checked_mul(header.height as usize)?
        .checked_mul(3)?;
    match header.variant {
        PpmVariant::Binary => {
            let bytes_per_sample = if header.maxval > 255 { 2 } else { 1 };
            samples.checked_mul(bytes_per_sample)
        }
        PpmVariant::Plain => Some(samples.checked_mul(2)?.saturating_sub(1)),
    }
}

/// Rescale a sample in `0..=maxval` to `0..=255`.
fn scale_sample(v: u32, maxval: u32) -> u8 {
    if maxval == 255 {
        v as u8
    } else {
        ((v * 255 + maxval / 2) / maxval) as u8
    }
}

fn check_sample(v: u32, maxval: u32) -> Result<u32, CodecError> {
    if v > maxval {
        return Err(CodecError::InvalidData(format!(
            "sample {v} exceeds maxval {maxval}"
        )));
    }
    Ok(v)
}

pub(crate) fn decode_binary(
    body: &[u8],
    header: &PpmHeader,
    image: &mut PixelBuffer,
    stop: &dyn Stop,
) -> Result<(), CodecError> {
    let w = image.width();
    let h = image.height();
    let bytes_per_sample = if header.maxval > 255 { 2 } else { 1 };
    let row_bytes = w
        .checked_mul(3 * bytes_per_sample)
        .ok_or(CodecError::DimensionsTooLarge {
            width: w as u64,
            height: h as u64,
        })?;
    let expected = row_bytes
        .checked_mul(h)
        .ok_or(CodecError::DimensionsTooLarge {
            width: w as u64,
            height: h as u64,
        })?;
    let raster = body.get(..expected).ok_or(CodecError::UnexpectedEof)?;
    if row_bytes == 0 {
        return Ok(());
    }

    for (y, src) in raster.chunks_exact(row_bytes).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        let dst = image.row_mut(y);
        if header.maxval == 255 {
            let src: &[RGB8] = src.as_pixels();
            dst.copy_from_slice(src);
        } else if bytes_per_sample == 1 {
            for (px, s) in dst.iter_mut().zip(src.chunks_exact(3)) {
                let r = check_sample(u32::from(s[0]), header.maxval)?;
                let g = check_sample(u32::from(s[1]), header.maxval)?;
                let b = check_sample(u32::from(s[2]), header.maxval)?;
                *px = RGB8::new(
                    scale_sample(r, header.maxval),
                    scale_sample(g, header.maxval),
                    scale_sample(b, header.maxval),
                );
            }
        } else {
            for (px, s) in dst.iter_mut().zip(src.chunks_exact(6)) {
                let r = check_sample(u32::from(u16::from_be_bytes([s[0], s[1]])), header.maxval)?;
                let g = check_sample(u32::from(u16::from_be_bytes([s[2], s[3]])), header.maxval)?;
                let b = check_sample(u32::from(u16::from_be_bytes([s[4], s[5]])), header.maxval)?;
                *px = RGB8::new(
                    scale_sample(r, header.maxval),
                    scale_sample(g, header.maxval),
                    scale_sample(b, header.maxval),
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn decode_plain(
    body: &[u8],
    header: &PpmHeader,
    image: &mut PixelBuffer,
    stop: &dyn Stop,
) -> Result<(), CodecError> {
    let mut pos = 0;
    for y in 0..image.height() {
        if y % 16 == 0 {
            stop.check()?;
        }
        for px in image.row_mut(y) {
            let mut channel = [0u8; 3];
            for c in &mut channel {
                let v = check_sample(read_uint(body, &mut pos, "sample")?, header.maxval)?;
                *c = scale_sample(v, header.maxval);
            }
            *px = RGB8::from(channel);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    #[test]
    fn header_with_comments() {
        let data = b"P6\n# made by hand\n3 # width\n2\n255\n";
        let header = parse_header(data).unwrap();
        assert_eq!(header.variant, PpmVariant::Binary);
        assert_eq!((header.width, header.height, header.maxval), (3, 2, 255));
        assert_eq!(header.data_offset, data.len());
    }

    #[test]
    fn header_rejections() {
        assert!(matches!(parse_header(b"P"), Err(CodecError::UnexpectedEof)));
        assert!(matches!(
            parse_header(b"BM\n1 1\n255\n"),
            Err(CodecError::UnrecognizedFormat)
        ));
        assert!(matches!(
            parse_header(b"P5\n1 1\n255\n"),
            Err(CodecError::UnsupportedVariant(_))
        ));
        assert!(matches!(
            parse_header(b"P6\n1 1\n0\n"),
            Err(CodecError::InvalidHeader(_))
        ));
        assert!(matches!(
            parse_header(b"P6\n1 1\n70000\n"),
            Err(CodecError::InvalidHeader(_))
        ));
        assert!(matches!(
            parse_header(b"P6\n1 x\n255\n"),
            Err(CodecError::InvalidHeader(_))
        ));
        assert!(matches!(
            parse_header(b"P6\n1 1\n255"),
            Err(CodecError::UnexpectedEof)
        ));
        assert!(matches!(
            parse_header(b"P6\n99999999999 1\n255\n"),
            Err(CodecError::InvalidHeader(_))
        ));
    }

    #[test]
    fn raster_length_from_header() {
        let binary = parse_header(b"P6\n4 2\n255\n").unwrap();
        assert_eq!(min_raster_len(&binary), Some(24));
        let wide = parse_header(b"P6\n4 2\n1023\n").unwrap();
        assert_eq!(min_raster_len(&wide), Some(48));
        let plain = parse_header(b"P3\n1 1\n255\n").unwrap();
        assert_eq!(min_raster_len(&plain), Some(5));
        let empty = parse_header(b"P3\n0 7\n255\n").unwrap();
        assert_eq!(min_raster_len(&empty), Some(0));
    }

    #[test]
    fn scaling() {
        assert_eq!(scale_sample(0, 15), 0);
        assert_eq!(scale_sample(15, 15), 255);
        assert_eq!(scale_sample(1, 1), 255);
        assert_eq!(scale_sample(65_535, 65_535), 255);
        assert_eq!(scale_sample(32_768, 65_535), 128);
        assert_eq!(scale_sample(200, 255), 200);
    }

    #[test]
    fn sixteen_bit_binary() {
        let data = b"P6\n1 1\n65535\n\xff\xff\x00\x00\x80\x00";
        let header = parse_header(data).unwrap();
        let mut img = PixelBuffer::new(1, 1, RGB8::default());
        decode_binary(&data[header.data_offset..], &header, &mut img, &Unstoppable).unwrap();
        assert_eq!(img.pixel(0, 0), RGB8::new(255, 0, 128));
    }

    #[test]
    fn sample_above_maxval() {
        let data = b"P6\n1 1\n15\n\x10\x00\x00";
        let header = parse_header(data).unwrap();
        let mut img = PixelBuffer::new(1, 1, RGB8::default());
        assert!(matches!(
            decode_binary(&data[header.data_offset..], &header, &mut img, &Unstoppable),
            Err(CodecError::InvalidData(_))
        ));
    }
}
