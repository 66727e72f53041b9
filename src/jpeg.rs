//! JPEG through the `image` crate.
//!
//! Only marshalling lives here: rows of the [`PixelBuffer`] are flattened
//! into the tight RGB8 layout `image` expects, and decoded images are
//! converted to RGB8 and copied back row by row.

use std::io::{Cursor, Read, Write};

use enough::Stop;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageFormat, ImageReader};
use rgb::{AsPixels as _, RGB8};

use crate::error::CodecError;
use crate::limits::Limits;
use crate::pixel::PixelBuffer;

fn image_limits(limits: &Limits) -> image::Limits {
    let clamp = |v: u64| u32::try_from(v).unwrap_or(u32::MAX);
    let mut out = image::Limits::no_limits();
    out.max_image_width = limits.max_width.map(clamp);
    out.max_image_height = limits.max_height.map(clamp);
    out.max_alloc = limits.max_memory_bytes;
    out
}

pub(crate) fn decode<R: Read>(
    mut reader: R,
    limits: &Limits,
    stop: &dyn Stop,
) -> Result<PixelBuffer, CodecError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    stop.check()?;

    let mut decoder = ImageReader::with_format(Cursor::new(&data), ImageFormat::Jpeg);
    decoder.limits(image_limits(limits));
    let decoded = decoder.decode()?.into_rgb8();
    let (width, height) = decoded.dimensions();
    tracing::debug!(width, height, "decoded JPEG");

    let mut image = PixelBuffer::try_new(width as usize, height as usize, limits)?;
    let pixels: &[RGB8] = decoded.as_raw().as_pixels();
    if width > 0 {
        for (y, src) in pixels.chunks_exact(width as usize).enumerate() {
            if y % 16 == 0 {
                stop.check()?;
            }
            image.row_mut(y).copy_from_slice(src);
        }
    }
    Ok(image)
}

pub(crate) fn encode<W: Write>(
    mut writer: W,
    image: &PixelBuffer,
    quality: u8,
    stop: &dyn Stop,
) -> Result<(), CodecError> {
    let too_large = || CodecError::DimensionsTooLarge {
        width: image.width() as u64,
        height: image.height() as u64,
    };
    let width = u32::try_from(image.width()).map_err(|_| too_large())?;
    let height = u32::try_from(image.height()).map_err(|_| too_large())?;

    let mut packed = Vec::with_capacity(image.width() * image.height() * 3);
    for (y, row) in image.rows().enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        packed.extend(row.iter().flat_map(|px| [px.r, px.g, px.b]));
    }

    tracing::debug!(width, height, quality, "encoding JPEG");
    JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100)).encode(
        &packed,
        width,
        height,
        ExtendedColorType::Rgb8,
    )?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    #[test]
    fn limits_carry_over() {
        let converted = image_limits(&Limits::default());
        assert_eq!(converted.max_image_width, Some(65_535));
        assert_eq!(converted.max_image_height, Some(65_535));
        assert_eq!(converted.max_alloc, Some(Limits::DEFAULT_MAX_MEMORY_BYTES));

        let converted = image_limits(&Limits::none());
        assert_eq!(converted.max_image_width, None);
        assert_eq!(converted.max_alloc, None);
    }

    #[test]
    fn solid_color_survives_lossy_roundtrip() {
        let color = RGB8::new(200, 40, 90);
        let img = PixelBuffer::new(16, 8, color);
        let mut out = Vec::new();
        encode(&mut out, &img, 95, &Unstoppable).unwrap();
        assert_eq!(&out[..2], &[0xff, 0xd8]);

        let back = decode(&out[..], &Limits::default(), &Unstoppable).unwrap();
        assert_eq!((back.width(), back.height()), (16, 8));
        for row in back.rows() {
            for px in row {
                assert!(px.r.abs_diff(color.r) <= 8, "{px:?}");
                assert!(px.g.abs_diff(color.g) <= 8, "{px:?}");
                assert!(px.b.abs_diff(color.b) <= 8, "{px:?}");
            }
        }
    }

    #[test]
    fn garbage_is_rejected() {
        let data = b"definitely not a jpeg";
        assert!(decode(&data[..], &Limits::default(), &Unstoppable).is_err());
    }
}
