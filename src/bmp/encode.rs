//! BMP encoder: uncompressed 24-bit, bottom-up rows.

use std::io::Write;

use enough::Stop;

use super::header::{FileHeader, InfoHeader};
use super::{BYTES_PER_PIXEL, row_stride};
use crate::error::CodecError;
use crate::pixel::PixelBuffer;

/// Encode `image` as BMP into `writer`.
///
/// Dimensions are validated before the first byte is written. A failed write
/// part way through leaves whatever was already written in the sink.
pub(crate) fn encode_bmp<W: Write>(
    mut writer: W,
    image: &PixelBuffer,
    stop: &dyn Stop,
) -> Result<(), CodecError> {
    let w = image.width();
    let h = image.height();
    let too_large = || CodecError::DimensionsTooLarge {
        width: w as u64,
        height: h as u64,
    };

    let row_stride = row_stride(w).ok_or_else(too_large)?;
    let pixel_data_size = row_stride
        .checked_mul(h)
        .and_then(|size| u32::try_from(size).ok())
        .ok_or_else(too_large)?;
    let file_header = FileHeader::for_payload(pixel_data_size).ok_or_else(too_large)?;
    let width = i32::try_from(w).map_err(|_| too_large())?;
    let height = i32::try_from(h).map_err(|_| too_large())?;
    let info_header = InfoHeader::new(width, height, pixel_data_size);

    stop.check()?;

    writer.write_all(&file_header.to_bytes())?;
    writer.write_all(&info_header.to_bytes())?;

    // Padding stays zero: only the first w * 3 bytes are rewritten per row.
    let mut out_row = vec![0u8; row_stride];
    for (i, row) in image.rows().rev().enumerate() {
        if i % 16 == 0 {
            stop.check()?;
        }
        for (bgr, px) in out_row.chunks_exact_mut(BYTES_PER_PIXEL).zip(row) {
            bgr[0] = px.b;
            bgr[1] = px.g;
            bgr[2] = px.r;
        }
        writer.write_all(&out_row)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;
    use rgb::RGB8;

    #[test]
    fn single_pixel_bytes() {
        let img = PixelBuffer::new(1, 1, RGB8::new(10, 20, 30));
        let mut out = Vec::new();
        encode_bmp(&mut out, &img, &Unstoppable).unwrap();
        assert_eq!(out.len(), 58);
        assert_eq!(&out[54..], &[30, 20, 10, 0]);
    }

    #[test]
    fn padding_is_zero_filled() {
        let img = PixelBuffer::new(5, 3, RGB8::new(0xff, 0xff, 0xff));
        let mut out = Vec::new();
        encode_bmp(&mut out, &img, &Unstoppable).unwrap();
        // stride 16, 15 pixel bytes + 1 pad byte per row
        for row in out[54..].chunks_exact(16) {
            assert!(row[..15].iter().all(|&b| b == 0xff));
            assert_eq!(row[15], 0);
        }
    }

    #[test]
    fn ignores_buffer_stride_padding() {
        let mut img = PixelBuffer::with_stride(2, 1, 5, RGB8::new(1, 1, 1));
        img.set_pixel(1, 0, RGB8::new(7, 8, 9));
        let mut out = Vec::new();
        encode_bmp(&mut out, &img, &Unstoppable).unwrap();
        assert_eq!(&out[54..], &[1, 1, 1, 9, 8, 7, 0, 0]);
    }

    #[test]
    fn empty_image_writes_headers_only() {
        let img = PixelBuffer::new(0, 0, RGB8::default());
        let mut out = Vec::new();
        encode_bmp(&mut out, &img, &Unstoppable).unwrap();
        assert_eq!(out.len(), 54);
        assert_eq!(&out[2..6], &54u32.to_le_bytes());
    }

    struct FailAfter {
        remaining: usize,
    }

    impl Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.remaining == 0 {
                return Err(std::io::Error::other("disk full"));
            }
            let n = buf.len().min(self.remaining);
            self.remaining -= n;
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_mid_payload_is_an_error() {
        let img = PixelBuffer::new(4, 4, RGB8::default());
        let sink = FailAfter { remaining: 70 };
        assert!(matches!(
            encode_bmp(sink, &img, &Unstoppable),
            Err(CodecError::Io(_))
        ));
    }
}
