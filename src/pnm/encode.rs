//! PPM encoder: P6, maxval 255.

use std::io::Write;

use enough::Stop;

use crate::error::CodecError;
use crate::pixel::PixelBuffer;

pub(crate) fn encode_ppm<W: Write>(
    mut writer: W,
    image: &PixelBuffer,
    stop: &dyn Stop,
) -> Result<(), CodecError> {
    let w = image.width();
    let h = image.height();
    let header = format!("P6\n{w} {h}\n255\n");
    stop.check()?;
    writer.write_all(header.as_bytes())?;

    let mut out_row = Vec::with_capacity(w * 3);
    for (y, row) in image.rows().enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        out_row.clear();
        out_row.extend(row.iter().flat_map(|px| [px.r, px.g, px.b]));
        writer.write_all(&out_row)?;
    }

    writer.flush()?;
    Ok(())
}
