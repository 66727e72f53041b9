use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use enough::Unstoppable;

use crate::codec::Codec;
use crate::error::{CodecError, ConvertError};
use crate::limits::Limits;

/// Builder for a single file-to-file conversion.
///
/// # Example
///
/// ```no_run
/// use zenconvert::Converter;
///
/// Converter::new()
///     .with_jpeg_quality(85)
///     .convert("in.bmp", "out.jpg")?;
/// # Ok::<(), zenconvert::ConvertError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Converter {
    limits: Limits,
    jpeg_quality: Option<u8>,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits applied while decoding the input.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Quality for JPEG output (1..=100).
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality);
        self
    }

    fn codec_for(&self, path: &Path) -> Option<Codec> {
        let codec = Codec::for_path(path)?;
        Some(match self.jpeg_quality {
            Some(q) => codec.with_jpeg_quality(q),
            None => codec,
        })
    }

    /// Convert `input` to `output`, picking both formats from their extensions.
    ///
    /// Checks run in a fixed order and the first failure is returned: input
    /// format, output format, decode, encode. Both formats are resolved
    /// before any file is touched. A failed encode may leave a partial
    /// output file behind.
    pub fn convert(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<(), ConvertError> {
        let input = input.as_ref();
        let output = output.as_ref();

        let decoder = self
            .codec_for(input)
            .ok_or_else(|| ConvertError::UnknownInputFormat {
                path: input.to_path_buf(),
            })?;
        let encoder = self
            .codec_for(output)
            .ok_or_else(|| ConvertError::UnknownOutputFormat {
                path: output.to_path_buf(),
            })?;

        let load_err = |source: CodecError| ConvertError::Load {
            path: input.to_path_buf(),
            source,
        };
        let image = {
            let file = File::open(input).map_err(|e| load_err(e.into()))?;
            decoder
                .decode(BufReader::new(file), &self.limits, &Unstoppable)
                .map_err(load_err)?
        };
        tracing::info!(
            input = %input.display(),
            format = %decoder.format(),
            width = image.width(),
            height = image.height(),
            "loaded"
        );

        let save_err = |source: CodecError| ConvertError::Save {
            path: output.to_path_buf(),
            source,
        };
        let file = File::create(output).map_err(|e| save_err(e.into()))?;
        let mut writer = BufWriter::new(file);
        encoder
            .encode(&mut writer, &image, &Unstoppable)
            .map_err(save_err)?;
        writer.flush().map_err(|e| save_err(e.into()))?;
        tracing::info!(output = %output.display(), format = %encoder.format(), "saved");

        Ok(())
    }
}
