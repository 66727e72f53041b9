use core::fmt;
use std::path::Path;

/// Container format, chosen from a file name's extension.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Uncompressed 24-bit Windows bitmap.
    Bmp,
    /// Portable pixmap (P6, P3 on input).
    Ppm,
    /// JPEG/JFIF.
    Jpeg,
}

impl ImageFormat {
    /// Map an extension (without the dot) to a format.
    ///
    /// Matching is exact and case-sensitive: `bmp` is recognized, `BMP` is not.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "bmp" => Some(ImageFormat::Bmp),
            "ppm" => Some(ImageFormat::Ppm),
            _ => None,
        }
    }

    /// Format of the file at `path`, judged only by the text after the last
    /// `.` of the file name. Returns `None` when there is no extension or it
    /// is not recognized.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Recognized extensions for this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageFormat::Bmp => &["bmp"],
            ImageFormat::Ppm => &["ppm"],
            ImageFormat::Jpeg => &["jpg", "jpeg"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ImageFormat::Bmp => "BMP",
            ImageFormat::Ppm => "PPM",
            ImageFormat::Jpeg => "JPEG",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
