use std::path::PathBuf;

use enough::StopReason;

/// Errors from BMP/PPM/JPEG decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("unrecognized format signature")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("invalid pixel data: {0}")]
    InvalidData(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u64, height: u64 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("i/o error")]
    Io(#[source] std::io::Error),

    #[cfg(feature = "jpeg")]
    #[error("jpeg codec error")]
    Jpeg(#[from] image::ImageError),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for CodecError {
    fn from(r: StopReason) -> Self {
        CodecError::Cancelled(r)
    }
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            CodecError::UnexpectedEof
        } else {
            CodecError::Io(e)
        }
    }
}

/// Terminal outcomes of a single conversion, in the order they are checked.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConvertError {
    #[error("unknown format of the input file: {}", path.display())]
    UnknownInputFormat { path: PathBuf },

    #[error("unknown format of the output file: {}", path.display())]
    UnknownOutputFormat { path: PathBuf },

    #[error("loading {} failed", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("saving {} failed", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

impl ConvertError {
    /// Process exit status for this outcome. `1` is reserved for usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            ConvertError::UnknownInputFormat { .. } => 2,
            ConvertError::UnknownOutputFormat { .. } => 3,
            ConvertError::Load { .. } => 4,
            ConvertError::Save { .. } => 5,
        }
    }
}
