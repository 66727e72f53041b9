//! BMP file and info header records, serialized field by field.

pub(crate) const SIGNATURE: [u8; 2] = *b"BM";
/// Offset of the pixel payload when both headers are written back to back.
pub(crate) const DATA_OFFSET: u32 = (FileHeader::SIZE + InfoHeader::SIZE) as u32;

const PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 24;
const COMPRESSION_RGB: u32 = 0;
/// 300 DPI in pixels per metre.
const RESOLUTION: i32 = 11_811;
const IMPORTANT_COLORS: u32 = 0x100_0000;

fn le_u16(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

fn le_u32(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn le_i32(b: &[u8], at: usize) -> i32 {
    le_u32(b, at) as i32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FileHeader {
    pub signature: [u8; 2],
    /// Headers plus payload.
    pub file_size: u32,
    pub reserved: u32,
    pub data_offset: u32,
}

impl FileHeader {
    pub const SIZE: usize = 14;

    /// Header for a payload of `payload_size` bytes. `None` if the total overflows `u32`.
    pub fn for_payload(payload_size: u32) -> Option<Self> {
        Some(Self {
            signature: SIGNATURE,
            file_size: DATA_OFFSET.checked_add(payload_size)?,
            reserved: 0,
            data_offset: DATA_OFFSET,
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..2].copy_from_slice(&self.signature);
        out[2..6].copy_from_slice(&self.file_size.to_le_bytes());
        out[6..10].copy_from_slice(&self.reserved.to_le_bytes());
        out[10..14].copy_from_slice(&self.data_offset.to_le_bytes());
        out
    }

    pub fn from_bytes(b: &[u8; Self::SIZE]) -> Self {
        Self {
            signature: [b[0], b[1]],
            file_size: le_u32(b, 2),
            reserved: le_u32(b, 6),
            data_offset: le_u32(b, 10),
        }
    }
}

/// `BITMAPINFOHEADER`. Later header versions share this 40-byte prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct InfoHeader {
    pub header_size: u32,
    pub width: i32,
    /// Positive for bottom-up rows, negative for top-down.
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl InfoHeader {
    pub const SIZE: usize = 40;

    /// 24-bit uncompressed header for a bottom-up image.
    pub fn new(width: i32, height: i32, image_size: u32) -> Self {
        Self {
            header_size: Self::SIZE as u32,
            width,
            height,
            planes: PLANES,
            bits_per_pixel: BITS_PER_PIXEL,
            compression: COMPRESSION_RGB,
            image_size,
            x_pixels_per_meter: RESOLUTION,
            y_pixels_per_meter: RESOLUTION,
            colors_used: 0,
            colors_important: IMPORTANT_COLORS,
        }
    }

    pub fn is_24bit_uncompressed(&self) -> bool {
        self.bits_per_pixel == BITS_PER_PIXEL && self.compression == COMPRESSION_RGB
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&self.header_size.to_le_bytes());
        out[4..8].copy_from_slice(&self.width.to_le_bytes());
        out[8..12].copy_from_slice(&self.height.to_le_bytes());
        out[12..14].copy_from_slice(&self.planes.to_le_bytes());
        out[14..16].copy_from_slice(&self.bits_per_pixel.to_le_bytes());
        out[16..20].copy_from_slice(&self.compression.to_le_bytes());
        out[20..24].copy_from_slice(&self.image_size.to_le_bytes());
        out[24..28].copy_from_slice(&self.x_pixels_per_meter.to_le_bytes());
        out[28..32].copy_from_slice(&self.y_pixels_per_meter.to_le_bytes());
        out[32..36].copy_from_slice(&self.colors_used.to_le_bytes());
        out[36..40].copy_from_slice(&self.colors_important.to_le_bytes());
        out
    }

    pub fn from_bytes(b: &[u8; Self::SIZE]) -> Self {
        Self {
            header_size: le_u32(b, 0),
            width: le_i32(b, 4),
            height: le_i32(b, 8),
            planes: le_u16(b, 12),
            bits_per_pixel: le_u16(b, 14),
            compression: le_u32(b, 16),
            image_size: le_u32(b, 20),
            x_pixels_per_meter: le_i32(b, 24),
            y_pixels_per_meter: le_i32(b, 28),
            colors_used: le_u32(b, 32),
            colors_important: le_u32(b, 36),
        }
    }
}
