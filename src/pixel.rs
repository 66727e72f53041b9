use imgref::{ImgRef, ImgVec};
use rgb::RGB8;

use crate::error::CodecError;
use crate::limits::Limits;

/// An owned 2D grid of RGB pixels with an independent row stride.
///
/// Rows are `stride` pixels apart in the backing buffer; only the first
/// `width` pixels of each row are part of the image.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    img: ImgVec<RGB8>,
}

impl PixelBuffer {
    /// Tightly packed buffer (`stride == width`) filled with `fill`.
    pub fn new(width: usize, height: usize, fill: RGB8) -> Self {
        Self::with_stride(width, height, width, fill)
    }

    /// Buffer with rows `stride` pixels apart. A stride below `width` is raised to `width`.
    ///
    /// # Panics
    ///
    /// If `stride * height` overflows `usize`.
    pub fn with_stride(width: usize, height: usize, stride: usize, fill: RGB8) -> Self {
        // imgref rejects a zero stride, which a zero-width image would otherwise get
        let stride = stride.max(width).max(1);
        let len = stride.checked_mul(height).unwrap_or_else(|| {
            panic!("{width}x{height} buffer with stride {stride} overflows usize")
        });
        Self {
            img: ImgVec::new_stride(vec![fill; len], width, height, stride),
        }
    }

    /// Wrap decoded pixels stored row after row with no padding.
    pub(crate) fn from_packed(pixels: Vec<RGB8>, width: usize, height: usize) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        if width == 0 {
            return Self::new(0, height, RGB8::default());
        }
        Self {
            img: ImgVec::new(pixels, width, height),
        }
    }

    /// Allocate a black, tightly packed buffer for a decoder after checking `limits`.
    pub(crate) fn try_new(width: usize, height: usize, limits: &Limits) -> Result<Self, CodecError> {
        Self::check_alloc(width, height, limits)?;
        Ok(Self::new(width, height, RGB8::new(0, 0, 0)))
    }

    /// Check that a `width` x `height` RGB8 buffer is allowed by `limits` and
    /// addressable, without allocating it.
    pub(crate) fn check_alloc(
        width: usize,
        height: usize,
        limits: &Limits,
    ) -> Result<(), CodecError> {
        let (w, h) = (width as u64, height as u64);
        limits.check(w, h)?;
        let bytes = w
            .checked_mul(h)
            .and_then(|wh| wh.checked_mul(3))
            .ok_or(CodecError::DimensionsTooLarge {
                width: w,
                height: h,
            })?;
        limits.check_memory(bytes)?;
        if usize::try_from(bytes).is_err() {
            return Err(CodecError::DimensionsTooLarge {
                width: w,
                height: h,
            });
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.img.width()
    }

    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Distance between row starts, in pixels.
    pub fn stride(&self) -> usize {
        self.img.stride()
    }

    /// True when the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// The `width` visible pixels of row `y`.
    ///
    /// # Panics
    ///
    /// If `y >= height`.
    pub fn row(&self, y: usize) -> &[RGB8] {
        assert!(y < self.height(), "row {y} out of bounds");
        let start = y * self.stride();
        &self.img.buf()[start..start + self.width()]
    }

    /// Mutable access to the `width` visible pixels of row `y`.
    ///
    /// # Panics
    ///
    /// If `y >= height`.
    pub fn row_mut(&mut self, y: usize) -> &mut [RGB8] {
        assert!(y < self.height(), "row {y} out of bounds");
        let start = y * self.stride();
        let width = self.width();
        &mut self.img.buf_mut()[start..start + width]
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[RGB8]> + '_ {
        (0..self.height()).map(move |y| self.row(y))
    }

    pub fn pixel(&self, x: usize, y: usize) -> RGB8 {
        self.row(y)[x]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: RGB8) {
        self.row_mut(y)[x] = color;
    }

    /// Borrow as an [`imgref::ImgRef`].
    pub fn as_imgref(&self) -> ImgRef<'_, RGB8> {
        self.img.as_ref()
    }

    pub fn into_imgvec(self) -> ImgVec<RGB8> {
        self.img
    }
}

impl From<ImgVec<RGB8>> for PixelBuffer {
    fn from(img: ImgVec<RGB8>) -> Self {
        Self { img }
    }
}

/// Compares dimensions and visible pixels; stride and row padding are ignored.
impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.rows().zip(other.rows()).all(|(a, b)| a == b)
    }
}

impl Eq for PixelBuffer {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_independent_of_width() {
        let mut img = PixelBuffer::with_stride(3, 2, 8, RGB8::new(1, 2, 3));
        assert_eq!(img.stride(), 8);
        assert_eq!(img.row(1).len(), 3);
        img.set_pixel(2, 1, RGB8::new(9, 9, 9));
        assert_eq!(img.pixel(2, 1), RGB8::new(9, 9, 9));
        assert_eq!(img.pixel(0, 1), RGB8::new(1, 2, 3));
    }

    #[test]
    fn stride_never_below_width() {
        let img = PixelBuffer::with_stride(5, 1, 2, RGB8::default());
        assert_eq!(img.stride(), 5);
    }

    #[test]
    fn zero_sized_buffers() {
        let img = PixelBuffer::new(0, 4, RGB8::default());
        assert!(img.is_empty());
        assert_eq!(img.rows().count(), 4);
        assert!(img.rows().all(|r| r.is_empty()));

        let img = PixelBuffer::new(4, 0, RGB8::default());
        assert!(img.is_empty());
        assert_eq!(img.rows().count(), 0);
    }

    #[test]
    fn equality_ignores_stride() {
        let fill = RGB8::new(10, 20, 30);
        let tight = PixelBuffer::new(4, 3, fill);
        let padded = PixelBuffer::with_stride(4, 3, 7, fill);
        assert_eq!(tight, padded);

        let mut other = padded.clone();
        other.set_pixel(3, 2, RGB8::new(0, 0, 0));
        assert_ne!(tight, other);
    }

    #[test]
    #[should_panic(expected = "overflows usize")]
    fn with_stride_overflow_panics() {
        let _ = PixelBuffer::with_stride(1, usize::MAX, 2, RGB8::default());
    }

    #[test]
    fn from_packed_keeps_row_order() {
        let pixels = (0..6).map(|i| RGB8::new(i, i, i)).collect();
        let img = PixelBuffer::from_packed(pixels, 3, 2);
        assert_eq!(img.stride(), 3);
        assert_eq!(img.pixel(0, 1), RGB8::new(3, 3, 3));

        let empty = PixelBuffer::from_packed(Vec::new(), 0, 5);
        assert_eq!((empty.width(), empty.height()), (0, 5));
    }

    #[test]
    fn try_new_respects_limits() {
        let limits = Limits {
            max_pixels: Some(10),
            ..Limits::none()
        };
        assert!(PixelBuffer::try_new(2, 5, &limits).is_ok());
        assert!(matches!(
            PixelBuffer::try_new(3, 4, &limits),
            Err(CodecError::LimitExceeded(_))
        ));
    }
}
