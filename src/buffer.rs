//! Windowed pixel buffer for seam-carving resizers.
//!
//! [`PixelBuffer`] owns a flat row-major pixel array sized once at
//! construction and never reallocated. Shrinking is logical: cut operations
//! narrow the exposed window while the physical layout — and therefore the
//! position of every surviving pixel — stays fixed. The physical stride is
//! always the *base* column count, so `(col, row)` resolves to
//! `pixels[row * base_cols + col]` for the buffer's entire lifetime.
//!
//! This makes [`cut_column`](PixelBuffer::cut_column) and
//! [`cut_row`](PixelBuffer::cut_row) O(1), which is what a seam-carving loop
//! needs: it removes one seam per iteration, often thousands of times per
//! image, and must not pay a copy per removal.

use imgref::{ImgRef, ImgRefMut};
use rgb::Rgb;

/// A single RGB pixel.
///
/// Channels are 16-bit because the PPM header may declare a max channel
/// value above 255. Value semantics: copied, never referenced.
pub type Pixel = Rgb<u16>;

const ZERO: Pixel = Rgb { r: 0, g: 0, b: 0 };

// ---------------------------------------------------------------------------
// Allocation strategy
// ---------------------------------------------------------------------------

/// Pixel storage allocation strategy, supplied at construction time.
///
/// The default [`HostAlloc`] allocates ordinary heap memory. Alternative
/// strategies can hand back arena- or accelerator-backed vectors instead;
/// the buffer only requires that the result holds exactly `len`
/// zero-valued pixels.
pub trait PixelAlloc {
    /// Allocate a zero-initialized buffer of exactly `len` pixels.
    fn allocate(&self, len: usize) -> Vec<Pixel>;
}

/// Ordinary host-memory allocation.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostAlloc;

impl PixelAlloc for HostAlloc {
    fn allocate(&self, len: usize) -> Vec<Pixel> {
        vec![ZERO; len]
    }
}

// ---------------------------------------------------------------------------
// PixelBuffer
// ---------------------------------------------------------------------------

/// An owned pixel array with a shrinkable logical window.
///
/// Created by [`load`](PixelBuffer::load)/[`decode`](PixelBuffer::decode)
/// from PPM input or by [`new`](PixelBuffer::new) for programmatic use.
/// Accessors operate on the logical window only; out-of-window access is a
/// programming error and panics rather than returning garbage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Format tag from the header, preserved verbatim on write.
    magic: String,
    /// Physical dimensions, fixed at construction.
    base_cols: u32,
    base_rows: u32,
    /// Logical dimensions, shrunk by cut operations.
    current_cols: u32,
    current_rows: u32,
    /// Max channel value from the header, preserved verbatim on write.
    max_value: u16,
    /// `base_cols * base_rows` pixels, row-major, stride `base_cols`.
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    /// Create a zero-filled `cols` x `rows` buffer tagged `P3`.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(cols: u32, rows: u32, max_value: u16) -> Self {
        Self::new_with(cols, rows, max_value, &HostAlloc)
    }

    /// Like [`new`](Self::new), with an explicit allocation strategy.
    pub fn new_with(cols: u32, rows: u32, max_value: u16, alloc: &dyn PixelAlloc) -> Self {
        assert!(cols >= 1 && rows >= 1, "zero-sized image: {cols}x{rows}");
        let pixels = alloc.allocate(cols as usize * rows as usize);
        Self::from_raw("P3".into(), cols, rows, max_value, pixels)
    }

    /// Assemble a buffer from parsed header fields and a filled pixel vec.
    ///
    /// The vec length must match `cols * rows`; the codec and both public
    /// constructors guarantee that.
    pub(crate) fn from_raw(
        magic: String,
        cols: u32,
        rows: u32,
        max_value: u16,
        pixels: Vec<Pixel>,
    ) -> Self {
        assert_eq!(
            pixels.len(),
            cols as usize * rows as usize,
            "allocation strategy returned a wrong-sized buffer"
        );
        Self {
            magic,
            base_cols: cols,
            base_rows: rows,
            current_cols: cols,
            current_rows: rows,
            max_value,
            pixels,
        }
    }

    // --- Accessors ---

    /// Logical width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.current_cols
    }

    /// Logical height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.current_rows
    }

    /// Physical width as originally allocated. Never changes.
    #[inline]
    pub fn base_width(&self) -> u32 {
        self.base_cols
    }

    /// Physical height as originally allocated. Never changes.
    #[inline]
    pub fn base_height(&self) -> u32 {
        self.base_rows
    }

    /// Max channel value declared in the source header.
    #[inline]
    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    /// Format tag from the source header (e.g. `P3`).
    #[inline]
    pub fn magic(&self) -> &str {
        &self.magic
    }

    /// Pixel at logical `(col, row)`.
    ///
    /// # Panics
    ///
    /// Panics if `col >= width()` or `row >= height()`.
    #[inline]
    pub fn get_pixel(&self, col: u32, row: u32) -> Pixel {
        self.check_bounds(col, row);
        self.pixels[self.index(col, row)]
    }

    /// Overwrite the pixel at logical `(col, row)`.
    ///
    /// The write targets the physical slot, so it survives later cuts as
    /// long as the coordinate stays inside the window.
    ///
    /// # Panics
    ///
    /// Panics if `col >= width()` or `row >= height()`.
    #[inline]
    pub fn set_pixel(&mut self, col: u32, row: u32, pixel: Pixel) {
        self.check_bounds(col, row);
        let idx = self.index(col, row);
        self.pixels[idx] = pixel;
    }

    // --- Shrink operations ---

    /// Drop the last logical column. O(1): no pixel moves.
    ///
    /// The caller is responsible for first compacting pixel data so the
    /// column to discard sits at index `width() - 1`; this only trims the
    /// window.
    ///
    /// # Panics
    ///
    /// Panics if the width is already 1.
    pub fn cut_column(&mut self) {
        assert!(self.current_cols > 1, "cannot cut the last column");
        self.current_cols -= 1;
    }

    /// Drop the last logical row. O(1): no pixel moves.
    ///
    /// # Panics
    ///
    /// Panics if the height is already 1.
    pub fn cut_row(&mut self) {
        assert!(self.current_rows > 1, "cannot cut the last row");
        self.current_rows -= 1;
    }

    // --- Views ---

    /// The logical window as a stride-aware [`ImgRef`].
    pub fn as_view(&self) -> ImgRef<'_, Pixel> {
        ImgRef::new_stride(
            &self.pixels,
            self.current_cols as usize,
            self.current_rows as usize,
            self.base_cols as usize,
        )
    }

    /// The logical window as a mutable stride-aware [`ImgRefMut`].
    pub fn as_view_mut(&mut self) -> ImgRefMut<'_, Pixel> {
        ImgRefMut::new_stride(
            &mut self.pixels,
            self.current_cols as usize,
            self.current_rows as usize,
            self.base_cols as usize,
        )
    }

    // --- Internals ---

    #[inline]
    fn index(&self, col: u32, row: u32) -> usize {
        // Physical stride is base_cols regardless of any cuts.
        row as usize * self.base_cols as usize + col as usize
    }

    #[inline]
    fn check_bounds(&self, col: u32, row: u32) {
        assert!(
            col < self.current_cols && row < self.current_rows,
            "pixel ({col}, {row}) out of bounds for {}x{} window",
            self.current_cols,
            self.current_rows
        );
    }
}

/// The blank placeholder buffer: zero dimensions, no pixels.
///
/// Unusable until replaced by a loaded or constructed buffer — every
/// accessor panics on it. Exists so holder types can start empty.
impl Default for PixelBuffer {
    fn default() -> Self {
        Self {
            magic: "P3".into(),
            base_cols: 0,
            base_rows: 0,
            current_cols: 0,
            current_rows: 0,
            max_value: 0,
            pixels: Vec::new(),
        }
    }
}
