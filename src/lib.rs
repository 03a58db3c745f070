//! Windowed pixel buffer and plain-PPM codec for seam-carving resizers.
//!
//! This crate is the storage substrate a seam-carving driver operates on:
//!
//! - [`PixelBuffer`] — owned pixel array with a shrinkable logical window
//! - [`PixelBuffer::load`] / [`PixelBuffer::write`] — P3-style ASCII PPM I/O
//! - [`PixelBuffer::cut_column`] / [`PixelBuffer::cut_row`] — O(1) shrink
//! - [`PixelAlloc`] / [`HostAlloc`] — pluggable pixel storage allocation
//! - [`Error`] / [`FormatError`] — load/write failures
//!
//! The seam-selection algorithm itself lives in the caller: it reads pixels
//! through the window accessors, compacts the seam it wants to remove to the
//! trailing column or row, and then asks the buffer to cut. Cutting never
//! moves or frees pixel data — writing the buffer back out persists only the
//! shrunken window.
//!
//! Pixels are [`rgb::Rgb<u16>`](rgb::Rgb); the logical window is also
//! exposed as stride-aware [`imgref`] views for interop with code that
//! consumes `ImgRef`.

#![forbid(unsafe_code)]

mod buffer;
mod error;
mod ppm;

pub use buffer::{HostAlloc, Pixel, PixelAlloc, PixelBuffer};
pub use error::{Error, FormatError};

// Re-exports for callers that name the underlying pixel/view types.
pub use imgref::{ImgRef, ImgRefMut};
pub use rgb::Rgb;
