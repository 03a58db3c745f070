//! Plain-text PPM (P3-style) codec.
//!
//! Layout on disk:
//!
//! ```text
//! <magic>
//! <cols> <rows>
//! <max_value>
//! <r g b> <r g b> ...   one text line per pixel row
//! ```
//!
//! The read path is tolerant in two documented ways: it accepts one stray
//! token between the magic number and the dimensions (some converters emit
//! an extra line there), and it accepts a pixel stream that ends early, in
//! which case the remaining pixels stay black. The write path is strict and
//! emits exactly the logical window.
//!
//! Decoding works on in-memory strings; [`PixelBuffer::load`] and
//! [`PixelBuffer::write`] are the file-backed wrappers.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use rgb::Rgb;

use crate::buffer::{HostAlloc, Pixel, PixelAlloc, PixelBuffer};
use crate::error::{Error, FormatError};

impl PixelBuffer {
    /// Load a PPM file from `path`.
    ///
    /// Fails with [`Error::Io`] if the file cannot be read and
    /// [`Error::Format`] if the header is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::load_with(path, &HostAlloc)
    }

    /// Like [`load`](Self::load), with an explicit allocation strategy.
    pub fn load_with(path: impl AsRef<Path>, alloc: &dyn PixelAlloc) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let buf = Self::decode_with(&text, alloc)?;
        debug!(
            "loaded {} {}x{} from {}",
            buf.magic(),
            buf.width(),
            buf.height(),
            path.display()
        );
        Ok(buf)
    }

    /// Decode a PPM document from an in-memory string.
    ///
    /// Tokens are split on arbitrary whitespace, so irregular spacing and
    /// line breaks are accepted anywhere. A pixel stream shorter than
    /// `cols * rows` triples is *not* an error: the unfilled remainder stays
    /// black. That matches lenient producers this format has to interoperate
    /// with, and is logged at `warn` level.
    pub fn decode(text: &str) -> Result<Self, FormatError> {
        Self::decode_with(text, &HostAlloc)
    }

    /// Like [`decode`](Self::decode), with an explicit allocation strategy.
    pub fn decode_with(text: &str, alloc: &dyn PixelAlloc) -> Result<Self, FormatError> {
        let mut tokens = text.split_ascii_whitespace();

        let magic = tokens.next().ok_or(FormatError::MissingMagic)?;
        let (cols, rows) = parse_dimensions(&mut tokens)?;
        if cols < 1 || rows < 1 {
            return Err(FormatError::DimensionTooSmall { cols, rows });
        }
        let max_value: u16 = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or(FormatError::BadMaxValue)?;

        let total = cols as usize * rows as usize;
        let mut pixels = alloc.allocate(total);
        assert_eq!(
            pixels.len(),
            total,
            "allocation strategy returned a wrong-sized buffer"
        );

        let mut filled = 0;
        while filled < total {
            let Some(px) = next_triple(&mut tokens) else {
                break;
            };
            pixels[filled] = px;
            filled += 1;
        }
        if filled < total {
            warn!("pixel stream ended after {filled} of {total} pixels; remainder left black");
        }

        Ok(Self::from_raw(magic.to_owned(), cols, rows, max_value, pixels))
    }

    /// Serialize the logical window as a PPM document.
    ///
    /// Emits the preserved magic tag and max value, the *current* dimensions,
    /// and exactly `width() * height()` triples — physical pixels outside the
    /// window are never written. This is how a logical cut becomes observable
    /// in the persisted file.
    pub fn encode(&self) -> String {
        // Rough reservation: 8-bit channel values need about 12 bytes per
        // pixel. Under-reserving only costs a growth step.
        let mut out =
            String::with_capacity(32 + self.width() as usize * self.height() as usize * 12);
        out.push_str(self.magic());
        out.push('\n');
        out.push_str(&format!("{} {}\n", self.width(), self.height()));
        out.push_str(&format!("{}\n", self.max_value()));

        for row in self.as_view().rows() {
            let mut first = true;
            for px in row {
                if !first {
                    out.push(' ');
                }
                out.push_str(&format!("{} {} {}", px.r, px.g, px.b));
                first = false;
            }
            out.push('\n');
        }
        out
    }

    /// Write the logical window to `path` as a PPM file.
    ///
    /// Fails with [`Error::Io`] if the destination cannot be created or a
    /// write fails partway.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        fs::write(path, self.encode())?;
        debug!(
            "wrote {} {}x{} to {}",
            self.magic(),
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }
}

/// Parse `(cols, rows)` from the tokens after the magic number.
///
/// Some producers insert a stray comment line between the magic number and
/// the dimensions. If the first two tokens are not both integers, skip one
/// token and retry once before giving up.
fn parse_dimensions<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Result<(u32, u32), FormatError> {
    let first = tokens.next().ok_or(FormatError::BadDimensions)?;
    let second = tokens.next().ok_or(FormatError::BadDimensions)?;
    match (first.parse::<u32>(), second.parse::<u32>()) {
        (Ok(cols), Ok(rows)) => Ok((cols, rows)),
        _ => match (second.parse::<u32>(), tokens.next().map(|t| t.parse::<u32>())) {
            (Ok(cols), Some(Ok(rows))) => Ok((cols, rows)),
            _ => Err(FormatError::BadDimensions),
        },
    }
}

/// Next `r g b` triple, or `None` when the stream ends or a token is not a
/// channel value. Either way the pixel stream is over.
fn next_triple<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<Pixel> {
    let r = tokens.next()?.parse().ok()?;
    let g = tokens.next()?.parse().ok()?;
    let b = tokens.next()?.parse().ok()?;
    Some(Rgb { r, g, b })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3 columns, 4 rows, distinct channel values per pixel.
    const THREE_BY_FOUR: &str = "P3\n3 4\n255\n\
        10 11 12 20 21 22 30 31 32\n\
        40 41 42 50 51 52 60 61 62\n\
        70 71 72 80 81 82 90 91 92\n\
        100 101 102 110 111 112 120 121 122\n";

    #[test]
    fn decode_basic() {
        let buf = PixelBuffer::decode(THREE_BY_FOUR).unwrap();
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 4);
        assert_eq!(buf.max_value(), 255);
        assert_eq!(buf.magic(), "P3");
        assert_eq!(buf.get_pixel(0, 0), Rgb { r: 10, g: 11, b: 12 });
        assert_eq!(buf.get_pixel(2, 3), Rgb { r: 120, g: 121, b: 122 });
    }

    #[test]
    fn decode_irregular_whitespace() {
        let buf = PixelBuffer::decode("P3   2  1\n\n\t255 1 2 3\n4 5 6").unwrap();
        assert_eq!(buf.width(), 2);
        assert_eq!(buf.get_pixel(1, 0), Rgb { r: 4, g: 5, b: 6 });
    }

    #[test]
    fn decode_skips_one_stray_token() {
        let buf = PixelBuffer::decode("P3\n*ImageMagick*\n2 1\n255\n1 2 3 4 5 6\n").unwrap();
        assert_eq!(buf.width(), 2);
        assert_eq!(buf.height(), 1);
        assert_eq!(buf.get_pixel(0, 0), Rgb { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn decode_two_stray_tokens_fails() {
        let err = PixelBuffer::decode("P3\nstray stray\n2 1\n255\n1 2 3 4 5 6\n").unwrap_err();
        assert_eq!(err, FormatError::BadDimensions);
    }

    #[test]
    fn decode_empty_input() {
        assert_eq!(
            PixelBuffer::decode("").unwrap_err(),
            FormatError::MissingMagic
        );
    }

    #[test]
    fn decode_truncated_header() {
        assert_eq!(
            PixelBuffer::decode("P3\n3").unwrap_err(),
            FormatError::BadDimensions
        );
        assert_eq!(
            PixelBuffer::decode("P3\n3 4\n").unwrap_err(),
            FormatError::BadMaxValue
        );
    }

    #[test]
    fn decode_zero_dimension() {
        assert_eq!(
            PixelBuffer::decode("P3\n0 4\n255\n").unwrap_err(),
            FormatError::DimensionTooSmall { cols: 0, rows: 4 }
        );
    }

    #[test]
    fn decode_short_pixel_stream_fills_black() {
        let buf = PixelBuffer::decode("P3\n2 2\n255\n9 9 9\n").unwrap();
        assert_eq!(buf.get_pixel(0, 0), Rgb { r: 9, g: 9, b: 9 });
        assert_eq!(buf.get_pixel(1, 1), Rgb { r: 0, g: 0, b: 0 });
    }

    #[test]
    fn decode_stops_at_garbage_pixel_token() {
        let buf = PixelBuffer::decode("P3\n2 1\n255\n9 9 9 oops 1 2\n").unwrap();
        assert_eq!(buf.get_pixel(0, 0), Rgb { r: 9, g: 9, b: 9 });
        assert_eq!(buf.get_pixel(1, 0), Rgb { r: 0, g: 0, b: 0 });
    }

    #[test]
    fn decode_ignores_extra_pixels() {
        let buf = PixelBuffer::decode("P3\n1 1\n255\n1 2 3 4 5 6 7 8 9\n").unwrap();
        assert_eq!(buf.width(), 1);
        assert_eq!(buf.get_pixel(0, 0), Rgb { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn header_preserved_verbatim() {
        let buf = PixelBuffer::decode("P6\n1 1\n1023\n1 2 3\n").unwrap();
        assert_eq!(buf.magic(), "P6");
        assert_eq!(buf.max_value(), 1023);
        let text = buf.encode();
        assert!(text.starts_with("P6\n1 1\n1023\n"));
    }

    #[test]
    fn encode_round_trips() {
        let buf = PixelBuffer::decode(THREE_BY_FOUR).unwrap();
        let again = PixelBuffer::decode(&buf.encode()).unwrap();
        assert_eq!(again, buf);
    }

    #[test]
    fn encode_emits_logical_window_only() {
        let mut buf = PixelBuffer::decode(THREE_BY_FOUR).unwrap();
        buf.cut_column();
        buf.cut_row();
        buf.cut_row();

        let text = buf.encode();
        assert!(text.starts_with("P3\n2 2\n255\n"));
        let triples = text
            .lines()
            .skip(3)
            .flat_map(str::split_ascii_whitespace)
            .count();
        assert_eq!(triples, 2 * 2 * 3);
        // One text line per logical row.
        assert_eq!(text.lines().count(), 3 + 2);
    }

    #[test]
    fn cut_then_round_trip_matches_original() {
        let original = PixelBuffer::decode(THREE_BY_FOUR).unwrap();

        let mut buf = original.clone();
        buf.set_pixel(0, 0, Rgb { r: 0, g: 0, b: 0 });
        buf.cut_column();
        buf.cut_row();
        buf.cut_row();

        let reloaded = PixelBuffer::decode(&buf.encode()).unwrap();
        assert_eq!(reloaded.width(), 2);
        assert_eq!(reloaded.height(), 2);
        assert_eq!(reloaded.get_pixel(0, 0), Rgb { r: 0, g: 0, b: 0 });
        // Unmodified pixels are unaffected by the resize.
        assert_eq!(reloaded.get_pixel(1, 0), original.get_pixel(1, 0));
    }

    #[test]
    fn decode_with_custom_alloc() {
        struct Tracing(std::cell::Cell<bool>);
        impl PixelAlloc for Tracing {
            fn allocate(&self, len: usize) -> Vec<Pixel> {
                self.0.set(true);
                vec![Rgb { r: 0, g: 0, b: 0 }; len]
            }
        }
        let alloc = Tracing(std::cell::Cell::new(false));
        let buf = PixelBuffer::decode_with(THREE_BY_FOUR, &alloc).unwrap();
        assert!(alloc.0.get());
        assert_eq!(buf.width(), 3);
    }
}
