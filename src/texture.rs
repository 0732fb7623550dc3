//! Texture decoding and texel access.
//!
//! A [`Texture`] is a tightly packed RGBA8 buffer with top-left origin. The
//! decoder accepts any raster format the `image` crate understands (the demo
//! uses JPEG) and normalizes channel order and row layout on load, so the
//! rasterizer can assume exactly `width * height * 4` bytes in RGBA order.

use std::path::Path;

/// A 2D texture holding tightly packed RGBA8 pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Texture {
    /// Decode a texture from an image file (JPEG, PNG, ...).
    ///
    /// Ownership of the decoded buffer transfers to the returned texture.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            data: img.into_raw(),
        })
    }

    /// Wrap an existing RGBA8 buffer.
    ///
    /// Returns `None` unless `data` holds exactly `width * height * 4` bytes.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA8 bytes, row by row from the top-left corner.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Fetch the RGBA texel at pixel coordinates (x, y), clamping to the
    /// texture rectangle. No filtering.
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let index = (y * self.width as usize + x) * 4;
        [
            self.data[index],
            self.data[index + 1],
            self.data[index + 2],
            self.data[index + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba8_validates_buffer_size() {
        assert!(Texture::from_rgba8(2, 2, vec![0; 16]).is_some());
        assert!(Texture::from_rgba8(2, 2, vec![0; 15]).is_none());
        assert!(Texture::from_rgba8(0, 2, vec![]).is_none());
    }

    #[test]
    fn texel_indexes_row_major_from_top_left() {
        // 2x2: red, green / blue, white
        let data = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        let tex = Texture::from_rgba8(2, 2, data).unwrap();
        assert_eq!(tex.texel(0, 0), [255, 0, 0, 255]);
        assert_eq!(tex.texel(1, 0), [0, 255, 0, 255]);
        assert_eq!(tex.texel(0, 1), [0, 0, 255, 255]);
        assert_eq!(tex.texel(1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn texel_clamps_out_of_range_coordinates() {
        let tex = Texture::from_rgba8(1, 1, vec![9, 8, 7, 6]).unwrap();
        assert_eq!(tex.texel(5, 5), [9, 8, 7, 6]);
    }
}
