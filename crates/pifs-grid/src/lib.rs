//! This crate provides [`Image`], the square grayscale sample buffer used by the
//! fractal codec, along with whole-image helpers built on top of it.
//!
//! The side length of an [`Image`] is always a power of two, so the wrapping
//! samplers can mask coordinates instead of taking a modulo. The 2×2 box-filter
//! sampler [`Image::sample_domain`] is the single primitive through which the
//! codec reads the domain side of every mapping; encoder and decoder must agree
//! on its output bit-for-bit.

/// Result of comparing two images of the same size.
#[derive(Debug, Copy, Clone)]
pub struct ImageDifference {
    /// Mean squared error over all pixels.
    pub average_error: f32,
    /// Largest absolute per-pixel difference.
    pub max_error: u32,
    /// Peak signal-to-noise ratio in decibels, `f32::INFINITY` for identical images.
    pub psnr: f32,
}

/// A square single-channel pixel buffer in raster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    size: u32,
    size_bits: u32,
    size_mask: u32,
    buf: Vec<u8>,
}

impl Image {
    /// Create a zero-filled image.
    ///
    /// # Panics
    /// Panics if `size` is not a power of two.
    pub fn new(size: u32) -> Self {
        assert!(size.is_power_of_two());
        Self {
            size,
            size_bits: size.trailing_zeros(),
            size_mask: size - 1,
            buf: vec![0u8; (size * size) as usize],
        }
    }

    /// Create an image from an existing raster-order buffer.
    ///
    /// # Panics
    /// Panics if `size` is not a power of two or `buf.len() != size * size`.
    pub fn from_vec(size: u32, buf: Vec<u8>) -> Self {
        assert!(size.is_power_of_two());
        assert_eq!(buf.len(), (size * size) as usize);
        Self {
            size,
            size_bits: size.trailing_zeros(),
            size_mask: size - 1,
            buf,
        }
    }

    /// Reshape the image and reset every pixel to zero.
    ///
    /// # Panics
    /// Panics if `size` is not a power of two.
    pub fn resize(&mut self, size: u32) {
        assert!(size.is_power_of_two());
        self.size = size;
        self.size_bits = size.trailing_zeros();
        self.size_mask = size - 1;
        self.buf.clear();
        self.buf.resize((size * size) as usize, 0);
    }

    /// Side length in pixels.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// `log2` of the side length.
    #[inline]
    pub fn size_bits(&self) -> u32 {
        self.size_bits
    }

    /// Coordinate wrap mask, `size - 1`.
    #[inline]
    pub fn size_mask(&self) -> u32 {
        self.size_mask
    }

    /// Get the immutable slice to the underlying buffer.
    #[inline]
    pub fn buf(&self) -> &[u8] {
        &self.buf
    }

    /// Get the mutable slice to the underlying buffer.
    #[inline]
    pub fn buf_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Read the pixel at `(x, y)`. Coordinates must be in bounds.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> u8 {
        self.buf[(y * self.size + x) as usize]
    }

    /// Read the pixel at `(x mod size, y mod size)`.
    #[inline]
    pub fn sample_wrapped(&self, x: u32, y: u32) -> u8 {
        let x = x & self.size_mask;
        let y = y & self.size_mask;
        self.buf[(y * self.size + x) as usize]
    }

    /// Box-filtered 2×2 read with wrap-around.
    ///
    /// The `+ 1` bias before the truncating division rounds to nearest; the
    /// codec depends on this value bit-for-bit on both sides.
    #[inline]
    pub fn sample_domain(&self, x: u32, y: u32) -> u8 {
        let xa = x & self.size_mask;
        let xb = (x + 1) & self.size_mask;
        let ya = y & self.size_mask;
        let yb = (y + 1) & self.size_mask;

        let sum = self.buf[(ya * self.size + xa) as usize] as u32
            + self.buf[(ya * self.size + xb) as usize] as u32
            + self.buf[(yb * self.size + xa) as usize] as u32
            + self.buf[(yb * self.size + xb) as usize] as u32
            + 1;
        (sum / 4) as u8
    }

    /// Set the pixel at `(x, y)`. Coordinates must be in bounds.
    #[inline]
    pub fn write(&mut self, x: u32, y: u32, value: u8) {
        self.buf[(y * self.size + x) as usize] = value;
    }

    /// Create a 2× downsampled copy using the box-filter sampler.
    pub fn downsample(&self) -> Image {
        let mut result = Image::new(self.size / 2);
        for y in (0..self.size).step_by(2) {
            for x in (0..self.size).step_by(2) {
                result.write(x / 2, y / 2, self.sample_domain(x, y));
            }
        }
        result
    }

    /// Create a 2× nearest-neighbor upsampled copy.
    pub fn upsample(&self) -> Image {
        let mut result = Image::new(self.size * 2);
        for y in 0..self.size {
            for x in 0..self.size {
                let v = self.sample(x, y);
                result.write(2 * x, 2 * y, v);
                result.write(2 * x + 1, 2 * y, v);
                result.write(2 * x, 2 * y + 1, v);
                result.write(2 * x + 1, 2 * y + 1, v);
            }
        }
        result
    }

    /// Compare two images of the same size.
    ///
    /// # Panics
    /// Panics if the images differ in size.
    pub fn compare(a: &Image, b: &Image) -> ImageDifference {
        assert_eq!(a.size, b.size);

        let mut total_error = 0u64;
        let mut max_error = 0u32;
        for (&pa, &pb) in a.buf.iter().zip(&b.buf) {
            let diff = (pa as i32 - pb as i32).unsigned_abs();
            total_error += (diff * diff) as u64;
            max_error = max_error.max(diff);
        }

        let num_pixels = (a.size * a.size) as f32;
        let average_error = total_error as f32 / num_pixels;
        let psnr = if total_error == 0 {
            f32::INFINITY
        } else {
            10.0 * (255.0f32 * 255.0 / average_error).log10()
        };
        ImageDifference {
            average_error,
            max_error,
            psnr,
        }
    }
}
