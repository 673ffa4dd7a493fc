use crate::consts::*;

const SIZE_SHIFT: u32 = 0;
const X_SHIFT: u32 = SIZE_SHIFT + DOMAIN_SIZE_BITS;
const Y_SHIFT: u32 = X_SHIFT + DOMAIN_LOCATION_BITS;
const TRANSFORM_SHIFT: u32 = Y_SHIFT + DOMAIN_LOCATION_BITS;
const OFFSET_SHIFT: u32 = TRANSFORM_SHIFT + DOMAIN_TRANSFORM_BITS;
const SCALE_SHIFT: u32 = OFFSET_SHIFT + DOMAIN_OFFSET_BITS;

// The packed fields must fit a single 32-bit word; any bits above the scale
// field stay reserved-zero.
const _: () = assert!(SCALE_SHIFT + DOMAIN_SCALE_BITS <= 32);

#[inline]
const fn field_mask(bits: u32) -> u32 {
    (1u32 << bits) - 1
}

/// A domain-to-range mapping, bit-packed into one 32-bit word.
///
/// This record is the unit of compressed image information: it names a domain
/// anchor in the coarse location grid, one of the eight dihedral isometries,
/// and the quantized brightness scale and offset that drive the IFS during
/// decompression. The in-memory word equals the little-endian on-disk
/// representation.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Domain(u32);

impl Domain {
    #[inline]
    fn field(self, shift: u32, bits: u32) -> u32 {
        (self.0 >> shift) & field_mask(bits)
    }

    #[inline]
    fn set_field(&mut self, shift: u32, bits: u32, value: u32) {
        debug_assert!(value <= field_mask(bits));
        self.0 = (self.0 & !(field_mask(bits) << shift)) | (value << shift);
    }

    /// Domain anchor column in the coarse location grid.
    #[inline]
    pub fn x(self) -> u32 {
        self.field(X_SHIFT, DOMAIN_LOCATION_BITS)
    }

    /// Domain anchor row in the coarse location grid.
    #[inline]
    pub fn y(self) -> u32 {
        self.field(Y_SHIFT, DOMAIN_LOCATION_BITS)
    }

    /// Isometry selector: bit 0 flips horizontally, bits 1-2 pick the rotation.
    #[inline]
    pub fn transform(self) -> u8 {
        self.field(TRANSFORM_SHIFT, DOMAIN_TRANSFORM_BITS) as u8
    }

    /// Raw quantized offset field.
    #[inline]
    pub fn quantized_offset(self) -> u32 {
        self.field(OFFSET_SHIFT, DOMAIN_OFFSET_BITS)
    }

    /// Raw quantized scale field.
    #[inline]
    pub fn quantized_scale(self) -> u32 {
        self.field(SCALE_SHIFT, DOMAIN_SCALE_BITS)
    }

    #[inline]
    pub fn set_x(&mut self, x: u32) {
        self.set_field(X_SHIFT, DOMAIN_LOCATION_BITS, x);
    }

    #[inline]
    pub fn set_y(&mut self, y: u32) {
        self.set_field(Y_SHIFT, DOMAIN_LOCATION_BITS, y);
    }

    #[inline]
    pub fn set_transform(&mut self, transform: u8) {
        self.set_field(TRANSFORM_SHIFT, DOMAIN_TRANSFORM_BITS, transform as u32);
    }

    /// Quantize and store a brightness offset, saturating to `[-256, +256)`.
    pub fn set_offset(&mut self, value: f32) {
        let max_value = field_mask(DOMAIN_OFFSET_BITS) as f32;
        let mut v = value / (DOMAIN_OFFSET_RANGE as f32 * 2.0);
        v += 0.5;
        v *= max_value;
        let q = (v + 0.5).clamp(0.0, max_value);
        self.set_field(OFFSET_SHIFT, DOMAIN_OFFSET_BITS, q as u32);
    }

    /// Quantize and store a brightness scale, saturating to `[-1, +1)`.
    pub fn set_scale(&mut self, value: f32) {
        let max_value = field_mask(DOMAIN_SCALE_BITS) as f32;
        let mut v = value / (DOMAIN_SCALE_RANGE as f32 * 2.0);
        v += 0.5;
        v *= max_value;
        let q = (v + 0.5).clamp(0.0, max_value);
        self.set_field(SCALE_SHIFT, DOMAIN_SCALE_BITS, q as u32);
    }

    /// Dequantized brightness offset.
    pub fn offset(self) -> f32 {
        let max_value = field_mask(DOMAIN_OFFSET_BITS) as f32;
        (self.quantized_offset() as f32 / max_value - 0.5) * (DOMAIN_OFFSET_RANGE as f32 * 2.0)
    }

    /// Dequantized brightness scale.
    pub fn scale(self) -> f32 {
        let max_value = field_mask(DOMAIN_SCALE_BITS) as f32;
        (self.quantized_scale() as f32 / max_value - 0.5) * (DOMAIN_SCALE_RANGE as f32 * 2.0)
    }

    /// Apply the quantized brightness mapping to one pixel.
    ///
    /// All arithmetic is 32-bit signed with a saturating clamp to `[0, 255]`.
    /// Encoder scoring and decoder playback both go through this function, so
    /// it must stay bit-exact.
    #[inline]
    pub fn transform_color(self, input: u8) -> u8 {
        let mut offset = self.quantized_offset() as i32;
        offset <<= DOMAIN_OFFSET_RANGE_BITS - DOMAIN_OFFSET_BITS;
        offset -= DOMAIN_OFFSET_RANGE;

        let scale = self.quantized_scale() as i32 - (1 << (DOMAIN_SCALE_BITS - 1));

        let val = ((scale * input as i32) >> (DOMAIN_SCALE_BITS - DOMAIN_SCALE_RANGE_BITS)) + offset;
        val.clamp(0, 255) as u8
    }

    /// On-disk little-endian representation.
    #[inline]
    pub fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub fn from_le_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_packing_round_trip() {
        let mut d = Domain::default();
        d.set_x(63);
        d.set_y(17);
        d.set_transform(5);
        d.set_offset(100.0);
        d.set_scale(0.75);

        assert_eq!(d.x(), 63);
        assert_eq!(d.y(), 17);
        assert_eq!(d.transform(), 5);

        let again = Domain::from_le_bytes(d.to_le_bytes());
        assert_eq!(again, d);
    }

    #[test]
    fn fields_do_not_clobber() {
        let mut d = Domain::default();
        d.set_offset(100.0);
        d.set_scale(0.75);
        let offset_q = d.quantized_offset();
        let scale_q = d.quantized_scale();

        d.set_x(41);
        d.set_y(2);
        d.set_transform(7);
        assert_eq!(d.quantized_offset(), offset_q);
        assert_eq!(d.quantized_scale(), scale_q);
        assert_eq!(d.x(), 41);
    }

    #[test]
    fn quantization_saturates() {
        let mut d = Domain::default();
        d.set_scale(-10.0);
        assert_eq!(d.quantized_scale(), 0);
        d.set_scale(10.0);
        assert_eq!(d.quantized_scale(), 127);

        d.set_offset(-1000.0);
        assert_eq!(d.quantized_offset(), 0);
        d.set_offset(1000.0);
        assert_eq!(d.quantized_offset(), 127);
    }

    #[test]
    fn quantization_error_is_bounded() {
        let mut d = Domain::default();
        for q in [-250.0f32, -100.0, -1.0, 0.0, 64.0, 255.0] {
            d.set_offset(q);
            // one offset step is 512 / 127
            assert!((d.offset() - q).abs() <= 512.0 / 127.0 / 2.0 + 1e-3);
        }
        for q in [-0.99f32, -0.5, 0.0, 0.33, 0.98] {
            d.set_scale(q);
            assert!((d.scale() - q).abs() <= 2.0 / 127.0 / 2.0 + 1e-5);
        }
    }

    #[test]
    fn color_transform_saturates() {
        let mut d = Domain::default();
        d.set_scale(-1.0);
        d.set_offset(-256.0);
        assert_eq!(d.transform_color(255), 0);

        d.set_scale(0.99);
        d.set_offset(255.0);
        assert_eq!(d.transform_color(255), 255);

        // every coefficient combination keeps the output in byte range
        for &(scale, offset) in &[(-1.0f32, -256.0f32), (-1.0, 255.0), (0.99, -256.0), (0.0, 0.0)] {
            d.set_scale(scale);
            d.set_offset(offset);
            for c in [0u8, 1, 127, 128, 254, 255] {
                let _ = d.transform_color(c);
            }
        }
    }

    #[test]
    fn identity_like_mapping() {
        // scale near +1, offset near 0 reproduces the input closely
        let mut d = Domain::default();
        d.set_scale(1.0);
        d.set_offset(0.0);
        for c in [0u8, 10, 100, 200, 255] {
            let out = d.transform_color(c);
            assert!(out.abs_diff(c) <= 8, "{c} mapped to {out}");
        }
    }

    #[test]
    fn zero_scale_is_constant() {
        let mut d = Domain::default();
        d.set_scale(0.0);
        d.set_offset(128.0);
        let v0 = d.transform_color(0);
        for c in 1..=255u8 {
            assert!(d.transform_color(c).abs_diff(v0) <= 2);
        }
    }
}
