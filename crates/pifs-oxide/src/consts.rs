//! Bit widths and quantization ranges of the packed domain record.

/// Bits per domain anchor coordinate; the anchor grid is `2^L × 2^L`.
pub const DOMAIN_LOCATION_BITS: u32 = 6;

/// Bits of the reserved domain-size field.
pub const DOMAIN_SIZE_BITS: u32 = 2;

/// Bits of the isometry selector.
pub const DOMAIN_TRANSFORM_BITS: u32 = 3;

/// Number of dihedral isometries a mapping can select.
pub const NUM_TRANSFORMS: u8 = 1 << DOMAIN_TRANSFORM_BITS;

/// Bits of the quantized brightness scale.
pub const DOMAIN_SCALE_BITS: u32 = 7;
pub const DOMAIN_SCALE_RANGE_BITS: u32 = 1;
/// Half-width of the representable scale range; scale lies in `[-R, +R)`.
pub const DOMAIN_SCALE_RANGE: i32 = 1 << (DOMAIN_SCALE_RANGE_BITS - 1);

/// Bits of the quantized brightness offset.
pub const DOMAIN_OFFSET_BITS: u32 = 7;
pub const DOMAIN_OFFSET_RANGE_BITS: u32 = 9;
/// Half-width of the representable offset range; offset lies in `[-R, +R)`.
pub const DOMAIN_OFFSET_RANGE: i32 = 1 << (DOMAIN_OFFSET_RANGE_BITS - 1);
