/// Forward-map a position inside a range block under one of the eight
/// dihedral isometries.
///
/// Bit 0 of `transform` flips the X axis, bits 1-2 select one of four 90°
/// rotations. The map is a bijection on `[0, range_size)²`; encoder and
/// decoder must use the same function so the domain grid lands on the range
/// identically on both sides.
#[inline]
pub fn transform_location(range_size: u32, x: u32, y: u32, transform: u8) -> (u32, u32) {
    let m = range_size - 1;
    let x = if transform & 1 != 0 { m - x } else { x };

    match transform >> 1 {
        0 => (x, y),
        1 => (m - y, x),
        2 => (m - x, m - y),
        _ => (y, m - x),
    }
}
