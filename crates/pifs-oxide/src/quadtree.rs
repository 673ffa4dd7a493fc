//! Adaptive quadtree range partitioning: decide per range block whether its
//! best mapping is good enough, or whether the block splits into four
//! sub-ranges, emitting the decision bits and the leaf mappings in pre-order.

use pifs_bitstream::BitSink;
use pifs_grid::Image;

use crate::domain::Domain;
use crate::search::{domain_search, SearchScratch};

/// Threshold multiplier applied per subdivision level. Kept flat; the decoder
/// replay depends only on size comparisons, never on this value.
const ADAPTIVE_THRESHOLD_FACTOR: f32 = 1.0;

/// Per-worker encoder over one sequence of root range blocks.
pub(crate) struct RangeEncoder<'a> {
    image: &'a Image,
    min_range: u32,
    code: &'a mut BitSink,
    domains: &'a mut Vec<Domain>,
    scratch: SearchScratch,
}

impl<'a> RangeEncoder<'a> {
    pub(crate) fn new(
        image: &'a Image,
        min_range: u32,
        max_range: u32,
        code: &'a mut BitSink,
        domains: &'a mut Vec<Domain>,
    ) -> Self {
        Self {
            image,
            min_range,
            code,
            domains,
            scratch: SearchScratch::new(max_range),
        }
    }

    /// Encode the root range block at `(rx0, ry0)`.
    pub(crate) fn encode_root(&mut self, rx0: u32, ry0: u32, max_range: u32, threshold: f32) {
        self.encode_range(rx0, ry0, max_range, threshold);
    }

    fn encode_range(&mut self, rx0: u32, ry0: u32, range_size: u32, threshold: f32) {
        let (domain, mse) = domain_search(self.image, rx0, ry0, range_size, &mut self.scratch);

        let mut subdivide = false;
        if range_size > self.min_range {
            subdivide = mse > threshold;
            // the lowest level never writes a bit; the decoder mirrors this
            self.code.push(subdivide);
        }

        if subdivide {
            let half = range_size / 2;
            let sub_threshold = threshold * ADAPTIVE_THRESHOLD_FACTOR;
            self.encode_range(rx0, ry0, half, sub_threshold);
            self.encode_range(rx0 + half, ry0, half, sub_threshold);
            self.encode_range(rx0, ry0 + half, half, sub_threshold);
            self.encode_range(rx0 + half, ry0 + half, half, sub_threshold);
        } else {
            self.domains.push(domain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_single_root(
        image: &Image,
        min_range: u32,
        max_range: u32,
        threshold: f32,
    ) -> (BitSink, Vec<Domain>) {
        let mut code = BitSink::new();
        let mut domains = Vec::new();
        let mut encoder = RangeEncoder::new(image, min_range, max_range, &mut code, &mut domains);
        encoder.encode_root(0, 0, max_range, threshold);
        (code, domains)
    }

    #[test]
    fn accepting_threshold_keeps_root_whole() {
        let image = Image::from_vec(32, vec![90; 1024]);
        let (code, domains) = encode_single_root(&image, 8, 32, 1.0e6);
        // one decision bit for the root, no subdivision
        assert_eq!(code.len(), 1);
        assert!(!code.cursor().read_bit().unwrap());
        assert_eq!(domains.len(), 1);
    }

    #[test]
    fn zero_threshold_subdivides_to_min_range() {
        let size = 32u32;
        let mut image = Image::new(size);
        for y in 0..size {
            for x in 0..size {
                image.write(x, y, ((x * 31 + y * 17) % 256) as u8);
            }
        }
        let (code, domains) = encode_single_root(&image, 8, 32, -1.0);
        // full tree: 1 bit at 32, 4 at 16, none at the 8-pixel floor
        assert_eq!(code.len(), 5);
        assert_eq!(domains.len(), 16);
        let mut cursor = code.cursor();
        for _ in 0..5 {
            assert!(cursor.read_bit().unwrap());
        }
    }

    #[test]
    fn equal_min_and_max_emit_no_bits() {
        let image = Image::from_vec(16, vec![50; 256]);
        let (code, domains) = encode_single_root(&image, 16, 16, 1.0);
        assert_eq!(code.len(), 0);
        assert_eq!(domains.len(), 1);
    }

    #[test]
    fn leaf_count_matches_tree_shape() {
        // leaves = 1 + 3 * (number of subdivisions)
        let size = 64u32;
        let mut image = Image::new(size);
        for y in 0..size {
            for x in 0..size {
                image.write(x, y, (x * y % 256) as u8);
            }
        }
        let (code, domains) = encode_single_root(&image, 4, 64, 10.0);
        let mut cursor = code.cursor();
        let mut splits = 0u32;
        while let Ok(bit) = cursor.read_bit() {
            if bit {
                splits += 1;
            }
        }
        assert_eq!(domains.len() as u32, 1 + 3 * splits);
    }
}
