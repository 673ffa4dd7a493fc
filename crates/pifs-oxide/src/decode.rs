//! Quadtree replay: walk the decision bits for every root range, consume leaf
//! mappings in emission order, and paint each range from the previous
//! iteration's image.

use pifs_bitstream::BitCursor;
use pifs_grid::Image;

use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::transform::transform_location;

pub(crate) struct RangeDecoder<'a> {
    src: &'a Image,
    dst: &'a mut Image,
    cursor: BitCursor<'a>,
    domains: &'a [Domain],
    domain_index: usize,
    min_range: u32,
    step_shift: u32,
}

impl<'a> RangeDecoder<'a> {
    pub(crate) fn new(
        src: &'a Image,
        dst: &'a mut Image,
        cursor: BitCursor<'a>,
        domains: &'a [Domain],
        min_range: u32,
        step_shift: u32,
    ) -> Self {
        Self {
            src,
            dst,
            cursor,
            domains,
            domain_index: 0,
            min_range,
            step_shift,
        }
    }

    /// Replay one root range block.
    pub(crate) fn decode_range(&mut self, rx0: u32, ry0: u32, range_size: u32) -> Result<()> {
        // a decision bit exists exactly where the encoder could have split
        let subdivide = if range_size > self.min_range {
            self.cursor
                .read_bit()
                .map_err(|_| Error::CorruptFile("quadtree code exhausted"))?
        } else {
            false
        };

        if subdivide {
            let half = range_size / 2;
            self.decode_range(rx0, ry0, half)?;
            self.decode_range(rx0 + half, ry0, half)?;
            self.decode_range(rx0, ry0 + half, half)?;
            self.decode_range(rx0 + half, ry0 + half, half)?;
            return Ok(());
        }

        let domain = *self
            .domains
            .get(self.domain_index)
            .ok_or(Error::CorruptFile("domain list exhausted"))?;
        self.domain_index += 1;

        let dx_base = domain.x() << self.step_shift;
        let dy_base = domain.y() << self.step_shift;
        for y in 0..range_size {
            for x in 0..range_size {
                let (tx, ty) = transform_location(range_size, x, y, domain.transform());
                let pixel = self.src.sample_domain(dx_base + 2 * tx, dy_base + 2 * ty);
                self.dst
                    .write(rx0 + x, ry0 + y, domain.transform_color(pixel));
            }
        }
        Ok(())
    }

    /// Verify the replay consumed the whole payload.
    pub(crate) fn finish(self) -> Result<()> {
        if self.cursor.remaining() != 0 {
            return Err(Error::CorruptFile("trailing quadtree bits"));
        }
        if self.domain_index != self.domains.len() {
            return Err(Error::CorruptFile("trailing domain records"));
        }
        Ok(())
    }
}
