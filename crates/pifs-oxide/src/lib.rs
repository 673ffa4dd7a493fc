//! pifs-oxide is a fractal image codec built on a partitioned iterated
//! function system. The encoder approximates every range block of a square
//! power-of-two grayscale image with an affine mapping from a 2×-downsampled
//! domain block, subdividing ranges adaptively through a quadtree until the
//! mapping error falls under a threshold. The decoder replays the mapping set
//! against a ping-pong image pair; iterating the contractive mappings
//! converges to an attractor approximating the source image from any seed.
//!
//! # Compressing an image
//!
//! ```no_run
//! # fn main() -> pifs_oxide::Result<()> {
//! use pifs_oxide::{Compressor, CompressorSettings, Image};
//!
//! let image = Image::new(256); // or load pixels with Image::from_vec
//! let mut compressor = Compressor::new(CompressorSettings::default())?;
//! compressor.compress(&image)?;
//! compressor.save_to_file("encoded.icf")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Decompressing
//!
//! ```no_run
//! # fn main() -> pifs_oxide::Result<()> {
//! use pifs_oxide::Compressor;
//!
//! let compressor = Compressor::open("encoded.icf")?;
//! let image = compressor.decompress()?;
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Mutex;

pub mod consts;
mod container;
mod decode;
mod domain;
mod error;
mod quadtree;
mod search;
mod stats;
mod transform;

pub use domain::Domain;
pub use error::{Error, Result};
pub use pifs_grid::{Image, ImageDifference};
pub use pifs_threadpool::PifsThreadPool;
pub use stats::DomainsStats;
pub use transform::transform_location;

use consts::DOMAIN_LOCATION_BITS;
use container::{Header, HEADER_SIZE};
use decode::RangeDecoder;
use pifs_bitstream::BitSink;
use quadtree::RangeEncoder;

/// Number of decoder iterations used by [`Compressor::decompress`].
pub const DEFAULT_ITERATIONS: u32 = 100;

/// Encoder tunables, embedded verbatim in the compressed file.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CompressorSettings {
    /// MSE threshold at the root partition level. Higher values tolerate more
    /// error before subdividing, producing smaller output.
    pub mse_multiplier: f32,
    /// Minimum range block side; the quadtree never splits below this.
    pub min_range: u8,
    /// Root range block side.
    pub max_range: u8,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            mse_multiplier: 5.0,
            min_range: 4,
            max_range: 32,
        }
    }
}

impl CompressorSettings {
    fn validate(&self) -> Result<()> {
        if self.min_range <= 2 || !self.min_range.is_power_of_two() {
            return Err(Error::InputRejected(
                "minimum range size must be a power of two greater than 2",
            ));
        }
        if !self.max_range.is_power_of_two() {
            return Err(Error::InputRejected(
                "maximum range size must be a power of two",
            ));
        }
        if self.max_range < self.min_range {
            return Err(Error::InputRejected(
                "maximum range size is smaller than the minimum",
            ));
        }
        Ok(())
    }
}

/// Fractal codec state: the quadtree code and domain list of one encoded
/// image, together with the settings that produced them.
#[derive(Debug, Clone)]
pub struct Compressor {
    settings: CompressorSettings,
    size: u32,
    size_bits: u32,
    quadtree: BitSink,
    domains: Vec<Domain>,
}

impl Compressor {
    /// Create an empty compressor with validated settings.
    pub fn new(settings: CompressorSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            size: 0,
            size_bits: 0,
            quadtree: BitSink::new(),
            domains: Vec::new(),
        })
    }

    /// Encode `image` on a default-sized worker pool.
    pub fn compress(&mut self, image: &Image) -> Result<()> {
        self.compress_with_pool(image, &PifsThreadPool::default())
    }

    /// Encode `image`, sharding the root range grid into contiguous row bands
    /// across the pool's workers.
    ///
    /// Each worker owns a private bitstream and domain list; the bands are
    /// concatenated in worker order afterwards, so the output is byte-identical
    /// to a serial encode regardless of the worker count. Remainder rows that
    /// do not divide evenly go to the last worker.
    pub fn compress_with_pool(&mut self, image: &Image, pool: &PifsThreadPool) -> Result<()> {
        let max_range = self.settings.max_range as u32;
        if image.size() < max_range {
            return Err(Error::InputRejected("image is smaller than the root range"));
        }

        let size = image.size();
        let ranges_per_row = size / max_range;
        let num_workers = ranges_per_row.min(pool.num_workers() as u32).max(1);
        let rows_per_worker = ranges_per_row / num_workers;
        let total_blocks = ranges_per_row * ranges_per_row;

        tracing::debug!(size, num_workers, total_blocks, "starting compression");

        let settings = self.settings;
        let progress = Mutex::new(0u32);
        let mut bands: Vec<(BitSink, Vec<Domain>)> = Vec::new();
        bands.resize_with(num_workers as usize, Default::default);

        pool.for_each_slot(&mut bands, |worker_index, band| {
            let worker_index = worker_index as u32;
            let row_begin = rows_per_worker * worker_index;
            let row_end = if worker_index == num_workers - 1 {
                ranges_per_row
            } else {
                row_begin + rows_per_worker
            };

            let (code, domains) = band;
            let mut encoder = RangeEncoder::new(
                image,
                settings.min_range as u32,
                max_range,
                code,
                domains,
            );
            for row in row_begin..row_end {
                let ry0 = row * max_range;
                for rx0 in (0..size).step_by(max_range as usize) {
                    encoder.encode_root(rx0, ry0, max_range, settings.mse_multiplier);

                    let mut finished = progress.lock().unwrap();
                    *finished += 1;
                    tracing::trace!(
                        finished = *finished,
                        total = total_blocks,
                        "root range encoded"
                    );
                }
            }
        });

        self.size = size;
        self.size_bits = image.size_bits();
        self.quadtree.clear();
        self.domains.clear();
        for (code, domains) in &bands {
            self.quadtree.append(code);
            self.domains.extend_from_slice(domains);
        }

        tracing::debug!(
            num_domains = self.domains.len(),
            quadtree_bits = self.quadtree.len(),
            compressed_bytes = self.compressed_size(),
            bits_per_pixel = self.bits_per_pixel(),
            "compression finished"
        );
        tracing::debug!(stats = ?self.domain_stats(), "domain statistics");
        Ok(())
    }

    /// Reconstruct the image with the default iteration budget.
    pub fn decompress(&self) -> Result<Image> {
        self.decompress_with_iterations(DEFAULT_ITERATIONS)
    }

    /// Reconstruct the image by replaying the mapping set `iterations` times
    /// over a ping-pong image pair seeded with zeros.
    ///
    /// There is no convergence check; the fixed iteration budget is the
    /// guarantee. The first iteration validates that the quadtree walk
    /// consumes the bitstream and domain list exactly.
    pub fn decompress_with_iterations(&self, iterations: u32) -> Result<Image> {
        if self.domains.is_empty() {
            return Err(Error::Empty);
        }

        let max_range = self.settings.max_range as u32;
        let min_range = self.settings.min_range as u32;
        let step_shift = self.size_bits.saturating_sub(DOMAIN_LOCATION_BITS);

        let mut images = [Image::new(self.size), Image::new(self.size)];
        for i in 0..iterations {
            let (left, right) = images.split_at_mut(1);
            let (src, dst) = if i % 2 == 0 {
                (&left[0], &mut right[0])
            } else {
                (&right[0], &mut left[0])
            };

            let mut decoder = RangeDecoder::new(
                src,
                dst,
                self.quadtree.cursor(),
                &self.domains,
                min_range,
                step_shift,
            );
            for ry0 in (0..self.size).step_by(max_range as usize) {
                for rx0 in (0..self.size).step_by(max_range as usize) {
                    decoder.decode_range(rx0, ry0, max_range)?;
                }
            }
            if i == 0 {
                decoder.finish()?;
            }
        }

        let [first, second] = images;
        Ok(if iterations % 2 == 0 { first } else { second })
    }

    /// Write the header, quadtree code, and domain table.
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.domains.is_empty() {
            return Err(Error::Empty);
        }

        let header = Header {
            image_size: self.size,
            quadtree_bits: self.quadtree.len(),
            num_domains: self.domains.len() as u32,
            settings: self.settings,
        };
        header.write_to(writer)?;
        container::write_payload(writer, &self.quadtree, &self.domains)
    }

    /// Save to a file at `path`.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Load a compressed image, validating the header.
    pub fn load<R: Read>(reader: &mut R) -> Result<Self> {
        let header = Header::read_from(reader)?;
        let (quadtree, domains) = container::read_payload(reader, &header)?;
        Ok(Self {
            settings: header.settings,
            size: header.image_size,
            size_bits: header.image_size.trailing_zeros(),
            quadtree,
            domains,
        })
    }

    /// Load a compressed image from a file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::load(&mut reader)
    }

    /// Side length of the encoded image, zero before any encode or load.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn settings(&self) -> &CompressorSettings {
        &self.settings
    }

    /// Number of leaf mappings.
    #[inline]
    pub fn num_domains(&self) -> usize {
        self.domains.len()
    }

    /// Exact bit count of the quadtree code.
    #[inline]
    pub fn quadtree_bits(&self) -> u32 {
        self.quadtree.len()
    }

    /// Total encoded size in bytes, header included.
    pub fn compressed_size(&self) -> usize {
        HEADER_SIZE + self.quadtree.words().len() * 4 + self.domains.len() * 4
    }

    /// Encoded bits per source pixel.
    pub fn bits_per_pixel(&self) -> f32 {
        (self.compressed_size() * 8) as f32 / (self.size as f32 * self.size as f32)
    }

    /// Statistics over the encoded domain list.
    pub fn domain_stats(&self) -> DomainsStats {
        stats::calculate_stats(&self.domains)
    }
}
