//! On-disk container: a little-endian header, the quadtree decision bits
//! packed into `u32` words, and the packed domain table.

use std::io::{Read, Write};

use pifs_bitstream::BitSink;

use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::CompressorSettings;

pub(crate) const MAGIC: [u8; 4] = *b"icf ";

/// Header size in bytes: four `u32` fields plus the packed settings.
pub(crate) const HEADER_SIZE: usize = 24;

#[derive(Debug, Copy, Clone)]
pub(crate) struct Header {
    pub image_size: u32,
    pub quadtree_bits: u32,
    pub num_domains: u32,
    pub settings: CompressorSettings,
}

impl Header {
    pub(crate) fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&MAGIC);
        buf[4..8].copy_from_slice(&self.image_size.to_le_bytes());
        buf[8..12].copy_from_slice(&self.quadtree_bits.to_le_bytes());
        buf[12..16].copy_from_slice(&self.num_domains.to_le_bytes());
        buf[16..20].copy_from_slice(&self.settings.mse_multiplier.to_le_bytes());
        buf[20] = self.settings.min_range;
        buf[21] = self.settings.max_range;
        // flags and padding stay zero
        writer.write_all(&buf)?;
        Ok(())
    }

    pub(crate) fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        reader.read_exact(&mut buf)?;

        if buf[0..4] != MAGIC {
            return Err(Error::CorruptFile("bad magic"));
        }

        let image_size = u32::from_le_bytes(buf[4..8].try_into().unwrap());
        let quadtree_bits = u32::from_le_bytes(buf[8..12].try_into().unwrap());
        let num_domains = u32::from_le_bytes(buf[12..16].try_into().unwrap());
        let settings = CompressorSettings {
            mse_multiplier: f32::from_le_bytes(buf[16..20].try_into().unwrap()),
            min_range: buf[20],
            max_range: buf[21],
        };

        if !image_size.is_power_of_two() {
            return Err(Error::CorruptFile("image size is not a power of two"));
        }
        if num_domains == 0 {
            return Err(Error::CorruptFile("no domain records"));
        }
        if settings.min_range <= 2 {
            return Err(Error::CorruptFile("minimum range size too small"));
        }
        if settings.max_range < settings.min_range {
            return Err(Error::CorruptFile("range size bounds are inverted"));
        }
        if settings.max_range as u32 > image_size {
            return Err(Error::CorruptFile("root range larger than the image"));
        }

        Ok(Self {
            image_size,
            quadtree_bits,
            num_domains,
            settings,
        })
    }
}

pub(crate) fn write_payload<W: Write>(
    writer: &mut W,
    code: &BitSink,
    domains: &[Domain],
) -> Result<()> {
    for word in code.words() {
        writer.write_all(&word.to_le_bytes())?;
    }
    for domain in domains {
        writer.write_all(&domain.to_le_bytes())?;
    }
    Ok(())
}

pub(crate) fn read_payload<R: Read>(
    reader: &mut R,
    header: &Header,
) -> Result<(BitSink, Vec<Domain>)> {
    let num_words = (header.quadtree_bits as usize).div_ceil(32);
    let code_bytes = read_exact_len(reader, num_words * 4)?;
    let words = code_bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes(chunk.try_into().unwrap()))
        .collect();
    let code = BitSink::from_words(words, header.quadtree_bits)
        .map_err(|_| Error::CorruptFile("quadtree bit count mismatch"))?;

    let domain_bytes = read_exact_len(reader, header.num_domains as usize * 4)?;
    let domains = domain_bytes
        .chunks_exact(4)
        .map(|chunk| Domain::from_le_bytes(chunk.try_into().unwrap()))
        .collect();

    Ok((code, domains))
}

/// Read exactly `len` bytes without trusting `len` for preallocation.
fn read_exact_len<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "payload shorter than declared",
        )));
    }
    Ok(bytes)
}
