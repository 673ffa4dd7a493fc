//! PNG input and output for the codec's single-channel images.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use pifs_oxide::Image;

use crate::{Error, Result};

/// Load a PNG image as grayscale, reducing color input to luma.
pub(crate) fn load_grayscale(path: &Path) -> Result<Image> {
    let mut decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    if info.width != info.height {
        return Err(Error::Image("width and height must be equal"));
    }
    if !info.width.is_power_of_two() {
        return Err(Error::Image("image side must be a power of two"));
    }

    let gray = match info.color_type {
        png::ColorType::Grayscale => buf,
        png::ColorType::GrayscaleAlpha => buf.chunks_exact(2).map(|px| px[0]).collect(),
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .map(|px| pifs_color::rgb_to_ycbcr(px[0], px[1], px[2]).0)
            .collect(),
        png::ColorType::Rgba => buf
            .chunks_exact(4)
            .map(|px| pifs_color::rgb_to_ycbcr(px[0], px[1], px[2]).0)
            .collect(),
        _ => return Err(Error::Image("unsupported channel layout")),
    };

    Ok(Image::from_vec(info.width, gray))
}

/// Write a single-channel image as an 8-bit grayscale PNG.
pub(crate) fn write_grayscale(path: &Path, image: &Image) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.size(), image.size());
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.buf())?;
    writer.finish()?;
    Ok(())
}
