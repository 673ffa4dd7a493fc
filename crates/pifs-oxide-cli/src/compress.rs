use pifs_oxide::{Compressor, CompressorSettings, Image, PifsThreadPool};

use crate::commands::CompressArgs;
use crate::{output, Result};

pub fn handle_compress(args: CompressArgs) -> Result<()> {
    let image = output::load_grayscale(&args.input)?;
    tracing::info!(size = image.size(), "image loaded");

    let settings = CompressorSettings {
        mse_multiplier: args.threshold,
        min_range: args.min_range,
        max_range: args.max_range,
    };
    let mut compressor = Compressor::new(settings)?;

    let pool = match args.threads {
        Some(threads) => PifsThreadPool::with_threads(threads),
        None => PifsThreadPool::default(),
    };
    compressor.compress_with_pool(&image, &pool)?;
    compressor.save_to_file(&args.output)?;

    tracing::info!(
        num_domains = compressor.num_domains(),
        quadtree_bits = compressor.quadtree_bits(),
        compressed_bytes = compressor.compressed_size(),
        bits_per_pixel = compressor.bits_per_pixel(),
        "encoded"
    );

    if args.verify {
        let decoded = compressor.decompress()?;
        let diff = Image::compare(&image, &decoded);
        tracing::info!(
            mse = diff.average_error,
            psnr = diff.psnr,
            max_error = diff.max_error,
            "round-trip error"
        );
    }

    Ok(())
}
