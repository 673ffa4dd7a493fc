use pifs_oxide::Compressor;

use crate::commands::DecompressArgs;
use crate::{output, Result};

pub fn handle_decompress(args: DecompressArgs) -> Result<()> {
    let compressor = Compressor::open(&args.input)?;
    tracing::info!(
        size = compressor.size(),
        num_domains = compressor.num_domains(),
        "compressed image loaded"
    );

    let image = match args.iterations {
        Some(iterations) => compressor.decompress_with_iterations(iterations)?,
        None => compressor.decompress()?,
    };
    output::write_grayscale(&args.output, &image)?;
    Ok(())
}
