use pifs_oxide::Compressor;

use crate::commands::InfoArgs;
use crate::Result;

pub fn handle_info(args: InfoArgs) -> Result<()> {
    let compressor = Compressor::open(&args.input)?;
    let settings = compressor.settings();

    println!("Image size:      {0}x{0}", compressor.size());
    println!("Quadtree bits:   {}", compressor.quadtree_bits());
    println!("Domains:         {}", compressor.num_domains());
    println!("Range sizes:     {}..{}", settings.min_range, settings.max_range);
    println!("MSE threshold:   {}", settings.mse_multiplier);
    println!(
        "Compressed size: {} bytes ({:.4} bpp)",
        compressor.compressed_size(),
        compressor.bits_per_pixel()
    );

    let stats = compressor.domain_stats();
    println!();
    println!("Average offset:  {:.3}", stats.average_offset);
    println!("Offset variance: {:.3}", stats.offset_variance);
    println!("Offset range:    {:.3}..{:.3}", stats.min_offset, stats.max_offset);
    println!("Average scale:   {:.3}", stats.average_scale);
    println!("Scale variance:  {:.3}", stats.scale_variance);
    println!("Scale range:     {:.3}..{:.3}", stats.min_scale, stats.max_scale);

    print!("Transforms:      ");
    for (transform, count) in stats.transform_distribution.iter().enumerate() {
        print!("{transform}({count}) ");
    }
    println!();

    Ok(())
}
