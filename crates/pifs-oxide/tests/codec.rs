use pifs_oxide::{
    Compressor, CompressorSettings, Error, Image, PifsThreadPool,
};

fn ramp_image(size: u32) -> Image {
    let mut image = Image::new(size);
    for y in 0..size {
        for x in 0..size {
            image.write(x, y, ((x + y) % 256) as u8);
        }
    }
    image
}

fn tiled_image(size: u32) -> Image {
    // piecewise-constant 4x4 tiles with large jumps between neighbors
    let mut image = Image::new(size);
    for y in 0..size {
        for x in 0..size {
            image.write(x, y, ((x / 4 + y / 4) * 37 % 256) as u8);
        }
    }
    image
}

fn compress_to_bytes(image: &Image, settings: CompressorSettings, pool: &PifsThreadPool) -> Vec<u8> {
    let mut compressor = Compressor::new(settings).unwrap();
    compressor.compress_with_pool(image, pool).unwrap();
    let mut bytes = Vec::new();
    compressor.save(&mut bytes).unwrap();
    bytes
}

#[test]
fn constant_image_encodes_as_single_root() {
    let image = Image::from_vec(32, vec![128; 32 * 32]);
    let mut compressor = Compressor::new(CompressorSettings {
        mse_multiplier: 20.0,
        min_range: 8,
        max_range: 32,
    })
    .unwrap();
    compressor.compress_with_pool(&image, &PifsThreadPool::serial()).unwrap();

    // the root mapping is accepted, so the whole image is one leaf with a
    // single decision bit
    assert_eq!(compressor.num_domains(), 1);
    assert_eq!(compressor.quadtree_bits(), 1);

    // the offset grid has step 4: 128 reconstructs as 124, constant everywhere
    let decoded = compressor.decompress().unwrap();
    assert!(decoded.buf().iter().all(|&p| p == decoded.buf()[0]));
    assert!(decoded.buf()[0].abs_diff(128) <= 4);
}

#[test]
fn equal_range_bounds_skip_the_quadtree() {
    let image = Image::from_vec(32, vec![128; 32 * 32]);
    let mut compressor = Compressor::new(CompressorSettings {
        mse_multiplier: 1.0,
        min_range: 8,
        max_range: 8,
    })
    .unwrap();
    compressor.compress_with_pool(&image, &PifsThreadPool::serial()).unwrap();

    // no node can split, so no decision bits exist and every root is a leaf
    assert_eq!(compressor.quadtree_bits(), 0);
    assert_eq!(compressor.num_domains(), (32 / 8) * (32 / 8));
}

#[test]
fn checkerboard_round_trip() {
    // 2x2 board of 8-pixel cells
    let size = 16u32;
    let mut image = Image::new(size);
    for y in 0..size {
        for x in 0..size {
            let cell = (x / 8 + y / 8) % 2;
            image.write(x, y, if cell == 0 { 0 } else { 255 });
        }
    }

    let mut compressor = Compressor::new(CompressorSettings {
        mse_multiplier: 10.0,
        min_range: 4,
        max_range: 8,
    })
    .unwrap();
    compressor.compress_with_pool(&image, &PifsThreadPool::serial()).unwrap();

    let decoded = compressor.decompress_with_iterations(50).unwrap();
    let diff = Image::compare(&image, &decoded);
    assert!(diff.psnr > 25.0, "round-trip psnr too low: {}", diff.psnr);
}

#[test]
fn bad_magic_is_rejected() {
    let image = ramp_image(32);
    let mut bytes = compress_to_bytes(&image, CompressorSettings::default(), &PifsThreadPool::serial());
    bytes[0..4].copy_from_slice(&[0; 4]);

    assert!(matches!(
        Compressor::load(&mut bytes.as_slice()),
        Err(Error::CorruptFile(_))
    ));
}

#[test]
fn worker_count_determinism() {
    let image = {
        let size = 64u32;
        let mut image = Image::new(size);
        for y in 0..size {
            for x in 0..size {
                image.write(x, y, ((x * x + 3 * y) % 251) as u8);
            }
        }
        image
    };
    let settings = CompressorSettings {
        mse_multiplier: 10.0,
        min_range: 4,
        max_range: 32,
    };

    let serial = compress_to_bytes(&image, settings, &PifsThreadPool::with_threads(1));
    let parallel = compress_to_bytes(&image, settings, &PifsThreadPool::with_threads(4));
    assert_eq!(serial, parallel);

    // same pool, second run: still byte-identical
    let again = compress_to_bytes(&image, settings, &PifsThreadPool::with_threads(4));
    assert_eq!(parallel, again);
}

#[test]
fn remainder_rows_go_to_the_last_worker() {
    // 4 root rows over a 3-worker pool leaves one remainder row
    let image = ramp_image(64);
    let settings = CompressorSettings {
        mse_multiplier: 5.0,
        min_range: 4,
        max_range: 16,
    };

    let serial = compress_to_bytes(&image, settings, &PifsThreadPool::with_threads(1));
    let uneven = compress_to_bytes(&image, settings, &PifsThreadPool::with_threads(3));
    assert_eq!(serial, uneven);

    // every root range was encoded: a full decode succeeds
    let compressor = Compressor::load(&mut uneven.as_slice()).unwrap();
    compressor.decompress_with_iterations(1).unwrap();
}

#[test]
fn ramp_image_round_trip() {
    let image = ramp_image(64);
    let mut compressor = Compressor::new(CompressorSettings {
        mse_multiplier: 5.0,
        min_range: 4,
        max_range: 16,
    })
    .unwrap();
    compressor.compress(&image).unwrap();
    let decoded = compressor.decompress().unwrap();

    let total_abs_diff: u64 = image
        .buf()
        .iter()
        .zip(decoded.buf())
        .map(|(&a, &b)| a.abs_diff(b) as u64)
        .sum();
    let average = total_abs_diff as f64 / (64.0 * 64.0);
    assert!(average <= 6.0, "average absolute difference {average}");
}

#[test]
fn iteration_count_converges() {
    let image = ramp_image(64);
    let mut compressor = Compressor::new(CompressorSettings {
        mse_multiplier: 5.0,
        min_range: 4,
        max_range: 16,
    })
    .unwrap();
    compressor.compress(&image).unwrap();

    let psnr = |iterations| {
        let decoded = compressor.decompress_with_iterations(iterations).unwrap();
        Image::compare(&image, &decoded).psnr
    };
    let psnr10 = psnr(10);
    let psnr50 = psnr(50);
    let psnr100 = psnr(100);

    assert!(psnr10 <= psnr50 + 0.01);
    assert!(psnr50 <= psnr100 + 0.01);
    assert!((psnr100 - psnr50).abs() < 0.01, "{psnr50} vs {psnr100}");
}

#[test]
fn lower_threshold_means_lower_error() {
    let image = tiled_image(32);
    let decode_mse = |mse_multiplier: f32| {
        let mut compressor = Compressor::new(CompressorSettings {
            mse_multiplier,
            min_range: 4,
            max_range: 32,
        })
        .unwrap();
        compressor.compress_with_pool(&image, &PifsThreadPool::serial()).unwrap();
        let decoded = compressor.decompress().unwrap();
        Image::compare(&image, &decoded).average_error
    };

    let fine = decode_mse(1.0);
    let coarse = decode_mse(1.0e6);
    assert!(
        fine < coarse,
        "subdividing should reduce error: {fine} vs {coarse}"
    );
}

#[test]
fn save_load_round_trip_is_byte_identical() {
    let image = ramp_image(64);
    let settings = CompressorSettings {
        mse_multiplier: 5.0,
        min_range: 4,
        max_range: 16,
    };
    let bytes = compress_to_bytes(&image, settings, &PifsThreadPool::serial());

    let loaded = Compressor::load(&mut bytes.as_slice()).unwrap();
    let mut bytes_again = Vec::new();
    loaded.save(&mut bytes_again).unwrap();
    assert_eq!(bytes, bytes_again);

    // the loaded state decodes to the same image as the in-memory state
    let mut original = Compressor::new(settings).unwrap();
    original.compress_with_pool(&image, &PifsThreadPool::serial()).unwrap();
    let a = original.decompress_with_iterations(20).unwrap();
    let b = loaded.decompress_with_iterations(20).unwrap();
    assert_eq!(a.buf(), b.buf());
}

#[test]
fn quadtree_walk_matches_domain_count() {
    let image = tiled_image(64);
    let settings = CompressorSettings {
        mse_multiplier: 10.0,
        min_range: 4,
        max_range: 32,
    };
    let bytes = compress_to_bytes(&image, settings, &PifsThreadPool::serial());
    let compressor = Compressor::load(&mut bytes.as_slice()).unwrap();

    // replay the tree shape: every set bit adds three leaves
    let num_words = (compressor.quadtree_bits() as usize).div_ceil(32);
    let words: Vec<u32> = bytes[24..24 + num_words * 4]
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
        .collect();
    let mut splits = 0u32;
    for bit in 0..compressor.quadtree_bits() {
        if words[(bit / 32) as usize] & (1 << (bit % 32)) != 0 {
            splits += 1;
        }
    }
    let roots = (64 / 32) * (64 / 32);
    assert_eq!(compressor.num_domains() as u32, roots + 3 * splits);
}

#[test]
fn truncated_file_is_io_error() {
    let image = ramp_image(32);
    let bytes = compress_to_bytes(&image, CompressorSettings::default(), &PifsThreadPool::serial());
    let truncated = &bytes[..bytes.len() - 3];
    assert!(matches!(
        Compressor::load(&mut &truncated[..]),
        Err(Error::Io(_))
    ));
}

#[test]
fn single_root_covers_whole_image() {
    let image = ramp_image(32);
    let mut compressor = Compressor::new(CompressorSettings {
        mse_multiplier: 5.0,
        min_range: 4,
        max_range: 32,
    })
    .unwrap();
    compressor.compress_with_pool(&image, &PifsThreadPool::serial()).unwrap();
    assert!(compressor.num_domains() >= 1);

    let decoded = compressor.decompress_with_iterations(30).unwrap();
    assert_eq!(decoded.size(), 32);
}
