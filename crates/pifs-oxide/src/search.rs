//! Exhaustive domain search: for one range block, scan every candidate domain
//! anchor and isometry, fit brightness scale and offset by least squares, and
//! keep the mapping with the lowest quantized mean-squared error.

use pifs_grid::Image;

use crate::consts::{DOMAIN_LOCATION_BITS, NUM_TRANSFORMS};
use crate::domain::Domain;
use crate::transform::transform_location;

/// Pixel caches reused across every candidate mapping of one range block.
pub(crate) struct SearchScratch {
    domain_px: Vec<u8>,
    range_px: Vec<u8>,
}

impl SearchScratch {
    pub(crate) fn new(max_range: u32) -> Self {
        let len = (max_range * max_range) as usize;
        Self {
            domain_px: vec![0; len],
            range_px: vec![0; len],
        }
    }
}

struct DomainMatch {
    scale: f32,
    offset: f32,
    mse: f32,
}

/// Fit `s·g + o ≈ h` over one (range, domain, transform) candidate and score
/// it with the quantized coefficients.
fn match_domain(
    image: &Image,
    rx0: u32,
    ry0: u32,
    dx0: u32,
    dy0: u32,
    transform: u8,
    range_size: u32,
    scratch: &mut SearchScratch,
) -> DomainMatch {
    let k = range_size * range_size;
    let inv_k = 1.0 / k as f32;

    let mut gh_sum = 0u32;
    let mut g_sum = 0u32;
    let mut g_sqr_sum = 0u32;
    let mut h_sum = 0u32;

    let mut index = 0usize;
    for y in 0..range_size {
        for x in 0..range_size {
            let (tx, ty) = transform_location(range_size, x, y, transform);

            let g = image.sample_domain(dx0 + 2 * tx, dy0 + 2 * ty) as u32;
            let h = image.sample(rx0 + x, ry0 + y) as u32;

            gh_sum += g * h;
            g_sqr_sum += g * g;
            g_sum += g;
            h_sum += h;

            scratch.domain_px[index] = g as u8;
            scratch.range_px[index] = h as u8;
            index += 1;
        }
    }

    // least-squares fit for scale and offset
    let term0 = k as f32 * gh_sum as f32 - g_sum as f32 * h_sum as f32;
    let term1 = k as f32 * g_sqr_sum as f32 - g_sum as f32 * g_sum as f32;
    let (scale, offset) = if term1.abs() < 1.0e-4 {
        // flat domain window: constant mapping at the range mean
        (0.0, h_sum as f32 * inv_k)
    } else {
        let scale = term0 / term1;
        (scale, (h_sum as f32 - scale * g_sum as f32) * inv_k)
    };

    // The subdivide decision has to see what the decoder will render, so the
    // reported MSE is computed with the quantized coefficients.
    let mut quantized = Domain::default();
    quantized.set_scale(scale);
    quantized.set_offset(offset);

    let mut diff_sum = 0u32;
    for i in 0..k as usize {
        let g = quantized.transform_color(scratch.domain_px[i]) as i32;
        let h = scratch.range_px[i] as i32;
        let diff = g - h;
        diff_sum += (diff * diff) as u32;
    }

    DomainMatch {
        scale,
        offset,
        mse: diff_sum as f32 * inv_k,
    }
}

/// Brute-force scan over all domain anchors and isometries for the range
/// block rooted at `(rx0, ry0)`. Ties keep the first candidate in scan order
/// (`y` outer, `x` inner, transform innermost).
pub(crate) fn domain_search(
    image: &Image,
    rx0: u32,
    ry0: u32,
    range_size: u32,
    scratch: &mut SearchScratch,
) -> (Domain, f32) {
    let step_shift = image.size_bits().saturating_sub(DOMAIN_LOCATION_BITS);
    let max_locations = image.size().min(1 << DOMAIN_LOCATION_BITS);

    let mut best = Domain::default();
    let mut best_cost = f32::MAX;

    for dy in 0..max_locations {
        let dy0 = dy << step_shift;
        for dx in 0..max_locations {
            let dx0 = dx << step_shift;
            for transform in 0..NUM_TRANSFORMS {
                let candidate =
                    match_domain(image, rx0, ry0, dx0, dy0, transform, range_size, scratch);
                if candidate.mse < best_cost {
                    best = Domain::default();
                    best.set_x(dx);
                    best.set_y(dy);
                    best.set_transform(transform);
                    best.set_scale(candidate.scale);
                    best.set_offset(candidate.offset);
                    best_cost = candidate.mse;
                }
            }
        }
    }

    (best, best_cost)
}
