//! Aggregate statistics over the encoded domain list.

use crate::domain::Domain;

/// Distribution of the dequantized mapping coefficients.
#[derive(Debug, Default, Copy, Clone)]
pub struct DomainsStats {
    pub average_scale: f32,
    pub scale_variance: f32,
    pub min_scale: f32,
    pub max_scale: f32,

    pub average_offset: f32,
    pub offset_variance: f32,
    pub min_offset: f32,
    pub max_offset: f32,

    /// How often each of the eight isometries was selected.
    pub transform_distribution: [u32; 8],
}

pub(crate) fn calculate_stats(domains: &[Domain]) -> DomainsStats {
    let mut stats = DomainsStats {
        min_scale: f32::MAX,
        max_scale: f32::MIN,
        min_offset: f32::MAX,
        max_offset: f32::MIN,
        ..Default::default()
    };
    if domains.is_empty() {
        return DomainsStats::default();
    }

    let inv_num = 1.0 / domains.len() as f32;
    for d in domains {
        let offset = d.offset();
        let scale = d.scale();

        stats.average_offset += offset;
        stats.average_scale += scale;
        stats.min_offset = stats.min_offset.min(offset);
        stats.max_offset = stats.max_offset.max(offset);
        stats.min_scale = stats.min_scale.min(scale);
        stats.max_scale = stats.max_scale.max(scale);
        stats.transform_distribution[d.transform() as usize] += 1;
    }
    stats.average_offset *= inv_num;
    stats.average_scale *= inv_num;

    for d in domains {
        let offset_dev = stats.average_offset - d.offset();
        let scale_dev = stats.average_scale - d.scale();
        stats.offset_variance += offset_dev * offset_dev;
        stats.scale_variance += scale_dev * scale_dev;
    }
    stats.offset_variance *= inv_num;
    stats.scale_variance *= inv_num;

    stats
}
