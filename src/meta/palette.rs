//! Ranked dominant-color extraction.
//!
//! Counts exact colors first and only clusters when the image holds more
//! distinct colors than requested. Clustering runs in Lab space for
//! perceptually sensible grouping, with fixed seeds and tie-breaks so the
//! same bitmap always yields the same palette.

use image::RgbaImage;
use lab::{Lab, rgb_bytes_to_labs};
use rustc_hash::FxHashMap;

use crate::meta::record::PaletteColor;

/// Iteration cap for the clustering refinement loop.
const MAX_ITERATIONS: usize = 10;

/// Extract up to `k` colors ranked by pixel-count dominance, most dominant
/// first.
///
/// Fully transparent pixels are ignored. When the bitmap holds at most `k`
/// distinct opaque colors the exact set is returned; otherwise distinct
/// colors are clustered, seeded with the `k` most frequent. Count ties
/// break toward the lower packed RGB value.
pub fn extract(image: &RgbaImage, k: usize) -> Vec<PaletteColor> {
    let entries = histogram(image);
    if entries.is_empty() || k == 0 {
        return Vec::new();
    }
    if entries.len() <= k {
        return entries.into_iter().map(|(color, _)| color).collect();
    }
    cluster(&entries, k)
}

/// Count opaque pixels per exact color.
///
/// The result is sorted by count descending with the numeric tie-break, so
/// everything downstream is independent of hash iteration order.
fn histogram(image: &RgbaImage) -> Vec<(PaletteColor, u64)> {
    let mut counts: FxHashMap<[u8; 3], u64> = FxHashMap::default();
    for pixel in image.pixels() {
        if pixel[3] == 0 {
            continue;
        }
        *counts.entry([pixel[0], pixel[1], pixel[2]]).or_insert(0) += 1;
    }

    let mut entries: Vec<(PaletteColor, u64)> = counts
        .into_iter()
        .map(|(rgb, count)| (PaletteColor(rgb), count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.numeric().cmp(&b.0.numeric())));
    entries
}

/// Weighted Lab accumulator for one cluster.
#[derive(Clone, Copy, Default)]
struct LabCluster {
    sum_l: f32,
    sum_a: f32,
    sum_b: f32,
    weight: f32,
}

impl LabCluster {
    #[inline]
    fn add(&mut self, lab: Lab, weight: f32) {
        self.sum_l += lab.l * weight;
        self.sum_a += lab.a * weight;
        self.sum_b += lab.b * weight;
        self.weight += weight;
    }

    #[inline]
    fn centroid(self) -> Lab {
        let n = self.weight.max(f32::EPSILON);
        Lab {
            l: self.sum_l / n,
            a: self.sum_a / n,
            b: self.sum_b / n,
        }
    }
}

/// Bounded k-means over the distinct colors, weighted by pixel count.
fn cluster(entries: &[(PaletteColor, u64)], k: usize) -> Vec<PaletteColor> {
    let labs = preconvert_to_lab(entries);

    // Seeds are the k most frequent colors; entries are pre-sorted.
    let mut centroids: Vec<Lab> = labs[..k].to_vec();
    let mut assignment = vec![0_usize; entries.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (idx, lab) in labs.iter().enumerate() {
            let nearest = nearest_centroid(lab, &centroids);
            if assignment[idx] != nearest {
                assignment[idx] = nearest;
                changed = true;
            }
        }

        let mut accums = vec![LabCluster::default(); k];
        for (idx, lab) in labs.iter().enumerate() {
            accums[assignment[idx]].add(*lab, entries[idx].1 as f32);
        }
        for (centroid, accum) in centroids.iter_mut().zip(&accums) {
            // An emptied cluster keeps its previous centroid.
            if accum.weight > 0.0 {
                *centroid = accum.centroid();
            }
        }

        if !changed {
            break;
        }
    }

    rank(entries, &assignment, k)
}

/// Rank clusters by total member pixel count; each cluster is represented
/// by its most frequent member color.
fn rank(entries: &[(PaletteColor, u64)], assignment: &[usize], k: usize) -> Vec<PaletteColor> {
    let mut totals = vec![0_u64; k];
    let mut representatives: Vec<Option<PaletteColor>> = vec![None; k];

    for (idx, &(color, count)) in entries.iter().enumerate() {
        let cluster = assignment[idx];
        totals[cluster] += count;
        // Entries arrive in dominance order, so the first member seen is
        // the cluster's most frequent color.
        if representatives[cluster].is_none() {
            representatives[cluster] = Some(color);
        }
    }

    let mut ranked: Vec<(PaletteColor, u64)> = representatives
        .into_iter()
        .zip(totals)
        .filter_map(|(color, total)| color.map(|c| (c, total)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.numeric().cmp(&b.0.numeric())));
    ranked.into_iter().map(|(color, _)| color).collect()
}

/// Batch-convert distinct colors to Lab.
///
/// Uses SIMD-accelerated batch conversion from the `lab` crate.
fn preconvert_to_lab(entries: &[(PaletteColor, u64)]) -> Vec<Lab> {
    let mut rgb_bytes = Vec::with_capacity(entries.len() * 3);
    for (color, _) in entries {
        rgb_bytes.extend_from_slice(&color.0);
    }
    rgb_bytes_to_labs(&rgb_bytes)
}

#[inline]
fn nearest_centroid(lab: &Lab, centroids: &[Lab]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::MAX;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = color_distance_sq(lab, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = idx;
        }
    }
    best
}

/// Squared color distance in Lab space (ΔE^2).
#[inline]
fn color_distance_sq(c1: &Lab, c2: &Lab) -> f32 {
    let dl = c1.l - c2.l;
    let da = c1.a - c2.a;
    let db = c1.b - c2.b;
    dl * dl + da * da + db * db
}

// ============================================================================
// Tests
// ============================================================================
