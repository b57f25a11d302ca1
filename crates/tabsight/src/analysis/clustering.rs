//! Heuristic 2-D grouping.
//!
//! This is a single nearest-centroid pass, not k-means: centroids are placed
//! evenly along the diagonal of the bounding box and never move. The output is
//! a stable, cheap colouring for scatter charts, O(points * k).

use crate::insight::ClusterPoint;

/// Label for the cluster at `index`: "A", "B", "C", ...
pub fn cluster_label(index: usize) -> String {
    char::from(b'A' + (index % 26) as u8).to_string()
}

/// Assign each point to one of up to `k` diagonal centroids.
///
/// One output per input point, in input order. When there are fewer points
/// than `k` (or `k <= 1`) every point lands in cluster "A". Ties go to the
/// lower-labelled centroid.
pub fn assign_clusters(points: &[(f64, f64)], k: usize) -> Vec<ClusterPoint> {
    if points.len() < k || k <= 1 {
        return points
            .iter()
            .map(|&(x, y)| ClusterPoint {
                x,
                y,
                cluster: cluster_label(0),
            })
            .collect();
    }

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let centroids: Vec<(f64, f64)> = (0..k)
        .map(|i| {
            let t = (i + 1) as f64 / (k + 1) as f64;
            (min_x * (1.0 - t) + max_x * t, min_y * (1.0 - t) + max_y * t)
        })
        .collect();

    points
        .iter()
        .map(|&(x, y)| {
            let mut nearest = 0;
            let mut best = f64::INFINITY;
            for (i, &(cx, cy)) in centroids.iter().enumerate() {
                let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                if dist < best {
                    best = dist;
                    nearest = i;
                }
            }
            ClusterPoint {
                x,
                y,
                cluster: cluster_label(nearest),
            }
        })
        .collect()
}
