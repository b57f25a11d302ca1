//! Pairwise Pearson correlation across numeric columns.

use crate::insight::{round_to, CorrelationPair};

use super::values::{aligned_pairs, NumericColumn};

/// Pearson correlation coefficient.
///
/// Returns `None` when either column has zero or overflowing variance, or the
/// result is not finite.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denom_x = 0.0;
    let mut denom_y = 0.0;
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        numerator += dx * dy;
        denom_x += dx * dx;
        denom_y += dy * dy;
    }

    if denom_x == 0.0 || denom_y == 0.0 || !denom_x.is_finite() || !denom_y.is_finite() {
        return None;
    }

    let r = numerator / (denom_x.sqrt() * denom_y.sqrt());
    r.is_finite().then_some(r)
}

/// Correlate every unordered pair of columns, in column order.
///
/// A pair needs at least `min_pairs` rows where both cells parse. Values are
/// rounded to `decimals` places and clamped to [-1, 1].
pub fn correlate(columns: &[NumericColumn], min_pairs: usize, decimals: i32) -> Vec<CorrelationPair> {
    let mut correlations = Vec::new();

    for (i, x) in columns.iter().enumerate() {
        for y in &columns[i + 1..] {
            let pairs = aligned_pairs(x, y);
            if pairs.len() < min_pairs {
                continue;
            }

            if let Some(r) = pearson(&pairs) {
                correlations.push(CorrelationPair {
                    x: x.name.clone(),
                    y: y.name.clone(),
                    value: round_to(r, decimals).clamp(-1.0, 1.0),
                });
            }
        }
    }

    correlations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, values: &[f64]) -> NumericColumn {
        let values: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
        NumericColumn::from_values(name, &values)
    }

    #[test]
    fn test_perfect_positive() {
        let result = correlate(
            &[column("x", &[1.0, 2.0, 3.0, 4.0]), column("y", &[2.0, 4.0, 6.0, 8.0])],
            3,
            3,
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].value, 1.0);
    }

    #[test]
    fn test_perfect_negative() {
        let r = pearson(&[(1.0, 9.0), (2.0, 6.0), (3.0, 3.0)]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_excluded() {
        let result = correlate(
            &[column("x", &[1.0, 2.0, 3.0]), column("flat", &[5.0, 5.0, 5.0])],
            3,
            3,
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_requires_three_aligned_pairs() {
        let x = NumericColumn::from_values("x", &[Some(1.0), Some(2.0), None, Some(4.0)]);
        let y = NumericColumn::from_values("y", &[Some(1.0), None, Some(3.0), Some(5.0)]);
        assert!(correlate(&[x, y], 3, 3).is_empty());
    }

    #[test]
    fn test_rounded_to_three_places() {
        let result = correlate(
            &[
                column("a", &[1.0, 2.0, 3.0, 4.0, 5.0]),
                column("b", &[2.0, 1.0, 4.0, 3.0, 5.0]),
            ],
            3,
            3,
        );
        assert_eq!(result[0].value, 0.8);
    }

    #[test]
    fn test_symmetric() {
        let a = column("a", &[1.0, 3.0, 2.0, 7.0, 4.0]);
        let b = column("b", &[0.5, 2.0, 2.5, 5.0, 1.0]);
        let ab = correlate(&[a.clone(), b.clone()], 3, 3);
        let ba = correlate(&[b, a], 3, 3);
        assert_eq!(ab[0].value, ba[0].value);
    }
}
