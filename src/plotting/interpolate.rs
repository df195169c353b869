//! Monotone cubic interpolation (Fritsch-Carlson) for smooth series.
//!
//! The curve passes through every input point and never overshoots between
//! two of them, so a smoothed rate never dips below zero or above the axis
//! ceiling.

/// Sample a monotone cubic through `points` (strictly increasing x) with
/// `steps` segments per span. Fewer than three points come back unchanged.
pub fn monotone_path(points: &[(f64, f64)], steps: usize) -> Vec<(f64, f64)> {
    if points.len() < 3 || steps < 2 {
        return points.to_vec();
    }

    let tangents = tangents(points);
    let mut path = Vec::with_capacity((points.len() - 1) * steps + 1);
    path.push(points[0]);

    for i in 0..points.len() - 1 {
        let (x0, y0) = points[i];
        let (x1, y1) = points[i + 1];
        let h = x1 - x0;
        for step in 1..=steps {
            let t = step as f64 / steps as f64;
            let t2 = t * t;
            let t3 = t2 * t;
            let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
            let h10 = t3 - 2.0 * t2 + t;
            let h01 = -2.0 * t3 + 3.0 * t2;
            let h11 = t3 - t2;
            let y = h00 * y0 + h10 * h * tangents[i] + h01 * y1 + h11 * h * tangents[i + 1];
            path.push((x0 + t * h, y));
        }
    }

    path
}

fn tangents(points: &[(f64, f64)]) -> Vec<f64> {
    let n = points.len();
    let secants: Vec<f64> = points
        .windows(2)
        .map(|w| (w[1].1 - w[0].1) / (w[1].0 - w[0].0))
        .collect();

    let mut m = vec![0.0; n];
    m[0] = secants[0];
    m[n - 1] = secants[n - 2];
    for i in 1..n - 1 {
        m[i] = if secants[i - 1] * secants[i] <= 0.0 {
            0.0
        } else {
            (secants[i - 1] + secants[i]) / 2.0
        };
    }

    for i in 0..n - 1 {
        if secants[i] == 0.0 {
            m[i] = 0.0;
            m[i + 1] = 0.0;
            continue;
        }
        let a = m[i] / secants[i];
        let b = m[i + 1] / secants[i];
        let s = a * a + b * b;
        if s > 9.0 {
            let tau = 3.0 / s.sqrt();
            m[i] = tau * a * secants[i];
            m[i + 1] = tau * b * secants[i];
        }
    }

    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passes_through_inputs() {
        let points = [(0.0, 1.0), (1.0, 3.0), (2.0, 2.0), (3.0, 5.0)];
        let path = monotone_path(&points, 4);
        assert_eq!(path.len(), 13);
        for (i, point) in points.iter().enumerate() {
            let sampled = path[i * 4];
            assert!((sampled.0 - point.0).abs() < 1e-9);
            assert!((sampled.1 - point.1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_no_overshoot_on_monotone_data() {
        let points = [(0.0, 0.0), (1.0, 0.1), (2.0, 10.0), (3.0, 10.0)];
        let path = monotone_path(&points, 16);
        for pair in path.windows(2) {
            assert!(pair[1].1 >= pair[0].1 - 1e-9, "dip at {:?}", pair);
        }
        assert!(path.iter().all(|(_, y)| (0.0..=10.0 + 1e-9).contains(y)));
    }

    #[test]
    fn test_short_input_unchanged() {
        let points = [(0.0, 1.0), (1.0, 2.0)];
        assert_eq!(monotone_path(&points, 8), points.to_vec());
    }
}
