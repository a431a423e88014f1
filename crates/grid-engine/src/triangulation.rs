//! Delaunay triangulation of scattered points.
//!
//! Built on the `delaunator` sweep-hull triangulator, which always covers
//! the convex hull of the input. Triangles are re-oriented counter-clockwise
//! here and zero-area slivers along collinear hull runs are dropped.
//!
//! The result is deterministic for identical input.

use delaunator::Point;
use tracing::{debug, warn};

use crate::error::{GridError, Result};

fn orient(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

/// Triangulate a point set.
///
/// # Returns
///
/// Counter-clockwise vertex triples indexing into `x`/`y`. Their union is
/// the convex hull of the points.
///
/// # Errors
///
/// `InvalidCoordinates` when the arrays differ in length, hold fewer than
/// three points, contain non-finite values, or are all collinear.
pub fn delaunay(x: &[f64], y: &[f64]) -> Result<Vec<[usize; 3]>> {
    let n = x.len();
    if y.len() != n {
        return Err(GridError::invalid_coordinates(format!(
            "x has {} points but y has {}",
            n,
            y.len()
        )));
    }
    if n < 3 {
        return Err(GridError::invalid_coordinates(format!(
            "triangulation needs at least 3 points, got {}",
            n
        )));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(GridError::invalid_coordinates(
            "triangulation points must be finite",
        ));
    }

    let points: Vec<Point> = x.iter().zip(y).map(|(&x, &y)| Point { x, y }).collect();
    let triangulation = delaunator::triangulate(&points);

    let result: Vec<[usize; 3]> = triangulation
        .triangles
        .chunks_exact(3)
        .filter_map(|t| {
            let (a, b, c) = (t[0], t[1], t[2]);
            let area = orient((x[a], y[a]), (x[b], y[b]), (x[c], y[c]));
            if area > 0.0 {
                Some([a, b, c])
            } else if area < 0.0 {
                Some([b, a, c])
            } else {
                None
            }
        })
        .collect();

    if result.is_empty() {
        return Err(GridError::invalid_coordinates(
            "points are collinear, no triangle can be formed",
        ));
    }

    let mut used = vec![false; n];
    for t in &result {
        for &v in t {
            used[v] = true;
        }
    }
    let orphans = used.iter().filter(|u| !**u).count();
    if orphans > 0 {
        // duplicates collapse onto the first occurrence
        warn!(orphans, points = n, "Triangulation left points outside every triangle");
    }
    debug!(
        points = n,
        triangles = result.len(),
        hull = triangulation.hull.len(),
        "Triangulated points"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(x: &[f64], y: &[f64], t: &[usize; 3]) -> f64 {
        0.5 * orient((x[t[0]], y[t[0]]), (x[t[1]], y[t[1]]), (x[t[2]], y[t[2]]))
    }

    fn circumcircle(x: &[f64], y: &[f64], t: &[usize; 3]) -> (f64, f64, f64) {
        let (ax, ay) = (x[t[0]], y[t[0]]);
        let (bx, by) = (x[t[1]], y[t[1]]);
        let (cx, cy) = (x[t[2]], y[t[2]]);
        let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
        let a2 = ax * ax + ay * ay;
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
        let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;
        (ux, uy, (ax - ux).hypot(ay - uy))
    }

    #[test]
    fn test_single_triangle() {
        let tris = delaunay(&[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0]).unwrap();
        assert_eq!(tris.len(), 1);
        let mut v = tris[0].to_vec();
        v.sort();
        assert_eq!(v, vec![0, 1, 2]);
    }

    #[test]
    fn test_square_has_two_ccw_triangles() {
        let x = [0.0, 1.0, 1.0, 0.0];
        let y = [0.0, 0.0, 1.0, 1.0];
        let tris = delaunay(&x, &y).unwrap();
        assert_eq!(tris.len(), 2);
        let total: f64 = tris.iter().map(|t| area(&x, &y, t)).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(tris.iter().all(|t| area(&x, &y, t) > 0.0));
    }

    #[test]
    fn test_points_near_hull_edge_keep_full_coverage() {
        let x = [0.0, 10.0, 10.0, 0.0, 2.0, 5.0, 8.0];
        let y = [0.0, 0.0, 10.0, 10.0, 0.001, 0.0005, 0.001];
        let tris = delaunay(&x, &y).unwrap();

        let total: f64 = tris.iter().map(|t| area(&x, &y, t)).sum();
        assert!((total - 100.0).abs() < 1e-9, "covered area {}", total);
        // 7 points, 4 on the hull: 2n - 2 - h
        assert_eq!(tris.len(), 8);
        assert!(tris.iter().all(|t| area(&x, &y, t) > 0.0));
    }

    #[test]
    fn test_lattice_covers_hull() {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for j in 0..5 {
            for i in 0..6 {
                // jitter keeps points off common circles
                x.push(i as f64 + 0.01 * ((i * 7 + j * 3) % 5) as f64);
                y.push(j as f64 + 0.01 * ((i * 3 + j * 5) % 7) as f64);
            }
        }
        let tris = delaunay(&x, &y).unwrap();
        // Euler: 2n - 2 - h triangles for n points with h on the hull
        assert!(tris.len() >= 2 * 30 - 2 - 18);
        let mut used = vec![false; x.len()];
        for t in &tris {
            for &v in t {
                used[v] = true;
            }
        }
        assert!(used.iter().all(|&u| u));
    }

    #[test]
    fn test_empty_circumcircles() {
        let x = [0.0, 2.0, 4.0, 1.0, 3.0, 2.0, 0.5];
        let y = [0.0, 0.3, 0.0, 2.0, 2.1, 4.0, 3.0];
        let tris = delaunay(&x, &y).unwrap();
        for t in &tris {
            let (cx, cy, r) = circumcircle(&x, &y, t);
            for p in 0..x.len() {
                if t.contains(&p) {
                    continue;
                }
                let dist = (x[p] - cx).hypot(y[p] - cy);
                assert!(
                    dist >= r - 1e-9,
                    "point {} inside circumcircle of {:?}",
                    p,
                    t
                );
            }
        }
    }

    #[test]
    fn test_duplicate_points_are_tolerated() {
        let x = [0.0, 1.0, 0.0, 1.0, 1.0];
        let y = [0.0, 0.0, 1.0, 1.0, 1.0];
        let tris = delaunay(&x, &y).unwrap();
        let total: f64 = tris.iter().map(|t| area(&x, &y, t)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let x = [0.3, 1.7, 2.2, 0.9, 1.4, 2.8];
        let y = [0.1, 0.4, 1.9, 1.2, 2.6, 0.7];
        assert_eq!(delaunay(&x, &y).unwrap(), delaunay(&x, &y).unwrap());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(delaunay(&[0.0, 1.0], &[0.0, 1.0]).is_err());
        assert!(delaunay(&[0.0, 1.0, 2.0], &[0.0, 1.0]).is_err());
        assert!(delaunay(&[0.0, 1.0, f64::NAN], &[0.0, 1.0, 2.0]).is_err());
        assert!(matches!(
            delaunay(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]),
            Err(GridError::InvalidCoordinates(_))
        ));
    }
}
