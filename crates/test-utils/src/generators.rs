//! Test data generators for creating synthetic grid coordinates and fields.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite. All 2-D outputs are row-major
//! `(ny, nx)` arrays flattened into a `Vec<f64>`.

/// `n` evenly spaced values from `start` to `end` inclusive.
///
/// # Example
///
/// ```
/// use test_utils::linspace;
///
/// assert_eq!(linspace(0.0, 3.0, 4), vec![0.0, 1.0, 2.0, 3.0]);
/// ```
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + i as f64 * step).collect()
        }
    }
}

/// Expand 1-D axes into row-major 2-D coordinate arrays.
///
/// # Returns
///
/// `(x, y)` each of length `xs.len() * ys.len()`, where
/// `x[row * nx + col] == xs[col]` and `y[row * nx + col] == ys[row]`.
pub fn meshgrid(xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut x = Vec::with_capacity(xs.len() * ys.len());
    let mut y = Vec::with_capacity(xs.len() * ys.len());
    for &yv in ys {
        for &xv in xs {
            x.push(xv);
            y.push(yv);
        }
    }
    (x, y)
}

/// Creates a field whose value is its own flat index, `row * width + col`.
///
/// # Example
///
/// ```
/// use test_utils::create_index_field;
///
/// let field = create_index_field(4, 4);
/// assert_eq!(field[5], 5.0); // row 1, col 1
/// ```
pub fn create_index_field(width: usize, height: usize) -> Vec<f64> {
    (0..width * height).map(|i| i as f64).collect()
}

/// Evaluates `a + bx * x + by * y` at each coordinate.
///
/// Bilinear and barycentric interpolation reproduce a linear field
/// exactly, which makes it the natural reference for interpolation tests.
pub fn create_linear_field(x: &[f64], y: &[f64], a: f64, bx: f64, by: f64) -> Vec<f64> {
    x.iter().zip(y).map(|(&xv, &yv)| a + bx * xv + by * yv).collect()
}

/// Creates a temperature-like field (Kelvin) from lon/lat in degrees.
///
/// Warm at the equator (~300K), cold at the poles (~240K), with a weak
/// zonal wave so that longitude matters too.
pub fn create_temperature_field(lon: &[f64], lat: &[f64]) -> Vec<f64> {
    lon.iter()
        .zip(lat)
        .map(|(&lo, &la)| {
            let phi = la.to_radians();
            240.0 + 60.0 * phi.cos().powi(2) + 5.0 * (2.0 * lo.to_radians()).cos() * phi.cos()
        })
        .collect()
}

/// Creates (u, v) wind components of solid-body rotation about the polar
/// axis, in m/s, from lon/lat in degrees.
///
/// u is eastward and proportional to cos(lat); v is zero. The resulting
/// flow has no singularity at the poles, which makes it a good reference
/// for vector rotation.
pub fn create_wind_fields(lon: &[f64], lat: &[f64], speed: f64) -> (Vec<f64>, Vec<f64>) {
    let u = lon
        .iter()
        .zip(lat)
        .map(|(_, &la)| speed * la.to_radians().cos())
        .collect();
    let v = vec![0.0; lon.len()];
    (u, v)
}

/// Creates a field filled with a constant value.
pub fn create_constant_field(len: usize, value: f64) -> Vec<f64> {
    vec![value; len]
}

/// Creates a field with NaN values at specified positions.
///
/// # Arguments
///
/// * `width` - Number of columns
/// * `height` - Number of rows
/// * `nan_positions` - List of (col, row) positions that should be NaN
///
/// # Returns
///
/// A `Vec<f64>` with NaN at specified positions, zeros elsewhere.
pub fn create_field_with_nans(
    width: usize,
    height: usize,
    nan_positions: &[(usize, usize)],
) -> Vec<f64> {
    let mut data = vec![0.0; width * height];
    for &(col, row) in nan_positions {
        if col < width && row < height {
            data[row * width + col] = f64::NAN;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        let v = linspace(-180.0, 180.0, 5);
        assert_eq!(v, vec![-180.0, -90.0, 0.0, 90.0, 180.0]);
    }

    #[test]
    fn test_meshgrid_row_major() {
        let (x, y) = meshgrid(&[0.0, 1.0, 2.0], &[10.0, 20.0]);
        assert_eq!(x, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        assert_eq!(y, vec![10.0, 10.0, 10.0, 20.0, 20.0, 20.0]);
    }

    #[test]
    fn test_create_index_field() {
        let field = create_index_field(4, 4);
        assert_eq!(field.len(), 16);
        assert_eq!(field[0], 0.0);
        assert_eq!(field[15], 15.0);
    }

    #[test]
    fn test_create_temperature_field_range() {
        let (lon, lat) = meshgrid(&linspace(-180.0, 179.0, 360), &linspace(-90.0, 90.0, 181));
        let field = create_temperature_field(&lon, &lat);
        let min = field.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = field.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(min >= 235.0);
        assert!(max <= 306.0);
    }

    #[test]
    fn test_create_wind_fields_calm_at_pole() {
        let (u, v) = create_wind_fields(&[0.0, 0.0], &[0.0, 90.0], 10.0);
        assert!((u[0] - 10.0).abs() < 1e-12);
        assert!(u[1].abs() < 1e-9);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_create_field_with_nans() {
        let field = create_field_with_nans(10, 10, &[(5, 5), (0, 0)]);
        assert!(field[0].is_nan());
        assert!(field[55].is_nan());
        assert!(!field[1].is_nan());
    }
}
