//! Synthetic planar point sets for interpolation tests.
//!
//! Points are `(x, y, value)` triples in metres. Everything here is
//! deterministic so expected values can be asserted exactly.

/// Samples a linear field `value = a + b·x + c·y` on a regular lattice.
///
/// # Arguments
///
/// * `side` - Number of points per axis
/// * `spacing` - Distance between neighbouring points (metres)
/// * `origin` - Lower-left point of the lattice
/// * `coeffs` - `(a, b, c)`
pub fn linear_field_samples(
    side: usize,
    spacing: f64,
    origin: (f64, f64),
    (a, b, c): (f64, f64, f64),
) -> Vec<(f64, f64, f64)> {
    let mut points = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            let x = origin.0 + col as f64 * spacing;
            let y = origin.1 + row as f64 * spacing;
            points.push((x, y, a + b * x + c * y));
        }
    }
    points
}

/// Pseudo-random scattered points inside a rectangle.
///
/// Uses a fixed linear congruential generator so the same `seed` always
/// yields the same points. Values lie in `[0, 30)`.
pub fn scattered_samples(
    count: usize,
    (min_x, min_y, max_x, max_y): (f64, f64, f64, f64),
    seed: u64,
) -> Vec<(f64, f64, f64)> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..count)
        .map(|_| {
            let x = min_x + next() * (max_x - min_x);
            let y = min_y + next() * (max_y - min_y);
            let v = next() * 30.0;
            (x, y, v)
        })
        .collect()
}
