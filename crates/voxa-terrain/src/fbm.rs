//! Multi-octave fractal Brownian motion over a single noise field.
//!
//! Each octave doubles the frequency and halves the amplitude. Results are
//! normalised by the amplitude sum and clamped so every fBm stays in `[-1, 1]`
//! regardless of octave count.

use noise::NoiseFn;

const LACUNARITY: f64 = 2.0;
const PERSISTENCE: f64 = 0.5;

/// Samples normalised 2D fBm at `(x, z)`.
pub fn fbm2(noise: &impl NoiseFn<f64, 2>, x: f64, z: f64, octaves: u32, frequency: f64) -> f64 {
    let mut total = 0.0;
    let mut norm = 0.0;
    let mut freq = frequency;
    let mut amp = 1.0;
    for _ in 0..octaves {
        total += noise.get([x * freq, z * freq]) * amp;
        norm += amp;
        freq *= LACUNARITY;
        amp *= PERSISTENCE;
    }
    if norm == 0.0 {
        0.0
    } else {
        (total / norm).clamp(-1.0, 1.0)
    }
}

/// Samples normalised 3D fBm at `pos`.
pub fn fbm3(noise: &impl NoiseFn<f64, 3>, pos: glam::DVec3, octaves: u32, frequency: f64) -> f64 {
    let mut total = 0.0;
    let mut norm = 0.0;
    let mut freq = frequency;
    let mut amp = 1.0;
    for _ in 0..octaves {
        total += noise.get([pos.x * freq, pos.y * freq, pos.z * freq]) * amp;
        norm += amp;
        freq *= LACUNARITY;
        amp *= PERSISTENCE;
    }
    if norm == 0.0 {
        0.0
    } else {
        (total / norm).clamp(-1.0, 1.0)
    }
}

/// Maps a `[-1, 1]` noise value to `[0, 1]`.
#[inline]
pub fn to_unit(v: f64) -> f64 {
    ((v + 1.0) * 0.5).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use noise::Simplex;

    #[test]
    fn test_fbm2_bounded() {
        let noise = Simplex::new(42);
        for i in 0..2000 {
            let v = fbm2(&noise, i as f64 * 3.7, i as f64 * -1.3, 5, 0.01);
            assert!((-1.0..=1.0).contains(&v), "fbm2 out of range: {v}");
        }
    }

    #[test]
    fn test_fbm3_bounded_and_deterministic() {
        let a = Simplex::new(9);
        let b = Simplex::new(9);
        for i in 0..500 {
            let p = glam::DVec3::new(i as f64, (i % 50) as f64, i as f64 * 0.5);
            let va = fbm3(&a, p, 3, 0.05);
            assert!((-1.0..=1.0).contains(&va));
            assert_eq!(va, fbm3(&b, p, 3, 0.05));
        }
    }

    #[test]
    fn test_zero_octaves_is_zero() {
        let noise = Simplex::new(1);
        assert_eq!(fbm2(&noise, 10.0, 10.0, 0, 0.1), 0.0);
    }

    #[test]
    fn test_to_unit_clamps() {
        assert_eq!(to_unit(-1.0), 0.0);
        assert_eq!(to_unit(1.0), 1.0);
        assert_eq!(to_unit(0.0), 0.5);
        assert_eq!(to_unit(3.0), 1.0);
    }
}
