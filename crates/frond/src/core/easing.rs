//! Numeric helpers for animation and value mapping.

/// Quadratic ease-in-out: `t` elapsed of `d` total, from `b` by change `c`.
pub fn ease_in_out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if d <= 0.0 {
        return b + c;
    }
    let mut t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t + b;
    }
    t -= 1.0;
    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
}

/// Linear interpolation towards `to` by `factor`.
pub fn lerp(from: f64, to: f64, factor: f64) -> f64 {
    (1.0 - factor) * from + factor * to
}

/// Map `value` from one range onto another. A zero-width input range maps
/// to `out_min`.
pub fn map_range(in_min: f64, in_max: f64, out_min: f64, out_max: f64, value: f64) -> f64 {
    if (in_max - in_min).abs() < f64::EPSILON {
        return out_min;
    }
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Clamp `value` into `[min, max]`.
pub fn clamp(min: f64, max: f64, value: f64) -> f64 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_endpoints() {
        assert_eq!(ease_in_out_quad(0.0, 100.0, 300.0, 500.0), 100.0);
        assert_eq!(ease_in_out_quad(250.0, 100.0, 300.0, 500.0), 250.0);
        assert!((ease_in_out_quad(500.0, 100.0, 300.0, 500.0) - 400.0).abs() < 1e-9);
        assert_eq!(ease_in_out_quad(10.0, 0.0, 50.0, 0.0), 50.0);
    }

    #[test]
    fn mapping() {
        assert_eq!(map_range(0.0, 100.0, 0.0, 10.0, 50.0), 5.0);
        assert_eq!(map_range(5.0, 5.0, 1.0, 2.0, 9.0), 1.0);
        assert_eq!(clamp(0.0, 1.0, 3.0), 1.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }
}
