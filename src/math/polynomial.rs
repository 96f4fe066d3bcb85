use std::f64::consts::TAU;

/// Solves `a·x² + b·x + c = 0`.
///
/// Returns the real solutions with the larger first, or `None` if there
/// are none. A single solution (double root, or the linear case `a == 0`)
/// is repeated in both slots. With `a == b == c == 0` every `x` solves the
/// equation and `(0, 0)` is returned.
#[must_use]
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if a == 0.0 {
        if b == 0.0 {
            return (c == 0.0).then_some((0.0, 0.0));
        }
        let solution = -c / b;
        return Some((solution, solution));
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root_discriminant = discriminant.sqrt();
    let solution1 = (-b + root_discriminant) / (2.0 * a);
    let solution2 = (-b - root_discriminant) / (2.0 * a);
    if solution1 > solution2 {
        Some((solution1, solution2))
    } else {
        Some((solution2, solution1))
    }
}

/// Real roots of `a·x³ + b·x² + c·x + d = 0`, in ascending order.
///
/// Falls back to [`solve_quadratic`] when the cubic coefficient is
/// negligible next to the others. Repeated roots are reported once.
#[must_use]
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    let scale = b.abs().max(c.abs()).max(d.abs());
    if a.abs() <= 1e-12 * scale || a == 0.0 {
        return match solve_quadratic(b, c, d) {
            Some((r1, r2)) if r1 == r2 => vec![r1],
            Some((r1, r2)) => vec![r2, r1],
            None => Vec::new(),
        };
    }

    // Depressed cubic t³ + p·t + q = 0 with x = t - b/3a.
    let (b, c, d) = (b / a, c / a, d / a);
    let shift = -b / 3.0;
    let p = (3.0 * c - b * b) / 3.0;
    let q = (2.0 * b * b * b - 9.0 * b * c + 27.0 * d) / 27.0;
    let discriminant = q * q / 4.0 + p * p * p / 27.0;

    let mut roots = if discriminant > 1e-14 {
        let root_discriminant = discriminant.sqrt();
        let u = (-q / 2.0 + root_discriminant).cbrt();
        let v = (-q / 2.0 - root_discriminant).cbrt();
        vec![u + v + shift]
    } else if discriminant >= -1e-14 {
        let u = (-q / 2.0).cbrt();
        if u == 0.0 {
            vec![shift]
        } else {
            vec![2.0 * u + shift, -u + shift]
        }
    } else {
        let r = (-p * p * p / 27.0).sqrt();
        let phi = (-q / (2.0 * r)).clamp(-1.0, 1.0).acos();
        let m = 2.0 * r.cbrt();
        (0..3)
            .map(|k| m * ((phi + TAU * f64::from(k)) / 3.0).cos() + shift)
            .collect()
    };

    roots.sort_by(f64::total_cmp);
    roots
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn quadratic_two_roots_larger_first() {
        // (x - 1)(x + 2) = x² + x - 2
        let (r1, r2) = solve_quadratic(1.0, 1.0, -2.0).unwrap();
        assert_abs_diff_eq!(r1, 1.0);
        assert_abs_diff_eq!(r2, -2.0);

        let (r1, r2) = solve_quadratic(-1.0, -1.0, 2.0).unwrap();
        assert_abs_diff_eq!(r1, 1.0);
        assert_abs_diff_eq!(r2, -2.0);
    }

    #[test]
    fn quadratic_repeated_and_missing_roots() {
        assert_eq!(solve_quadratic(1.0, -2.0, 1.0), Some((1.0, 1.0)));
        assert_eq!(solve_quadratic(1.0, 0.0, 1.0), None);
    }

    #[test]
    fn quadratic_linear_cases() {
        assert_eq!(solve_quadratic(0.0, 2.0, -4.0), Some((2.0, 2.0)));
        assert_eq!(solve_quadratic(0.0, 0.0, 1.0), None);
        assert_eq!(solve_quadratic(0.0, 0.0, 0.0), Some((0.0, 0.0)));
    }

    #[test]
    fn cubic_three_roots() {
        // (x - 1)(x - 2)(x - 3) = x³ - 6x² + 11x - 6
        let roots = solve_cubic(1.0, -6.0, 11.0, -6.0);
        assert_eq!(roots.len(), 3);
        for (root, expected) in roots.iter().zip([1.0, 2.0, 3.0]) {
            assert_abs_diff_eq!(*root, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn cubic_single_root() {
        // x³ + x + 2 = (x + 1)(x² - x + 2)
        let roots = solve_cubic(1.0, 0.0, 1.0, 2.0);
        assert_eq!(roots.len(), 1);
        assert_abs_diff_eq!(roots[0], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn cubic_double_root() {
        // (x - 1)²(x + 2) = x³ - 3x + 2
        let roots = solve_cubic(1.0, 0.0, -3.0, 2.0);
        assert_eq!(roots.len(), 2);
        assert_abs_diff_eq!(roots[0], -2.0, epsilon = 1e-7);
        assert_abs_diff_eq!(roots[1], 1.0, epsilon = 1e-7);
    }

    #[test]
    fn cubic_degenerates_to_quadratic() {
        let roots = solve_cubic(0.0, 1.0, 1.0, -2.0);
        assert_eq!(roots.len(), 2);
        assert_abs_diff_eq!(roots[0], -2.0);
        assert_abs_diff_eq!(roots[1], 1.0);
        assert!(solve_cubic(0.0, 0.0, 0.0, 5.0).is_empty());
    }
}
