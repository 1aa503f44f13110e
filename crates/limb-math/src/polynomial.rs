//! Real roots of quadratic, cubic and quartic polynomials.
//!
//! Coefficients are given highest degree first. Every solver normalizes its
//! coefficients by the largest magnitude before testing for a vanishing
//! leading term, so the same code handles unit-sphere and planet-scale input.
//! Roots are returned in ascending order; repeated roots may appear once.

use std::f64::consts::TAU;

use crate::epsilon::{EPSILON12, EPSILON14};

/// Newton refinement steps applied to cubic and quartic roots.
const POLISH_ITERATIONS: usize = 3;

fn max_magnitude(coefficients: &[f64]) -> f64 {
    coefficients.iter().fold(0.0_f64, |acc, c| acc.max(c.abs()))
}

/// Real roots of `a·x² + b·x + c`.
///
/// Uses the cancellation-free form `q = -(b + sign(b)·√Δ) / 2`, roots `q/a`
/// and `c/q`. A vanishing `a` degrades to the linear root.
pub fn quadratic_real_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    let scale = max_magnitude(&[a, b, c]);
    if scale == 0.0 {
        return Vec::new();
    }
    let (a, b, c) = (a / scale, b / scale, c / scale);

    if a.abs() <= EPSILON14 {
        if b.abs() <= EPSILON14 {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }
    if discriminant == 0.0 {
        return vec![-b / (2.0 * a)];
    }

    // q is never zero here: the discriminant is positive.
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    let mut roots = vec![q / a, c / q];
    roots.sort_by(f64::total_cmp);
    roots
}

/// Real roots of `a·x³ + b·x² + c·x + d`.
///
/// Cardano's formula for one real root, the trigonometric form for three.
pub fn cubic_real_roots(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    let scale = max_magnitude(&[a, b, c, d]);
    if scale == 0.0 {
        return Vec::new();
    }
    if (a / scale).abs() <= EPSILON14 {
        return quadratic_real_roots(b, c, d);
    }

    let (p2, p1, p0) = (b / a, c / a, d / a);
    let shift = p2 / 3.0;
    let p = p1 - p2 * p2 / 3.0;
    let q = 2.0 * p2 * p2 * p2 / 27.0 - p2 * p1 / 3.0 + p0;

    let half_q = q / 2.0;
    let third_p = p / 3.0;
    let discriminant = half_q * half_q + third_p * third_p * third_p;

    let depressed = if discriminant > 0.0 {
        let s = discriminant.sqrt();
        vec![(-half_q + s).cbrt() + (-half_q - s).cbrt()]
    } else if third_p >= 0.0 {
        // Only reachable with p == q == 0: a triple root.
        vec![0.0]
    } else {
        let m = 2.0 * (-third_p).sqrt();
        let argument = ((3.0 * q) / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let phi = argument.acos() / 3.0;
        (0..3)
            .map(|k| m * (phi - TAU * k as f64 / 3.0).cos())
            .collect()
    };

    let monic = [1.0, p2, p1, p0];
    let mut roots: Vec<f64> = depressed
        .into_iter()
        .map(|t| polish(&monic, t - shift))
        .collect();
    roots.sort_by(f64::total_cmp);
    roots
}

/// Real roots of `a·x⁴ + b·x³ + c·x² + d·x + e`.
///
/// Ferrari's method: the depressed quartic `y⁴ + p·y² + q·y + r` is split into
/// two quadratics using the largest root of the resolvent cubic
/// `m³ + p·m² + (p²/4 − r)·m − q²/8`. Each root is polished with Newton steps
/// against the input polynomial.
pub fn quartic_real_roots(a: f64, b: f64, c: f64, d: f64, e: f64) -> Vec<f64> {
    let scale = max_magnitude(&[a, b, c, d, e]);
    if scale == 0.0 {
        return Vec::new();
    }
    if (a / scale).abs() <= EPSILON14 {
        return cubic_real_roots(b, c, d, e);
    }

    let (a3, a2, a1, a0) = (b / a, c / a, d / a, e / a);
    let shift = a3 / 4.0;
    let a3_sq = a3 * a3;
    let p = a2 - 3.0 * a3_sq / 8.0;
    let q = a1 - a3 * a2 / 2.0 + a3_sq * a3 / 8.0;
    let r = a0 - a3 * a1 / 4.0 + a3_sq * a2 / 16.0 - 3.0 * a3_sq * a3_sq / 256.0;

    let mut depressed = Vec::with_capacity(4);
    if q.abs() <= EPSILON14 * (1.0 + p.abs() + r.abs()) {
        // Biquadratic: z = y².
        for z in quadratic_real_roots(1.0, p, r) {
            if z > 0.0 {
                let y = z.sqrt();
                depressed.push(-y);
                depressed.push(y);
            } else if z > -EPSILON12 {
                depressed.push(0.0);
            }
        }
    } else {
        let resolvent = cubic_real_roots(1.0, p, p * p / 4.0 - r, -q * q / 8.0);
        let m = resolvent.into_iter().fold(f64::NEG_INFINITY, f64::max);
        if m.is_nan() || m <= 0.0 {
            return Vec::new();
        }
        let s = (2.0 * m).sqrt();
        let half_p_plus_m = p / 2.0 + m;
        let offset = q / (2.0 * s);
        depressed.extend(quadratic_real_roots(1.0, -s, half_p_plus_m + offset));
        depressed.extend(quadratic_real_roots(1.0, s, half_p_plus_m - offset));
    }

    let monic = [1.0, a3, a2, a1, a0];
    let mut roots: Vec<f64> = depressed
        .into_iter()
        .map(|y| polish(&monic, y - shift))
        .collect();
    roots.sort_by(f64::total_cmp);
    roots.dedup_by(|x, y| (*x - *y).abs() <= EPSILON12 * (1.0 + y.abs()));
    roots
}

/// Horner evaluation of the polynomial and its derivative.
fn evaluate(coefficients: &[f64], x: f64) -> (f64, f64) {
    let mut value = 0.0;
    let mut derivative = 0.0;
    for &c in coefficients {
        derivative = derivative * x + value;
        value = value * x + c;
    }
    (value, derivative)
}

fn polish(coefficients: &[f64], mut x: f64) -> f64 {
    for _ in 0..POLISH_ITERATIONS {
        let (value, derivative) = evaluate(coefficients, x);
        if derivative == 0.0 || !value.is_finite() {
            break;
        }
        let next = x - value / derivative;
        // A step that increases the residual means we're at a multiple root.
        if evaluate(coefficients, next).0.abs() > value.abs() {
            break;
        }
        x = next;
    }
    x
}
