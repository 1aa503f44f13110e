//! Solve `uᵀ·A·u + bᵀ·u + c = 0` for unit 2D vectors `u`.
//!
//! Writing `u = (x, y)` and substituting `y² = 1 − x²` leaves
//! `L(x) + y·R(x) = 0` with `L` quadratic and `R` linear in `x`. Squaring
//! gives the quartic `L² + (x² − 1)·R² = 0`; the sign of `y` for each root is
//! recovered from `y = −L / R`.

use glam::{DMat2, DVec2};

use crate::epsilon::{EPSILON6, EPSILON8, EPSILON12, EPSILON15};
use crate::polynomial::{quadratic_real_roots, quartic_real_roots};

/// Up to four unit vectors `u` satisfying `uᵀ·A·u + bᵀ·u + c = 0`.
///
/// Only the symmetric part of `a` contributes. Every returned vector has been
/// checked against the input expression, relative to the magnitude of the
/// coefficients; near-coincident solutions are merged. An identically zero
/// expression (every `u` is a solution) returns no solutions.
pub fn quadratic_vector_expression(a: DMat2, b: DVec2, c: f64) -> Vec<DVec2> {
    let a11 = a.x_axis.x;
    let a22 = a.y_axis.y;
    let a12_twice = a.x_axis.y + a.y_axis.x;

    let l2 = a11 - a22;
    let l1 = b.x;
    let l0 = a22 + c;
    let r1 = a12_twice;
    let r0 = b.y;

    let scale = [l2, l1, l0, r1, r0]
        .iter()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return Vec::new();
    }

    let mut candidates = Vec::with_capacity(4);

    if r1.abs() <= EPSILON15 * scale && r0.abs() <= EPSILON15 * scale {
        // No odd term in y: both signs of y solve the equation.
        for cosine in quadratic_real_roots(l2, l1, l0) {
            if let Some(sine) = sine_for(cosine) {
                candidates.push(DVec2::new(cosine.clamp(-1.0, 1.0), -sine));
                if sine != 0.0 {
                    candidates.push(DVec2::new(cosine.clamp(-1.0, 1.0), sine));
                }
            }
        }
    } else {
        let a4 = l2 * l2 + r1 * r1;
        let a3 = 2.0 * (l1 * l2 + r0 * r1);
        let a2 = l1 * l1 + 2.0 * l0 * l2 + r0 * r0 - r1 * r1;
        let a1 = 2.0 * (l0 * l1 - r0 * r1);
        let a0 = l0 * l0 - r0 * r0;

        for cosine in quartic_real_roots(a4, a3, a2, a1, a0) {
            let Some(sine) = sine_for(cosine) else {
                continue;
            };
            let cosine = cosine.clamp(-1.0, 1.0);
            let left = (l2 * cosine + l1) * cosine + l0;
            let right = r1 * cosine + r0;

            if left.abs() <= EPSILON12 * scale || right.abs() <= EPSILON12 * scale {
                candidates.push(DVec2::new(cosine, -sine));
                if sine != 0.0 {
                    candidates.push(DVec2::new(cosine, sine));
                }
            } else if left * right < 0.0 {
                candidates.push(DVec2::new(cosine, sine));
            } else {
                candidates.push(DVec2::new(cosine, -sine));
            }
        }
    }

    let residual_tolerance = EPSILON6 * scale.max(c.abs());
    let mut solutions: Vec<DVec2> = Vec::with_capacity(candidates.len());
    for u in candidates {
        let residual = u.dot(a * u) + b.dot(u) + c;
        if residual.abs() > residual_tolerance {
            continue;
        }
        if solutions
            .iter()
            .any(|s| s.distance_squared(u) <= EPSILON12)
        {
            continue;
        }
        solutions.push(u);
    }
    solutions
}

/// `√(1 − cos²)` for cosines inside the unit interval (with a small slack for
/// round-off); `None` for roots that cannot be a cosine.
fn sine_for(cosine: f64) -> Option<f64> {
    if cosine.abs() > 1.0 + EPSILON8 {
        return None;
    }
    Some((1.0 - cosine * cosine).max(0.0).sqrt())
}
