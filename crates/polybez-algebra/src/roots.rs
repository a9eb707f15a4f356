//! Polynomial root solvers.
//!
//! Closed-form solving covers effective orders 1 through 4: the linear and
//! quadratic formulas, Cardano's depressed cubic, and the resolvent-cubic
//! factorization of the depressed quartic. Arbitrary order is handled by
//! the Durand-Kerner simultaneous iteration over the complex plane.

use std::f64::consts::PI;

use polybez_core::{Error, Result, Tolerance};

use crate::complex::Complex;
use crate::polynomial::{real_order, Polynomial};

/// Iteration budget for [`find_roots`] before it reports non-convergence.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Whether the closed-form ladder covers the polynomial's effective order.
pub fn can_solve_analytically(coeffs: &[f64], tol: Tolerance) -> bool {
    real_order(coeffs, tol) <= 4
}

/// Closed-form real roots for effective order 4 at most.
///
/// Order 0 yields no roots, whether the polynomial is identically zero or a
/// nonzero constant. Higher orders return [`Error::UnsupportedOrder`]; use
/// [`find_roots`] or [`solve_or_find_real_roots`] instead.
pub fn solve_real_roots(coeffs: &[f64], tol: Tolerance) -> Result<Vec<f64>> {
    let mut roots = Vec::new();
    match real_order(coeffs, tol) {
        0 => {}
        1 => roots.push(-coeffs[0] / coeffs[1]),
        2 => solve_quadratic(coeffs[0], coeffs[1], coeffs[2], tol, &mut roots),
        3 => solve_cubic(coeffs[0], coeffs[1], coeffs[2], coeffs[3], tol, &mut roots),
        4 => solve_quartic(coeffs, tol, &mut roots)?,
        order => return Err(Error::UnsupportedOrder(order)),
    }
    Ok(roots)
}

fn solve_quadratic(c0: f64, c1: f64, c2: f64, tol: Tolerance, out: &mut Vec<f64>) {
    let delta = c1 * c1 - 4.0 * c2 * c0;
    if delta < 0.0 {
        return;
    }
    let sd = delta.sqrt();
    out.push((-c1 - sd) / (2.0 * c2));
    // a vanishing discriminant is a double root, reported once
    if sd > tol.epsilon() {
        out.push((-c1 + sd) / (2.0 * c2));
    }
}

fn solve_cubic(c0: f64, c1: f64, c2: f64, c3: f64, tol: Tolerance, out: &mut Vec<f64>) {
    let eps = tol.epsilon();
    // monic x^3 + a x^2 + b x + c, depressed by x = t - a/3 to t^3 + p t + q
    let a = c2 / c3;
    let b = c1 / c3;
    let c = c0 / c3;
    let p = b - a * a / 3.0;
    let q = (2.0 * a * a * a - 9.0 * a * b + 27.0 * c) / 27.0;
    let shift = -a / 3.0;
    if p.abs() <= eps {
        // t^3 = -q
        out.push((-q).cbrt() + shift);
    } else if q.abs() <= eps {
        // t (t^2 + p) = 0
        out.push(shift);
        if p < 0.0 {
            let r = (-p).sqrt();
            out.push(r + shift);
            out.push(-r + shift);
        }
    } else {
        let disc = q * q / 4.0 + p * p * p / 27.0;
        if disc < -eps {
            // three distinct real roots, Viete's trigonometric form
            let r = (-p * p * p / 27.0).sqrt();
            let phi = (-q / (2.0 * r)).clamp(-1.0, 1.0).acos();
            let t1 = 2.0 * r.cbrt();
            out.push(t1 * (phi / 3.0).cos() + shift);
            out.push(t1 * ((phi + 2.0 * PI) / 3.0).cos() + shift);
            out.push(t1 * ((phi + 4.0 * PI) / 3.0).cos() + shift);
        } else if disc <= eps {
            // repeated-root boundary
            let cq = (q / 2.0).cbrt();
            out.push(-2.0 * cq + shift);
            out.push(cq + shift);
        } else {
            // one real root, Cardano's radicals
            let sd = disc.sqrt();
            out.push((-q / 2.0 + sd).cbrt() - (q / 2.0 + sd).cbrt() + shift);
        }
    }
}

fn solve_quartic(coeffs: &[f64], tol: Tolerance, out: &mut Vec<f64>) -> Result<()> {
    let eps = tol.epsilon();
    // monic x^4 + b x^3 + c x^2 + d x + e, depressed by x = y - b/4
    // to y^4 + p y^2 + q y + r
    let b = coeffs[3] / coeffs[4];
    let c = coeffs[2] / coeffs[4];
    let d = coeffs[1] / coeffs[4];
    let e = coeffs[0] / coeffs[4];
    let p = c - 3.0 * b * b / 8.0;
    let q = (b * b * b - 4.0 * b * c + 8.0 * d) / 8.0;
    let r = (-3.0 * b * b * b * b + 256.0 * e - 64.0 * b * d + 16.0 * b * b * c) / 256.0;
    let shift = -b / 4.0;

    if q.abs() <= eps {
        // biquadratic: z = y^2 solves z^2 + p z + r = 0
        for z in solve_real_roots(&[r, p, 1.0], tol)? {
            if z < -eps {
                continue;
            }
            if z <= eps {
                out.push(shift);
                continue;
            }
            let y = z.sqrt();
            out.push(y + shift);
            out.push(-y + shift);
        }
        return Ok(());
    }

    // (y^2 + p + m)^2 = (p + 2m) y^2 - q y + (m^2 + 2mp + p^2 - r) becomes a
    // perfect square for any root m of the resolvent cubic with p + 2m > 0
    let resolvent = [
        p * p * p / 2.0 - p * r / 2.0 - q * q / 8.0,
        2.0 * p * p - r,
        2.5 * p,
        1.0,
    ];
    let m = solve_real_roots(&resolvent, tol)?
        .into_iter()
        .find(|&m| p + 2.0 * m > eps)
        .ok_or_else(|| Error::Numerical("no usable resolvent-cubic root for quartic".into()))?;

    let s = (p + 2.0 * m).sqrt();
    let mut ys = Vec::with_capacity(4);
    solve_quadratic(p + m - q / (2.0 * s), s, 1.0, tol, &mut ys);
    solve_quadratic(p + m + q / (2.0 * s), -s, 1.0, tol, &mut ys);
    out.extend(ys.into_iter().map(|y| y + shift));
    Ok(())
}

/// All complex roots by the Durand-Kerner (Weierstrass) method.
///
/// The polynomial is normalized first; effective order 0 yields no roots.
/// Initial guesses are the powers of `0.4 + 0.9i`, which keeps the seeds
/// distinct and off the real axis. Every sweep updates all roots from the
/// previous iterate's complete root set. Returns order-many values, not
/// deduplicated and not sorted; conjugate pairs appear for non-real roots.
///
/// Fails with [`Error::NonConvergence`] once `max_iterations` sweeps pass
/// without every component settling within tolerance.
pub fn find_roots(coeffs: &[f64], tol: Tolerance, max_iterations: usize) -> Result<Vec<Complex>> {
    let p = Polynomial::new(coeffs.to_vec()).normalize(tol);
    let order = p.order();
    if order == 0 {
        return Ok(Vec::new());
    }

    let seed = Complex::new(0.4, 0.9);
    let mut current = Vec::with_capacity(order);
    let mut x = Complex::ONE;
    for _ in 0..order {
        current.push(x);
        x = x * seed;
    }

    let mut next = vec![Complex::ZERO; order];
    for _ in 0..max_iterations {
        for i in 0..order {
            let mut div = Complex::ONE;
            for j in 0..order {
                if j != i {
                    div = div * (current[i] - current[j]);
                }
            }
            next[i] = current[i] - p.eval_complex(current[i]) / div;
        }
        let converged = current.iter().zip(&next).all(|(a, b)| {
            tol.is_negligible(a.re - b.re) && tol.is_negligible(a.im - b.im)
        });
        std::mem::swap(&mut current, &mut next);
        if converged {
            return Ok(current);
        }
    }
    Err(Error::NonConvergence {
        iterations: max_iterations,
    })
}

/// Real roots through the closed-form solver when the effective order
/// allows it, otherwise through [`find_roots`] filtered to roots with a
/// negligible imaginary part.
///
/// Distance queries land here because squaring and composing curve
/// polynomials grows the degree past 4 quickly.
pub fn solve_or_find_real_roots(coeffs: &[f64], tol: Tolerance) -> Result<Vec<f64>> {
    if can_solve_analytically(coeffs, tol) {
        solve_real_roots(coeffs, tol)
    } else {
        Ok(find_roots(coeffs, tol, DEFAULT_MAX_ITERATIONS)?
            .into_iter()
            .filter(|c| tol.is_negligible(c.im))
            .map(|c| c.re)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_roots_vanish(coeffs: &[f64], roots: &[f64], tol: Tolerance) {
        let p = Polynomial::new(coeffs.to_vec());
        for &r in roots {
            let v = p.eval(r);
            assert!(
                v.abs() <= tol.epsilon(),
                "residual {} at root {} of {}",
                v,
                r,
                p
            );
        }
    }

    #[test]
    fn test_linear() {
        let tol = Tolerance::default();
        let roots = solve_real_roots(&[-3.0, 2.0], tol).unwrap();
        assert_eq!(roots, vec![1.5]);
    }

    #[test]
    fn test_quadratic_two_roots() {
        let tol = Tolerance::default();
        // (x - 1)(x + 2) = x^2 + x - 2
        let coeffs = [-2.0, 1.0, 1.0];
        let roots = solve_real_roots(&coeffs, tol).unwrap();
        assert_eq!(roots.len(), 2);
        assert!(roots[0] < roots[1]);
        assert_roots_vanish(&coeffs, &roots, tol);
    }

    #[test]
    fn test_quadratic_double_root_deduplicated() {
        let tol = Tolerance::default();
        // (x - 2)^2
        let roots = solve_real_roots(&[4.0, -4.0, 1.0], tol).unwrap();
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 2.0).abs() <= tol.epsilon());
    }

    #[test]
    fn test_quadratic_no_real_roots() {
        let tol = Tolerance::default();
        let roots = solve_real_roots(&[1.0, 0.0, 1.0], tol).unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn test_cubic_three_roots() {
        let tol = Tolerance::default();
        // (x - 1)(x - 2)(x + 3) = x^3 - 7x + 6
        let coeffs = [6.0, -7.0, 0.0, 1.0];
        let roots = solve_real_roots(&coeffs, tol).unwrap();
        assert_eq!(roots.len(), 3);
        assert_roots_vanish(&coeffs, &roots, tol);
    }

    #[test]
    fn test_cubic_single_root() {
        let tol = Tolerance::default();
        // x^3 + x + 1, one real root near -0.6823
        let coeffs = [1.0, 1.0, 0.0, 1.0];
        let roots = solve_real_roots(&coeffs, tol).unwrap();
        assert_eq!(roots.len(), 1);
        assert_roots_vanish(&coeffs, &roots, tol);
    }

    #[test]
    fn test_cubic_zero_q_branch() {
        let tol = Tolerance::default();
        // x^3 - 4x = x (x - 2)(x + 2), already depressed with q = 0
        let coeffs = [0.0, -4.0, 0.0, 1.0];
        let roots = solve_real_roots(&coeffs, tol).unwrap();
        assert_eq!(roots.len(), 3);
        assert_roots_vanish(&coeffs, &roots, tol);
    }

    #[test]
    fn test_cubic_zero_p_branch() {
        let tol = Tolerance::default();
        // x^3 - 8, p = 0 after depression
        let coeffs = [-8.0, 0.0, 0.0, 1.0];
        let roots = solve_real_roots(&coeffs, tol).unwrap();
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 2.0).abs() <= tol.epsilon());
    }

    #[test]
    fn test_quartic_four_roots() {
        let tol = Tolerance::default();
        // (x - 1)(x + 1)(x - 3)(x + 2) = x^4 - x^3 - 7x^2 + x + 6
        let coeffs = [6.0, 1.0, -7.0, -1.0, 1.0];
        let roots = solve_real_roots(&coeffs, tol).unwrap();
        assert_eq!(roots.len(), 4);
        assert_roots_vanish(&coeffs, &roots, tol);
    }

    #[test]
    fn test_quartic_biquadratic_branch() {
        let tol = Tolerance::default();
        // x^4 - 5x^2 + 4 = (x^2 - 1)(x^2 - 4), q = 0 after depression
        let coeffs = [4.0, 0.0, -5.0, 0.0, 1.0];
        let roots = solve_real_roots(&coeffs, tol).unwrap();
        assert_eq!(roots.len(), 4);
        assert_roots_vanish(&coeffs, &roots, tol);
    }

    #[test]
    fn test_order_above_four_unsupported() {
        let tol = Tolerance::default();
        let err = solve_real_roots(&[1.0, 0.0, 0.0, 0.0, 0.0, 1.0], tol).unwrap_err();
        assert!(matches!(err, Error::UnsupportedOrder(5)));
    }

    #[test]
    fn test_constant_has_no_roots() {
        let tol = Tolerance::default();
        assert!(solve_real_roots(&[3.0], tol).unwrap().is_empty());
        assert!(solve_real_roots(&[0.0], tol).unwrap().is_empty());
    }

    #[test]
    fn test_find_roots_residuals() {
        let tol = Tolerance::default();
        for coeffs in [
            vec![0.5, 1.0, -1.0, 0.0, 1.0],
            vec![-2.0, 1.0, 1.0],
            vec![6.0, -7.0, 0.0, 1.0],
        ] {
            let p = Polynomial::new(coeffs.clone());
            let roots = find_roots(&coeffs, tol, DEFAULT_MAX_ITERATIONS).unwrap();
            assert_eq!(roots.len(), p.real_order(tol));
            for r in roots {
                let v = p.eval_complex(r);
                assert!(
                    tol.is_negligible(v.re) && tol.is_negligible(v.im),
                    "residual {} at root {} of {}",
                    v,
                    r,
                    p
                );
            }
        }
    }

    #[test]
    fn test_find_roots_conjugate_pair() {
        let tol = Tolerance::default();
        // x^2 + 1 has roots +/- i
        let roots = find_roots(&[1.0, 0.0, 1.0], tol, DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(roots.len(), 2);
        for r in &roots {
            assert!(tol.is_negligible(r.re));
            assert!(tol.eq(r.im.abs(), 1.0));
        }
    }

    #[test]
    fn test_find_roots_iteration_budget() {
        let tol = Tolerance::tight();
        let err = find_roots(&[0.5, 1.0, -1.0, 0.0, 1.0], tol, 1).unwrap_err();
        assert!(matches!(err, Error::NonConvergence { iterations: 1 }));
    }

    #[test]
    fn test_closed_form_and_iterative_agree_on_quartic() {
        let tol = Tolerance::default();
        let coeffs = [0.5, 1.0, -1.0, 0.0, 1.0];
        let mut solved = solve_real_roots(&coeffs, tol).unwrap();
        let mut found = solve_or_find_real_roots(&coeffs, tol).unwrap();
        // force the iterative path for the comparison
        let mut iterated: Vec<f64> = find_roots(&coeffs, tol, DEFAULT_MAX_ITERATIONS)
            .unwrap()
            .into_iter()
            .filter(|c| tol.is_negligible(c.im))
            .map(|c| c.re)
            .collect();
        solved.sort_by(f64::total_cmp);
        found.sort_by(f64::total_cmp);
        iterated.sort_by(f64::total_cmp);
        assert_eq!(solved.len(), iterated.len());
        assert_eq!(solved, found);
        for (a, b) in solved.iter().zip(&iterated) {
            assert!(
                (a - b).abs() <= 10.0 * tol.epsilon(),
                "closed-form {} vs iterative {}",
                a,
                b
            );
        }
    }

    #[test]
    fn test_solve_or_find_high_order() {
        let tol = Tolerance::default();
        // x^5 - x = x (x^4 - 1), real roots -1, 0, 1
        let coeffs = [0.0, -1.0, 0.0, 0.0, 0.0, 1.0];
        let mut roots = solve_or_find_real_roots(&coeffs, tol).unwrap();
        roots.sort_by(f64::total_cmp);
        assert_eq!(roots.len(), 3);
        assert_roots_vanish(&coeffs, &roots, tol);
    }
}
