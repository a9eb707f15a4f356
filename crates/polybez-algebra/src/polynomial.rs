//! Dense univariate polynomials over `f64`.
//!
//! Coefficients are stored low order first: `coeffs[i]` is the coefficient
//! of `x^i`. All arithmetic returns new values; the only mutation is the
//! explicit [`Polynomial::set_coeff`].

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use polybez_core::{Result, Tolerance};
use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::roots;

/// Highest index of `coeffs` whose magnitude exceeds the tolerance.
///
/// The effective degree of a polynomial, as opposed to its stored length:
/// cancellation can leave negligible high-order coefficients behind.
pub fn real_order(coeffs: &[f64], tol: Tolerance) -> usize {
    let mut order = 0;
    for (i, &c) in coeffs.iter().enumerate() {
        if !tol.is_negligible(c) {
            order = i;
        }
    }
    order
}

/// A dense polynomial with real coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Create a polynomial from coefficients, lowest order first.
    ///
    /// An empty vector yields the zero polynomial `[0]`.
    pub fn new(coeffs: Vec<f64>) -> Self {
        if coeffs.is_empty() {
            Self { coeffs: vec![0.0] }
        } else {
            Self { coeffs }
        }
    }

    /// The constant polynomial `c`.
    pub fn constant(c: f64) -> Self {
        Self { coeffs: vec![c] }
    }

    /// The single term `coefficient * x^power`.
    pub fn term(power: usize, coefficient: f64) -> Self {
        let mut coeffs = vec![0.0; power + 1];
        coeffs[power] = coefficient;
        Self { coeffs }
    }

    /// The identity polynomial `x`.
    pub fn x() -> Self {
        Self {
            coeffs: vec![0.0, 1.0],
        }
    }

    /// Stored order: number of coefficients minus one.
    pub fn order(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Coefficient of `x^index`; reads `0` beyond the stored order so
    /// polynomials of different lengths combine without resizing.
    pub fn coeff(&self, index: usize) -> f64 {
        self.coeffs.get(index).copied().unwrap_or(0.0)
    }

    /// Overwrite the coefficient of `x^index`.
    ///
    /// Panics if `index` is past the stored order; there is no implicit
    /// growth on write.
    pub fn set_coeff(&mut self, index: usize, value: f64) {
        self.coeffs[index] = value;
    }

    /// Evaluate at a real point by Horner's scheme.
    pub fn eval(&self, x: f64) -> f64 {
        let mut acc = 0.0;
        for &c in self.coeffs.iter().rev() {
            acc = acc * x + c;
        }
        acc
    }

    /// Evaluate at a complex point by Horner's scheme.
    pub fn eval_complex(&self, x: Complex) -> Complex {
        let mut acc = Complex::ZERO;
        for &c in self.coeffs.iter().rev() {
            acc = acc * x + Complex::from(c);
        }
        acc
    }

    /// Raise to a non-negative integer power by repeated convolution.
    pub fn pow(&self, n: u32) -> Polynomial {
        let mut res = Polynomial::constant(1.0);
        for _ in 0..n {
            res = &res * self;
        }
        res
    }

    /// First derivative. The derivative of a constant is the zero polynomial.
    pub fn derivative(&self) -> Polynomial {
        if self.coeffs.len() == 1 {
            return Polynomial::constant(0.0);
        }
        let coeffs = self.coeffs[1..]
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as f64 + 1.0) * c)
            .collect();
        Polynomial::new(coeffs)
    }

    /// Antiderivative with `constant` as the new term of order zero.
    pub fn integral(&self, constant: f64) -> Polynomial {
        let mut coeffs = Vec::with_capacity(self.coeffs.len() + 1);
        coeffs.push(constant);
        for (i, &c) in self.coeffs.iter().enumerate() {
            coeffs.push(c / (i as f64 + 1.0));
        }
        Polynomial::new(coeffs)
    }

    /// Rescale so the highest non-negligible coefficient becomes `1`,
    /// dropping negligible coefficients above it and zeroing negligible
    /// ones below it.
    pub fn normalize(&self, tol: Tolerance) -> Polynomial {
        let mut order = 0;
        let mut high = 1.0;
        for (i, &c) in self.coeffs.iter().enumerate() {
            if !tol.is_negligible(c) {
                order = i;
                high = c;
            }
        }
        let coeffs = self.coeffs[..=order]
            .iter()
            .map(|&c| if tol.is_negligible(c) { 0.0 } else { c / high })
            .collect();
        Polynomial::new(coeffs)
    }

    /// Drop trailing negligible coefficients without rescaling.
    pub fn trim(&self, tol: Tolerance) -> Polynomial {
        let order = real_order(&self.coeffs, tol);
        let coeffs = self.coeffs[..=order]
            .iter()
            .map(|&c| if tol.is_negligible(c) { 0.0 } else { c })
            .collect();
        Polynomial::new(coeffs)
    }

    /// Effective degree under the given tolerance.
    pub fn real_order(&self, tol: Tolerance) -> usize {
        real_order(&self.coeffs, tol)
    }

    /// Whether the closed-form solver covers this polynomial.
    pub fn can_solve_real_roots(&self, tol: Tolerance) -> bool {
        roots::can_solve_analytically(&self.coeffs, tol)
    }

    /// Closed-form real roots; effective order 4 at most.
    pub fn real_roots(&self, tol: Tolerance) -> Result<Vec<f64>> {
        roots::solve_real_roots(&self.coeffs, tol)
    }

    /// All complex roots by Durand-Kerner iteration, any order.
    pub fn find_roots(&self, tol: Tolerance) -> Result<Vec<Complex>> {
        roots::find_roots(&self.coeffs, tol, roots::DEFAULT_MAX_ITERATIONS)
    }

    /// Real roots by the closed-form solver when possible, otherwise by
    /// filtering the iterative solver's output to negligible imaginary parts.
    pub fn solve_or_find_real_roots(&self, tol: Tolerance) -> Result<Vec<f64>> {
        roots::solve_or_find_real_roots(&self.coeffs, tol)
    }

    /// The unique polynomial of degree `ys.len() - 1` at most through the
    /// points `(i, ys[i])`, by Lagrange's formula. Needs at least 2 samples.
    pub fn interpolate(ys: &[f64], tol: Tolerance) -> Result<Polynomial> {
        if ys.len() < 2 {
            return Err(polybez_core::Error::InvalidArgument(
                "interpolation needs at least 2 samples".into(),
            ));
        }
        let mut res = Polynomial::constant(0.0);
        for (i, &y) in ys.iter().enumerate() {
            let mut basis = Polynomial::constant(1.0);
            for j in 0..ys.len() {
                if j == i {
                    continue;
                }
                basis = &basis * &(Polynomial::new(vec![-(j as f64), 1.0]) / (i as f64 - j as f64));
            }
            res = res + y * basis;
        }
        Ok(res.trim(tol))
    }
}

fn add_coeffs(a: &[f64], b: &[f64]) -> Vec<f64> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| a.get(i).copied().unwrap_or(0.0) + b.get(i).copied().unwrap_or(0.0))
        .collect()
}

fn sub_coeffs(a: &[f64], b: &[f64]) -> Vec<f64> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| a.get(i).copied().unwrap_or(0.0) - b.get(i).copied().unwrap_or(0.0))
        .collect()
}

fn mul_coeffs(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut res = vec![0.0; a.len() + b.len() - 1];
    for (i, &ca) in a.iter().enumerate() {
        for (j, &cb) in b.iter().enumerate() {
            res[i + j] += ca * cb;
        }
    }
    res
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial::new(self.coeffs.iter().map(|&c| -c).collect())
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        -&self
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        Polynomial::new(add_coeffs(&self.coeffs, &rhs.coeffs))
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Polynomial) -> Polynomial {
        &self + &rhs
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        Polynomial::new(sub_coeffs(&self.coeffs, &rhs.coeffs))
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: Polynomial) -> Polynomial {
        &self - &rhs
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        Polynomial::new(mul_coeffs(&self.coeffs, &rhs.coeffs))
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Polynomial) -> Polynomial {
        &self * &rhs
    }
}

impl Mul<f64> for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: f64) -> Polynomial {
        Polynomial::new(self.coeffs.iter().map(|&c| c * rhs).collect())
    }
}

impl Mul<f64> for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: f64) -> Polynomial {
        &self * rhs
    }
}

impl Mul<&Polynomial> for f64 {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        rhs * self
    }
}

impl Mul<Polynomial> for f64 {
    type Output = Polynomial;

    fn mul(self, rhs: Polynomial) -> Polynomial {
        &rhs * self
    }
}

impl Div<f64> for &Polynomial {
    type Output = Polynomial;

    fn div(self, rhs: f64) -> Polynomial {
        Polynomial::new(self.coeffs.iter().map(|&c| c / rhs).collect())
    }
}

impl Div<f64> for Polynomial {
    type Output = Polynomial;

    fn div(self, rhs: f64) -> Polynomial {
        &self / rhs
    }
}

impl Add<f64> for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: f64) -> Polynomial {
        let mut coeffs = self.coeffs.clone();
        coeffs[0] += rhs;
        Polynomial::new(coeffs)
    }
}

impl Add<f64> for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: f64) -> Polynomial {
        &self + rhs
    }
}

impl Add<&Polynomial> for f64 {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        rhs + self
    }
}

impl Add<Polynomial> for f64 {
    type Output = Polynomial;

    fn add(self, rhs: Polynomial) -> Polynomial {
        &rhs + self
    }
}

impl Sub<f64> for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: f64) -> Polynomial {
        self + (-rhs)
    }
}

impl Sub<f64> for Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: f64) -> Polynomial {
        &self + (-rhs)
    }
}

impl Sub<&Polynomial> for f64 {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        -rhs + self
    }
}

impl Sub<Polynomial> for f64 {
    type Output = Polynomial;

    fn sub(self, rhs: Polynomial) -> Polynomial {
        -&rhs + self
    }
}

impl approx::AbsDiffEq for Polynomial {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        Tolerance::DEFAULT_EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        let len = self.coeffs.len().max(other.coeffs.len());
        (0..len).all(|i| (self.coeff(i) - other.coeff(i)).abs() <= epsilon)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let eps = Tolerance::DEFAULT_EPSILON;
        let mut printed = false;
        for (i, &val) in self.coeffs.iter().enumerate() {
            if val.abs() <= eps {
                continue;
            }
            if val > 0.0 && printed {
                write!(f, "+")?;
            }
            if i > 0 && (val.abs() - 1.0).abs() <= eps {
                if val < 0.0 {
                    write!(f, "-")?;
                }
            } else {
                write!(f, "{}", val)?;
            }
            if i > 0 {
                write!(f, "x")?;
            }
            if i > 1 {
                write!(f, "^{}", i)?;
            }
            printed = true;
        }
        if !printed {
            write!(f, "0")?;
        }
        Ok(())
    }
}
