//! Lagrange basis coefficients at x = 0.
//!
//! # Formula
//! For distinct public positions x_1, ..., x_t the coefficient of x_k is
//! ```text
//! L_k(0) = ∏_{j ≠ k} (0 - x_j) / (x_k - x_j)
//! ```
//! These satisfy ∑_k L_k(0) · f(x_k) = f(0) for any polynomial f of degree < t.
//!
//! Floating-point coefficients drive scoring; the exact [`Fraction`] form is
//! what hints and explanations show when every position is an integer.

use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Float, One, Signed, ToPrimitive, Zero};

use crate::error::ParseFractionError;

/// Numerator and denominator products of the basis polynomial for `xs[k]`.
///
/// Products run over `xs` in slice order, so a sorted slice gives a
/// reproducible rounding sequence.
pub fn basis_at_zero<T: Float>(k: usize, xs: &[T]) -> (T, T) {
    let x_k = xs[k];
    let mut num = T::one();
    let mut den = T::one();
    for (j, &x_j) in xs.iter().enumerate() {
        if j == k {
            continue;
        }
        num = num * (T::zero() - x_j);
        den = den * (x_k - x_j);
    }
    (num, den)
}

/// Coefficient L_k(0) for the position at index `k` of `xs`.
///
/// `xs` must hold pairwise-distinct values; rosters guarantee this at load time.
pub fn lagrange_coefficient<T: Float>(k: usize, xs: &[T]) -> T {
    let (num, den) = basis_at_zero(k, xs);
    debug_assert!(!den.is_zero(), "duplicate public positions");
    num / den
}

/// All coefficients for `xs`, in the same order as `xs`.
pub fn lagrange_coefficients<T: Float>(xs: &[T]) -> Vec<T> {
    (0..xs.len()).map(|k| lagrange_coefficient(k, xs)).collect()
}

/// Exact coefficient for integer positions, or `None` if two positions collide.
pub fn exact_coefficient(k: usize, xs: &[i64]) -> Option<Fraction> {
    let x_k = BigInt::from(xs[k]);
    let mut num = BigInt::one();
    let mut den = BigInt::one();
    for (j, &x_j) in xs.iter().enumerate() {
        if j == k {
            continue;
        }
        let x_j = BigInt::from(x_j);
        num *= -&x_j;
        den *= &x_k - &x_j;
    }
    Fraction::new(num, den)
}

/// `Some(n)` if `x` is a whole number representable as `i64`.
pub fn as_integer(x: f64) -> Option<i64> {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        Some(x as i64)
    } else {
        None
    }
}

/// A reduced rational with a positive denominator.
#[derive(Clone, PartialEq, Eq)]
pub struct Fraction {
    numer: BigInt,
    denom: BigInt,
}

impl Fraction {
    /// Build `numer / denom` in lowest terms; `None` when `denom` is zero.
    pub fn new(numer: BigInt, denom: BigInt) -> Option<Self> {
        if denom.is_zero() {
            return None;
        }
        let g = numer.gcd(&denom);
        let (mut numer, mut denom) = (numer / &g, denom / &g);
        if denom.is_negative() {
            numer = -numer;
            denom = -denom;
        }
        Some(Fraction { numer, denom })
    }

    pub fn from_integer(n: i64) -> Self {
        Fraction {
            numer: BigInt::from(n),
            denom: BigInt::one(),
        }
    }

    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    pub fn is_integer(&self) -> bool {
        self.denom.is_one()
    }

    /// Nearest `f64`; huge operands saturate to infinity.
    pub fn to_f64(&self) -> f64 {
        let n = self.numer.to_f64().unwrap_or(f64::NAN);
        let d = self.denom.to_f64().unwrap_or(f64::NAN);
        n / d
    }
}

impl fmt::Debug for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fraction({})", self)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

impl<'a> Add<&'a Fraction> for Fraction {
    type Output = Fraction;

    fn add(self, rhs: &'a Fraction) -> Fraction {
        let numer = &self.numer * &rhs.denom + &rhs.numer * &self.denom;
        let denom = &self.denom * &rhs.denom;
        // both denominators are positive, so the product is nonzero
        Fraction::new(numer, denom).unwrap_or_else(Fraction::zero)
    }
}

impl<'a> Mul<&'a Fraction> for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: &'a Fraction) -> Fraction {
        let numer = &self.numer * &rhs.numer;
        let denom = &self.denom * &rhs.denom;
        Fraction::new(numer, denom).unwrap_or_else(Fraction::zero)
    }
}

impl FromStr for Fraction {
    type Err = ParseFractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (numer, denom) = parse_ratio::<BigInt>(s).ok_or(ParseFractionError)?;
        Fraction::new(numer, denom).ok_or(ParseFractionError)
    }
}

/// Split `n` or `n/d` (whitespace allowed around each part) and parse both
/// halves; a bare `n` has denominator one. The denominator may be zero.
pub fn parse_ratio<T: FromStr + One>(input: &str) -> Option<(T, T)> {
    let s = input.trim();
    match s.split_once('/') {
        Some((n, d)) => Some((n.trim().parse().ok()?, d.trim().parse().ok()?)),
        None => Some((s.parse().ok()?, T::one())),
    }
}
