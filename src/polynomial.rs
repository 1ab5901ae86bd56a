use crate::lagrange::lagrange_coefficients;
use rand::Rng;

/// A teaching polynomial f(x) = a0 + a1*x + ... + a_{t-1}*x^{t-1}.
///
/// a0 is the secret (the vault signature); every share is f(x) at some
/// participant's public position.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    /// Coefficients a0, a1, ..., a_{t-1}
    pub coeffs: Vec<f64>,
}

impl Poly {
    /// Construct a polynomial from explicit coefficients.
    pub fn from_coeffs(coeffs: Vec<f64>) -> Self {
        Poly { coeffs }
    }

    /// Degree of the polynomial (t-1 if threshold is t).
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Threshold (number of coefficients).
    pub fn threshold(&self) -> usize {
        self.coeffs.len()
    }

    /// The constant term f(0).
    pub fn secret(&self) -> f64 {
        self.coeffs.first().copied().unwrap_or(0.0)
    }

    /// Random polynomial of degree t-1 with integer coefficients in `[-bound, bound]`.
    ///
    /// Small integers keep every share and coefficient hand-computable.
    pub fn random<R: Rng>(t: usize, bound: i32, rng: &mut R) -> Self {
        let bound = bound.abs();
        let coeffs = (0..t)
            .map(|_| f64::from(rng.random_range(-bound..=bound)))
            .collect();
        Poly { coeffs }
    }

    /// Evaluate the polynomial at x using Horner's method.
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &a| acc * x + a)
    }

    /// (x, f(x)) for each position.
    pub fn shares(&self, positions: &[f64]) -> Vec<(f64, f64)> {
        positions.iter().map(|&x| (x, self.eval(x))).collect()
    }

    /// Recover the constant term f(0) from t shares via Lagrange interpolation:
    /// f(0) = sum_{i} y_i * lambda_i.
    pub fn interpolate_constant(shares: &[(f64, f64)]) -> f64 {
        let xs: Vec<f64> = shares.iter().map(|&(x, _)| x).collect();
        lagrange_coefficients(&xs)
            .iter()
            .zip(shares)
            .map(|(lambda, &(_, y))| y * lambda)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rng;

    #[test]
    fn eval_matches_power_sum() {
        let mut rng = rng();
        let poly = Poly::random(4, 9, &mut rng);
        let x = 7.0;
        let mut x_pow = 1.0;
        let mut expected = 0.0;
        for a in &poly.coeffs {
            expected += a * x_pow;
            x_pow *= x;
        }
        assert!((poly.eval(x) - expected).abs() < 1e-9);
    }

    #[test]
    fn random_respects_bound_and_threshold() {
        let mut rng = rng();
        let poly = Poly::random(3, 5, &mut rng);
        assert_eq!(poly.threshold(), 3);
        assert_eq!(poly.degree(), 2);
        assert!(poly.coeffs.iter().all(|a| a.fract() == 0.0 && a.abs() <= 5.0));
    }

    #[test]
    fn interpolate_constant_simple() {
        // f(x) = 3 + 5x + 7x^2
        let poly = Poly::from_coeffs(vec![3.0, 5.0, 7.0]);
        let shares = poly.shares(&[1.0, 2.0, 4.0]);
        assert_eq!(shares[1], (2.0, 41.0));
        let secret = Poly::interpolate_constant(&shares);
        assert!((secret - poly.secret()).abs() < 1e-9);
    }

    #[test]
    fn interpolate_constant_random() {
        let mut rng = rng();
        let t = 5;
        let poly = Poly::random(t, 20, &mut rng);
        let positions: Vec<f64> = (1..=t).map(|i| i as f64).collect();
        let secret = Poly::interpolate_constant(&poly.shares(&positions));
        assert!((secret - poly.secret()).abs() < 1e-6);
    }

    #[test]
    fn empty_polynomial_is_zero() {
        let poly = Poly::from_coeffs(Vec::new());
        assert_eq!(poly.eval(3.0), 0.0);
        assert_eq!(poly.secret(), 0.0);
        assert_eq!(poly.degree(), 0);
    }
}
