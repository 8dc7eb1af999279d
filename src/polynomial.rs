use crate::basis::BernsteinBasis;
use crate::error::BijectorError;
use crate::float_trait::Float;

use conv::prelude::*;
use ndarray::{Array2, Axis};

/// Batch of Bernstein polynomials sharing one basis
///
/// `thetas` has the shape `(batch, order + 1)`.
#[derive(Clone, Debug)]
pub struct BernsteinPolynomial<T> {
    basis: BernsteinBasis<T>,
    thetas: Array2<T>,
}

impl<T> BernsteinPolynomial<T>
where
    T: Float,
{
    pub fn new(thetas: Array2<T>) -> Result<Self, BijectorError> {
        let n = thetas.ncols();
        if n == 0 {
            return Err(BijectorError::EmptyCoefficients);
        }
        let basis = BernsteinBasis::new(n - 1)?;
        Ok(Self { basis, thetas })
    }

    pub fn order(&self) -> usize {
        self.basis.order()
    }

    pub fn batch_size(&self) -> usize {
        self.thetas.nrows()
    }

    /// Polynomial value, y is clamped to [0, 1]
    #[inline]
    pub fn value(&self, batch: usize, y: T) -> T {
        let y = num_traits::clamp(y, T::zero(), T::one());
        self.basis.weighted_mean(y, self.thetas.row(batch))
    }

    /// Derivative polynomial of order - 1 with coefficients order * (theta[k + 1] - theta[k])
    ///
    /// `None` for order zero, which has no lower order basis.
    pub fn derivative(&self) -> Result<Option<Self>, BijectorError> {
        let order = self.order();
        if order == 0 {
            return Ok(None);
        }
        let m: T = order
            .value_as::<T>()
            .map_err(|_| BijectorError::ConstantConversion {
                name: "order",
                value: order as f64,
            })?;
        let n = self.thetas.ncols();
        let upper = self.thetas.slice_axis(Axis(1), (1..n).into());
        let lower = self.thetas.slice_axis(Axis(1), (0..n - 1).into());
        let dthetas = (&upper - &lower).mapv(|d| m * d);
        Self::new(dthetas).map(Some)
    }
}

/// Polynomial together with its analytic derivative
#[derive(Clone, Debug)]
pub struct PolynomialCore<T> {
    polynomial: BernsteinPolynomial<T>,
    derivative: Option<BernsteinPolynomial<T>>,
}

impl<T> PolynomialCore<T>
where
    T: Float,
{
    pub fn new(thetas: Array2<T>) -> Result<Self, BijectorError> {
        let polynomial = BernsteinPolynomial::new(thetas)?;
        let derivative = polynomial.derivative()?;
        Ok(Self {
            polynomial,
            derivative,
        })
    }

    pub fn order(&self) -> usize {
        self.polynomial.order()
    }

    pub fn batch_size(&self) -> usize {
        self.polynomial.batch_size()
    }

    #[inline]
    pub fn value(&self, batch: usize, y: T) -> T {
        self.polynomial.value(batch, y)
    }

    /// P'(y), identically zero for a constant polynomial of order zero
    #[inline]
    pub fn slope(&self, batch: usize, y: T) -> T {
        match &self.derivative {
            Some(d) => d.value(batch, y),
            None => T::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn order_three_value() {
        let core = PolynomialCore::new(array![[0.0, 0.5, 1.5, 2.0]]).unwrap();
        assert_eq!(core.order(), 3);
        assert_relative_eq!(core.value(0, 0.5), 1.0, epsilon = 1e-12);
        assert_relative_eq!(core.value(0, 0.25), 0.453125, epsilon = 1e-12);
        assert_relative_eq!(core.value(0, 0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(core.value(0, 1.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn value_clamps_input() {
        let core = PolynomialCore::new(array![[0.0, 0.5, 1.5, 2.0]]).unwrap();
        assert_relative_eq!(core.value(0, -3.0), core.value(0, 0.0), epsilon = 1e-15);
        assert_relative_eq!(core.value(0, 7.0), core.value(0, 1.0), epsilon = 1e-15);
    }

    #[test]
    fn analytic_slope_matches_finite_difference() {
        let core = PolynomialCore::new(array![[-1.0, 0.2, 0.3, 2.0, 4.5]]).unwrap();
        let h = 1e-6;
        for &y in &[0.1, 0.35, 0.5, 0.77, 0.9] {
            let numeric = (core.value(0, y + h) - core.value(0, y - h)) / (2.0 * h);
            assert_relative_eq!(core.slope(0, y), numeric, epsilon = 1e-6);
        }
    }

    #[test]
    fn slope_of_reference_polynomial() {
        let core = PolynomialCore::new(array![[0.0, 0.5, 1.5, 2.0]]).unwrap();
        assert_relative_eq!(core.slope(0, 0.5), 2.25, epsilon = 1e-12);
        assert_relative_eq!(core.slope(0, 0.0), 1.5, epsilon = 1e-12);
        assert_relative_eq!(core.slope(0, 1.0), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn batched_rows_are_independent() {
        let core = PolynomialCore::new(array![[0.0, 0.5, 1.5, 2.0], [1.0, 1.0, 1.0, 1.0]]).unwrap();
        assert_eq!(core.batch_size(), 2);
        assert_relative_eq!(core.value(1, 0.3), 1.0, epsilon = 1e-12);
        assert_relative_eq!(core.slope(1, 0.3), 0.0, epsilon = 1e-12);
        assert_relative_eq!(core.value(0, 0.5), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn order_zero_has_zero_slope() {
        let core = PolynomialCore::new(array![[3.0_f32]]).unwrap();
        assert_eq!(core.order(), 0);
        assert_relative_eq!(core.value(0, 0.7), 3.0, epsilon = 1e-6);
        assert_eq!(core.slope(0, 0.7), 0.0);
    }

    #[test]
    fn empty_coefficients_are_rejected() {
        let thetas = Array2::<f64>::zeros((1, 0));
        assert_eq!(
            PolynomialCore::new(thetas).unwrap_err(),
            BijectorError::EmptyCoefficients
        );
    }
}
