use crate::error::BijectorError;
use crate::float_trait::Float;

use conv::prelude::*;
use ndarray::{Array1, ArrayView1, Zip};

fn usize_to_float<T: Float>(x: usize) -> Result<T, BijectorError> {
    x.value_as::<T>()
        .map_err(|_| BijectorError::ConstantConversion {
            name: "order",
            value: x as f64,
        })
}

/// x ln(y) with the 0 ln(0) = 0 convention
#[inline]
fn xlogy<T: Float>(x: T, y: T) -> T {
    if x.is_zero() { T::zero() } else { x * y.ln() }
}

/// Bernstein basis of order $M$ built from Beta densities
///
/// The $k$-th basis function is the density of $\mathrm{Beta}(k + 1, M - k + 1)$,
/// $k = 0..M$:
/// $$
/// b_k(y) = (M + 1) \binom{M}{k} y^k (1 - y)^{M - k},
/// $$
/// so that the mean of $b_k(y) \theta_k$ over $k$ is the classical Bernstein polynomial.
/// Densities are evaluated in the log domain to stay finite for large orders.
#[derive(Clone, Debug, PartialEq)]
pub struct BernsteinBasis<T> {
    order: usize,
    /// ln(1 / B(k + 1, M - k + 1))
    ln_norm: Array1<T>,
    /// k
    alpha_m1: Array1<T>,
    /// M - k
    beta_m1: Array1<T>,
}

impl<T> BernsteinBasis<T>
where
    T: Float,
{
    pub fn new(order: usize) -> Result<Self, BijectorError> {
        let m: T = usize_to_float(order)?;
        let ks = (0..=order)
            .map(usize_to_float::<T>)
            .collect::<Result<Array1<T>, _>>()?;
        let beta_m1 = ks.mapv(|k| m - k);
        let ln_gamma_total = (m + T::two()).ln_gamma();
        let ln_norm = Zip::from(&ks)
            .and(&beta_m1)
            .map_collect(|&k, &mk| {
                ln_gamma_total - (k + T::one()).ln_gamma() - (mk + T::one()).ln_gamma()
            });
        Ok(Self {
            order,
            ln_norm,
            alpha_m1: ks,
            beta_m1,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of basis functions, order + 1
    pub fn len(&self) -> usize {
        self.order + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Density of the k-th basis function, y must be in [0, 1]
    ///
    /// # Panics
    ///
    /// Panics if `k > order`.
    #[inline]
    pub fn density(&self, k: usize, y: T) -> T {
        let ln_density = self.ln_norm[k]
            + xlogy(self.alpha_m1[k], y)
            + xlogy(self.beta_m1[k], T::one() - y);
        ln_density.exp()
    }

    /// All basis densities at y
    pub fn eval(&self, y: T) -> Array1<T> {
        (0..self.len()).map(|k| self.density(k, y)).collect()
    }

    /// Mean of $b_k(y) \theta_k$ over the basis
    ///
    /// # Panics
    ///
    /// Panics if `theta` does not have `order + 1` elements.
    pub fn weighted_mean(&self, y: T, theta: ArrayView1<T>) -> T {
        assert_eq!(theta.len(), self.len(), "theta length must equal order + 1");
        let sum = theta
            .iter()
            .enumerate()
            .fold(T::zero(), |acc, (k, &t)| acc + self.density(k, y) * t);
        // order + 1 is representable: it was converted in the constructor
        sum / (self.alpha_m1[self.order] + T::one())
    }
}
