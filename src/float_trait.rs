use crate::dtype::Dtype;

use conv::prelude::*;
use ndarray::NdFloat;
use num_traits::FloatConst;
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Floating point type the bijector computes in, implemented for `f32` and `f64`
pub trait Float:
    NdFloat
    + FloatConst
    + ApproxFrom<f64>
    + ValueFrom<usize>
    + Into<f64>
    + JsonSchema
    + Serialize
    + DeserializeOwned
{
    /// Runtime tag of the type
    const DTYPE: Dtype;

    fn half() -> Self;

    fn two() -> Self;

    /// Natural logarithm of the gamma function
    fn ln_gamma(self) -> Self;

    /// ln(1 + exp(x)) without overflow for large |x|
    #[inline]
    fn softplus(self) -> Self {
        self.max(Self::zero()) + (-self.abs()).exp().ln_1p()
    }
}

impl Float for f32 {
    const DTYPE: Dtype = Dtype::F32;

    #[inline]
    fn half() -> Self {
        0.5
    }

    #[inline]
    fn two() -> Self {
        2.0
    }

    #[inline]
    fn ln_gamma(self) -> Self {
        libm::lgammaf(self)
    }
}

impl Float for f64 {
    const DTYPE: Dtype = Dtype::F64;

    #[inline]
    fn half() -> Self {
        0.5
    }

    #[inline]
    fn two() -> Self {
        2.0
    }

    #[inline]
    fn ln_gamma(self) -> Self {
        libm::lgamma(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn ln_gamma_of_integers_is_log_factorial() {
        assert_relative_eq!(Float::ln_gamma(5.0_f64), 24.0_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(Float::ln_gamma(5.0_f32), 24.0_f32.ln(), epsilon = 1e-5);
        assert_relative_eq!(Float::ln_gamma(1.0_f64), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn softplus_is_stable() {
        assert_relative_eq!(0.0_f64.softplus(), 2.0_f64.ln(), epsilon = 1e-15);
        assert_relative_eq!(1000.0_f64.softplus(), 1000.0, epsilon = 1e-12);
        assert!(1000.0_f32.softplus().is_finite());
        let tiny = (-1000.0_f64).softplus();
        assert!(tiny >= 0.0);
        assert!(tiny < 1e-300);
    }
}
