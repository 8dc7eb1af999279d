use crate::float_trait::Float;
use crate::polynomial::PolynomialCore;

use enum_dispatch::enum_dispatch;
use macro_const::macro_const;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

macro_const! {
    const EXTRAPOLATION_DOC: &'static str = r"Continuation of the polynomial outside of its safe domain

The polynomial is evaluated only on $[\varepsilon, 1 - \varepsilon]$, where $\varepsilon$ is the
machine epsilon of the working type. Outside of this interval an affine tail is used, which
matches the polynomial value at the boundary, so the transform is defined on the whole real line
and each tail is inverted in closed form.
";
}

/// Polynomial value and slope at the safe domain bounds of one batch element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryCache<T> {
    /// eps
    pub lower: T,
    /// 1 - eps
    pub upper: T,
    pub value_lower: T,
    pub value_upper: T,
    pub slope_lower: T,
    pub slope_upper: T,
}

impl<T> BoundaryCache<T>
where
    T: Float,
{
    pub fn new(core: &PolynomialCore<T>, batch: usize) -> Self {
        let lower = T::epsilon();
        let upper = T::one() - T::epsilon();
        Self {
            lower,
            upper,
            value_lower: core.value(batch, lower),
            value_upper: core.value(batch, upper),
            slope_lower: core.slope(batch, lower),
            slope_upper: core.slope(batch, upper),
        }
    }

    /// Is x outside of the open interval (eps, 1 - eps)?
    #[inline]
    pub fn is_tail(&self, x: T) -> bool {
        x <= self.lower || x >= self.upper
    }
}

#[doc = EXTRAPOLATION_DOC!()]
#[enum_dispatch]
pub trait ExtrapolationTrait: Clone + Debug + Send + Sync {
    /// Tail for x <= eps
    fn lower_tail<T: Float>(&self, x: T, cache: &BoundaryCache<T>) -> T;

    /// Tail for x >= 1 - eps
    fn upper_tail<T: Float>(&self, x: T, cache: &BoundaryCache<T>) -> T;

    /// ln of the lower tail slope
    fn lower_log_slope<T: Float>(&self, cache: &BoundaryCache<T>) -> T;

    /// ln of the upper tail slope
    fn upper_log_slope<T: Float>(&self, cache: &BoundaryCache<T>) -> T;

    /// Solution of lower_tail(x) = z, NaN if there is none
    fn lower_tail_inverse<T: Float>(&self, z: T, cache: &BoundaryCache<T>) -> T;

    /// Solution of upper_tail(x) = z, NaN if there is none
    fn upper_tail_inverse<T: Float>(&self, z: T, cache: &BoundaryCache<T>) -> T;

    /// Closed-form inverse, `None` if z is not produced by any tail
    fn tail_inverse<T: Float>(&self, z: T, cache: &BoundaryCache<T>) -> Option<T> {
        let upper = self.upper_tail_inverse(z, cache);
        if upper >= cache.upper {
            return Some(upper);
        }
        let lower = self.lower_tail_inverse(z, cache);
        if lower <= cache.lower {
            return Some(lower);
        }
        None
    }
}

#[doc = EXTRAPOLATION_DOC!()]
#[enum_dispatch(ExtrapolationTrait)]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Extrapolation {
    LinearExtension(LinearExtension),
    LinearExtrapolation(LinearExtrapolation),
}

impl Extrapolation {
    pub fn linear_extension() -> Self {
        Self::LinearExtension(LinearExtension)
    }

    pub fn linear_extrapolation() -> Self {
        Self::LinearExtrapolation(LinearExtrapolation)
    }
}

impl Default for Extrapolation {
    fn default() -> Self {
        Self::linear_extension()
    }
}

/// Unit slope tails: $y = x + P(\varepsilon)$ and $y = x + P(1 - \varepsilon) - 1$
///
/// The log-det-Jacobian is zero in both tails, so it jumps at the boundary unless the
/// polynomial slope there is one.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename = "LinearExtension")]
pub struct LinearExtension;

impl ExtrapolationTrait for LinearExtension {
    #[inline]
    fn lower_tail<T: Float>(&self, x: T, cache: &BoundaryCache<T>) -> T {
        x + cache.value_lower
    }

    #[inline]
    fn upper_tail<T: Float>(&self, x: T, cache: &BoundaryCache<T>) -> T {
        x + cache.value_upper - T::one()
    }

    #[inline]
    fn lower_log_slope<T: Float>(&self, _cache: &BoundaryCache<T>) -> T {
        T::zero()
    }

    #[inline]
    fn upper_log_slope<T: Float>(&self, _cache: &BoundaryCache<T>) -> T {
        T::zero()
    }

    #[inline]
    fn lower_tail_inverse<T: Float>(&self, z: T, cache: &BoundaryCache<T>) -> T {
        z - cache.value_lower
    }

    #[inline]
    fn upper_tail_inverse<T: Float>(&self, z: T, cache: &BoundaryCache<T>) -> T {
        z - cache.value_upper + T::one()
    }
}

/// Tails continuing the boundary tangent: $y = P'(\varepsilon) x + P(\varepsilon)$ and
/// $y = P'(1 - \varepsilon) (x - 1) + P(1 - \varepsilon)$
///
/// Both value and slope are continuous at the boundary. A tail with non-positive slope has no
/// closed-form inverse.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename = "LinearExtrapolation")]
pub struct LinearExtrapolation;

impl ExtrapolationTrait for LinearExtrapolation {
    #[inline]
    fn lower_tail<T: Float>(&self, x: T, cache: &BoundaryCache<T>) -> T {
        cache.slope_lower * x + cache.value_lower
    }

    #[inline]
    fn upper_tail<T: Float>(&self, x: T, cache: &BoundaryCache<T>) -> T {
        cache.slope_upper * (x - T::one()) + cache.value_upper
    }

    #[inline]
    fn lower_log_slope<T: Float>(&self, cache: &BoundaryCache<T>) -> T {
        cache.slope_lower.abs().ln()
    }

    #[inline]
    fn upper_log_slope<T: Float>(&self, cache: &BoundaryCache<T>) -> T {
        cache.slope_upper.abs().ln()
    }

    #[inline]
    fn lower_tail_inverse<T: Float>(&self, z: T, cache: &BoundaryCache<T>) -> T {
        if cache.slope_lower > T::zero() {
            (z - cache.value_lower) / cache.slope_lower
        } else {
            T::nan()
        }
    }

    #[inline]
    fn upper_tail_inverse<T: Float>(&self, z: T, cache: &BoundaryCache<T>) -> T {
        if cache.slope_upper > T::zero() {
            (z - cache.value_upper) / cache.slope_upper + T::one()
        } else {
            T::nan()
        }
    }
}
