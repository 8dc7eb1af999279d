use crate::error::BijectorError;
use crate::extrapolation::{BoundaryCache, Extrapolation, ExtrapolationTrait};
use crate::float_trait::Float;
use crate::polynomial::PolynomialCore;

/// Branchless-style select: both branches are already evaluated
#[inline]
fn select<T>(condition: bool, on_true: T, on_false: T) -> T {
    if condition { on_true } else { on_false }
}

/// Bernstein polynomial continued to the real line by an [Extrapolation] policy
///
/// Boundary values and slopes are computed once per batch element on construction. Both the
/// polynomial and the tail are evaluated for every input: inputs in a tail are replaced by the
/// safe interior value 0.5 before they reach the polynomial, so the discarded branch never
/// produces undefined values.
#[derive(Clone, Debug)]
pub struct ExtendedPolynomial<T> {
    core: PolynomialCore<T>,
    extrapolation: Extrapolation,
    boundaries: Vec<BoundaryCache<T>>,
}

impl<T> ExtendedPolynomial<T>
where
    T: Float,
{
    pub fn new(core: PolynomialCore<T>, extrapolation: Extrapolation) -> Self {
        let boundaries = (0..core.batch_size())
            .map(|batch| BoundaryCache::new(&core, batch))
            .collect();
        Self {
            core,
            extrapolation,
            boundaries,
        }
    }

    pub fn core(&self) -> &PolynomialCore<T> {
        &self.core
    }

    pub fn boundary(&self, batch: usize) -> &BoundaryCache<T> {
        &self.boundaries[batch]
    }

    pub fn batch_size(&self) -> usize {
        self.boundaries.len()
    }

    pub fn value(&self, batch: usize, x: T) -> T {
        let cache = &self.boundaries[batch];
        let in_tail = cache.is_tail(x);
        let polynomial = self.core.value(batch, select(in_tail, T::half(), x));
        let tail = select(
            x <= cache.lower,
            self.extrapolation.lower_tail(x, cache),
            self.extrapolation.upper_tail(x, cache),
        );
        select(in_tail, tail, polynomial)
    }

    pub fn log_det_jacobian(&self, batch: usize, x: T) -> T {
        let cache = &self.boundaries[batch];
        let in_tail = cache.is_tail(x);
        let polynomial = self
            .core
            .slope(batch, select(in_tail, T::half(), x))
            .abs()
            .ln();
        let tail = select(
            x <= cache.lower,
            self.extrapolation.lower_log_slope(cache),
            self.extrapolation.upper_log_slope(cache),
        );
        select(in_tail, tail, polynomial)
    }

    /// Closed-form inverse if z is in a tail image
    pub fn tail_inverse(&self, batch: usize, z: T) -> Option<T> {
        self.extrapolation.tail_inverse(z, &self.boundaries[batch])
    }

    /// Values at 0 and 1, the range covered by a root search on [0, 1]
    pub fn unit_range(&self, batch: usize) -> (T, T) {
        (self.value(batch, T::zero()), self.value(batch, T::one()))
    }

    pub fn input_domain_error(&self, batch: usize, z: T) -> BijectorError {
        let (low, high) = self.unit_range(batch);
        BijectorError::InputDomain {
            value: z.into(),
            low: low.into(),
            high: high.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn reference(extrapolation: Extrapolation) -> ExtendedPolynomial<f64> {
        let core = PolynomialCore::new(array![[0.0, 0.5, 1.5, 2.0]]).unwrap();
        ExtendedPolynomial::new(core, extrapolation)
    }

    #[test]
    fn interior_is_polynomial() {
        let p = reference(Extrapolation::linear_extension());
        assert_abs_diff_eq!(p.value(0, 0.5), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.log_det_jacobian(0, 0.5), 2.25_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn extension_tails() {
        let p = reference(Extrapolation::linear_extension());
        let b0 = p.boundary(0).value_lower;
        assert_eq!(p.value(0, -1.0), -1.0 + b0);
        assert_abs_diff_eq!(p.value(0, 2.0), 3.0, epsilon = 1e-12);
        assert_eq!(p.log_det_jacobian(0, -1.0), 0.0);
        assert_eq!(p.log_det_jacobian(0, 5.0), 0.0);
    }

    #[test]
    fn extrapolation_is_c1_at_boundaries() {
        let p = reference(Extrapolation::linear_extrapolation());
        let eps = f64::EPSILON;
        for delta in [1e-6, 1e-8, 1e-10] {
            assert_abs_diff_eq!(
                p.log_det_jacobian(0, eps - delta),
                p.log_det_jacobian(0, eps + delta),
                epsilon = 10.0 * delta
            );
            assert_abs_diff_eq!(
                p.log_det_jacobian(0, 1.0 - eps + delta),
                p.log_det_jacobian(0, 1.0 - eps - delta),
                epsilon = 10.0 * delta
            );
            assert_abs_diff_eq!(
                p.value(0, eps - delta),
                p.value(0, eps + delta),
                epsilon = 10.0 * delta
            );
        }
    }

    #[test]
    fn nan_propagates() {
        let p = reference(Extrapolation::linear_extrapolation());
        assert!(p.value(0, f64::NAN).is_nan());
        assert!(p.log_det_jacobian(0, f64::NAN).is_nan());
    }

    #[test]
    fn unit_range_and_domain_error() {
        let p = reference(Extrapolation::linear_extension());
        let (low, high) = p.unit_range(0);
        assert_abs_diff_eq!(low, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(high, 2.0, epsilon = 1e-12);
        assert!(matches!(
            p.input_domain_error(0, 5.0),
            BijectorError::InputDomain { value, .. } if value == 5.0
        ));
    }
}
