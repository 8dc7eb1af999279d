use super::{InverseSolverTrait, Inverted, config_constant};
use crate::config::SplineConfig;
use crate::error::BijectorError;
use crate::extended::ExtendedPolynomial;
use crate::float_trait::Float;
use crate::monotone_cubic::MonotoneCubicInterpolator;

use conv::prelude::*;
use std::sync::OnceLock;

/// Interpolated inverse of one batch element
#[derive(Clone, Debug)]
struct SplineBranch<T> {
    interpolator: MonotoneCubicInterpolator<T>,
    z_min: T,
    z_max: T,
}

/// Approximate inverse by a monotone cubic spline through sampled polynomial values
///
/// The spline is fitted on the first call from `n_points` evenly spaced nodes on [0, 1] and
/// published once, concurrent first calls block until it is ready. Queries are clipped to
/// `[z_min + margin, z_max - margin]`. The result is not differentiable through the polynomial
/// coefficients.
#[derive(Debug)]
pub struct SplineInverse<T> {
    n_points: usize,
    margin: T,
    branches: OnceLock<Result<Vec<SplineBranch<T>>, BijectorError>>,
}

impl<T> SplineInverse<T>
where
    T: Float,
{
    pub fn new(config: &SplineConfig, order: usize) -> Result<Self, BijectorError> {
        let n_points = config.n_points(order);
        if n_points < 2 {
            return Err(BijectorError::InsufficientSamples {
                got: n_points,
                need: 2,
            });
        }
        Ok(Self {
            n_points,
            margin: config_constant("margin", config.margin)?,
            branches: OnceLock::new(),
        })
    }

    fn grid(&self) -> Result<Vec<T>, BijectorError> {
        let to_float = |i: usize| {
            i.value_as::<T>()
                .map_err(|_| BijectorError::ConstantConversion {
                    name: "n_points",
                    value: i as f64,
                })
        };
        let last = to_float(self.n_points - 1)?;
        (0..self.n_points)
            .map(|i| to_float(i).map(|x| x / last))
            .collect()
    }

    fn build(
        &self,
        transform: &ExtendedPolynomial<T>,
    ) -> Result<Vec<SplineBranch<T>>, BijectorError> {
        tracing::debug!(
            n_points = self.n_points,
            batch_size = transform.batch_size(),
            "fitting spline inverse"
        );
        let ys = self.grid()?;
        let core = transform.core();
        (0..transform.batch_size())
            .map(|batch| {
                // non-decreasing coefficients give non-decreasing values, the running maximum
                // removes round-off wiggles on flat parts
                let mut running = T::neg_infinity();
                let zs: Vec<T> = ys
                    .iter()
                    .map(|&y| {
                        running = running.max(core.value(batch, y));
                        running
                    })
                    .collect();
                Ok(SplineBranch {
                    interpolator: MonotoneCubicInterpolator::new(&zs, &ys)?,
                    z_min: zs[0],
                    z_max: zs[zs.len() - 1],
                })
            })
            .collect()
    }
}

impl<T> InverseSolverTrait<T> for SplineInverse<T>
where
    T: Float,
{
    fn invert(
        &self,
        transform: &ExtendedPolynomial<T>,
        batch: usize,
        z: T,
    ) -> Result<Inverted<T>, BijectorError> {
        let branches = self
            .branches
            .get_or_init(|| self.build(transform))
            .as_ref()
            .map_err(Clone::clone)?;
        let branch = &branches[batch];
        let low = branch.z_min + self.margin;
        let high = (branch.z_max - self.margin).max(low);
        let clipped = z.max(low).min(high);
        Ok(Inverted {
            value: branch.interpolator.interpolate(clipped),
            converged: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extrapolation::Extrapolation;
    use crate::polynomial::PolynomialCore;

    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn transform(thetas: ndarray::Array2<f64>) -> ExtendedPolynomial<f64> {
        ExtendedPolynomial::new(
            PolynomialCore::new(thetas).unwrap(),
            Extrapolation::linear_extension(),
        )
    }

    #[test]
    fn lazily_built_once() {
        let transform = transform(array![[0.0, 0.5, 1.5, 2.0]]);
        let inverse = SplineInverse::new(&SplineConfig::default(), 3).unwrap();
        assert!(!inverse.branches.get().is_some());
        assert_eq!(inverse.n_points, 100);
        let result = inverse.invert(&transform, 0, 1.0).unwrap();
        assert!(inverse.branches.get().is_some());
        assert!(result.converged);
        assert_abs_diff_eq!(result.value, 0.5, epsilon = 1e-3);
    }

    #[test]
    fn queries_are_clipped() {
        let transform = transform(array![[0.0, 0.5, 1.5, 2.0]]);
        let inverse = SplineInverse::new(&SplineConfig::default(), 3).unwrap();
        let below = inverse.invert(&transform, 0, -5.0).unwrap().value;
        let above = inverse.invert(&transform, 0, 5.0).unwrap().value;
        assert!(below > 0.0 && below < 1e-4);
        assert!(above < 1.0 && above > 1.0 - 1e-4);
    }

    #[test]
    fn batches_have_own_splines() {
        let transform = transform(array![[0.0, 0.5, 1.5, 2.0], [-1.0, 0.0, 1.0, 2.0]]);
        let inverse = SplineInverse::new(&SplineConfig::default(), 3).unwrap();
        let first = inverse.invert(&transform, 0, 1.0).unwrap().value;
        assert_abs_diff_eq!(first, 0.5, epsilon = 1e-3);
        // linear coefficients give P(y) = 3y - 1
        let second = inverse.invert(&transform, 1, 0.5).unwrap().value;
        assert_abs_diff_eq!(second, 0.5, epsilon = 1e-3);
    }

    #[test]
    fn constant_polynomial_cannot_be_inverted() {
        let transform = transform(array![[1.0]]);
        let inverse = SplineInverse::new(&SplineConfig::default(), 0).unwrap();
        assert_eq!(
            inverse.invert(&transform, 0, 1.0).unwrap_err(),
            BijectorError::InsufficientSamples { got: 1, need: 2 }
        );
        // the failure is cached as well
        assert!(inverse.branches.get().is_some());
        assert!(inverse.invert(&transform, 0, 1.0).is_err());
    }

    #[test]
    fn too_small_grid() {
        let config = SplineConfig {
            n_points: Some(1),
            ..Default::default()
        };
        assert!(SplineInverse::<f64>::new(&config, 3).is_err());
    }
}
