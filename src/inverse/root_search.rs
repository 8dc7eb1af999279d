use super::{InverseSolverTrait, Inverted, config_constant};
use crate::config::RootSearchConfig;
use crate::error::BijectorError;
use crate::extended::ExtendedPolynomial;
use crate::float_trait::Float;
use crate::root_finding::Chandrupatla;

/// Exact inverse by Chandrupatla's root search of P(y) - z on [0, 1]
#[derive(Clone, Debug)]
pub struct RootSearchInverse<T> {
    solver: Chandrupatla<T>,
}

impl<T> RootSearchInverse<T>
where
    T: Float,
{
    pub fn new(config: &RootSearchConfig) -> Result<Self, BijectorError> {
        Ok(Self {
            solver: Chandrupatla::new(
                config_constant("position_tolerance", config.position_tolerance)?,
                config_constant("value_tolerance", config.value_tolerance)?,
                config.max_iterations,
            ),
        })
    }
}

impl<T> InverseSolverTrait<T> for RootSearchInverse<T>
where
    T: Float,
{
    fn invert(
        &self,
        transform: &ExtendedPolynomial<T>,
        batch: usize,
        z: T,
    ) -> Result<Inverted<T>, BijectorError> {
        let objective = |y: T| transform.value(batch, y) - z;
        let result = self
            .solver
            .find_root(objective, T::zero(), T::one())
            .map_err(|_| transform.input_domain_error(batch, z))?;
        Ok(Inverted {
            value: result.root,
            converged: result.converged,
        })
    }
}
