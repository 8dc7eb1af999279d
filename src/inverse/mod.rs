//! Inversion of the polynomial part of the transform

use crate::config::InverseMethod;
use crate::error::BijectorError;
use crate::extended::ExtendedPolynomial;
use crate::float_trait::Float;

use enum_dispatch::enum_dispatch;
use std::fmt::Debug;

mod root_search;
pub use root_search::RootSearchInverse;

mod spline;
pub use spline::SplineInverse;

/// Solution of the inverse problem for a single value
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Inverted<T> {
    pub value: T,
    /// `false` if the value is the best estimate of an interrupted iterative search
    pub converged: bool,
}

/// Inversion strategy
///
/// Implementations handle target values inside the image of [0, 1], tails are inverted in
/// closed form by the caller before the solver is asked.
#[enum_dispatch]
pub trait InverseSolverTrait<T: Float>: Debug + Send + Sync {
    fn invert(
        &self,
        transform: &ExtendedPolynomial<T>,
        batch: usize,
        z: T,
    ) -> Result<Inverted<T>, BijectorError>;
}

#[enum_dispatch(InverseSolverTrait<T>)]
#[derive(Debug)]
pub enum InverseSolver<T: Float> {
    RootSearch(RootSearchInverse<T>),
    Spline(SplineInverse<T>),
}

impl<T> InverseSolver<T>
where
    T: Float,
{
    pub fn new(method: &InverseMethod, order: usize) -> Result<Self, BijectorError> {
        Ok(match method {
            InverseMethod::RootSearch(config) => RootSearchInverse::new(config)?.into(),
            InverseMethod::Spline(config) => SplineInverse::new(config, order)?.into(),
        })
    }
}

/// Convert a configuration constant to the working type
pub(crate) fn config_constant<T: Float>(
    name: &'static str,
    value: f64,
) -> Result<T, BijectorError> {
    T::approx_from(value).map_err(|_| BijectorError::ConstantConversion { name, value })
}
