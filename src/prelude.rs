pub use crate::bijector::{BernsteinBijector, BijectorTrait};
pub use crate::config::{BernsteinBijectorOptions, InverseMethod, RootSearchConfig, SplineConfig};
pub use crate::dtype::{Dtype, DynArray, DynBernsteinBijector};
pub use crate::error::BijectorError;
pub use crate::extrapolation::{Extrapolation, ExtrapolationTrait};
pub use crate::float_trait::Float;
