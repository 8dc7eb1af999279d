#![doc = include_str!("../README.md")]


mod basis;
pub use basis::BernsteinBasis;

mod bijector;
pub use bijector::{BernsteinBijector, BijectorTrait, InverseReport};

mod broadcast;

mod coefficients;

pub mod config;
pub use config::{BernsteinBijectorOptions, InverseMethod, RootSearchConfig, SplineConfig};

mod constraint;
pub use constraint::{constrain_theta, constrain_theta_with};

mod dtype;
pub use dtype::{Dtype, DynArray, DynBernsteinBijector};

mod error;
pub use error::{BijectorError, RootSearchError};

mod extended;

pub mod extrapolation;
pub use extrapolation::{
    BoundaryCache, Extrapolation, ExtrapolationTrait, LinearExtension, LinearExtrapolation,
};

mod float_trait;
pub use float_trait::Float;

mod inverse;

mod monotone_cubic;
pub use monotone_cubic::MonotoneCubicInterpolator;

mod polynomial;
pub use polynomial::{BernsteinPolynomial, PolynomialCore};

pub mod prelude;

mod root_finding;
pub use root_finding::{Chandrupatla, RootSearchResult};

pub use ndarray;
