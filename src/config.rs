pub use crate::extrapolation::{Extrapolation, LinearExtension, LinearExtrapolation};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Construction-time options of [crate::BernsteinBijector]
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct BernsteinBijectorOptions {
    /// How the polynomial is continued outside of `[eps, 1 - eps]`
    pub extrapolation: Extrapolation,
    /// How the inverse is computed
    pub inverse: InverseMethod,
    /// Reject coefficients which are not non-decreasing
    pub validate_args: bool,
}

/// Inversion strategy
///
/// Use [InverseMethod::RootSearch] if the inverse must be exact or differentiated, the spline
/// is an approximation.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[non_exhaustive]
pub enum InverseMethod {
    RootSearch(RootSearchConfig),
    Spline(SplineConfig),
}

impl InverseMethod {
    pub fn root_search() -> Self {
        Self::RootSearch(RootSearchConfig::default())
    }

    pub fn spline() -> Self {
        Self::Spline(SplineConfig::default())
    }
}

impl Default for InverseMethod {
    fn default() -> Self {
        Self::root_search()
    }
}

/// Parameters of the bracketed root search on [0, 1]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct RootSearchConfig {
    pub position_tolerance: f64,
    /// Stop when |f(x)| is not larger than this value, zero disables the check
    pub value_tolerance: f64,
    /// Reaching this limit returns the current estimate with reduced precision
    pub max_iterations: usize,
}

impl Default for RootSearchConfig {
    fn default() -> Self {
        Self {
            position_tolerance: 1e-6,
            value_tolerance: 0.0,
            max_iterations: 50,
        }
    }
}

/// Parameters of the lazily built monotone spline inverse
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct SplineConfig {
    /// Number of grid nodes on [0, 1], `None` means max(100, 10 * order)
    pub n_points: Option<usize>,
    /// Queries are clipped to [z_min + margin, z_max - margin]
    pub margin: f64,
}

impl SplineConfig {
    pub const DEFAULT_N_POINTS: usize = 100;

    pub fn n_points(&self, order: usize) -> usize {
        self.n_points
            .unwrap_or_else(|| usize::max(Self::DEFAULT_N_POINTS, 10 * order))
    }
}

impl Default for SplineConfig {
    fn default() -> Self {
        Self {
            n_points: None,
            margin: 1e-5,
        }
    }
}
