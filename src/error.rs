use crate::dtype::Dtype;

/// Error returned from [crate::BernsteinBijector] and its building blocks
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum BijectorError {
    #[error("coefficient array must have at least one dimension and one coefficient")]
    EmptyCoefficients,

    #[error(
        "coefficients of batch element {batch_index} decrease at position {position}, \
         the transform is not monotonic"
    )]
    InvalidCoefficients { batch_index: usize, position: usize },

    #[error("target value {value} is outside of the polynomial range [{low}, {high}]")]
    InputDomain { value: f64, low: f64, high: f64 },

    #[error("dtype mismatch: bijector works with {expected}, input is {actual}")]
    DtypeMismatch { expected: Dtype, actual: Dtype },

    #[error("shapes {left:?} and {right:?} cannot be broadcast together")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("at least {need} distinct samples are required, got {got}")]
    InsufficientSamples { got: usize, need: usize },

    #[error("interpolation nodes must be sorted")]
    UnsortedSamples,

    #[error("constant {name} = {value} is not representable in the working float type")]
    ConstantConversion { name: &'static str, value: f64 },
}

/// Error returned from [crate::Chandrupatla::find_root]
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq)]
pub enum RootSearchError {
    #[error("f(low) = {f_low} and f(high) = {f_high} have the same sign")]
    NoBracket { f_low: f64, f_high: f64 },
}
