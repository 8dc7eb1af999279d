use crate::bijector::BernsteinBijector;
use crate::config::BernsteinBijectorOptions;
use crate::error::BijectorError;

use ndarray::{ArrayD, Dimension};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric precision of coefficients and inputs
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    F32,
    F64,
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::F32 => write!(f, "float32"),
            Self::F64 => write!(f, "float64"),
        }
    }
}

/// Array of either precision, for callers that decide the dtype at runtime
#[derive(Clone, Debug, PartialEq)]
pub enum DynArray {
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

impl DynArray {
    pub fn dtype(&self) -> Dtype {
        match self {
            Self::F32(_) => Dtype::F32,
            Self::F64(_) => Dtype::F64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Self::F32(a) => a.shape(),
            Self::F64(a) => a.shape(),
        }
    }
}

impl<D: Dimension> From<ndarray::Array<f32, D>> for DynArray {
    fn from(a: ndarray::Array<f32, D>) -> Self {
        Self::F32(a.into_dyn())
    }
}

impl<D: Dimension> From<ndarray::Array<f64, D>> for DynArray {
    fn from(a: ndarray::Array<f64, D>) -> Self {
        Self::F64(a.into_dyn())
    }
}

/// [BernsteinBijector] with the precision chosen by its coefficients at runtime
///
/// Every operation checks that the input has the same dtype as the coefficients and returns
/// [BijectorError::DtypeMismatch] otherwise.
#[derive(Debug)]
pub enum DynBernsteinBijector {
    F32(BernsteinBijector<f32>),
    F64(BernsteinBijector<f64>),
}

macro_rules! dyn_op {
    ($name: ident) => {
        pub fn $name(&self, x: &DynArray) -> Result<DynArray, BijectorError> {
            match (self, x) {
                (Self::F32(b), DynArray::F32(x)) => b.$name(x).map(DynArray::F32),
                (Self::F64(b), DynArray::F64(x)) => b.$name(x).map(DynArray::F64),
                _ => Err(BijectorError::DtypeMismatch {
                    expected: self.dtype(),
                    actual: x.dtype(),
                }),
            }
        }
    };
}

impl DynBernsteinBijector {
    pub fn new(
        thetas: &DynArray,
        options: BernsteinBijectorOptions,
    ) -> Result<Self, BijectorError> {
        match thetas {
            DynArray::F32(t) => BernsteinBijector::new(t, options).map(Self::F32),
            DynArray::F64(t) => BernsteinBijector::new(t, options).map(Self::F64),
        }
    }

    pub fn dtype(&self) -> Dtype {
        match self {
            Self::F32(_) => Dtype::F32,
            Self::F64(_) => Dtype::F64,
        }
    }

    pub fn is_increasing(&self) -> bool {
        match self {
            Self::F32(b) => b.is_increasing(),
            Self::F64(b) => b.is_increasing(),
        }
    }

    dyn_op!(forward);
    dyn_op!(inverse);
    dyn_op!(forward_log_det_jacobian);
    dyn_op!(inverse_log_det_jacobian);
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::{arr1, array};

    #[test]
    fn dtype_mismatch_is_reported() {
        let thetas = DynArray::from(arr1(&[0.0_f32, 0.5, 1.5, 2.0]));
        let bijector =
            DynBernsteinBijector::new(&thetas, BernsteinBijectorOptions::default()).unwrap();
        assert_eq!(bijector.dtype(), Dtype::F32);

        let x = DynArray::from(arr1(&[0.5_f64]));
        assert_eq!(
            bijector.forward(&x),
            Err(BijectorError::DtypeMismatch {
                expected: Dtype::F32,
                actual: Dtype::F64,
            })
        );
    }

    #[test]
    fn matching_dtype_evaluates() {
        let thetas = DynArray::from(arr1(&[0.0_f64, 0.5, 1.5, 2.0]));
        let bijector =
            DynBernsteinBijector::new(&thetas, BernsteinBijectorOptions::default()).unwrap();
        assert!(bijector.is_increasing());

        let y = bijector.forward(&DynArray::from(array![0.5_f64])).unwrap();
        assert_eq!(y.dtype(), Dtype::F64);
        assert_eq!(y.shape(), &[1]);
        match y {
            DynArray::F64(y) => approx::assert_relative_eq!(y[[0]], 1.0, epsilon = 1e-12),
            DynArray::F32(_) => unreachable!(),
        }
    }

    #[test]
    fn dtype_serialization() {
        assert_eq!(serde_json::to_string(&Dtype::F32).unwrap(), "\"f32\"");
        assert_eq!(Dtype::F64.to_string(), "float64");
    }
}
