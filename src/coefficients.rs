use crate::error::BijectorError;
use crate::float_trait::Float;

use itertools::Itertools;
use ndarray::{Array2, ArrayBase, ArrayD, Data, Dimension};

/// Bernstein coefficients with the coefficient index on the last axis
///
/// Leading axes form the batch shape, internally the coefficients are kept as a
/// `(batch, order + 1)` matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Coefficients<T> {
    thetas: ArrayD<T>,
    matrix: Array2<T>,
    batch_shape: Vec<usize>,
}

impl<T> Coefficients<T>
where
    T: Float,
{
    pub fn new<S, D>(thetas: &ArrayBase<S, D>) -> Result<Self, BijectorError>
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        let shape = thetas.shape();
        let Some((&n, batch_shape)) = shape.split_last() else {
            return Err(BijectorError::EmptyCoefficients);
        };
        if n == 0 {
            return Err(BijectorError::EmptyCoefficients);
        }
        let batch_size = batch_shape.iter().product::<usize>();
        let matrix = Array2::from_shape_vec((batch_size, n), thetas.iter().copied().collect())
            .map_err(|_| BijectorError::ShapeMismatch {
                left: shape.to_vec(),
                right: vec![batch_size, n],
            })?;
        Ok(Self {
            thetas: thetas.to_owned().into_dyn(),
            matrix,
            batch_shape: batch_shape.to_vec(),
        })
    }

    pub fn thetas(&self) -> &ArrayD<T> {
        &self.thetas
    }

    pub fn matrix(&self) -> &Array2<T> {
        &self.matrix
    }

    pub fn order(&self) -> usize {
        self.matrix.ncols() - 1
    }

    pub fn batch_shape(&self) -> &[usize] {
        &self.batch_shape
    }

    pub fn batch_size(&self) -> usize {
        self.matrix.nrows()
    }

    /// (batch index, position) of the first coefficient smaller than its predecessor
    ///
    /// NaN coefficients count as a decrease.
    pub fn first_decrease(&self) -> Option<(usize, usize)> {
        self.matrix.outer_iter().enumerate().find_map(|(batch, row)| {
            row.iter()
                .tuple_windows()
                .position(|(a, b)| !(a <= b))
                .map(|k| (batch, k + 1))
        })
    }

    pub fn is_increasing(&self) -> bool {
        self.first_decrease().is_none()
    }
}
