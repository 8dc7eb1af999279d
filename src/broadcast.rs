use crate::error::BijectorError;

use itertools::{EitherOrBoth, Itertools};
use ndarray::{ArrayD, ArrayViewD, IxDyn, Zip};

/// Broadcast shape of two shapes by the numpy rules
pub fn broadcast_shapes(left: &[usize], right: &[usize]) -> Result<Vec<usize>, BijectorError> {
    let mismatch = || BijectorError::ShapeMismatch {
        left: left.to_vec(),
        right: right.to_vec(),
    };
    let mut shape = left
        .iter()
        .rev()
        .zip_longest(right.iter().rev())
        .map(|pair| match pair {
            EitherOrBoth::Both(&l, &r) if l == r || r == 1 => Ok(l),
            EitherOrBoth::Both(&l, &r) if l == 1 => Ok(r),
            EitherOrBoth::Both(..) => Err(mismatch()),
            EitherOrBoth::Left(&l) => Ok(l),
            EitherOrBoth::Right(&r) => Ok(r),
        })
        .collect::<Result<Vec<_>, _>>()?;
    shape.reverse();
    Ok(shape)
}

fn shape_mismatch(left: &[usize], right: &[usize]) -> BijectorError {
    BijectorError::ShapeMismatch {
        left: left.to_vec(),
        right: right.to_vec(),
    }
}

/// Common shape and the batch index of every element of it
fn batch_index(
    x_shape: &[usize],
    batch_shape: &[usize],
) -> Result<(Vec<usize>, ArrayD<usize>), BijectorError> {
    let shape = broadcast_shapes(x_shape, batch_shape)?;
    let batch_size = batch_shape.iter().product::<usize>();
    let index = ArrayD::from_shape_vec(IxDyn(batch_shape), (0..batch_size).collect())
        .map_err(|_| shape_mismatch(x_shape, batch_shape))?;
    let index = index
        .broadcast(IxDyn(&shape))
        .ok_or_else(|| shape_mismatch(x_shape, batch_shape))?
        .to_owned();
    Ok((shape, index))
}

/// Apply `f(x, batch_index)` to every element of the broadcast of `x` and the batch shape
pub fn map_broadcast<T, U, F>(
    x: ArrayViewD<'_, T>,
    batch_shape: &[usize],
    f: F,
) -> Result<ArrayD<U>, BijectorError>
where
    T: Copy,
    F: Fn(T, usize) -> U,
{
    let (shape, index) = batch_index(x.shape(), batch_shape)?;
    let x = x
        .broadcast(IxDyn(&shape))
        .ok_or_else(|| shape_mismatch(x.shape(), batch_shape))?;
    Ok(Zip::from(&x).and(&index).map_collect(|&x, &b| f(x, b)))
}

/// Fallible version of [map_broadcast], stops at the first error
pub fn try_map_broadcast<T, U, F>(
    x: ArrayViewD<'_, T>,
    batch_shape: &[usize],
    mut f: F,
) -> Result<ArrayD<U>, BijectorError>
where
    T: Copy,
    F: FnMut(T, usize) -> Result<U, BijectorError>,
{
    let (shape, index) = batch_index(x.shape(), batch_shape)?;
    let x_view = x
        .broadcast(IxDyn(&shape))
        .ok_or_else(|| shape_mismatch(x.shape(), batch_shape))?;
    let values = x_view
        .iter()
        .zip(index.iter())
        .map(|(&x, &b)| f(x, b))
        .collect::<Result<Vec<_>, _>>()?;
    ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|_| shape_mismatch(x.shape(), &shape))
}
