use crate::float_trait::Float;

use ndarray::{Array, ArrayBase, Axis, Data, Dimension};

/// Map unconstrained parameters to non-decreasing Bernstein coefficients with softplus
///
/// See [constrain_theta_with] for details.
pub fn constrain_theta<T, S, D>(h: &ArrayBase<S, D>) -> Array<T, D>
where
    T: Float,
    S: Data<Elem = T>,
    D: Dimension,
{
    constrain_theta_with(h, T::softplus)
}

/// Map unconstrained parameters to non-decreasing Bernstein coefficients
///
/// Along the last axis $\theta_0 = h_0$ and $\theta_k = \theta_{k-1} + f(h_k)$, where `f` must be
/// a non-negative map. Leading axes are batch axes and are processed independently.
pub fn constrain_theta_with<T, S, D, F>(h: &ArrayBase<S, D>, f: F) -> Array<T, D>
where
    T: Float,
    S: Data<Elem = T>,
    D: Dimension,
    F: Fn(T) -> T,
{
    let mut theta = h.to_owned();
    if theta.ndim() == 0 {
        return theta;
    }
    let last = Axis(theta.ndim() - 1);
    for mut lane in theta.lanes_mut(last) {
        let mut iter = lane.iter_mut();
        let Some(first) = iter.next() else {
            continue;
        };
        let mut acc = *first;
        for v in iter {
            acc += f(*v);
            *v = acc;
        }
    }
    theta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    use approx::assert_relative_eq;
    use ndarray::{Array2, arr1, array};

    #[test]
    fn zeros_give_log2_increments() {
        let theta = constrain_theta(&Array1::<f64>::zeros(4));
        let ln2 = 2.0_f64.ln();
        for (k, &t) in theta.iter().enumerate() {
            assert_relative_eq!(t, ln2 * k as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn first_element_is_kept() {
        let theta = constrain_theta(&arr1(&[-3.5_f32, 0.0]));
        assert_eq!(theta[0], -3.5);
    }

    #[test]
    fn large_magnitude_inputs_stay_ordered() {
        let theta = constrain_theta(&arr1(&[-1e3_f64, 1e3, -1e3, 1e3, -1e30, 1e30]));
        assert!(theta.iter().all(|t| t.is_finite()));
        assert!(is_non_decreasing(theta.as_slice().unwrap()));
        assert_relative_eq!(theta[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn random_inputs_are_ordered() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            let h = randvec::<f64>(&mut rng, 12).mapv(|x| 20.0 * x);
            let theta = constrain_theta(&h);
            assert!(is_non_decreasing(theta.as_slice().unwrap()));
        }
    }

    #[test]
    fn batches_are_independent() {
        let h = array![[0.0_f64, 0.0, 0.0], [1.0, -100.0, -100.0]];
        let theta: Array2<f64> = constrain_theta(&h);
        assert_relative_eq!(theta[[0, 2]], 2.0 * 2.0_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(theta[[1, 0]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(theta[[1, 2]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn custom_positive_map() {
        let theta = constrain_theta_with(&arr1(&[1.0_f64, 0.0, 0.0]), f64::exp);
        assert_eq!(theta, arr1(&[1.0, 2.0, 3.0]));
    }
}
