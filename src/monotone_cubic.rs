use crate::error::BijectorError;
use crate::float_trait::Float;

use itertools::Itertools;

/// Monotonicity-preserving piecewise cubic Hermite interpolation (PCHIP)
///
/// Node slopes follow Fritsch & Carlson with the weighted harmonic mean of Fritsch & Butland, so
/// the interpolant is monotone on every interval where the data are. Queries outside of the
/// node range are clamped to it.
#[derive(Clone, Debug, PartialEq)]
pub struct MonotoneCubicInterpolator<T> {
    xs: Vec<T>,
    ys: Vec<T>,
    slopes: Vec<T>,
}

impl<T> MonotoneCubicInterpolator<T>
where
    T: Float,
{
    /// Build the interpolant from nodes with non-decreasing `xs`
    ///
    /// Repeated `xs` values are collapsed to their first occurrence. At least two distinct nodes
    /// are required.
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, BijectorError> {
        if xs.len() != ys.len() {
            return Err(BijectorError::ShapeMismatch {
                left: vec![xs.len()],
                right: vec![ys.len()],
            });
        }
        if xs.iter().tuple_windows().any(|(a, b)| !(a <= b)) {
            return Err(BijectorError::UnsortedSamples);
        }
        let (xs, ys): (Vec<T>, Vec<T>) = xs
            .iter()
            .copied()
            .zip(ys.iter().copied())
            .dedup_by(|(x1, _), (x2, _)| x1 == x2)
            .unzip();
        if xs.len() < 2 {
            return Err(BijectorError::InsufficientSamples {
                got: xs.len(),
                need: 2,
            });
        }
        let slopes = Self::node_slopes(&xs, &ys);
        Ok(Self { xs, ys, slopes })
    }

    fn node_slopes(xs: &[T], ys: &[T]) -> Vec<T> {
        let h: Vec<T> = xs.iter().tuple_windows().map(|(&a, &b)| b - a).collect();
        let delta: Vec<T> = ys
            .iter()
            .tuple_windows()
            .zip(h.iter())
            .map(|((&a, &b), &h)| (b - a) / h)
            .collect();

        let n = xs.len();
        if n == 2 {
            return vec![delta[0]; 2];
        }

        let mut slopes = vec![T::zero(); n];
        for k in 1..n - 1 {
            let (d0, d1) = (delta[k - 1], delta[k]);
            if d0 * d1 > T::zero() {
                let w1 = T::two() * h[k] + h[k - 1];
                let w2 = h[k] + T::two() * h[k - 1];
                slopes[k] = (w1 + w2) / (w1 / d0 + w2 / d1);
            }
        }
        slopes[0] = Self::edge_slope(h[0], h[1], delta[0], delta[1]);
        slopes[n - 1] = Self::edge_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
        slopes
    }

    /// One-sided three-point estimate, limited to keep the end interval monotone
    fn edge_slope(h0: T, h1: T, d0: T, d1: T) -> T {
        let three = T::two() + T::one();
        let d = ((T::two() * h0 + h1) * d0 - h0 * d1) / (h0 + h1);
        if d.signum() != d0.signum() || d0.is_zero() {
            T::zero()
        } else if d0.signum() != d1.signum() && d.abs() > three * d0.abs() {
            three * d0
        } else {
            d
        }
    }

    pub fn x_min(&self) -> T {
        self.xs[0]
    }

    pub fn x_max(&self) -> T {
        self.xs[self.xs.len() - 1]
    }

    pub fn interpolate(&self, x: T) -> T {
        if x.is_nan() {
            return x;
        }
        let x = num_traits::clamp(x, self.x_min(), self.x_max());
        let i = self
            .xs
            .partition_point(|&node| node <= x)
            .saturating_sub(1)
            .min(self.xs.len() - 2);
        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;
        let one_m_t = T::one() - t;
        let h10 = t * one_m_t * one_m_t;
        let h01 = t * t * (T::two() + T::one() - T::two() * t);
        let h11 = t * t * (t - T::one());
        // relative to the left node, so a flat interval returns its node value exactly
        self.ys[i]
            + (self.ys[i + 1] - self.ys[i]) * h01
            + h * (h10 * self.slopes[i] + h11 * self.slopes[i + 1])
    }
}
