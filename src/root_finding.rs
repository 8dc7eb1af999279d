use crate::error::RootSearchError;
use crate::float_trait::Float;

/// Outcome of [Chandrupatla::find_root]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootSearchResult<T> {
    pub root: T,
    /// f(root)
    pub objective: T,
    pub iterations: usize,
    /// `false` if the iteration limit was reached before the tolerance
    pub converged: bool,
}

/// Chandrupatla's bracketed root finder
///
/// Derivative-free method mixing bisection and inverse quadratic interpolation, it keeps a
/// bracket with a sign change on every iteration, see T. R. Chandrupatla, "A new hybrid
/// quadratic/bisection algorithm for finding the zero of a nonlinear function without using
/// derivatives", Advances in Engineering Software 28 (1997).
///
/// The search stops when the bracket is narrower than
/// `2 * epsilon * |x| + position_tolerance`, or when `|f(x)| <= value_tolerance`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Chandrupatla<T> {
    pub position_tolerance: T,
    pub value_tolerance: T,
    pub max_iterations: usize,
}

impl<T> Chandrupatla<T>
where
    T: Float,
{
    pub fn new(position_tolerance: T, value_tolerance: T, max_iterations: usize) -> Self {
        Self {
            position_tolerance,
            value_tolerance,
            max_iterations,
        }
    }

    /// Find a root of `f` on [low, high]
    ///
    /// `f(low)` and `f(high)` must have opposite signs or one of them must be zero, otherwise
    /// [RootSearchError::NoBracket] is returned.
    pub fn find_root<F>(
        &self,
        f: F,
        low: T,
        high: T,
    ) -> Result<RootSearchResult<T>, RootSearchError>
    where
        F: Fn(T) -> T,
    {
        let f_low = f(low);
        let f_high = f(high);

        if f_low.is_zero() {
            return Ok(self.result(low, f_low, 0, true));
        }
        if f_high.is_zero() {
            return Ok(self.result(high, f_high, 0, true));
        }
        if !(f_low.signum() * f_high.signum() < T::zero()) {
            return Err(RootSearchError::NoBracket {
                f_low: f_low.into(),
                f_high: f_high.into(),
            });
        }

        let (mut a, mut fa) = (high, f_high);
        let (mut b, mut fb) = (low, f_low);
        let mut c: T;
        let mut fc: T;
        let mut t = T::half();
        let (mut xm, mut fm) = if fa.abs() < fb.abs() { (a, fa) } else { (b, fb) };

        for iteration in 1..=self.max_iterations {
            let xt = a + t * (b - a);
            let ft = f(xt);
            if ft.signum() == fa.signum() {
                c = a;
                fc = fa;
            } else {
                c = b;
                b = a;
                fc = fb;
                fb = fa;
            }
            a = xt;
            fa = ft;

            (xm, fm) = if fa.abs() < fb.abs() { (a, fa) } else { (b, fb) };
            if fm.abs() <= self.value_tolerance {
                return Ok(self.result(xm, fm, iteration, true));
            }

            let tol = T::two() * T::epsilon() * xm.abs() + self.position_tolerance;
            let tlim = tol / (b - c).abs();
            if !(tlim <= T::half()) {
                return Ok(self.result(xm, fm, iteration, true));
            }

            let xi = (a - b) / (c - b);
            let phi = (fa - fb) / (fc - fb);
            t = if T::one() - (T::one() - xi).sqrt() < phi && phi < xi.sqrt() {
                fa / (fb - fa) * fc / (fb - fc)
                    + (c - a) / (b - a) * fa / (fc - fa) * fb / (fc - fb)
            } else {
                T::half()
            };
            t = t.max(tlim).min(T::one() - tlim);
        }

        Ok(self.result(xm, fm, self.max_iterations, false))
    }

    fn result(
        &self,
        root: T,
        objective: T,
        iterations: usize,
        converged: bool,
    ) -> RootSearchResult<T> {
        RootSearchResult {
            root,
            objective,
            iterations,
            converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    fn solver() -> Chandrupatla<f64> {
        Chandrupatla::new(1e-12, 0.0, 100)
    }

    #[test]
    fn cubic_root() {
        let f = |x: f64| x * x * x - x - 2.0;
        let result = solver().find_root(f, 1.0, 2.0).unwrap();
        assert!(result.converged);
        assert_abs_diff_eq!(result.root, 1.5213797068045676, epsilon = 1e-10);
    }

    #[test]
    fn reversed_bracket() {
        let f = |x: f64| x * x - 2.0;
        let result = solver().find_root(f, 2.0, 0.0).unwrap();
        assert_abs_diff_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn root_at_bracket_end() {
        let result = solver().find_root(|x: f64| x - 1.0, 0.0, 1.0).unwrap();
        assert_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn no_bracket() {
        let result = solver().find_root(|x: f64| x * x + 1.0, -1.0, 1.0);
        assert_eq!(
            result,
            Err(RootSearchError::NoBracket {
                f_low: 2.0,
                f_high: 2.0
            })
        );
    }

    #[test]
    fn nan_objective_is_no_bracket() {
        let result = solver().find_root(|_: f64| f64::NAN, 0.0, 1.0);
        assert!(result.is_err());
    }

    #[test]
    fn iteration_cap_returns_estimate() {
        let solver = Chandrupatla::new(0.0, 0.0, 3);
        let result = solver.find_root(|x: f64| x.exp() - 2.0, 0.0, 1.0).unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
        assert!((0.0..=1.0).contains(&result.root));
        assert_abs_diff_eq!(result.root, std::f64::consts::LN_2, epsilon = 0.1);
    }

    #[test]
    fn single_precision() {
        let solver = Chandrupatla::new(1e-6_f32, 0.0, 50);
        let result = solver.find_root(|x: f32| x.powi(3) - 0.125, 0.0, 1.0).unwrap();
        assert!(result.converged);
        assert_abs_diff_eq!(result.root, 0.5, epsilon = 1e-5);
    }
}
