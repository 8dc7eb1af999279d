use crate::broadcast::{map_broadcast, try_map_broadcast};
use crate::coefficients::Coefficients;
use crate::config::BernsteinBijectorOptions;
use crate::constraint::constrain_theta;
use crate::error::BijectorError;
use crate::extended::ExtendedPolynomial;
use crate::extrapolation::BoundaryCache;
use crate::float_trait::Float;
use crate::inverse::{InverseSolver, InverseSolverTrait};
use crate::polynomial::PolynomialCore;

use macro_const::macro_const;
use ndarray::{ArrayBase, ArrayD, ArrayViewD, Data, Dimension};

macro_const! {
    const DOC: &str = r"
Bernstein polynomial bijector

Strictly monotonic transform of the real line defined by a Bernstein polynomial of order $M$
with coefficients $\theta_0 \le \theta_1 \le \dots \le \theta_M$:
$$
P(y) = \frac1{M + 1} \sum_{k=0}^{M} \theta_k\, \mathrm{Beta}(y | k + 1, M - k + 1),
\quad y \in [\varepsilon, 1 - \varepsilon],
$$
continued by an affine tail outside of $[\varepsilon, 1 - \varepsilon]$, see
[Extrapolation](crate::Extrapolation). Its derivative is the order $M - 1$ polynomial with
coefficients $M (\theta_{k+1} - \theta_k)$, so the log-det-Jacobian is analytic.

Coefficients may have leading batch axes, the last axis enumerates $\theta_k$. Inputs of any
shape are broadcast against the batch shape with the numpy rules.
";
}

#[doc = DOC!()]
#[derive(Debug)]
pub struct BernsteinBijector<T: Float> {
    coefficients: Coefficients<T>,
    transform: ExtendedPolynomial<T>,
    solver: InverseSolver<T>,
    options: BernsteinBijectorOptions,
}

/// Inverse values with the number of elements which have reduced precision
#[derive(Clone, Debug, PartialEq)]
pub struct InverseReport<T> {
    pub values: ArrayD<T>,
    /// Elements where the root search stopped at the iteration limit
    pub reduced_precision: usize,
}

impl<T> BernsteinBijector<T>
where
    T: Float,
{
    pub const fn doc() -> &'static str {
        DOC
    }

    /// Construct from Bernstein coefficients, the last axis enumerates them
    ///
    /// With `validate_args` non-monotone coefficients are rejected, otherwise they are accepted
    /// and [is_increasing](Self::is_increasing) reports them.
    pub fn new<S, D>(
        thetas: &ArrayBase<S, D>,
        options: BernsteinBijectorOptions,
    ) -> Result<Self, BijectorError>
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        let coefficients = Coefficients::new(thetas)?;
        if options.validate_args {
            if let Some((batch_index, position)) = coefficients.first_decrease() {
                return Err(BijectorError::InvalidCoefficients {
                    batch_index,
                    position,
                });
            }
        }
        let core = PolynomialCore::new(coefficients.matrix().clone())?;
        let transform = ExtendedPolynomial::new(core, options.extrapolation);
        let solver = InverseSolver::new(&options.inverse, coefficients.order())?;
        let dtype = T::DTYPE;
        tracing::debug!(
            %dtype,
            order = coefficients.order(),
            batch_shape = ?coefficients.batch_shape(),
            extrapolation = ?options.extrapolation,
            "constructed Bernstein bijector"
        );
        Ok(Self {
            coefficients,
            transform,
            solver,
            options,
        })
    }

    pub fn with_defaults<S, D>(thetas: &ArrayBase<S, D>) -> Result<Self, BijectorError>
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        Self::new(thetas, BernsteinBijectorOptions::default())
    }

    /// Construct from unconstrained parameters mapped by [constrain_theta]
    pub fn from_unconstrained<S, D>(
        h: &ArrayBase<S, D>,
        options: BernsteinBijectorOptions,
    ) -> Result<Self, BijectorError>
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        Self::new(&constrain_theta(h), options)
    }

    pub fn order(&self) -> usize {
        self.coefficients.order()
    }

    pub fn batch_shape(&self) -> &[usize] {
        self.coefficients.batch_shape()
    }

    pub fn thetas(&self) -> &ArrayD<T> {
        self.coefficients.thetas()
    }

    pub fn options(&self) -> &BernsteinBijectorOptions {
        &self.options
    }

    /// Boundary values and slopes of a batch element, indexed in row-major batch order
    pub fn boundary(&self, batch: usize) -> Option<&BoundaryCache<T>> {
        (batch < self.coefficients.batch_size()).then(|| self.transform.boundary(batch))
    }

    /// Are the coefficients non-decreasing for every batch element?
    pub fn is_increasing(&self) -> bool {
        self.coefficients.is_increasing()
    }

    pub fn forward<S, D>(&self, x: &ArrayBase<S, D>) -> Result<ArrayD<T>, BijectorError>
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        map_broadcast(x.view().into_dyn(), self.batch_shape(), |x, batch| {
            self.transform.value(batch, x)
        })
    }

    pub fn forward_log_det_jacobian<S, D>(
        &self,
        x: &ArrayBase<S, D>,
    ) -> Result<ArrayD<T>, BijectorError>
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        map_broadcast(x.view().into_dyn(), self.batch_shape(), |x, batch| {
            self.transform.log_det_jacobian(batch, x)
        })
    }

    pub fn inverse<S, D>(&self, y: &ArrayBase<S, D>) -> Result<ArrayD<T>, BijectorError>
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        self.inverse_with_report(y).map(|report| report.values)
    }

    /// Inverse which also counts the elements of reduced precision
    ///
    /// Values in a tail image are inverted in closed form, the others are passed to the
    /// configured solver. An unreachable value returns [BijectorError::InputDomain].
    pub fn inverse_with_report<S, D>(
        &self,
        y: &ArrayBase<S, D>,
    ) -> Result<InverseReport<T>, BijectorError>
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        let mut reduced_precision = 0;
        let values = try_map_broadcast(y.view().into_dyn(), self.batch_shape(), |z, batch| {
            if z.is_nan() {
                return Ok(z);
            }
            if let Some(x) = self.transform.tail_inverse(batch, z) {
                return Ok(x);
            }
            let inverted = self.solver.invert(&self.transform, batch, z)?;
            if !inverted.converged {
                reduced_precision += 1;
            }
            Ok(inverted.value)
        })?;
        if reduced_precision > 0 {
            tracing::warn!(
                count = reduced_precision,
                "root search reached the iteration limit, inverse has reduced precision"
            );
        }
        Ok(InverseReport {
            values,
            reduced_precision,
        })
    }

    /// -forward_log_det_jacobian(inverse(y))
    pub fn inverse_log_det_jacobian<S, D>(
        &self,
        y: &ArrayBase<S, D>,
    ) -> Result<ArrayD<T>, BijectorError>
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        let x = self.inverse(y)?;
        Ok(-self.forward_log_det_jacobian(&x)?)
    }
}

/// Contract of a scalar bijector used by flow and distribution frameworks
pub trait BijectorTrait<T: Float>: Send + Sync {
    fn forward(&self, x: ArrayViewD<'_, T>) -> Result<ArrayD<T>, BijectorError>;

    fn inverse(&self, y: ArrayViewD<'_, T>) -> Result<ArrayD<T>, BijectorError>;

    fn forward_log_det_jacobian(&self, x: ArrayViewD<'_, T>) -> Result<ArrayD<T>, BijectorError>;

    fn inverse_log_det_jacobian(&self, y: ArrayViewD<'_, T>) -> Result<ArrayD<T>, BijectorError> {
        let x = self.inverse(y)?;
        Ok(-self.forward_log_det_jacobian(x.view())?)
    }

    fn is_increasing(&self) -> bool;
}

impl<T> BijectorTrait<T> for BernsteinBijector<T>
where
    T: Float,
{
    fn forward(&self, x: ArrayViewD<'_, T>) -> Result<ArrayD<T>, BijectorError> {
        BernsteinBijector::forward(self, &x)
    }

    fn inverse(&self, y: ArrayViewD<'_, T>) -> Result<ArrayD<T>, BijectorError> {
        BernsteinBijector::inverse(self, &y)
    }

    fn forward_log_det_jacobian(&self, x: ArrayViewD<'_, T>) -> Result<ArrayD<T>, BijectorError> {
        BernsteinBijector::forward_log_det_jacobian(self, &x)
    }

    fn inverse_log_det_jacobian(&self, y: ArrayViewD<'_, T>) -> Result<ArrayD<T>, BijectorError> {
        BernsteinBijector::inverse_log_det_jacobian(self, &y)
    }

    fn is_increasing(&self) -> bool {
        BernsteinBijector::is_increasing(self)
    }
}
