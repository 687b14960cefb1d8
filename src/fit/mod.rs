use nalgebra::*;

/// Trait shared by supervised estimators, parametrized by the fitted model they produce.
/// An estimator is built from its settings alone, and only acquires a model by a call
/// to fit(.) over a sample matrix (observations as rows) and its label vector. Once
/// fit(.) returned, the estimator state is final: implementors should refuse a second
/// fit(.) rather than silently replace the model held by earlier callers.
pub trait Estimator<M> {

    type Error;

    /// Runs the estimation algorithm for the informed sample and labels,
    /// returning a reference to the fitted model.
    fn fit<'a>(&'a mut self, x : &DMatrix<f64>, y : &[i64]) -> Result<&'a M, Self::Error>;

    /// If fit(.) has succeeded, returns the fitted model without changing the
    /// estimator state.
    fn fitted<'a>(&'a self) -> Option<&'a M>;

}
