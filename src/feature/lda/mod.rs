use nalgebra::*;
use serde::{Serialize, Deserialize};
use crate::fit::Estimator;
use tracing::{debug, trace, warn};

mod error;

/// Validation of class labels into the dense index set 0..k.
pub mod labels;

/// Class counts, means, priors and pooled covariance of a labelled sample.
pub mod moments;

/// Eigendecomposition of the pooled covariance behind a swappable solver.
pub mod spectral;

mod settings;

pub use error::*;
pub use labels::LabelIndex;
pub use moments::ClassMoments;
pub use spectral::*;
pub use settings::*;

/// LDA projects a data set into the eigen basis of its pooled covariance
/// matrix, and classifies observations by the Gaussian discriminant rule
/// that assumes all k classes share this covariance. Each class i is scored by
///
/// ln(prior_i) - 0.5 * sum_j d_j^2 / |lambda_j|
///
/// where d = V^T (x - mu_i) is the residual to the class mean re-expressed along
/// the eigenvectors V, and lambda_j the corresponding eigenvalues. This is the
/// Mahalanobis distance to the class mean under the pooled covariance, computed
/// over decorrelated coordinates.
///
/// A DiscriminantModel only exists after a successful fit, and exposes no
/// mutation afterwards, so it can be shared across threads by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscriminantModel {

    n : usize,

    counts : Vec<usize>,

    // Class mean vectors (k x p).
    means : DMatrix<f64>,

    priors : DVector<f64>,

    // Constant term of the discriminant function of each class.
    log_priors : DVector<f64>,

    cov : DMatrix<f64>,

    basis : SpectralBasis

}

impl DiscriminantModel {

    /// Fits the model to the n x p sample x with labels y in 0..k,
    /// using default settings and the nalgebra eigensolver.
    pub fn fit(x : &DMatrix<f64>, y : &[i64]) -> Result<Self, LdaError> {
        Self::fit_with_settings(x, y, &LdaSettings::default())
    }

    pub fn fit_with_settings(x : &DMatrix<f64>, y : &[i64], settings : &LdaSettings) -> Result<Self, LdaError> {
        Self::fit_with(x, y, settings, &settings.solver())
    }

    /// Fits the model, delegating the factorization of the pooled covariance
    /// to the informed solver. Either every step succeeds, or no model is built.
    pub fn fit_with(
        x : &DMatrix<f64>,
        y : &[i64],
        settings : &LdaSettings,
        solver : &dyn SymmetricEigensolver
    ) -> Result<Self, LdaError> {
        settings.validate()?;
        let (n, p) = x.shape();
        if p == 0 {
            return Err(LdaError::dims("feature columns", 1, 0));
        }
        let LabelIndex { k } = LabelIndex::new(y, n)?;
        debug!(n, p, k, "fitting linear discriminant");

        let ClassMoments { counts, means, priors, log_priors, cov, .. } = ClassMoments::estimate(x, y, k, settings.tol)?;
        let basis = solver.decompose(&cov)?;
        if basis.eigenvectors.nrows() != p {
            return Err(LdaError::dims("eigenvector rows", p, basis.eigenvectors.nrows()));
        }
        if basis.eigenvalues.nrows() != basis.eigenvectors.ncols() {
            return Err(LdaError::dims("eigenvalues", basis.eigenvectors.ncols(), basis.eigenvalues.nrows()));
        }
        trace!(eigenvalues = ?basis.eigenvalues.as_slice(), "eigen basis {}", basis.eigenvectors);
        Ok(Self { n, counts, means, priors, log_priors, cov, basis })
    }

    pub fn n_samples(&self) -> usize {
        self.n
    }

    pub fn n_classes(&self) -> usize {
        self.means.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.means.ncols()
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts[..]
    }

    /// Class mean vectors, one per row.
    pub fn means(&self) -> &DMatrix<f64> {
        &self.means
    }

    pub fn priors(&self) -> &DVector<f64> {
        &self.priors
    }

    pub fn log_priors(&self) -> &DVector<f64> {
        &self.log_priors
    }

    /// Pooled covariance: the scatter about the grand mean divided by n - k.
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.cov
    }

    pub fn eigenvalues(&self) -> &DVector<f64> {
        &self.basis.eigenvalues
    }

    /// Eigenvectors of the pooled covariance, one per column.
    pub fn eigenvectors(&self) -> &DMatrix<f64> {
        &self.basis.eigenvectors
    }

    /// Projects the rows of the m x p matrix x onto the eigen basis.
    pub fn transform(&self, x : &DMatrix<f64>) -> Result<DMatrix<f64>, LdaError> {
        if x.ncols() != self.n_features() {
            return Err(LdaError::dims("transform columns", self.n_features(), x.ncols()));
        }
        Ok(x * &self.basis.eigenvectors)
    }

    /// Discriminant score of each class for the observation x.
    pub fn scores(&self, x : &[f64]) -> Result<DVector<f64>, LdaError> {
        let p = self.n_features();
        if x.len() != p {
            return Err(LdaError::dims("input vector", p, x.len()));
        }
        let x = DVector::from_column_slice(x);
        let lambda = &self.basis.eigenvalues;
        Ok(DVector::from_fn(self.n_classes(), |i, _| {
            let resid = &x - self.means.row(i).transpose();
            let d = self.basis.eigenvectors.tr_mul(&resid);
            let f : f64 = d.iter().zip(lambda.iter()).map(|(d, l)| d * d / l.abs() ).sum();
            self.log_priors[i] - 0.5 * f
        }))
    }

    /// Class with the largest discriminant score. A class only replaces the
    /// current best when its score is strictly greater, so ties go to the
    /// lowest class index.
    pub fn predict(&self, x : &[f64]) -> Result<usize, LdaError> {
        let scores = self.scores(x)?;
        let mut y = 0;
        let mut max = f64::NEG_INFINITY;
        for (i, f) in scores.iter().enumerate() {
            if max < *f {
                max = *f;
                y = i;
            }
        }
        Ok(y)
    }

    /// Predicts each row of the m x p matrix x.
    pub fn predict_rows(&self, x : &DMatrix<f64>) -> Result<Vec<usize>, LdaError> {
        if x.ncols() != self.n_features() {
            return Err(LdaError::dims("predict columns", self.n_features(), x.ncols()));
        }
        x.row_iter()
            .map(|row| self.predict(&row.iter().copied().collect::<Vec<_>>()[..]) )
            .collect()
    }

    pub fn to_json(&self) -> Result<String, LdaError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads a model written by to_json, checking that its parts agree in shape.
    pub fn from_json(s : &str) -> Result<Self, LdaError> {
        let model : Self = serde_json::from_str(s)?;
        model.check_shapes()?;
        Ok(model)
    }

    fn check_shapes(&self) -> Result<(), LdaError> {
        let (k, p) = self.means.shape();
        let q = self.basis.eigenvalues.nrows();
        if k < 2 {
            return Err(LdaError::InsufficientClasses { found : k });
        }
        let consistent = self.counts.len() == k &&
            self.priors.nrows() == k &&
            self.log_priors.nrows() == k &&
            self.cov.shape() == (p, p) &&
            self.basis.eigenvectors.shape() == (p, q) &&
            self.counts.iter().sum::<usize>() == self.n;
        if !consistent {
            return Err(LdaError::InvalidSnapshot(format!("inconsistent shapes for {} classes over {} features", k, p)));
        }
        if let Some(class) = self.counts.iter().position(|c| *c == 0) {
            return Err(LdaError::EmptyClass { class });
        }
        for i in 0..k {
            let prior = self.counts[i] as f64 / self.n as f64;
            if (self.priors[i] - prior).abs() > 1E-12 || (self.log_priors[i] - prior.ln()).abs() > 1E-9 {
                return Err(LdaError::InvalidSnapshot(format!("prior of class {} disagrees with its count", i)));
            }
        }
        Ok(())
    }

}

/// Where an LDA estimator stands: fit runs at most once, and a failed
/// fit is terminal just as a successful one.
#[derive(Debug, Clone)]
enum FitState {
    Unfitted,
    Fitted(DiscriminantModel),
    Failed(LdaError)
}

/// Estimator wrapping a DiscriminantModel into the Unfitted -> Fitted | Failed
/// lifecycle. Until a fit succeeds, transform and predict fail with
/// LdaError::ModelNotFitted instead of returning numeric output.
#[derive(Debug, Clone)]
pub struct LDA {
    settings : LdaSettings,
    state : FitState
}

impl Default for LDA {

    fn default() -> Self {
        Self::new(LdaSettings::default())
    }

}

impl LDA {

    pub fn new(settings : LdaSettings) -> Self {
        Self { settings, state : FitState::Unfitted }
    }

    pub fn settings(&self) -> &LdaSettings {
        &self.settings
    }

    pub fn model(&self) -> Result<&DiscriminantModel, LdaError> {
        match &self.state {
            FitState::Fitted(model) => Ok(model),
            _ => Err(LdaError::ModelNotFitted)
        }
    }

    /// The error that moved this estimator to the failed state, if any.
    pub fn failure(&self) -> Option<&LdaError> {
        match &self.state {
            FitState::Failed(e) => Some(e),
            _ => None
        }
    }

    pub fn transform(&self, x : &DMatrix<f64>) -> Result<DMatrix<f64>, LdaError> {
        self.model()?.transform(x)
    }

    pub fn predict(&self, x : &[f64]) -> Result<usize, LdaError> {
        self.model()?.predict(x)
    }

}

impl Estimator<DiscriminantModel> for LDA {

    type Error = LdaError;

    fn fit<'a>(&'a mut self, x : &DMatrix<f64>, y : &[i64]) -> Result<&'a DiscriminantModel, LdaError> {
        if !matches!(self.state, FitState::Unfitted) {
            return Err(LdaError::AlreadyFitted);
        }
        match DiscriminantModel::fit_with_settings(x, y, &self.settings) {
            Ok(model) => {
                self.state = FitState::Fitted(model);
                self.model()
            },
            Err(e) => {
                warn!(error = %e, "discriminant fit failed");
                self.state = FitState::Failed(e.clone());
                Err(e)
            }
        }
    }

    fn fitted<'a>(&'a self) -> Option<&'a DiscriminantModel> {
        self.model().ok()
    }

}
