use serde::{Serialize, Deserialize};
use super::{LdaError, NalgebraEigen};

/// Tunable constants of the fit. Missing JSON fields fall back to their defaults,
/// so `{}` or `{ "tol" : 1e-3 }` are valid settings documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LdaSettings {

    /// Rejects variables whose pooled variance is less than tol^2.
    pub tol : f64,

    pub eigen_eps : f64,

    pub max_iter : usize

}

impl Default for LdaSettings {

    fn default() -> Self {
        let eigen = NalgebraEigen::default();
        Self { tol : 1E-4, eigen_eps : eigen.eps, max_iter : eigen.max_iter }
    }

}

impl LdaSettings {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn tol(mut self, tol : f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn eigen_eps(mut self, eps : f64) -> Self {
        self.eigen_eps = eps;
        self
    }

    pub fn max_iter(mut self, max_iter : usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn from_json(s : &str) -> Result<Self, LdaError> {
        let settings : Self = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), LdaError> {
        if !(self.tol >= 0.0) {
            return Err(LdaError::InvalidTolerance(self.tol));
        }
        if !(self.eigen_eps >= 0.0) {
            return Err(LdaError::InvalidConvergence(self.eigen_eps));
        }
        Ok(())
    }

    /// The default eigensolver configured by these settings.
    pub fn solver(&self) -> NalgebraEigen {
        NalgebraEigen { eps : self.eigen_eps, max_iter : self.max_iter }
    }

}
