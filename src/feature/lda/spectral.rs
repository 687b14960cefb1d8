use nalgebra::*;
use serde::{Serialize, Deserialize};
use super::LdaError;

/// Real eigenvalues and right eigenvectors (as columns) of a symmetric matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralBasis {

    pub eigenvalues : DVector<f64>,

    pub eigenvectors : DMatrix<f64>

}

/// Any provider able to factor a symmetric matrix into its eigenvalues and
/// eigenvectors. Implementors only need right eigenvectors, and should return
/// LdaError::DecompositionFailed when the factorization does not converge.
pub trait SymmetricEigensolver {

    fn decompose(&self, m : &DMatrix<f64>) -> Result<SpectralBasis, LdaError>;

}

/// Symmetric QR iteration as implemented by nalgebra::SymmetricEigen.
#[derive(Debug, Clone, Copy)]
pub struct NalgebraEigen {

    /// Off-diagonal magnitude under which the iteration is considered converged.
    pub eps : f64,

    /// Iteration cap; zero means iterate until convergence.
    pub max_iter : usize

}

impl Default for NalgebraEigen {

    fn default() -> Self {
        Self { eps : f64::EPSILON, max_iter : 10_000 }
    }

}

impl SymmetricEigensolver for NalgebraEigen {

    fn decompose(&self, m : &DMatrix<f64>) -> Result<SpectralBasis, LdaError> {
        if !m.is_square() {
            return Err(LdaError::dims("covariance columns", m.nrows(), m.ncols()));
        }
        if m.is_empty() {
            return Err(LdaError::dims("covariance rows", 1, 0));
        }
        if !(self.eps >= 0.0) {
            return Err(LdaError::InvalidConvergence(self.eps));
        }
        let eigen = SymmetricEigen::try_new(m.clone(), self.eps, self.max_iter)
            .ok_or(LdaError::DecompositionFailed)?;
        Ok(SpectralBasis { eigenvalues : eigen.eigenvalues, eigenvectors : eigen.eigenvectors })
    }

}
