use nalgebra::*;
use std::convert::TryFrom;
use super::LdaError;
use tracing::debug;

/// First and second moments of a labelled sample: the grand column mean,
/// class counts, class means (k x p), priors with their log-constants, and
/// the pooled covariance (p x p).
///
/// The covariance accumulates deviations about the grand mean over all rows,
/// not about each row's class mean, and is then divided by the n - k degrees
/// of freedom of the within-class estimate.
#[derive(Debug, Clone)]
pub struct ClassMoments {

    pub col_mean : DVector<f64>,

    pub counts : Vec<usize>,

    pub means : DMatrix<f64>,

    pub priors : DVector<f64>,

    pub log_priors : DVector<f64>,

    pub cov : DMatrix<f64>

}

/// Per-class running sums and counts, folded over the sample rows.
struct ClassSums {
    sums : DMatrix<f64>,
    counts : Vec<usize>
}

impl ClassSums {

    fn new(k : usize, p : usize) -> Self {
        Self { sums : DMatrix::zeros(k, p), counts : vec![0; k] }
    }

    fn accumulate(x : &DMatrix<f64>, y : &[i64], k : usize) -> Result<Self, LdaError> {
        let p = x.ncols();
        x.row_iter().zip(y.iter()).try_fold(Self::new(k, p), |mut acc, (row, label)| {
            let c = match usize::try_from(*label) {
                Ok(c) if c < k => c,
                Ok(_) => return Err(LdaError::UnknownClass { label : *label, k }),
                Err(_) => return Err(LdaError::InvalidLabelRange { label : *label })
            };
            acc.counts[c] += 1;
            for j in 0..p {
                acc.sums[(c, j)] += row[j];
            }
            Ok(acc)
        })
    }

}

impl ClassMoments {

    /// Estimates the moments of x (n x p) given labels already validated
    /// to lie in 0..k. Fails if a class is empty, if n <= k, or if any
    /// feature has pooled variance below tol^2.
    pub fn estimate(
        x : &DMatrix<f64>,
        y : &[i64],
        k : usize,
        tol : f64
    ) -> Result<Self, LdaError> {
        let (n, p) = x.shape();
        if y.len() != n {
            return Err(LdaError::dims("label vector", n, y.len()));
        }
        if !(tol >= 0.0) {
            return Err(LdaError::InvalidTolerance(tol));
        }
        if n <= k {
            return Err(LdaError::InsufficientSamples { n, k });
        }

        let col_mean = DVector::from_iterator(p, x.column_iter().map(|c| c.sum() / n as f64 ));
        debug!(n, p, k, col_mean = ?col_mean.as_slice(), "accumulating class moments");

        let ClassSums { sums, counts } = ClassSums::accumulate(x, y, k)?;
        if let Some(class) = counts.iter().position(|c| *c == 0) {
            return Err(LdaError::EmptyClass { class });
        }
        let means = DMatrix::from_fn(k, p, |i, j| sums[(i, j)] / counts[i] as f64 );
        let priors = DVector::from_iterator(k, counts.iter().map(|c| *c as f64 / n as f64 ));
        let log_priors = priors.map(f64::ln);

        let cov = Self::pooled_covariance(x, &col_mean, n - k);
        let tol = tol * tol;
        for j in 0..p {
            if !(cov[(j, j)] >= tol) {
                return Err(LdaError::NearSingularCovariance { feature_index : j });
            }
        }
        debug!(counts = ?counts, priors = ?priors.as_slice(), "pooled covariance {}", cov);
        Ok(Self { col_mean, counts, means, priors, log_priors, cov })
    }

    /// Accumulates the lower triangle of the scatter about the grand mean,
    /// scales it by the degrees of freedom and mirrors it to the upper triangle.
    fn pooled_covariance(x : &DMatrix<f64>, col_mean : &DVector<f64>, dof : usize) -> DMatrix<f64> {
        let p = x.ncols();
        let mut cov = DMatrix::zeros(p, p);
        for row in x.row_iter() {
            for j in 0..p {
                let dj = row[j] - col_mean[j];
                for l in 0..=j {
                    cov[(j, l)] += dj * (row[l] - col_mean[l]);
                }
            }
        }
        for j in 0..p {
            for l in 0..=j {
                cov[(j, l)] /= dof as f64;
                cov[(l, j)] = cov[(j, l)];
            }
        }
        cov
    }

}
