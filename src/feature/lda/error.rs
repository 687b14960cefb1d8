use thiserror::Error;

/// Failures of the fit, transform and predict operations. Every variant is
/// fatal for the call that produced it: the fit aborts without leaving a
/// partially-populated model, and transform/predict never repair their input.
#[derive(Debug, Clone, Error)]
pub enum LdaError {

    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch { what : &'static str, expected : usize, found : usize },

    #[error("Labels must start at zero and be non-negative (found label {label})")]
    InvalidLabelRange { label : i64 },

    #[error("Missing class {label} in label sequence")]
    MissingClass { label : i64 },

    #[error("At least two classes are required (found {found})")]
    InsufficientClasses { found : usize },

    #[error("Label {label} names no class among {k}")]
    UnknownClass { label : i64, k : usize },

    #[error("Sample size {n} is too small for {k} classes")]
    InsufficientSamples { n : usize, k : usize },

    #[error("Class {class} has no observations")]
    EmptyClass { class : usize },

    #[error("Covariance matrix (variable {feature_index}) is close to singular")]
    NearSingularCovariance { feature_index : usize },

    #[error("Eigendecomposition of the pooled covariance did not converge")]
    DecompositionFailed,

    #[error("Model was not fitted")]
    ModelNotFitted,

    #[error("Estimator already ran its fit")]
    AlreadyFitted,

    #[error("Invalid singularity tolerance {0}")]
    InvalidTolerance(f64),

    #[error("Invalid eigensolver convergence threshold {0}")]
    InvalidConvergence(f64),

    #[error("Invalid model snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Serialization error: {0}")]
    Serialization(String)

}

impl LdaError {

    pub(crate) fn dims(what : &'static str, expected : usize, found : usize) -> Self {
        LdaError::DimensionMismatch { what, expected, found }
    }

}

impl From<serde_json::Error> for LdaError {

    fn from(e : serde_json::Error) -> Self {
        LdaError::Serialization(e.to_string())
    }

}
