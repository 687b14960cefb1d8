/// Supervised estimation interface shared by the fitted models of this crate.
pub mod fit;

/// Feature transformations and classifiers derived from labelled samples
/// (Linear discriminant analysis).
pub mod feature;

pub use feature::lda::{LDA, DiscriminantModel, LdaError, LdaSettings};

pub use fit::Estimator;
