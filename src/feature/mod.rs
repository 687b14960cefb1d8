/// Linear discriminant analysis over the pooled covariance of a labelled sample.
pub mod lda;
