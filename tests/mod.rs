use nalgebra::*;
use discrim::feature::lda::*;
use discrim::fit::Estimator;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use std::sync::Arc;
use std::thread;

const EPS : f64 = 10E-8;

/// Draws m observations for each center from a spherical normal with the informed deviation.
fn gaussian_clusters(centers : &[[f64; 2]], m : usize, sd : f64, seed : u64) -> (DMatrix<f64>, Vec<i64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, sd).unwrap();
    let n = centers.len() * m;
    let mut x = DMatrix::zeros(n, 2);
    let mut y = Vec::with_capacity(n);
    for (c, center) in centers.iter().enumerate() {
        for r in 0..m {
            let i = c * m + r;
            x[(i, 0)] = center[0] + noise.sample(&mut rng);
            x[(i, 1)] = center[1] + noise.sample(&mut rng);
            y.push(c as i64);
        }
    }
    (x, y)
}

/// Two classes with equal priors, mirrored around the origin.
fn mirrored_classes() -> (DMatrix<f64>, Vec<i64>) {
    let x = DMatrix::from_row_slice(8, 2, &[
        -3.0, 1.0,
        -1.0, 1.0,
        -3.0, -1.0,
        -1.0, -1.0,
        1.0, 1.0,
        3.0, 1.0,
        1.0, -1.0,
        3.0, -1.0
    ]);
    (x, vec![0, 0, 0, 0, 1, 1, 1, 1])
}

#[test]
fn three_separated_classes() {
    let x = DMatrix::from_row_slice(6, 2, &[
        0.0, 0.0,
        0.4, 0.3,
        5.0, 0.1,
        5.5, -0.2,
        0.2, 6.0,
        -0.3, 5.4
    ]);
    let model = DiscriminantModel::fit(&x, &[0, 0, 1, 1, 2, 2]).unwrap();
    assert_eq!(model.n_classes(), 3);
    assert_eq!(model.n_features(), 2);
    assert_eq!(model.counts().iter().sum::<usize>(), 6);
    assert!((model.priors().sum() - 1.0).abs() < EPS);
    for i in 0..3 {
        assert!((model.log_priors()[i] - (1.0f64 / 3.0).ln()).abs() < EPS);
    }
}

#[test]
fn label_validation() {
    let x = DMatrix::from_row_slice(4, 1, &[0.0, 1.0, 5.0, 6.0]);
    assert!(matches!(DiscriminantModel::fit(&x, &[1, 1, 2, 2]), Err(LdaError::InvalidLabelRange { .. })));
    assert!(matches!(DiscriminantModel::fit(&x, &[0, 0, 2, 2]), Err(LdaError::MissingClass { label : 1 })));
    assert!(matches!(DiscriminantModel::fit(&x, &[0, 0, 1]), Err(LdaError::DimensionMismatch { .. })));
    assert!(matches!(DiscriminantModel::fit(&x, &[0, 1, 2, 3]), Err(LdaError::InsufficientSamples { n : 4, k : 4 })));
}

#[test]
fn constant_feature_is_singular() {
    let x = DMatrix::from_row_slice(6, 3, &[
        1.0, 2.0, 10.0,
        3.0, 2.0, -4.0,
        2.0, 2.0, 7.0,
        8.0, 2.0, 0.0,
        9.0, 2.0, 12.0,
        7.5, 2.0, -9.0
    ]);
    let res = DiscriminantModel::fit(&x, &[0, 0, 0, 1, 1, 1]);
    assert!(matches!(res, Err(LdaError::NearSingularCovariance { feature_index : 1 })));
}

#[test]
fn nan_feature_is_singular() {
    let x = DMatrix::from_row_slice(4, 1, &[0.0, f64::NAN, 5.0, 6.0]);
    let mut lda = LDA::default();
    assert!(matches!(lda.fit(&x, &[0, 0, 1, 1]), Err(LdaError::NearSingularCovariance { feature_index : 0 })));
    assert!(matches!(lda.predict(&[5.5]), Err(LdaError::ModelNotFitted)));
}

#[test]
fn empty_feature_set() {
    let x = DMatrix::<f64>::zeros(6, 0);
    assert!(matches!(DiscriminantModel::fit(&x, &[0, 0, 0, 1, 1, 1]), Err(LdaError::DimensionMismatch { .. })));
}

// The pooled covariance accumulates deviations about the grand mean of all rows.
// Deviations about the class means would give 8/6 at the first entry instead of 40/6.
#[test]
fn covariance_uses_grand_mean() {
    let (x, y) = mirrored_classes();
    let model = DiscriminantModel::fit(&x, &y).unwrap();
    let cov = model.covariance();
    assert!((cov[(0, 0)] - 40.0 / 6.0).abs() < EPS);
    assert!((cov[(1, 1)] - 8.0 / 6.0).abs() < EPS);
    assert!(cov[(0, 1)].abs() < EPS);
    assert_eq!(cov[(0, 1)], cov[(1, 0)]);
}

#[test]
fn transform_shape_and_projection() {
    let (x, y) = gaussian_clusters(&[[0.0, 0.0], [4.0, 1.0], [1.0, 5.0]], 20, 0.7, 1);
    let model = DiscriminantModel::fit(&x, &y).unwrap();
    let z = model.transform(&x).unwrap();
    assert_eq!(z.nrows(), x.nrows());
    assert_eq!(z.ncols(), model.eigenvectors().ncols());
    assert!((z.clone() - &x * model.eigenvectors()).amax() < EPS);
    assert_eq!(z, model.transform(&x).unwrap());

    let fresh = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, -2.0, 3.0]);
    assert_eq!(model.transform(&fresh).unwrap().shape(), (2, 2));
}

#[test]
fn class_means_classify_to_their_class() {
    let (x, y) = gaussian_clusters(&[[0.0, 0.0], [6.0, 0.0], [0.0, 6.0]], 30, 0.8, 7);
    let model = DiscriminantModel::fit(&x, &y).unwrap();
    for i in 0..model.n_classes() {
        let mu : Vec<f64> = model.means().row(i).iter().copied().collect();
        assert_eq!(model.predict(&mu).unwrap(), i);
    }
    let pred = model.predict_rows(&x).unwrap();
    let hits = pred.iter().zip(y.iter()).filter(|(p, y)| **p as i64 == **y ).count();
    assert!(hits as f64 / y.len() as f64 > 0.9);
}

#[test]
fn midpoint_tie_goes_to_lowest_class() {
    let (x, y) = mirrored_classes();
    let model = DiscriminantModel::fit(&x, &y).unwrap();
    let scores = model.scores(&[0.0, 0.0]).unwrap();
    assert_eq!(scores[0], scores[1]);
    assert_eq!(model.predict(&[0.0, 0.0]).unwrap(), 0);
    assert_eq!(model.predict(&[-0.5, 0.0]).unwrap(), 0);
    assert_eq!(model.predict(&[0.5, 0.0]).unwrap(), 1);
}

// Scoring with the eigen-projected residual lets the minority class win near its
// own mean. Summing a zero residual would reduce every score to ln(prior) and
// always pick the majority class.
#[test]
fn scores_use_projected_residual() {
    let x = DMatrix::from_row_slice(9, 2, &[
        -1.0, 0.0,
        1.0, 0.0,
        0.0, 1.0,
        0.0, -1.0,
        0.5, 0.5,
        -0.5, -0.5,
        10.0, 10.0,
        11.0, 10.0,
        10.0, 11.0
    ]);
    let model = DiscriminantModel::fit(&x, &[0, 0, 0, 0, 0, 0, 1, 1, 1]).unwrap();
    assert!(model.priors()[0] > model.priors()[1]);
    let mu : Vec<f64> = model.means().row(1).iter().copied().collect();
    let scores = model.scores(&mu).unwrap();
    assert!(scores[1] > scores[0]);
    assert!(scores[1] < model.log_priors()[1] + EPS);
    assert_eq!(model.predict(&mu).unwrap(), 1);
}

#[test]
fn estimator_lifecycle() {
    let (x, y) = gaussian_clusters(&[[0.0, 0.0], [5.0, 5.0]], 15, 1.0, 3);
    let mut lda = LDA::new(LdaSettings::new().tol(1E-3));
    assert!(matches!(lda.predict(&[0.0, 0.0]), Err(LdaError::ModelNotFitted)));
    lda.fit(&x, &y).unwrap();
    let model = lda.fitted().unwrap();
    assert_eq!(model.n_samples(), 30);
    assert_eq!(lda.predict(&[5.0, 5.0]).unwrap(), 1);

    let mut failed = LDA::default();
    let singular = DMatrix::from_element(4, 2, 1.0);
    assert!(failed.fit(&singular, &[0, 0, 1, 1]).is_err());
    assert!(matches!(failed.transform(&singular), Err(LdaError::ModelNotFitted)));
    assert!(matches!(failed.failure(), Some(LdaError::NearSingularCovariance { feature_index : 0 })));
}

#[test]
fn fitted_model_is_shared_across_threads() {
    let (x, y) = gaussian_clusters(&[[0.0, 0.0], [5.0, 0.0]], 10, 0.5, 11);
    let model = Arc::new(DiscriminantModel::fit(&x, &y).unwrap());
    let expected = model.predict_rows(&x).unwrap();
    let handles : Vec<_> = (0..4).map(|_| {
        let model = Arc::clone(&model);
        let x = x.clone();
        thread::spawn(move || model.predict_rows(&x).unwrap() )
    }).collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
