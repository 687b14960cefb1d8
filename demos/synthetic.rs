use discrim::*;
use nalgebra::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use tracing_subscriber::EnvFilter;

// Three bivariate clusters with correlated noise.
fn sample(m : usize) -> Result<(DMatrix<f64>, Vec<i64>), anyhow::Error> {
    let centers = [[0.0, 0.0], [4.0, 1.0], [1.0, 4.5]];
    let noise = Normal::new(0.0, 1.0).map_err(|e| anyhow::anyhow!("{:?}", e) )?;
    let mut rng = StdRng::seed_from_u64(42);
    let mut x = DMatrix::zeros(centers.len() * m, 2);
    let mut y = Vec::new();
    for (c, center) in centers.iter().enumerate() {
        for r in 0..m {
            let (e1, e2) : (f64, f64) = (noise.sample(&mut rng), noise.sample(&mut rng));
            x[(c * m + r, 0)] = center[0] + e1;
            x[(c * m + r, 1)] = center[1] + 0.6 * e1 + 0.8 * e2;
            y.push(c as i64);
        }
    }
    Ok((x, y))
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (x, y) = sample(50)?;
    let mut lda = LDA::new(LdaSettings::new());
    let model = lda.fit(&x, &y)?;
    println!("Priors = {}", model.priors());
    println!("Means = {}", model.means());
    println!("Eigenvalues = {}", model.eigenvalues());
    println!("Eigenvectors = {}", model.eigenvectors());

    let pred = model.predict_rows(&x)?;
    let hits = pred.iter().zip(y.iter()).filter(|(p, y)| **p as i64 == **y ).count();
    println!("Training accuracy = {:.3}", hits as f64 / y.len() as f64);

    let z = lda.transform(&x.rows(0, 3).clone_owned())?;
    println!("First projected rows = {}", z);
    Ok(())
}
