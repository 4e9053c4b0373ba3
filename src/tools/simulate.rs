use ndarray::Array2;
use rand::{
    Rng,
    SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// `n x p` matrix of independent standard-normal draws.
pub fn standard_normal(
    n: usize,
    p: usize,
    seed: u64,
) -> Array2<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array2::from_shape_fn((n, p), |_| rng.sample::<f64, _>(StandardNormal))
}

/// Two independent-noise layers on the same `n` samples whose first columns
/// share a latent factor: `a[:, 0] = z + noise * e_a`, `b[:, 0] = z + noise
/// * e_b`. Every other column is pure noise.
pub fn linked_layers(
    n: usize,
    p_a: usize,
    p_b: usize,
    noise: f64,
    seed: u64,
) -> (Array2<f64>, Array2<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let latent: Vec<f64> = (0..n).map(|_| rng.sample(StandardNormal)).collect();

    let mut layer = |p: usize| {
        Array2::from_shape_fn((n, p), |(row, col)| {
            let e: f64 = rng.sample(StandardNormal);
            if col == 0 {
                latent[row] + noise * e
            }
            else {
                e
            }
        })
    };
    let a = layer(p_a);
    let b = layer(p_b);
    (a, b)
}
