use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator for reproducible runs, entropy otherwise
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Uniform draw on the closed interval spanned by `a` and `b`, in either order.
///
/// Always consumes one draw, also when the bounds coincide.
pub fn uniform_between<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    rng.gen_range(lo..=hi)
}
