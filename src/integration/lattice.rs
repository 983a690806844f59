//----------------------------------------
// Rank-1 Richtmyer lattice and seed derivation
//----------------------------------------

/// First `n` primes
fn first_primes(n: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(n);
    let mut candidate = 2u64;
    while primes.len() < n {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}

/// Generating vector `frac(sqrt(p_t))` over the first `dim` primes
pub(crate) fn richtmyer_generators(dim: usize) -> Vec<f64> {
    first_primes(dim)
        .into_iter()
        .map(|p| (p as f64).sqrt().fract())
        .collect()
}

/// Point `i` of the lattice shifted by `shift`, folded with the baker's
/// (tent) transform, written into `out`.
#[inline]
pub(crate) fn lattice_point(i: usize, generators: &[f64], shift: &[f64], out: &mut [f64]) {
    let i_f = i as f64;
    for ((w, &q), &s) in out.iter_mut().zip(generators.iter()).zip(shift.iter()) {
        let x = (i_f * q + s).fract();
        *w = (2.0 * x - 1.0).abs();
    }
}

/// SplitMix64 mix of a base seed and a counter, giving independent streams
/// per region regardless of evaluation order.
#[inline]
pub fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}
