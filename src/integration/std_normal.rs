use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};

use statrs::function::erf::{erfc, erfc_inv};

/// `P(Z <= z)`; exact 0 and 1 at the infinities.
pub fn std_normal_cdf(z: f64) -> f64 {
    if z == f64::NEG_INFINITY {
        return 0.0;
    }
    if z == f64::INFINITY {
        return 1.0;
    }
    0.5 * erfc(-z * FRAC_1_SQRT_2)
}

/// `P(Z > z)`, computed without cancellation in the upper tail
pub fn std_normal_sf(z: f64) -> f64 {
    std_normal_cdf(-z)
}

/// Quantile clamped away from 0 and 1 so it stays finite; used inside the
/// integrator where the argument is a probability built from CDF values.
pub(crate) fn std_normal_quantile_clamped(p: f64) -> f64 {
    let p = p.clamp(1e-300, 1.0 - 1e-16);
    -SQRT_2 * erfc_inv(2.0 * p)
}
