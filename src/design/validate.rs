//----------------------------------------
// Eager validation shared by the public operations
//----------------------------------------
use crate::design::error::ConfigurationError;
use crate::error::MamsErr;

#[allow(non_snake_case)]
pub(crate) fn check_dimensions(J: usize, K: usize) -> Result<(), MamsErr> {
    if J < 1 {
        return Err(ConfigurationError::NoStages.into());
    }
    if K < 1 {
        return Err(ConfigurationError::NoArms.into());
    }
    Ok(())
}

#[allow(non_snake_case)]
pub(crate) fn check_length(name: &'static str, values: &[f64], J: usize) -> Result<(), MamsErr> {
    if values.len() != J {
        return Err(ConfigurationError::LengthMismatch {
            name,
            expected: J,
            got: values.len(),
        }
        .into());
    }
    Ok(())
}

/// Per-stage sample sizes and allocation ratios: length `J`, each entry in (0, inf)
#[allow(non_snake_case)]
pub(crate) fn check_positive_stages(
    name: &'static str,
    values: &[f64],
    J: usize,
) -> Result<(), MamsErr> {
    check_length(name, values, J)?;
    if let Some((index, &value)) = values
        .iter()
        .enumerate()
        .find(|&(_, v)| !(v.is_finite() && *v > 0.0))
    {
        return Err(ConfigurationError::NonPositive { name, index, value }.into());
    }
    Ok(())
}

pub(crate) fn check_sigma(sig: f64) -> Result<(), MamsErr> {
    if !(sig.is_finite() && sig > 0.0) {
        return Err(ConfigurationError::NonPositiveSigma(sig).into());
    }
    Ok(())
}

/// Boundaries may be infinite (no futility stop, no efficacy stop) but not
/// NaN, and futility may not sit above efficacy.
#[allow(non_snake_case)]
pub(crate) fn check_boundaries(f: &[f64], e: &[f64], J: usize) -> Result<(), MamsErr> {
    check_length("f", f, J)?;
    check_length("e", e, J)?;
    for (name, values) in [("f", f), ("e", e)] {
        if let Some(index) = values.iter().position(|v| v.is_nan()) {
            return Err(ConfigurationError::NanBoundary { name, index }.into());
        }
    }
    if let Some(stage) = f.iter().zip(e.iter()).position(|(fj, ej)| fj > ej) {
        return Err(ConfigurationError::BoundaryOrder {
            stage: stage + 1,
            futility: f[stage],
            efficacy: e[stage],
        }
        .into());
    }
    Ok(())
}

pub(crate) fn check_effect(delta: f64) -> Result<(), MamsErr> {
    if !delta.is_finite() {
        return Err(ConfigurationError::NonFiniteEffect(delta).into());
    }
    Ok(())
}

/// `base^arms` with overflow reported as a configuration error
#[allow(non_snake_case)]
pub(crate) fn checked_pattern_count(base: usize, K: usize) -> Result<usize, MamsErr> {
    u32::try_from(K)
        .ok()
        .and_then(|k| base.checked_pow(k))
        .ok_or_else(|| {
            ConfigurationError::TooManyPatterns {
                stages: base,
                arms: K,
            }
            .into()
        })
}
