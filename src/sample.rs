use rand::{
    Rng,
    distr::{Distribution, weighted::WeightedIndex},
};

use crate::error::{Error, Result};

/// Rescales a probability vector by `temperature` and renormalizes it.
///
/// Each entry becomes `exp(ln(p) / temperature)`. Temperatures below one sharpen the
/// distribution towards its argmax, temperatures above one flatten it towards uniform. The input
/// need not sum to one. Zero entries stay zero.
pub fn reweight(probabilities: &[f32], temperature: f64) -> Result<Vec<f64>> {
    if !(temperature.is_finite() && temperature > 0.0) {
        return Err(Error::InvalidTemperature(temperature));
    }
    if probabilities.is_empty() {
        return Err(Error::InvalidDistribution("no classes".to_string()));
    }
    if let Some(p) = probabilities.iter().find(|p| !(p.is_finite() && **p >= 0.0)) {
        return Err(Error::InvalidDistribution(format!(
            "entries must be finite and non-negative, found {p}"
        )));
    }

    let total: f64 = probabilities.iter().map(|&p| f64::from(p)).sum();
    if total == 0.0 {
        return Err(Error::InvalidDistribution("all entries are zero".to_string()));
    }

    // Normalized entries are at most one, so every scaled entry is at most zero
    let scaled: Vec<f64> = probabilities
        .iter()
        .map(|&p| (f64::from(p) / total).ln() / temperature)
        .collect();
    let max = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        // Some entry is positive, but the temperature is too small to divide by
        return Err(Error::InvalidTemperature(temperature));
    }
    // Shifting by the maximum keeps exp in range and cancels out on normalization
    let weights: Vec<f64> = scaled.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = weights.iter().sum();
    Ok(weights.into_iter().map(|w| w / sum).collect())
}

/// Draws a single class index from `probabilities` after rescaling it by `temperature`.
pub fn sample<R: Rng + ?Sized>(
    probabilities: &[f32],
    temperature: f64,
    rng: &mut R,
) -> Result<usize> {
    let weights = reweight(probabilities, temperature)?;
    let dist =
        WeightedIndex::new(&weights).map_err(|e| Error::InvalidDistribution(e.to_string()))?;
    Ok(dist.sample(rng))
}
