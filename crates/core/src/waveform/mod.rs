use rand::Rng;
use serde::Serialize;

use crate::{Result, SculptorError};

/// Largest absolute deviation a waveform sample may carry.
pub const DEVIATION_LIMIT: f64 = 0.04;

const OUTLIER_THRESHOLD: f64 = 7.0;
const QUANTIZE_SCALE: f64 = 1e4;

/// Rounds a value to four decimal places, the resolution used for every
/// randomly drawn model dimension.
pub(crate) fn round4(value: f64) -> f64 {
    (value * QUANTIZE_SCALE).round() / QUANTIZE_SCALE
}

/// Fixed-length array of radial deviations shaping the base outline.
///
/// Values are fractions of the base radius, each within
/// [`DEVIATION_LIMIT`] of zero. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformSamples {
    values: Vec<f64>,
}

impl WaveformSamples {
    /// Validating constructor over already normalised deviations.
    pub fn from_deviations(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(SculptorError::invalid_input("waveform is empty"));
        }
        for value in &values {
            if !value.is_finite() || value.abs() > DEVIATION_LIMIT {
                return Err(SculptorError::invalid_input(format!(
                    "waveform deviation {value} is outside [-{DEVIATION_LIMIT}, {DEVIATION_LIMIT}]",
                )));
            }
        }
        Ok(Self { values })
    }

    /// Reduces a raw sample array to `point_count` normalised deviations.
    ///
    /// The input is split into `point_count` equal blocks which are averaged,
    /// outlier blocks are imputed with the mean, and the result is linearly
    /// rescaled so the minimum lands on `-DEVIATION_LIMIT` and the maximum on
    /// `+DEVIATION_LIMIT`. A flat input becomes all zeros.
    pub fn from_audio(samples: &[f64], point_count: usize) -> Result<Self> {
        if point_count == 0 {
            return Err(SculptorError::invalid_input(
                "waveform must reduce to at least one point",
            ));
        }
        if samples.len() < point_count {
            return Err(SculptorError::invalid_input(format!(
                "waveform needs at least {point_count} samples, got {}",
                samples.len()
            )));
        }
        if samples.iter().any(|value| !value.is_finite()) {
            return Err(SculptorError::invalid_input(
                "waveform samples must be finite",
            ));
        }

        let block = samples.len() / point_count;
        let mut reduced: Vec<f64> = (0..point_count)
            .map(|i| mean(&samples[i * block..(i + 1) * block]))
            .collect();

        impute_outliers(&mut reduced);
        normalize(&mut reduced);

        Ok(Self { values: reduced })
    }

    /// Synthetic replacement used when real waveform data keeps failing.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, point_count: usize) -> Self {
        let values = (0..point_count)
            .map(|_| round4(rng.gen_range(-DEVIATION_LIMIT..=DEVIATION_LIMIT)))
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Replaces points further than `OUTLIER_THRESHOLD` median absolute
/// deviations from the median with the array mean.
fn impute_outliers(data: &mut [f64]) {
    let center = median(data);
    let spreads: Vec<f64> = data.iter().map(|value| (value - center).abs()).collect();
    let spread_median = median(&spreads);
    if spread_median <= 0.0 {
        return;
    }
    let fill = mean(data);
    for (value, spread) in data.iter_mut().zip(&spreads) {
        if spread / spread_median >= OUTLIER_THRESHOLD {
            *value = fill;
        }
    }
}

fn normalize(data: &mut [f64]) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in data.iter() {
        min = min.min(*value);
        max = max.max(*value);
    }
    let span = max - min;
    if span <= f64::EPSILON * max.abs().max(1.0) {
        data.fill(0.0);
        return;
    }
    for value in data.iter_mut() {
        *value = -DEVIATION_LIMIT + (*value - min) / span * (2.0 * DEVIATION_LIMIT);
    }
}
