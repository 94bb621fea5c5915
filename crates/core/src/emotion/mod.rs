use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Result, SculptorError};

/// Emotion classes the upstream classifier can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Frustrated,
    Excited,
    Sad,
    Sympathetic,
    Satisfied,
}

impl EmotionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frustrated => "frustrated",
            Self::Excited => "excited",
            Self::Sad => "sad",
            Self::Sympathetic => "sympathetic",
            Self::Satisfied => "satisfied",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classifier result: a label and the confidence assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionSample {
    #[serde(rename = "class_name")]
    pub label: EmotionLabel,
    pub confidence: f64,
}

/// Ranked classifier output, strongest emotion first.
///
/// The ordering is owned by the caller and consumed as supplied; it is never
/// re-sorted here. A ranking must contain a `satisfied` entry because the
/// layer rules key several decisions off its position and confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionRanking {
    samples: Vec<EmotionSample>,
    satisfied_index: usize,
}

impl EmotionRanking {
    /// Validates and wraps a ranked sample list.
    pub fn new(samples: Vec<EmotionSample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(SculptorError::invalid_input("emotion ranking is empty"));
        }
        for sample in &samples {
            if !sample.confidence.is_finite() || !(0.0..=1.0).contains(&sample.confidence) {
                return Err(SculptorError::invalid_input(format!(
                    "confidence {} for {} is outside [0, 1]",
                    sample.confidence, sample.label
                )));
            }
        }
        let satisfied_index = samples
            .iter()
            .position(|sample| sample.label == EmotionLabel::Satisfied)
            .ok_or_else(|| {
                SculptorError::invalid_input("emotion ranking must contain a satisfied entry")
            })?;

        let sorted = samples
            .windows(2)
            .all(|pair| pair[0].confidence >= pair[1].confidence);
        if !sorted {
            debug!("emotion ranking is not ordered by descending confidence");
        }

        Ok(Self {
            samples,
            satisfied_index,
        })
    }

    /// Parses the classifier's JSON response shape, a list of
    /// `{"class_name": ..., "confidence": ...}` objects.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let samples: Vec<EmotionSample> = serde_json::from_str(text)?;
        Self::new(samples)
    }

    pub fn samples(&self) -> &[EmotionSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Position of the `satisfied` entry in the ranking.
    pub fn satisfied_index(&self) -> usize {
        self.satisfied_index
    }

    /// The strongest ranked sample.
    pub fn top(&self) -> EmotionSample {
        self.samples[0]
    }
}
