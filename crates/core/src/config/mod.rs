use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::{Result, SculptorError};

/// Geometry and retry settings for a sculpture run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SculptureConfig {
    /// Number of waveform points shaping the base outline.
    pub base_points: usize,
    /// Radius of the base disc in model units.
    pub base_radius: f64,
    /// Overall height of the sculpture in model units.
    pub height: f64,
    /// Fraction of the base radius available to the widest stacked layer.
    pub top_radius_fraction: f64,
    /// Attempt bound for the base construction ladder.
    pub max_base_attempts: u32,
    /// Attempt bound for the layer stacking ladder.
    pub max_top_attempts: u32,
}

impl Default for SculptureConfig {
    fn default() -> Self {
        Self {
            base_points: 50,
            base_radius: 60.0,
            height: 60.0,
            top_radius_fraction: 0.5,
            max_base_attempts: 16,
            max_top_attempts: 28,
        }
    }
}

impl SculptureConfig {
    /// Largest radius the first stacked layer may use.
    pub fn top_limit(&self) -> f64 {
        self.base_radius * self.top_radius_fraction
    }

    /// Centre of the working plane that all construction happens around.
    ///
    /// The sculpture axis sits one base radius down the negative X axis so
    /// the base circle passes through the origin.
    pub fn working_center(&self) -> DVec2 {
        DVec2::new(-self.base_radius, 0.0)
    }

    /// Checks that the settings describe a buildable sculpture.
    pub fn validate(&self) -> Result<()> {
        if self.base_points < 8 {
            return Err(SculptorError::invalid_input(
                "at least 8 base points are required",
            ));
        }
        if !self.base_radius.is_finite() || self.base_radius <= 0.0 {
            return Err(SculptorError::invalid_input(
                "base radius must be a positive finite number",
            ));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(SculptorError::invalid_input(
                "height must be a positive finite number",
            ));
        }
        if !self.top_radius_fraction.is_finite()
            || self.top_radius_fraction <= 0.0
            || self.top_radius_fraction >= 1.0
        {
            return Err(SculptorError::invalid_input(
                "top radius fraction must lie strictly between 0 and 1",
            ));
        }
        if self.max_base_attempts == 0 || self.max_top_attempts == 0 {
            return Err(SculptorError::invalid_input(
                "attempt bounds must be at least 1",
            ));
        }
        Ok(())
    }
}
