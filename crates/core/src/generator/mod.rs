//! End-to-end sculpture generation.
//!
//! Ties the planner and the builder together under two bounded retry
//! ladders. A failed geometric operation discards the attempt, reshapes
//! the inputs along a fixed escalation schedule and tries again; once the
//! configured attempt limit is reached the run fails with a typed error
//! instead of looping.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::builder::{self, BuildState};
use crate::config::SculptureConfig;
use crate::emotion::EmotionRanking;
use crate::error::{Result, SculptorError};
use crate::planner::{self, LayerSpec};
use crate::solid::{Mesh, Solid};
use crate::waveform::WaveformSamples;

/// A finished generation run.
#[derive(Debug)]
pub struct Sculpture {
    pub solid: Solid,
    pub mesh: Mesh,
    pub plan: Vec<LayerSpec>,
    pub height: f64,
    /// Base constructions tried, counting the successful one.
    pub base_attempts: u32,
    /// Layer stackings tried, counting the successful one.
    pub top_attempts: u32,
}

/// Sculpture factory over a seeded random source.
pub struct SculptureGenerator {
    config: SculptureConfig,
    rng: StdRng,
}

impl SculptureGenerator {
    pub fn new(config: SculptureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::from_entropy(),
        })
    }

    /// Generator with a fixed seed. Equal seeds, inputs and configuration
    /// rebuild the same sculpture.
    pub fn with_seed(config: SculptureConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &SculptureConfig {
        &self.config
    }

    /// Runs the planner once without building any geometry.
    pub fn plan_preview(&mut self, emotions: &EmotionRanking) -> Vec<LayerSpec> {
        planner::plan(emotions, &self.config, &mut self.rng)
    }

    /// Builds a closed sculpture from ranked emotions and a waveform.
    pub fn generate(
        &mut self,
        emotions: &EmotionRanking,
        waveform: &WaveformSamples,
    ) -> Result<Sculpture> {
        if waveform.len() != self.config.base_points {
            return Err(SculptorError::invalid_input(format!(
                "waveform has {} samples, the base needs {}",
                waveform.len(),
                self.config.base_points
            )));
        }

        let (mut base, base_attempts) = self.base_ladder(waveform)?;

        let mut failures = 0;
        loop {
            let attempt = self
                .reshape_base(&mut base, waveform, failures)
                .and_then(|()| self.stack_layers(&base, emotions));
            match attempt {
                Ok((solid, plan)) => {
                    let mesh = solid.tessellate();
                    let height = solid.height();
                    info!(
                        "sculpture complete: {} layers, height {height:.2}, {} triangles",
                        plan.len(),
                        mesh.triangle_count()
                    );
                    return Ok(Sculpture {
                        solid,
                        mesh,
                        plan,
                        height,
                        base_attempts,
                        top_attempts: failures + 1,
                    });
                }
                Err(SculptorError::Geometry(err)) => {
                    failures += 1;
                    warn!("incompatible layers ({err}), regenerating, retry {failures}");
                    if failures >= self.config.max_top_attempts {
                        return Err(SculptorError::AttemptsExhausted {
                            stage: "layers",
                            attempts: failures,
                        });
                    }
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Retries the base until it builds, walking the escalation rungs:
    /// the raw outline first, then outlines with one and two trailing
    /// points dropped, then synthetic outlines.
    fn base_ladder(&mut self, waveform: &WaveformSamples) -> Result<(Solid, u32)> {
        let mut failures = 0;
        loop {
            let attempt = match failures {
                0 => builder::build_base(&self.config, waveform, None, false, &mut self.rng),
                1 => builder::build_base(&self.config, waveform, Some(1), false, &mut self.rng),
                2 => builder::build_base(&self.config, waveform, Some(2), false, &mut self.rng),
                _ => builder::build_base(&self.config, waveform, None, true, &mut self.rng),
            };
            match attempt {
                Ok(solid) => return Ok((solid, failures + 1)),
                Err(SculptorError::Geometry(err)) => {
                    failures += 1;
                    warn!("base construction failed ({err}), retry {failures}");
                    if failures >= self.config.max_base_attempts {
                        return Err(SculptorError::AttemptsExhausted {
                            stage: "base",
                            attempts: failures,
                        });
                    }
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Escalation schedule of the layer ladder: early retries keep the
    /// base, later ones rebuild it with trimmed and finally synthetic
    /// outlines before the layers are tried again.
    fn reshape_base(
        &mut self,
        base: &mut Solid,
        waveform: &WaveformSamples,
        failures: u32,
    ) -> Result<()> {
        let rebuilt = match failures {
            0..=6 => return Ok(()),
            7..=13 => builder::build_base(&self.config, waveform, Some(1), false, &mut self.rng)?,
            14..=20 => builder::build_base(&self.config, waveform, Some(2), false, &mut self.rng)?,
            _ => builder::build_base(&self.config, waveform, None, true, &mut self.rng)?,
        };
        *base = rebuilt;
        Ok(())
    }

    /// One full layer attempt: a fresh plan applied on a copy of the base
    /// with fresh construction state.
    fn stack_layers(
        &mut self,
        base: &Solid,
        emotions: &EmotionRanking,
    ) -> Result<(Solid, Vec<LayerSpec>)> {
        let plan = planner::plan(emotions, &self.config, &mut self.rng);
        let mut solid = base.clone();
        let mut state = BuildState::start(&self.config);
        for index in 0..plan.len() {
            builder::apply_layer(
                &mut solid,
                &mut state,
                &plan,
                index,
                &self.config,
                &mut self.rng,
            )?;
        }
        debug!("stacked {} layers to height {:.2}", plan.len(), solid.height());
        Ok((solid, plan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::{EmotionLabel, EmotionSample};

    fn ranking(entries: &[(EmotionLabel, f64)]) -> EmotionRanking {
        let samples = entries
            .iter()
            .map(|&(label, confidence)| EmotionSample { label, confidence })
            .collect();
        EmotionRanking::new(samples).unwrap()
    }

    fn waveform() -> WaveformSamples {
        let values = (0..50).map(|n| ((n % 7) as f64 - 3.0) * 0.008).collect();
        WaveformSamples::from_deviations(values).unwrap()
    }

    fn rankings() -> Vec<EmotionRanking> {
        vec![
            ranking(&[
                (EmotionLabel::Satisfied, 0.9),
                (EmotionLabel::Frustrated, 0.7),
                (EmotionLabel::Sad, 0.5),
            ]),
            ranking(&[
                (EmotionLabel::Frustrated, 0.85),
                (EmotionLabel::Sad, 0.6),
                (EmotionLabel::Satisfied, 0.4),
            ]),
            ranking(&[
                (EmotionLabel::Sad, 0.7),
                (EmotionLabel::Sympathetic, 0.55),
                (EmotionLabel::Satisfied, 0.3),
            ]),
            ranking(&[
                (EmotionLabel::Excited, 0.6),
                (EmotionLabel::Satisfied, 0.45),
                (EmotionLabel::Sympathetic, 0.2),
            ]),
        ]
    }

    #[test]
    fn generation_is_bounded_for_many_seeds() {
        // The base alone reaches half the configured height, and the rise
        // formulas cap the stacked layers and bosses well under one more
        // full height on top of it.
        let config = SculptureConfig::default();
        let floor = config.height / 2.0;
        let ceiling = 2.0 * config.height;

        let rankings = rankings();
        for seed in 0..24 {
            let mut generator = SculptureGenerator::with_seed(config.clone(), seed).unwrap();
            let emotions = &rankings[seed as usize % rankings.len()];
            match generator.generate(emotions, &waveform()) {
                Ok(sculpture) => {
                    assert!(sculpture.plan.len() <= planner::MAX_LAYERS);
                    assert!(
                        sculpture.height >= floor && sculpture.height <= ceiling,
                        "seed {seed}: height {} outside [{floor}, {ceiling}]",
                        sculpture.height
                    );
                    assert_eq!(sculpture.mesh.boundary_edge_count(), 0);
                }
                Err(SculptorError::AttemptsExhausted { .. }) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn equal_seeds_rebuild_the_same_sculpture() {
        let emotions = ranking(&[
            (EmotionLabel::Frustrated, 0.85),
            (EmotionLabel::Sad, 0.6),
            (EmotionLabel::Satisfied, 0.4),
        ]);
        let run = |seed| {
            let mut generator =
                SculptureGenerator::with_seed(SculptureConfig::default(), seed).unwrap();
            generator.generate(&emotions, &waveform()).unwrap()
        };
        let a = run(11);
        let b = run(11);
        assert_eq!(a.plan, b.plan);
        assert_eq!(a.mesh.triangle_count(), b.mesh.triangle_count());
        assert_eq!(a.height, b.height);
        assert_eq!(a.base_attempts, b.base_attempts);
        assert_eq!(a.top_attempts, b.top_attempts);
    }

    #[test]
    fn waveforms_of_the_wrong_length_are_rejected() {
        let mut generator = SculptureGenerator::with_seed(SculptureConfig::default(), 1).unwrap();
        let emotions = ranking(&[(EmotionLabel::Satisfied, 0.8)]);
        let short = WaveformSamples::from_deviations(vec![0.01; 10]).unwrap();
        assert!(matches!(
            generator.generate(&emotions, &short),
            Err(SculptorError::InvalidInput(_))
        ));
    }

    #[test]
    fn impossible_proportions_exhaust_the_base_ladder() {
        let config = SculptureConfig {
            height: 1.0,
            ..SculptureConfig::default()
        };
        let mut generator = SculptureGenerator::with_seed(config, 2).unwrap();
        let emotions = ranking(&[(EmotionLabel::Satisfied, 0.8)]);
        match generator.generate(&emotions, &waveform()) {
            Err(SculptorError::AttemptsExhausted { stage, attempts }) => {
                assert_eq!(stage, "base");
                assert_eq!(attempts, 16);
            }
            other => panic!("expected base exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn plan_previews_stay_within_the_layer_bound() {
        let mut generator = SculptureGenerator::with_seed(SculptureConfig::default(), 5).unwrap();
        let emotions = ranking(&[
            (EmotionLabel::Sad, 0.8),
            (EmotionLabel::Excited, 0.6),
            (EmotionLabel::Satisfied, 0.5),
        ]);
        for _ in 0..8 {
            let plan = generator.plan_preview(&emotions);
            assert!(!plan.is_empty());
            assert!(plan.len() <= planner::MAX_LAYERS);
        }
    }
}
