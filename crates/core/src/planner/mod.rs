//! Emotion-driven layer planning.
//!
//! The planner walks the ranked emotion list and turns each entry into at
//! most one [`LayerSpec`], applying substitution guards, per-index size
//! tapers and a hard radius floor. Planning is cheap and infallible; a
//! truncated plan is a valid, shorter sculpture.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SculptureConfig;
use crate::emotion::{EmotionLabel, EmotionRanking, EmotionSample};

/// Hard cap on stacked layers per sculpture.
pub const MAX_LAYERS: usize = 3;
/// Profile layers narrower than this fraction of the base radius are not
/// emitted; the plan is truncated instead.
pub const MIN_LAYER_RADIUS_FRACTION: f64 = 0.19;

/// Confidence below this substitutes the top-ranked emotion.
const WEAK_CONFIDENCE: f64 = 0.15;
/// Confidence lead over the current entry that lets the top-ranked emotion
/// overwrite it.
const DOMINANCE_GAP: f64 = 0.3;
/// The satisfied entry only influences symmetry and seam fillets when it
/// ranks inside the first three entries at this confidence or better.
const SATISFIED_RANK_LIMIT: usize = 3;
const SATISFIED_FLAG_CONFIDENCE: f64 = 0.15;

// Appliance (satellite boss) layer sizing.
const APPLIANCE_RADIUS_FRACTION: f64 = 0.63;
const APPLIANCE_RADIUS_STEP: f64 = 0.27;
const APPLIANCE_COUNT_BUCKETS: [(f64, usize); 3] = [(0.8, 13), (0.65, 12), (0.5, 11)];
const APPLIANCE_COUNT_DEFAULT: usize = 10;
const SPIKE_SIDE_RANGE: (usize, usize) = (3, 6);

// Profile (re-extrusion) layer sizing.
const SAD_POINT_RANGE: (usize, usize) = (17, 35);
const SAD_SCALE_CONFIDENCE: f64 = 0.5;
const SYMPATHETIC_POINT_RANGE: (usize, usize) = (10, 25);
const SATISFIED_POINT_RANGE: (usize, usize) = (12, 15);
const PROFILE_RADIUS_STEP: f64 = 0.15;
const SATISFIED_RADIUS_STEP: f64 = 0.2;
const FALLBACK_RADIUS_FRACTION: f64 = 0.15;
const PROFILE_DEVIATION_RANGE: f64 = 1.0;
const SATISFIED_DEVIATION_RANGE: f64 = 2.2;
const EDGE_FILLET_FRACTION: f64 = 0.1;
const SATISFIED_VERTEX_FILLET_FRACTION: f64 = 0.2;

/// A polygon cross-section stacked and re-extruded on the current top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileLayerSpec {
    pub confidence: f64,
    pub points_num: usize,
    pub radius: f64,
    pub edge_fillet: f64,
    pub vertex_fillet: f64,
    pub deviation_range: f64,
    pub symmetry: bool,
    pub bot_fillet: bool,
}

/// A cluster of satellite bosses placed around a ring, or a single
/// centered boss when `points_num` is 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplianceLayerSpec {
    pub confidence: f64,
    pub points_num: usize,
    pub radius: Option<f64>,
    pub polygon_range: Option<(usize, usize)>,
    pub deviation_range: f64,
    pub symmetry: bool,
}

/// One planned construction step, in stacking order from the base upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerSpec {
    Profile(ProfileLayerSpec),
    Appliance(ApplianceLayerSpec),
}

impl LayerSpec {
    pub fn confidence(&self) -> f64 {
        match self {
            LayerSpec::Profile(spec) => spec.confidence,
            LayerSpec::Appliance(spec) => spec.confidence,
        }
    }

    pub fn points_num(&self) -> usize {
        match self {
            LayerSpec::Profile(spec) => spec.points_num,
            LayerSpec::Appliance(spec) => spec.points_num,
        }
    }
}

/// Derives the layer sequence for a ranked emotion list.
///
/// Substitution guards run before dispatch: a satisfied entry that arrives
/// after symmetry is already locked in is replaced by the top-ranked
/// emotion (or ends the plan on the third slot), and any entry that is
/// either much weaker than its predecessor or weak in absolute terms is
/// replaced the same way. Each dispatch arm then appends one spec, or
/// truncates the plan when its radius would fall under the floor.
pub fn plan<R: Rng + ?Sized>(
    emotions: &EmotionRanking,
    config: &SculptureConfig,
    rng: &mut R,
) -> Vec<LayerSpec> {
    let base_radius = config.base_radius;
    let radius_floor = MIN_LAYER_RADIUS_FRACTION * base_radius;
    let top_limit = config.top_limit();

    let satisfied = emotions.samples()[emotions.satisfied_index()];
    let satisfied_spotlight = emotions.satisfied_index() < SATISFIED_RANK_LIMIT
        && satisfied.confidence > SATISFIED_FLAG_CONFIDENCE;

    let mut layers: Vec<LayerSpec> = Vec::with_capacity(MAX_LAYERS);
    let mut prev: Option<EmotionSample> = None;
    let mut symmetry_flag = false;

    for (i, sample) in emotions.samples().iter().enumerate() {
        let mut current = *sample;

        // Recomputed every pass; the previous emotion may change below.
        let bot_fillet = satisfied_spotlight
            && prev
                .map(|p| p.label != EmotionLabel::Frustrated)
                .unwrap_or(false);

        // High deviation makes satisfied unusable once symmetry is locked.
        if current.label == EmotionLabel::Satisfied && symmetry_flag {
            if i == 2 {
                return layers;
            }
            current = emotions.top();
        }
        if let Some(p) = prev {
            if p.confidence - current.confidence > DOMINANCE_GAP
                || current.confidence < WEAK_CONFIDENCE
            {
                current = emotions.top();
            }
        }

        match current.label {
            EmotionLabel::Frustrated | EmotionLabel::Excited => {
                if satisfied_spotlight {
                    symmetry_flag = true;
                }
                let points_num = if i < 2 {
                    appliance_count(current.confidence) / (i + 1)
                } else {
                    1
                };
                let radius = if i < 2 {
                    Some(APPLIANCE_RADIUS_FRACTION * base_radius
                        - APPLIANCE_RADIUS_STEP * base_radius * i as f64)
                } else {
                    None
                };
                let polygon_range =
                    (current.label == EmotionLabel::Frustrated).then_some(SPIKE_SIDE_RANGE);
                layers.push(LayerSpec::Appliance(ApplianceLayerSpec {
                    confidence: current.confidence,
                    points_num,
                    radius,
                    polygon_range,
                    deviation_range: 0.0,
                    symmetry: symmetry_flag,
                }));
                if points_num == 1 {
                    return layers;
                }
            }
            EmotionLabel::Sad => {
                let mut count = rng.gen_range(SAD_POINT_RANGE.0..=SAD_POINT_RANGE.1);
                if current.confidence > SAD_SCALE_CONFIDENCE {
                    count *= 1 + (current.confidence / 4.0).round() as usize;
                }
                let radius = profile_radius(top_limit, base_radius, i);
                if radius < radius_floor {
                    return layers;
                }
                layers.push(LayerSpec::Profile(ProfileLayerSpec {
                    confidence: current.confidence,
                    points_num: count - 2 * i,
                    radius,
                    edge_fillet: 0.0,
                    vertex_fillet: 0.0,
                    deviation_range: PROFILE_DEVIATION_RANGE,
                    symmetry: false,
                    bot_fillet: if i > 0 { bot_fillet } else { false },
                }));
            }
            EmotionLabel::Sympathetic => {
                let count =
                    rng.gen_range(SYMPATHETIC_POINT_RANGE.0..=SYMPATHETIC_POINT_RANGE.1);
                let radius = profile_radius(top_limit, base_radius, i);
                if radius < radius_floor {
                    return layers;
                }
                layers.push(LayerSpec::Profile(ProfileLayerSpec {
                    confidence: current.confidence,
                    points_num: count - 2 * i,
                    radius,
                    edge_fillet: EDGE_FILLET_FRACTION * base_radius,
                    vertex_fillet: EDGE_FILLET_FRACTION * base_radius,
                    deviation_range: PROFILE_DEVIATION_RANGE,
                    symmetry: false,
                    bot_fillet,
                }));
            }
            EmotionLabel::Satisfied => {
                let radius = top_limit - SATISFIED_RADIUS_STEP * base_radius * i as f64;
                if radius < radius_floor {
                    return layers;
                }
                let count = rng.gen_range(SATISFIED_POINT_RANGE.0..=SATISFIED_POINT_RANGE.1);
                layers.push(LayerSpec::Profile(ProfileLayerSpec {
                    confidence: current.confidence,
                    points_num: count - 3 * i,
                    radius,
                    edge_fillet: EDGE_FILLET_FRACTION * base_radius,
                    vertex_fillet: SATISFIED_VERTEX_FILLET_FRACTION * base_radius,
                    deviation_range: SATISFIED_DEVIATION_RANGE,
                    symmetry: true,
                    bot_fillet,
                }));
                symmetry_flag = true;
            }
        }

        prev = Some(current);
        if layers.len() == MAX_LAYERS {
            break;
        }
    }
    layers
}

/// Confidence buckets for the satellite boss count.
fn appliance_count(confidence: f64) -> usize {
    for (threshold, count) in APPLIANCE_COUNT_BUCKETS {
        if confidence >= threshold {
            return count;
        }
    }
    APPLIANCE_COUNT_DEFAULT
}

/// Tapered profile radius; beyond the second layer only the narrow
/// fallback remains, which always sits under the radius floor.
fn profile_radius(top_limit: f64, base_radius: f64, index: usize) -> f64 {
    if index < 2 {
        top_limit - PROFILE_RADIUS_STEP * base_radius * index as f64
    } else {
        FALLBACK_RADIUS_FRACTION * base_radius
    }
}
