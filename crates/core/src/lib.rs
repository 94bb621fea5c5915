//! Core library of the emotion sculptor.
//!
//! Turns a ranked emotion classification and a short audio waveform into a
//! closed, printable solid. Each module owns one stage of the pipeline:
//! input decoding, layer planning, the swept-solid kernel, geometric
//! construction under bounded retries, and mesh export.

pub mod builder;
pub mod config;
pub mod emotion;
pub mod error;
pub mod export;
pub mod generator;
pub mod planner;
pub mod profile;
pub mod solid;
pub mod waveform;

pub use builder::{apply_layer, build_base, BuildState};
pub use config::SculptureConfig;
pub use emotion::{EmotionLabel, EmotionRanking, EmotionSample};
pub use error::{GeometryError, Result, SculptorError};
pub use export::{write_ascii_stl, write_binary_stl};
pub use generator::{Sculpture, SculptureGenerator};
pub use planner::{ApplianceLayerSpec, LayerSpec, ProfileLayerSpec};
pub use solid::{Mesh, Solid};
pub use waveform::{WaveformSamples, DEVIATION_LIMIT};
