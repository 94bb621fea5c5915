//! Geometric realization of planned layers.
//!
//! [`build_base`] turns the waveform into the lofted bottom drum, and
//! [`apply_layer`] extends a solid with one entry of a planned layer
//! stack, threading the running construction state through every call.
//! All randomness comes from the caller's generator so a fixed seed
//! replays an identical build.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

use crate::config::SculptureConfig;
use crate::error::{GeometryError, Result, SculptorError};
use crate::planner::{ApplianceLayerSpec, LayerSpec, ProfileLayerSpec};
use crate::profile;
use crate::solid::{self, LoftBlend, Solid, SweptBody};
use crate::waveform::{round4, WaveformSamples};

/// Thin spacer between a stacked section and the operation above it.
pub(crate) const SECTION_PAD: f64 = 1e-4;

const BASE_RIM_FILLET_FRACTION: f64 = 0.2;
const BASE_LOFT_STEPS: usize = 12;
const PROFILE_LOFT_STEPS: usize = 10;
const SPIKE_LOFT_STEPS: usize = 6;
const SPIKE_TIP_RADIUS: f64 = 1e-4;

/// Above this confidence a profile layer's rise is scaled up.
const RISE_SCALE_CONFIDENCE: f64 = 0.5;
const LOFT_RISE_DIVISOR: f64 = 3.0;
const STRAIGHT_RISE_DIVISOR: f64 = 6.0;
const LOFT_SEAM_DIVISOR: f64 = 20.0;
const STRAIGHT_SEAM_DIVISOR: f64 = 12.0;

// Satellite boss sizing. The rise floor keeps every round boss tall
// enough to close with a full-radius dome fillet.
const BOSS_RISE_FLOOR: f64 = 0.1401;
const BOSS_RISE_CAP_FLOOR: f64 = 0.15;
const BOSS_RADIUS_RANGE: (f64, f64) = (0.08, 0.14);
const BOSS_LIFT_DIVISOR: f64 = 20.0;
const SKIRT_FILLET_FRACTION: f64 = 0.009;

// Single centered boss sizing.
const CENTER_BOSS_RADIUS_RANGE: (f64, f64) = (0.1, 0.18);
const CENTER_BOSS_EXTRA_RISE: f64 = 6.0 / 35.0;
const FIXED_CENTER_BOSS_RADIUS_FRACTION: f64 = 0.12;
const FIXED_CENTER_BOSS_RISE_FRACTION: f64 = 0.2;

/// Running construction state, scoped to one generation attempt.
#[derive(Debug, Clone)]
pub struct BuildState {
    /// Top of the stacked profile column.
    pub current_height: f64,
    /// Last 2D point used as a placement origin.
    pub current_anchor: DVec2,
    /// Most recent profile ring, the footprint satellite bosses must
    /// stand on.
    pub last_profile_points: Option<Vec<DVec2>>,
}

impl BuildState {
    /// State right after a finished base: the column top sits at half the
    /// configured height.
    pub fn start(config: &SculptureConfig) -> Self {
        Self {
            current_height: config.height / 2.0,
            current_anchor: DVec2::ZERO,
            last_profile_points: None,
        }
    }
}

/// Per-layer surroundings a build step needs besides its own spec.
struct LayerCtx<'a> {
    config: &'a SculptureConfig,
    index: usize,
    is_last: bool,
    prev: Option<&'a LayerSpec>,
}

/// Builds the waveform-perturbed bottom drum.
///
/// The deviated ring is splined closed, lofted up to a circle of the base
/// radius at half height and rounded along the top rim. `drop_trailing`
/// removes ring points before splining; `randomize` replaces the waveform
/// with synthetic deviations and draws `drop_trailing` itself.
pub fn build_base<R: Rng + ?Sized>(
    config: &SculptureConfig,
    waveform: &WaveformSamples,
    drop_trailing: Option<usize>,
    randomize: bool,
    rng: &mut R,
) -> Result<Solid> {
    let point_count = config.base_points;
    let (samples, drop_trailing) = if randomize {
        let samples = WaveformSamples::random(rng, point_count);
        let u: f64 = rng.gen();
        let skip = if u <= 1.0 / 3.0 {
            None
        } else if u <= 2.0 / 3.0 {
            Some(1)
        } else {
            Some(2)
        };
        (samples, skip)
    } else {
        (waveform.clone(), drop_trailing)
    };
    if samples.len() != point_count {
        return Err(SculptorError::invalid_input(format!(
            "waveform has {} samples, the base needs {point_count}",
            samples.len()
        )));
    }

    let radius = config.base_radius;
    let mut ring = base_ring(point_count, radius, samples.values());
    if let Some(drop) = drop_trailing {
        ring.truncate(ring.len().saturating_sub(drop));
    }

    let mut body = SweptBody::from_spline_ring(config.working_center(), &ring, 0.0)?;
    body.loft_to_circle(radius, config.height / 2.0, BASE_LOFT_STEPS, LoftBlend::Smooth)?;
    body.fillet_top_rim(BASE_RIM_FILLET_FRACTION * radius)?;
    Ok(Solid::new(body))
}

/// Deviated base circle around the working centre, without the centroid
/// correction profile rings get.
fn base_ring(point_count: usize, radius: f64, deviations: &[f64]) -> Vec<DVec2> {
    (0..point_count)
        .map(|n| {
            let angle = (n + 1) as f64 * TAU / point_count as f64;
            let scaled = (1.0 + deviations[n]) * radius;
            DVec2::new(scaled * angle.cos() - radius, scaled * angle.sin())
        })
        .collect()
}

/// Extends `solid` with layer `index` of the plan.
pub fn apply_layer<R: Rng + ?Sized>(
    solid: &mut Solid,
    state: &mut BuildState,
    plan: &[LayerSpec],
    index: usize,
    config: &SculptureConfig,
    rng: &mut R,
) -> Result<()> {
    let Some(spec) = plan.get(index) else {
        return Err(SculptorError::invalid_input(format!(
            "layer {index} is outside the {}-layer plan",
            plan.len()
        )));
    };
    let ctx = LayerCtx {
        config,
        index,
        is_last: index + 1 == plan.len(),
        prev: index.checked_sub(1).and_then(|i| plan.get(i)),
    };
    match spec {
        LayerSpec::Profile(spec) => apply_profile(solid, state, spec, &ctx, rng),
        LayerSpec::Appliance(spec) if spec.points_num > 1 => {
            apply_satellites(solid, state, spec, &ctx, rng)
        }
        LayerSpec::Appliance(spec) => apply_center_boss(solid, state, spec, &ctx, rng),
    }
}

fn apply_profile<R: Rng + ?Sized>(
    solid: &mut Solid,
    state: &mut BuildState,
    spec: &ProfileLayerSpec,
    ctx: &LayerCtx<'_>,
    rng: &mut R,
) -> Result<()> {
    let deviations = profile::random_deviations(rng, spec.points_num, spec.deviation_range);
    let mut ring = profile::build_ring(
        spec.points_num,
        spec.radius,
        &deviations,
        spec.symmetry,
        ctx.config.base_radius,
    );
    if spec.vertex_fillet != 0.0 {
        ring = solid::round_polygon_corners(&ring, spec.vertex_fillet)?;
    }

    let height = ctx.config.height;
    let taper = (ctx.index + 1) as f64;
    let seam_z = state.current_height;
    let seam_allowed = spec.bot_fillet && !matches!(ctx.prev, Some(LayerSpec::Appliance(_)));

    let body = solid.main_mut();
    if ctx.is_last && spec.edge_fillet != 0.0 {
        let mut rise = height / (LOFT_RISE_DIVISOR * taper);
        if spec.confidence > RISE_SCALE_CONFIDENCE {
            rise *= 1.0 + spec.confidence / 4.0;
        }
        body.stack_section(&ring)?;
        body.extrude(SECTION_PAD)?;
        body.loft_to_circle(spec.radius, rise, PROFILE_LOFT_STEPS, LoftBlend::Smooth)?;
        body.fillet_top_rim(spec.radius / taper)?;
        if seam_allowed {
            body.seam_fillet(seam_z, height / (LOFT_SEAM_DIVISOR * taper))?;
        }
        state.current_height += SECTION_PAD + rise;
    } else {
        let mut rise = height / (STRAIGHT_RISE_DIVISOR * taper);
        if spec.confidence > RISE_SCALE_CONFIDENCE {
            rise *= 1.0 + spec.confidence / 4.0;
        }
        body.stack_section(&ring)?;
        body.extrude(rise)?;
        if seam_allowed {
            body.seam_fillet(seam_z, height / (STRAIGHT_SEAM_DIVISOR * taper))?;
        }
        state.current_height += rise;
        if spec.edge_fillet != 0.0 {
            body.fillet_top_rim(spec.edge_fillet / taper)?;
        }
    }

    state.current_anchor = DVec2::ZERO;
    state.last_profile_points = Some(ring);
    Ok(())
}

fn apply_satellites<R: Rng + ?Sized>(
    solid: &mut Solid,
    state: &mut BuildState,
    spec: &ApplianceLayerSpec,
    ctx: &LayerCtx<'_>,
    rng: &mut R,
) -> Result<()> {
    let radius = spec.radius.ok_or_else(|| {
        SculptorError::invalid_input("a satellite appliance layer needs a placement radius")
    })?;
    let height = ctx.config.height;
    let count = spec.points_num;

    let rise_cap = (0.5 * spec.confidence).max(BOSS_RISE_CAP_FLOOR);
    let mut rises: Vec<f64> = (0..count)
        .map(|_| height * round4(rng.gen_range(BOSS_RISE_FLOOR..=rise_cap)))
        .collect();
    let mut sizes: Vec<f64> = (0..count)
        .map(|_| ctx.config.base_radius * rng.gen_range(BOSS_RADIUS_RANGE.0..=BOSS_RADIUS_RANGE.1))
        .collect();
    if spec.symmetry {
        for m in 0..count / 2 {
            rises[count - 2 - m] = rises[m];
            sizes[count - 2 - m] = sizes[m];
        }
    }

    let deviations = profile::random_deviations(rng, count, spec.deviation_range);
    let points = profile::build_ring(
        count,
        radius,
        &deviations,
        spec.symmetry,
        ctx.config.base_radius,
    );

    let surface_z = state.current_height;
    let lift = height * ctx.index as f64 / BOSS_LIFT_DIVISOR;

    match spec.polygon_range {
        None => {
            let base_z = height / 2.0;
            let mut bosses = Vec::with_capacity(count);
            for (m, point) in points.iter().enumerate() {
                ensure_footing(state, solid.main(), *point, surface_z)?;
                let mut boss = SweptBody::circle(*point, sizes[m], base_z)?;
                boss.extrude((surface_z - base_z) + rises[m] + lift)?;
                boss.fillet_top_rim(sizes[m])?;
                bosses.push(boss);
                state.current_anchor = *point;
            }
            let skirt = match ctx.prev {
                None => false,
                Some(LayerSpec::Appliance(p)) => p.polygon_range.is_none(),
                Some(LayerSpec::Profile(p)) => p.edge_fillet == 0.0,
            };
            if skirt {
                for boss in &mut bosses {
                    boss.skirt_fillet(surface_z, SKIRT_FILLET_FRACTION * ctx.config.base_radius)?;
                }
            }
            for boss in bosses {
                solid.push_body(boss);
            }
        }
        Some((lo, hi)) => {
            for (m, point) in points.iter().enumerate() {
                ensure_footing(state, solid.main(), *point, surface_z)?;
                let sides = rng.gen_range(lo..=hi);
                let outline = spike_outline(sides, sizes[m], *point, ctx.config.base_radius);
                let mut boss = SweptBody::from_outline(*point, &outline, surface_z)?;
                boss.extrude(SECTION_PAD)?;
                boss.loft_to_circle(
                    SPIKE_TIP_RADIUS,
                    rises[m] + lift,
                    SPIKE_LOFT_STEPS,
                    LoftBlend::Straight,
                )?;
                solid.push_body(boss);
                state.current_anchor = *point;
            }
        }
    }
    Ok(())
}

/// Terminal layer: one boss in the middle of the column.
fn apply_center_boss<R: Rng + ?Sized>(
    solid: &mut Solid,
    state: &mut BuildState,
    spec: &ApplianceLayerSpec,
    ctx: &LayerCtx<'_>,
    rng: &mut R,
) -> Result<()> {
    let height = ctx.config.height;
    let base_z = height / 2.0;
    let surface_z = state.current_height;
    let center = ctx.config.working_center();
    let rise_cap = (0.5 * spec.confidence).max(BOSS_RISE_CAP_FLOOR);

    match spec.polygon_range {
        None => {
            // Random sizing only when the boss sits directly on the base;
            // above stacked layers the proportions are fixed.
            let on_base = (surface_z - base_z).abs() < 1e-9;
            let (size, rise) = if on_base {
                let size = ctx.config.base_radius
                    * rng.gen_range(CENTER_BOSS_RADIUS_RANGE.0..=CENTER_BOSS_RADIUS_RANGE.1);
                let rise = round4(height * rng.gen_range(BOSS_RISE_FLOOR..=rise_cap))
                    + height * CENTER_BOSS_EXTRA_RISE;
                (size, rise)
            } else {
                (
                    FIXED_CENTER_BOSS_RADIUS_FRACTION * ctx.config.base_radius,
                    FIXED_CENTER_BOSS_RISE_FRACTION * height,
                )
            };
            let mut boss = SweptBody::circle(center, size, base_z)?;
            boss.extrude((surface_z - base_z) + rise)?;
            boss.fillet_top_rim(size)?;
            solid.push_body(boss);
        }
        Some((lo, hi)) => {
            let size = ctx.config.base_radius
                * rng.gen_range(CENTER_BOSS_RADIUS_RANGE.0..=CENTER_BOSS_RADIUS_RANGE.1);
            let rise = round4(height * rng.gen_range(BOSS_RISE_FLOOR..=rise_cap))
                + height * CENTER_BOSS_EXTRA_RISE;
            let sides = rng.gen_range(lo..=hi);
            let outline = spike_outline(sides, size, center, ctx.config.base_radius);
            let mut boss = SweptBody::from_outline(center, &outline, surface_z)?;
            boss.extrude(SECTION_PAD)?;
            boss.loft_to_circle(SPIKE_TIP_RADIUS, rise, SPIKE_LOFT_STEPS, LoftBlend::Straight)?;
            solid.push_body(boss);
        }
    }
    Ok(())
}

/// Regular polygon cross-section around a satellite point.
fn spike_outline(sides: usize, size: f64, point: DVec2, base_radius: f64) -> Vec<DVec2> {
    profile::build_ring(sides, size, &vec![0.0; sides], false, base_radius)
        .into_iter()
        .map(|p| p + DVec2::new(base_radius, 0.0) + point)
        .collect()
}

/// A boss must stand on the current top face: inside the last profile
/// ring when one exists, otherwise on the main body's cap.
fn ensure_footing(
    state: &BuildState,
    body: &SweptBody,
    point: DVec2,
    surface_z: f64,
) -> Result<()> {
    let supported = match &state.last_profile_points {
        Some(ring) => profile::ring_contains(ring, point, 0.0),
        None => {
            let offset = point - body.center();
            let angle = offset.y.atan2(offset.x);
            offset.length() <= body.radius_at(surface_z, angle)
        }
    };
    if supported {
        Ok(())
    } else {
        Err(GeometryError::DetachedFeature {
            x: point.x,
            y: point.y,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> SculptureConfig {
        SculptureConfig::default()
    }

    fn waveform() -> WaveformSamples {
        let values = (0..50).map(|n| ((n % 5) as f64 - 2.0) * 0.01).collect();
        WaveformSamples::from_deviations(values).unwrap()
    }

    fn base(rng: &mut StdRng) -> (Solid, BuildState) {
        let config = config();
        let solid = build_base(&config, &waveform(), None, false, rng).unwrap();
        (solid, BuildState::start(&config))
    }

    fn profile_spec(radius: f64) -> ProfileLayerSpec {
        ProfileLayerSpec {
            confidence: 0.4,
            points_num: 20,
            radius,
            edge_fillet: 0.0,
            vertex_fillet: 0.0,
            deviation_range: 0.0,
            symmetry: false,
            bot_fillet: false,
        }
    }

    fn satellite_spec(points_num: usize) -> ApplianceLayerSpec {
        ApplianceLayerSpec {
            confidence: 0.7,
            points_num,
            radius: Some(0.63 * 60.0),
            polygon_range: None,
            deviation_range: 0.0,
            symmetry: false,
        }
    }

    #[test]
    fn the_base_is_deterministic_for_a_fixed_waveform() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(1);
        let a = build_base(&config, &waveform(), None, false, &mut rng).unwrap();
        let b = build_base(&config, &waveform(), None, false, &mut rng).unwrap();
        assert_eq!(a.main().stations(), b.main().stations());
    }

    #[test]
    fn the_base_rises_to_half_height_with_a_rounded_cap() {
        let mut rng = StdRng::seed_from_u64(2);
        let (solid, state) = base(&mut rng);
        let body = solid.main();
        assert_relative_eq!(body.top_z(), 30.0, epsilon = 1e-9);
        assert_relative_eq!(body.min_top_radius(), 48.0, epsilon = 1e-6);
        assert_relative_eq!(state.current_height, 30.0);
        let mesh = solid.tessellate();
        assert_eq!(mesh.boundary_edge_count(), 0);
        assert!(mesh.signed_volume() > 0.0);
    }

    #[test]
    fn dropping_trailing_points_changes_the_rim() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(3);
        let full = build_base(&config, &waveform(), None, false, &mut rng).unwrap();
        let dropped = build_base(&config, &waveform(), Some(2), false, &mut rng).unwrap();
        assert_ne!(
            full.main().stations()[0].radii,
            dropped.main().stations()[0].radii
        );
    }

    #[test]
    fn a_randomized_base_still_builds() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(4);
        let solid = build_base(&config, &waveform(), None, true, &mut rng).unwrap();
        assert_relative_eq!(solid.main().top_z(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn a_straight_profile_layer_advances_a_sixth_of_the_height() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(5);
        let (mut solid, mut state) = base(&mut rng);
        let plan = vec![LayerSpec::Profile(profile_spec(30.0))];
        apply_layer(&mut solid, &mut state, &plan, 0, &config, &mut rng).unwrap();

        assert_relative_eq!(state.current_height, 40.0, epsilon = 1e-9);
        assert_eq!(state.current_anchor, DVec2::ZERO);
        assert_eq!(state.last_profile_points.as_ref().map(Vec::len), Some(20));
        let mesh = solid.tessellate();
        assert_eq!(mesh.boundary_edge_count(), 0);
    }

    #[test]
    fn confident_profiles_rise_higher() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(6);
        let (mut solid, mut state) = base(&mut rng);
        let mut spec = profile_spec(30.0);
        spec.confidence = 0.8;
        let plan = vec![LayerSpec::Profile(spec)];
        apply_layer(&mut solid, &mut state, &plan, 0, &config, &mut rng).unwrap();
        assert_relative_eq!(state.current_height, 42.0, epsilon = 1e-9);
    }

    #[test]
    fn a_final_lofted_layer_closes_in_a_dome() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(7);
        let (mut solid, mut state) = base(&mut rng);
        let plan = vec![LayerSpec::Profile(ProfileLayerSpec {
            confidence: 0.4,
            points_num: 13,
            radius: 30.0,
            edge_fillet: 6.0,
            vertex_fillet: 12.0,
            deviation_range: 0.0,
            symmetry: true,
            bot_fillet: false,
        })];
        apply_layer(&mut solid, &mut state, &plan, 0, &config, &mut rng).unwrap();

        assert!(solid.main().top_apex().is_some());
        assert_relative_eq!(state.current_height, 30.0 + SECTION_PAD + 20.0, epsilon = 1e-9);
        assert_eq!(solid.tessellate().boundary_edge_count(), 0);
    }

    #[test]
    fn seam_fillets_without_room_fail_as_geometry_errors() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(8);
        let (mut solid, mut state) = base(&mut rng);
        let mut wide = profile_spec(47.0);
        wide.bot_fillet = true;
        let plan = vec![
            LayerSpec::Profile(profile_spec(30.0)),
            LayerSpec::Profile(wide),
        ];
        let result = apply_layer(&mut solid, &mut state, &plan, 1, &config, &mut rng);
        assert!(matches!(
            result,
            Err(SculptorError::Geometry(GeometryError::FilletTooLarge { .. }))
        ));
    }

    #[test]
    fn round_satellites_become_closed_domed_bodies() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(9);
        let (mut solid, mut state) = base(&mut rng);
        let plan = vec![LayerSpec::Appliance(satellite_spec(13))];
        apply_layer(&mut solid, &mut state, &plan, 0, &config, &mut rng).unwrap();

        assert_eq!(solid.bodies().len(), 14);
        for boss in &solid.bodies()[1..] {
            assert!(boss.top_apex().is_some());
            assert_relative_eq!(boss.bottom_z(), 30.0);
        }
        // The anchor follows the satellites around the ring.
        assert_ne!(state.current_anchor, DVec2::ZERO);
        assert_eq!(solid.tessellate().boundary_edge_count(), 0);
    }

    #[test]
    fn symmetric_satellites_mirror_their_sizing() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(10);
        let (mut solid, mut state) = base(&mut rng);
        let mut spec = satellite_spec(8);
        spec.symmetry = true;
        let plan = vec![LayerSpec::Appliance(spec)];
        apply_layer(&mut solid, &mut state, &plan, 0, &config, &mut rng).unwrap();

        let bosses = &solid.bodies()[1..];
        for m in 0..4 {
            let twin = 8 - 2 - m;
            assert_relative_eq!(
                bosses[m].stations()[0].radii[0],
                bosses[twin].stations()[0].radii[0]
            );
            assert_relative_eq!(bosses[m].top_z(), bosses[twin].top_z());
        }
    }

    #[test]
    fn spiky_satellites_taper_to_points() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(11);
        let (mut solid, mut state) = base(&mut rng);
        let mut spec = satellite_spec(6);
        spec.polygon_range = Some((3, 6));
        let plan = vec![LayerSpec::Appliance(spec)];
        apply_layer(&mut solid, &mut state, &plan, 0, &config, &mut rng).unwrap();

        assert_eq!(solid.bodies().len(), 7);
        for spike in &solid.bodies()[1..] {
            assert!(spike.min_top_radius() <= SPIKE_TIP_RADIUS + 1e-9);
        }
        assert_eq!(solid.tessellate().boundary_edge_count(), 0);
    }

    #[test]
    fn the_skirt_depends_on_the_previous_layer() {
        let config = config();
        let smooth_prev = LayerSpec::Profile(ProfileLayerSpec {
            edge_fillet: 6.0,
            ..profile_spec(30.0)
        });
        let plain_prev = LayerSpec::Profile(profile_spec(30.0));

        // Widest radius among the boss's foot stations at the standing
        // surface.
        fn foot_radius(body: &SweptBody) -> f64 {
            body.stations()
                .iter()
                .take_while(|s| (s.z - 30.0).abs() < 1e-9)
                .map(|s| s.radii[0])
                .fold(f64::NEG_INFINITY, f64::max)
        }

        let mut feet = Vec::new();
        for prev in [plain_prev, smooth_prev] {
            let mut rng = StdRng::seed_from_u64(12);
            let (mut solid, mut state) = base(&mut rng);
            let plan = vec![prev, LayerSpec::Appliance(satellite_spec(6))];
            apply_layer(&mut solid, &mut state, &plan, 1, &config, &mut rng).unwrap();
            feet.push(foot_radius(&solid.bodies()[1]));
        }

        let unskirted = {
            let mut rng = StdRng::seed_from_u64(12);
            let (mut solid, mut state) = base(&mut rng);
            let plan = vec![LayerSpec::Appliance(satellite_spec(6))];
            apply_layer(&mut solid, &mut state, &plan, 0, &config, &mut rng).unwrap();
            foot_radius(&solid.bodies()[1])
        };

        // Only the plain previous layer earns the flared skirt.
        assert_relative_eq!(feet[0], unskirted + 0.009 * 60.0, epsilon = 1e-9);
        assert_relative_eq!(feet[1], unskirted, epsilon = 1e-9);
    }

    #[test]
    fn the_terminal_boss_uses_fixed_sizing_above_the_base() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(13);
        let (mut solid, mut state) = base(&mut rng);
        let mut boss_spec = satellite_spec(1);
        boss_spec.radius = None;
        let plan = vec![
            LayerSpec::Profile(profile_spec(30.0)),
            LayerSpec::Appliance(boss_spec),
        ];
        apply_layer(&mut solid, &mut state, &plan, 0, &config, &mut rng).unwrap();
        apply_layer(&mut solid, &mut state, &plan, 1, &config, &mut rng).unwrap();

        let boss = solid.bodies().last().unwrap();
        assert_relative_eq!(boss.stations()[0].radii[0], 7.2, epsilon = 1e-9);
        assert_relative_eq!(boss.bottom_z(), 30.0);
        assert_relative_eq!(boss.top_z(), 40.0 + 12.0, epsilon = 1e-9);
    }

    #[test]
    fn bosses_off_the_footprint_are_rejected() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(14);
        let (mut solid, mut state) = base(&mut rng);
        let mut spec = satellite_spec(6);
        spec.radius = Some(55.0);
        let plan = vec![LayerSpec::Appliance(spec)];
        let result = apply_layer(&mut solid, &mut state, &plan, 0, &config, &mut rng);
        assert!(matches!(
            result,
            Err(SculptorError::Geometry(GeometryError::DetachedFeature { .. }))
        ));
    }

    #[test]
    fn the_last_profile_ring_bounds_satellite_placement() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(15);
        let (mut solid, mut state) = base(&mut rng);
        // A narrow recorded footprint leaves the satellite ring hanging.
        state.last_profile_points =
            Some(profile::build_ring(12, 10.0, &[0.0; 12], false, config.base_radius));
        let plan = vec![LayerSpec::Appliance(satellite_spec(6))];
        let result = apply_layer(&mut solid, &mut state, &plan, 0, &config, &mut rng);
        assert!(matches!(
            result,
            Err(SculptorError::Geometry(GeometryError::DetachedFeature { .. }))
        ));
    }
}
