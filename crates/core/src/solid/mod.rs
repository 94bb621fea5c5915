//! Swept-solid kernel.
//!
//! Bodies are stacks of horizontal cross sections ("stations") sampled as a
//! radius function around a vertical axis, closed by flat caps or an apex
//! point. Every construction step validates the shape it is asked to build
//! and reports a [`GeometryError`] instead of producing a broken solid, so
//! callers can treat failures as recoverable.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{DVec2, DVec3};

use crate::error::GeometryError;

/// Angular samples per station.
pub const ANGULAR_RES: usize = 144;

const FILLET_STEPS: usize = 6;
const DOME_STEPS: usize = 12;
const SPLINE_SUBDIV: usize = 8;
const SEAM_TOL: f64 = 1e-6;
const Z_TOL: f64 = 1e-12;

type GeoResult<T> = std::result::Result<T, GeometryError>;

/// Radius law used when lofting a section towards a circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoftBlend {
    /// Ease in and out, giving the loft a smooth waist.
    Smooth,
    /// Linear taper, giving a straight cone wall.
    Straight,
}

/// One horizontal cross section: a height and the surface radius at each of
/// the [`ANGULAR_RES`] sample angles around the body centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub z: f64,
    pub radii: Vec<f64>,
}

/// A single closed swept body.
#[derive(Debug, Clone)]
pub struct SweptBody {
    center: DVec2,
    stations: Vec<Station>,
    /// When set, the body closes at a point above the centre at this height
    /// instead of a flat top cap.
    top_apex: Option<f64>,
}

impl SweptBody {
    /// Builds a one-station body from a closed outline.
    ///
    /// The outline must be star shaped around `center`: every ray from the
    /// centre crosses it exactly once.
    pub fn from_outline(center: DVec2, outline: &[DVec2], z: f64) -> GeoResult<Self> {
        let radii = resample_outline(center, outline)?;
        Ok(Self {
            center,
            stations: vec![Station { z, radii }],
            top_apex: None,
        })
    }

    /// Builds a one-station body from a closed Catmull-Rom spline through
    /// the given control points.
    pub fn from_spline_ring(center: DVec2, control: &[DVec2], z: f64) -> GeoResult<Self> {
        if control.len() < 3 {
            return Err(GeometryError::EmptySection(control.len()));
        }
        let sampled = sample_closed_spline(control, SPLINE_SUBDIV);
        Self::from_outline(center, &sampled, z)
    }

    /// Builds a one-station circular body.
    pub fn circle(center: DVec2, radius: f64, z: f64) -> GeoResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidDimension {
                what: "circle radius",
                value: radius,
            });
        }
        Ok(Self {
            center,
            stations: vec![Station {
                z,
                radii: vec![radius; ANGULAR_RES],
            }],
            top_apex: None,
        })
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn top_apex(&self) -> Option<f64> {
        self.top_apex
    }

    pub fn bottom_z(&self) -> f64 {
        self.stations[0].z
    }

    pub fn top_z(&self) -> f64 {
        match self.top_apex {
            Some(z) => z,
            None => self.stations[self.stations.len() - 1].z,
        }
    }

    fn top_station(&self) -> &Station {
        &self.stations[self.stations.len() - 1]
    }

    /// Smallest radius on the current top cap.
    pub fn min_top_radius(&self) -> f64 {
        self.top_station()
            .radii
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// Surface radius at the given height and angle, clamped to the body's
    /// vertical extent.
    pub fn radius_at(&self, z: f64, angle: f64) -> f64 {
        let radii = self.radii_at(z);
        let step = TAU / ANGULAR_RES as f64;
        let turns = (angle.rem_euclid(TAU)) / step;
        let k = turns.floor() as usize % ANGULAR_RES;
        let frac = turns - turns.floor();
        let a = radii[k];
        let b = radii[(k + 1) % ANGULAR_RES];
        a + (b - a) * frac
    }

    /// Interpolated radii at a height, clamped to the body's extent. Where
    /// two stations share the height (a stacking seam) the upper one wins.
    fn radii_at(&self, z: f64) -> Vec<f64> {
        let stations = &self.stations;
        if z <= stations[0].z {
            return stations[0].radii.clone();
        }
        let last = stations.len() - 1;
        if z >= stations[last].z {
            return stations[last].radii.clone();
        }
        let mut hi = stations.partition_point(|s| s.z < z - Z_TOL);
        while hi + 1 < stations.len() && (stations[hi + 1].z - z).abs() <= Z_TOL {
            hi += 1;
        }
        if (stations[hi].z - z).abs() <= Z_TOL {
            return stations[hi].radii.clone();
        }
        let lo = hi - 1;
        let span = stations[hi].z - stations[lo].z;
        let t = if span <= Z_TOL {
            1.0
        } else {
            (z - stations[lo].z) / span
        };
        (0..ANGULAR_RES)
            .map(|k| {
                let a = stations[lo].radii[k];
                let b = stations[hi].radii[k];
                a + (b - a) * t
            })
            .collect()
    }

    fn require_open_top(&self, what: &'static str) -> GeoResult<()> {
        match self.top_apex {
            Some(z) => Err(GeometryError::InvalidDimension { what, value: z }),
            None => Ok(()),
        }
    }

    /// Extends the body straight up by `height`.
    pub fn extrude(&mut self, height: f64) -> GeoResult<()> {
        self.require_open_top("extrusion on a closed top")?;
        if !height.is_finite() || height <= 0.0 {
            return Err(GeometryError::InvalidDimension {
                what: "extrusion height",
                value: height,
            });
        }
        let top = self.top_station().clone();
        self.stations.push(Station {
            z: top.z + height,
            radii: top.radii,
        });
        Ok(())
    }

    /// Places a new section outline directly on the current top cap,
    /// creating a stacking seam at the cap height.
    pub fn stack_section(&mut self, outline: &[DVec2]) -> GeoResult<()> {
        self.require_open_top("section on a closed top")?;
        let radii = resample_outline(self.center, outline)?;
        let z = self.top_station().z;
        self.stations.push(Station { z, radii });
        Ok(())
    }

    /// Blends the current top section into a circle of `target_radius` over
    /// `height`, adding `steps` intermediate stations.
    pub fn loft_to_circle(
        &mut self,
        target_radius: f64,
        height: f64,
        steps: usize,
        blend: LoftBlend,
    ) -> GeoResult<()> {
        self.require_open_top("loft on a closed top")?;
        if !height.is_finite() || height <= 0.0 {
            return Err(GeometryError::InvalidDimension {
                what: "loft height",
                value: height,
            });
        }
        if !target_radius.is_finite() || target_radius <= 0.0 {
            return Err(GeometryError::InvalidDimension {
                what: "loft target radius",
                value: target_radius,
            });
        }
        let start = self.top_station().clone();
        for j in 1..=steps {
            let t = j as f64 / steps as f64;
            let s = match blend {
                LoftBlend::Smooth => t * t * (3.0 - 2.0 * t),
                LoftBlend::Straight => t,
            };
            let radii = start
                .radii
                .iter()
                .map(|r| r + (target_radius - r) * s)
                .collect();
            self.stations.push(Station {
                z: start.z + height * t,
                radii,
            });
        }
        Ok(())
    }

    /// Rounds the convex edge between the wall and the top cap.
    ///
    /// The fillet consumes `radius` of wall height and shrinks the cap by
    /// the same amount. A fillet radius matching a circular cap's radius
    /// closes the body into a dome apex.
    pub fn fillet_top_rim(&mut self, radius: f64) -> GeoResult<()> {
        self.require_open_top("rim fillet on a closed top")?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidDimension {
                what: "rim fillet radius",
                value: radius,
            });
        }
        let top = self.top_station().clone();
        let rmin = top.radii.iter().copied().fold(f64::INFINITY, f64::min);
        let rmax = top.radii.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let circular_cap = rmax - rmin <= 1e-9 * rmax.max(1.0);
        let dome = circular_cap && (radius - rmin).abs() <= 1e-9 * rmin.max(1.0);
        if !dome && radius >= rmin {
            return Err(GeometryError::FilletTooLarge {
                radius,
                place: "the top face",
            });
        }
        let z_cut = top.z - radius;
        if z_cut < self.bottom_z() - 1e-9 {
            return Err(GeometryError::FilletTooLarge {
                radius,
                place: "the wall below the rim",
            });
        }
        let wall = self.radii_at(z_cut);
        self.stations.retain(|s| s.z < z_cut - Z_TOL);
        self.stations.push(Station {
            z: z_cut,
            radii: wall.clone(),
        });

        let steps = if dome { DOME_STEPS } else { FILLET_STEPS };
        for j in 1..=steps {
            if dome && j == steps {
                self.top_apex = Some(top.z);
                break;
            }
            let u = (j as f64 / steps as f64) * FRAC_PI_2;
            let fade = 1.0 - u.sin();
            let radii = (0..ANGULAR_RES)
                .map(|k| {
                    let arc = top.radii[k] - radius + radius * u.cos();
                    arc + (wall[k] - top.radii[k]) * fade
                })
                .collect();
            self.stations.push(Station {
                z: z_cut + radius * u.sin(),
                radii,
            });
        }
        Ok(())
    }

    /// Blends the concave corner a stacking seam leaves between the exposed
    /// annulus of the lower cap and the wall of the section above it.
    pub fn seam_fillet(&mut self, seam_z: f64, radius: f64) -> GeoResult<()> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidDimension {
                what: "seam fillet radius",
                value: radius,
            });
        }
        let mut seam = None;
        for i in 0..self.stations.len().saturating_sub(1) {
            if (self.stations[i].z - seam_z).abs() <= SEAM_TOL
                && (self.stations[i + 1].z - seam_z).abs() <= SEAM_TOL
            {
                seam = Some(i);
            }
        }
        let Some(i) = seam else {
            return Err(GeometryError::SeamNotFound(seam_z));
        };
        let lower = self.stations[i].radii.clone();
        let upper = self.stations[i + 1].radii.clone();
        for k in 0..ANGULAR_RES {
            if upper[k] + radius > lower[k] + 1e-9 {
                return Err(GeometryError::FilletTooLarge {
                    radius,
                    place: "the seam annulus",
                });
            }
        }
        let base_z = self.stations[i].z;
        let z_cut = base_z + radius;
        if self.top_apex.is_none() && z_cut > self.top_z() + 1e-9 {
            return Err(GeometryError::FilletTooLarge {
                radius,
                place: "the wall above the seam",
            });
        }
        let wall = self.radii_at(z_cut);

        let mut above = self.stations.split_off(i + 2);
        above.retain(|s| s.z > z_cut + Z_TOL);
        self.stations.truncate(i + 1);

        let flare: Vec<f64> = upper.iter().map(|r| r + radius).collect();
        self.stations.push(Station {
            z: base_z,
            radii: flare,
        });
        for j in 1..=FILLET_STEPS {
            let u = (j as f64 / FILLET_STEPS as f64) * FRAC_PI_2;
            let z = base_z + radius * (1.0 - u.cos());
            let lift = (z - base_z) / radius;
            let radii = (0..ANGULAR_RES)
                .map(|k| upper[k] + radius * (1.0 - u.sin()) + (wall[k] - upper[k]) * lift)
                .collect();
            self.stations.push(Station { z, radii });
        }
        self.stations.extend(above);
        Ok(())
    }

    /// Flares the wall outward where it pierces a surrounding surface,
    /// blending a boss into the face it stands on.
    pub fn skirt_fillet(&mut self, surface_z: f64, radius: f64) -> GeoResult<()> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidDimension {
                what: "skirt fillet radius",
                value: radius,
            });
        }
        let z_cut = surface_z + radius;
        let wall_top = if self.top_apex.is_some() {
            self.top_z()
        } else {
            self.top_station().z
        };
        if surface_z < self.bottom_z() - 1e-9 || z_cut > wall_top + 1e-9 {
            return Err(GeometryError::FilletTooLarge {
                radius,
                place: "the boss base",
            });
        }
        let base_w = self.radii_at(surface_z);
        let top_w = self.radii_at(z_cut);

        let mut rebuilt: Vec<Station> = Vec::with_capacity(self.stations.len() + FILLET_STEPS + 2);
        for station in &self.stations {
            if station.z <= surface_z + Z_TOL {
                rebuilt.push(station.clone());
            }
        }
        if rebuilt
            .last()
            .map(|s| (s.z - surface_z).abs() > Z_TOL)
            .unwrap_or(true)
        {
            rebuilt.push(Station {
                z: surface_z,
                radii: base_w.clone(),
            });
        }
        rebuilt.push(Station {
            z: surface_z,
            radii: base_w.iter().map(|r| r + radius).collect(),
        });
        for j in 1..=FILLET_STEPS {
            let u = (j as f64 / FILLET_STEPS as f64) * FRAC_PI_2;
            let z = surface_z + radius * (1.0 - u.cos());
            let lift = (z - surface_z) / radius;
            let radii = (0..ANGULAR_RES)
                .map(|k| base_w[k] + radius * (1.0 - u.sin()) + (top_w[k] - base_w[k]) * lift)
                .collect();
            rebuilt.push(Station { z, radii });
        }
        for station in &self.stations {
            if station.z > z_cut + Z_TOL {
                rebuilt.push(station.clone());
            }
        }
        self.stations = rebuilt;
        Ok(())
    }

    fn tessellate_into(&self, mesh: &mut Mesh) {
        let ring_base: Vec<u32> = self
            .stations
            .iter()
            .map(|station| {
                let base = mesh.vertices.len() as u32;
                for k in 0..ANGULAR_RES {
                    let angle = k as f64 * TAU / ANGULAR_RES as f64;
                    mesh.vertices.push(DVec3::new(
                        self.center.x + station.radii[k] * angle.cos(),
                        self.center.y + station.radii[k] * angle.sin(),
                        station.z,
                    ));
                }
                base
            })
            .collect();

        // Bottom cap, facing down.
        let bottom_center = mesh.vertices.len() as u32;
        mesh.vertices
            .push(DVec3::new(self.center.x, self.center.y, self.stations[0].z));
        for k in 0..ANGULAR_RES as u32 {
            let next = (k + 1) % ANGULAR_RES as u32;
            mesh.triangles
                .push([bottom_center, ring_base[0] + next, ring_base[0] + k]);
        }

        // Walls between consecutive stations.
        for s in 0..self.stations.len() - 1 {
            let lower = ring_base[s];
            let upper = ring_base[s + 1];
            for k in 0..ANGULAR_RES as u32 {
                let next = (k + 1) % ANGULAR_RES as u32;
                mesh.triangles.push([lower + k, lower + next, upper + next]);
                mesh.triangles.push([lower + k, upper + next, upper + k]);
            }
        }

        // Top closure: flat cap or apex fan, facing up.
        let top_ring = ring_base[ring_base.len() - 1];
        let top_point = mesh.vertices.len() as u32;
        let top_z = self.top_apex.unwrap_or(self.stations[self.stations.len() - 1].z);
        mesh.vertices
            .push(DVec3::new(self.center.x, self.center.y, top_z));
        for k in 0..ANGULAR_RES as u32 {
            let next = (k + 1) % ANGULAR_RES as u32;
            mesh.triangles
                .push([top_point, top_ring + k, top_ring + next]);
        }
    }
}

/// An accumulating collection of swept bodies forming one sculpture.
///
/// Bodies may interpenetrate; the combined shape is their overlapping
/// union and each body tessellates to its own closed shell.
#[derive(Debug, Clone)]
pub struct Solid {
    bodies: Vec<SweptBody>,
}

impl Solid {
    pub fn new(main: SweptBody) -> Self {
        Self { bodies: vec![main] }
    }

    /// The primary stacked body carrying the base and the profile layers.
    pub fn main(&self) -> &SweptBody {
        &self.bodies[0]
    }

    pub fn main_mut(&mut self) -> &mut SweptBody {
        &mut self.bodies[0]
    }

    pub fn push_body(&mut self, body: SweptBody) {
        self.bodies.push(body);
    }

    pub fn bodies(&self) -> &[SweptBody] {
        &self.bodies
    }

    /// Highest point of any body.
    pub fn height(&self) -> f64 {
        self.bodies
            .iter()
            .map(SweptBody::top_z)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn tessellate(&self) -> Mesh {
        let mut mesh = Mesh::default();
        for body in &self.bodies {
            body.tessellate_into(&mut mesh);
        }
        mesh
    }
}

/// Indexed triangle mesh produced by [`Solid::tessellate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<DVec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Axis-aligned bounding box, if the mesh has any vertices.
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices {
            min = min.min(*v);
            max = max.max(*v);
        }
        Some((min, max))
    }

    /// Number of edges not shared by exactly two triangles. Zero for a
    /// collection of closed shells.
    pub fn boundary_edge_count(&self) -> usize {
        let mut counts: HashMap<(u32, u32), usize> = HashMap::new();
        for tri in &self.triangles {
            for e in 0..3 {
                let a = tri[e];
                let b = tri[(e + 1) % 3];
                let key = (a.min(b), a.max(b));
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        counts.values().filter(|count| **count != 2).count()
    }

    /// Total signed volume of the mesh; positive when triangles wind
    /// outward.
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;
        for tri in &self.triangles {
            let a = self.vertices[tri[0] as usize];
            let b = self.vertices[tri[1] as usize];
            let c = self.vertices[tri[2] as usize];
            volume += a.dot(b.cross(c)) / 6.0;
        }
        volume
    }
}

/// Rounds every corner of a polygon with a circular arc of the given
/// radius, returning the new outline.
pub fn round_polygon_corners(outline: &[DVec2], radius: f64) -> GeoResult<Vec<DVec2>> {
    const CORNER_ARC_STEPS: usize = 4;

    if outline.len() < 3 {
        return Err(GeometryError::EmptySection(outline.len()));
    }
    if !radius.is_finite() || radius <= 0.0 {
        return Err(GeometryError::InvalidDimension {
            what: "corner fillet radius",
            value: radius,
        });
    }

    let n = outline.len();
    let mut rounded = Vec::with_capacity(n * (CORNER_ARC_STEPS + 1));
    for i in 0..n {
        let prev = outline[(i + n - 1) % n];
        let corner = outline[i];
        let next = outline[(i + 1) % n];

        let to_prev = prev - corner;
        let to_next = next - corner;
        let len_prev = to_prev.length();
        let len_next = to_next.length();
        if len_prev <= f64::EPSILON || len_next <= f64::EPSILON {
            return Err(GeometryError::EmptySection(n));
        }
        let u = to_prev / len_prev;
        let v = to_next / len_next;

        let cos_full = u.dot(v).clamp(-1.0, 1.0);
        if cos_full <= -1.0 + 1e-12 {
            // Straight-through corner, nothing to round.
            rounded.push(corner);
            continue;
        }
        let half = (cos_full.acos()) / 2.0;
        let tangent = radius / half.tan();
        if tangent > len_prev / 2.0 || tangent > len_next / 2.0 {
            return Err(GeometryError::FilletTooLarge {
                radius,
                place: "a polygon corner",
            });
        }

        let start = corner + u * tangent;
        let end = corner + v * tangent;
        let bisector = (u + v).normalize();
        let arc_center = corner + bisector * (radius / half.sin());

        let from = start - arc_center;
        let to = end - arc_center;
        let sweep = from.perp_dot(to).atan2(from.dot(to));
        let start_angle = from.y.atan2(from.x);
        for j in 0..=CORNER_ARC_STEPS {
            let angle = start_angle + sweep * j as f64 / CORNER_ARC_STEPS as f64;
            rounded.push(arc_center + DVec2::new(angle.cos(), angle.sin()) * radius);
        }
    }
    Ok(rounded)
}

/// Resamples a closed outline into per-angle radii around `center`.
fn resample_outline(center: DVec2, outline: &[DVec2]) -> GeoResult<Vec<f64>> {
    // Collapse consecutive duplicates before measuring angles.
    let mut points: Vec<DVec2> = Vec::with_capacity(outline.len());
    for p in outline {
        if points
            .last()
            .map(|last| (*p - *last).length() > 1e-9)
            .unwrap_or(true)
        {
            points.push(*p);
        }
    }
    if points.len() > 1 {
        let first = points[0];
        if (first - points[points.len() - 1]).length() <= 1e-9 {
            points.pop();
        }
    }
    if points.len() < 3 {
        return Err(GeometryError::EmptySection(points.len()));
    }

    let mut angles = Vec::with_capacity(points.len());
    let mut radii = Vec::with_capacity(points.len());
    for p in &points {
        let offset = *p - center;
        let r = offset.length();
        if r <= 1e-9 {
            return Err(GeometryError::NonStarSection);
        }
        angles.push(offset.y.atan2(offset.x));
        radii.push(r);
    }

    // The boundary must wind monotonically around the centre, once.
    let n = points.len();
    if wrapped_deltas(&angles).iter().sum::<f64>() < 0.0 {
        angles.reverse();
        radii.reverse();
    }
    let deltas = wrapped_deltas(&angles);
    let total: f64 = deltas.iter().sum();
    if (total - TAU).abs() > 1e-6 || deltas.iter().any(|d| *d <= 0.0) {
        return Err(GeometryError::NonStarSection);
    }

    // Unwrapped cumulative angle of each vertex.
    let mut cumulative = Vec::with_capacity(n + 1);
    cumulative.push(angles[0]);
    for i in 0..n {
        let last = cumulative[i];
        cumulative.push(last + deltas[i]);
    }

    let start = cumulative[0];
    let mut out = vec![0.0; ANGULAR_RES];
    for (k, slot) in out.iter_mut().enumerate() {
        let raw = k as f64 * TAU / ANGULAR_RES as f64;
        let mut theta = raw + ((start - raw) / TAU).ceil() * TAU;
        if theta >= start + TAU {
            theta -= TAU;
        }
        let seg = match cumulative.partition_point(|a| *a <= theta) {
            0 => 0,
            idx => (idx - 1).min(n - 1),
        };
        let r1 = radii[seg];
        let r2 = radii[(seg + 1) % n];
        let a1 = cumulative[seg];
        let a2 = cumulative[seg + 1];
        let radius = chord_radius(r1, a1, r2, a2, theta).ok_or(GeometryError::NonStarSection)?;
        if !radius.is_finite() || radius <= 1e-9 {
            return Err(GeometryError::NonStarSection);
        }
        *slot = radius;
    }
    Ok(out)
}

/// Angle steps between consecutive vertices, wrapped to (-pi, pi].
fn wrapped_deltas(angles: &[f64]) -> Vec<f64> {
    let n = angles.len();
    (0..n)
        .map(|i| {
            let mut d = angles[(i + 1) % n] - angles[i];
            while d <= -std::f64::consts::PI {
                d += TAU;
            }
            while d > std::f64::consts::PI {
                d -= TAU;
            }
            d
        })
        .collect()
}

/// Radius at `theta` of the straight chord between two polar points.
fn chord_radius(r1: f64, a1: f64, r2: f64, a2: f64, theta: f64) -> Option<f64> {
    let denom = r1 * (theta - a1).sin() + r2 * (a2 - theta).sin();
    if denom <= 1e-12 {
        return None;
    }
    Some(r1 * r2 * (a2 - a1).sin() / denom)
}

/// Samples a closed uniform Catmull-Rom spline through the control points.
fn sample_closed_spline(control: &[DVec2], subdiv: usize) -> Vec<DVec2> {
    let n = control.len();
    let mut out = Vec::with_capacity(n * subdiv);
    for i in 0..n {
        let p0 = control[(i + n - 1) % n];
        let p1 = control[i];
        let p2 = control[(i + 1) % n];
        let p3 = control[(i + 2) % n];
        for j in 0..subdiv {
            let t = j as f64 / subdiv as f64;
            out.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }
    out
}

fn catmull_rom(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * (p1 - p2) + p3 - p0) * t3)
}
