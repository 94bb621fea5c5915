use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

/// Fraction of the base radius forming the tolerance band around the
/// symmetry axis. Points inside the band count as lying on the axis.
const SYMMETRY_BAND_DIVISOR: f64 = 20.0;

/// Builds the vertex ring of one layer section.
///
/// Vertices sit at angle `(n + 1) * 2π / point_count` on a circle of
/// `radius`, displaced radially by their deviation and shifted onto the
/// working centre one base radius down the X axis. With `symmetric` set,
/// only the upper half of the ring is kept and mirrored across the X axis
/// so the outline is reflection symmetric. Either way the ring is finally
/// translated so its centroid lands exactly on the working centre.
pub fn build_ring(
    point_count: usize,
    radius: f64,
    deviations: &[f64],
    symmetric: bool,
    base_radius: f64,
) -> Vec<DVec2> {
    let mut ring = Vec::with_capacity(point_count);

    if symmetric {
        let band = base_radius / SYMMETRY_BAND_DIVISOR;
        let mut mirrored: Vec<DVec2> = Vec::new();
        let mut trailing = None;
        // Counts vertices since the last direct keep. Once a vertex has been
        // dropped the counter never returns to one, so later in-band
        // vertices compete for the single trailing slot instead.
        let mut pending = 0usize;

        for n in 0..point_count {
            let point = ring_vertex(n, point_count, radius, deviations[n], base_radius);
            pending += 1;
            if point.y >= -band && pending == 1 {
                ring.push(point);
                pending -= 1;
                if point.y >= band {
                    mirrored.push(point);
                }
            } else if point.y >= -band {
                trailing = Some(point);
            }
        }

        for point in mirrored.iter().rev() {
            ring.push(DVec2::new(point.x, -point.y));
        }
        if let Some(point) = trailing {
            ring.push(point);
        }
    } else {
        for n in 0..point_count {
            ring.push(ring_vertex(n, point_count, radius, deviations[n], base_radius));
        }
    }

    recenter(&mut ring, base_radius);
    ring
}

/// Draws one uniform deviation per vertex in `[0, range * 0.3)`.
///
/// A zero range consumes no randomness and yields all zeros.
pub fn random_deviations<R: Rng + ?Sized>(rng: &mut R, count: usize, range: f64) -> Vec<f64> {
    if range == 0.0 {
        return vec![0.0; count];
    }
    (0..count).map(|_| rng.gen_range(0.0..range * 0.3)).collect()
}

/// Reports whether `point` lies inside the closed polygon `ring` with at
/// least `margin` clearance from every edge.
pub fn ring_contains(ring: &[DVec2], point: DVec2, margin: f64) -> bool {
    if ring.len() < 3 {
        return false;
    }
    inside_polygon(ring, point) && edge_clearance(ring, point) >= margin
}

fn ring_vertex(n: usize, count: usize, radius: f64, deviation: f64, base_radius: f64) -> DVec2 {
    let angle = (n as f64 + 1.0) * TAU / count as f64;
    DVec2::new(
        (1.0 + deviation) * radius * angle.cos() - base_radius,
        (1.0 + deviation) * radius * angle.sin(),
    )
}

fn recenter(ring: &mut [DVec2], base_radius: f64) {
    if ring.is_empty() {
        return;
    }
    let mean = ring.iter().copied().sum::<DVec2>() / ring.len() as f64;
    let shift = DVec2::new(-base_radius - mean.x, -mean.y);
    for point in ring.iter_mut() {
        *point += shift;
    }
}

fn inside_polygon(ring: &[DVec2], point: DVec2) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn edge_clearance(ring: &[DVec2], point: DVec2) -> f64 {
    let mut best = f64::INFINITY;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        best = best.min(segment_distance(ring[j], ring[i], point));
        j = i;
    }
    best
}

fn segment_distance(a: DVec2, b: DVec2, point: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return (point - a).length();
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (point - (a + ab * t)).length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BASE_RADIUS: f64 = 60.0;

    fn centroid(ring: &[DVec2]) -> DVec2 {
        ring.iter().copied().sum::<DVec2>() / ring.len() as f64
    }

    #[test]
    fn zero_deviation_ring_lies_on_the_circle() {
        let deviations = vec![0.0; 24];
        let ring = build_ring(24, 10.0, &deviations, false, BASE_RADIUS);
        assert_eq!(ring.len(), 24);

        let center = centroid(&ring);
        assert_relative_eq!(center.x, -BASE_RADIUS, epsilon = 1e-9);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-9);
        for point in &ring {
            assert_relative_eq!((point - center).length(), 10.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn deviations_scale_the_radius() {
        let deviations = vec![0.5; 8];
        let ring = build_ring(8, 10.0, &deviations, false, BASE_RADIUS);
        let center = centroid(&ring);
        for point in &ring {
            assert_relative_eq!((point - center).length(), 15.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn symmetric_ring_reflects_onto_itself() {
        let deviations = vec![0.0; 8];
        let ring = build_ring(8, 10.0, &deviations, true, BASE_RADIUS);
        assert!(ring.len() >= 4);

        for point in &ring {
            let mirror = DVec2::new(point.x, -point.y);
            let closest = ring
                .iter()
                .map(|other| (mirror - *other).length())
                .fold(f64::INFINITY, f64::min);
            assert!(closest < 1e-9, "no mirror partner for {point:?}");
        }
    }

    #[test]
    fn symmetric_ring_is_recentred() {
        let deviations: Vec<f64> = (0..12).map(|n| 0.05 * (n % 3) as f64).collect();
        let ring = build_ring(12, 10.0, &deviations, true, BASE_RADIUS);
        let center = centroid(&ring);
        assert_relative_eq!(center.x, -BASE_RADIUS, epsilon = 1e-9);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn lower_half_vertices_are_dropped_before_mirroring() {
        // Eight vertices at 45 degree steps: three uppers, one seam point on
        // the axis, three dropped lowers and one trailing near-axis point.
        let deviations = vec![0.0; 8];
        let ring = build_ring(8, 10.0, &deviations, true, BASE_RADIUS);
        assert_eq!(ring.len(), 8);

        let uppers = ring.iter().filter(|p| p.y > 1.0).count();
        let lowers = ring.iter().filter(|p| p.y < -1.0).count();
        assert_eq!(uppers, lowers);
    }

    #[test]
    fn zero_range_draws_nothing() {
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        let deviations = random_deviations(&mut rng, 5, 0.0);
        assert_eq!(deviations, vec![0.0; 5]);
    }

    #[test]
    fn deviations_stay_in_the_scaled_range() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(11);
        let deviations = random_deviations(&mut rng, 100, 2.2);
        for value in deviations {
            assert!((0.0..0.66).contains(&value));
        }
    }

    #[test]
    fn containment_respects_the_margin() {
        let square = vec![
            DVec2::new(-1.0, -1.0),
            DVec2::new(1.0, -1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(-1.0, 1.0),
        ];
        assert!(ring_contains(&square, DVec2::ZERO, 0.9));
        assert!(!ring_contains(&square, DVec2::ZERO, 1.1));
        assert!(!ring_contains(&square, DVec2::new(2.0, 0.0), 0.0));
        assert!(ring_contains(&square, DVec2::new(0.5, 0.5), 0.4));
    }
}
