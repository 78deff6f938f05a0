use crate::particles::{Particle, ParticleSet, RadiusMode, Viewport};

/// Normal used when two centers coincide exactly
const FALLBACK_NORMAL: (f32, f32) = (1.0, 0.0);

/// What happened during one call to [`advance`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Overlapping pairs that were pushed apart
    pub collisions: usize,
    /// Wall reflections across both axes
    pub wall_bounces: usize,
}

/// Advance every particle by exactly one frame.
///
/// Overlaps are resolved first using the current positions, then each particle moves by
/// its velocity and is reflected off the viewport walls. The same effective radii are used
/// for both phases.
pub fn advance(set: &mut ParticleSet, mode: RadiusMode, viewport: Viewport) -> StepReport {
    let radii = mode.resolve(set);
    let collisions = resolve_collisions(set, &radii);
    let wall_bounces = integrate(set, &radii, viewport);
    StepReport {
        collisions,
        wall_bounces,
    }
}

/// Check every unordered pair once and bounce the overlapping ones.
/// Returns the number of pairs resolved.
pub fn resolve_collisions(set: &mut ParticleSet, radii: &[f32]) -> usize {
    let particles = set.particles_mut();
    let n = particles.len();
    let mut resolved = 0;

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = particles[i].x - particles[j].x;
            let dy = particles[i].y - particles[j].y;
            let distance = (dx * dx + dy * dy).sqrt();

            if distance < radii[i] + radii[j] {
                let (left, right) = particles.split_at_mut(j);
                bounce(&mut left[i], &mut right[0], radii[i], radii[j]);
                resolved += 1;
            }
        }
    }

    resolved
}

/// Separate two overlapping disks along their center line and exchange an elastic impulse.
///
/// Radius stands in for mass: the larger disk receives the smaller velocity change.
pub fn bounce(a: &mut Particle, b: &mut Particle, ra: f32, rb: f32) {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let distance = (dx * dx + dy * dy).sqrt();
    let overlap = (ra + rb) - distance;

    let (nx, ny) = if distance > 0.0 {
        (dx / distance, dy / distance)
    } else {
        tracing::debug!(x = a.x, y = a.y, "coincident centers, using fallback normal");
        FALLBACK_NORMAL
    };

    // Push apart, half each
    a.x += 0.5 * overlap * nx;
    a.y += 0.5 * overlap * ny;
    b.x -= 0.5 * overlap * nx;
    b.y -= 0.5 * overlap * ny;

    let rel_vx = a.vx - b.vx;
    let rel_vy = a.vy - b.vy;
    let inv_a = 1.0 / ra;
    let inv_b = 1.0 / rb;
    let impulse = 2.0 * (nx * rel_vx + ny * rel_vy) / (inv_a + inv_b);

    a.vx -= impulse * inv_a * nx;
    a.vy -= impulse * inv_a * ny;
    b.vx += impulse * inv_b * nx;
    b.vy += impulse * inv_b * ny;
}

/// Move every particle by its velocity and reflect it off the walls.
/// Returns the number of reflections.
pub fn integrate(set: &mut ParticleSet, radii: &[f32], viewport: Viewport) -> usize {
    let (width, height) = viewport.bounds();
    let mut bounces = 0;

    for (p, &r) in set.particles_mut().iter_mut().zip(radii) {
        p.x += p.vx;
        if reflect_axis(&mut p.x, &mut p.vx, r, width) {
            bounces += 1;
        }

        p.y += p.vy;
        if reflect_axis(&mut p.y, &mut p.vy, r, height) {
            bounces += 1;
        }
    }

    bounces
}

/// Mirror a coordinate back inside `[r, bound - r]` and point its velocity away from the
/// wall it crossed. Returns true when a wall was hit.
fn reflect_axis(pos: &mut f32, vel: &mut f32, r: f32, bound: f32) -> bool {
    let hit = if *pos - r < 0.0 {
        *pos = r - (*pos - r);
        *vel = vel.abs();
        true
    } else if *pos + r > bound {
        *pos = bound - (*pos + r - bound) - r;
        *vel = -vel.abs();
        true
    } else {
        false
    };

    // A fast particle can be mirrored past the opposite wall
    if hit {
        *pos = if bound >= 2.0 * r {
            pos.clamp(r, bound - r)
        } else {
            bound / 2.0
        };
    }

    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::{DEFAULT_RADIUS, DEFAULT_SPEED};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f32 = 1e-4;

    fn set_of(particles: Vec<Particle>) -> ParticleSet {
        ParticleSet::from_particles(particles).unwrap()
    }

    fn distance(a: &Particle, b: &Particle) -> f32 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    fn assert_contained(set: &ParticleSet, radii: &[f32], viewport: Viewport) {
        let (w, h) = viewport.bounds();
        for (p, &r) in set.particles().iter().zip(radii) {
            assert!(p.x >= r - EPS && p.x <= w - r + EPS, "x {} outside with r {}", p.x, r);
            assert!(p.y >= r - EPS && p.y <= h - r + EPS, "y {} outside with r {}", p.y, r);
        }
    }

    #[test]
    fn test_head_on_collision() {
        let mut a = Particle::new(90.0, 100.0, 2.0, 0.0, 10.0);
        let mut b = Particle::new(108.0, 100.0, -2.0, 0.0, 10.0);

        bounce(&mut a, &mut b, 10.0, 10.0);

        assert!(a.vx < 0.0, "left disk should move left, got {}", a.vx);
        assert!(b.vx > 0.0, "right disk should move right, got {}", b.vx);
        assert!((a.vx + 2.0).abs() < EPS);
        assert!((b.vx - 2.0).abs() < EPS);
        assert!(distance(&a, &b) >= 20.0 - EPS);
    }

    #[test]
    fn test_wall_bounce() {
        let viewport = Viewport::new(800, 600);
        let mut set = set_of(vec![Particle::new(5.0, 300.0, -3.0, 0.0, 10.0)]);

        advance(&mut set, RadiusMode::PerParticle, viewport);

        let p = set.particle(0).unwrap();
        assert!(p.x >= 10.0, "x mirrored to {}", p.x);
        assert_eq!(p.vx, 3.0);
        assert_eq!(p.y, 300.0);
    }

    #[test]
    fn test_reflection_just_inside_low_wall() {
        let viewport = Viewport::new(200, 200);
        let r = 10.0;
        let mut set = set_of(vec![Particle::new(r - 0.01, 100.0, -1.5, 0.0, r)]);

        let report = advance(&mut set, RadiusMode::PerParticle, viewport);

        let p = set.particle(0).unwrap();
        assert!(p.vx > 0.0);
        assert!(p.x >= r);
        assert_eq!(report.wall_bounces, 1);
    }

    #[test]
    fn test_high_wall_reflection() {
        let viewport = Viewport::new(200, 100);
        let mut set = set_of(vec![Particle::new(100.0, 85.0, 0.0, 10.0, 10.0)]);

        advance(&mut set, RadiusMode::PerParticle, viewport);

        let p = set.particle(0).unwrap();
        // 85 + 10 = 95, overshoot 5 past the 90 limit, mirrored to 85
        assert!((p.y - 85.0).abs() < EPS);
        assert_eq!(p.vy, -10.0);
    }

    #[test]
    fn test_fast_particle_is_clamped() {
        let viewport = Viewport::new(100, 100);
        let mut set = set_of(vec![Particle::new(50.0, 50.0, -500.0, 0.0, 10.0)]);

        advance(&mut set, RadiusMode::PerParticle, viewport);

        assert_contained(&set, &[10.0], viewport);
        assert_eq!(set.particle(0).unwrap().vx, 500.0);
    }

    #[test]
    fn test_separated_pair_keeps_velocity() {
        let mut set = set_of(vec![
            Particle::new(100.0, 100.0, 1.0, 2.0, 10.0),
            Particle::new(125.0, 100.0, -3.0, 0.5, 10.0),
        ]);
        let before: Vec<Particle> = set.particles().to_vec();

        let resolved = resolve_collisions(&mut set, &[10.0, 10.0]);

        assert_eq!(resolved, 0);
        assert_eq!(set.particles(), before.as_slice());
    }

    #[test]
    fn test_touching_pair_is_not_a_collision() {
        let mut set = set_of(vec![
            Particle::new(100.0, 100.0, 1.0, 0.0, 10.0),
            Particle::new(120.0, 100.0, -1.0, 0.0, 10.0),
        ]);
        assert_eq!(resolve_collisions(&mut set, &[10.0, 10.0]), 0);
    }

    #[test]
    fn test_equal_radius_impulse_is_symmetric() {
        let mut a = Particle::new(100.0, 100.0, 3.0, 1.0, 12.0);
        let mut b = Particle::new(115.0, 108.0, -1.0, -2.0, 12.0);
        let sum_before = (a.vx + b.vx, a.vy + b.vy);
        let (a0, b0) = (a, b);

        bounce(&mut a, &mut b, 12.0, 12.0);

        assert!((a.vx + b.vx - sum_before.0).abs() < EPS);
        assert!((a.vy + b.vy - sum_before.1).abs() < EPS);
        // Changes are exact negatives of each other
        assert!(((a.vx - a0.vx) + (b.vx - b0.vx)).abs() < EPS);
        assert!(((a.vy - a0.vy) + (b.vy - b0.vy)).abs() < EPS);
    }

    #[test]
    fn test_larger_disk_changes_less() {
        let mut small = Particle::new(100.0, 100.0, 2.0, 0.0, 5.0);
        let mut large = Particle::new(120.0, 100.0, -2.0, 0.0, 20.0);

        bounce(&mut small, &mut large, 5.0, 20.0);

        let small_delta = (small.vx - 2.0).abs();
        let large_delta = (large.vx + 2.0).abs();
        assert!(large_delta < small_delta);
        // Impulse split is inversely proportional to radius
        assert!((small_delta / large_delta - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_coincident_centers_stay_finite() {
        let mut set = set_of(vec![
            Particle::new(50.0, 50.0, 1.0, 1.0, 10.0),
            Particle::new(50.0, 50.0, -1.0, 1.0, 10.0),
        ]);

        let resolved = resolve_collisions(&mut set, &[10.0, 10.0]);

        assert_eq!(resolved, 1);
        let (a, b) = (set.particle(0).unwrap(), set.particle(1).unwrap());
        for p in [a, b] {
            assert!(p.x.is_finite() && p.y.is_finite());
            assert!(p.vx.is_finite() && p.vy.is_finite());
        }
        // Pushed apart along +x
        assert!((a.x - 60.0).abs() < EPS);
        assert!((b.x - 40.0).abs() < EPS);
    }

    #[test]
    fn test_resolution_separates_overlapping_pair() {
        let mut set = set_of(vec![
            Particle::new(200.0, 200.0, 0.0, 0.0, 15.0),
            Particle::new(205.0, 212.0, 0.0, 0.0, 25.0),
        ]);

        resolve_collisions(&mut set, &[15.0, 25.0]);

        let (a, b) = (set.particle(0).unwrap(), set.particle(1).unwrap());
        assert!(distance(a, b) >= 40.0 - EPS);
    }

    #[test]
    fn test_shared_mode_overrides_stored_radius() {
        // Stored radii are tiny but the shared radius makes them overlap
        let mut set = set_of(vec![
            Particle::new(100.0, 100.0, 0.0, 0.0, 1.0),
            Particle::new(110.0, 100.0, 0.0, 0.0, 1.0),
        ]);

        let report = advance(&mut set, RadiusMode::Shared(8.0), Viewport::new(400, 400));

        assert_eq!(report.collisions, 1);
        let (a, b) = (set.particle(0).unwrap(), set.particle(1).unwrap());
        assert!(distance(a, b) >= 16.0 - EPS);
    }

    #[test]
    fn test_collisions_run_before_integration() {
        // Approaching pair: resolution flips velocities, then integration moves them apart
        let mut set = set_of(vec![
            Particle::new(90.0, 100.0, 2.0, 0.0, 10.0),
            Particle::new(108.0, 100.0, -2.0, 0.0, 10.0),
        ]);

        advance(&mut set, RadiusMode::PerParticle, Viewport::new(400, 400));

        let (a, b) = (set.particle(0).unwrap(), set.particle(1).unwrap());
        assert!((a.x - 87.0).abs() < EPS);
        assert!((b.x - 111.0).abs() < EPS);
    }

    #[test]
    fn test_containment_over_many_frames() {
        let viewport = Viewport::new(640, 384);
        let mut rng = StdRng::seed_from_u64(99);
        let mut set =
            ParticleSet::initialize(100, viewport, DEFAULT_SPEED, DEFAULT_RADIUS, &mut rng).unwrap();

        for mode in [RadiusMode::PerParticle, RadiusMode::Shared(6.0)] {
            // First frame pulls freshly scattered particles in from the edges
            advance(&mut set, mode, viewport);
            for _ in 0..500 {
                advance(&mut set, mode, viewport);
                let radii = mode.resolve(&set);
                assert_contained(&set, &radii, viewport);
                for p in set.particles() {
                    assert!(p.vx.is_finite() && p.vy.is_finite());
                }
            }
        }
    }

    #[test]
    fn test_advance_is_deterministic() {
        let viewport = Viewport::new(320, 240);
        let build = || {
            ParticleSet::initialize(
                30,
                viewport,
                DEFAULT_SPEED,
                DEFAULT_RADIUS,
                &mut StdRng::seed_from_u64(5),
            )
            .unwrap()
        };
        let mut a = build();
        let mut b = build();
        for _ in 0..50 {
            advance(&mut a, RadiusMode::Shared(10.0), viewport);
            advance(&mut b, RadiusMode::Shared(10.0), viewport);
        }
        assert_eq!(a.particles(), b.particles());
    }
}
