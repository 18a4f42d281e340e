use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub type Vec3 = [f32; 3];

/// Time step of one simulation iteration.
pub const DT: f32 = 0.01;
/// Added to every squared distance so that close encounters stay finite.
pub const SOFTENING: f32 = 1e-4;

const CLUSTER_OFFSET: f32 = 1000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Body {
    pub fn accelerate(&mut self, dv: Vec3) {
        for (v, d) in self.velocity.iter_mut().zip(dv) {
            *v += d;
        }
    }

    pub fn integrate(&mut self, dt: f32) {
        for (p, v) in self.position.iter_mut().zip(self.velocity) {
            *p += v * dt;
        }
    }
}

/// Creates body `id` at rest in one of three clusters, chosen by `id % 3`, with a
/// small random offset derived from `seed` and `id`.
pub fn init_body(id: usize, seed: u64) -> Body {
    let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(id as u64));
    let mut jitter = || -2.2 + rng.gen::<f32>() * 3.3;

    let center = match id % 3 {
        0 => [-CLUSTER_OFFSET, 0.0, 0.0],
        1 => [0.0, 0.0, -CLUSTER_OFFSET],
        _ => [0.0, CLUSTER_OFFSET, 0.0],
    };

    Body {
        position: center.map(|c| c + jitter()),
        velocity: [0.0; 3],
    }
}

/// Returns the velocity change of body `id` over `dt`, from the pull of every body
/// in `positions` (including itself, which contributes nothing).
pub fn compute_body_force(id: usize, positions: &[Vec3], dt: f32, softening: f32) -> Vec3 {
    let origin = positions[id];
    let mut force = [0.0f32; 3];

    for other in positions {
        let d = [
            other[0] - origin[0],
            other[1] - origin[1],
            other[2] - origin[2],
        ];
        let dist_sqr = d[0] * d[0] + d[1] * d[1] + d[2] * d[2] + softening;
        let inv_dist = 1.0 / dist_sqr.sqrt();
        let inv_dist3 = inv_dist * inv_dist * inv_dist;

        for (f, d) in force.iter_mut().zip(d) {
            *f += d * inv_dist3;
        }
    }

    force.map(|f| f * dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodies_start_in_three_clusters_at_rest() {
        let bodies: Vec<_> = (0..6).map(|id| init_body(id, 1)).collect();
        for b in &bodies {
            assert_eq!(b.velocity, [0.0; 3]);
        }
        assert!(bodies[0].position[0] < -990.0);
        assert!(bodies[1].position[2] < -990.0);
        assert!(bodies[2].position[1] > 990.0);
        assert!(bodies[3].position[0] < -990.0);
    }

    #[test]
    fn init_is_deterministic_per_seed() {
        assert_eq!(init_body(17, 5), init_body(17, 5));
        assert_ne!(init_body(17, 5), init_body(17, 6));
    }

    #[test]
    fn two_bodies_pull_towards_each_other() {
        let positions = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let dv0 = compute_body_force(0, &positions, DT, SOFTENING);
        let dv1 = compute_body_force(1, &positions, DT, SOFTENING);
        assert!(dv0[0] > 0.0);
        assert!(dv1[0] < 0.0);
        assert!((dv0[0] + dv1[0]).abs() < 1e-6);
        assert_eq!(dv0[1], 0.0);
    }

    #[test]
    fn integrate_moves_along_velocity() {
        let mut body = Body::default();
        body.accelerate([1.0, -2.0, 0.5]);
        body.integrate(0.5);
        assert_eq!(body.position, [0.5, -1.0, 0.25]);
    }
}
