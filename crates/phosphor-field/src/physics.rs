//! Force law and integration for a single particle.
//!
//! Attraction toward the pointer follows a softened inverse-square law,
//! `strength / (distance² + softening)`, inside `attraction_radius` and is
//! zero outside it. A Hooke spring pulls each particle back to its origin.
//! Particles have unit mass, so forces are used directly as accelerations.

use phosphor_config::PhysicsConfig;
use phosphor_core::{Integrator, Vec2};

use crate::particle::Particle;

/// Acceleration toward the pointer for a particle `displacement` away from it
/// (`displacement = pointer - position`).
pub fn attraction(displacement: Vec2, config: &PhysicsConfig) -> Vec2 {
    let distance = displacement.length();
    if !distance.is_finite() || distance >= config.attraction_radius {
        return Vec2::ZERO;
    }
    let magnitude = config.attraction_strength / (distance * distance + config.softening);
    displacement.normalize_or_zero() * magnitude
}

/// Acceleration pulling `position` back toward `origin`.
pub fn spring(position: Vec2, origin: Vec2, spring_constant: f32) -> Vec2 {
    (origin - position) * spring_constant
}

/// Drawing opacity for a particle `distance` away from the pointer.
pub fn opacity(distance: f32, config: &PhysicsConfig) -> f32 {
    if distance.is_finite() && distance < config.fade_radius {
        config.min_opacity + (1.0 - config.min_opacity) * (distance / config.fade_radius)
    } else {
        1.0
    }
}

/// Apply `acceleration` for `dt`, damp the velocity, and move the particle.
pub fn integrate(
    particle: &mut Particle,
    acceleration: Vec2,
    dt: f32,
    damping: f32,
    integrator: Integrator,
) {
    let old_velocity = particle.velocity;
    let new_velocity = (old_velocity + acceleration * dt) * damping;

    particle.position += match integrator {
        Integrator::VelocityVerlet => (old_velocity + new_velocity) * (0.5 * dt),
        Integrator::Euler => new_velocity * dt,
    };
    particle.velocity = new_velocity;
}

/// Advance one particle by `dt` with the pointer at `pointer`.
pub fn step(particle: &mut Particle, pointer: Vec2, dt: f32, config: &PhysicsConfig) {
    let displacement = pointer - particle.position;
    let acceleration = attraction(displacement, config)
        + spring(particle.position, particle.origin(), config.spring_constant);

    integrate(particle, acceleration, dt, config.damping, config.integrator);
    particle.opacity = opacity(displacement.length(), config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    #[test]
    fn test_attraction_zero_beyond_radius() {
        let c = config();
        assert_eq!(attraction(Vec2::new(200.0, 0.0), &c), Vec2::ZERO);
        assert_eq!(attraction(Vec2::new(300.0, 400.0), &c), Vec2::ZERO);
    }

    #[test]
    fn test_attraction_points_at_pointer() {
        let a = attraction(Vec2::new(0.0, -10.0), &config());
        assert_eq!(a.x, 0.0);
        assert!(a.y < 0.0);
        // 100 / (10² + 1)
        assert!((a.length() - 100.0 / 101.0).abs() < 1e-5);
    }

    #[test]
    fn test_attraction_falls_off_with_distance() {
        let c = config();
        let near = attraction(Vec2::new(5.0, 0.0), &c).length();
        let far = attraction(Vec2::new(50.0, 0.0), &c).length();
        assert!(near > far);
    }

    #[test]
    fn test_attraction_finite_at_zero_distance() {
        let a = attraction(Vec2::ZERO, &config());
        assert_eq!(a, Vec2::ZERO);
    }

    #[test]
    fn test_spring_is_hookean() {
        let s = spring(Vec2::new(10.0, 20.0), Vec2::new(0.0, 0.0), 0.05);
        assert!((s.x + 0.5).abs() < 1e-6);
        assert!((s.y + 1.0).abs() < 1e-6);
    }

    #[rstest]
    #[case(0.0, 0.3)]
    #[case(50.0, 0.65)]
    #[case(99.999, 1.0)]
    #[case(100.0, 1.0)]
    #[case(500.0, 1.0)]
    fn test_opacity_fades_near_pointer(#[case] distance: f32, #[case] expected: f32) {
        assert!((opacity(distance, &config()) - expected).abs() < 1e-3);
    }

    #[rstest]
    #[case(Integrator::VelocityVerlet)]
    #[case(Integrator::Euler)]
    fn test_free_velocity_never_grows(#[case] integrator: Integrator) {
        let mut p = Particle::at_rest('x', Vec2::ZERO);
        p.velocity = Vec2::new(30.0, -40.0);
        let mut previous = p.velocity.length();
        for _ in 0..200 {
            integrate(&mut p, Vec2::ZERO, 0.16, 0.97, integrator);
            let speed = p.velocity.length();
            assert!(speed <= previous);
            previous = speed;
        }
        assert!(previous < 50.0 * 0.97_f32.powi(199));
    }

    #[rstest]
    #[case(Integrator::VelocityVerlet)]
    #[case(Integrator::Euler)]
    fn test_spring_only_converges_to_origin(#[case] integrator: Integrator) {
        let c = PhysicsConfig {
            integrator,
            ..config()
        };
        let origin = Vec2::new(400.0, 300.0);
        let mut p = Particle::at_rest('x', origin);
        p.position = Vec2::new(450.0, 260.0);
        let far_away = Vec2::new(-10_000.0, -10_000.0);

        for _ in 0..2000 {
            step(&mut p, far_away, c.timestep, &c);
        }
        assert!(p.displacement() < 1e-3, "displacement {}", p.displacement());
        assert!(p.velocity.length() < 1e-3);
        assert_eq!(p.opacity, 1.0);
    }

    #[test]
    fn test_pointer_on_particle_stays_finite() {
        let c = config();
        let origin = Vec2::new(100.0, 100.0);
        let mut p = Particle::at_rest('x', origin);

        step(&mut p, origin, c.timestep, &c);
        assert!(p.position.is_finite());
        assert!(p.velocity.is_finite());
        assert_eq!(p.position, origin);
        assert!((p.opacity - c.min_opacity).abs() < 1e-6);

        for _ in 0..500 {
            step(&mut p, origin + Vec2::new(0.5, 0.0), c.timestep, &c);
            assert!(p.position.is_finite());
            assert!(p.velocity.is_finite());
        }
    }

    #[test]
    fn test_first_step_moves_toward_nearby_pointer() {
        let c = config();
        let origin = Vec2::new(100.0, 100.0);
        let mut p = Particle::at_rest('x', origin);
        step(&mut p, Vec2::new(130.0, 100.0), c.timestep, &c);
        assert!(p.velocity.x > 0.0);
        assert_eq!(p.velocity.y, 0.0);
        assert!(p.position.x > origin.x);
    }
}
