use std::ops::{Add, Mul};

use crate::constants::PLANET_RADIUS;
use crate::utils::{
    coordinates::{local_up, to_geodetic, GeodeticPosition},
    vector3d::Vector3D,
};

/// Position and velocity in the planet-centred Cartesian frame.
///
/// Also serves as its own time derivative (velocity, acceleration) so it can
/// be fed straight to the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    pub position: Vector3D,
    pub velocity: Vector3D,
}

impl FlightState {
    pub fn new(position: Vector3D, velocity: Vector3D) -> Self {
        FlightState { position, velocity }
    }

    /// Launch state: at `site`, moving straight up at `ascent_rate`.
    pub fn at_launch(site: &GeodeticPosition, ascent_rate: f64) -> Self {
        let position = site.to_cartesian();
        FlightState {
            position,
            velocity: local_up(&position) * ascent_rate,
        }
    }

    pub fn geodetic(&self) -> GeodeticPosition {
        to_geodetic(&self.position)
    }

    pub fn altitude(&self) -> f64 {
        self.position.magnitude() - PLANET_RADIUS
    }

    pub fn vertical_speed(&self) -> f64 {
        self.velocity.dot(&local_up(&self.position))
    }

    /// Replaces the vertical velocity component, keeping the horizontal drift.
    pub fn with_vertical_speed(&self, vertical_speed: f64) -> Self {
        let up = local_up(&self.position);
        let horizontal = self.velocity - up * self.velocity.dot(&up);
        FlightState {
            position: self.position,
            velocity: horizontal + up * vertical_speed,
        }
    }

    /// Resting on the surface directly below the current position.
    pub fn grounded(&self) -> Self {
        FlightState {
            position: local_up(&self.position) * PLANET_RADIUS,
            velocity: Vector3D::ZERO,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

impl Add for FlightState {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        FlightState::new(self.position + other.position, self.velocity + other.velocity)
    }
}

impl Mul<f64> for FlightState {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        FlightState::new(self.position * scalar, self.velocity * scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_launch_state_moves_straight_up() {
        let site = GeodeticPosition::new(32.0, 42.0, 1.0);
        let state = FlightState::at_launch(&site, 5.0);

        assert_abs_diff_eq!(state.altitude(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(state.vertical_speed(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(state.velocity.magnitude(), 5.0, epsilon = 1e-12);

        let geodetic = state.geodetic();
        assert_relative_eq!(geodetic.latitude, 32.0, epsilon = 1e-9);
        assert_relative_eq!(geodetic.longitude, 42.0, epsilon = 1e-9);
    }

    #[test]
    fn test_with_vertical_speed_keeps_horizontal_drift() {
        let site = GeodeticPosition::new(10.0, 20.0, 1_000.0);
        let drift = crate::utils::coordinates::local_to_cartesian(10.0, 20.0, 3.0, -2.0, 0.0);
        let state = FlightState::new(site.to_cartesian(), drift + local_up(&site.to_cartesian()) * 4.0);

        let reset = state.with_vertical_speed(-5.0);

        assert_relative_eq!(reset.vertical_speed(), -5.0, epsilon = 1e-9);
        let horizontal = reset.velocity - local_up(&reset.position) * reset.vertical_speed();
        assert_relative_eq!(horizontal.x, drift.x, epsilon = 1e-9);
        assert_relative_eq!(horizontal.y, drift.y, epsilon = 1e-9);
        assert_relative_eq!(horizontal.z, drift.z, epsilon = 1e-9);
    }

    #[test]
    fn test_grounded_clamps_to_surface() {
        let site = GeodeticPosition::new(-45.0, 170.0, -12.0);
        let state = FlightState::new(site.to_cartesian(), Vector3D::new(1.0, 2.0, 3.0)).grounded();

        assert_abs_diff_eq!(state.altitude(), 0.0, epsilon = 1e-6);
        assert_eq!(state.velocity, Vector3D::ZERO);
        assert_relative_eq!(state.geodetic().latitude, -45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_arithmetic_for_integration() {
        let a = FlightState::new(Vector3D::new(1.0, 2.0, 3.0), Vector3D::new(0.5, 0.0, -1.0));
        let b = a + a * 2.0;
        assert_eq!(b.position, Vector3D::new(3.0, 6.0, 9.0));
        assert_eq!(b.velocity, Vector3D::new(1.5, 0.0, -3.0));
    }
}
