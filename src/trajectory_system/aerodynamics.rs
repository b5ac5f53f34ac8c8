use serde::{Deserialize, Serialize};

use crate::constants::{GRAVITY, PLANET_RADIUS};
use crate::control::{atmosphere::AtmosphericSample, balloon::BalloonProperties};
use crate::utils::{coordinates::local_up, vector3d::Vector3D};

/// How gravitational acceleration varies with altitude. Fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GravityModel {
    #[default]
    Constant,
    InverseSquare,
}

impl GravityModel {
    pub fn gravity_at_altitude(&self, altitude: f64) -> f64 {
        match self {
            GravityModel::Constant => GRAVITY,
            GravityModel::InverseSquare => {
                let distance = PLANET_RADIUS + altitude.max(0.0);
                GRAVITY * (PLANET_RADIUS / distance).powi(2)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forces {
    pub buoyancy: Vector3D,
    pub drag: Vector3D,
    pub weight: Vector3D,
}

impl Forces {
    pub fn total(&self) -> Vector3D {
        self.buoyancy + self.drag + self.weight
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ForceModel {
    pub gravity: GravityModel,
    pub buoyant_force_scalar: f64,
}

impl Default for ForceModel {
    fn default() -> Self {
        ForceModel::new(GravityModel::Constant, 1.0)
    }
}

impl ForceModel {
    pub fn new(gravity: GravityModel, buoyant_force_scalar: f64) -> Self {
        ForceModel {
            gravity,
            buoyant_force_scalar,
        }
    }

    /// Buoyancy, drag and weight on the balloon at `position` moving with `velocity`.
    ///
    /// Vertical means the local radial direction at `position`. Pure function
    /// of its inputs.
    pub fn forces(
        &self,
        balloon: &BalloonProperties,
        atmosphere: &AtmosphericSample,
        position: Vector3D,
        velocity: Vector3D,
        drag_coefficient: f64,
    ) -> Forces {
        let up = local_up(&position);
        let g = self
            .gravity
            .gravity_at_altitude(position.magnitude() - PLANET_RADIUS);

        Forces {
            buoyancy: self.calculate_buoyancy(balloon, atmosphere, up, g),
            drag: self.calculate_drag(balloon, atmosphere, velocity, drag_coefficient),
            weight: self.calculate_weight(balloon, up, g),
        }
    }

    pub fn calculate_buoyancy(
        &self,
        balloon: &BalloonProperties,
        atmosphere: &AtmosphericSample,
        up: Vector3D,
        gravity: f64,
    ) -> Vector3D {
        let magnitude = balloon.volume * atmosphere.density * gravity * self.buoyant_force_scalar;
        up * magnitude
    }

    pub fn calculate_drag(
        &self,
        balloon: &BalloonProperties,
        atmosphere: &AtmosphericSample,
        velocity: Vector3D,
        drag_coefficient: f64,
    ) -> Vector3D {
        let relative_velocity = velocity - atmosphere.wind;
        let speed = relative_velocity.magnitude();

        if speed > 0.0 {
            let dynamic_pressure = 0.5 * atmosphere.density * speed.powi(2);
            let drag_magnitude =
                dynamic_pressure * balloon.cross_sectional_area * drag_coefficient;
            -relative_velocity.normalize() * drag_magnitude
        } else {
            Vector3D::ZERO
        }
    }

    pub fn calculate_weight(&self, balloon: &BalloonProperties, up: Vector3D, gravity: f64) -> Vector3D {
        -up * (balloon.total_mass() * gravity)
    }
}
