use std::f64::consts::PI;

use log::debug;
use serde::Serialize;

use crate::constants::{
    AIR_DENSITY_SEA_LEVEL, GRAVITY, LAUNCH_REFERENCE_PRESSURE, LAUNCH_REFERENCE_TEMPERATURE,
    UNIVERSAL_GAS_CONSTANT,
};
use crate::control::atmosphere::AtmosphericSample;
use crate::control::launch_config::LiftGas;
use crate::errors::SimulationError;

/// Mass and envelope geometry of the balloon.
///
/// Values are replaced wholesale at each transition rather than edited in
/// place; see [`BalloonProperties::expanded`] and [`BalloonProperties::burst`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalloonProperties {
    pub lift_gas: LiftGas,
    pub structure_mass: f64,       // kg
    pub lift_gas_mass: f64,        // kg
    pub gas_moles: f64,            // mol
    pub volume: f64,               // m³
    pub radius: f64,               // m
    pub cross_sectional_area: f64, // m²
    pub max_volume: f64,           // m³
}

impl BalloonProperties {
    /// Fills the envelope for launch.
    ///
    /// `gross_mass` is everything that leaves the ground, gas included. The
    /// fill volume is the one whose displaced sea-level air weighs as much as
    /// `gross_mass`, raised by `percent_lift_gas_scalar` and capped at
    /// `max_volume`.
    pub fn initialize(
        gross_mass: f64,
        lift_gas: LiftGas,
        max_volume: f64,
        percent_lift_gas_scalar: f64,
    ) -> Result<Self, SimulationError> {
        if !(gross_mass.is_finite() && gross_mass > 0.0) {
            return Err(SimulationError::ConfigurationError(format!(
                "gross mass must be positive, got {}",
                gross_mass
            )));
        }
        if !(max_volume.is_finite() && max_volume > 0.0) {
            return Err(SimulationError::ConfigurationError(format!(
                "max volume must be positive, got {}",
                max_volume
            )));
        }

        let total_weight = gross_mass * GRAVITY;
        let neutral_volume = total_weight / (AIR_DENSITY_SEA_LEVEL * GRAVITY);
        let required_volume = neutral_volume * (1.0 + percent_lift_gas_scalar / 100.0);
        let volume = required_volume.min(max_volume);

        let gas_moles = (LAUNCH_REFERENCE_PRESSURE * volume)
            / (UNIVERSAL_GAS_CONSTANT * LAUNCH_REFERENCE_TEMPERATURE);
        let lift_gas_mass = gas_moles * lift_gas.molar_mass();

        let structure_mass = gross_mass - lift_gas_mass;
        if structure_mass < 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "gross mass {:.3} kg is less than the {:.3} kg of {} needed to fill {:.3} m³",
                gross_mass, lift_gas_mass, lift_gas, volume
            )));
        }

        debug!(
            "Filled envelope with {:.2} mol ({:.3} kg) of {}: {:.3} m³, structure {:.3} kg",
            gas_moles, lift_gas_mass, lift_gas, volume, structure_mass
        );

        let radius = sphere_radius(volume);
        Ok(BalloonProperties {
            lift_gas,
            structure_mass,
            lift_gas_mass,
            gas_moles,
            volume,
            radius,
            cross_sectional_area: cross_section(radius),
            max_volume,
        })
    }

    pub fn total_mass(&self) -> f64 {
        self.structure_mass + self.lift_gas_mass
    }

    /// Ideal-gas volume of the fill under the given air, before the envelope limit.
    pub fn free_volume(&self, atmosphere: &AtmosphericSample) -> f64 {
        self.gas_moles * UNIVERSAL_GAS_CONSTANT * atmosphere.temperature / atmosphere.pressure
    }

    pub fn reaches_volume_limit(&self, atmosphere: &AtmosphericSample) -> bool {
        self.free_volume(atmosphere) >= self.max_volume
    }

    /// Envelope resized to the given air, capped at `max_volume`.
    pub fn expanded(&self, atmosphere: &AtmosphericSample) -> Self {
        let volume = self.free_volume(atmosphere).min(self.max_volume);
        let radius = sphere_radius(volume);
        BalloonProperties {
            volume,
            radius,
            cross_sectional_area: cross_section(radius),
            ..*self
        }
    }

    /// State after the envelope fails: gas gone, the parachute sets the drag area.
    pub fn burst(&self, parachute_area: f64) -> Self {
        BalloonProperties {
            lift_gas_mass: 0.0,
            volume: 0.0,
            radius: (parachute_area / PI).sqrt(),
            cross_sectional_area: parachute_area,
            ..*self
        }
    }
}

pub fn sphere_radius(volume: f64) -> f64 {
    ((3.0 * volume) / (4.0 * PI)).cbrt()
}

pub fn cross_section(radius: f64) -> f64 {
    PI * radius.powi(2)
}
