use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    HELIUM_MOLAR_MASS, HYDROGEN_MOLAR_MASS, MAX_SIMULATION_TIME, PLANET_RADIUS, TIME_STEP,
};
use crate::control::weather::ForecastCycle;
use crate::errors::SimulationError;
use crate::trajectory_system::aerodynamics::GravityModel;
use crate::utils::coordinates::GeodeticPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LiftGas {
    Helium,
    Hydrogen,
}

impl LiftGas {
    pub fn molar_mass(&self) -> f64 {
        match self {
            LiftGas::Helium => HELIUM_MOLAR_MASS,
            LiftGas::Hydrogen => HYDROGEN_MOLAR_MASS,
        }
    }
}

impl FromStr for LiftGas {
    type Err = SimulationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "helium" | "he" => Ok(LiftGas::Helium),
            "hydrogen" | "h" | "h2" => Ok(LiftGas::Hydrogen),
            other => Err(SimulationError::ConfigurationError(format!(
                "invalid lift gas type '{}', choose Helium or Hydrogen",
                other
            ))),
        }
    }
}

impl TryFrom<String> for LiftGas {
    type Error = SimulationError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<LiftGas> for String {
    fn from(gas: LiftGas) -> String {
        gas.to_string()
    }
}

impl fmt::Display for LiftGas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiftGas::Helium => write!(f, "Helium"),
            LiftGas::Hydrogen => write!(f, "Hydrogen"),
        }
    }
}

/// Everything needed to start one flight. Built once, never mutated during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    pub gross_mass: f64, // kg, payload + envelope + rigging + lift gas
    pub lift_gas: LiftGas,
    pub max_volume: f64,              // m³, envelope burst volume
    pub percent_lift_gas_scalar: f64, // % extra gas over neutral buoyancy
    pub buoyant_force_scalar: f64,
    pub drag_coefficient: f64,
    pub parachute_drag_coefficient: f64,
    pub parachute_area: f64,        // m²
    pub ascent_rate: f64,           // m/s, initial vertical speed
    pub descent_rate_parachute: f64, // m/s, vertical speed set at burst
    pub launch: GeodeticPosition,
    pub time_step: f64,    // s
    pub max_duration: f64, // s
    pub gravity: GravityModel,
    pub forecast: ForecastCycle,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        LaunchConfig {
            gross_mass: 3.0,
            lift_gas: LiftGas::Helium,
            max_volume: 2.0,
            percent_lift_gas_scalar: 15.0,
            buoyant_force_scalar: 1.0,
            drag_coefficient: 0.47,
            parachute_drag_coefficient: 1.0,
            parachute_area: 1.0,
            ascent_rate: 5.0,
            descent_rate_parachute: 5.0,
            launch: GeodeticPosition::new(32.0, 42.0, 1.0),
            time_step: TIME_STEP,
            max_duration: MAX_SIMULATION_TIME,
            gravity: GravityModel::Constant,
            forecast: ForecastCycle::default(),
        }
    }
}

impl LaunchConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, SimulationError> {
        Self::from_yaml_value(serde_yaml::from_str(source)?)
    }

    pub fn from_yaml_reader<R: std::io::Read>(reader: R) -> Result<Self, SimulationError> {
        Self::from_yaml_value(serde_yaml::from_reader(reader)?)
    }

    /// Gas names are parsed before the rest of the document so an unknown
    /// gas is reported as a configuration error rather than a YAML error.
    fn from_yaml_value(mut document: serde_yaml::Value) -> Result<Self, SimulationError> {
        if let Some(gas) = document.get_mut("lift_gas") {
            let name = gas.as_str().ok_or_else(|| {
                SimulationError::ConfigurationError(format!(
                    "lift gas must be a name, got {:?}",
                    gas
                ))
            })?;
            let lift_gas: LiftGas = name.parse()?;
            *gas = serde_yaml::Value::String(lift_gas.to_string());
        }

        let config: LaunchConfig = serde_yaml::from_value(document)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let file = std::fs::File::open(path)?;
        Self::from_yaml_reader(file)
    }

    /// Number of fixed steps that fit in `max_duration`.
    pub fn max_steps(&self) -> usize {
        (self.max_duration / self.time_step).floor() as usize
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        positive("gross mass", self.gross_mass)?;
        positive("max volume", self.max_volume)?;
        positive("buoyant force scalar", self.buoyant_force_scalar)?;
        positive("parachute area", self.parachute_area)?;
        positive("parachute descent rate", self.descent_rate_parachute)?;
        positive("time step", self.time_step)?;
        non_negative("drag coefficient", self.drag_coefficient)?;
        non_negative("parachute drag coefficient", self.parachute_drag_coefficient)?;

        if !self.percent_lift_gas_scalar.is_finite() || self.percent_lift_gas_scalar <= -100.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "percent lift gas scalar must be above -100%, got {}",
                self.percent_lift_gas_scalar
            )));
        }
        if !self.ascent_rate.is_finite() {
            return Err(SimulationError::ConfigurationError(
                "ascent rate must be finite".to_string(),
            ));
        }
        if !(self.max_duration >= self.time_step) {
            return Err(SimulationError::ConfigurationError(format!(
                "max duration {} s is shorter than one time step of {} s",
                self.max_duration, self.time_step
            )));
        }

        let launch = &self.launch;
        if !(-90.0..=90.0).contains(&launch.latitude) {
            return Err(SimulationError::ConfigurationError(format!(
                "launch latitude {} is outside [-90, 90]",
                launch.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&launch.longitude) {
            return Err(SimulationError::ConfigurationError(format!(
                "launch longitude {} is outside [-180, 180]",
                launch.longitude
            )));
        }
        if !launch.altitude.is_finite() || launch.altitude <= -PLANET_RADIUS {
            return Err(SimulationError::ConfigurationError(format!(
                "launch altitude {} is not a valid height",
                launch.altitude
            )));
        }

        self.forecast.validate()
    }
}

fn positive(name: &str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::ConfigurationError(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::ConfigurationError(format!(
            "{} must not be negative, got {}",
            name, value
        )))
    }
}
