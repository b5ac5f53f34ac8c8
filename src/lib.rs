pub mod constants;
pub mod control;
pub mod errors;
pub mod logger;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;

pub use constants::*;
pub use control::atmosphere::{Atmosphere, AtmosphericSample, StandardAtmosphere};
pub use control::balloon::BalloonProperties;
pub use control::flight::{balloon_transition, FlightSimulator, Phase, SimulationOutcome};
pub use control::launch_config::{LaunchConfig, LiftGas};
pub use control::weather::{
    CalmWeather, ForecastCycle, GriddedWeather, UniformWind, WeatherProvider, WeatherSample,
};
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::aerodynamics::{ForceModel, Forces, GravityModel};
pub use trajectory_system::integrator::rk4_step;
pub use trajectory_system::kinematics::FlightState;

// Re-export commonly used items from telemetry_system
pub use telemetry_system::telemetry::{
    FlightObserver, LogObserver, RunSummary, Telemetry, TrajectoryRecord,
};

// Re-export commonly used utilities
pub use utils::coordinates::{to_cartesian, to_geodetic, GeodeticPosition};
pub use utils::vector3d::Vector3D;
