// Physical Constants
pub const GRAVITY: f64 = 9.80665; // m/s²
pub const PLANET_RADIUS: f64 = 6_371_009.0; // meters (mean Earth radius)
pub const UNIVERSAL_GAS_CONSTANT: f64 = 8.3144621; // J/(mol·K)

// Atmosphere Constants
pub const AIR_SPECIFIC_GAS_CONSTANT: f64 = 287.05; // J/(kg·K)
pub const SEA_LEVEL_TEMPERATURE: f64 = 288.15; // K
pub const SEA_LEVEL_PRESSURE: f64 = 101_325.0; // Pa
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.225; // kg/m³
pub const TROPOSPHERE_TEMP_GRADIENT: f64 = -6.5 / 1_000.0; // K per meter
pub const TROPOSPHERE_HEIGHT: f64 = 11_000.0; // m
pub const TROPOPAUSE_TEMPERATURE: f64 = 216.65; // K
pub const LOWER_STRATOSPHERE_TOP: f64 = 25_000.0; // m
pub const UPPER_STRATOSPHERE_TEMP_GRADIENT: f64 = 2.99 / 1_000.0; // K per meter

// Lift Gas Constants
pub const HELIUM_MOLAR_MASS: f64 = 4.0026e-3; // kg/mol
pub const HYDROGEN_MOLAR_MASS: f64 = 2.01588e-3; // kg/mol

// Launch reference conditions used to fill the envelope
pub const LAUNCH_REFERENCE_TEMPERATURE: f64 = 288.15; // K
pub const LAUNCH_REFERENCE_PRESSURE: f64 = 101_325.0; // Pa

// Simulation Parameters
pub const TIME_STEP: f64 = 1.0; // s
pub const MAX_SIMULATION_TIME: f64 = 43_200.0; // s
pub const MAX_FORECAST_HOUR: u16 = 384; // h (GFS horizon)
