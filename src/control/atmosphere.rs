use crate::constants::{
    AIR_SPECIFIC_GAS_CONSTANT, GRAVITY, LOWER_STRATOSPHERE_TOP, SEA_LEVEL_PRESSURE,
    SEA_LEVEL_TEMPERATURE, TROPOPAUSE_TEMPERATURE, TROPOSPHERE_HEIGHT,
    TROPOSPHERE_TEMP_GRADIENT, UPPER_STRATOSPHERE_TEMP_GRADIENT,
};
use crate::utils::vector3d::Vector3D;

/// Air state at one point of the flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphericSample {
    pub pressure: f64,    // Pa
    pub temperature: f64, // K
    pub density: f64,     // kg/m³
    pub wind: Vector3D,   // m/s, Cartesian frame
}

/// Source of air properties for the force model.
///
/// Implementations must be pure functions of their inputs: the integrator
/// evaluates them several times per step and expects identical answers.
pub trait Atmosphere {
    fn sample(&self, altitude: f64, latitude: f64, longitude: f64, wind: Vector3D)
        -> AtmosphericSample;
}

/// Three-band standard atmosphere keyed on altitude only.
///
/// Bands: troposphere below 11 km with the standard lapse rate, an isothermal
/// layer up to 25 km, and a warming layer above it. Pressure is continuous
/// across band edges, and 0 m gives exactly the launch reference conditions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAtmosphere;

impl StandardAtmosphere {
    pub fn new() -> Self {
        StandardAtmosphere
    }

    pub fn temperature_and_pressure(&self, altitude: f64) -> (f64, f64) {
        if altitude < TROPOSPHERE_HEIGHT {
            Self::troposphere(altitude)
        } else if altitude < LOWER_STRATOSPHERE_TOP {
            Self::lower_stratosphere(altitude)
        } else {
            let (base_temperature, base_pressure) =
                Self::lower_stratosphere(LOWER_STRATOSPHERE_TOP);
            let temperature = base_temperature
                + UPPER_STRATOSPHERE_TEMP_GRADIENT * (altitude - LOWER_STRATOSPHERE_TOP);
            let exponent = -GRAVITY / (UPPER_STRATOSPHERE_TEMP_GRADIENT * AIR_SPECIFIC_GAS_CONSTANT);
            let pressure = base_pressure * (temperature / base_temperature).powf(exponent);
            (temperature, pressure)
        }
    }

    fn troposphere(altitude: f64) -> (f64, f64) {
        let temperature = SEA_LEVEL_TEMPERATURE + TROPOSPHERE_TEMP_GRADIENT * altitude;
        let exponent = -GRAVITY / (TROPOSPHERE_TEMP_GRADIENT * AIR_SPECIFIC_GAS_CONSTANT);
        let pressure = SEA_LEVEL_PRESSURE * (temperature / SEA_LEVEL_TEMPERATURE).powf(exponent);
        (temperature, pressure)
    }

    fn lower_stratosphere(altitude: f64) -> (f64, f64) {
        let (_, base_pressure) = Self::troposphere(TROPOSPHERE_HEIGHT);
        let scale = GRAVITY / (AIR_SPECIFIC_GAS_CONSTANT * TROPOPAUSE_TEMPERATURE);
        let pressure = base_pressure * (-scale * (altitude - TROPOSPHERE_HEIGHT)).exp();
        (TROPOPAUSE_TEMPERATURE, pressure)
    }
}

impl Atmosphere for StandardAtmosphere {
    fn sample(
        &self,
        altitude: f64,
        _latitude: f64,
        _longitude: f64,
        wind: Vector3D,
    ) -> AtmosphericSample {
        let (temperature, pressure) = self.temperature_and_pressure(altitude);

        let density = if pressure > 0.0 && temperature > 0.0 {
            pressure / (AIR_SPECIFIC_GAS_CONSTANT * temperature)
        } else {
            0.0
        };

        AtmosphericSample {
            pressure,
            temperature,
            density,
            wind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn sample_at(altitude: f64) -> AtmosphericSample {
        StandardAtmosphere::new().sample(altitude, 0.0, 0.0, Vector3D::ZERO)
    }

    #[test]
    fn test_sea_level_conditions() {
        let sample = sample_at(0.0);
        assert_relative_eq!(sample.temperature, 288.15);
        assert_relative_eq!(sample.pressure, 101_325.0);
        assert_abs_diff_eq!(sample.density, 1.225, epsilon = 1e-3);
    }

    #[test]
    fn test_tropopause_conditions() {
        let sample = sample_at(11_000.0);
        assert_abs_diff_eq!(sample.temperature, 216.65, epsilon = 0.01);
        assert_abs_diff_eq!(sample.pressure, 22_632.0, epsilon = 10.0);
        assert_abs_diff_eq!(sample.density, 0.3639, epsilon = 0.001);
    }

    #[test]
    fn test_pressure_is_continuous_across_bands() {
        for &edge in &[TROPOSPHERE_HEIGHT, LOWER_STRATOSPHERE_TOP] {
            let below = sample_at(edge - 1e-6);
            let above = sample_at(edge);
            assert_relative_eq!(below.pressure, above.pressure, max_relative = 1e-6);
            assert_abs_diff_eq!(below.temperature, above.temperature, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_upper_band_warms_with_altitude() {
        let low = sample_at(26_000.0);
        let high = sample_at(35_000.0);
        assert!(high.temperature > low.temperature);
        assert!(high.pressure < low.pressure);
        assert_abs_diff_eq!(
            high.temperature - low.temperature,
            9_000.0 * UPPER_STRATOSPHERE_TEMP_GRADIENT,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_density_strictly_decreases_with_altitude() {
        let mut previous = sample_at(0.0).density;
        let mut altitude = 250.0;
        while altitude <= 45_000.0 {
            let density = sample_at(altitude).density;
            assert!(
                density < previous,
                "density should fall with altitude, rose at {} m",
                altitude
            );
            previous = density;
            altitude += 250.0;
        }
    }

    #[test]
    fn test_wind_is_passed_through() {
        let wind = Vector3D::new(3.0, -4.0, 0.5);
        let sample = StandardAtmosphere::new().sample(5_000.0, 10.0, 20.0, wind);
        assert_eq!(sample.wind, wind);
    }

    #[test]
    fn test_negative_altitude_is_defined() {
        let sample = sample_at(-100.0);
        assert!(sample.pressure > 101_325.0);
        assert!(sample.density.is_finite());
    }
}
