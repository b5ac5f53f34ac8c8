//! Weather provider boundary.
//!
//! Gridded forecast retrieval and decoding live outside the engine. The
//! simulator only sees the [`WeatherProvider`] trait, resolved once per step
//! at the balloon's current ground position.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_FORECAST_HOUR, SEA_LEVEL_PRESSURE, SEA_LEVEL_TEMPERATURE};
use crate::errors::SimulationError;

/// One model run and lead time of a gridded forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastCycle {
    pub date: NaiveDate,
    pub cycle: u8,          // model run hour, UTC
    pub forecast_hour: u16, // hours after the run
}

impl ForecastCycle {
    pub fn new(date: NaiveDate, cycle: u8, forecast_hour: u16) -> Result<Self, SimulationError> {
        let forecast = ForecastCycle {
            date,
            cycle,
            forecast_hour,
        };
        forecast.validate()?;
        Ok(forecast)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !matches!(self.cycle, 0 | 6 | 12 | 18) {
            return Err(SimulationError::ConfigurationError(format!(
                "forecast cycle must be 00, 06, 12 or 18, got {:02}",
                self.cycle
            )));
        }
        if self.forecast_hour > MAX_FORECAST_HOUR {
            return Err(SimulationError::ConfigurationError(format!(
                "forecast hour {} is beyond the {} h horizon",
                self.forecast_hour, MAX_FORECAST_HOUR
            )));
        }
        Ok(())
    }

    /// UTC time the forecast is valid for.
    pub fn valid_time(&self) -> NaiveDateTime {
        self.date.and_hms_opt(0, 0, 0).unwrap_or_default()
            + Duration::hours(i64::from(self.cycle) + i64::from(self.forecast_hour))
    }

    /// Name of the GFS 0.25° file holding this cycle, e.g. `gfs.t12z.pgrb2.0p25.f024`.
    pub fn grib_filename(&self) -> String {
        format!(
            "gfs.t{:02}z.pgrb2.0p25.f{:03}",
            self.cycle, self.forecast_hour
        )
    }
}

impl Default for ForecastCycle {
    fn default() -> Self {
        ForecastCycle {
            date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap_or_default(),
            cycle: 12,
            forecast_hour: 24,
        }
    }
}

/// Forecast values at one grid point.
///
/// Only the wind reaches the force model. Temperature and pressure are kept
/// for reporting; air properties come from the simulator's [`Atmosphere`].
///
/// [`Atmosphere`]: crate::control::atmosphere::Atmosphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSample {
    pub temperature: f64, // K
    pub pressure: f64,    // Pa
    pub wind_u: f64,      // m/s, positive east
    pub wind_v: f64,      // m/s, positive north
}

impl WeatherSample {
    pub fn calm() -> Self {
        WeatherSample {
            temperature: SEA_LEVEL_TEMPERATURE,
            pressure: SEA_LEVEL_PRESSURE,
            wind_u: 0.0,
            wind_v: 0.0,
        }
    }
}

pub trait WeatherProvider {
    /// Looks up the forecast at one ground position.
    ///
    /// Fails with [`SimulationError::DataUnavailableError`] when the cycle or
    /// point is not covered. Callers do not retry.
    fn resolve(
        &self,
        forecast: &ForecastCycle,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSample, SimulationError>;
}

/// No wind anywhere, standard sea-level temperature and pressure.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalmWeather;

impl WeatherProvider for CalmWeather {
    fn resolve(
        &self,
        _forecast: &ForecastCycle,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<WeatherSample, SimulationError> {
        Ok(WeatherSample::calm())
    }
}

/// The same horizontal wind everywhere.
#[derive(Debug, Clone, Copy)]
pub struct UniformWind {
    pub wind_u: f64,
    pub wind_v: f64,
}

impl UniformWind {
    pub fn new(wind_u: f64, wind_v: f64) -> Self {
        UniformWind { wind_u, wind_v }
    }
}

impl WeatherProvider for UniformWind {
    fn resolve(
        &self,
        _forecast: &ForecastCycle,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<WeatherSample, SimulationError> {
        Ok(WeatherSample {
            wind_u: self.wind_u,
            wind_v: self.wind_v,
            ..WeatherSample::calm()
        })
    }
}

/// Regular latitude/longitude grid for a single forecast cycle.
///
/// Nodes are stored row-major, rows running north from `origin_latitude`
/// and columns east from `origin_longitude`. Values between nodes are
/// bilinearly interpolated.
#[derive(Debug, Clone)]
pub struct GriddedWeather {
    forecast: ForecastCycle,
    origin_latitude: f64,
    origin_longitude: f64,
    spacing: f64,
    rows: usize,
    columns: usize,
    nodes: Vec<WeatherSample>,
}

impl GriddedWeather {
    pub fn new(
        forecast: ForecastCycle,
        origin_latitude: f64,
        origin_longitude: f64,
        spacing: f64,
        columns: usize,
        nodes: Vec<WeatherSample>,
    ) -> Result<Self, SimulationError> {
        if !(spacing > 0.0) {
            return Err(SimulationError::ConfigurationError(format!(
                "grid spacing must be positive, got {}",
                spacing
            )));
        }
        if columns < 2 || nodes.len() % columns != 0 || nodes.len() / columns < 2 {
            return Err(SimulationError::ConfigurationError(format!(
                "grid of {} nodes cannot be split into rows of {} with at least 2x2 nodes",
                nodes.len(),
                columns
            )));
        }

        Ok(GriddedWeather {
            forecast,
            origin_latitude,
            origin_longitude,
            spacing,
            rows: nodes.len() / columns,
            columns,
            nodes,
        })
    }

    fn node(&self, row: usize, column: usize) -> &WeatherSample {
        &self.nodes[row * self.columns + column]
    }

    /// Cell index and fractional offset along one axis, if inside the grid.
    fn locate(offset: f64, spacing: f64, count: usize) -> Option<(usize, f64)> {
        let position = offset / spacing;
        let last = (count - 1) as f64;
        if !(0.0..=last).contains(&position) {
            return None;
        }
        let index = (position.floor() as usize).min(count - 2);
        Some((index, position - index as f64))
    }
}

impl WeatherProvider for GriddedWeather {
    fn resolve(
        &self,
        forecast: &ForecastCycle,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSample, SimulationError> {
        if *forecast != self.forecast {
            return Err(SimulationError::DataUnavailableError(format!(
                "no grid loaded for {} (have {})",
                forecast.grib_filename(),
                self.forecast.grib_filename()
            )));
        }

        let out_of_range = || {
            SimulationError::DataUnavailableError(format!(
                "point ({:.4}, {:.4}) is outside the forecast grid",
                latitude, longitude
            ))
        };

        let (row, fy) = Self::locate(latitude - self.origin_latitude, self.spacing, self.rows)
            .ok_or_else(out_of_range)?;
        let (column, fx) =
            Self::locate(longitude - self.origin_longitude, self.spacing, self.columns)
                .ok_or_else(out_of_range)?;

        let sw = self.node(row, column);
        let se = self.node(row, column + 1);
        let nw = self.node(row + 1, column);
        let ne = self.node(row + 1, column + 1);

        let blend = |field: fn(&WeatherSample) -> f64| {
            let south = field(sw) * (1.0 - fx) + field(se) * fx;
            let north = field(nw) * (1.0 - fx) + field(ne) * fx;
            south * (1.0 - fy) + north * fy
        };

        Ok(WeatherSample {
            temperature: blend(|s| s.temperature),
            pressure: blend(|s| s.pressure),
            wind_u: blend(|s| s.wind_u),
            wind_v: blend(|s| s.wind_v),
        })
    }
}
