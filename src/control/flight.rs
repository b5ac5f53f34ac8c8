use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::control::atmosphere::{Atmosphere, AtmosphericSample, StandardAtmosphere};
use crate::control::balloon::BalloonProperties;
use crate::control::launch_config::LaunchConfig;
use crate::control::weather::WeatherProvider;
use crate::errors::SimulationError;
use crate::telemetry_system::telemetry::{FlightObserver, RunSummary, TrajectoryRecord};
use crate::trajectory_system::{
    aerodynamics::ForceModel, integrator::rk4_step, kinematics::FlightState,
};
use crate::utils::{coordinates::local_to_cartesian, vector3d::Vector3D};

/// Flight phase. Transitions only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Ascending,
    Descending,
    Landed,
}

/// Balloon and phase after one step, given the air at the new position.
///
/// While ascending the envelope follows the ideal-gas volume until it reaches
/// its limit, at which point it bursts. Other phases leave the balloon as is.
pub fn balloon_transition(
    balloon: &BalloonProperties,
    phase: Phase,
    atmosphere: &AtmosphericSample,
    parachute_area: f64,
) -> (BalloonProperties, Phase) {
    match phase {
        Phase::Ascending if balloon.reaches_volume_limit(atmosphere) => {
            (balloon.burst(parachute_area), Phase::Descending)
        }
        Phase::Ascending => (balloon.expanded(atmosphere), Phase::Ascending),
        Phase::Descending | Phase::Landed => (*balloon, phase),
    }
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub records: Vec<TrajectoryRecord>,
    /// `false` when the duration ran out before touchdown.
    pub landed: bool,
    pub burst_time: Option<f64>,
}

impl SimulationOutcome {
    pub fn summary(&self) -> Option<RunSummary> {
        RunSummary::from_records(&self.records)
    }
}

/// Fixed-step flight of one balloon from launch to landing.
///
/// The simulator owns the balloon and flight state for the whole run. Each
/// call to [`FlightSimulator::step`] produces exactly one record.
pub struct FlightSimulator<A: Atmosphere = StandardAtmosphere> {
    config: LaunchConfig,
    atmosphere: A,
    force_model: ForceModel,
    balloon: BalloonProperties,
    state: FlightState,
    phase: Phase,
    steps_taken: usize,
    burst_time: Option<f64>,
    records: Vec<TrajectoryRecord>,
}

impl FlightSimulator<StandardAtmosphere> {
    pub fn from_config(config: LaunchConfig) -> Result<Self, SimulationError> {
        FlightSimulator::new(config, StandardAtmosphere::new())
    }
}

impl<A: Atmosphere> FlightSimulator<A> {
    pub fn new(config: LaunchConfig, atmosphere: A) -> Result<Self, SimulationError> {
        config.validate()?;

        let balloon = BalloonProperties::initialize(
            config.gross_mass,
            config.lift_gas,
            config.max_volume,
            config.percent_lift_gas_scalar,
        )?;
        let state = FlightState::at_launch(&config.launch, config.ascent_rate);
        let force_model = ForceModel::new(config.gravity, config.buoyant_force_scalar);

        info!(
            "Prepared {:.2} kg {} balloon at ({:.4}, {:.4}), forecast {}",
            config.gross_mass,
            config.lift_gas,
            config.launch.latitude,
            config.launch.longitude,
            config.forecast.grib_filename()
        );

        Ok(FlightSimulator {
            records: Vec::new(),
            config,
            atmosphere,
            force_model,
            balloon,
            state,
            phase: Phase::Ascending,
            steps_taken: 0,
            burst_time: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &FlightState {
        &self.state
    }

    pub fn balloon(&self) -> &BalloonProperties {
        &self.balloon
    }

    pub fn records(&self) -> &[TrajectoryRecord] {
        &self.records
    }

    pub fn time(&self) -> f64 {
        self.steps_taken as f64 * self.config.time_step
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Landed
            || (!self.records.is_empty() && self.steps_taken >= self.config.max_steps())
    }

    /// Advances the flight by one record.
    ///
    /// The first call only records the launch state. Calling this after the
    /// run has finished does nothing.
    pub fn step(
        &mut self,
        weather: &dyn WeatherProvider,
        observer: &mut dyn FlightObserver,
    ) -> Result<(), SimulationError> {
        if self.is_finished() {
            return Ok(());
        }

        if self.records.is_empty() {
            let record = TrajectoryRecord::new(0.0, &self.state, &self.balloon, self.phase);
            observer.on_step(&record);
            self.records.push(record);
            return Ok(());
        }

        let here = self.state.geodetic();
        let conditions = weather.resolve(&self.config.forecast, here.latitude, here.longitude)?;
        let wind = local_to_cartesian(
            here.latitude,
            here.longitude,
            conditions.wind_u,
            conditions.wind_v,
            0.0,
        );

        let start = self.time();
        let integrated = rk4_step(self.state, start, self.config.time_step, |_, state| {
            self.derivative(state, wind)
        });
        self.steps_taken += 1;
        let time = self.time();

        if !integrated.is_finite() {
            warn!("Integration diverged at t={:.1}s", time);
            return Err(SimulationError::DivergenceError {
                time,
                reason: format!(
                    "non-finite state after step {} (position {:?}, velocity {:?})",
                    self.steps_taken, integrated.position, integrated.velocity
                ),
            });
        }

        let air = self.sample_air(&integrated, wind);
        let previous = self.phase;
        let (balloon, phase) =
            balloon_transition(&self.balloon, previous, &air, self.config.parachute_area);

        let mut state = integrated;
        let burst = previous == Phase::Ascending && phase == Phase::Descending;
        if burst {
            state = state.with_vertical_speed(-self.config.descent_rate_parachute);
            self.burst_time = Some(time);
        }

        let landed = state.altitude() <= 0.0;
        if landed {
            state = state.grounded();
        }

        self.balloon = balloon;
        self.state = state;
        self.phase = if landed { Phase::Landed } else { phase };

        let record = TrajectoryRecord::new(time, &self.state, &self.balloon, self.phase);
        if burst {
            observer.on_transition(Phase::Ascending, Phase::Descending, &record);
        }
        if landed {
            observer.on_transition(phase, Phase::Landed, &record);
        }
        observer.on_step(&record);
        self.records.push(record);

        Ok(())
    }

    /// Steps until landing or until the configured duration runs out.
    pub fn run(
        mut self,
        weather: &dyn WeatherProvider,
        observer: &mut dyn FlightObserver,
    ) -> Result<SimulationOutcome, SimulationError> {
        while !self.is_finished() {
            self.step(weather, observer)?;
        }
        Ok(self.into_outcome())
    }

    pub fn into_outcome(self) -> SimulationOutcome {
        let landed = self.phase == Phase::Landed;
        if landed {
            info!(
                "Landed after {:.0}s, {} records",
                self.time(),
                self.records.len()
            );
        } else {
            warn!(
                "Flight did not land within {:.0}s (phase {:?})",
                self.config.max_duration, self.phase
            );
        }

        SimulationOutcome {
            records: self.records,
            landed,
            burst_time: self.burst_time,
        }
    }

    fn sample_air(&self, state: &FlightState, wind: Vector3D) -> AtmosphericSample {
        let geodetic = state.geodetic();
        self.atmosphere.sample(
            geodetic.altitude.max(0.0),
            geodetic.latitude,
            geodetic.longitude,
            wind,
        )
    }

    /// Velocity and acceleration at `state`; only reads the simulator.
    fn derivative(&self, state: &FlightState, wind: Vector3D) -> FlightState {
        let air = self.sample_air(state, wind);

        let (balloon, drag_coefficient) = match self.phase {
            Phase::Ascending => (self.balloon.expanded(&air), self.config.drag_coefficient),
            Phase::Descending | Phase::Landed => {
                (self.balloon, self.config.parachute_drag_coefficient)
            }
        };

        let forces = self.force_model.forces(
            &balloon,
            &air,
            state.position,
            state.velocity,
            drag_coefficient,
        );

        FlightState::new(state.velocity, forces.total() / balloon.total_mass())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::launch_config::LiftGas;
    use crate::control::weather::CalmWeather;
    use approx::assert_relative_eq;

    fn test_balloon() -> BalloonProperties {
        BalloonProperties::initialize(2.0, LiftGas::Helium, 4.0, 15.0).unwrap()
    }

    fn air_at(altitude: f64) -> AtmosphericSample {
        StandardAtmosphere::new().sample(altitude, 0.0, 0.0, Vector3D::ZERO)
    }

    #[test]
    fn test_ascending_balloon_expands() {
        let balloon = test_balloon();
        let (next, phase) = balloon_transition(&balloon, Phase::Ascending, &air_at(3_000.0), 1.0);

        assert_eq!(phase, Phase::Ascending);
        assert!(next.volume > balloon.volume);
        assert!(next.volume < next.max_volume);
    }

    #[test]
    fn test_burst_at_volume_limit() {
        let balloon = test_balloon();
        let (next, phase) = balloon_transition(&balloon, Phase::Ascending, &air_at(20_000.0), 1.5);

        assert_eq!(phase, Phase::Descending);
        assert_eq!(next.lift_gas_mass, 0.0);
        assert_eq!(next.cross_sectional_area, 1.5);
    }

    #[test]
    fn test_descending_balloon_is_unchanged() {
        let burst = test_balloon().burst(1.0);
        let (next, phase) = balloon_transition(&burst, Phase::Descending, &air_at(30_000.0), 1.0);

        assert_eq!(phase, Phase::Descending);
        assert_eq!(next, burst);
    }

    #[test]
    fn test_landed_is_terminal() {
        let burst = test_balloon().burst(1.0);
        let (_, phase) = balloon_transition(&burst, Phase::Landed, &air_at(0.0), 1.0);
        assert_eq!(phase, Phase::Landed);
    }

    #[test]
    fn test_first_step_records_launch() {
        let mut simulator = FlightSimulator::from_config(LaunchConfig::default()).unwrap();
        simulator.step(&CalmWeather, &mut ()).unwrap();

        let launch = simulator.records()[0];
        assert_eq!(simulator.records().len(), 1);
        assert_eq!(launch.time, 0.0);
        assert_eq!(launch.phase, Phase::Ascending);
        assert_relative_eq!(launch.altitude, 1.0, epsilon = 1e-6);
        assert_relative_eq!(launch.vertical_speed, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_step_after_landing_is_a_no_op() {
        let mut simulator = FlightSimulator::from_config(LaunchConfig::default()).unwrap();
        while !simulator.is_finished() {
            simulator.step(&CalmWeather, &mut ()).unwrap();
        }
        let count = simulator.records().len();

        simulator.step(&CalmWeather, &mut ()).unwrap();
        assert_eq!(simulator.records().len(), count);
        assert_eq!(simulator.phase(), Phase::Landed);
    }

    #[test]
    fn test_very_long_duration_does_not_reserve_records() {
        let config = LaunchConfig {
            max_duration: 1e19,
            ..LaunchConfig::default()
        };
        let mut simulator = FlightSimulator::from_config(config).unwrap();
        for _ in 0..3 {
            simulator.step(&CalmWeather, &mut ()).unwrap();
        }
        assert_eq!(simulator.records().len(), 3);
        assert_eq!(simulator.phase(), Phase::Landed);
    }

    #[test]
    fn test_ascent_accelerates_upward_at_launch() {
        let config = LaunchConfig {
            gross_mass: 2.0,
            max_volume: 4.0,
            ascent_rate: 0.0,
            ..LaunchConfig::default()
        };
        let simulator = FlightSimulator::from_config(config).unwrap();
        let state = *simulator.state();

        let derivative = simulator.derivative(&state, Vector3D::ZERO);
        let up = crate::utils::coordinates::local_up(&state.position);
        assert!(derivative.velocity.dot(&up) > 0.0);
        assert_eq!(derivative.position, state.velocity);
    }
}
