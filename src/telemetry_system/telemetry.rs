use log::{debug, info};
use serde::Serialize;

use crate::control::balloon::BalloonProperties;
use crate::control::flight::Phase;
use crate::trajectory_system::kinematics::FlightState;
use crate::utils::coordinates::{surface_distance, GeodeticPosition};

/// One retained time step of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryRecord {
    pub time: f64, // s since launch
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub velocity_z: f64,
    pub vertical_speed: f64,
    pub volume: f64,
    pub phase: Phase,
}

impl TrajectoryRecord {
    pub fn new(time: f64, state: &FlightState, balloon: &BalloonProperties, phase: Phase) -> Self {
        let geodetic = state.geodetic();
        TrajectoryRecord {
            time,
            latitude: geodetic.latitude,
            longitude: geodetic.longitude,
            altitude: geodetic.altitude,
            velocity_x: state.velocity.x,
            velocity_y: state.velocity.y,
            velocity_z: state.velocity.z,
            vertical_speed: state.vertical_speed(),
            volume: balloon.volume,
            phase,
        }
    }

    pub fn geodetic(&self) -> GeodeticPosition {
        GeodeticPosition::new(self.latitude, self.longitude, self.altitude)
    }

    pub fn speed(&self) -> f64 {
        (self.velocity_x.powi(2) + self.velocity_y.powi(2) + self.velocity_z.powi(2)).sqrt()
    }
}

/// Reductions over a finished trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_time: f64,
    pub max_altitude: f64,
    pub max_altitude_time: f64,
    /// First record under the parachute. A burst on the landing step itself
    /// shows up only in [`crate::control::flight::SimulationOutcome::burst_time`].
    pub burst_time: Option<f64>,
    pub landing_time: Option<f64>,
    pub final_latitude: f64,
    pub final_longitude: f64,
    pub downrange_distance: f64, // m along the surface from launch
}

impl RunSummary {
    pub fn from_records(records: &[TrajectoryRecord]) -> Option<Self> {
        let first = records.first()?;
        let last = records.last()?;

        let peak = records
            .iter()
            .max_by(|a, b| a.altitude.total_cmp(&b.altitude))?;

        Some(RunSummary {
            total_time: last.time - first.time,
            max_altitude: peak.altitude,
            max_altitude_time: peak.time,
            burst_time: records
                .iter()
                .find(|record| record.phase == Phase::Descending)
                .map(|record| record.time),
            landing_time: (last.phase == Phase::Landed).then_some(last.time),
            final_latitude: last.latitude,
            final_longitude: last.longitude,
            downrange_distance: surface_distance(&first.geodetic(), &last.geodetic()),
        })
    }
}

/// Receives every record and phase change as the flight is simulated.
pub trait FlightObserver {
    fn on_step(&mut self, _record: &TrajectoryRecord) {}

    fn on_transition(&mut self, _from: Phase, _to: Phase, _record: &TrajectoryRecord) {}
}

impl FlightObserver for () {}

impl<A: FlightObserver, B: FlightObserver> FlightObserver for (A, B) {
    fn on_step(&mut self, record: &TrajectoryRecord) {
        self.0.on_step(record);
        self.1.on_step(record);
    }

    fn on_transition(&mut self, from: Phase, to: Phase, record: &TrajectoryRecord) {
        self.0.on_transition(from, to, record);
        self.1.on_transition(from, to, record);
    }
}

/// Forwards flight progress to the `log` facade.
pub struct LogObserver {
    every: usize,
    seen: usize,
}

impl LogObserver {
    /// Logs one step in `every` at debug level; transitions are always logged.
    pub fn new(every: usize) -> Self {
        LogObserver {
            every: every.max(1),
            seen: 0,
        }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        LogObserver::new(60)
    }
}

impl FlightObserver for LogObserver {
    fn on_step(&mut self, record: &TrajectoryRecord) {
        if self.seen % self.every == 0 {
            debug!(
                "t={} | {:?} | Alt: {} | Vz: {:.2} m/s | Pos: {:.5}, {:.5}",
                Telemetry::format_time(record.time),
                record.phase,
                Telemetry::format_altitude(record.altitude),
                record.vertical_speed,
                record.latitude,
                record.longitude
            );
        }
        self.seen += 1;
    }

    fn on_transition(&mut self, from: Phase, to: Phase, record: &TrajectoryRecord) {
        info!(
            "{:?} -> {:?} at {} ({}, {:.5}, {:.5})",
            from,
            to,
            Telemetry::format_time(record.time),
            Telemetry::format_altitude(record.altitude),
            record.latitude,
            record.longitude
        );
    }
}

/// Collects flight extremes and phase timings for a human-readable report.
pub struct Telemetry {
    max_speed: f64,
    max_altitude: f64,
    max_vertical_speed: f64,
    min_vertical_speed: f64,
    phase_times: Vec<(Phase, f64)>,
    simulation_time: f64,
    steps: usize,
}

impl Default for Telemetry {
    fn default() -> Self {
        Telemetry::new()
    }
}

impl Telemetry {
    pub fn new() -> Self {
        Telemetry {
            max_speed: 0.0,
            max_altitude: f64::MIN,
            max_vertical_speed: f64::MIN,
            min_vertical_speed: f64::MAX,
            phase_times: Vec::new(),
            simulation_time: 0.0,
            steps: 0,
        }
    }

    pub fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 3600.0 {
            let hours = (elapsed_time / 3600.0).floor();
            let minutes = ((elapsed_time % 3600.0) / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}h {:.0}m {:.2}s", hours, minutes, seconds)
        } else if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    pub fn format_altitude(altitude: f64) -> String {
        if altitude >= 1000.0 {
            format!("{:.2} km", altitude / 1000.0)
        } else {
            format!("{:.2} m", altitude)
        }
    }

    pub fn phase_times(&self) -> &[(Phase, f64)] {
        &self.phase_times
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn max_altitude(&self) -> f64 {
        self.max_altitude
    }

    pub fn report(&self) -> String {
        let mut lines = vec![
            "--- Flight Summary ---".to_string(),
            format!("Steps: {}", self.steps),
            format!("Simulated time: {}", Self::format_time(self.simulation_time)),
            format!("Max Altitude: {}", Self::format_altitude(self.max_altitude)),
            format!("Max Speed: {:.2} m/s", self.max_speed),
            format!(
                "Vertical speed range: {:.2} to {:.2} m/s",
                self.min_vertical_speed, self.max_vertical_speed
            ),
            "--- Phases ---".to_string(),
        ];
        for (phase, time) in &self.phase_times {
            lines.push(format!("{:?} from {}", phase, Self::format_time(*time)));
        }
        lines.join("\n")
    }
}

impl FlightObserver for Telemetry {
    fn on_step(&mut self, record: &TrajectoryRecord) {
        self.steps += 1;
        self.simulation_time = record.time;
        self.max_speed = self.max_speed.max(record.speed());
        self.max_altitude = self.max_altitude.max(record.altitude);
        self.max_vertical_speed = self.max_vertical_speed.max(record.vertical_speed);
        self.min_vertical_speed = self.min_vertical_speed.min(record.vertical_speed);

        if self.phase_times.is_empty() {
            self.phase_times.push((record.phase, record.time));
        }
    }

    fn on_transition(&mut self, _from: Phase, to: Phase, record: &TrajectoryRecord) {
        self.phase_times.push((to, record.time));
    }
}
