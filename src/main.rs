use balloon_simulation::*;
use log::{error, info};

/// Environment variable naming an optional YAML launch configuration.
const CONFIG_VAR: &str = "HAB_SIM_CONFIG";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init()?;

    let config = match std::env::var(CONFIG_VAR) {
        Ok(path) => {
            info!("Loading launch configuration from {}", path);
            LaunchConfig::from_yaml_file(&path)?
        }
        Err(_) => LaunchConfig::default(),
    };

    let simulator = FlightSimulator::from_config(config)?;
    let mut observers = (LogObserver::default(), Telemetry::new());

    let outcome = match simulator.run(&CalmWeather, &mut observers) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Simulation failed: {}", e);
            return Err(e.into());
        }
    };

    println!("{}", observers.1.report());

    if let Some(summary) = outcome.summary() {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
