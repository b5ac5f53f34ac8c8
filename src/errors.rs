use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Weather data unavailable: {0}")]
    DataUnavailableError(String),

    #[error("Numerical divergence at t={time:.1}s: {reason}")]
    DivergenceError { time: f64, reason: String },

    #[error("Configuration file error: {0}")]
    ConfigFileError(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Logger error: {0}")]
    LoggerError(String),
}
