pub mod atmosphere;
pub mod balloon;
pub mod flight;
pub mod launch_config;
pub mod weather;
