//! Configuration loading and dependency wiring.

mod dependencies;
mod env_settings;

pub use dependencies::Dependencies;
pub use env_settings::EnvSettings;
