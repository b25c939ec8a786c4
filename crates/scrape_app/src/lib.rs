//! Command-line front end for the scrape job service.
pub mod cli;
pub mod commands;
pub mod config;
pub mod views;

pub use cli::{Cli, Command};
pub use commands::App;
pub use config::{load_config, save_config, ClientConfig, ConfigError, CONFIG_FILENAME};
