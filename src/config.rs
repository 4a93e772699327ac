use std::{
    fs::File,
    io::{Read, Write},
    path::PathBuf,
};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::{episode::Policy, error::EnvError};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to config file. Overrides the built-in defaults.
    #[arg(long, value_name = "path")]
    pub with_config: Option<PathBuf>,
    /// Seed for random number generator. Episode i uses seed + i.
    #[arg(long, value_name = "u64")]
    pub seed: Option<u64>,
    /// Generate log file
    #[arg(long)]
    pub log: bool,
    /// Path where log files will be saved to
    #[arg(long, value_name = "path")]
    pub log_path: Option<PathBuf>,
    /// Number of episodes to run
    #[arg(long, value_name = "u32", default_value_t = 1)]
    pub episodes: u32,
    /// Baseline policy driving the base stations
    #[arg(long, value_enum, default_value = "all-on")]
    pub policy: Policy,
    /// Save default config
    #[arg(long, value_name = "path")]
    pub save_default_config: Option<PathBuf>,
    /// Show partial results from all episodes
    #[arg(long)]
    pub show_partial_results: bool,
    /// Print results as CSV instead of the table report
    #[arg(long)]
    pub csv: bool,
}

impl Cli {
    pub fn create_config(&self) -> Result<Config, EnvError> {
        if let Some(file_path) = &self.with_config {
            let mut file = File::open(file_path).map_err(|_| {
                EnvError::InvalidConfiguration(format!(
                    "cannot open file: {}",
                    file_path.display()
                ))
            })?;
            let mut data = String::new();
            file.read_to_string(&mut data).map_err(|_| {
                EnvError::InvalidConfiguration(format!(
                    "cannot read file: {}",
                    file_path.display()
                ))
            })?;
            toml::from_str::<Config>(&data)
                .map_err(|e| EnvError::InvalidConfiguration(e.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn validate(self) -> Result<Cli, EnvError> {
        if self.episodes == 0 {
            return Err(EnvError::InvalidConfiguration(
                "episodes must be greater than 0".to_owned(),
            ));
        }
        if let Some(path) = &self.with_config {
            if !path.exists() {
                return Err(EnvError::InvalidConfiguration(format!(
                    "given path to config file: '{}' does not exist",
                    path.display()
                )));
            }
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: f64,  // service area [m]
    pub height: f64, // service area [m]
    pub stations_count: usize,
    pub users_count: usize,
    pub max_steps: u32, // episode horizon
    pub power_consumption_watts: f64,
    pub max_transmit_power: f64,
    pub min_signal_threshold: f64,
    pub power_cost_weight: f64,
    pub drop_penalty: f64,
    pub connect_reward: f64,
    pub idle_off_bonus: f64,
    pub log_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 10000.0,
            height: 10000.0,
            stations_count: 3,
            users_count: 10,
            max_steps: 100,
            power_consumption_watts: 500.0,
            max_transmit_power: 40.0,
            min_signal_threshold: 1e-5,
            power_cost_weight: 0.01,
            drop_penalty: 100.0,
            connect_reward: 1.0,
            idle_off_bonus: 25.0,
            log_buffer: 1000,
        }
    }
}

impl Config {
    pub fn validate(self) -> Result<Config, EnvError> {
        if self.width <= 0.0 {
            return Err(EnvError::InvalidConfiguration(
                "width must be greater than 0".to_owned(),
            ));
        }
        if self.height <= 0.0 {
            return Err(EnvError::InvalidConfiguration(
                "height must be greater than 0".to_owned(),
            ));
        }
        if self.stations_count == 0 {
            return Err(EnvError::InvalidConfiguration(
                "stations_count must be greater than 0".to_owned(),
            ));
        }
        if self.users_count == 0 {
            return Err(EnvError::InvalidConfiguration(
                "users_count must be greater than 0".to_owned(),
            ));
        }
        if self.max_steps == 0 {
            return Err(EnvError::InvalidConfiguration(
                "max_steps must be greater than 0".to_owned(),
            ));
        }
        if self.power_consumption_watts <= 0.0 {
            return Err(EnvError::InvalidConfiguration(
                "power_consumption_watts must be greater than 0".to_owned(),
            ));
        }
        if self.max_transmit_power <= 0.0 {
            return Err(EnvError::InvalidConfiguration(
                "max_transmit_power must be greater than 0".to_owned(),
            ));
        }
        if self.min_signal_threshold < 0.0 {
            return Err(EnvError::InvalidConfiguration(
                "min_signal_threshold must not be negative".to_owned(),
            ));
        }
        Ok(self)
    }

    pub fn save_default(path: PathBuf) -> std::io::Result<()> {
        let cfg = Config::default();
        let cfg_str =
            toml::to_string(&cfg).expect("Internal error: Couldn't parse default config to toml.");
        let mut file = File::create(&path)?;
        file.write_all(cfg_str.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Config;
    use crate::error::EnvError;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let checks: [fn(&mut Config); 5] = [
            |c| c.width = 0.0,
            |c| c.height = -1.0,
            |c| c.stations_count = 0,
            |c| c.users_count = 0,
            |c| c.max_steps = 0,
        ];
        for break_cfg in checks {
            let mut cfg = Config::default();
            break_cfg(&mut cfg);
            let res = cfg.validate();
            assert!(std::matches!(res, Err(EnvError::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn toml_round_trip() {
        let cfg = Config::default();
        let text = toml::to_string(&cfg).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.stations_count, cfg.stations_count);
        assert_eq!(parsed.max_steps, cfg.max_steps);
        assert_eq!(parsed.min_signal_threshold, cfg.min_signal_threshold);
    }
}
