use std::iter::zip;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::basestation::BaseStation;
use crate::config::Config;
use crate::connectivity;
use crate::error::EnvError;
use crate::logger::Logger;
use crate::reward::compute_reward;
use crate::topology;
use crate::user::UserEquipment;

/// Per-station observation row: [is_on as 0/1, users_connected].
/// Row index matches station creation order and action index.
pub type Observation = Vec<[f64; 2]>;

/// Diagnostics exposed alongside every observation. Advisory only: the
/// environment itself never reads these for reward or termination.
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    pub total_power_consumption: f64,
    pub users_connected: usize,
    pub users_dropped: usize,
}

/// Everything a single `step` produces. `truncated` is always false here;
/// there is no external time-limit wrapper in this design.
#[derive(Debug)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

/// A simulated Radio Access Network for training on/off power-control
/// policies. Owns all mutable state: stations, users, step counter, rng.
///
/// Lifecycle: construct, `reset` (fresh random user field, all stations
/// on), then `step` with one on/off bit per station until `terminated`.
/// Single-threaded; one episode owns the state exclusively.
pub struct RanEnvironment {
    cfg: Config,
    stations: Vec<BaseStation>,
    users: Vec<UserEquipment>,
    current_step: u32,
    users_dropped: usize,
    rng: StdRng,
    logger: Logger,
}

impl RanEnvironment {
    pub fn new(cfg: Config) -> Result<RanEnvironment, EnvError> {
        RanEnvironment::with_logger(cfg, Logger::disabled())
    }

    pub fn with_logger(cfg: Config, logger: Logger) -> Result<RanEnvironment, EnvError> {
        let cfg = cfg.validate()?;
        let stations = topology::create_base_stations(&cfg);
        Ok(RanEnvironment {
            cfg,
            stations,
            users: Vec::new(),
            current_step: 0,
            users_dropped: 0,
            rng: StdRng::from_entropy(),
            logger,
        })
    }

    pub fn stations(&self) -> &[BaseStation] {
        &self.stations
    }

    /// Begins a new episode: redraws the user field (reseeding the rng
    /// when a seed is given), powers every station on, zeroes the step
    /// counter and runs one connectivity pass so the initial observation
    /// reflects real assignments. Always succeeds.
    pub fn reset(&mut self, seed: Option<u64>) -> (Observation, StepInfo) {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.users = topology::create_users(&self.cfg, &mut self.rng);
        for station in self.stations.iter_mut() {
            station.is_on = true;
            station.users_connected = 0;
        }
        self.current_step = 0;
        self.update_connectivity();
        self.logger.log(
            format!(
                "Reset\tseed: {:?}\tusers: {}\tdropped: {}",
                seed,
                self.users.len(),
                self.users_dropped
            ),
            self.current_step,
            &self.cfg,
        );
        (self.observation(), self.info())
    }

    /// Applies one on/off bit per station, recomputes connectivity, scores
    /// the resulting state and advances the step counter. The action is
    /// validated in full before any station state changes.
    pub fn step(&mut self, action: &[u8]) -> Result<StepOutcome, EnvError> {
        if action.len() != self.stations.len() {
            return Err(EnvError::InvalidAction(format!(
                "expected {} elements, got {}",
                self.stations.len(),
                action.len()
            )));
        }
        if let Some(a) = action.iter().find(|&&a| a > 1) {
            return Err(EnvError::InvalidAction(format!(
                "elements must be 0 or 1, got {}",
                a
            )));
        }

        for (station, &a) in zip(self.stations.iter_mut(), action.iter()) {
            station.is_on = a == 1;
        }
        self.update_connectivity();
        let reward = compute_reward(&self.stations, self.users_dropped, &self.cfg);
        self.current_step += 1;
        let terminated = self.current_step >= self.cfg.max_steps;

        self.logger.log(
            format!(
                "Step\taction: {:?}\treward: {:.2}\tdropped: {}",
                action, reward, self.users_dropped
            ),
            self.current_step,
            &self.cfg,
        );
        if terminated {
            self.logger.flush();
        }

        Ok(StepOutcome {
            observation: self.observation(),
            reward,
            terminated,
            truncated: false,
            info: self.info(),
        })
    }

    fn update_connectivity(&mut self) {
        let report =
            connectivity::resolve(&self.stations, &self.users, self.cfg.min_signal_threshold);
        for (station, count) in zip(self.stations.iter_mut(), report.connected_per_station) {
            station.users_connected = count;
        }
        self.users_dropped = report.dropped;
    }

    fn observation(&self) -> Observation {
        self.stations
            .iter()
            .map(|s| [if s.is_on { 1.0 } else { 0.0 }, s.users_connected as f64])
            .collect()
    }

    fn info(&self) -> StepInfo {
        StepInfo {
            total_power_consumption: self.stations.iter().map(|s| s.power_draw()).sum(),
            users_connected: self.stations.iter().map(|s| s.users_connected).sum(),
            users_dropped: self.users_dropped,
        }
    }
}
