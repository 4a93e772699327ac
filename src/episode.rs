use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use std::iter::zip;
use std::path::PathBuf;

use crate::config::{Cli, Config};
use crate::environment::{Observation, RanEnvironment, StepOutcome};
use crate::error::EnvError;
use crate::logger::Logger;

/// Built-in baseline policies for the driver binary. Stand-ins for a
/// trained agent; they consume only the public observation.
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum Policy {
    /// Every station on, every step.
    AllOn,
    /// Turn off stations that served no users in the last observation.
    Greedy,
}

impl Policy {
    pub fn decide(&self, observation: &Observation) -> Vec<u8> {
        match self {
            Policy::AllOn => vec![1; observation.len()],
            Policy::Greedy => observation
                .iter()
                .map(|row| if row[1] > 0.0 { 1 } else { 0 })
                .collect(),
        }
    }
}

#[derive(Debug)]
pub struct StationEpisodeResult {
    pub on_time: f64, // [%] of steps powered on
    pub average_users: f64,
}

/// Per-episode averages, reused as the accumulator when averaging over
/// an episode batch (new_zero / add / div).
#[derive(Debug)]
pub struct EpisodeResults {
    pub steps: u32,
    pub total_reward: f64,
    pub average_power: f64,
    pub average_connected: f64,
    pub average_dropped: f64,
    pub stations: Vec<StationEpisodeResult>,
}

impl EpisodeResults {
    pub fn new_zero(cfg: &Config) -> EpisodeResults {
        let mut res = EpisodeResults {
            steps: 0,
            total_reward: 0.0,
            average_power: 0.0,
            average_connected: 0.0,
            average_dropped: 0.0,
            stations: Vec::new(),
        };
        for _ in 0..cfg.stations_count {
            res.stations.push(StationEpisodeResult {
                on_time: 0.0,
                average_users: 0.0,
            })
        }
        res
    }

    fn record_step(&mut self, outcome: &StepOutcome) {
        self.steps += 1;
        self.total_reward += outcome.reward;
        self.average_power += outcome.info.total_power_consumption;
        self.average_connected += outcome.info.users_connected as f64;
        self.average_dropped += outcome.info.users_dropped as f64;
        for (s, row) in zip(self.stations.iter_mut(), outcome.observation.iter()) {
            s.on_time += row[0];
            s.average_users += row[1];
        }
    }

    fn finalize(&mut self) {
        let steps = self.steps as f64;
        self.average_power /= steps;
        self.average_connected /= steps;
        self.average_dropped /= steps;
        for s in self.stations.iter_mut() {
            s.on_time = s.on_time / steps * 100.0;
            s.average_users /= steps;
        }
    }

    pub fn add(&mut self, x: &EpisodeResults) {
        self.steps += x.steps;
        self.total_reward += x.total_reward;
        self.average_power += x.average_power;
        self.average_connected += x.average_connected;
        self.average_dropped += x.average_dropped;
        for (s, partial) in zip(self.stations.iter_mut(), x.stations.iter()) {
            s.on_time += partial.on_time;
            s.average_users += partial.average_users;
        }
    }

    pub fn div(&mut self, x: f64) {
        self.steps = (self.steps as f64 / x) as u32;
        self.total_reward /= x;
        self.average_power /= x;
        self.average_connected /= x;
        self.average_dropped /= x;
        for s in self.stations.iter_mut() {
            s.on_time /= x;
            s.average_users /= x;
        }
    }

    fn pad(s: String, n: usize) -> String {
        format!("{:^n$}", s)
    }

    pub fn get_report(&self) -> String {
        let mut msg = format!(
            "Episode results:\n\
            - steps per episode: {}\n\
            - total reward: {:.2}\n\
            - average power consumption: {:.2} W\n\
            - average users connected: {:.2}\n\
            - average users dropped: {:.2}\n\
            \n\
            Stations results:\n\
            id  | on time [%] | average users connected\n\
            ----+-------------+------------------------\n",
            self.steps,
            self.total_reward,
            self.average_power,
            self.average_connected,
            self.average_dropped
        );
        for (i, station) in self.stations.iter().enumerate() {
            msg += (format!(
                "{} | {} | {}\n",
                Self::pad(format!("{}", i), 3),
                Self::pad(format!("{:.2}", station.on_time), 11),
                Self::pad(format!("{:.2}", station.average_users), 24)
            ))
            .as_str();
        }
        msg
    }

    pub fn get_csv_header(&self) -> String {
        let mut msg = String::from(
            "steps,total_reward,average_power_consumption,average_users_connected,average_users_dropped",
        );
        for i in 0..self.stations.len() {
            msg += (format!(",station{}_on_time,station{}_average_users", i, i)).as_str();
        }
        msg
    }

    pub fn get_csv(&self) -> String {
        let mut data = format!(
            "{},{},{},{},{}",
            self.steps,
            self.total_reward,
            self.average_power,
            self.average_connected,
            self.average_dropped
        );
        for station in self.stations.iter() {
            data += &format!(",{},{}", station.on_time, station.average_users);
        }
        data
    }
}

/// Runs batches of episodes over the environment through its public
/// reset/step interface only, the way an external training or evaluation
/// loop would.
pub struct EpisodeRunner {
    pub cli: Cli,
    cfg: Config,
}

impl EpisodeRunner {
    pub fn new() -> Result<EpisodeRunner, EnvError> {
        let cli = Cli::parse().validate()?;
        let cfg = cli.create_config()?.validate()?;
        Ok(EpisodeRunner { cli, cfg })
    }

    /// Runs one full episode under the configured baseline policy.
    pub fn simulate(&self, iter: u32, log_path: PathBuf) -> EpisodeResults {
        let seed = self.cli.seed.map(|s| s + iter as u64);
        let logger = Logger::new(self.cli.log, &self.cfg, &log_path)
            .expect("Internal error: failed to create log file");
        let mut env = RanEnvironment::with_logger(self.cfg.clone(), logger)
            .expect("Internal error: runner holds a validated config");
        let mut results = EpisodeResults::new_zero(&self.cfg);

        let (mut observation, _info) = env.reset(seed);
        loop {
            let action = self.cli.policy.decide(&observation);
            let outcome = env
                .step(&action)
                .expect("Internal error: baseline policy produced an invalid action");
            results.record_step(&outcome);
            let terminated = outcome.terminated;
            observation = outcome.observation;
            if terminated {
                break;
            }
        }
        results.finalize();
        results
    }

    fn episode_log_path(&self, iter: u32) -> PathBuf {
        let base = match &self.cli.log_path {
            Some(p) => p.to_owned(),
            None => PathBuf::from("episode.log"),
        };
        if self.cli.episodes > 1 {
            base.with_extension(format!("{}.log", iter))
        } else {
            base
        }
    }

    pub fn run(&self) -> EpisodeResults {
        let mut batch = EpisodeResults::new_zero(&self.cfg);
        let partial_results: Vec<EpisodeResults> = (0..self.cli.episodes)
            .into_par_iter()
            .map(|i| {
                let res = self.simulate(i, self.episode_log_path(i));
                if self.cli.show_partial_results {
                    println!("Partial result - episode: {}", i);
                    println!("{}", res.get_report());
                }
                res
            })
            .collect();
        // average results
        for partial in partial_results.iter() {
            batch.add(partial);
        }
        batch.div(self.cli.episodes as f64);
        batch
    }
}

// test only functions
impl EpisodeRunner {
    #[allow(dead_code)]
    pub fn new_test(cfg: Config, policy: Policy) -> EpisodeRunner {
        let cli = Cli {
            with_config: None,
            seed: Some(1),
            log: false,
            log_path: None,
            episodes: 1,
            policy,
            save_default_config: None,
            show_partial_results: false,
            csv: false,
        };
        EpisodeRunner { cli, cfg }
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::{EpisodeResults, EpisodeRunner, Policy};
    use crate::config::Config;

    #[test]
    fn policy_decisions() {
        let observation = vec![[1.0, 0.0], [1.0, 5.0], [0.0, 0.0]];
        assert_eq!(Policy::AllOn.decide(&observation), vec![1, 1, 1]);
        assert_eq!(Policy::Greedy.decide(&observation), vec![0, 1, 0]);
    }

    #[test]
    fn episode_runs_to_horizon() {
        let mut cfg = Config::default();
        cfg.max_steps = 20;
        let runner = EpisodeRunner::new_test(cfg, Policy::AllOn);
        let res = runner.simulate(0, PathBuf::from("unused.log"));
        assert_eq!(res.steps, 20);
        // all-on: every station drew full power every step
        assert_eq!(res.average_power, 3.0 * 500.0);
        for station in res.stations.iter() {
            assert_eq!(station.on_time, 100.0);
        }
        // every user is either connected or dropped, each step
        assert!((res.average_connected + res.average_dropped - 10.0).abs() < 1e-9);
    }

    #[test]
    fn greedy_saves_power_versus_all_on() {
        let mut cfg = Config::default();
        cfg.max_steps = 10;
        // a wide area with many stations leaves some of them idle
        cfg.stations_count = 6;
        cfg.users_count = 4;
        let all_on = EpisodeRunner::new_test(cfg.clone(), Policy::AllOn)
            .simulate(0, PathBuf::from("unused.log"));
        let greedy = EpisodeRunner::new_test(cfg, Policy::Greedy)
            .simulate(0, PathBuf::from("unused.log"));
        assert!(greedy.average_power < all_on.average_power);
        assert!(greedy.total_reward > all_on.total_reward);
    }

    #[test]
    fn batch_add_div() {
        let cfg = Config::default();
        let runner = EpisodeRunner::new_test(cfg.clone(), Policy::AllOn);
        let a = runner.simulate(0, PathBuf::from("unused.log"));
        let b = runner.simulate(1, PathBuf::from("unused.log"));
        let mut batch = EpisodeResults::new_zero(&cfg);
        batch.add(&a);
        batch.add(&b);
        batch.div(2.0);
        assert_eq!(batch.steps, cfg.max_steps);
        let expected = (a.total_reward + b.total_reward) / 2.0;
        assert!((batch.total_reward - expected).abs() < 1e-9);
    }
}
