use crate::{basestation::BaseStation, config::Config};

/// Scores the current network state. Stateless: recomputed from scratch
/// every step from the station slice and the last resolver's drop count.
///
/// reward = -power_cost_weight * total power draw
///          - drop_penalty * dropped users
///          + connect_reward * connected users
///          + idle_off_bonus per station that is off with no users
pub fn compute_reward(stations: &[BaseStation], dropped: usize, cfg: &Config) -> f64 {
    let power_consumption: f64 = stations.iter().map(|s| s.power_draw()).sum();
    let users_connected: usize = stations.iter().map(|s| s.users_connected).sum();

    let mut reward = 0.0;
    reward -= power_consumption * cfg.power_cost_weight;
    reward -= dropped as f64 * cfg.drop_penalty;
    reward += users_connected as f64 * cfg.connect_reward;
    for station in stations {
        if !station.is_on && station.users_connected == 0 {
            reward += cfg.idle_off_bonus;
        }
    }
    reward
}
