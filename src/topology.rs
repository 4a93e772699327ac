use rand::rngs::StdRng;

use crate::{basestation::BaseStation, config::Config, user::UserEquipment};

/// Places station i at x = (i+1) * width / (count+1), y = height / 2.
/// Deterministic, order significant: action index i maps to station i.
pub fn create_base_stations(cfg: &Config) -> Vec<BaseStation> {
    let mut stations = Vec::with_capacity(cfg.stations_count);
    for i in 0..cfg.stations_count {
        let x = (i + 1) as f64 * cfg.width / (cfg.stations_count + 1) as f64;
        let y = cfg.height / 2.0;
        stations.push(BaseStation::new(x, y, cfg));
    }
    stations
}

/// Uniform random user field over [0, width) x [0, height). The rng is
/// injected so resets are reproducible from a seed.
pub fn create_users(cfg: &Config, rng: &mut StdRng) -> Vec<UserEquipment> {
    (0..cfg.users_count)
        .map(|_| UserEquipment::new_random(cfg.width, cfg.height, rng))
        .collect()
}
