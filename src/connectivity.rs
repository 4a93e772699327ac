use crate::{basestation::BaseStation, user::UserEquipment};

/// Outcome of one full connectivity pass. `connected_per_station` is
/// index-aligned with the station slice; every user is counted exactly
/// once, either in some station's count or in `dropped`.
#[derive(Debug, PartialEq)]
pub struct ConnectivityReport {
    pub connected_per_station: Vec<usize>,
    pub dropped: usize,
}

impl ConnectivityReport {
    pub fn total_connected(&self) -> usize {
        self.connected_per_station.iter().sum()
    }
}

/// Assigns each user to the powered-on station with the strongest signal,
/// or drops it. Ties break to the lowest station index. A user whose best
/// signal does not exceed `min_signal_threshold` is dropped, as is every
/// user when no station is on.
///
/// Full O(stations x users) recomputation; no state carried between calls.
pub fn resolve(
    stations: &[BaseStation],
    users: &[UserEquipment],
    min_signal_threshold: f64,
) -> ConnectivityReport {
    let mut report = ConnectivityReport {
        connected_per_station: vec![0; stations.len()],
        dropped: 0,
    };

    for user in users {
        let mut strongest_signal = f64::NEG_INFINITY;
        let mut best_station: Option<usize> = None;
        for (i, station) in stations.iter().enumerate() {
            if !station.is_on {
                continue;
            }
            // strict comparison in index order keeps the lowest index on ties
            let signal = station.signal_strength(user);
            if signal > strongest_signal {
                strongest_signal = signal;
                best_station = Some(i);
            }
        }
        match best_station {
            Some(i) if strongest_signal > min_signal_threshold => {
                report.connected_per_station[i] += 1;
            }
            _ => report.dropped += 1,
        }
    }
    report
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::resolve;
    use crate::{config::Config, topology, user::UserEquipment};

    #[test]
    fn every_user_accounted_once() {
        let mut cfg = Config::default();
        cfg.stations_count = 4;
        cfg.users_count = 50;
        let mut stations = topology::create_base_stations(&cfg);
        stations[1].is_on = false;
        let mut rng = StdRng::seed_from_u64(3);
        let users = topology::create_users(&cfg, &mut rng);
        let report = resolve(&stations, &users, cfg.min_signal_threshold);
        assert_eq!(report.total_connected() + report.dropped, 50);
        assert_eq!(report.connected_per_station[1], 0);
    }

    #[test]
    fn all_stations_off_drops_everyone() {
        let mut cfg = Config::default();
        cfg.users_count = 25;
        let mut stations = topology::create_base_stations(&cfg);
        for station in stations.iter_mut() {
            station.is_on = false;
        }
        let mut rng = StdRng::seed_from_u64(5);
        let users = topology::create_users(&cfg, &mut rng);
        let report = resolve(&stations, &users, cfg.min_signal_threshold);
        assert_eq!(report.dropped, 25);
        assert!(report.connected_per_station.iter().all(|&c| c == 0));
    }

    #[test]
    fn colocated_user_always_assigned() {
        let cfg = Config::default();
        let stations = topology::create_base_stations(&cfg);
        let user = UserEquipment {
            x: stations[2].x,
            y: stations[2].y,
        };
        let report = resolve(&stations, &[user], cfg.min_signal_threshold);
        assert_eq!(report.dropped, 0);
        assert_eq!(report.connected_per_station[2], 1);
    }

    #[test]
    fn tie_breaks_to_lowest_index() {
        let mut cfg = Config::default();
        cfg.stations_count = 2;
        cfg.width = 9000.0; // stations land exactly at x = 3000 and 6000
        let stations = topology::create_base_stations(&cfg);
        // equidistant from both stations
        let user = UserEquipment {
            x: 4500.0,
            y: cfg.height / 2.0,
        };
        let report = resolve(&stations, &[user], cfg.min_signal_threshold);
        assert_eq!(report.connected_per_station, vec![1, 0]);
    }

    #[test]
    fn weak_signal_drops_user() {
        let mut cfg = Config::default();
        cfg.stations_count = 1;
        // best signal at the corner: 40 / (~7071^2) = 8e-7, below threshold
        let stations = topology::create_base_stations(&cfg);
        let user = UserEquipment { x: 0.0, y: 0.0 };
        let report = resolve(&stations, &[user], cfg.min_signal_threshold);
        assert_eq!(report.dropped, 1);
        assert_eq!(report.connected_per_station[0], 0);
    }

    #[test]
    fn empty_user_set() {
        let cfg = Config::default();
        let stations = topology::create_base_stations(&cfg);
        let report = resolve(&stations, &[], cfg.min_signal_threshold);
        assert_eq!(report.dropped, 0);
        assert_eq!(report.total_connected(), 0);
    }
}
