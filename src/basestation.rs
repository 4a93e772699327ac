use crate::{config::Config, user::UserEquipment};

/// A fixed-position network access point. `is_on` is set once per step by
/// the environment from the action vector; `users_connected` is fully
/// recomputed every step by the connectivity resolver and reads 0 whenever
/// the station is off.
#[derive(Debug, Clone)]
pub struct BaseStation {
    pub x: f64,
    pub y: f64,
    pub power_consumption_watts: f64,
    pub max_transmit_power: f64,
    pub is_on: bool,
    pub users_connected: usize,
}

impl BaseStation {
    pub fn new(x: f64, y: f64, cfg: &Config) -> BaseStation {
        BaseStation {
            x,
            y,
            power_consumption_watts: cfg.power_consumption_watts,
            max_transmit_power: cfg.max_transmit_power,
            is_on: true,
            users_connected: 0,
        }
    }

    pub fn distance_to(&self, user: &UserEquipment) -> f64 {
        ((user.x - self.x).powi(2) + (user.y - self.y).powi(2)).sqrt()
    }

    /// Inverse-square path-loss approximation. A user exactly at the
    /// station position receives infinite signal, which always wins
    /// selection and always clears the connectivity threshold.
    pub fn signal_strength(&self, user: &UserEquipment) -> f64 {
        let distance = self.distance_to(user);
        if distance == 0.0 {
            f64::INFINITY
        } else {
            self.max_transmit_power / distance.powi(2)
        }
    }

    pub fn power_draw(&self) -> f64 {
        if self.is_on {
            self.power_consumption_watts
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod test {
    use super::BaseStation;
    use crate::{config::Config, user::UserEquipment};

    #[test]
    fn inverse_square_signal() {
        let cfg = Config::default();
        let station = BaseStation::new(0.0, 0.0, &cfg);
        let near = UserEquipment { x: 100.0, y: 0.0 };
        let far = UserEquipment { x: 200.0, y: 0.0 };
        let s_near = station.signal_strength(&near);
        let s_far = station.signal_strength(&far);
        assert!((s_near - cfg.max_transmit_power / 10000.0).abs() < 1e-12);
        // doubling the distance quarters the signal
        assert!((s_near / s_far - 4.0).abs() < 1e-9);
    }

    #[test]
    fn colocated_user_gets_infinite_signal() {
        let cfg = Config::default();
        let station = BaseStation::new(250.0, 250.0, &cfg);
        let user = UserEquipment { x: 250.0, y: 250.0 };
        assert_eq!(station.distance_to(&user), 0.0);
        assert!(station.signal_strength(&user).is_infinite());
    }

    #[test]
    fn power_draw_follows_state() {
        let cfg = Config::default();
        let mut station = BaseStation::new(0.0, 0.0, &cfg);
        assert_eq!(station.power_draw(), cfg.power_consumption_watts);
        station.is_on = false;
        assert_eq!(station.power_draw(), 0.0);
    }
}
