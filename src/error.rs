use thiserror::Error;

/// Hard failures surfaced to the caller. The simulation itself has no
/// degraded mode: an invalid input is rejected before any state changes.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Action vector does not match the station count or contains a value
    /// outside {0, 1}.
    #[error("invalid action: {0}")]
    InvalidAction(String),
    /// Construction-time parameter violates its contract.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
