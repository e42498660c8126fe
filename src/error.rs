#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("horiz_timeslice must lie strictly between 0 and 1, got {0}")]
    HorizTimeslice(f64),

    #[error("slowness_ms must be a positive number of milliseconds, got {0}")]
    Slowness(f64),

    #[error("fps_cap must be at least 1")]
    FpsCap,
}
