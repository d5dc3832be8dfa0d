use thiserror::Error;

/// Invalid configuration, rejected when the configuration is set.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be within [0, 1], got {value}")]
    RatioOutOfRange { field: &'static str, value: f32 },
    #[error("span count must be at least 1")]
    ZeroSpanCount,
    #[error("smooth scroll step must be at least 1 pixel")]
    ZeroScrollStep,
}

pub(crate) fn check_ratio(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RatioOutOfRange { field, value })
    }
}
