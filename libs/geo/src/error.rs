use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeoError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("parameter '{0}' is required")]
    Missing(&'static str),

    #[error("parameter '{name}' must be a finite number, got '{raw}'")]
    NotANumber { name: &'static str, raw: String },

    #[error("latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),

    #[error("longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),
}
