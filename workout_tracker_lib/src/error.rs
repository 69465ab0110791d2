use thiserror::Error;

use crate::form::InvalidInput;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("storage is not available: {0}")]
    Unavailable(String),

    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("failed to read key {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("failed to encode snapshot: {0}")]
    Encode(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("permission to read the position was denied")]
    PermissionDenied,

    #[error("position is unavailable")]
    PositionUnavailable,

    #[error("timed out waiting for a position")]
    Timeout,

    #[error("geolocation is not supported: {0}")]
    Unsupported(String),
}

/// Everything the session can report back to whoever draws the UI.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("could not get your position: {0}")]
    GeolocationUnavailable(GeolocationError),

    #[error("provided input is invalid: {0}")]
    InvalidWorkoutInput(#[from] InvalidInput),

    #[error("no map location was selected for this workout")]
    MissingMapEventContext,

    #[error("stored workouts could not be read: {0}")]
    SnapshotCorrupt(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
