//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`], the typed [`ConfigError`] that
//! names which configuration bound was violated, and the crate-wide [Result] alias.
use thiserror::Error;

use crate::walker::SpeedClass;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("obstacle unavoidable at step {step} after {attempts} attempts")]
    ObstacleUnavoidable { step: usize, attempts: u32 },

    #[error("number_of_steps must be in 1..={max}, got {number_of_steps}")]
    InvalidStepCount { number_of_steps: u32, max: u32 },
}

/// The configuration bound that failed validation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("walking_time must be >= 1, got {0}")]
    NonPositiveWalkingTime(i64),

    #[error("number of {class} walkers can't be negative, got {count}")]
    NegativeCount { class: SpeedClass, count: i64 },

    #[error("at least one walker is required")]
    NoWalkers,

    #[error("at most {max} walkers are supported, got {count}")]
    TooManyWalkers { count: i64, max: usize },

    #[error("walking_time {walking_time} is too large for {class} walkers")]
    StepCountOverflow { walking_time: i64, class: SpeedClass },

    #[error("invalid obstacle shape: {0}")]
    InvalidObstacleShape(String),

    #[error("distance threshold must be finite and > 0, got {0}")]
    NonPositiveThreshold(f64),

    #[error("max attempts per step must be > 0")]
    ZeroAttempts,
}
