#![forbid(unsafe_code)]
//! random_walkers: discrete 2D random walkers with per-walker obstacle avoidance.
//!
//! Modules:
//! - step: uniform cardinal step sampling
//! - obstacle: rectangular obstacles derived from a walker's start point
//! - walk: path generation with rejection of blocked steps
//! - walker / scene: walkers, scene configuration and construction
//! - classify: long-distance classification for display
//! - events / seed: observation hooks and per-walker seed derivation
pub mod classify;
pub mod error;
pub mod events;
pub mod obstacle;
pub mod scene;
pub mod seed;
pub mod step;
pub mod walk;
pub mod walker;

/// Convenient re-exports for common types. Import with `use random_walkers::prelude::*;`.
pub mod prelude {
    pub use crate::classify::{Classification, Classifier, DEFAULT_LONG_DISTANCE_THRESHOLD};
    pub use crate::error::{ConfigError, Error, Result};
    pub use crate::events::{EventSink, FnSink, VecSink, WalkEvent, WalkEventKind};
    pub use crate::obstacle::{Obstacle, ObstacleShape};
    pub use crate::scene::{
        Scene, SceneBuilder, SceneConfig, WalkerCounts, WalkerSummary, MAX_WALKERS,
    };
    pub use crate::seed::seed_for_walker;
    pub use crate::step::{Direction, StepSampling, UniformStepSampling};
    pub use crate::walk::{Path, Walk, WalkConfig, WalkGenerator};
    pub use crate::walker::{SpeedClass, Walker};
}
