//! Walk generation with obstacle-avoiding rejection sampling.
//!
//! [`WalkGenerator`] draws a uniform start point in `[0, n) x [0, n)`, derives the
//! walker's [`Obstacle`] once, and then extends the path one unit step at a time.
//! A candidate step that lands strictly inside the obstacle is discarded and redrawn.
//!
//! Termination: every lattice point outside an axis-aligned rectangle has at least
//! one of its four neighbours outside the open interior (a point whose left/right
//! and up/down neighbours are all inside would itself be inside). Each draw therefore
//! succeeds with probability >= 1/4, so the expected number of draws per step is at
//! most 4. The loop is unbounded unless [`WalkConfig::with_max_attempts_per_step`]
//! sets a cap.
use std::ops::Index;

use glam::IVec2;
use rand::RngCore;

use crate::error::{ConfigError, Error, Result};
use crate::events::{EventSink, WalkEvent, WalkEventKind};
use crate::obstacle::{Obstacle, ObstacleShape};
use crate::step::{rand_below, StepSampling, UniformStepSampling};
use crate::walker::SpeedClass;

/// Largest supported path length. Keeps every coordinate well inside `i32`.
pub const MAX_STEPS: u32 = 1 << 30;

/// Ordered lattice points visited by a walker, start first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    points: Vec<IVec2>,
}

impl Path {
    pub fn points(&self) -> &[IVec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point, or `None` for an empty path.
    pub fn start(&self) -> Option<IVec2> {
        self.points.first().copied()
    }

    /// Last point, or `None` for an empty path.
    pub fn end(&self) -> Option<IVec2> {
        self.points.last().copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IVec2> {
        self.points.iter()
    }

    pub fn into_inner(self) -> Vec<IVec2> {
        self.points
    }
}

impl From<Vec<IVec2>> for Path {
    fn from(points: Vec<IVec2>) -> Self {
        Self { points }
    }
}

impl Index<usize> for Path {
    type Output = IVec2;

    fn index(&self, index: usize) -> &IVec2 {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a IVec2;
    type IntoIter = std::slice::Iter<'a, IVec2>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Output of a single walk generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Walk {
    pub path: Path,
    pub obstacle: Obstacle,
    /// Candidate steps discarded because they fell inside the obstacle.
    pub rejected_steps: usize,
}

/// Configuration for walk generation.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct WalkConfig {
    /// Rule deriving each walker's obstacle from its start point.
    pub obstacle_shape: ObstacleShape,
    /// Optional cap on draws per step. `None` retries until a step is accepted.
    pub max_attempts_per_step: Option<u32>,
}

impl WalkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the obstacle shape.
    pub fn with_obstacle_shape(mut self, obstacle_shape: ObstacleShape) -> Self {
        self.obstacle_shape = obstacle_shape;
        self
    }

    /// Caps the number of draws per step.
    pub fn with_max_attempts_per_step(mut self, max_attempts: u32) -> Self {
        self.max_attempts_per_step = Some(max_attempts);
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.obstacle_shape.validate()?;
        if self.max_attempts_per_step == Some(0) {
            return Err(ConfigError::ZeroAttempts.into());
        }
        Ok(())
    }
}

pub struct WalkGenerator {
    /// Configuration applied to every generated walk.
    pub config: WalkConfig,
    sampler: Box<dyn StepSampling>,
}

impl std::fmt::Debug for WalkGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for WalkGenerator {
    fn default() -> Self {
        Self {
            config: WalkConfig::default(),
            sampler: Box::new(UniformStepSampling::new()),
        }
    }
}

impl WalkGenerator {
    pub fn try_new(config: WalkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            sampler: Box::new(UniformStepSampling::new()),
        })
    }

    /// Replaces the step sampler.
    pub fn with_sampler<S: StepSampling + 'static>(mut self, sampler: S) -> Self {
        self.sampler = Box::new(sampler);
        self
    }

    /// Generates a walk of `number_of_steps` points.
    ///
    /// `number_of_steps` must be at least 2; smaller values are a caller error.
    pub fn generate<R: RngCore>(&self, number_of_steps: u32, rng: &mut R) -> Result<Walk> {
        self.generate_with_events(number_of_steps, rng, &mut (), 0, SpeedClass::Usual)
    }

    /// Generates a walk and reports progress to `sink`, labelling events with the
    /// walker's scene `index` and `speed`.
    pub fn generate_with_events<R: RngCore>(
        &self,
        number_of_steps: u32,
        rng: &mut R,
        sink: &mut dyn EventSink,
        index: usize,
        speed: SpeedClass,
    ) -> Result<Walk> {
        debug_assert!(number_of_steps >= 2, "a walk needs a start and one step");
        if number_of_steps == 0 || number_of_steps > MAX_STEPS {
            return Err(Error::InvalidStepCount {
                number_of_steps,
                max: MAX_STEPS,
            });
        }

        let start = IVec2::new(
            rand_below(rng, number_of_steps) as i32,
            rand_below(rng, number_of_steps) as i32,
        );
        let obstacle = self.config.obstacle_shape.derive(start);
        if sink.wants(WalkEventKind::WalkerStarted) {
            sink.send(WalkEvent::WalkerStarted {
                index,
                speed,
                start,
                obstacle,
            });
        }

        let mut points = Vec::with_capacity(number_of_steps as usize);
        points.push(start);
        let mut rejected_steps = 0usize;

        for step in 1..number_of_steps as usize {
            let prev = points[step - 1];
            let mut attempts = 0u32;
            let next = loop {
                attempts += 1;
                let candidate = self.sampler.next_step(rng).step_from(prev);
                if !obstacle.contains_strict(candidate) {
                    break candidate;
                }

                rejected_steps += 1;
                if sink.wants(WalkEventKind::StepRejected) {
                    sink.send(WalkEvent::StepRejected {
                        index,
                        step,
                        candidate,
                    });
                }
                if let Some(max) = self.config.max_attempts_per_step {
                    if attempts >= max {
                        return Err(Error::ObstacleUnavoidable { step, attempts });
                    }
                }
            };
            points.push(next);
        }

        let path = Path { points };
        if sink.wants(WalkEventKind::WalkerFinished) {
            sink.send(WalkEvent::WalkerFinished {
                index,
                speed,
                end: path.end().unwrap_or(start),
                rejected_steps,
            });
        }

        Ok(Walk {
            path,
            obstacle,
            rejected_steps,
        })
    }
}
