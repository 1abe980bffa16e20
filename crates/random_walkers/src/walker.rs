//! Walkers and their speed classes.
use std::fmt;

use glam::IVec2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::classify::{Classification, Classifier};
use crate::error::{ConfigError, Result};
use crate::events::EventSink;
use crate::obstacle::Obstacle;
use crate::walk::{Path, Walk, WalkGenerator, MAX_STEPS};

/// Speed multiplier converting walking time into a number of steps.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpeedClass {
    Usual,
    Fast,
    Running,
}

impl SpeedClass {
    /// All classes in scene construction order.
    pub const ALL: [SpeedClass; 3] = [SpeedClass::Usual, SpeedClass::Fast, SpeedClass::Running];

    pub fn multiplier(self) -> u32 {
        match self {
            SpeedClass::Usual => 1,
            SpeedClass::Fast => 2,
            SpeedClass::Running => 4,
        }
    }

    /// Human-readable activity, e.g. for panel titles.
    pub fn label(self) -> &'static str {
        match self {
            SpeedClass::Usual => "walking casually",
            SpeedClass::Fast => "walking fast",
            SpeedClass::Running => "running",
        }
    }

    /// Path length for a walker of this class: `walking_time * multiplier + 1`.
    pub fn number_of_steps(self, walking_time: u32) -> Result<u32> {
        walking_time
            .checked_mul(self.multiplier())
            .and_then(|steps| steps.checked_add(1))
            .filter(|steps| *steps <= MAX_STEPS)
            .ok_or_else(|| {
                ConfigError::StepCountOverflow {
                    walking_time: walking_time.into(),
                    class: self,
                }
                .into()
            })
    }
}

impl fmt::Display for SpeedClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpeedClass::Usual => "usual",
            SpeedClass::Fast => "fast",
            SpeedClass::Running => "running",
        };
        f.write_str(name)
    }
}

/// A single simulated walker. The path is generated eagerly on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Walker {
    speed: SpeedClass,
    walking_time: u32,
    path: Path,
    obstacle: Obstacle,
    rejected_steps: usize,
}

impl Walker {
    /// Creates a walker and generates its full path.
    ///
    /// `walking_time` must be at least 1.
    pub fn generate<R: RngCore>(
        speed: SpeedClass,
        walking_time: u32,
        generator: &WalkGenerator,
        rng: &mut R,
    ) -> Result<Self> {
        Self::generate_with_events(speed, walking_time, generator, rng, &mut (), 0)
    }

    pub(crate) fn generate_with_events<R: RngCore>(
        speed: SpeedClass,
        walking_time: u32,
        generator: &WalkGenerator,
        rng: &mut R,
        sink: &mut dyn EventSink,
        index: usize,
    ) -> Result<Self> {
        if walking_time == 0 {
            return Err(ConfigError::NonPositiveWalkingTime(0).into());
        }
        let number_of_steps = speed.number_of_steps(walking_time)?;
        let walk = generator.generate_with_events(number_of_steps, rng, sink, index, speed)?;
        Ok(Self::from_walk(speed, walking_time, walk))
    }

    fn from_walk(speed: SpeedClass, walking_time: u32, walk: Walk) -> Self {
        Self {
            speed,
            walking_time,
            path: walk.path,
            obstacle: walk.obstacle,
            rejected_steps: walk.rejected_steps,
        }
    }

    pub fn speed(&self) -> SpeedClass {
        self.speed
    }

    pub fn walking_time(&self) -> u32 {
        self.walking_time
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn obstacle(&self) -> &Obstacle {
        &self.obstacle
    }

    pub fn rejected_steps(&self) -> usize {
        self.rejected_steps
    }

    pub fn start(&self) -> IVec2 {
        self.path[0]
    }

    pub fn end(&self) -> IVec2 {
        self.path[self.path.len() - 1]
    }

    pub fn classify(&self, classifier: &Classifier) -> Classification {
        classifier.classify(self.start(), self.end())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::error::Error;

    #[test]
    fn multipliers_match_speed_classes() {
        let m: Vec<u32> = SpeedClass::ALL.iter().map(|s| s.multiplier()).collect();
        assert_eq!(m, vec![1, 2, 4]);
        assert_eq!(SpeedClass::Running.label(), "running");
        assert_eq!(SpeedClass::Usual.to_string(), "usual");
    }

    #[test]
    fn number_of_steps_includes_start() {
        assert_eq!(SpeedClass::Usual.number_of_steps(2).unwrap(), 3);
        assert_eq!(SpeedClass::Fast.number_of_steps(2).unwrap(), 5);
        assert_eq!(SpeedClass::Running.number_of_steps(10).unwrap(), 41);
    }

    #[test]
    fn number_of_steps_overflow_is_config_error() {
        let err = SpeedClass::Running.number_of_steps(u32::MAX).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig(ConfigError::StepCountOverflow {
                class: SpeedClass::Running,
                ..
            })
        ));
    }

    #[test]
    fn zero_walking_time_is_rejected() {
        let generator = WalkGenerator::default();
        let mut rng = StdRng::seed_from_u64(5);
        for speed in SpeedClass::ALL {
            let err = Walker::generate(speed, 0, &generator, &mut rng).unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidConfig(ConfigError::NonPositiveWalkingTime(0))
            ));
        }
    }

    #[test]
    fn walker_path_length_follows_speed() {
        let generator = WalkGenerator::default();
        let mut rng = StdRng::seed_from_u64(5);
        for speed in SpeedClass::ALL {
            let walker = Walker::generate(speed, 10, &generator, &mut rng).unwrap();
            assert_eq!(walker.path().len(), 10 * speed.multiplier() as usize + 1);
            assert_eq!(walker.speed(), speed);
            assert_eq!(walker.walking_time(), 10);
            assert_eq!(walker.start(), walker.path().start().unwrap());
            assert_eq!(walker.end(), walker.path().end().unwrap());
        }
    }
}
