//! Display classification of walkers by start/end distance.
//!
//! Walkers whose walk ends far from where it started are collapsed by renderers into a
//! straight connector between start and end instead of the full jagged path.
use glam::IVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default distance at or above which a walker counts as long-distance.
pub const DEFAULT_LONG_DISTANCE_THRESHOLD: f64 = 150.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Draw the full path.
    Normal,
    /// Draw a straight line from start to end.
    LongDistance,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classifier {
    /// Euclidean distance threshold, inclusive.
    pub threshold: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LONG_DISTANCE_THRESHOLD,
        }
    }
}

impl Classifier {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn try_new(threshold: f64) -> Result<Self> {
        let classifier = Self::new(threshold);
        classifier.validate()?;
        Ok(classifier)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigError::NonPositiveThreshold(self.threshold).into());
        }
        Ok(())
    }

    pub fn classify(&self, start: IVec2, end: IVec2) -> Classification {
        let distance = (end - start).as_dvec2().length();
        if distance >= self.threshold {
            Classification::LongDistance
        } else {
            Classification::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn threshold_is_inclusive() {
        let c = Classifier::default();
        let t = DEFAULT_LONG_DISTANCE_THRESHOLD as i32;
        assert_eq!(
            c.classify(IVec2::ZERO, IVec2::new(0, t)),
            Classification::LongDistance
        );
        assert_eq!(
            c.classify(IVec2::ZERO, IVec2::new(0, t - 1)),
            Classification::Normal
        );
    }

    #[test]
    fn uses_euclidean_distance() {
        let c = Classifier::new(5.0);
        // 3-4-5 triangle lands exactly on the threshold.
        assert_eq!(
            c.classify(IVec2::new(1, 1), IVec2::new(4, 5)),
            Classification::LongDistance
        );
        // Manhattan distance 6 but Euclidean ~4.24.
        assert_eq!(
            c.classify(IVec2::ZERO, IVec2::new(3, 3)),
            Classification::Normal
        );
        assert_eq!(
            c.classify(IVec2::new(7, 7), IVec2::new(7, 7)),
            Classification::Normal
        );
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        assert!(Classifier::try_new(50.0).is_ok());
        for t in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Classifier::try_new(t),
                Err(Error::InvalidConfig(ConfigError::NonPositiveThreshold(_)))
            ));
        }
    }
}
