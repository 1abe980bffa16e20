//! Scene configuration and construction.
//!
//! A [`SceneBuilder`] validates a [`SceneConfig`] and generates one [`Walker`] per
//! requested walker, usual walkers first, then fast, then running. The resulting
//! [`Scene`] is immutable and exposes per-walker [`WalkerSummary`] views for renderers.
use glam::IVec2;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classify::{Classification, Classifier};
use crate::error::{ConfigError, Result};
use crate::events::{EventSink, WalkEvent, WalkEventKind};
use crate::obstacle::Obstacle;
use crate::seed::seed_for_walker;
use crate::walk::{Path, WalkConfig, WalkGenerator};
use crate::walker::{SpeedClass, Walker};

/// Upper bound on walkers per scene.
pub const MAX_WALKERS: usize = 12;

/// Requested number of walkers per speed class.
///
/// Counts are signed so that invalid input can be reported instead of being
/// unrepresentable at the boundary.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkerCounts {
    pub usual: i64,
    pub fast: i64,
    pub running: i64,
}

impl WalkerCounts {
    pub fn new(usual: i64, fast: i64, running: i64) -> Self {
        Self {
            usual,
            fast,
            running,
        }
    }

    pub fn get(&self, speed: SpeedClass) -> i64 {
        match speed {
            SpeedClass::Usual => self.usual,
            SpeedClass::Fast => self.fast,
            SpeedClass::Running => self.running,
        }
    }

    /// Sum of all counts, saturating.
    pub fn total(&self) -> i64 {
        self.usual
            .saturating_add(self.fast)
            .saturating_add(self.running)
    }
}

/// Configuration for building a scene.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneConfig {
    /// Time every walker walks; path length is `walking_time * speed + 1`.
    pub walking_time: i64,
    /// Walkers per speed class.
    pub counts: WalkerCounts,
}

impl SceneConfig {
    /// Creates a config with the given walking time and no walkers.
    pub fn new(walking_time: i64) -> Self {
        Self {
            walking_time,
            counts: WalkerCounts::default(),
        }
    }

    /// Sets all walker counts.
    pub fn with_counts(mut self, counts: WalkerCounts) -> Self {
        self.counts = counts;
        self
    }

    /// Sets the number of walkers for one speed class.
    pub fn with_count(mut self, speed: SpeedClass, count: i64) -> Self {
        match speed {
            SpeedClass::Usual => self.counts.usual = count,
            SpeedClass::Fast => self.counts.fast = count,
            SpeedClass::Running => self.counts.running = count,
        }
        self
    }

    /// Validates the configuration, returning an error naming the failed bound.
    pub fn validate(&self) -> Result<()> {
        self.resolve().map(|_| ())
    }

    /// Validated walking time and walker speeds in scene order.
    fn resolve(&self) -> Result<(u32, Vec<SpeedClass>)> {
        if self.walking_time < 1 {
            return Err(ConfigError::NonPositiveWalkingTime(self.walking_time).into());
        }
        for class in SpeedClass::ALL {
            let count = self.counts.get(class);
            if count < 0 {
                return Err(ConfigError::NegativeCount { class, count }.into());
            }
        }
        let total = self.counts.total();
        if total == 0 {
            return Err(ConfigError::NoWalkers.into());
        }
        if total > MAX_WALKERS as i64 {
            return Err(ConfigError::TooManyWalkers {
                count: total,
                max: MAX_WALKERS,
            }
            .into());
        }

        let walking_time =
            u32::try_from(self.walking_time).map_err(|_| ConfigError::StepCountOverflow {
                walking_time: self.walking_time,
                class: SpeedClass::Usual,
            })?;

        let mut speeds = Vec::with_capacity(total as usize);
        for class in SpeedClass::ALL {
            let count = self.counts.get(class) as usize;
            if count > 0 {
                class.number_of_steps(walking_time)?;
            }
            speeds.extend(std::iter::repeat_n(class, count));
        }
        Ok((walking_time, speeds))
    }
}

/// Immutable collection of generated walkers.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    walking_time: u32,
    walkers: Vec<Walker>,
}

/// Renderer-facing view of one walker.
#[derive(Debug, Clone, Copy)]
pub struct WalkerSummary<'a> {
    /// 1-based display number.
    pub number: usize,
    pub speed: SpeedClass,
    pub path: &'a Path,
    pub obstacle: Obstacle,
    pub start: IVec2,
    pub end: IVec2,
    pub classification: Classification,
}

impl Scene {
    pub fn walking_time(&self) -> u32 {
        self.walking_time
    }

    pub fn walkers(&self) -> &[Walker] {
        &self.walkers
    }

    pub fn len(&self) -> usize {
        self.walkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walkers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Walker> {
        self.walkers.iter()
    }

    pub fn total_rejected_steps(&self) -> usize {
        self.walkers.iter().map(Walker::rejected_steps).sum()
    }

    /// Summaries of every walker, classified with `classifier`, in scene order.
    pub fn summaries(&self, classifier: &Classifier) -> Vec<WalkerSummary<'_>> {
        self.walkers
            .iter()
            .enumerate()
            .map(|(i, w)| WalkerSummary {
                number: i + 1,
                speed: w.speed(),
                path: w.path(),
                obstacle: *w.obstacle(),
                start: w.start(),
                end: w.end(),
                classification: w.classify(classifier),
            })
            .collect()
    }

    /// 1-based display numbers of walkers classified as long-distance.
    pub fn long_distance_walkers(&self, classifier: &Classifier) -> Vec<usize> {
        self.walkers
            .iter()
            .enumerate()
            .filter(|(_, w)| w.classify(classifier) == Classification::LongDistance)
            .map(|(i, _)| i + 1)
            .collect()
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a Walker;
    type IntoIter = std::slice::Iter<'a, Walker>;

    fn into_iter(self) -> Self::IntoIter {
        self.walkers.iter()
    }
}

/// Where each walker's random draws come from.
enum WalkerStreams<'a, R> {
    /// One stream shared by all walkers, consumed in scene order.
    Shared(&'a mut R),
    /// Independent stream per walker derived from a base seed.
    Seeded(u64),
}

#[derive(Debug, Default)]
pub struct SceneBuilder {
    /// Generator shared by all walkers in a scene.
    pub generator: WalkGenerator,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_new(walk_config: WalkConfig) -> Result<Self> {
        Ok(Self {
            generator: WalkGenerator::try_new(walk_config)?,
        })
    }

    pub fn with_generator(generator: WalkGenerator) -> Self {
        Self { generator }
    }

    /// Builds a scene drawing every walker from the shared `rng`.
    pub fn build<R: RngCore>(&self, config: &SceneConfig, rng: &mut R) -> Result<Scene> {
        self.build_with_events(config, rng, &mut ())
    }

    pub fn build_with_events<R: RngCore>(
        &self,
        config: &SceneConfig,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Result<Scene> {
        self.build_internal(config, sink, WalkerStreams::Shared(rng))
    }

    /// Builds a scene where walker `i` draws from its own stream seeded with
    /// [`seed_for_walker`]`(seed, i)`.
    pub fn build_seeded(&self, config: &SceneConfig, seed: u64) -> Result<Scene> {
        self.build_seeded_with_events(config, seed, &mut ())
    }

    pub fn build_seeded_with_events(
        &self,
        config: &SceneConfig,
        seed: u64,
        sink: &mut dyn EventSink,
    ) -> Result<Scene> {
        self.build_internal::<StdRng>(config, sink, WalkerStreams::Seeded(seed))
    }

    fn build_internal<R: RngCore>(
        &self,
        config: &SceneConfig,
        sink: &mut dyn EventSink,
        mut streams: WalkerStreams<'_, R>,
    ) -> Result<Scene> {
        let (walking_time, speeds) = config.resolve()?;

        if sink.wants(WalkEventKind::SceneStarted) {
            sink.send(WalkEvent::SceneStarted {
                walking_time,
                walker_count: speeds.len(),
            });
        }

        let mut walkers = Vec::with_capacity(speeds.len());
        for (index, speed) in speeds.into_iter().enumerate() {
            let walker = match &mut streams {
                WalkerStreams::Shared(rng) => Walker::generate_with_events(
                    speed,
                    walking_time,
                    &self.generator,
                    &mut **rng,
                    sink,
                    index,
                )?,
                WalkerStreams::Seeded(seed) => {
                    let mut rng = StdRng::seed_from_u64(seed_for_walker(*seed, index));
                    Walker::generate_with_events(
                        speed,
                        walking_time,
                        &self.generator,
                        &mut rng,
                        sink,
                        index,
                    )?
                }
            };
            debug!(
                "Walker {} ({}): {} points, start {:?}, end {:?}, {} rejected steps.",
                index + 1,
                speed,
                walker.path().len(),
                walker.start(),
                walker.end(),
                walker.rejected_steps(),
            );
            if walker.rejected_steps() > walker.path().len() {
                warn!(
                    "Walker {} rejected {} steps for a {}-point path; obstacle shape may be too large.",
                    index + 1,
                    walker.rejected_steps(),
                    walker.path().len(),
                );
            }
            walkers.push(walker);
        }

        let scene = Scene {
            walking_time,
            walkers,
        };
        info!(
            "Scene built: {} walkers, walking_time {}, {} rejected steps.",
            scene.len(),
            walking_time,
            scene.total_rejected_steps(),
        );

        if sink.wants(WalkEventKind::SceneFinished) {
            sink.send(WalkEvent::SceneFinished {
                walker_count: scene.len(),
                rejected_steps: scene.total_rejected_steps(),
            });
        }

        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::error::Error;
    use crate::events::VecSink;

    fn config(walking_time: i64, usual: i64, fast: i64, running: i64) -> SceneConfig {
        SceneConfig::new(walking_time).with_counts(WalkerCounts::new(usual, fast, running))
    }

    fn build(cfg: &SceneConfig) -> Result<Scene> {
        SceneBuilder::new().build(cfg, &mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn rejects_non_positive_walking_time() {
        let err = build(&config(0, 1, 0, 0)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig(ConfigError::NonPositiveWalkingTime(0))
        ));
    }

    #[test]
    fn rejects_negative_counts_per_class() {
        for (cfg, class) in [
            (config(1, 1, 1, -1), SpeedClass::Running),
            (config(1, 1, -1, 1), SpeedClass::Fast),
            (config(1, -1, 1, 1), SpeedClass::Usual),
        ] {
            let err = build(&cfg).unwrap_err();
            assert!(
                matches!(
                    err,
                    Error::InvalidConfig(ConfigError::NegativeCount { class: c, count: -1 }) if c == class
                ),
                "unexpected error {err:?}"
            );
        }
    }

    #[test]
    fn rejects_empty_and_oversized_scenes() {
        assert!(matches!(
            build(&config(1, 0, 0, 0)).unwrap_err(),
            Error::InvalidConfig(ConfigError::NoWalkers)
        ));
        assert!(matches!(
            build(&config(1, 10, 2, 1)).unwrap_err(),
            Error::InvalidConfig(ConfigError::TooManyWalkers { count: 13, max: 12 })
        ));
        assert!(matches!(
            build(&config(1, 10, 2, 2)).unwrap_err(),
            Error::InvalidConfig(ConfigError::TooManyWalkers { count: 14, .. })
        ));
    }

    #[test]
    fn rejects_walking_time_that_overflows_step_count() {
        let err = config(i64::from(u32::MAX), 0, 0, 1).validate().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig(ConfigError::StepCountOverflow {
                class: SpeedClass::Running,
                ..
            })
        ));
        let err = config(i64::MAX, 1, 0, 0).validate().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig(ConfigError::StepCountOverflow { .. })
        ));
    }

    #[test]
    fn single_usual_walker_with_one_time_unit() {
        let scene = build(&config(1, 1, 0, 0)).unwrap();
        assert_eq!(scene.len(), 1);

        let walker = &scene.walkers()[0];
        let path = walker.path().points();
        assert_eq!(path.len(), 2);
        assert!((0..2).contains(&path[0].x) && (0..2).contains(&path[0].y));
        let d = path[1] - path[0];
        assert_eq!(d.x.abs() + d.y.abs(), 1);
        assert!(!walker.obstacle().contains_strict(path[1]));
    }

    #[test]
    fn walkers_are_ordered_by_speed_class() {
        let scene = build(&config(3, 2, 1, 2)).unwrap();
        let speeds: Vec<_> = scene.iter().map(Walker::speed).collect();
        assert_eq!(
            speeds,
            vec![
                SpeedClass::Usual,
                SpeedClass::Usual,
                SpeedClass::Fast,
                SpeedClass::Running,
                SpeedClass::Running,
            ]
        );
        for w in &scene {
            assert_eq!(w.path().len(), 3 * w.speed().multiplier() as usize + 1);
        }
    }

    #[test]
    fn full_scene_upholds_path_invariants() {
        let scene = build(&config(25, 4, 4, 4)).unwrap();
        assert_eq!(scene.len(), MAX_WALKERS);
        for w in &scene {
            for pair in w.path().points().windows(2) {
                let d = pair[1] - pair[0];
                assert!(
                    (d.x == 0 && d.y.abs() == 1) || (d.y == 0 && d.x.abs() == 1),
                    "bad step {pair:?}"
                );
            }
            assert!(w
                .path()
                .iter()
                .skip(1)
                .all(|p| !w.obstacle().contains_strict(*p)));
        }
    }

    #[test]
    fn same_seed_reproduces_scene() {
        let cfg = config(2, 1, 0, 0);
        let a = SceneBuilder::new()
            .build(&cfg, &mut StdRng::seed_from_u64(99))
            .unwrap();
        let b = SceneBuilder::new()
            .build(&cfg, &mut StdRng::seed_from_u64(99))
            .unwrap();
        assert_eq!(a.walkers()[0].path(), b.walkers()[0].path());
        assert_eq!(a, b);

        let c = SceneBuilder::new().build_seeded(&cfg, 99).unwrap();
        let d = SceneBuilder::new().build_seeded(&cfg, 99).unwrap();
        assert_eq!(c, d);
    }

    #[test]
    fn seeded_walkers_do_not_depend_on_later_walkers() {
        let builder = SceneBuilder::new();
        let alone = builder.build_seeded(&config(5, 1, 0, 0), 7).unwrap();
        let crowded = builder.build_seeded(&config(5, 1, 0, 3), 7).unwrap();
        assert_eq!(crowded.len(), 4);
        assert_eq!(alone.walkers()[0], crowded.walkers()[0]);
        assert_ne!(crowded.walkers()[1].path(), crowded.walkers()[2].path());
    }

    #[test]
    fn summaries_and_long_distance_numbers_follow_classifier() {
        let scene = build(&config(10, 2, 1, 0)).unwrap();

        let everything_far = Classifier::new(f64::MIN_POSITIVE);
        let far: Vec<usize> = scene
            .iter()
            .enumerate()
            .filter(|(_, w)| w.start() != w.end())
            .map(|(i, _)| i + 1)
            .collect();
        assert_eq!(scene.long_distance_walkers(&everything_far), far);

        let nothing_far = Classifier::new(1.0e9);
        assert!(scene.long_distance_walkers(&nothing_far).is_empty());

        let summaries = scene.summaries(&nothing_far);
        assert_eq!(summaries.len(), 3);
        for (s, w) in summaries.iter().zip(scene.iter()) {
            assert_eq!(s.speed, w.speed());
            assert_eq!(s.start, w.start());
            assert_eq!(s.end, w.end());
            assert_eq!(s.obstacle, *w.obstacle());
            assert_eq!(s.path.len(), w.path().len());
            assert_eq!(s.classification, Classification::Normal);
        }
        assert_eq!(
            summaries.iter().map(|s| s.number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn events_are_emitted_in_scene_order() {
        let mut sink = VecSink::only([
            WalkEventKind::SceneStarted,
            WalkEventKind::WalkerStarted,
            WalkEventKind::WalkerFinished,
            WalkEventKind::SceneFinished,
        ]);
        let scene = SceneBuilder::new()
            .build_seeded_with_events(&config(4, 1, 1, 0), 3, &mut sink)
            .unwrap();

        let kinds: Vec<_> = sink.as_slice().iter().map(WalkEvent::kind).collect();
        assert_eq!(
            kinds,
            vec![
                WalkEventKind::SceneStarted,
                WalkEventKind::WalkerStarted,
                WalkEventKind::WalkerFinished,
                WalkEventKind::WalkerStarted,
                WalkEventKind::WalkerFinished,
                WalkEventKind::SceneFinished,
            ]
        );
        assert_eq!(
            sink.as_slice().last(),
            Some(&WalkEvent::SceneFinished {
                walker_count: 2,
                rejected_steps: scene.total_rejected_steps(),
            })
        );
    }
}
