//! Event types and sinks for observing scene construction.
//!
//! This module defines [`WalkEvent`] and a set of sinks to collect or forward events
//! while a [`crate::scene::SceneBuilder`] generates walkers. Sinks may filter by
//! [`WalkEventKind`] so that high-volume events such as [`WalkEvent::StepRejected`]
//! are only constructed when someone listens.
use glam::IVec2;

use crate::obstacle::Obstacle;
use crate::walker::SpeedClass;

/// Describes events emitted while building a scene.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum WalkEvent {
    /// Emitted once before the first walker is generated.
    SceneStarted {
        /// Shared walking time of every walker.
        walking_time: u32,
        /// Number of walkers that will be generated.
        walker_count: usize,
    },

    /// Emitted after a walker's start point and obstacle are fixed.
    WalkerStarted {
        /// Index of the walker in the scene.
        index: usize,
        speed: SpeedClass,
        start: IVec2,
        obstacle: Obstacle,
    },

    /// Emitted each time a candidate step is discarded because it lies inside the obstacle.
    StepRejected {
        /// Index of the walker in the scene.
        index: usize,
        /// Path index being generated.
        step: usize,
        /// The rejected candidate point.
        candidate: IVec2,
    },

    /// Emitted when a walker's path is complete.
    WalkerFinished {
        /// Index of the walker in the scene.
        index: usize,
        speed: SpeedClass,
        end: IVec2,
        /// Total candidate steps discarded for this walker.
        rejected_steps: usize,
    },

    /// Emitted once after all walkers are generated.
    SceneFinished {
        walker_count: usize,
        /// Total candidate steps discarded across the scene.
        rejected_steps: usize,
    },
}

/// Discriminant of [`WalkEvent`] used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkEventKind {
    SceneStarted,
    WalkerStarted,
    StepRejected,
    WalkerFinished,
    SceneFinished,
}

impl WalkEvent {
    pub fn kind(&self) -> WalkEventKind {
        match self {
            WalkEvent::SceneStarted { .. } => WalkEventKind::SceneStarted,
            WalkEvent::WalkerStarted { .. } => WalkEventKind::WalkerStarted,
            WalkEvent::StepRejected { .. } => WalkEventKind::StepRejected,
            WalkEvent::WalkerFinished { .. } => WalkEventKind::WalkerFinished,
            WalkEvent::SceneFinished { .. } => WalkEventKind::SceneFinished,
        }
    }
}

/// A generic event sink that accepts [`WalkEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: WalkEvent);

    /// Whether events of `kind` should be built and sent at all.
    fn wants(&self, _kind: WalkEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: WalkEvent) {}

    #[inline]
    fn wants(&self, _kind: WalkEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(WalkEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(WalkEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(WalkEvent),
{
    #[inline]
    fn send(&mut self, event: WalkEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally restricted to some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<WalkEvent>,
    only: Option<Vec<WalkEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect only events whose kind is listed.
    pub fn only(kinds: impl IntoIterator<Item = WalkEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<WalkEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[WalkEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: WalkEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: WalkEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}
