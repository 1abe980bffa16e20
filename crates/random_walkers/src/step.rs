//! Step sampling for discrete walks on the integer lattice.
//!
//! A [`StepSampling`] strategy proposes one of the four cardinal [`Direction`]s per
//! call. The walk generator applies the returned direction and may discard it if the
//! resulting point is blocked, so samplers must be stateless with respect to the walk.
use glam::IVec2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the four unit moves on the lattice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    West,
    North,
    South,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::North,
        Direction::South,
    ];

    /// Unit offset for this direction. North is +y.
    #[inline]
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::East => IVec2::X,
            Direction::West => IVec2::NEG_X,
            Direction::North => IVec2::Y,
            Direction::South => IVec2::NEG_Y,
        }
    }

    /// Applies this direction to `from`.
    #[inline]
    pub fn step_from(self, from: IVec2) -> IVec2 {
        from + self.offset()
    }
}

/// Trait for step sampling.
pub trait StepSampling: Send + Sync {
    fn next_step(&self, rng: &mut dyn RngCore) -> Direction;
}

/// Uniform i.i.d. choice among the four cardinal directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformStepSampling;

impl UniformStepSampling {
    pub fn new() -> Self {
        Self
    }
}

impl StepSampling for UniformStepSampling {
    fn next_step(&self, rng: &mut dyn RngCore) -> Direction {
        // Top two bits select one of four equally likely directions.
        Direction::ALL[(rng.next_u32() >> 30) as usize]
    }
}

/// Draw an integer uniformly from `[0, bound)`.
///
/// Uses widening multiplication with rejection of the biased low range, so every
/// value is equally likely regardless of `bound`.
#[inline]
pub(crate) fn rand_below(rng: &mut dyn RngCore, bound: u32) -> u32 {
    debug_assert!(bound > 0, "bound must be > 0");
    let threshold = bound.wrapping_neg() % bound;
    loop {
        let m = u64::from(rng.next_u32()) * u64::from(bound);
        if (m as u32) >= threshold {
            return (m >> 32) as u32;
        }
    }
}
