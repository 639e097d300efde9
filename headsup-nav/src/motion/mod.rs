//! Motion safety: vertical bounds and minimum-move compensation

pub mod compensator;
pub mod constraints;

pub use compensator::{Compensation, MIN_MOVE_CM, compensate};
pub use constraints::{BoundsDecision, MissionBounds, clamp_ascend, clamp_descend};
