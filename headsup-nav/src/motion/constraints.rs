//! Vertical operating bounds (floor/ceiling) for altitude changes

use crate::core::types::Direction;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Floor and ceiling heights for a flight, fixed once validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionBounds {
    /// Lowest allowed height (cm)
    pub floor: i32,

    /// Highest allowed height (cm)
    pub ceiling: i32,
}

/// Outcome of checking a proposed vertical move against a boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsDecision {
    /// Request stays inside the bounds, issue it unchanged
    Proceed(u32),

    /// Request would cross the boundary; shortened to land exactly on it
    Clamped {
        /// Amount the caller asked for
        requested: u32,
        /// Amount that reaches the boundary
        allowed: u32,
    },

    /// Already sitting on the boundary, nothing to issue
    AtBoundary,

    /// Already past the boundary: discard the request and move back by this
    /// amount in the opposite direction
    Correction(u32),
}

impl BoundsDecision {
    /// Magnitude to issue (cm)
    pub fn amount(&self) -> u32 {
        match *self {
            Self::Proceed(cm) | Self::Correction(cm) => cm,
            Self::Clamped { allowed, .. } => allowed,
            Self::AtBoundary => 0,
        }
    }

    /// Check if the caller's request was overridden by a corrective move
    pub fn is_correction(&self) -> bool {
        matches!(self, Self::Correction(_))
    }

    /// Direction to issue given the direction the caller asked for
    pub fn direction(&self, requested: Direction) -> Direction {
        if self.is_correction() {
            requested.opposite()
        } else {
            requested
        }
    }
}

impl MissionBounds {
    /// Create validated bounds
    ///
    /// # Errors
    /// `Error::Config` unless `0 <= floor < ceiling`
    pub fn new(floor: i32, ceiling: i32) -> Result<Self> {
        if floor >= ceiling {
            return Err(Error::Config(format!(
                "floor ({} cm) must be below ceiling ({} cm)",
                floor, ceiling
            )));
        }
        if floor < 0 {
            return Err(Error::Config(format!(
                "floor must not be negative, got {} cm",
                floor
            )));
        }
        Ok(Self { floor, ceiling })
    }

    /// Check a climb of `requested` cm from `current`
    pub fn ascend(&self, requested: u32, current: i32) -> BoundsDecision {
        clamp_ascend(requested, current, self.ceiling)
    }

    /// Check a descent of `requested` cm from `current`
    pub fn descend(&self, requested: u32, current: i32) -> BoundsDecision {
        clamp_descend(requested, current, self.floor)
    }

    /// Check if a height lies within the bounds (inclusive)
    pub fn contains(&self, height: i32) -> bool {
        (self.floor..=self.ceiling).contains(&height)
    }
}

/// Limit a climb so the vehicle never ends above `ceiling`
pub fn clamp_ascend(requested: u32, current: i32, ceiling: i32) -> BoundsDecision {
    let current = i64::from(current);
    let ceiling = i64::from(ceiling);

    if current > ceiling {
        BoundsDecision::Correction((current - ceiling) as u32)
    } else if current == ceiling {
        BoundsDecision::AtBoundary
    } else if current + i64::from(requested) > ceiling {
        BoundsDecision::Clamped {
            requested,
            allowed: (ceiling - current) as u32,
        }
    } else {
        BoundsDecision::Proceed(requested)
    }
}

/// Limit a descent so the vehicle never ends below `floor`
pub fn clamp_descend(requested: u32, current: i32, floor: i32) -> BoundsDecision {
    let current = i64::from(current);
    let floor = i64::from(floor);

    if current < floor {
        BoundsDecision::Correction((floor - current) as u32)
    } else if current == floor {
        BoundsDecision::AtBoundary
    } else if current - i64::from(requested) < floor {
        BoundsDecision::Clamped {
            requested,
            allowed: (current - floor) as u32,
        }
    } else {
        BoundsDecision::Proceed(requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascend_at_ceiling_is_noop() {
        for requested in [0, 1, 19, 20, 100, 500] {
            let decision = clamp_ascend(requested, 160, 160);
            assert_eq!(decision, BoundsDecision::AtBoundary);
            assert_eq!(decision.amount(), 0);
        }
    }

    #[test]
    fn test_ascend_never_crosses_ceiling() {
        let ceiling = 160;
        for current in (0..=ceiling).step_by(7) {
            for requested in (0..300).step_by(13) {
                let decision = clamp_ascend(requested, current, ceiling);
                assert!(!decision.is_correction());
                assert!(current + decision.amount() as i32 <= ceiling);
            }
        }
    }

    #[test]
    fn test_ascend_clamps_to_ceiling() {
        let decision = clamp_ascend(50, 140, 160);
        assert_eq!(
            decision,
            BoundsDecision::Clamped {
                requested: 50,
                allowed: 20
            }
        );
        assert_eq!(decision.direction(Direction::Up), Direction::Up);
    }

    #[test]
    fn test_ascend_within_bounds_unchanged() {
        assert_eq!(clamp_ascend(30, 100, 160), BoundsDecision::Proceed(30));
        // Landing exactly on the ceiling is not a clamp
        assert_eq!(clamp_ascend(60, 100, 160), BoundsDecision::Proceed(60));
    }

    #[test]
    fn test_ascend_above_ceiling_corrects_down() {
        let decision = clamp_ascend(10, 170, 160);
        assert_eq!(decision, BoundsDecision::Correction(10));
        assert_eq!(decision.direction(Direction::Up), Direction::Down);
        assert_eq!(decision.amount(), 10);
    }

    #[test]
    fn test_descend_cases() {
        assert_eq!(clamp_descend(20, 50, 50), BoundsDecision::AtBoundary);
        assert_eq!(clamp_descend(30, 100, 50), BoundsDecision::Proceed(30));
        assert_eq!(
            clamp_descend(80, 100, 50),
            BoundsDecision::Clamped {
                requested: 80,
                allowed: 50
            }
        );

        let decision = clamp_descend(40, 35, 50);
        assert_eq!(decision, BoundsDecision::Correction(15));
        assert_eq!(decision.direction(Direction::Down), Direction::Up);
    }

    #[test]
    fn test_descend_never_crosses_floor() {
        let floor = 50;
        for current in (floor..=200).step_by(9) {
            for requested in (0..300).step_by(11) {
                let decision = clamp_descend(requested, current, floor);
                assert!(current - decision.amount() as i32 >= floor);
            }
        }
    }

    #[test]
    fn test_bounds_validation() {
        assert!(MissionBounds::new(50, 160).is_ok());
        assert!(matches!(MissionBounds::new(160, 160), Err(Error::Config(_))));
        assert!(matches!(MissionBounds::new(200, 100), Err(Error::Config(_))));
        assert!(matches!(MissionBounds::new(-10, 100), Err(Error::Config(_))));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = MissionBounds::new(50, 160).unwrap();
        assert!(bounds.contains(50));
        assert!(bounds.contains(160));
        assert!(!bounds.contains(49));
        assert!(!bounds.contains(161));
    }
}
