//! Minimum-move compensation
//!
//! The vehicle refuses (or executes unreliably) moves shorter than its
//! minimum travel distance. A short move is therefore split into two legs
//! that are both legal:
//!
//! ```text
//! requested: up 10          (min move 20)
//! leg 1:     down 20        overshoot the other way by the minimum
//! leg 2:     up 30          come back past the start by the requested amount
//! net:       +10
//! ```

use crate::core::types::{Command, Direction};

/// Minimum reliable travel distance of the vehicle (cm)
pub const MIN_MOVE_CM: u32 = 20;

/// Legs to issue for one logical move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compensation {
    /// Zero-length move, nothing to issue
    Noop,

    /// Move is already legal
    Direct(Command),

    /// Move split into overshoot and return legs
    Split {
        /// Opposite-direction leg, issued first
        overshoot: Command,
        /// Original-direction leg, issued second
        ret: Command,
    },
}

impl Compensation {
    /// Commands in issue order
    pub fn legs(&self) -> Vec<Command> {
        match *self {
            Self::Noop => Vec::new(),
            Self::Direct(cmd) => vec![cmd],
            Self::Split { overshoot, ret } => vec![overshoot, ret],
        }
    }

    /// Check if the move had to be split
    pub fn is_split(&self) -> bool {
        matches!(self, Self::Split { .. })
    }
}

/// Split `amount` cm in `direction` into legs no shorter than `min_move`
pub fn compensate(direction: Direction, amount: u32, min_move: u32) -> Compensation {
    if amount == 0 {
        Compensation::Noop
    } else if amount >= min_move {
        Compensation::Direct(Command::move_by(direction, amount))
    } else {
        Compensation::Split {
            overshoot: Command::move_by(direction.opposite(), min_move),
            ret: Command::move_by(direction, amount + min_move),
        }
    }
}
