//! Quest Transition Events
//!
//! ## Overview
//!
//! A [`QuestEvent`] is produced exactly once for every tier change and never
//! for an observation that leaves the tier where it was. Events are small
//! `Copy` values: once handed to a sink they belong to the receiver and hold
//! no reference back into the session.
//!
//! ```text
//! Event layout:
//! ├── previous:  1 byte  (tier)
//! ├── current:   1 byte  (tier)
//! ├── cause:     1 byte
//! ├── score:     4 bytes (f32, 0-100)
//! └── timestamp: 8 bytes (ms)
//! Total with padding: 24 bytes
//! ```
//!
//! ## Ordering
//!
//! A session delivers events in the order the transitions happened. Consumers
//! that only care about the latest tier can keep `current` of the last event
//! they saw.

use core::fmt;

use crate::{quest::QuestTier, time::Timestamp};

/// Why a transition happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum TransitionCause {
    /// Score held above a higher tier's threshold for its dwell
    Promoted = 0,
    /// Score held below the current tier's release level for its dwell
    Demoted = 1,
    /// No qualifying observation within the abandonment timeout
    Abandoned = 2,
}

impl TransitionCause {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            TransitionCause::Promoted => "promoted",
            TransitionCause::Demoted => "demoted",
            TransitionCause::Abandoned => "abandoned",
        }
    }
}

/// A tier change
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestEvent {
    /// Tier before the change
    pub previous: QuestTier,
    /// Tier after the change
    pub current: QuestTier,
    /// Score of the observation that caused it (last score for timeouts)
    pub score: f32,
    /// When it happened
    pub timestamp: Timestamp,
    /// Why it happened
    pub cause: TransitionCause,
}

impl QuestEvent {
    /// True for the transition into `Discovered`
    pub fn is_discovery(&self) -> bool {
        self.current == QuestTier::Discovered
    }

    /// True if the quest moved up
    pub fn is_promotion(&self) -> bool {
        self.cause == TransitionCause::Promoted
    }

    /// True if the quest ended up with nothing usable
    pub fn is_loss(&self) -> bool {
        matches!(self.current, QuestTier::Lost | QuestTier::Abandoned)
    }
}

impl fmt::Display for QuestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({}, score {:.1}, t={})",
            self.previous,
            self.current,
            self.cause.name(),
            self.score,
            self.timestamp
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for QuestEvent {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{} -> {} ({}) at {}",
            self.previous.name(),
            self.current.name(),
            self.cause.name(),
            self.timestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(previous: QuestTier, current: QuestTier, cause: TransitionCause) -> QuestEvent {
        QuestEvent {
            previous,
            current,
            score: 91.5,
            timestamp: 7_000,
            cause,
        }
    }

    #[test]
    fn classification() {
        let found = event(QuestTier::Locked, QuestTier::Discovered, TransitionCause::Promoted);
        assert!(found.is_discovery());
        assert!(found.is_promotion());
        assert!(!found.is_loss());

        let gone = event(QuestTier::Acquiring, QuestTier::Abandoned, TransitionCause::Abandoned);
        assert!(gone.is_loss());
        assert!(!gone.is_promotion());
    }

    #[test]
    fn display() {
        let e = event(QuestTier::Locked, QuestTier::Discovered, TransitionCause::Promoted);
        assert_eq!(e.to_string(), "locked -> discovered (promoted, score 91.5, t=7000)");
    }

    #[test]
    fn event_is_small() {
        assert!(core::mem::size_of::<QuestEvent>() <= 24);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_snake_case() {
        let e = event(QuestTier::Lost, QuestTier::Acquiring, TransitionCause::Promoted);
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"previous\":\"lost\""));
        assert!(json.contains("\"cause\":\"promoted\""));
    }
}
