//! Quest State Machine
//!
//! ## Tiers
//!
//! ```text
//!            promote                promote               promote
//!   Lost ───────────▶ Acquiring ───────────▶ Locked ───────────▶ Discovered
//!    ▲    ◀───────────     │     ◀───────────   │                  (sticky)
//!    │       demote        │        demote      │
//!    └─────────────────────┴────────────────────┘
//!                          │ timeout without a qualifying observation
//!                          ▼
//!                      Abandoned (terminal until reset)
//! ```
//!
//! ## Hysteresis
//!
//! Each scored tier (`Acquiring`, `Locked`, `Discovered`) has a boundary
//! with two integer counters:
//!
//! - **rise**: consecutive observations with `score >= threshold`
//! - **fall**: consecutive observations with `score < threshold - margin`
//!
//! An observation inside the band `[threshold - margin, threshold)` resets
//! both. A tier is entered when its rise counter reaches the boundary's dwell
//! count and left when its fall counter does, so a score oscillating across a
//! boundary faster than the dwell never moves the quest.
//!
//! When several boundaries are satisfied at once the quest promotes straight
//! to the highest one. Demotion walks down one boundary at a time and stops
//! at the first whose fall counter has not reached its dwell, so every
//! boundary crossed on the way down has held for its own dwell count.
//!
//! ## Observation time
//!
//! Channels only need increasing timestamps among their own samples, so a
//! score can arrive stamped earlier than one already seen. Observation time
//! is clamped to the latest seen; the abandonment clock, `entered_at` and
//! event timestamps never run backwards.
//!
//! ## Terminal and sticky tiers
//!
//! `Discovered` never regresses and `Abandoned` accepts nothing; both are left
//! only through [`QuestMachine::reset`], which emits no event.
//!
//! ## Abandonment clock
//!
//! The clock is armed by the first observation or poll (or by a reset). An
//! observation is *qualifying* when its score meets the `Acquiring`
//! threshold. If more than `abandon_after_ms` pass after the later of arming
//! and the last qualifying observation, the next observation or poll abandons
//! the quest.

use core::fmt;

use crate::{
    config::{DwellCounts, QuestConfig, TierThresholds},
    events::{QuestEvent, TransitionCause},
    time::{elapsed_ms, Timestamp},
};

/// Quest progression tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum QuestTier {
    /// Nothing usable heard
    Lost = 0,
    /// Signal present, quality building
    Acquiring = 1,
    /// Stable, usable quality
    Locked = 2,
    /// Target quality reached; sticky
    Discovered = 3,
    /// Timed out; terminal until reset
    Abandoned = 4,
}

impl QuestTier {
    /// Tiers with a threshold, lowest first
    pub const SCORED: [QuestTier; 3] = [QuestTier::Acquiring, QuestTier::Locked, QuestTier::Discovered];

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            QuestTier::Lost => "lost",
            QuestTier::Acquiring => "acquiring",
            QuestTier::Locked => "locked",
            QuestTier::Discovered => "discovered",
            QuestTier::Abandoned => "abandoned",
        }
    }

    /// True if no observation can move the quest out of this tier
    pub const fn is_final(&self) -> bool {
        matches!(self, QuestTier::Discovered | QuestTier::Abandoned)
    }

    fn boundary(&self) -> Option<usize> {
        match self {
            QuestTier::Acquiring => Some(0),
            QuestTier::Locked => Some(1),
            QuestTier::Discovered => Some(2),
            QuestTier::Lost | QuestTier::Abandoned => None,
        }
    }
}

impl fmt::Display for QuestTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current position of a quest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestState {
    /// Active tier
    pub tier: QuestTier,
    /// When the tier was entered
    pub entered_at: Timestamp,
    /// Consecutive observations meeting the `Acquiring` threshold
    pub qualifying_streak: u32,
}

impl QuestState {
    fn initial(at: Timestamp) -> Self {
        Self {
            tier: QuestTier::Lost,
            entered_at: at,
            qualifying_streak: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BoundaryCounter {
    rise: u16,
    fall: u16,
}

/// Tier tracker with dwell-count hysteresis and timeout abandonment
#[derive(Debug, Clone)]
pub struct QuestMachine {
    thresholds: TierThresholds,
    dwell: DwellCounts,
    release_margin: f32,
    abandon_after_ms: u64,
    state: QuestState,
    counters: [BoundaryCounter; 3],
    armed_at: Option<Timestamp>,
    last_qualifying: Option<Timestamp>,
    latest: Timestamp,
    last_score: f32,
}

impl QuestMachine {
    /// Machine in `Lost` with the clock disarmed
    pub fn new(config: &QuestConfig) -> Self {
        Self {
            thresholds: *config.thresholds(),
            dwell: *config.dwell(),
            release_margin: config.release_margin(),
            abandon_after_ms: config.abandon_after_ms(),
            state: QuestState::initial(0),
            counters: [BoundaryCounter::default(); 3],
            armed_at: None,
            last_qualifying: None,
            latest: 0,
            last_score: 0.0,
        }
    }

    /// Current state
    pub fn state(&self) -> QuestState {
        self.state
    }

    /// Current tier
    pub fn tier(&self) -> QuestTier {
        self.state.tier
    }

    /// Score of the most recent observation
    pub fn last_score(&self) -> f32 {
        self.last_score
    }

    /// Consecutive observations at or above a scored tier's threshold
    pub fn rise_count(&self, tier: QuestTier) -> u16 {
        tier.boundary().map_or(0, |b| self.counters[b].rise)
    }

    /// Consecutive observations below a scored tier's release level
    pub fn fall_count(&self, tier: QuestTier) -> u16 {
        tier.boundary().map_or(0, |b| self.counters[b].fall)
    }

    /// Feed one score; returns the transition it caused, if any
    pub fn observe(&mut self, score: f32, at: Timestamp) -> Option<QuestEvent> {
        if self.state.tier.is_final() {
            return None;
        }

        let at = self.advance(at);
        self.last_score = score;
        let armed_at = *self.armed_at.get_or_insert(at);

        if self.timed_out(armed_at, at) {
            return self.transition(QuestTier::Abandoned, score, at, TransitionCause::Abandoned);
        }

        self.count(score);

        if score >= self.thresholds.acquiring {
            self.last_qualifying = Some(at);
            self.state.qualifying_streak = self.state.qualifying_streak.saturating_add(1);
        } else {
            self.state.qualifying_streak = 0;
        }

        if let Some(target) = self.promotion() {
            return self.transition(target, score, at, TransitionCause::Promoted);
        }

        if let Some(target) = self.demotion() {
            return self.transition(target, score, at, TransitionCause::Demoted);
        }

        None
    }

    /// Check the abandonment clock without a new observation
    pub fn poll(&mut self, now: Timestamp) -> Option<QuestEvent> {
        if self.state.tier.is_final() {
            return None;
        }

        let now = self.advance(now);
        let armed_at = *self.armed_at.get_or_insert(now);
        if self.timed_out(armed_at, now) {
            let score = self.last_score;
            return self.transition(QuestTier::Abandoned, score, now, TransitionCause::Abandoned);
        }

        None
    }

    /// Return to `Lost`, clear all counters and restart the clock at `at`
    pub fn reset(&mut self, at: Timestamp) {
        log_debug!("quest reset from {} at {}", self.state.tier, at);

        self.state = QuestState::initial(at);
        self.counters = [BoundaryCounter::default(); 3];
        self.armed_at = Some(at);
        self.last_qualifying = None;
        self.latest = at;
        self.last_score = 0.0;
    }

    fn advance(&mut self, at: Timestamp) -> Timestamp {
        self.latest = self.latest.max(at);
        self.latest
    }

    fn timed_out(&self, armed_at: Timestamp, now: Timestamp) -> bool {
        let reference = match self.last_qualifying {
            Some(last) => last.max(armed_at),
            None => armed_at,
        };
        elapsed_ms(reference, now) > self.abandon_after_ms
    }

    fn count(&mut self, score: f32) {
        for (boundary, tier) in QuestTier::SCORED.iter().enumerate() {
            let threshold = self.thresholds.threshold(*tier).unwrap_or(f32::INFINITY);
            let counter = &mut self.counters[boundary];

            if score >= threshold {
                counter.rise = counter.rise.saturating_add(1);
                counter.fall = 0;
            } else if score < threshold - self.release_margin {
                counter.fall = counter.fall.saturating_add(1);
                counter.rise = 0;
            } else {
                counter.rise = 0;
                counter.fall = 0;
            }
        }
    }

    fn promotion(&self) -> Option<QuestTier> {
        QuestTier::SCORED
            .iter()
            .rev()
            .copied()
            .filter(|tier| *tier > self.state.tier)
            .find(|tier| {
                let dwell = self.dwell.dwell(*tier).unwrap_or(u16::MAX);
                tier.boundary().map_or(false, |b| self.counters[b].rise >= dwell)
            })
    }

    fn demotion(&self) -> Option<QuestTier> {
        let current = self.state.tier;
        if !matches!(current, QuestTier::Acquiring | QuestTier::Locked) {
            return None;
        }

        let released = |tier: QuestTier| match (tier.boundary(), self.dwell.dwell(tier)) {
            (Some(b), Some(dwell)) => self.counters[b].fall >= dwell,
            _ => false,
        };
        if !released(current) {
            return None;
        }

        // Highest boundary below `current` still holding, else Lost
        let target = QuestTier::SCORED
            .iter()
            .rev()
            .copied()
            .filter(|tier| *tier < current)
            .find(|tier| !released(*tier))
            .unwrap_or(QuestTier::Lost);
        Some(target)
    }

    fn transition(
        &mut self,
        to: QuestTier,
        score: f32,
        at: Timestamp,
        cause: TransitionCause,
    ) -> Option<QuestEvent> {
        let previous = self.state.tier;
        if previous == to {
            return None;
        }

        log_debug!("quest {} -> {} (score {}, t={})", previous, to, score, at);

        self.state.tier = to;
        self.state.entered_at = at;

        Some(QuestEvent {
            previous,
            current: to,
            score,
            timestamp: at,
            cause,
        })
    }
}
