//! Event Sinks
//!
//! A sink receives every [`QuestEvent`] a session produces, in order, exactly
//! once. Delivery happens synchronously inside the call that caused the
//! transition, so a sink should hand the event off rather than block.
//!
//! ```text
//! QuestSession ──deliver(event)──▶ EventSink
//!                                    ├── CallbackSink  (closure)
//!                                    ├── EventLog<N>   (bounded history)
//!                                    ├── ChannelSink   (mpsc, std only)
//!                                    └── NullSink      (discard)
//! ```

use heapless::Vec;

use crate::{constants::buffers::EVENT_LOG_CAPACITY, events::QuestEvent};

/// Receiver for quest transitions
pub trait EventSink {
    /// Take ownership of one event
    fn deliver(&mut self, event: QuestEvent);

    /// Sink name for diagnostics
    fn name(&self) -> &'static str {
        "EventSink"
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn deliver(&mut self, event: QuestEvent) {
        (**self).deliver(event)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(feature = "std")]
impl<S: EventSink + ?Sized> EventSink for std::boxed::Box<S> {
    fn deliver(&mut self, event: QuestEvent) {
        (**self).deliver(event)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn deliver(&mut self, _event: QuestEvent) {}

    fn name(&self) -> &'static str {
        "NullSink"
    }
}

/// Sink that calls a closure for each event
pub struct CallbackSink<F> {
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: FnMut(QuestEvent),
{
    /// Wrap a closure
    pub fn new(callback: F) -> Self {
        Self { callback }
    }

    /// Unwrap the closure
    pub fn into_inner(self) -> F {
        self.callback
    }
}

impl<F> EventSink for CallbackSink<F>
where
    F: FnMut(QuestEvent),
{
    fn deliver(&mut self, event: QuestEvent) {
        (self.callback)(event)
    }

    fn name(&self) -> &'static str {
        "CallbackSink"
    }
}

/// Bounded in-memory history
///
/// Keeps the first `N` events and counts the ones that did not fit. Drain it
/// with [`EventLog::take`] to make room.
#[derive(Debug, Clone, Default)]
pub struct EventLog<const N: usize = EVENT_LOG_CAPACITY> {
    events: Vec<QuestEvent, N>,
    overflowed: u32,
}

impl<const N: usize> EventLog<N> {
    /// Empty log
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            overflowed: 0,
        }
    }

    /// Events kept so far, oldest first
    pub fn events(&self) -> &[QuestEvent] {
        &self.events
    }

    /// Most recent kept event
    pub fn last(&self) -> Option<&QuestEvent> {
        self.events.last()
    }

    /// Events that arrived while the log was full
    pub fn overflowed(&self) -> u32 {
        self.overflowed
    }

    /// Number of events kept
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing has been kept
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove and return everything kept, resetting the overflow count
    pub fn take(&mut self) -> Vec<QuestEvent, N> {
        self.overflowed = 0;
        core::mem::take(&mut self.events)
    }
}

impl<const N: usize> EventSink for EventLog<N> {
    fn deliver(&mut self, event: QuestEvent) {
        if self.events.push(event).is_err() {
            self.overflowed = self.overflowed.saturating_add(1);
            log_warn!("event log full, dropped {}", event);
        }
    }

    fn name(&self) -> &'static str {
        "EventLog"
    }
}

/// Sink forwarding events to another thread
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: std::sync::mpsc::Sender<QuestEvent>,
    disconnected: bool,
}

#[cfg(feature = "std")]
impl ChannelSink {
    /// Sink plus the receiving end
    pub fn new() -> (Self, std::sync::mpsc::Receiver<QuestEvent>) {
        let (sender, receiver) = std::sync::mpsc::channel();
        (Self::from_sender(sender), receiver)
    }

    /// Sink over an existing sender
    pub fn from_sender(sender: std::sync::mpsc::Sender<QuestEvent>) -> Self {
        Self {
            sender,
            disconnected: false,
        }
    }

    /// True once the receiver has gone away
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

#[cfg(feature = "std")]
impl EventSink for ChannelSink {
    fn deliver(&mut self, event: QuestEvent) {
        if self.sender.send(event).is_err() && !self.disconnected {
            self.disconnected = true;
            log_warn!("event receiver disconnected, discarding further events");
        }
    }

    fn name(&self) -> &'static str {
        "ChannelSink"
    }
}
