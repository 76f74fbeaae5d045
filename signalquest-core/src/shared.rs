//! Thread-safe session handle
//!
//! [`SharedSession`] puts a [`QuestSession`] behind a mutex so several
//! threads can ingest directly. Each call holds the lock for one sample, and
//! the sink runs under the lock, so events still arrive in transition order.
//! Prefer [`SampleQueue`](crate::queue::SampleQueue) when producers must
//! never block.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    errors::{NoData, SessionError},
    events::QuestEvent,
    filter::FilterReading,
    quest::QuestState,
    sample::Sample,
    session::{QuestSession, SessionStats},
    sink::EventSink,
    time::Timestamp,
};

/// Cloneable handle to one session
pub struct SharedSession<S: EventSink> {
    inner: Arc<Mutex<QuestSession<S>>>,
}

impl<S: EventSink> Clone for SharedSession<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: EventSink> SharedSession<S> {
    /// Share an existing session
    pub fn new(session: QuestSession<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Feed one raw reading
    pub fn ingest(&self, channel: &str, value: f32, timestamp: Timestamp) -> Result<(), SessionError> {
        self.lock()?.ingest(channel, value, timestamp)?;
        Ok(())
    }

    /// Feed a prebuilt sample
    pub fn ingest_sample(&self, sample: Sample) -> Result<(), SessionError> {
        self.lock()?.ingest_sample(sample)?;
        Ok(())
    }

    /// Check the abandonment clock
    pub fn poll(&self, now: Timestamp) -> Result<Option<QuestEvent>, SessionError> {
        Ok(self.lock()?.poll(now))
    }

    /// Smoothed reading of one channel
    pub fn reading(&self, channel: &str) -> Result<Result<FilterReading, NoData>, SessionError> {
        Ok(self.lock()?.reading(channel))
    }

    /// Current quest state
    pub fn state(&self) -> Result<QuestState, SessionError> {
        Ok(self.lock()?.state())
    }

    /// Session counters
    pub fn stats(&self) -> Result<SessionStats, SessionError> {
        Ok(*self.lock()?.stats())
    }

    /// Start the quest over at `at`
    pub fn reset(&self, at: Timestamp) -> Result<(), SessionError> {
        self.lock()?.reset(at);
        Ok(())
    }

    /// Run `f` with exclusive access to the session
    pub fn with<R>(&self, f: impl FnOnce(&mut QuestSession<S>) -> R) -> Result<R, SessionError> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    /// Recover the session if this is the last handle
    ///
    /// Returns the handle back when other clones are still alive.
    pub fn try_into_inner(self) -> Result<QuestSession<S>, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => Ok(mutex.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())),
            Err(inner) => Err(Self { inner }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, QuestSession<S>>, SessionError> {
        self.inner.lock().map_err(|_| {
            log_warn!("quest session lock poisoned");
            SessionError::Poisoned
        })
    }
}
