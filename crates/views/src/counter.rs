//! View-counter state machine for one article view session.
//!
//! ```text
//! Idle --activate--> Loading --ok--> Ready(count)
//!                            \--err--> Error   (terminal, no retry)
//! ```
//!
//! A session issues at most one request. The `activated` flag is flipped
//! before the request goes out, so a second activation (re-entrant or
//! concurrent) never reaches the store and a single human view is never
//! counted twice.

use crate::store::ViewCountStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// Shown while the count is unknown
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// What the presentation layer renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewCounterState {
    pub count: Option<u64>,
    pub phase: Phase,
}

impl ViewCounterState {
    fn loading() -> Self {
        Self {
            count: None,
            phase: Phase::Loading,
        }
    }

    fn ready(count: u64) -> Self {
        Self {
            count: Some(count),
            phase: Phase::Ready,
        }
    }

    fn error() -> Self {
        Self {
            count: None,
            phase: Phase::Error,
        }
    }

    /// Display text: the formatted count when ready, a neutral placeholder
    /// otherwise. Never fails.
    pub fn label(&self) -> String {
        match (self.phase, self.count) {
            (Phase::Ready, Some(count)) => format_count(count),
            _ => PLACEHOLDER.to_string(),
        }
    }
}

/// Group digits in thousands: `1234567` -> `1,234,567`
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMode {
    ReadOnly,
    IncrementOnView,
}

/// Counter for one article in one view session
pub struct ViewCounter<S: ViewCountStore + ?Sized> {
    slug: String,
    mode: CounterMode,
    store: Arc<S>,
    activated: AtomicBool,
    closed: AtomicBool,
    state: watch::Sender<ViewCounterState>,
}

impl<S: ViewCountStore + ?Sized> ViewCounter<S> {
    pub fn new(slug: impl Into<String>, store: Arc<S>, mode: CounterMode) -> Self {
        let (state, _) = watch::channel(ViewCounterState::default());
        Self {
            slug: slug.into(),
            mode,
            store,
            activated: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            state,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn mode(&self) -> CounterMode {
        self.mode
    }

    pub fn state(&self) -> ViewCounterState {
        *self.state.borrow()
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<ViewCounterState> {
        self.state.subscribe()
    }

    pub fn has_activated(&self) -> bool {
        self.activated.load(Ordering::Acquire)
    }

    /// Start the session: read the count, or increment it when configured to.
    ///
    /// Only the first call talks to the store; later calls return the current
    /// state untouched. A store failure lands in [`Phase::Error`] and is not
    /// returned as an error.
    pub async fn activate(&self) -> ViewCounterState {
        if self.activated.swap(true, Ordering::AcqRel) {
            tracing::debug!(slug = %self.slug, "view counter already activated");
            return self.state();
        }
        if self.is_closed() {
            return self.state();
        }

        self.state.send_replace(ViewCounterState::loading());

        let result = match self.mode {
            CounterMode::ReadOnly => self.store.get_count(&self.slug).await,
            CounterMode::IncrementOnView => self.store.increment(&self.slug).await,
        };

        if self.is_closed() {
            tracing::debug!(slug = %self.slug, "view session closed, discarding response");
            return self.state();
        }

        let next = match result {
            Ok(count) => ViewCounterState::ready(count),
            Err(err) => {
                tracing::warn!(slug = %self.slug, error = %err, "view count unavailable");
                ViewCounterState::error()
            }
        };
        self.state.send_replace(next);
        next
    }

    /// End the view session. A response still in flight is dropped.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
