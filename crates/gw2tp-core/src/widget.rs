//! Display surfaces shared between components and whatever renders them.
//!
//! Both surfaces are cheap `Clone` handles over shared state, so a spawned
//! timer task can hold one while the renderer reads another clone.

use std::{
    fmt,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use chrono::{DateTime, Utc};

/// Text colors used by the result label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Gold,
    Red,
}

impl Color {
    pub fn hex(self) -> &'static str {
        match self {
            Color::Gold => "#FFD700",
            Color::Red => "#f44336",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

#[derive(Debug, Default)]
struct LabelState {
    text: String,
    color: Option<Color>,
    timestamp: Option<DateTime<Utc>>,
}

/// A text element with an optional color and an attached timestamp.
#[derive(Debug, Clone, Default)]
pub struct Label {
    state: Arc<Mutex<LabelState>>,
}

impl Label {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LabelState> {
        // Every write is a single field store; a poisoned state is still whole.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.lock().text = text.into();
    }

    /// Replace the text only if `guard` still holds once the lock is taken.
    /// Returns whether the text was written.
    pub fn set_text_if(&self, text: impl Into<String>, guard: impl FnOnce() -> bool) -> bool {
        let mut state = self.lock();
        if !guard() {
            return false;
        }
        state.text = text.into();
        true
    }

    pub fn color(&self) -> Option<Color> {
        self.lock().color
    }

    pub fn set_color(&self, color: Color) {
        self.lock().color = Some(color);
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.lock().timestamp
    }

    pub fn set_timestamp(&self, at: DateTime<Utc>) {
        self.lock().timestamp = Some(at);
    }
}

/// A popup that is either shown or hidden.
#[derive(Debug, Clone, Default)]
pub struct Popup {
    visible: Arc<AtomicBool>,
}

impl Popup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self) {
        self.visible.store(true, Ordering::Release);
    }

    pub fn hide(&self) {
        self.visible.store(false, Ordering::Release);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }
}
