use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::widget::Popup;

/// How long the popup stays visible after [`Notifier::show`].
pub const POPUP_DURATION: Duration = Duration::from_millis(1000);

/// Flashes a popup for a fixed duration.
#[derive(Debug, Clone)]
pub struct Notifier {
    popup: Popup,
    duration: Duration,
}

impl Notifier {
    pub fn new(popup: Popup) -> Self {
        Self::with_duration(popup, POPUP_DURATION)
    }

    pub fn with_duration(popup: Popup, duration: Duration) -> Self {
        Self { popup, duration }
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    /// Make the popup visible and schedule it to hide after the configured
    /// duration.
    ///
    /// Every call schedules its own hide. A second call inside the window
    /// does not extend it: the first call's timer still hides the popup.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&self) -> JoinHandle<()> {
        self.popup.show();
        debug!(duration_ms = self.duration.as_millis(), "popup shown");

        let popup = self.popup.clone();
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            popup.hide();
        })
    }
}
