//! Display sinks for the timer label

use tokio::sync::watch;
use tracing::debug;

/// Something that shows the timer label
pub trait DisplaySink: Send + Sync {
    /// Replace the label with `text`
    fn set_timer_text(&self, text: &str);
}

/// Publishes the label on a watch channel so any number of readers see the latest value
#[derive(Debug)]
pub struct WatchDisplay {
    tx: watch::Sender<String>,
}

impl WatchDisplay {
    /// Create the sink together with a receiver holding `initial`
    pub fn new(initial: &str) -> (Self, watch::Receiver<String>) {
        let (tx, rx) = watch::channel(initial.to_string());
        (Self { tx }, rx)
    }
}

impl DisplaySink for WatchDisplay {
    fn set_timer_text(&self, text: &str) {
        debug!("Timer label: {}", text);
        // send_replace never fails, even with no receivers left
        self.tx.send_replace(text.to_string());
    }
}

/// Keeps every label it was given, for inspection
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    texts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.texts.lock().ok().and_then(|t| t.last().cloned())
    }
}

#[cfg(test)]
impl DisplaySink for RecordingDisplay {
    fn set_timer_text(&self, text: &str) {
        if let Ok(mut texts) = self.texts.lock() {
            texts.push(text.to_string());
        }
    }
}
