//! The single error-display hook every session failure is reported to.

use crate::ui::messages;

pub trait ErrorSink {
    /// Show `message`, replacing whatever was shown before.
    fn display_error(&mut self, message: &str);

    /// Hide the previous error, if any.
    fn hide_error(&mut self);
}

/// Prints errors to stderr as they happen. Used by one-shot commands.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl ErrorSink for TerminalSink {
    fn display_error(&mut self, message: &str) {
        tracing::debug!(%message, "error reported");
        messages::error(format!("Error: {}", message));
    }

    fn hide_error(&mut self) {}
}

/// Keeps the current error so it can be drawn as part of a full-screen
/// render, like the error container above the counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Banner {
    message: Option<String>,
}

impl Banner {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }
}

impl ErrorSink for Banner {
    fn display_error(&mut self, message: &str) {
        tracing::debug!(%message, "error reported");
        self.message = Some(format!("Error: {}", message));
    }

    fn hide_error(&mut self) {
        self.message = None;
    }
}
