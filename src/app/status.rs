/// How long success/info messages stay visible.
pub const TRANSIENT_STATUS_MS: u64 = 3000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    Info,
    Error,
}

impl StatusLevel {
    /// Default lifetime: success and info messages expire, errors stay until replaced.
    pub fn is_transient(self) -> bool {
        !matches!(self, Self::Error)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub level: StatusLevel,
    pub transient: bool,
    pub set_at_ms: u64,
}

/// The single-line outcome of the last operation.
#[derive(Clone, Debug, Default)]
pub struct StatusLine {
    current: Option<Status>,
}

impl StatusLine {
    pub fn set(&mut self, message: impl Into<String>, level: StatusLevel, now_ms: u64) {
        self.set_with(message, level, level.is_transient(), now_ms);
    }

    /// Like [`StatusLine::set`] with an explicit lifetime, e.g. for a rejected action
    /// whose error should not linger.
    pub fn set_with(
        &mut self,
        message: impl Into<String>,
        level: StatusLevel,
        transient: bool,
        now_ms: u64,
    ) {
        self.current = Some(Status {
            message: message.into(),
            level,
            transient,
            set_at_ms: now_ms,
        });
    }

    /// Clear a transient message that has been shown for [`TRANSIENT_STATUS_MS`].
    ///
    /// A newer message restarts the window, so only the message that is still showing expires.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        let expired = self.current.as_ref().is_some_and(|s| {
            s.transient && now_ms.saturating_sub(s.set_at_ms) >= TRANSIENT_STATUS_MS
        });
        if expired {
            self.current = None;
        }
        expired
    }

    pub fn current(&self) -> Option<&Status> {
        self.current.as_ref()
    }

    /// Current message, or `""` when the line is blank.
    pub fn message(&self) -> &str {
        self.current.as_ref().map_or("", |s| s.message.as_str())
    }

    pub fn level(&self) -> Option<StatusLevel> {
        self.current.as_ref().map(|s| s.level)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/status.rs"]
mod tests;
