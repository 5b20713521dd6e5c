pub type SketchResult<T> = Result<T, SketchError>;

#[derive(thiserror::Error, Debug)]
pub enum SketchError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("archive error: {0}")]
    Archive(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification used when turning an error into a status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller asked for something the current state cannot satisfy.
    Precondition,
    /// An encoder, archiver or I/O boundary failed.
    External,
}

impl SketchError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Precondition(_) => ErrorKind::Precondition,
            Self::Encode(_)
            | Self::Archive(_)
            | Self::Serde(_)
            | Self::Cancelled(_)
            | Self::Other(_) => ErrorKind::External,
        }
    }

    /// Message without the category prefix, suitable for a status line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(m) | Self::Precondition(m) => m.clone(),
            Self::Encode(m) => format!("Error generating GIF: {m}"),
            Self::Archive(m) => format!("Error creating bundle: {m}"),
            Self::Serde(m) => format!("Error: {m}"),
            Self::Cancelled(m) => format!("Cancelled: {m}"),
            Self::Other(e) => format!("Error: {e}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
