use thiserror::Error;

/// Longest prefix of the offending input kept in a [`PacketError::MalformedInput`].
const EXCERPT_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum PacketError {
    #[error("Malformed input: {reason} (near \"{excerpt}\")")]
    MalformedInput { reason: String, excerpt: String },

    #[error("Checksum requested over zero words")]
    EmptyOperands,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PacketError {
    /// Builds a `MalformedInput` error carrying a short excerpt of `input`.
    pub fn malformed(reason: impl Into<String>, input: &str) -> Self {
        let excerpt = match input.char_indices().nth(EXCERPT_LEN) {
            Some((end, _)) => format!("{}...", &input[..end]),
            None => input.to_string(),
        };
        PacketError::MalformedInput {
            reason: reason.into(),
            excerpt,
        }
    }

    /// Short name of the error kind, for reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            PacketError::MalformedInput { .. } => "MalformedInput",
            PacketError::EmptyOperands => "EmptyOperands",
            PacketError::Io(_) => "Io",
        }
    }
}
