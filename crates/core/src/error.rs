//! Core error types for the Photon decoder

/// Every way a captured datagram can fail to decode.
///
/// Any of these aborts the whole enclosing packet; no partially decoded
/// structure is ever handed back alongside an error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    #[error("Unsupported Protocol16 type code: {0}")]
    UnsupportedTypeCode(u8),

    #[error("Missing or mistyped parameter: {0}")]
    MissingParameter(u8),

    #[error("Malformed length: declared {declared} bytes, {available} available")]
    MalformedLength { declared: usize, available: usize },

    #[error("Nesting too deep: {0} levels")]
    NestingTooDeep(usize),
}

impl DecodeError {
    /// Shorthand used by the cursor when a fixed-width read falls off the end.
    pub const fn truncated(needed: usize, remaining: usize) -> Self {
        Self::TruncatedInput { needed, remaining }
    }

    /// True for the error kinds caused by running out of bytes.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::TruncatedInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
