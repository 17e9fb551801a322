//! Error types for container decoding, encoding and editing.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors raised while decoding, encoding or editing a container.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Structural mismatch: bad magic, bad material sentinel, misaligned tables.
    #[error("invalid format: {message}")]
    InvalidFormat { message: String },

    /// A read would run past the end of the buffer.
    #[error("truncated input at offset {offset}: needed {needed} byte(s), {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A uniform variable carries a type tag with no known payload shape.
    #[error("unknown uniform variable type 0x{tag:02X} at offset {offset}")]
    UnknownUniformType { tag: u32, offset: usize },

    /// The index buffer element width is not 1, 2, 4 or 8 bytes.
    #[error("unsupported index width: {width} byte(s)")]
    UnsupportedIndexWidth { width: u32 },

    /// No mesh matches the requested (group, LOD, index) identity.
    #[error("mesh not found: group {group}, lod {lod}, index {index}")]
    MeshNotFound { group: u32, lod: u32, index: u32 },

    /// Writer failure while encoding.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    /// Shorthand for an [`FormatError::InvalidFormat`] error.
    pub fn invalid(message: impl Into<String>) -> Self {
        FormatError::InvalidFormat {
            message: message.into(),
        }
    }

    /// Returns true when the error leaves the container untouched and a batch
    /// of edits may continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FormatError::MeshNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_display() {
        let err = FormatError::Truncated {
            offset: 20,
            needed: 4,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "truncated input at offset 20: needed 4 byte(s), 1 available"
        );
    }

    #[test]
    fn test_unknown_uniform_display() {
        let err = FormatError::UnknownUniformType {
            tag: 0x0B,
            offset: 128,
        };
        assert_eq!(
            err.to_string(),
            "unknown uniform variable type 0x0B at offset 128"
        );
    }

    #[test]
    fn test_only_mesh_not_found_is_recoverable() {
        let not_found = FormatError::MeshNotFound {
            group: 0,
            lod: 1,
            index: 2,
        };
        assert!(not_found.is_recoverable());
        assert!(!FormatError::invalid("bad magic").is_recoverable());
        assert!(!FormatError::UnsupportedIndexWidth { width: 3 }.is_recoverable());
    }
}
