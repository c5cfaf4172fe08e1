//! Error types for the Lattice engine.

use thiserror::Error;

/// Errors raised while building or querying a grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Malformed construction input, e.g. `min > max` or a zero span.
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A value was used in a way inconsistent with its current state,
    /// e.g. reading the weight of a fixed length.
    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },

    /// A length mode or unit that the engine does not know about.
    #[error("Unsupported variant: {variant}")]
    UnsupportedVariant { variant: String },
}

impl LayoutError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    pub fn unsupported_variant(variant: impl Into<String>) -> Self {
        Self::UnsupportedVariant {
            variant: variant.into(),
        }
    }
}

/// Result alias used throughout the lattice crates.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Validate an optional `[min, max]` pixel range.
pub fn check_bounds(min: Option<i32>, max: Option<i32>) -> LayoutResult<()> {
    if let Some(min) = min {
        if min < 0 {
            return Err(LayoutError::invalid_argument(format!(
                "minimum size must not be negative, got {min}"
            )));
        }
    }
    if let Some(max) = max {
        if max < 0 {
            return Err(LayoutError::invalid_argument(format!(
                "maximum size must not be negative, got {max}"
            )));
        }
    }
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(LayoutError::invalid_argument(format!(
            "minimum size {min} exceeds maximum size {max}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_bounds_accepts_open_ranges() {
        assert!(check_bounds(None, None).is_ok());
        assert!(check_bounds(Some(10), None).is_ok());
        assert!(check_bounds(None, Some(10)).is_ok());
        assert!(check_bounds(Some(10), Some(10)).is_ok());
    }

    #[test]
    fn test_check_bounds_rejects_inverted_range() {
        let err = check_bounds(Some(20), Some(10)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidArgument { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid argument: minimum size 20 exceeds maximum size 10"
        );
    }

    #[test]
    fn test_check_bounds_rejects_negative() {
        assert!(check_bounds(Some(-1), None).is_err());
        assert!(check_bounds(None, Some(-5)).is_err());
    }
}
