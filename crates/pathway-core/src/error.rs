//! Error types for pathway-core.

use thiserror::Error;

/// Result type for pathway-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pathway-core.
///
/// Interactive editing never produces these: a rejected gesture is reported
/// through the operation's `bool` result instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The route graph contains a cycle and cannot be ordered.
    #[error("cyclic graph: only {ordered} of {total} modules could be ordered")]
    CyclicGraph {
        /// Number of items that became ready before the sort stalled.
        ordered: usize,
        /// Number of items given to the sort.
        total: usize,
    },

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Render the error together with a hint on how to recover from it.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Error::CyclicGraph { .. } => {
                "remove one of the routes that leads back to an earlier module"
            }
            Error::InvalidConfig(_) => "spacings and module sizes must be positive",
        };
        format!("{self}\n  hint: {hint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_graph_display() {
        let err = Error::CyclicGraph {
            ordered: 2,
            total: 5,
        };
        assert_eq!(
            err.to_string(),
            "cyclic graph: only 2 of 5 modules could be ordered"
        );
        assert!(err.with_hint().contains("hint:"));
    }
}
