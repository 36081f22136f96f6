//! Engine error types.

use thiserror::Error;

use crate::types::ConfigError;

/// Errors reported by [`RoundTimerEngine`](super::RoundTimerEngine) calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// The supplied setting cannot start a session.
    #[error("invalid session configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// No session is loaded, or the call does not apply in the current state.
    #[error("no active session")]
    InactiveSession,
}

impl TimerError {
    /// Returns true if the call was simply ignored and the caller can carry on.
    ///
    /// The UI and the tick source may race each other, so an
    /// `InactiveSession` is logged and dropped rather than surfaced.
    #[must_use]
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::InactiveSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TimerError::InvalidConfig(ConfigError::TotalRounds(0));
        assert!(err.to_string().contains("invalid session configuration"));
        assert!(err.to_string().contains("number of rounds"));

        assert_eq!(TimerError::InactiveSession.to_string(), "no active session");
    }

    #[test]
    fn test_is_benign() {
        assert!(TimerError::InactiveSession.is_benign());
        assert!(!TimerError::InvalidConfig(ConfigError::RoundDuration(0)).is_benign());
    }

    #[test]
    fn test_from_config_error() {
        let err: TimerError = ConfigError::WarningOffset(61).into();
        assert_eq!(err, TimerError::InvalidConfig(ConfigError::WarningOffset(61)));
    }
}
