//! Configuration error types.

use thiserror::Error;

/// Errors raised when a roll setting cannot become a session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Round duration must be at least one minute.
    #[error("round duration must be at least 1 minute (got {0})")]
    RoundDuration(u32),

    /// A session needs at least one round.
    #[error("number of rounds must be at least 1 (got {0})")]
    TotalRounds(u32),

    /// Warning offset must fall inside the final minute.
    #[error("warning offset must be between 0 and 59 seconds (got {0})")]
    WarningOffset(u32),

    /// The session has more seconds than the tick counter can hold.
    #[error("session of {rounds} x {minutes} min rounds is too long")]
    SessionTooLong {
        /// Requested round duration
        minutes: u32,
        /// Requested number of rounds
        rounds: u32,
    },
}

impl ConfigError {
    /// Returns the name of the offending setting.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::RoundDuration(_) => "round_time",
            Self::TotalRounds(_) => "number_of_rounds",
            Self::WarningOffset(_) => "warning_time",
            Self::SessionTooLong { .. } => "round_time",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::RoundDuration(0);
        assert!(err.to_string().contains("at least 1 minute"));
        assert!(err.to_string().contains("got 0"));

        let err = ConfigError::WarningOffset(75);
        assert!(err.to_string().contains("75"));
    }

    #[test]
    fn test_field() {
        assert_eq!(ConfigError::RoundDuration(0).field(), "round_time");
        assert_eq!(ConfigError::TotalRounds(0).field(), "number_of_rounds");
        assert_eq!(ConfigError::WarningOffset(60).field(), "warning_time");
        assert_eq!(
            ConfigError::SessionTooLong {
                minutes: 80_000_000,
                rounds: 1
            }
            .field(),
            "round_time"
        );
    }
}
