//! Generic error handling utilities
//!
//! Distinguishes errors the operator can act on (bad link, missing admin
//! rights, flood limits) from internal failures, so handlers can reply with a
//! specific message or a generic one while still logging full detail.

/// Trait for errors that can distinguish between operator-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)` with text suitable for a chat reply. When it returns
/// `false`, `user_message()` returns `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the operator should see verbatim
    fn is_user_actionable(&self) -> bool;

    /// Returns the operator-facing message if this is an actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// Actionable errors log their user message; system errors log the
/// operation context. Full detail always goes to debug level.
///
/// # Examples
/// ```rust,no_run
/// # use mediaindex::core::error_handling::log_error_with_context;
/// # use mediaindex::indexer::error::IntakeError;
/// let err = IntakeError::ChannelUnavailable;
/// log_error_with_context(&err, "Index intake");
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => log::error!("{}: {}", operation_context, user_msg),
        None => log::error!("{} failed", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct TestUserError {
        message: String,
    }

    impl fmt::Display for TestUserError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl std::error::Error for TestUserError {}

    impl ContextualError for TestUserError {
        fn is_user_actionable(&self) -> bool {
            true
        }

        fn user_message(&self) -> Option<&str> {
            Some(&self.message)
        }
    }

    #[derive(Debug)]
    struct TestSystemError;

    impl fmt::Display for TestSystemError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "System error: connection reset")
        }
    }

    impl std::error::Error for TestSystemError {}

    impl ContextualError for TestSystemError {
        fn is_user_actionable(&self) -> bool {
            false
        }

        fn user_message(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn test_user_actionable_error_exposes_message() {
        let error = TestUserError {
            message: "Invalid Link specified.".to_string(),
        };
        assert!(error.is_user_actionable());
        assert_eq!(error.user_message(), Some("Invalid Link specified."));
        log_error_with_context(&error, "Index intake");
    }

    #[test]
    fn test_system_error_has_no_user_message() {
        let error = TestSystemError;
        assert!(!error.is_user_actionable());
        assert_eq!(error.user_message(), None);
        log_error_with_context(&error, "Index intake");
    }
}
