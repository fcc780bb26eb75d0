//! Secondary-write policy.
//!
//! Lifecycle handlers perform the status mutation first; the conversation-log
//! append, redemption record and notification that follow are secondary. A
//! failed secondary write leaves a warning in the logs and the request still
//! succeeds, so the primary state never rolls back over a logging problem.

/// Logs and swallows the error of a non-critical side effect.
pub fn log_non_critical<T, E: std::fmt::Display>(context: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(context = context, error = %err, "Non-critical side effect failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_passes_through() {
        let result: Result<i32, String> = Ok(7);
        assert_eq!(log_non_critical("test", result), Some(7));
    }

    #[test]
    fn test_err_is_swallowed() {
        let result: Result<i32, String> = Err("boom".to_string());
        assert_eq!(log_non_critical("test", result), None);
    }
}
