//! Application-level error with a process exit code.
//!
//! Library layers return typed errors (`FitError`, `IngestError`, ...); the
//! binary boundary collapses them into `AppError` so `main` can print one line
//! and exit with a stable code:
//!
//! - `2`: input, I/O or usage problems
//! - `3`: the data cannot be fitted
//! - `4`: numeric or rendering failures

use crate::fit::FitError;
use crate::group::GroupError;
use crate::io::ingest::IngestError;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let code = match err {
            FitError::NonFiniteResult { .. } => 4,
            _ => 3,
        };
        AppError::new(code, format!("Fit failed: {err}"))
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<GroupError> for AppError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::Ingest(e) => e.into(),
            other => AppError::new(3, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_errors_map_to_data_exit_code() {
        let err: AppError = FitError::InsufficientData { n: 1 }.into();
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("not enough data"));
    }

    #[test]
    fn ingest_errors_map_to_input_exit_code() {
        let err: AppError = IngestError::NotFound { path: "nope.csv".into() }.into();
        assert_eq!(err.exit_code(), 2);
    }
}
