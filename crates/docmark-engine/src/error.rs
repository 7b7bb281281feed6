use thiserror::Error;

/// Errors surfaced by [`crate::compile`].
///
/// `StructuralViolation` is the only error the compiler raises on its own
/// account; every other fault is reported as `CompileFailure` so callers see
/// a single stable error surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Structural violation at {token}: {reason}")]
    StructuralViolation { token: String, reason: String },

    #[error("Markdown compilation failed: {reason}")]
    CompileFailure { reason: String },
}

impl CompileError {
    pub(crate) fn structural(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StructuralViolation {
            token: token.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn failure(reason: impl Into<String>) -> Self {
        Self::CompileFailure {
            reason: reason.into(),
        }
    }
}
