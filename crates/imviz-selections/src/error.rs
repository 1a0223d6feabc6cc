//! Error and diagnostic types for the selection compiler
//!
//! Malformed event selectors are fatal and abort the whole compile.
//! Configuration conflicts that the compiler can resolve on its own are
//! surfaced as recoverable [`Diagnostic`]s on the compile output instead
//! of failing or being silently overridden.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selection::{Channel, Resolve};

/// Fatal compile errors
#[derive(Error, Debug)]
pub enum CompileError {
    /// Malformed event-selector expression
    #[error("Event selector error: {0}")]
    Event(#[from] imviz_events::ParseError),

    /// A projection names a channel the owning panel does not bind
    #[error("Channel '{channel}' is projected but not bound to a field")]
    MissingChannel { channel: Channel },
}

/// Result type alias for compile operations
pub type CompileResult<T> = Result<T, CompileError>;

/// Machine-readable diagnostic categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// A caller-requested resolve strategy was overridden to `single`
    /// because `scales` was configured on the same selection
    ResolveOverridden,
}

/// A recoverable diagnostic attached to the compile output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic category
    pub code: DiagnosticCode,

    /// Name of the selection the diagnostic refers to
    pub selection: String,

    /// Human-readable description
    pub message: String,
}

impl Diagnostic {
    /// Diagnostic for a resolve strategy forced to `single` by `scales`
    pub fn resolve_overridden(selection: impl Into<String>, requested: Resolve) -> Self {
        let selection = selection.into();
        Self {
            message: format!(
                "selection '{}': resolve '{}' is incompatible with scale binding; using 'single'",
                selection,
                requested.as_str()
            ),
            code: DiagnosticCode::ResolveOverridden,
            selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_overridden_message() {
        let diag = Diagnostic::resolve_overridden("brush", Resolve::Union);
        assert_eq!(diag.code, DiagnosticCode::ResolveOverridden);
        assert!(diag.message.contains("brush"));
        assert!(diag.message.contains("union"));
    }

    #[test]
    fn test_compile_error_display() {
        let err = CompileError::MissingChannel {
            channel: Channel::Y,
        };
        assert!(err.to_string().contains("y"));
    }
}
