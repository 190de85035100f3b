//! Error types for view construction and rendering.
//!
//! [`ViewError`] covers both phases of a [`Views`](crate::Views) lifetime:
//!
//! - Construction errors (`Configuration`, `SourceRead`, `Parse`, `Collision`)
//!   abort [`ViewsBuilder::build`](crate::ViewsBuilder::build). No partially
//!   built engine is ever returned.
//! - Render errors (`NotFound`, `Execution`) are returned per call and leave
//!   the engine untouched.

use std::io;

use thiserror::Error;

/// Error type for view construction and rendering.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ViewError {
    /// Required configuration is missing or invalid (e.g. no template source).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A listed template source could not be walked or read.
    #[error("failed to read template source \"{path}\": {source}")]
    SourceRead {
        /// Path of the source that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A template source failed to parse.
    #[error("failed to parse template \"{name}\": {source}")]
    Parse {
        /// Logical name of the offending template.
        name: String,
        /// Syntax error reported by the template engine.
        #[source]
        source: minijinja::Error,
    },

    /// Two sources in the same namespace resolved to one logical name.
    ///
    /// Only raised under [`CollisionPolicy::Error`](crate::CollisionPolicy::Error).
    #[error(
        "template collision detected for \"{name}\":\n  - {existing}\n  - {conflicting}"
    )]
    Collision {
        /// The logical name both sources resolve to.
        name: String,
        /// Path of the source registered first.
        existing: String,
        /// Path of the source that would have replaced it.
        conflicting: String,
    },

    /// No namespace holds the requested logical name.
    #[error("template \"{name}\" not found")]
    NotFound {
        /// The name that was requested.
        name: String,
    },

    /// The template engine failed while executing a found template.
    #[error("failed to render template \"{name}\": {source}")]
    Execution {
        /// Logical name that was requested.
        name: String,
        /// Engine error, unmodified.
        #[source]
        source: minijinja::Error,
    },
}

impl ViewError {
    pub(crate) fn not_found(name: &str) -> Self {
        ViewError::NotFound {
            name: name.to_string(),
        }
    }

    pub(crate) fn source_read(path: impl Into<String>, source: io::Error) -> Self {
        ViewError::SourceRead {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this is a [`ViewError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, ViewError::NotFound { .. })
    }

    /// Returns true if this error can only happen while building the engine.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            ViewError::Configuration(_)
                | ViewError::SourceRead { .. }
                | ViewError::Parse { .. }
                | ViewError::Collision { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ViewError::not_found("page/missing");
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("page/missing"));
        assert!(err.is_not_found());
        assert!(!err.is_construction());
    }

    #[test]
    fn test_source_read_keeps_io_source() {
        let err = ViewError::source_read(
            "component/card.html",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_construction());
        assert!(err.to_string().contains("component/card.html"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_collision_display_lists_both_paths() {
        let err = ViewError::Collision {
            name: "component/a".to_string(),
            existing: "component/a.html".to_string(),
            conflicting: "component/a.txt".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("component/a.html"));
        assert!(display.contains("component/a.txt"));
    }

    #[test]
    fn test_execution_wraps_engine_error() {
        let engine_err = minijinja::Error::new(minijinja::ErrorKind::UnknownFunction, "nope");
        let err = ViewError::Execution {
            name: "page/home".to_string(),
            source: engine_err,
        };
        assert!(!err.is_construction());
        let source = err.source().unwrap();
        assert!(source.to_string().contains("nope"));
    }
}
