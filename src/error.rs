/// Result type used by stages, destinations and failure handlers.
///
/// Errors are carried as [`anyhow::Error`] so stages can use `?` on any error
/// type and callers can recover the original type with `downcast_ref`.
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Pipeline '{name}' not found")]
    NotFound { name: String },

    #[error("Pipe '{pipe}' has no method '{method}'")]
    MissingMethod { pipe: String, method: String },

    #[error("Pipe '{pipe}' is not callable")]
    NotCallable { pipe: String },
}

impl PipelineError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn missing_method(pipe: impl Into<String>, method: impl Into<String>) -> Self {
        Self::MissingMethod {
            pipe: pipe.into(),
            method: method.into(),
        }
    }

    pub fn not_callable(pipe: impl Into<String>) -> Self {
        Self::NotCallable { pipe: pipe.into() }
    }
}
