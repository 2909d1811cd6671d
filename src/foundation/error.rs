/// Result alias used across the editor.
pub type EditorResult<T> = Result<T, EditorError>;

/// Error taxonomy for the editor, compositor and service boundary.
///
/// Every variant is recoverable from the caller's point of view: a failed save returns the user to
/// the editing state, and out-of-range transform input is clamped instead of surfacing here.
#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    /// Invalid configuration, malformed wire input, or a rejected upload.
    #[error("validation error: {0}")]
    Validation(String),

    /// An image source could not be fetched or decoded.
    #[error("load error: {0}")]
    Load(String),

    /// Container or image geometry that cannot be mapped (e.g. an unmeasured container).
    #[error("geometry error: {0}")]
    Geometry(String),

    /// A bounded wait (image loading, job polling) ran out of time.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Rasterization or encoding failed.
    #[error("render error: {0}")]
    Render(String),

    /// The remote service returned an error or an unexpected payload.
    #[error("service error: {0}")]
    Service(String),

    /// The remote service rejected the bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Wrapped error carrying its own context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EditorError {
    /// Build an [`EditorError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`EditorError::Load`].
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build an [`EditorError::Geometry`].
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build an [`EditorError::Timeout`].
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Build an [`EditorError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`EditorError::Service`].
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Build an [`EditorError::Unauthorized`].
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
}
