/// Convenience result type used across hwfilter.
pub type HwResult<T> = Result<T, HwFilterError>;

/// Top-level error taxonomy for probing, filter configuration and dispatch.
///
/// Every failure is surfaced to the immediate caller of the failing operation. A failed frame
/// never produces a partial packet.
#[derive(thiserror::Error, Debug)]
pub enum HwFilterError {
    /// RGB output was requested but no conversion path can produce it.
    #[error("unsupported conversion: {0}")]
    UnsupportedConversion(String),

    /// The source chroma layout cannot be fed to the selected engine.
    #[error("unsupported chroma layout: {0}")]
    UnsupportedChromaLayout(String),

    /// A packet parameter object could not be constructed.
    #[error("parameter allocation failed: {0}")]
    ParameterAllocation(String),

    /// Invalid caller-provided descriptor or misuse of a filter's lifecycle.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing configuration or job descriptions.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from an engine backend or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HwFilterError {
    /// Build a [`HwFilterError::UnsupportedConversion`] value.
    pub fn unsupported_conversion(msg: impl Into<String>) -> Self {
        Self::UnsupportedConversion(msg.into())
    }

    /// Build a [`HwFilterError::UnsupportedChromaLayout`] value.
    pub fn unsupported_chroma_layout(msg: impl Into<String>) -> Self {
        Self::UnsupportedChromaLayout(msg.into())
    }

    /// Build a [`HwFilterError::ParameterAllocation`] value.
    pub fn parameter_allocation(msg: impl Into<String>) -> Self {
        Self::ParameterAllocation(msg.into())
    }

    /// Build a [`HwFilterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HwFilterError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the caller may retry the whole frame after reclaiming resources.
    ///
    /// Only parameter allocation failures are transient; everything else describes a request
    /// that will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ParameterAllocation(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
