//! Error types module
//!
//! All failures raised while building or serializing a transformation are
//! unified under [`TransformError`]. Absent or empty parameters are never
//! errors; they are simply omitted from the generated string.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like argument validation failures
    Debug,
    /// Warning level - for malformed input that reached the serializer
    Warn,
}

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Invalid variable name: '{0}'. Variable names must match ^\\$[a-zA-Z][a-zA-Z0-9]*$")]
    InvalidVariableName(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Keyframe interval must be greater than 0, got {0}")]
    InvalidKeyframeInterval(f64),

    #[error("Cannot modify {field} for {layer} layers")]
    RestrictedLayerField {
        layer: &'static str,
        field: &'static str,
    },

    #[error("Missing layer field: {0}")]
    MissingLayerField(String),

    #[error("Unsupported value for parameter '{key}': {kind}")]
    UnsupportedValue { key: String, kind: String },
}

pub type Result<T> = std::result::Result<T, TransformError>;

/// Static metadata for each variant: (error_code, log_level).
fn transform_error_static_metadata(err: &TransformError) -> (&'static str, LogLevel) {
    match err {
        TransformError::InvalidVariableName(_) => ("INVALID_VARIABLE_NAME", LogLevel::Debug),
        TransformError::InvalidRadius(_) => ("INVALID_RADIUS", LogLevel::Debug),
        TransformError::InvalidRange(_) => ("INVALID_RANGE", LogLevel::Debug),
        TransformError::InvalidKeyframeInterval(_) => {
            ("INVALID_KEYFRAME_INTERVAL", LogLevel::Debug)
        }
        TransformError::RestrictedLayerField { .. } => ("RESTRICTED_LAYER_FIELD", LogLevel::Debug),
        TransformError::MissingLayerField(_) => ("MISSING_LAYER_FIELD", LogLevel::Warn),
        TransformError::UnsupportedValue { .. } => ("UNSUPPORTED_VALUE", LogLevel::Warn),
    }
}

impl TransformError {
    /// Get the error type name
    pub fn error_type(&self) -> &str {
        match self {
            TransformError::InvalidVariableName(_) => "InvalidVariableName",
            TransformError::InvalidRadius(_) => "InvalidRadius",
            TransformError::InvalidRange(_) => "InvalidRange",
            TransformError::InvalidKeyframeInterval(_) => "InvalidKeyframeInterval",
            TransformError::RestrictedLayerField { .. } => "RestrictedLayerField",
            TransformError::MissingLayerField(_) => "MissingLayerField",
            TransformError::UnsupportedValue { .. } => "UnsupportedValue",
        }
    }

    /// Machine-readable error code (e.g., "INVALID_RADIUS")
    pub fn error_code(&self) -> &'static str {
        transform_error_static_metadata(self).0
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        transform_error_static_metadata(self).1
    }

    /// Whether this error belongs to the invalid-argument family (raised at
    /// the point of misuse, before any output is produced).
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, TransformError::UnsupportedValue { .. })
    }
}
