//! Domain error types.
//!
//! Business rejections are never errors: they come back as a rejected
//! [`Decision`](crate::domain::decision::Decision). Errors here cover malformed
//! input and configuration problems only.

/// Top-level error type for riskgate.
#[derive(Debug, thiserror::Error)]
pub enum RiskGateError {
    #[error("invalid input {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("unknown {kind} value {value:?}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("position data error: {reason}")]
    PositionData { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RiskGateError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RiskGateError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for caller-side contract violations (bad snapshot values).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RiskGateError::InvalidInput { .. } | RiskGateError::UnknownVariant { .. }
        )
    }

    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            RiskGateError::Io(_) => 1,
            RiskGateError::ConfigParse { .. }
            | RiskGateError::ConfigMissing { .. }
            | RiskGateError::ConfigInvalid { .. } => 2,
            RiskGateError::PositionData { .. } => 3,
            RiskGateError::InvalidInput { .. } | RiskGateError::UnknownVariant { .. } => 4,
        }
    }
}

impl From<&RiskGateError> for std::process::ExitCode {
    fn from(err: &RiskGateError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}

/// Rejects NaN and infinities for a named numeric field.
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<(), RiskGateError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RiskGateError::invalid_input(field, "must be a finite number"))
    }
}

pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<(), RiskGateError> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(RiskGateError::invalid_input(field, "must be non-negative"));
    }
    Ok(())
}

pub(crate) fn ensure_positive(field: &str, value: f64) -> Result<(), RiskGateError> {
    ensure_finite(field, value)?;
    if value <= 0.0 {
        return Err(RiskGateError::invalid_input(field, "must be positive"));
    }
    Ok(())
}
