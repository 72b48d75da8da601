use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Config,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl GenError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GenError::IoError(_) => ErrorCategory::Io,
            GenError::ConfigError { .. } | GenError::ConfigValidationError { .. } => {
                ErrorCategory::Config
            }
            GenError::InvalidConfigValueError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Config | ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the path exists and is readable",
            ErrorCategory::Config => "Make sure the config file exists and is valid TOML",
            ErrorCategory::Validation => "Correct the highlighted configuration value",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GenError::IoError(e) => format!("File access failed: {}", e),
            GenError::ConfigError { message } => format!("Invalid configuration: {}", message),
            GenError::ConfigValidationError { field, message } => {
                format!("Invalid configuration in {}: {}", field, message)
            }
            GenError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("{} = '{}' is not allowed: {}", field, value, reason),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
