use thiserror::Error;

pub type FormResult<T> = Result<T, FormError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Form has no group '{name}'")]
    GroupNotFound { name: String },

    #[error("Invalid grid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    // --- definition errors ---

    #[error("Duplicate component '{path}': component paths must be unique within the form")]
    DuplicateComponent { path: String },

    #[error("Unknown control '{path}' referenced by group '{group}'")]
    UnknownControl { group: String, path: String },

    #[error("Unknown container #{index}")]
    UnknownContainer { index: usize },

    #[error("Option '{key}' is reserved and cannot be used as an attribute")]
    ReservedOption { key: String },

    #[error("Invalid attribute name '{name}'")]
    InvalidAttribute { name: String },

    #[error("Invalid component name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("YAML error: {0}")]
    YamlError(String),

    #[error("Failed to read '{path}': {reason}")]
    IoError { path: String, reason: String },
}

impl From<serde_yaml::Error> for FormError {
    fn from(err: serde_yaml::Error) -> Self {
        FormError::YamlError(err.to_string())
    }
}
