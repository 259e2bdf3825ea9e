use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum StellwerkError {
    ProjectNotFound {
        project_id: String,
    },
    ProjectAlreadyExists {
        root_path: String,
    },
    InvalidInput {
        field: String,
        message: String,
    },
    IoError {
        operation: String,
        path: String,
        message: String,
    },
    SerializationError {
        message: String,
    },
}

impl StellwerkError {
    pub fn io(operation: &str, path: impl ToString, error: impl ToString) -> Self {
        StellwerkError::IoError {
            operation: operation.to_string(),
            path: path.to_string(),
            message: error.to_string(),
        }
    }

    pub fn invalid_input(field: &str, message: impl ToString) -> Self {
        StellwerkError::InvalidInput {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for StellwerkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ProjectNotFound { project_id } => {
                write!(f, "Project '{project_id}' not found")
            }
            Self::ProjectAlreadyExists { root_path } => {
                write!(f, "Project already registered at path: {root_path}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::IoError {
                operation,
                path,
                message,
            } => {
                write!(f, "I/O error during '{operation}' on '{path}': {message}")
            }
            Self::SerializationError { message } => {
                write!(f, "Serialization error: {message}")
            }
        }
    }
}

impl std::error::Error for StellwerkError {}

impl From<serde_json::Error> for StellwerkError {
    fn from(error: serde_json::Error) -> Self {
        StellwerkError::SerializationError {
            message: error.to_string(),
        }
    }
}

impl From<StellwerkError> for String {
    fn from(error: StellwerkError) -> Self {
        error.to_string()
    }
}
