//! Error types and handling for qdsm
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! A project file that cannot be parsed is not an error at the batch level:
//! the engine logs [`QdsmError::DocumentParseFailed`] and skips the document.
//! Everything else here propagates to the caller.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for qdsm operations
#[derive(Error, Diagnostic, Debug)]
pub enum QdsmError {
    // Project errors
    #[error("Failed to parse project file: {path}: {reason}")]
    #[diagnostic(
        code(qdsm::project::parse_failed),
        help("The file is not well-formed XML; it is skipped during batch operations")
    )]
    DocumentParseFailed { path: String, reason: String },

    #[error("Folder not found: {path}")]
    #[diagnostic(
        code(qdsm::project::folder_not_found),
        help("Check that every folder passed on the command line exists")
    )]
    FolderNotFound { path: String },

    // Mapping table errors
    #[error("Invalid mapping at {path}:{line}: '{content}'")]
    #[diagnostic(
        code(qdsm::mapping::invalid_line),
        help("Each non-blank line must be 'source<sep>destination' with exactly one separator")
    )]
    MappingLineInvalid {
        path: String,
        line: usize,
        content: String,
    },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(qdsm::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(qdsm::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(qdsm::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(
        code(qdsm::fs::write_failed),
        help("The original file is left untouched when the temporary copy cannot be renamed")
    )]
    FileWriteFailed { path: String, reason: String },

    // CLI errors
    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(qdsm::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(qdsm::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for QdsmError {
    fn from(err: std::io::Error) -> Self {
        QdsmError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for QdsmError {
    fn from(err: serde_yaml::Error) -> Self {
        QdsmError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for QdsmError {
    fn from(err: serde_json::Error) -> Self {
        QdsmError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, QdsmError>;

/// Creates a read failure for `path`
pub fn file_read_failed(path: impl std::fmt::Display, reason: impl ToString) -> QdsmError {
    QdsmError::FileReadFailed {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a write failure for `path`
pub fn file_write_failed(path: impl std::fmt::Display, reason: impl ToString) -> QdsmError {
    QdsmError::FileWriteFailed {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_code() {
        let err = QdsmError::FolderNotFound {
            path: "/nowhere".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("qdsm::project::folder_not_found".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: QdsmError = io_err.into();
        assert!(matches!(err, QdsmError::IoError { .. }));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parse_result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("invalid: yaml: content: [unclosed");
        let err: QdsmError = parse_result.unwrap_err().into();
        assert!(matches!(err, QdsmError::ConfigParseFailed { .. }));
    }

    test_error_contains!(
        test_mapping_line_invalid_message,
        QdsmError::MappingLineInvalid {
            path: "swap.csv".to_string(),
            line: 3,
            content: "/a;/b;/c".to_string(),
        },
        "swap.csv:3",
        "/a;/b;/c"
    );

    test_error_contains!(
        test_parse_failed_message,
        QdsmError::DocumentParseFailed {
            path: "/p/a.qgs".to_string(),
            reason: "unexpected end".to_string(),
        },
        "/p/a.qgs",
        "unexpected end"
    );

    #[test]
    fn test_constructors() {
        assert!(matches!(
            file_read_failed("/a.qgs", "denied"),
            QdsmError::FileReadFailed { .. }
        ));
        assert!(matches!(
            file_write_failed("/a.qgs", "denied"),
            QdsmError::FileWriteFailed { .. }
        ));
    }
}
