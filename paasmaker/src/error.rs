//! Error types for the paasmaker library.
//!
//! Every failure the interface can report is a variant of [`Error`]. The
//! `Display` output of each variant is the human-readable message handed to
//! the host application, which is expected to treat construction failures as
//! fatal.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a paasmaker error.
///
/// # Examples
///
/// ```
/// use paasmaker::{Error, Result};
///
/// fn lookup() -> Result<u16> {
///     Err(Error::NoConfigurationFile)
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Alias matching the name used by the other Paasmaker interface libraries.
pub type InterfaceError = Error;

/// The main error type for the paasmaker library.
#[derive(Debug, Error)]
pub enum Error {
    /// Not running on Paasmaker and none of the override paths exist.
    #[error("Unable to find any configuration files to load.")]
    NoConfigurationFile,

    /// The loaded configuration file has no `application` section.
    #[error("You must have application data in your configuration file.")]
    MissingApplication,

    /// The `application` section is missing one of its required keys.
    #[error("Missing required key {key} in application section.")]
    MissingRequiredKey {
        /// The first required key found missing.
        key: String,
    },

    /// A service lookup named a service that is not bound.
    #[error("No such service {name}.")]
    NoSuchService {
        /// The requested service name.
        name: String,
    },

    /// An override file exists but its extension has no matching codec.
    #[error("unsupported configuration file format: {}", path.display())]
    UnsupportedFormat {
        /// The file that could not be decoded.
        path: PathBuf,
    },

    /// A value has the wrong shape for where it appears.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Dotted location of the offending value.
        field: String,
        /// What was expected.
        message: String,
    },

    /// A configuration file exists but could not be read.
    #[error("failed to read configuration file {}: {source}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON text from a file or environment variable failed to decode.
    #[error("invalid JSON in {origin}: {source}")]
    Json {
        /// File path or environment variable name the text came from.
        origin: String,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A YAML configuration file failed to decode.
    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        /// The file being decoded.
        path: PathBuf,
        /// The underlying decode error.
        #[source]
        source: serde_yaml::Error,
    },
}

impl Error {
    /// Check if the error means some named thing could not be found.
    ///
    /// # Examples
    ///
    /// ```
    /// use paasmaker::Error;
    ///
    /// let err = Error::NoSuchService { name: "db".to_string() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoConfigurationFile | Self::NoSuchService { .. }
        )
    }

    /// Check if the error comes from validating a configuration document.
    ///
    /// # Examples
    ///
    /// ```
    /// use paasmaker::Error;
    ///
    /// assert!(Error::MissingApplication.is_validation());
    /// assert!(!Error::NoConfigurationFile.is_validation());
    /// ```
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingApplication | Self::MissingRequiredKey { .. } | Self::InvalidValue { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_configuration_file_message() {
        let err = Error::NoConfigurationFile;
        assert_eq!(
            err.to_string(),
            "Unable to find any configuration files to load."
        );
    }

    #[test]
    fn test_missing_application_message() {
        let err = Error::MissingApplication;
        assert_eq!(
            err.to_string(),
            "You must have application data in your configuration file."
        );
    }

    #[test]
    fn test_missing_required_key_message() {
        let err = Error::MissingRequiredKey {
            key: "workspace_stub".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required key workspace_stub in application section."
        );
    }

    #[test]
    fn test_no_such_service_message() {
        let err = Error::NoSuchService {
            name: "no-service".to_string(),
        };
        assert_eq!(err.to_string(), "No such service no-service.");
    }

    #[test]
    fn test_unsupported_format_error() {
        let err = Error::UnsupportedFormat {
            path: PathBuf::from("/etc/app/config.toml"),
        };
        let display = err.to_string();
        assert!(display.contains("unsupported configuration file format"));
        let normalized = display.replace(std::path::MAIN_SEPARATOR, "/");
        assert!(normalized.contains("config.toml"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = Error::InvalidValue {
            field: "port".to_string(),
            message: "expected an integer".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("'port'"));
        assert!(display.contains("expected an integer"));
    }

    #[test]
    fn test_json_error_names_origin() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::Json {
            origin: "PM_METADATA".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid JSON in PM_METADATA"));
    }

    #[test]
    fn test_classification() {
        assert!(Error::NoConfigurationFile.is_not_found());
        assert!(!Error::MissingApplication.is_not_found());
        assert!(Error::MissingRequiredKey {
            key: "name".to_string()
        }
        .is_validation());
        assert!(!Error::NoSuchService {
            name: "x".to_string()
        }
        .is_validation());
    }
}
