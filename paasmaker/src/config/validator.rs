//! Validation and normalization of override file documents.
//!
//! Platform metadata is trusted as-is. Documents loaded from override files
//! are checked here: optional sections are defaulted to empty mappings, the
//! `application` section and its required keys must be present, and the
//! sections the interface reads must have the right shape.

use serde_json::Value;

use crate::config::schema::{
    self, Mapping, APPLICATION_KEY, NODE_KEY, PORT_KEY, REQUIRED_APPLICATION_KEYS, SERVICES_KEY,
    WORKSPACE_KEY,
};
use crate::error::{Error, Result};

/// A normalized override document.
#[derive(Debug, Clone, PartialEq)]
pub struct FileConfig {
    /// The whole document, with `services`, `workspace` and `node` present.
    pub document: Mapping,
    /// Top-level `port`, if the document set one.
    pub port: Option<u16>,
}

/// Validates override file documents.
///
/// # Examples
///
/// ```
/// use paasmaker::config::ConfigValidator;
/// use serde_json::json;
///
/// let config = ConfigValidator::normalize(json!({
///     "application": {
///         "name": "test",
///         "version": 1,
///         "workspace": "Test",
///         "workspace_stub": "test"
///     }
/// }))
/// .unwrap();
///
/// assert!(config.document["services"].as_object().unwrap().is_empty());
/// assert_eq!(config.port, None);
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate `document` and fill in defaults.
    ///
    /// Missing `services`, `workspace` and `node` sections become empty
    /// mappings. When several required application keys are missing, the
    /// first in `name, version, workspace, workspace_stub` order is reported.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApplication`] if there is no `application`
    /// section, [`Error::MissingRequiredKey`] if it lacks a required key, or
    /// [`Error::InvalidValue`] if a section has the wrong shape.
    pub fn normalize(document: Value) -> Result<FileConfig> {
        let mut document = schema::into_mapping("document", document)?;

        for key in [SERVICES_KEY, WORKSPACE_KEY, NODE_KEY] {
            document
                .entry(key)
                .or_insert_with(|| Value::Object(Mapping::new()));
        }

        let application = document
            .get(APPLICATION_KEY)
            .ok_or(Error::MissingApplication)?;

        Self::validate_application(schema::as_mapping(APPLICATION_KEY, application)?)?;

        let port = document
            .get(PORT_KEY)
            .map(|value| schema::as_port(PORT_KEY, value))
            .transpose()?;

        for key in [SERVICES_KEY, WORKSPACE_KEY, NODE_KEY] {
            schema::as_mapping(key, &document[key])?;
        }

        Ok(FileConfig { document, port })
    }

    /// Check that every required application key is present.
    fn validate_application(application: &Mapping) -> Result<()> {
        match REQUIRED_APPLICATION_KEYS
            .iter()
            .find(|key| !application.contains_key(**key))
        {
            Some(key) => Err(Error::MissingRequiredKey {
                key: (*key).to_string(),
            }),
            None => Ok(()),
        }
    }
}
