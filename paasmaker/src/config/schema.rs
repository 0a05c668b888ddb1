//! Configuration document shape.
//!
//! Documents from either source are kept as generic [`serde_json::Value`]
//! trees. This module names the well-known keys and provides typed accessors
//! that turn a shape mismatch into an [`Error::InvalidValue`].

use serde_json::Value;

use crate::error::{Error, Result};

/// A decoded mapping node.
pub type Mapping = serde_json::Map<String, Value>;

/// Port used when neither source supplies one.
pub const DEFAULT_PORT: u16 = 9001;

/// Environment variable carrying the JSON-encoded service bindings.
pub const SERVICES_ENV: &str = "PM_SERVICES";

/// Environment variable carrying the JSON-encoded metadata document.
pub const METADATA_ENV: &str = "PM_METADATA";

/// Environment variable carrying the port to listen on.
pub const PORT_ENV: &str = "PM_PORT";

/// Top-level key holding service bindings.
pub const SERVICES_KEY: &str = "services";

/// Top-level key holding application identity.
pub const APPLICATION_KEY: &str = "application";

/// Top-level key holding workspace tags.
pub const WORKSPACE_KEY: &str = "workspace";

/// Top-level key holding node tags.
pub const NODE_KEY: &str = "node";

/// Top-level key holding the port override.
pub const PORT_KEY: &str = "port";

/// Keys the `application` section must carry, in the order they are checked.
pub const REQUIRED_APPLICATION_KEYS: [&str; 4] = ["name", "version", "workspace", "workspace_stub"];

/// Borrow `value` as a mapping.
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] naming `field` if `value` is not a mapping.
///
/// # Examples
///
/// ```
/// use paasmaker::config::schema::as_mapping;
/// use serde_json::json;
///
/// assert!(as_mapping("node", &json!({"tag": "x"})).is_ok());
/// assert!(as_mapping("node", &json!([1, 2])).is_err());
/// ```
pub fn as_mapping<'a>(field: &str, value: &'a Value) -> Result<&'a Mapping> {
    value.as_object().ok_or_else(|| Error::InvalidValue {
        field: field.into(),
        message: format!("expected a mapping, found {}", kind_of(value)),
    })
}

/// Take ownership of `value` as a mapping.
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] naming `field` if `value` is not a mapping.
pub fn into_mapping(field: &str, value: Value) -> Result<Mapping> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::InvalidValue {
            field: field.into(),
            message: format!("expected a mapping, found {}", kind_of(&other)),
        }),
    }
}

/// Read `value` as a port number.
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] naming `field` unless `value` is an
/// integer in `0..=65535`.
///
/// # Examples
///
/// ```
/// use paasmaker::config::schema::as_port;
/// use serde_json::json;
///
/// assert_eq!(as_port("port", &json!(9002)).unwrap(), 9002);
/// assert!(as_port("port", &json!("9002")).is_err());
/// assert!(as_port("port", &json!(70000)).is_err());
/// ```
pub fn as_port(field: &str, value: &Value) -> Result<u16> {
    value
        .as_u64()
        .and_then(|n| u16::try_from(n).ok())
        .ok_or_else(|| Error::InvalidValue {
            field: field.into(),
            message: format!("expected a port number (0-65535), found {value}"),
        })
}

/// Short name for the kind of a value, used in error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_mapping_rejects_scalars() {
        let err = as_mapping("services", &json!("nope")).unwrap_err();
        let display = err.to_string();
        assert!(display.contains("services"));
        assert!(display.contains("a string"));
    }

    #[test]
    fn test_into_mapping_keeps_entries() {
        let map = into_mapping("node", json!({"one": "two"})).unwrap();
        assert_eq!(map.get("one"), Some(&json!("two")));
    }

    #[test]
    fn test_into_mapping_rejects_null() {
        assert!(matches!(
            into_mapping("document", Value::Null),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_as_port_bounds() {
        assert_eq!(as_port("port", &json!(0)).unwrap(), 0);
        assert_eq!(as_port("port", &json!(65535)).unwrap(), 65535);
        assert!(as_port("port", &json!(65536)).is_err());
        assert!(as_port("port", &json!(-1)).is_err());
        assert!(as_port("port", &json!(90.5)).is_err());
    }

    #[test]
    fn test_required_key_order() {
        assert_eq!(
            REQUIRED_APPLICATION_KEYS,
            ["name", "version", "workspace", "workspace_stub"]
        );
    }
}
