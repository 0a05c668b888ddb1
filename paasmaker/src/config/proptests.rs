//! Property-based tests for override document validation.

use super::schema::{Mapping, REQUIRED_APPLICATION_KEYS};
use super::validator::ConfigValidator;
use crate::error::Error;
use proptest::prelude::*;
use serde_json::{json, Value};

// Strategy for generating flat tag mappings
fn tags_strategy() -> impl Strategy<Value = Mapping> {
    prop::collection::btree_map("[a-z]{1,8}", "[a-z0-9]{0,8}", 0..6).prop_map(|tags| {
        tags.into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<Mapping>()
    })
}

fn application_with(present: [bool; 4]) -> Value {
    let mut application = Mapping::new();
    for (key, keep) in REQUIRED_APPLICATION_KEYS.iter().zip(present) {
        if keep {
            application.insert((*key).to_string(), json!("value"));
        }
    }
    Value::Object(application)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: if cfg!(feature = "property-tests") { 10000 } else { 512 },
        .. ProptestConfig::default()
    })]

    // The reported key is always the first missing one in check order
    #[test]
    fn missing_key_reported_in_order(present in any::<[bool; 4]>()) {
        let document = json!({ "application": application_with(present) });
        let result = ConfigValidator::normalize(document);

        match present.iter().position(|keep| !keep) {
            Some(index) => {
                let err = result.unwrap_err();
                let is_expected = matches!(
                    err,
                    Error::MissingRequiredKey { ref key } if key == REQUIRED_APPLICATION_KEYS[index]
                );
                prop_assert!(is_expected, "unexpected error: {}", err);
            }
            None => prop_assert!(result.is_ok()),
        }
    }

    // Supplied tags survive normalization untouched; absent ones default to empty
    #[test]
    fn tags_preserved_or_defaulted(
        node in prop::option::of(tags_strategy()),
        workspace in prop::option::of(tags_strategy()),
    ) {
        let mut document = Mapping::new();
        document.insert("application".into(), application_with([true; 4]));
        if let Some(ref node) = node {
            document.insert("node".into(), Value::Object(node.clone()));
        }
        if let Some(ref workspace) = workspace {
            document.insert("workspace".into(), Value::Object(workspace.clone()));
        }

        let config = ConfigValidator::normalize(Value::Object(document)).unwrap();

        prop_assert_eq!(
            config.document["node"].as_object().unwrap(),
            &node.unwrap_or_default()
        );
        prop_assert_eq!(
            config.document["workspace"].as_object().unwrap(),
            &workspace.unwrap_or_default()
        );
        prop_assert!(config.document["services"].as_object().unwrap().is_empty());
    }

    // Any in-range integer port is adopted as given
    #[test]
    fn port_adopted(port in any::<u16>()) {
        let document = json!({
            "application": application_with([true; 4]),
            "port": port,
        });

        let config = ConfigValidator::normalize(document).unwrap();
        prop_assert_eq!(config.port, Some(port));
    }

    // Out-of-range ports are rejected rather than truncated
    #[test]
    fn port_out_of_range_rejected(port in 65536u64..=1_000_000) {
        let document = json!({
            "application": application_with([true; 4]),
            "port": port,
        });

        let is_invalid = matches!(
            ConfigValidator::normalize(document),
            Err(Error::InvalidValue { .. })
        );
        prop_assert!(is_invalid);
    }
}
