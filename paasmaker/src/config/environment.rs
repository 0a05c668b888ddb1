//! Platform detection from environment variables.
//!
//! When an application runs on Paasmaker, the platform hands it three
//! variables: `PM_SERVICES` and `PM_METADATA` (both JSON) and optionally
//! `PM_PORT`. Environment access goes through the [`Environment`] trait so
//! callers and tests can supply values without touching the process
//! environment.

use std::collections::HashMap;
use std::env;
use std::hash::BuildHasher;

use serde_json::Value;

use crate::config::schema::{self, Mapping, METADATA_ENV, PORT_ENV, SERVICES_ENV};
use crate::error::{Error, Result};

/// Read access to environment variables.
///
/// # Examples
///
/// ```
/// use paasmaker::config::Environment;
/// use std::collections::HashMap;
///
/// let mut env = HashMap::new();
/// env.insert("PM_PORT".to_string(), "42600".to_string());
///
/// assert_eq!(env.var("PM_PORT").as_deref(), Some("42600"));
/// assert_eq!(env.var("PM_SERVICES"), None);
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait Environment {
    /// Returns the value of `name`, or `None` if it is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl<S: BuildHasher> Environment for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Configuration handed over by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    /// Decoded `PM_METADATA` document.
    pub metadata: Value,
    /// Decoded `PM_SERVICES` bindings.
    pub services: Mapping,
    /// Parsed `PM_PORT`, if it was set.
    pub port: Option<u16>,
}

/// Detects and decodes platform-supplied configuration.
///
/// # Examples
///
/// ```
/// use paasmaker::config::EnvironmentConfig;
/// use std::collections::HashMap;
///
/// let env: HashMap<String, String> = HashMap::new();
/// assert!(EnvironmentConfig::detect(&env).unwrap().is_none());
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Detect whether the process is managed by the platform.
    ///
    /// Returns `Ok(None)` unless both `PM_SERVICES` and `PM_METADATA` are set
    /// to non-empty values. The metadata is trusted and not validated.
    ///
    /// # Errors
    ///
    /// Returns an error if either blob is not valid JSON, if the services
    /// blob is not a mapping, or if `PM_PORT` is not a port number.
    pub fn detect<E: Environment + ?Sized>(env: &E) -> Result<Option<PlatformConfig>> {
        let raw_services = Self::non_empty(env, SERVICES_ENV);
        let raw_metadata = Self::non_empty(env, METADATA_ENV);

        let (Some(raw_services), Some(raw_metadata)) = (raw_services, raw_metadata) else {
            log::debug!("{SERVICES_ENV}/{METADATA_ENV} not both set, not running on Paasmaker");
            return Ok(None);
        };

        let metadata = Self::parse_json(METADATA_ENV, &raw_metadata)?;
        let services = schema::into_mapping(
            SERVICES_ENV,
            Self::parse_json(SERVICES_ENV, &raw_services)?,
        )?;

        let port = match Self::non_empty(env, PORT_ENV) {
            Some(raw) => Some(Self::parse_port(&raw)?),
            None => None,
        };

        log::debug!(
            "Running on Paasmaker with {} service(s), port {:?}",
            services.len(),
            port
        );

        Ok(Some(PlatformConfig {
            metadata,
            services,
            port,
        }))
    }

    /// Read a variable, treating an empty value as unset.
    fn non_empty<E: Environment + ?Sized>(env: &E, name: &str) -> Option<String> {
        env.var(name).filter(|value| !value.is_empty())
    }

    fn parse_json(origin: &str, raw: &str) -> Result<Value> {
        serde_json::from_str(raw).map_err(|source| Error::Json {
            origin: origin.into(),
            source,
        })
    }

    /// Parse a decimal port number.
    fn parse_port(raw: &str) -> Result<u16> {
        raw.trim().parse().map_err(|_| Error::InvalidValue {
            field: PORT_ENV.into(),
            message: format!("Invalid port number: '{raw}'"),
        })
    }
}
