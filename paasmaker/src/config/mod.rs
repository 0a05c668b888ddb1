//! Configuration sources for the Paasmaker interface.
//!
//! Exactly one of two sources is used:
//!
//! 1. Platform environment variables (`PM_SERVICES`, `PM_METADATA`, and
//!    optionally `PM_PORT`), when both blobs are set.
//! 2. The first existing override file from a caller-supplied list, in YAML
//!    (`.yml`/`.yaml`) or JSON (`.json`), validated by [`ConfigValidator`].
//!
//! The two are never merged.
//!
//! # Examples
//!
//! Detecting the platform with an injected environment:
//!
//! ```
//! use paasmaker::config::EnvironmentConfig;
//! use std::collections::HashMap;
//!
//! let mut env = HashMap::new();
//! env.insert("PM_SERVICES".to_string(), r#"{"db": {"port": 5432}}"#.to_string());
//! env.insert("PM_METADATA".to_string(), r#"{"application": {"name": "test"}}"#.to_string());
//!
//! let platform = EnvironmentConfig::detect(&env).unwrap().unwrap();
//! assert_eq!(platform.services.len(), 1);
//! ```

pub mod environment;
pub mod loader;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

// Re-export key types at module root
pub use environment::{Environment, EnvironmentConfig, PlatformConfig, ProcessEnvironment};
pub use loader::{ConfigFormat, ConfigLoader, LoadedFile};
pub use schema::{Mapping, DEFAULT_PORT};
pub use validator::{ConfigValidator, FileConfig};
