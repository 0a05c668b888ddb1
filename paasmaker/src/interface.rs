//! The resolved runtime configuration.
//!
//! [`Interface`] is built once at startup. It decides whether the process
//! runs on Paasmaker, loads the matching source, and then answers read-only
//! queries about the application, its services, tags and port.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::schema::{
    APPLICATION_KEY, DEFAULT_PORT, NODE_KEY, SERVICES_KEY, WORKSPACE_KEY,
};
use crate::config::{
    ConfigLoader, ConfigValidator, Environment, EnvironmentConfig, Mapping, PlatformConfig,
    ProcessEnvironment,
};
use crate::error::{Error, Result};

static NULL: Value = Value::Null;
static EMPTY: LazyLock<Mapping> = LazyLock::new(Mapping::new);

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Supplied by the platform through environment variables.
    Platform {
        /// Decoded metadata document.
        metadata: Value,
        /// Decoded service bindings.
        services: Mapping,
    },
    /// Loaded from an override file.
    FileBased {
        /// The file that was adopted.
        path: PathBuf,
        /// The normalized document; always a mapping holding `services`,
        /// `workspace`, `node` and a validated `application`.
        document: Value,
    },
}

/// Typed view of the `application` section.
///
/// The version is often numeric and the other fields are usually strings,
/// but no shape is enforced beyond presence.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationInfo {
    /// Application name.
    pub name: Value,
    /// Application version.
    pub version: Value,
    /// Workspace name.
    pub workspace: Value,
    /// Workspace stub.
    pub workspace_stub: Value,
}

/// Runtime configuration for an application hosted on Paasmaker.
///
/// # Examples
///
/// ```
/// use paasmaker::Interface;
/// use std::collections::HashMap;
///
/// let mut env = HashMap::new();
/// env.insert("PM_SERVICES".to_string(), r#"{"variables": {"one": "two"}}"#.to_string());
/// env.insert(
///     "PM_METADATA".to_string(),
///     r#"{"application": {"name": "test", "version": 1, "workspace": "Test", "workspace_stub": "test"}}"#
///         .to_string(),
/// );
///
/// let paths: [&str; 0] = [];
/// let interface = Interface::with_environment(&paths, &env).unwrap();
///
/// assert!(interface.is_on_platform());
/// assert_eq!(interface.application_name(), "test");
/// assert_eq!(interface.port(), 9001);
/// assert!(interface.service("no-service").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    source: Source,
    port: u16,
}

impl Interface {
    /// Resolve configuration from the process environment, falling back to
    /// the first existing file in `override_paths`.
    ///
    /// # Errors
    ///
    /// See [`Interface::with_environment`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use paasmaker::Interface;
    ///
    /// let interface = Interface::new(&["../my-app.yml"]).unwrap();
    /// println!("Listening on port {}", interface.port());
    /// ```
    pub fn new<P: AsRef<Path>>(override_paths: &[P]) -> Result<Self> {
        Self::with_environment(override_paths, &ProcessEnvironment)
    }

    /// Resolve configuration from `env`, falling back to the first existing
    /// file in `override_paths`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform variables are malformed, if no
    /// override file exists, or if the adopted file fails to load or
    /// validate.
    pub fn with_environment<P, E>(override_paths: &[P], env: &E) -> Result<Self>
    where
        P: AsRef<Path>,
        E: Environment + ?Sized,
    {
        match EnvironmentConfig::detect(env)? {
            Some(platform) => Ok(Self::from_platform(platform)),
            None => Self::from_override_files(override_paths),
        }
    }

    /// Start building an interface with custom options.
    #[must_use]
    pub fn builder() -> InterfaceBuilder {
        InterfaceBuilder::new()
    }

    /// Build from configuration the platform supplied.
    #[must_use]
    pub fn from_platform(platform: PlatformConfig) -> Self {
        Self {
            source: Source::Platform {
                metadata: platform.metadata,
                services: platform.services,
            },
            port: platform.port.unwrap_or(DEFAULT_PORT),
        }
    }

    /// Build from the first existing file in `override_paths`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoConfigurationFile`] if none exist, or the load or
    /// validation error of the adopted file.
    pub fn from_override_files<P: AsRef<Path>>(override_paths: &[P]) -> Result<Self> {
        let loaded = ConfigLoader::load_first(override_paths)?;
        let config = ConfigValidator::normalize(loaded.document)?;

        Ok(Self {
            source: Source::FileBased {
                path: loaded.path,
                document: Value::Object(config.document),
            },
            port: config.port.unwrap_or(DEFAULT_PORT),
        })
    }

    /// Returns `true` if the configuration came from the platform.
    #[must_use]
    pub fn is_on_platform(&self) -> bool {
        matches!(self.source, Source::Platform { .. })
    }

    /// The source the configuration was resolved from.
    #[must_use]
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// The override file that was loaded, if not running on the platform.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        match &self.source {
            Source::Platform { .. } => None,
            Source::FileBased { path, .. } => Some(path),
        }
    }

    /// The whole metadata document.
    #[must_use]
    pub fn metadata(&self) -> &Value {
        match &self.source {
            Source::Platform { metadata, .. } => metadata,
            Source::FileBased { document, .. } => document,
        }
    }

    /// Look up a service binding by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchService`] if no service is bound to `name`.
    pub fn service(&self, name: &str) -> Result<&Value> {
        self.all_services()
            .get(name)
            .ok_or_else(|| Error::NoSuchService { name: name.into() })
    }

    /// Look up a service binding and deserialize it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchService`] if no service is bound to `name`, or
    /// [`Error::InvalidValue`] if the binding does not fit `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use paasmaker::Interface;
    /// use serde::Deserialize;
    /// use std::collections::HashMap;
    ///
    /// #[derive(Deserialize)]
    /// struct Database {
    ///     hostname: String,
    ///     port: u16,
    /// }
    ///
    /// let mut env = HashMap::new();
    /// env.insert(
    ///     "PM_SERVICES".to_string(),
    ///     r#"{"db": {"hostname": "localhost", "port": 5432}}"#.to_string(),
    /// );
    /// env.insert("PM_METADATA".to_string(), "{}".to_string());
    ///
    /// let paths: [&str; 0] = [];
    /// let interface = Interface::with_environment(&paths, &env).unwrap();
    /// let db: Database = interface.service_as("db").unwrap();
    /// assert_eq!(db.port, 5432);
    /// ```
    pub fn service_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        T::deserialize(self.service(name)?).map_err(|e| Error::InvalidValue {
            field: format!("{SERVICES_KEY}.{name}"),
            message: e.to_string(),
        })
    }

    /// All service bindings.
    #[must_use]
    pub fn all_services(&self) -> &Mapping {
        match &self.source {
            Source::Platform { services, .. } => services,
            Source::FileBased { document, .. } => document
                .get(SERVICES_KEY)
                .and_then(Value::as_object)
                .unwrap_or(&*EMPTY),
        }
    }

    /// The application name.
    #[must_use]
    pub fn application_name(&self) -> &Value {
        self.application_field("name")
    }

    /// The application version.
    #[must_use]
    pub fn application_version(&self) -> &Value {
        self.application_field("version")
    }

    /// The name of the workspace the application belongs to.
    #[must_use]
    pub fn workspace_name(&self) -> &Value {
        self.application_field("workspace")
    }

    /// The workspace stub.
    #[must_use]
    pub fn workspace_stub(&self) -> &Value {
        self.application_field("workspace_stub")
    }

    /// Tags of the node the application runs on.
    #[must_use]
    pub fn node_tags(&self) -> &Mapping {
        self.tags(NODE_KEY)
    }

    /// Tags of the workspace the application belongs to.
    #[must_use]
    pub fn workspace_tags(&self) -> &Mapping {
        self.tags(WORKSPACE_KEY)
    }

    /// The four identity fields of the `application` section together.
    #[must_use]
    pub fn application(&self) -> ApplicationInfo {
        ApplicationInfo {
            name: self.application_name().clone(),
            version: self.application_version().clone(),
            workspace: self.workspace_name().clone(),
            workspace_stub: self.workspace_stub().clone(),
        }
    }

    /// The port the application should listen on.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    // Platform metadata is not validated, so absent fields read as null.
    fn application_field(&self, key: &str) -> &Value {
        self.metadata()
            .get(APPLICATION_KEY)
            .and_then(|application| application.get(key))
            .unwrap_or(&NULL)
    }

    fn tags(&self, key: &str) -> &Mapping {
        self.metadata()
            .get(key)
            .and_then(Value::as_object)
            .unwrap_or(&*EMPTY)
    }
}

/// Builder for [`Interface`].
///
/// # Examples
///
/// ```no_run
/// use paasmaker::InterfaceBuilder;
///
/// let interface = InterfaceBuilder::new()
///     .with_override_path("../my-app.yml")
///     .with_override_path("my-app.json")
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct InterfaceBuilder {
    override_paths: Vec<PathBuf>,
    environment: Option<Box<dyn Environment>>,
    skip_env: bool,
}

impl InterfaceBuilder {
    /// Create a builder that reads the process environment and has no
    /// override paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an override path to try.
    #[must_use]
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_paths.push(path.into());
        self
    }

    /// Append several override paths to try, in order.
    #[must_use]
    pub fn with_override_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.override_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Read platform variables from `env` instead of the process environment.
    #[must_use]
    pub fn with_environment(mut self, env: impl Environment + 'static) -> Self {
        self.environment = Some(Box::new(env));
        self
    }

    /// Ignore the platform variables and always load an override file.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Resolve the configuration.
    ///
    /// # Errors
    ///
    /// See [`Interface::with_environment`].
    pub fn build(self) -> Result<Interface> {
        if self.skip_env {
            return Interface::from_override_files(&self.override_paths);
        }

        match self.environment {
            Some(env) => Interface::with_environment(&self.override_paths, env.as_ref()),
            None => Interface::with_environment(&self.override_paths, &ProcessEnvironment),
        }
    }
}
