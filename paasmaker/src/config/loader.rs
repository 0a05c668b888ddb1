//! Override file discovery and loading.
//!
//! When the platform variables are absent, configuration comes from the
//! first existing file among a caller-supplied list of override paths. The
//! file's extension selects the codec.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Error, Result};

/// Codec used to decode an override file.
///
/// # Examples
///
/// ```
/// use paasmaker::config::ConfigFormat;
/// use std::path::Path;
///
/// assert_eq!(ConfigFormat::from_path(Path::new("app.yml")), Some(ConfigFormat::Yaml));
/// assert_eq!(ConfigFormat::from_path(Path::new("app.json")), Some(ConfigFormat::Json));
/// assert_eq!(ConfigFormat::from_path(Path::new("app.toml")), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML, selected by `.yml` or `.yaml`.
    Yaml,
    /// JSON, selected by `.json`.
    Json,
}

impl ConfigFormat {
    /// Pick the codec for `path` from its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Decode `contents` into a generic document.
    ///
    /// `path` is only used for error reporting. YAML merge keys (`<<`) are
    /// resolved before conversion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] or [`Error::Json`] if `contents` is malformed,
    /// or [`Error::InvalidValue`] if a YAML document holds a value with no
    /// JSON equivalent, such as `.nan`, `.inf` or a sequence used as a key.
    pub fn decode(self, contents: &str, path: &Path) -> Result<Value> {
        match self {
            Self::Yaml => Self::decode_yaml(contents, path),
            Self::Json => serde_json::from_str(contents).map_err(|source| Error::Json {
                origin: path.display().to_string(),
                source,
            }),
        }
    }

    fn decode_yaml(contents: &str, path: &Path) -> Result<Value> {
        let yaml_error = |source| Error::Yaml {
            path: path.to_path_buf(),
            source,
        };

        let mut document: serde_yaml::Value = serde_yaml::from_str(contents).map_err(yaml_error)?;
        document.apply_merge().map_err(yaml_error)?;
        Self::reject_non_finite("document", &document)?;

        serde_json::to_value(&document).map_err(|e| Error::InvalidValue {
            field: path.display().to_string(),
            message: e.to_string(),
        })
    }

    // JSON numbers cannot hold NaN or infinity; converting would turn them into null.
    fn reject_non_finite(field: &str, value: &serde_yaml::Value) -> Result<()> {
        match value {
            serde_yaml::Value::Number(n) if n.is_nan() || n.is_infinite() => {
                Err(Error::InvalidValue {
                    field: field.into(),
                    message: format!("non-finite number {n} is not supported"),
                })
            }
            serde_yaml::Value::Sequence(items) => items
                .iter()
                .enumerate()
                .try_for_each(|(i, item)| Self::reject_non_finite(&format!("{field}[{i}]"), item)),
            serde_yaml::Value::Mapping(map) => map.iter().try_for_each(|(key, item)| {
                let key = match key {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => format!("{other:?}"),
                };
                Self::reject_non_finite(&format!("{field}.{key}"), item)
            }),
            serde_yaml::Value::Tagged(tagged) => Self::reject_non_finite(field, &tagged.value),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "yaml"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// A decoded override file, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    /// Path the document was read from.
    pub path: PathBuf,
    /// Codec that decoded it.
    pub format: ConfigFormat,
    /// Decoded document.
    pub document: Value,
}

/// Loads override files.
///
/// # Examples
///
/// ```no_run
/// use paasmaker::config::ConfigLoader;
///
/// let loaded = ConfigLoader::load_first(&["../my-app.yml", "my-app.json"]).unwrap();
/// println!("Loaded {}", loaded.path.display());
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the first of `paths` that exists.
    ///
    /// Paths are tried in order. Missing paths are skipped; the first
    /// existing one is authoritative even if it then fails to decode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoConfigurationFile`] if none of the paths exist, or
    /// any error from [`ConfigLoader::load_file`] for the first existing one.
    pub fn load_first<P: AsRef<Path>>(paths: &[P]) -> Result<LoadedFile> {
        for path in paths {
            let path = path.as_ref();
            if path.exists() {
                return Self::load_file(path);
            }
            log::debug!("Override file {} does not exist, skipping", path.display());
        }

        Err(Error::NoConfigurationFile)
    }

    /// Read and decode a single override file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if the extension has no codec,
    /// [`Error::Io`] if the file cannot be read, or a decode error.
    pub fn load_file(path: &Path) -> Result<LoadedFile> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;

        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let document = format.decode(&contents, path)?;
        log::debug!("Loaded {format} configuration from {}", path.display());

        Ok(LoadedFile {
            path: path.to_path_buf(),
            format,
            document,
        })
    }
}
