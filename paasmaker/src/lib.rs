#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # paasmaker
//!
//! Runtime configuration for applications hosted on Paasmaker.
//!
//! On the platform, an application receives its metadata, service bindings
//! and listen port through environment variables. During local development
//! the same information comes from an override file instead. [`Interface`]
//! hides the difference: it resolves exactly one of the two sources at
//! startup and answers read-only queries about the result.
//!
//! ## Core Types
//!
//! - [`Interface`] and [`InterfaceBuilder`]: Resolved configuration and its builder
//! - [`Source`]: Which source the configuration came from
//! - [`Error`] and [`Result`]: Error handling types
//! - [`config`]: Platform detection, file loading and validation
//!
//! ## Examples
//!
//! ```no_run
//! use paasmaker::Interface;
//!
//! // Try a file next to the project, then one inside it.
//! let interface = Interface::new(&["../my-app.yml", "my-app.json"]).unwrap();
//!
//! if !interface.is_on_platform() {
//!     println!("Running locally");
//! }
//! let database = interface.service("database").unwrap();
//! println!("Database: {database}");
//! println!("Listening on port {}", interface.port());
//! ```

pub mod config;
pub mod error;
pub mod interface;

// Re-export key types at crate root for convenience
pub use config::{Environment, Mapping, ProcessEnvironment, DEFAULT_PORT};
pub use error::{Error, InterfaceError, Result};
pub use interface::{ApplicationInfo, Interface, InterfaceBuilder, Source};
