//! regls - Container Registry Inventory Library
//!
//! libregls walks a Docker Distribution v2 registry and reports, for every
//! repository, its most recent tags together with their architectures and
//! creation times.
//!
//! # Quick Start
//!
//! ```no_run
//! use libregls::{ListOptions, Regls};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let regls = Regls::builder()
//!         .registry_url("http://localhost:5000")
//!         .with_options(ListOptions::new().with_prefix("app"))
//!         .build()?;
//!
//!     let inventory = regls.list().await?;
//!     for row in &inventory.rows {
//!         println!("{} {} {} {}", row.repository, row.tag, row.architecture, row.created);
//!     }
//!     for failure in &inventory.failures {
//!         eprintln!("skipped {}: {}", failure.repository, failure.error);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`Regls`] / [`ReglsBuilder`] - Main entry point
//! - [`ListOptions`] and [`FailurePolicy`] - Prefix filter, tag limit and failure handling
//! - [`Inventory`] and [`Row`] - Aggregated, display-ready output
//! - [`Config`] - Layered configuration (defaults, YAML file, environment)
//! - [`RegistryError`] - Every failure the library reports
//!
//! # Architecture
//!
//! - [`client`] issues the five registry GET requests
//! - [`manifest`] decodes the manifest shapes
//! - [`resolver`] turns one tag into a [`TagRecord`]
//! - [`aggregator`] fans out over repositories and tags on a bounded pool
//! - [`format`] parses and renders creation timestamps

#![warn(clippy::all)]

/// Returns the libregls crate version.
///
/// # Examples
///
/// ```
/// let version = libregls::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

mod regls;
pub use regls::{Regls, ReglsBuilder};

pub use aggregator::{
    Aggregator, DEFAULT_CONCURRENCY, DEFAULT_TAG_LIMIT, FailurePolicy, Inventory, ListOptions,
    Row, TagFailure,
};
pub use client::{ClientConfig, RegistryClient};
pub use config::Config;
pub use error::{RegistryError, Result};
pub use manifest::ManifestShape;
pub use resolver::{TagRecord, TagResolver};

pub mod aggregator;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod manifest;
pub mod resolver;
