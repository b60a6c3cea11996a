//! depcheck - outdated dependency checker library
//!
//! This library reconciles declared dependencies against their registries:
//! - pip (requirements.txt) against PyPI
//! - npm (package.json) against the npm registry
//! - packages installed in a Python environment against PyPI
//!
//! Lookups run concurrently through a shared TTL cache with retries, and
//! outdated manifests can be rewritten with the latest versions.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod installed;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod reconciler;
pub mod registry;
pub mod update;

pub use domain::{Constraint, Dialect, PackageDeclaration, UpdateResult, Version};
pub use manifest::{generate_updated_manifest, parse};
pub use reconciler::Reconciler;
pub use registry::{RegistryClient, VersionCache};
pub use update::{is_outdated, satisfies};
