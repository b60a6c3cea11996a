//! Core domain models for depcheck
//!
//! This module contains the fundamental types used throughout the application:
//! - Dialect and registry kinds
//! - Version model and declared constraints
//! - Declared package information
//! - Per-package check results
//! - Summary and report structures

mod constraint;
mod declaration;
mod ecosystem;
mod summary;
mod update_result;
mod version;

pub use constraint::Constraint;
pub use declaration::PackageDeclaration;
pub use ecosystem::{Dialect, RegistryKind};
pub use summary::{CheckReport, ManifestReport};
pub use update_result::{ErrorKind, Status, UpdateResult};
pub use version::Version;
