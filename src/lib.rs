//! lockwarden - supply-chain threat scanner for npm, pnpm and yarn projects
//!
//! Reads a project's `package.json` and, when present, its lock file
//! (`package-lock.json`, `npm-shrinkwrap.json`, `yarn.lock` or
//! `pnpm-lock.yaml`), then classifies every dependency against a threat
//! database of known malicious packages, protestware and compromise
//! campaigns.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`threat_detection`): Lock decoders, dependency graph,
//!   threat database model and the classifier
//! - **Application Layer** (`application`): The scan use case, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use lockwarden::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<()> {
//! let use_case = ScanProjectUseCase::new(
//!     FileSystemReader::new(),
//!     FileSystemReader::new(),
//!     FileSystemReader::new(),
//!     StderrProgressReporter::new(),
//! );
//!
//! let request = ScanRequest::builder()
//!     .project_path(PathBuf::from("."))
//!     .database_path(PathBuf::from("threats.json"))
//!     .build()?;
//! let response = use_case.execute(request)?;
//!
//! let output = JsonFormatter::new().format(&response.result)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod ports;
pub mod shared;
pub mod threat_detection;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, TextFormatter};
    pub use crate::application::dto::{OutputFormat, ScanRequest, ScanResponse};
    pub use crate::application::use_cases::ScanProjectUseCase;
    pub use crate::ports::inbound::ThreatScanPort;
    pub use crate::ports::outbound::{
        LockArtifact, LockfileReader, ManifestReader, OutputPresenter, ProgressReporter,
        ScanFormatter, ThreatDatabaseRepository,
    };
    pub use crate::threat_detection::domain::{
        DependencyGraph, Issue, PackageName, ScanResult, Severity, ThreatCategory, ThreatDatabase,
    };
    pub use crate::threat_detection::policies::{ScanStatus, SeverityThreshold};
    pub use crate::threat_detection::services::{Classifier, GraphBuilder, LockDialect};
    pub use crate::shared::Result;
}
