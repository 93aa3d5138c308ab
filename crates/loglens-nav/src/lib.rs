//! # loglens-nav
//!
//! Ties classification to source navigation.
//!
//! This crate provides:
//!
//! - [`ErrorRegistry`] - Per-document error lists, first registration wins
//! - [`AnalysisSession`] - Rules, legend and registry with explicit reset points
//! - [`ReferenceNavigator`] - Error record → source file, pinned to the log's version
//! - [`Editor`] / [`Notifier`] - Seams for the host that opens files and shows messages
//!
//! ## Flow
//!
//! ```text
//! text ──► AnalysisSession::analyze ──► tokens (renderer)
//!                    │
//!                    └──► ErrorRegistry ◄── ReferenceNavigator::navigate(doc, line)
//!                                                 │
//!                          RepositoryResolver ◄───┤
//!                          VersionPinner      ◄───┘──► Editor::open_at
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod host;
pub mod navigator;
pub mod registry;
pub mod session;

pub use error::{NavError, Result};
pub use host::{Editor, Notifier};
pub use navigator::{NavigationOutcome, ReferenceNavigator};
pub use registry::{shared_registry, DocumentErrorLog, ErrorMatch, ErrorRegistry, SharedRegistry};
pub use session::{AnalysisSession, DocumentAnalysis};
