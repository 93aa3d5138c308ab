//! # loglens-repo
//!
//! Locating referenced source files across repositories and pinning a
//! repository to the version that produced a log.
//!
//! This crate provides:
//!
//! - [`RepositoryResolver`] - First-match file-name search across ordered roots
//! - [`VersionPinner`] - `pull`, tag lookup and checkout through git
//! - [`GitCommand`] - Validating builder for git invocations
//! - [`CommandRunner`] - Seam for executing git; [`SystemRunner`] runs it for real
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), loglens_repo::RepoError> {
//! use std::time::Duration;
//! use loglens_repo::{RepositoryResolver, RepositoryRoot, SystemRunner, VersionPinner};
//!
//! let resolver = RepositoryResolver::new(vec![RepositoryRoot::new("core", "/src/core")]);
//! if let Some(found) = resolver.find_file("scheduler.rs")? {
//!     let pinner = VersionPinner::new(SystemRunner::new(Duration::from_secs(30)));
//!     let pinned = pinner.pin_to_version(&found.owner_repository_path, "v1.4.2").await;
//!     println!("{} (pinned: {pinned})", found.absolute_file_path.display());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod pinning;
pub mod resolver;

pub use command::{CommandOutput, CommandRunner, GitCommand, GitInvocation, SystemRunner};
pub use error::{CommandError, RepoError, Result};
pub use pinning::{PinOutcome, VersionPinner};
pub use resolver::{find_file, RepositoryResolver, RepositoryRoot, ResolvedLocation, VCS_METADATA_DIR};
