//! Building blocks for apt repository tooling.
//!
//! This crate provides the two pieces of apt plumbing that are all
//! algorithm and no I/O: dpkg-style package version ordering
//! ([`PkgVersion`]) and parsing of deb822 "multi-line style" repository
//! source files ([`repo::parse_deb822_lines`]). Callers are expected to
//! do their own file reading and command running; everything here works
//! on in-memory strings and returns freshly built immutable values, so
//! it is safe to call from any number of threads.

pub mod repo;
pub mod types;

pub use repo::{parse_deb822_lines, RepoType, SignedBy, SourceCatalog, SourceEntry, SourceError};
pub use types::{extract_epoch, PkgVersion, VersionRequirement};
