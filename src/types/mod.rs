mod version;

pub use version::{extract_epoch, PkgVersion, VersionRequirement};
