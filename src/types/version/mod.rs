mod ord;
mod requirement;
mod test;
mod version;

pub use requirement::VersionRequirement;
pub use version::{extract_epoch, PkgVersion};
